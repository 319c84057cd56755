//! Webhook notifier
//!
//! The notifier is the one sink that performs network I/O. The dispatcher
//! only ever calls it from a delivery pool task.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tokio_util::sync::CancellationToken;

use super::event::WebhookEvent;
use crate::error::{Error, NotifyError};

/// Default per-request timeout
pub const DEFAULT_WEBHOOK_TIMEOUT: Duration = Duration::from_secs(5);

/// Destination for webhook events
#[async_trait]
pub trait WebhookNotifier: Send + Sync {
    /// Deliver one event
    ///
    /// Must stop early with [`NotifyError::Cancelled`] once `cancel` fires.
    async fn notify(
        &self,
        cancel: &CancellationToken,
        event: &WebhookEvent,
    ) -> Result<(), NotifyError>;
}

/// Notifier that POSTs the JSON-encoded event to every configured URL
#[derive(Clone)]
pub struct HttpNotifier {
    client: Client,
    urls: Vec<String>,
    api_key: Option<String>,
}

impl HttpNotifier {
    /// Create a notifier for the given endpoints
    pub fn new(urls: Vec<String>) -> crate::Result<Self> {
        Self::with_timeout(urls, DEFAULT_WEBHOOK_TIMEOUT)
    }

    /// Create a notifier with a custom per-request timeout
    ///
    /// Fails if the TLS backend or system resolver cannot be initialised.
    pub fn with_timeout(urls: Vec<String>, timeout: Duration) -> crate::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(Error::Client)?;

        Ok(Self {
            client,
            urls,
            api_key: None,
        })
    }

    /// Send `Authorization: Bearer <key>` with every request
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    async fn post(&self, url: &str, body: Vec<u8>) -> Result<(), NotifyError> {
        let mut request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body);

        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|source| NotifyError::Http {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl WebhookNotifier for HttpNotifier {
    async fn notify(
        &self,
        cancel: &CancellationToken,
        event: &WebhookEvent,
    ) -> Result<(), NotifyError> {
        let body = serde_json::to_vec(event)?;
        let mut first_error = None;

        // Every endpoint gets the event even if an earlier one failed
        for url in &self.urls {
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(NotifyError::Cancelled),
                result = self.post(url, body.clone()) => result,
            };

            if let Err(e) = result {
                tracing::debug!(
                    url = %url,
                    event = %event.event,
                    error = %e,
                    "Webhook endpoint failed"
                );
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;
    use crate::model::Room;

    /// Serve `count` requests with a fixed status line, returning the raw requests
    async fn serve(
        status: &'static str,
        count: usize,
    ) -> (String, tokio::task::JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/webhook", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let mut requests = Vec::new();
            for _ in 0..count {
                let (mut socket, _) = listener.accept().await.unwrap();
                requests.push(read_request(&mut socket).await);

                let response =
                    format!("HTTP/1.1 {status}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n");
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.shutdown().await.ok();
            }
            requests
        });

        (url, handle)
    }

    /// Read headers plus a `content-length` body
    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut data = Vec::new();
        let mut chunk = [0u8; 4096];

        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            data.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&data).to_string();
            if let Some(header_end) = text.find("\r\n\r\n") {
                let body_len = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if data.len() >= header_end + 4 + body_len {
                    return text;
                }
            }
        }

        String::from_utf8_lossy(&data).to_string()
    }

    fn event() -> WebhookEvent {
        WebhookEvent::room_started(&Room::new("RM_1", "Room A", 1_700_000_000)).stamp()
    }

    #[tokio::test]
    async fn test_notify_posts_json() {
        let (url, server) = serve("200 OK", 1).await;
        let notifier = HttpNotifier::new(vec![url]).unwrap().api_key("secret");

        let result = notifier.notify(&CancellationToken::new(), &event()).await;
        assert!(result.is_ok(), "{result:?}");

        let requests = server.await.unwrap();
        let request = &requests[0];
        assert!(request.starts_with("POST /webhook"));
        assert!(request.to_ascii_lowercase().contains("authorization: bearer secret"));
        assert!(request.contains("\"event\":\"room_started\""));
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let (url, _server) = serve("500 Internal Server Error", 1).await;
        let notifier = HttpNotifier::new(vec![url]).unwrap();

        let err = notifier
            .notify(&CancellationToken::new(), &event())
            .await
            .unwrap_err();
        assert!(matches!(err, NotifyError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_all_endpoints_attempted_after_failure() {
        let (bad, _bad_server) = serve("503 Service Unavailable", 1).await;
        let (good, good_server) = serve("204 No Content", 1).await;
        let notifier = HttpNotifier::new(vec![bad, good]).unwrap();

        let err = notifier
            .notify(&CancellationToken::new(), &event())
            .await
            .unwrap_err();
        assert!(matches!(err, NotifyError::Status { status: 503, .. }));
        assert_eq!(good_server.await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_http_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/webhook", listener.local_addr().unwrap());
        drop(listener);

        let notifier = HttpNotifier::with_timeout(vec![url], Duration::from_secs(1)).unwrap();
        let err = notifier
            .notify(&CancellationToken::new(), &event())
            .await
            .unwrap_err();
        assert!(matches!(err, NotifyError::Http { .. }));
    }

    #[tokio::test]
    async fn test_cancelled_before_delivery() {
        let notifier = HttpNotifier::new(vec!["http://127.0.0.1:9/webhook".to_string()]).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = notifier.notify(&cancel, &event()).await.unwrap_err();
        assert!(matches!(err, NotifyError::Cancelled));
    }

    #[tokio::test]
    async fn test_configured_timeout_applies() {
        // Accepts the connection but never answers
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/webhook", listener.local_addr().unwrap());
        let _server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
            drop(socket);
        });

        let notifier = HttpNotifier::with_timeout(vec![url], Duration::from_millis(200)).unwrap();
        let started = std::time::Instant::now();
        let err = notifier
            .notify(&CancellationToken::new(), &event())
            .await
            .unwrap_err();

        match err {
            NotifyError::Http { source, .. } => assert!(source.is_timeout(), "{source:?}"),
            other => panic!("expected timeout, got {other:?}"),
        }
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_no_urls_is_ok() {
        let notifier = HttpNotifier::new(Vec::new()).unwrap();
        assert!(notifier
            .notify(&CancellationToken::new(), &event())
            .await
            .is_ok());
    }
}
