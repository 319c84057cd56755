//! Participant and client snapshots

use std::fmt;

use serde::{Deserialize, Serialize};

/// Snapshot of a participant at event time
///
/// Only `sid` is interpreted: it keys the worker registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantInfo {
    /// Server-assigned participant id
    pub sid: String,

    /// Identity from the access token
    pub identity: String,

    /// Display name
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Application-defined metadata
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub metadata: String,

    /// Join time in unix seconds
    #[serde(default)]
    pub joined_at: i64,
}

impl ParticipantInfo {
    /// Create a participant snapshot
    pub fn new(sid: impl Into<String>, identity: impl Into<String>) -> Self {
        Self {
            sid: sid.into(),
            identity: identity.into(),
            ..Default::default()
        }
    }
}

/// Client SDK reported on connect
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SdkType {
    #[default]
    Unknown,
    Js,
    Swift,
    Android,
    Flutter,
    Go,
    Unity,
    ReactNative,
    Rust,
}

impl fmt::Display for SdkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SdkType::Unknown => "UNKNOWN",
            SdkType::Js => "JS",
            SdkType::Swift => "SWIFT",
            SdkType::Android => "ANDROID",
            SdkType::Flutter => "FLUTTER",
            SdkType::Go => "GO",
            SdkType::Unity => "UNITY",
            SdkType::ReactNative => "REACT_NATIVE",
            SdkType::Rust => "RUST",
        };
        f.write_str(s)
    }
}

/// Client details reported on connect
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub sdk: SdkType,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub os: String,
}

impl ClientInfo {
    pub fn new(sdk: SdkType) -> Self {
        Self {
            sdk,
            ..Default::default()
        }
    }
}
