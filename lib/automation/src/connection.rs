//! Connection state of the automation engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the editor knows about its link to the automation engine.
///
/// Only the integration layer that owns the real connection writes this;
/// the editor reads it to decide whether runs can be requested.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationConnection {
    pub is_connected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AutomationConnection {
    /// A healthy connection that was just verified.
    #[must_use]
    pub fn connected(url: impl Into<String>) -> Self {
        Self {
            is_connected: true,
            connection_url: Some(url.into()),
            last_sync: Some(Utc::now()),
            error: None,
        }
    }

    /// A connection attempt that failed.
    #[must_use]
    pub fn failed(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            is_connected: false,
            connection_url: Some(url.into()),
            last_sync: None,
            error: Some(error.into()),
        }
    }

    /// Short label for the status badge.
    #[must_use]
    pub fn status_label(&self) -> &'static str {
        match (self.is_connected, self.error.is_some()) {
            (true, _) => "connected",
            (false, true) => "error",
            (false, false) => "disconnected",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_disconnected() {
        let state = AutomationConnection::default();
        assert!(!state.is_connected);
        assert_eq!(state.status_label(), "disconnected");
    }

    #[test]
    fn labels() {
        assert_eq!(
            AutomationConnection::connected("http://engine").status_label(),
            "connected"
        );
        let failed = AutomationConnection::failed("http://engine", "refused");
        assert_eq!(failed.status_label(), "error");
        assert_eq!(failed.error.as_deref(), Some("refused"));
    }
}
