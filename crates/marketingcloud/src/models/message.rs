//! Canonical inbox message model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of an inbox message as assigned by the provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for MessageId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for MessageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One inbox record in its platform-independent shape
///
/// Produced by [`crate::inbox::normalize_messages`] on every read; it is a
/// snapshot of the provider's state and nothing keeps it up to date.
///
/// Date fields that the provider left unset hold the time of the read that
/// produced this value, not a real send/start/end date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboxMessage {
    pub id: MessageId,
    pub subject: String,
    /// Deep-link target, if the message carries one
    pub url: Option<String>,
    pub read: bool,
    pub deleted: bool,
    pub send_date_utc: DateTime<Utc>,
    pub start_date_utc: DateTime<Utc>,
    pub end_date_utc: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn message(start_ms: i64, end_ms: i64) -> InboxMessage {
        InboxMessage {
            id: MessageId::new("m1"),
            subject: "Hi".to_string(),
            url: None,
            read: false,
            deleted: false,
            send_date_utc: Utc.timestamp_millis_opt(0).unwrap(),
            start_date_utc: Utc.timestamp_millis_opt(start_ms).unwrap(),
            end_date_utc: Utc.timestamp_millis_opt(end_ms).unwrap(),
        }
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(message(0, 1)).unwrap();
        assert!(json.get("sendDateUtc").is_some());
        assert!(json.get("endDateUtc").is_some());
        assert_eq!(json["id"], "m1");
    }
}
