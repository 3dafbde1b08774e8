//! Inbox record normalization
//!
//! Converts the records the native side hands over into [`InboxMessage`].
//! The two platform bridges disagree on representation:
//! - flags arrive as booleans or as `0`/`1` integers
//! - dates arrive as epoch milliseconds (`sendDateEpoch`), as serialized
//!   native dates (`sendDateUtc`, RFC 3339), or not at all
//!
//! Decoding is explicit and per field. A record that is not an object or has
//! no usable id is dropped; every other oddity falls back to a field default.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Days, TimeZone, Utc};
use log::debug;
use serde_json::{Map, Value};

use crate::models::{InboxMessage, MessageId};

/// A native record after decoding, before read-time defaults are applied
#[derive(Debug, Clone, PartialEq)]
pub struct RawMessage {
    pub id: MessageId,
    pub subject: String,
    pub url: Option<String>,
    pub read: bool,
    pub deleted: bool,
    pub send_date: Option<DateTime<Utc>>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl RawMessage {
    /// Apply read-time defaults and the date-collision rule
    ///
    /// Missing dates become `now`. If the end date lands on the same instant
    /// as the start date, it moves one calendar day later so the message has
    /// a non-empty visibility window.
    pub fn into_message(self, now: DateTime<Utc>) -> InboxMessage {
        let send_date_utc = self.send_date.unwrap_or(now);
        let start_date_utc = self.start_date.unwrap_or(now);
        let mut end_date_utc = self.end_date.unwrap_or(now);

        if end_date_utc == start_date_utc {
            end_date_utc = start_date_utc
                .checked_add_days(Days::new(1))
                .unwrap_or(end_date_utc);
        }

        InboxMessage {
            id: self.id,
            subject: self.subject,
            url: self.url,
            read: self.read,
            deleted: self.deleted,
            send_date_utc,
            start_date_utc,
            end_date_utc,
        }
    }
}

/// Normalize a batch of native records, using the current time for missing dates
///
/// Two calls over the same input can differ when dates are missing, since
/// each call reads the clock once.
pub fn normalize_messages(records: &[Value]) -> Vec<InboxMessage> {
    normalize_messages_at(records, Utc::now())
}

/// Normalize a batch with an explicit read time
pub fn normalize_messages_at(records: &[Value], now: DateTime<Utc>) -> Vec<InboxMessage> {
    records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| match decode_record(record) {
            Ok(raw) => Some(raw.into_message(now)),
            Err(e) => {
                debug!("Dropping inbox record {}: {:#}", index, e);
                None
            }
        })
        .collect()
}

/// Decode a single native record
pub fn decode_record(record: &Value) -> Result<RawMessage> {
    let obj = record.as_object().context("inbox record is not an object")?;
    let id = decode_id(obj.get("id")).context("inbox record has no usable id")?;

    Ok(RawMessage {
        id,
        subject: obj
            .get("subject")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        url: obj.get("url").and_then(Value::as_str).map(str::to_string),
        read: coerce_flag(obj.get("read")),
        deleted: coerce_flag(obj.get("deleted")),
        send_date: date_field(obj, "sendDateEpoch", "sendDateUtc"),
        start_date: date_field(obj, "startDateEpoch", "startDateUtc"),
        end_date: date_field(obj, "endDateEpoch", "endDateUtc"),
    })
}

/// Boolean as-is, integer `1` as `true`, anything else `false`
pub fn coerce_flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_i64() == Some(1) || n.as_u64() == Some(1),
        _ => false,
    }
}

/// Decode a date from epoch milliseconds or an RFC 3339 string
///
/// `null`, `0`, non-finite numbers and unparsable strings all count as absent.
pub fn coerce_instant(value: Option<&Value>) -> Option<DateTime<Utc>> {
    match value? {
        Value::Number(n) => {
            let millis = match n.as_i64() {
                Some(ms) => ms,
                None => n.as_f64().filter(|f| f.is_finite())?.trunc() as i64,
            };
            if millis == 0 {
                return None;
            }
            Utc.timestamp_millis_opt(millis).single()
        }
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|d| d.with_timezone(&Utc)),
        _ => None,
    }
}

fn decode_id(value: Option<&Value>) -> Result<MessageId> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Ok(MessageId::new(s.as_str())),
        Some(Value::Number(n)) => Ok(MessageId::new(n.to_string())),
        Some(other) => bail!("unexpected id value {other}"),
        None => bail!("id is missing"),
    }
}

/// Epoch field first, native date field as fallback
fn date_field(
    obj: &Map<String, Value>,
    epoch_key: &str,
    native_key: &str,
) -> Option<DateTime<Utc>> {
    coerce_instant(obj.get(epoch_key)).or_else(|| coerce_instant(obj.get(native_key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use serde_json::json;

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).unwrap()
    }

    #[test]
    fn test_reference_record() {
        let records = vec![json!({
            "id": "m1",
            "subject": "Hi",
            "url": "https://x",
            "read": 1,
            "deleted": false,
            "sendDateEpoch": 1000,
            "startDateEpoch": 2000,
            "endDateEpoch": 2000
        })];

        let messages = normalize_messages(&records);
        assert_eq!(messages.len(), 1);

        let msg = &messages[0];
        assert_eq!(msg.id.as_str(), "m1");
        assert_eq!(msg.subject, "Hi");
        assert_eq!(msg.url.as_deref(), Some("https://x"));
        assert!(msg.read);
        assert!(!msg.deleted);
        assert_eq!(msg.send_date_utc.to_rfc3339(), "1970-01-01T00:00:01+00:00");
        assert_eq!(msg.start_date_utc, at(2_000));
        assert_eq!(msg.end_date_utc.to_rfc3339(), "1970-01-02T00:00:02+00:00");
    }

    #[test]
    fn test_flag_coercion() {
        assert!(coerce_flag(Some(&json!(true))));
        assert!(coerce_flag(Some(&json!(1))));
        assert!(!coerce_flag(Some(&json!(false))));
        assert!(!coerce_flag(Some(&json!(0))));
        assert!(!coerce_flag(Some(&json!(2))));
        assert!(!coerce_flag(Some(&json!(1.5))));
        assert!(!coerce_flag(Some(&json!("true"))));
        assert!(!coerce_flag(Some(&Value::Null)));
        assert!(!coerce_flag(None));
    }

    #[test]
    fn test_missing_dates_use_read_time() {
        let now = at(1_700_000_000_123);
        let messages = normalize_messages_at(&[json!({ "id": "m2", "sendDateEpoch": null })], now);

        let msg = &messages[0];
        assert_eq!(msg.send_date_utc, now);
        assert_eq!(msg.start_date_utc, now);
        // start and end both defaulted to `now`, so the collision rule applies
        assert_eq!(msg.end_date_utc, now + chrono::Duration::days(1));
    }

    #[test]
    fn test_zero_epoch_counts_as_absent() {
        let now = at(5_000_000);
        let messages = normalize_messages_at(&[json!({ "id": "m3", "sendDateEpoch": 0 })], now);
        assert_eq!(messages[0].send_date_utc, now);
    }

    #[test]
    fn test_collision_keeps_time_of_day() {
        let start = DateTime::parse_from_rfc3339("2024-03-09T17:45:30.250Z")
            .unwrap()
            .with_timezone(&Utc);
        let record = json!({
            "id": "m4",
            "startDateEpoch": start.timestamp_millis(),
            "endDateEpoch": start.timestamp_millis()
        });

        let msg = &normalize_messages(&[record])[0];
        assert_eq!(msg.end_date_utc.date_naive(), start.date_naive().succ_opt().unwrap());
        assert_eq!(msg.end_date_utc.time(), start.time());
        assert_eq!(msg.end_date_utc.nanosecond(), start.nanosecond());
    }

    #[test]
    fn test_distinct_dates_untouched() {
        let record = json!({ "id": "m5", "startDateEpoch": 2000, "endDateEpoch": 9000 });
        let msg = &normalize_messages(&[record])[0];
        assert_eq!(msg.end_date_utc, at(9_000));
    }

    #[test]
    fn test_native_date_fields() {
        let record = json!({
            "id": "m6",
            "read": 0,
            "deleted": 1,
            "sendDateUtc": "2024-01-01T10:00:00Z",
            "startDateUtc": "2024-01-01T10:00:00+02:00",
            "endDateEpoch": 1_704_103_200_000_f64
        });

        let msg = &normalize_messages(&[record])[0];
        assert!(!msg.read);
        assert!(msg.deleted);
        assert_eq!(msg.send_date_utc.to_rfc3339(), "2024-01-01T10:00:00+00:00");
        assert_eq!(msg.start_date_utc.to_rfc3339(), "2024-01-01T08:00:00+00:00");
        assert_eq!(msg.end_date_utc, at(1_704_103_200_000));
    }

    #[test]
    fn test_fractional_epoch_truncates() {
        assert_eq!(coerce_instant(Some(&json!(1000.9))), Some(at(1_000)));
        assert_eq!(coerce_instant(Some(&json!("yesterday"))), None);
        assert_eq!(coerce_instant(Some(&json!(true))), None);
    }

    #[test]
    fn test_malformed_records_are_dropped() {
        let records = vec![
            json!("not a record"),
            json!(42),
            json!({ "subject": "no id" }),
            json!({ "id": null }),
            json!({ "id": "" }),
            json!({ "id": ["m"] }),
            json!({ "id": "ok" }),
            json!({ "id": 77, "subject": 5 }),
        ];

        let messages = normalize_messages(&records);
        assert!(messages.len() <= records.len());
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].id.as_str(), "ok");
        assert_eq!(messages[1].id.as_str(), "77");
        assert_eq!(messages[1].subject, "");
    }

    #[test]
    fn test_empty_batch() {
        assert!(normalize_messages(&[]).is_empty());
    }
}
