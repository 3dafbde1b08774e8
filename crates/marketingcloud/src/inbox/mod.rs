//! Inbox normalization
//!
//! Turns native inbox records into canonical [`crate::models::InboxMessage`]
//! values. Nothing is cached; each read normalizes a fresh provider snapshot.

mod normalize;

pub use normalize::{
    RawMessage, coerce_flag, coerce_instant, decode_record, normalize_messages,
    normalize_messages_at,
};
