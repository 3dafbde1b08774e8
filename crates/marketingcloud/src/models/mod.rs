//! Domain models shared by the facade and the provider boundary

mod attributes;
mod message;
mod state;

pub use attributes::ProfileAttributes;
pub use message::{InboxMessage, MessageId};
pub use state::InitializationState;
