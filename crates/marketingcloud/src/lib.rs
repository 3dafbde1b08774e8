//! Marketing Cloud crate - push messaging, identity and inbox facade
//!
//! This crate hides the platform-specific Marketing Cloud SDK bindings
//! behind one contract:
//! - SDK configuration, validation and the provider handshake
//! - Device token, profile id and profile attribute pass-throughs
//! - Inbox reads normalized into one canonical message shape
//! - Inbox mutations (read, deleted, refresh)
//! - UniFFI exports so Swift/Kotlin hosts link the same logic
//!
//! The vendor SDK itself sits behind the [`PushProvider`] trait.

uniffi::setup_scaffolding!();

pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod facade;
pub mod ffi;
pub mod identity;
pub mod inbox;
pub mod init;
pub mod models;
pub mod provider;

pub use config::{SdkConfiguration, SdkConfigurationBuilder, validate};
pub use context::SdkContext;
pub use error::FacadeError;
pub use facade::MarketingCloud;
pub use inbox::{normalize_messages, normalize_messages_at};
pub use init::{NavigationAction, NotificationUrlHandler, PendingNavigation};
pub use models::{InboxMessage, InitializationState, MessageId, ProfileAttributes};
pub use provider::{
    HandshakeStatus, InMemoryProvider, NotificationPayload, PushConfig, PushProvider,
    VendorLogLevel,
};
