//! Provider initialization
//!
//! This module provides:
//! - The handshake coordinator that owns `InitializationState` transitions
//! - Notification intent resolution handed to the provider during the handshake

mod coordinator;
mod intent;

pub use coordinator::InitCoordinator;
pub use intent::{
    IntentResolver, NavigationAction, NotificationUrlHandler, PendingNavigation, open_url_or_launch,
};
