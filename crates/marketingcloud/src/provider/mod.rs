//! Provider boundary
//!
//! This module provides:
//! - The `PushProvider` trait every vendor SDK binding implements
//! - The push configuration handed over during the handshake
//! - An in-memory provider for tests and host harnesses

mod memory;
mod timing;
mod traits;

pub use memory::InMemoryProvider;
pub use timing::{REFRESH_COOLDOWN_SECS, cooldown_elapsed};
pub use traits::PushProvider;

use std::collections::HashMap;
use std::sync::Arc;

use url::Url;

use crate::config::SdkConfiguration;
use crate::init::IntentResolver;

/// Terminal verdict of a provider handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeStatus {
    Success,
    Failure,
}

/// Vendor SDK log verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendorLogLevel {
    Debug,
    Warn,
}

impl VendorLogLevel {
    pub fn for_debug(enabled: bool) -> Self {
        if enabled { Self::Debug } else { Self::Warn }
    }
}

/// Push configuration submitted to the provider
#[derive(Debug, Clone)]
pub struct PushConfig {
    pub application_id: String,
    pub access_token: Option<String>,
    pub server_url: Option<Url>,
    pub sender_id: Option<String>,
    pub notification_icon: Option<String>,
    pub analytics_enabled: bool,
    pub inbox_enabled: bool,
    pub location_enabled: bool,
    pub application_controls_badging: bool,
    /// Called by the provider when a notification is opened
    pub intent_resolver: Arc<IntentResolver>,
}

impl PushConfig {
    /// Build from a configuration that already passed validation
    pub fn from_validated(config: &SdkConfiguration) -> Self {
        Self {
            application_id: config.application_id.clone(),
            access_token: config.access_token.clone(),
            server_url: config.server_url.clone(),
            sender_id: config.sender_id.clone(),
            notification_icon: config.notification_icon.clone(),
            analytics_enabled: config.analytics_enabled,
            inbox_enabled: config.inbox_enabled,
            location_enabled: config.location_enabled,
            application_controls_badging: config.application_controls_badging,
            intent_resolver: Arc::new(IntentResolver::new(config.url_handler.clone())),
        }
    }
}

/// User info of an arrived push notification
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationPayload(pub HashMap<String, String>);

impl NotificationPayload {
    /// Key carrying the inbox message id
    pub const MESSAGE_ID_KEY: &'static str = "_m";
    /// Key carrying the open-direct URL
    pub const URL_KEY: &'static str = "_od";
    pub const ALERT_KEY: &'static str = "alert";

    pub fn new(user_info: HashMap<String, String>) -> Self {
        Self(user_info)
    }

    pub fn message_id(&self) -> Option<&str> {
        self.get(Self::MESSAGE_ID_KEY)
    }

    pub fn url(&self) -> Option<&str> {
        self.get(Self::URL_KEY)
    }

    pub fn alert(&self) -> Option<&str> {
        self.get(Self::ALERT_KEY)
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for NotificationPayload {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_config_carries_flags() {
        let config = SdkConfiguration::builder("app")
            .sender_id("mid-1")
            .inbox_enabled(true)
            .application_controls_badging(true)
            .build();

        let push = PushConfig::from_validated(&config);
        assert_eq!(push.application_id, "app");
        assert_eq!(push.sender_id.as_deref(), Some("mid-1"));
        assert!(push.inbox_enabled);
        assert!(push.application_controls_badging);
        assert!(!push.intent_resolver.has_handler());
    }

    #[test]
    fn test_payload_accessors_ignore_empty_values() {
        let payload: NotificationPayload = [("_m", "m9"), ("_od", ""), ("alert", "Sale")]
            .into_iter()
            .collect();
        assert_eq!(payload.message_id(), Some("m9"));
        assert_eq!(payload.url(), None);
        assert_eq!(payload.alert(), Some("Sale"));
    }
}
