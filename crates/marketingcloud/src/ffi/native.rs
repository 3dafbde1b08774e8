//! Native provider bridge
//!
//! The vendor SDK lives in Swift or Kotlin. The host implements
//! [`NativeProvider`] over it and the facade drives it through
//! [`NativeBridge`], which adapts the synchronous callback interface to the
//! async [`PushProvider`] trait.
//!
//! Calls the vendor answers asynchronously (the handshake, inbox refresh)
//! take a [`NativeCompletion`] the host fires once the vendor reports back.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use log::{debug, warn};
use serde_json::Value;
use tokio::sync::oneshot;

use super::types::{
    FfiNavigationAction, FfiPendingNavigation, FfiPushConfig, FfiVendorLogLevel,
    NotificationUrlCallback,
};
use crate::init::{IntentResolver, NavigationAction, NotificationUrlHandler};
use crate::models::{MessageId, ProfileAttributes};
use crate::provider::{
    HandshakeStatus, NotificationPayload, PushConfig, PushProvider, VendorLogLevel,
};

/// The vendor SDK binding as implemented by the host
#[uniffi::export(callback_interface)]
pub trait NativeProvider: Send + Sync {
    /// Submit the configuration to the vendor SDK
    ///
    /// `completion` must be fired with the handshake verdict. Dropping it
    /// unfired counts as a failed handshake.
    fn configure(
        &self,
        config: FfiPushConfig,
        resolver: Arc<NotificationIntentResolver>,
        completion: Arc<NativeCompletion>,
    );

    fn request_device_registration(&self);

    fn set_device_token(&self, token: Vec<u8>);

    fn process_notification(&self, user_info: HashMap<String, String>);

    fn set_log_level(&self, level: FfiVendorLogLevel);

    fn device_token(&self) -> Option<String>;

    fn profile_id(&self) -> Option<String>;

    fn set_profile_id(&self, profile_id: String);

    fn set_profile_attributes(&self, attributes: HashMap<String, String>);

    fn is_push_enabled(&self) -> bool;

    fn set_push_enabled(&self, enabled: bool);

    /// Inbox records, each serialized as a JSON object
    fn messages_json(&self) -> Vec<String>;

    fn message_count(&self) -> u32;

    fn unread_message_count(&self) -> u32;

    fn mark_message_deleted(&self, message_id: String) -> bool;

    fn mark_message_read(&self, message_id: String) -> bool;

    fn mark_all_messages_deleted(&self) -> bool;

    fn mark_all_messages_read(&self) -> bool;

    /// Start an inbox refresh; fire `completion` with whether it ran
    fn refresh_messages(&self, completion: Arc<NativeCompletion>);
}

// ============================================================================
// Completion
// ============================================================================

/// One-shot verdict handed to the host for vendor callbacks
#[derive(uniffi::Object)]
pub struct NativeCompletion {
    tx: Mutex<Option<oneshot::Sender<bool>>>,
}

impl NativeCompletion {
    pub(crate) fn channel() -> (Arc<Self>, oneshot::Receiver<bool>) {
        let (tx, rx) = oneshot::channel();
        let completion = Arc::new(Self {
            tx: Mutex::new(Some(tx)),
        });
        (completion, rx)
    }
}

#[uniffi::export]
impl NativeCompletion {
    /// Report the verdict; only the first call counts
    pub fn complete(&self, success: bool) {
        let tx = match self.tx.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        match tx {
            Some(tx) => {
                // The waiting side may have gone away; nothing to report to then
                let _ = tx.send(success);
            }
            None => debug!("Completion fired more than once; keeping the first verdict"),
        }
    }
}

// ============================================================================
// Intent resolution
// ============================================================================

/// Resolver the vendor SDK calls when a notification is opened
#[derive(uniffi::Object)]
pub struct NotificationIntentResolver {
    inner: Arc<IntentResolver>,
}

impl NotificationIntentResolver {
    pub(crate) fn new(inner: Arc<IntentResolver>) -> Arc<Self> {
        Arc::new(Self { inner })
    }
}

#[uniffi::export]
impl NotificationIntentResolver {
    pub fn resolve(&self, url: Option<String>) -> FfiPendingNavigation {
        self.inner.resolve(url.as_deref()).into()
    }

    pub fn has_handler(&self) -> bool {
        self.inner.has_handler()
    }
}

/// Host URL callback seen as a facade [`NotificationUrlHandler`]
pub(crate) struct HostUrlHandler(pub Box<dyn NotificationUrlCallback>);

impl NotificationUrlHandler for HostUrlHandler {
    fn navigation_for(&self, url: Option<&str>) -> NavigationAction {
        let action: FfiNavigationAction = self.0.navigation_for(url.map(str::to_string));
        action.into()
    }
}

// ============================================================================
// Bridge
// ============================================================================

/// [`PushProvider`] over a host-implemented [`NativeProvider`]
pub struct NativeBridge {
    native: Box<dyn NativeProvider>,
}

impl NativeBridge {
    pub fn new(native: Box<dyn NativeProvider>) -> Self {
        Self { native }
    }
}

fn parse_record(json: &str) -> Value {
    serde_json::from_str(json).unwrap_or_else(|e| {
        debug!("Discarding unparsable inbox record: {}", e);
        Value::Null
    })
}

#[async_trait]
impl PushProvider for NativeBridge {
    async fn configure(&self, config: PushConfig) -> HandshakeStatus {
        let (completion, verdict) = NativeCompletion::channel();
        let resolver = NotificationIntentResolver::new(config.intent_resolver.clone());

        self.native
            .configure(FfiPushConfig::from(&config), resolver, completion);

        match verdict.await {
            Ok(true) => HandshakeStatus::Success,
            Ok(false) => HandshakeStatus::Failure,
            Err(_) => {
                warn!("Native provider dropped the handshake completion without reporting");
                HandshakeStatus::Failure
            }
        }
    }

    async fn request_device_registration(&self) {
        self.native.request_device_registration();
    }

    async fn set_device_token(&self, token: Vec<u8>) {
        self.native.set_device_token(token);
    }

    async fn process_notification(&self, payload: NotificationPayload) {
        self.native.process_notification(payload.0);
    }

    async fn set_log_level(&self, level: VendorLogLevel) {
        self.native.set_log_level(level.into());
    }

    async fn device_token(&self) -> Option<String> {
        self.native.device_token()
    }

    async fn profile_id(&self) -> Option<String> {
        self.native.profile_id()
    }

    async fn set_profile_id(&self, profile_id: String) {
        self.native.set_profile_id(profile_id);
    }

    async fn set_profile_attributes(&self, attributes: ProfileAttributes) {
        self.native.set_profile_attributes(attributes.into_inner());
    }

    async fn is_push_enabled(&self) -> bool {
        self.native.is_push_enabled()
    }

    async fn set_push_enabled(&self, enabled: bool) {
        self.native.set_push_enabled(enabled);
    }

    async fn messages(&self) -> Vec<Value> {
        self.native
            .messages_json()
            .iter()
            .map(|json| parse_record(json))
            .collect()
    }

    async fn message_count(&self) -> u32 {
        self.native.message_count()
    }

    async fn unread_message_count(&self) -> u32 {
        self.native.unread_message_count()
    }

    async fn mark_message_deleted(&self, id: &MessageId) -> bool {
        self.native.mark_message_deleted(id.as_str().to_string())
    }

    async fn mark_message_read(&self, id: &MessageId) -> bool {
        self.native.mark_message_read(id.as_str().to_string())
    }

    async fn mark_all_messages_deleted(&self) -> bool {
        self.native.mark_all_messages_deleted()
    }

    async fn mark_all_messages_read(&self) -> bool {
        self.native.mark_all_messages_read()
    }

    async fn refresh_messages(&self) -> bool {
        let (completion, done) = NativeCompletion::channel();
        self.native.refresh_messages(completion);
        done.await.unwrap_or(false)
    }
}
