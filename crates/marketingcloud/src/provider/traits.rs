//! Provider trait definition

use async_trait::async_trait;
use serde_json::Value;

use super::{HandshakeStatus, NotificationPayload, PushConfig, VendorLogLevel};
use crate::models::{MessageId, ProfileAttributes};

/// The vendor push/inbox SDK as seen from the facade
///
/// Every method is a pass-through to the vendor. Implementations own
/// durability, retries and throttling; the facade adds none of those.
/// Business failures (push disabled, unknown message id) are reported as
/// `false`/`None`, never as errors.
#[async_trait]
pub trait PushProvider: Send + Sync {
    /// Submit the push configuration and wait for the handshake verdict
    async fn configure(&self, config: PushConfig) -> HandshakeStatus;

    /// Ask the platform for a device token (APNs/FCM registration)
    async fn request_device_registration(&self);

    /// Hand a platform device token to the provider
    async fn set_device_token(&self, token: Vec<u8>);

    /// Feed an arrived notification into the provider's processing path
    async fn process_notification(&self, payload: NotificationPayload);

    async fn set_log_level(&self, level: VendorLogLevel);

    // === Identity ===

    async fn device_token(&self) -> Option<String>;

    async fn profile_id(&self) -> Option<String>;

    async fn set_profile_id(&self, profile_id: String);

    async fn set_profile_attributes(&self, attributes: ProfileAttributes);

    async fn is_push_enabled(&self) -> bool;

    async fn set_push_enabled(&self, enabled: bool);

    // === Inbox ===

    /// Raw inbox records in whatever shape the native side produces
    async fn messages(&self) -> Vec<Value>;

    async fn message_count(&self) -> u32;

    async fn unread_message_count(&self) -> u32;

    async fn mark_message_deleted(&self, id: &MessageId) -> bool;

    async fn mark_message_read(&self, id: &MessageId) -> bool;

    async fn mark_all_messages_deleted(&self) -> bool;

    async fn mark_all_messages_read(&self) -> bool;

    /// Re-sync the inbox with the server; `false` when throttled or failed
    async fn refresh_messages(&self) -> bool;
}
