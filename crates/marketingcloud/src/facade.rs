//! The facade applications talk to
//!
//! Composes the validator, the handshake coordinator, the identity manager
//! and the inbox normalizer behind one async surface that looks the same on
//! every platform.
//!
//! Errors are reserved for calls that could not be attempted
//! ([`FacadeError::ConfigInvalid`], [`FacadeError::LinkageMissing`]).
//! A provider that declines answers `false` or an empty value.
//!
//! Inbox and identity calls made before the handshake succeeds are still
//! forwarded to the provider; a warning is logged.

use std::sync::Arc;

use log::warn;

use crate::context::SdkContext;
use crate::dispatch::{Command, CommandSender};
use crate::error::{FacadeError, Result};
use crate::identity::IdentityManager;
use crate::inbox::normalize_messages;
use crate::init::InitCoordinator;
use crate::models::{InboxMessage, InitializationState, MessageId, ProfileAttributes};
use crate::provider::{NotificationPayload, PushProvider, VendorLogLevel};

/// Entry point for push messaging, identity and inbox operations
pub struct MarketingCloud {
    context: Arc<SdkContext>,
    link: Option<Linked>,
}

struct Linked {
    provider: Arc<dyn PushProvider>,
    commands: CommandSender,
    coordinator: InitCoordinator,
    identity: IdentityManager,
}

impl MarketingCloud {
    /// Create a facade over a linked provider
    ///
    /// Must be called inside a tokio runtime: the command worker is spawned here.
    pub fn new(context: Arc<SdkContext>, provider: Arc<dyn PushProvider>) -> Self {
        let commands = CommandSender::spawn(provider.clone());
        let link = Linked {
            coordinator: InitCoordinator::new(context.clone(), provider.clone(), commands.clone()),
            identity: IdentityManager::new(provider.clone(), commands.clone()),
            provider,
            commands,
        };

        Self {
            context,
            link: Some(link),
        }
    }

    /// Create a facade with no native provider; every call fails with `LinkageMissing`
    pub fn unlinked(context: Arc<SdkContext>) -> Self {
        Self { context, link: None }
    }

    pub fn context(&self) -> &Arc<SdkContext> {
        &self.context
    }

    pub fn state(&self) -> InitializationState {
        self.context.state()
    }

    fn linked(&self) -> Result<&Linked> {
        self.link.as_ref().ok_or(FacadeError::LinkageMissing)
    }

    /// Linked provider for an operation that expects readiness
    fn linked_for(&self, operation: &str) -> Result<&Linked> {
        let link = self.linked()?;
        let state = self.context.state();
        if !state.is_ready() {
            warn!("{} called while the provider is {}; forwarding anyway", operation, state);
        }
        Ok(link)
    }

    // ========================================================================
    // Setup
    // ========================================================================

    /// Run the provider handshake with the context's configuration
    pub async fn initialize_sdk(&self) -> Result<bool> {
        self.linked()?.coordinator.initialize().await
    }

    /// Switch the vendor SDK between debug and warning verbosity
    pub fn set_debug_logging_enabled(&self, enabled: bool) -> Result<()> {
        self.linked()?
            .commands
            .send(Command::SetLogLevel(VendorLogLevel::for_debug(enabled)));
        Ok(())
    }

    /// Wait until queued fire-and-forget calls were handed to the provider
    pub async fn flush(&self) -> Result<()> {
        self.linked()?.commands.flush().await;
        Ok(())
    }

    // ========================================================================
    // Push Messaging
    // ========================================================================

    pub async fn get_device_token(&self) -> Result<Option<String>> {
        Ok(self.linked()?.identity.device_token().await)
    }

    pub async fn get_profile_id(&self) -> Result<Option<String>> {
        Ok(self.linked_for("get_profile_id")?.identity.profile_id().await)
    }

    pub fn set_profile_id(&self, profile_id: impl Into<String>) -> Result<()> {
        self.linked_for("set_profile_id")?
            .identity
            .set_profile_id(profile_id);
        Ok(())
    }

    pub fn set_profile_attributes(&self, attributes: ProfileAttributes) -> Result<()> {
        self.linked_for("set_profile_attributes")?
            .identity
            .set_profile_attributes(attributes);
        Ok(())
    }

    pub async fn is_push_enabled(&self) -> Result<bool> {
        Ok(self.linked_for("is_push_enabled")?.identity.is_push_enabled().await)
    }

    pub fn set_push_enabled(&self, enabled: bool) -> Result<()> {
        self.linked_for("set_push_enabled")?
            .identity
            .set_push_enabled(enabled);
        Ok(())
    }

    // ========================================================================
    // Inbox
    // ========================================================================

    /// All inbox messages, normalized
    ///
    /// Dates the provider did not supply are set to the time of this call.
    pub async fn get_all_messages(&self) -> Result<Vec<InboxMessage>> {
        let records = self.linked_for("get_all_messages")?.provider.messages().await;
        Ok(normalize_messages(&records))
    }

    pub async fn get_all_messages_count(&self) -> Result<u32> {
        Ok(self
            .linked_for("get_all_messages_count")?
            .provider
            .message_count()
            .await)
    }

    pub async fn get_unread_messages_count(&self) -> Result<u32> {
        Ok(self
            .linked_for("get_unread_messages_count")?
            .provider
            .unread_message_count()
            .await)
    }

    pub async fn mark_message_deleted(&self, id: &MessageId) -> Result<bool> {
        Ok(self
            .linked_for("mark_message_deleted")?
            .provider
            .mark_message_deleted(id)
            .await)
    }

    pub async fn mark_message_read(&self, id: &MessageId) -> Result<bool> {
        Ok(self
            .linked_for("mark_message_read")?
            .provider
            .mark_message_read(id)
            .await)
    }

    pub async fn mark_all_messages_deleted(&self) -> Result<bool> {
        Ok(self
            .linked_for("mark_all_messages_deleted")?
            .provider
            .mark_all_messages_deleted()
            .await)
    }

    pub async fn mark_all_messages_read(&self) -> Result<bool> {
        Ok(self
            .linked_for("mark_all_messages_read")?
            .provider
            .mark_all_messages_read()
            .await)
    }

    /// Ask the provider to re-sync the inbox
    ///
    /// The provider throttles this to once every 60 seconds and answers
    /// `false` when throttled.
    pub async fn refresh_messages(&self) -> Result<bool> {
        Ok(self
            .linked_for("refresh_messages")?
            .provider
            .refresh_messages()
            .await)
    }

    // ========================================================================
    // Native events
    // ========================================================================

    /// Hand the platform device token to the provider
    pub async fn set_device_token(&self, token: Vec<u8>) -> Result<()> {
        self.linked()?.provider.set_device_token(token).await;
        Ok(())
    }

    /// Forward an arrived notification; completes once the provider processed it
    pub async fn process_notification(&self, payload: NotificationPayload) -> Result<()> {
        self.linked()?.provider.process_notification(payload).await;
        Ok(())
    }
}
