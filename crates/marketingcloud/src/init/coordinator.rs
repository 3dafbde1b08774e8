//! Provider initialization handshake

use std::sync::Arc;

use log::{info, warn};

use crate::config::validate;
use crate::context::SdkContext;
use crate::dispatch::{Command, CommandSender};
use crate::error::Result;
use crate::models::InitializationState;
use crate::provider::{HandshakeStatus, PushConfig, PushProvider};

/// Drives the handshake with the provider and records its verdict
///
/// Calls are not serialized. Every call moves the state to `Configuring`, and
/// whichever handshake reports last decides between `Ready` and `Failed`.
pub struct InitCoordinator {
    context: Arc<SdkContext>,
    provider: Arc<dyn PushProvider>,
    commands: CommandSender,
}

impl InitCoordinator {
    pub fn new(
        context: Arc<SdkContext>,
        provider: Arc<dyn PushProvider>,
        commands: CommandSender,
    ) -> Self {
        Self {
            context,
            provider,
            commands,
        }
    }

    /// Validate, hand the push configuration over and wait for the verdict
    ///
    /// Returns `Err(ConfigInvalid)` without touching the provider or the state
    /// when validation fails. A provider that declines yields `Ok(false)`.
    pub async fn initialize(&self) -> Result<bool> {
        let config = validate(self.context.config())?;
        let push_config = PushConfig::from_validated(config);

        let previous = self.context.set_state(InitializationState::Configuring);
        if previous == InitializationState::Configuring {
            warn!("Starting a handshake while another is still in flight");
        }
        info!("Configuring provider for application {}", push_config.application_id);

        match self.provider.configure(push_config).await {
            HandshakeStatus::Success => {
                self.context.set_state(InitializationState::Ready);
                self.commands.send(Command::RequestDeviceRegistration);
                info!("Provider handshake succeeded");
                Ok(true)
            }
            HandshakeStatus::Failure => {
                self.context.set_state(InitializationState::Failed);
                warn!("Provider handshake failed");
                Ok(false)
            }
        }
    }
}
