//! Fire-and-forget command channel
//!
//! Calls that do not wait for the provider (`set_profile_id`,
//! `set_profile_attributes`, `set_push_enabled`, debug logging, device
//! registration) are queued here and applied by a single worker task.
//!
//! Delivery is at-most-once with no acknowledgment: a command is dropped if
//! the worker is gone, and nothing reports whether the provider (or its
//! server) accepted it.

use std::sync::Arc;

use log::{debug, warn};
use tokio::sync::{mpsc, oneshot};

use crate::models::ProfileAttributes;
use crate::provider::{PushProvider, VendorLogLevel};

/// A provider call nobody waits for
#[derive(Debug)]
pub enum Command {
    SetLogLevel(VendorLogLevel),
    SetProfileId(String),
    SetProfileAttributes(ProfileAttributes),
    SetPushEnabled(bool),
    RequestDeviceRegistration,
    /// Completes once every earlier command was handed to the provider
    Flush(oneshot::Sender<()>),
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::SetLogLevel(_) => "set_log_level",
            Self::SetProfileId(_) => "set_profile_id",
            Self::SetProfileAttributes(_) => "set_profile_attributes",
            Self::SetPushEnabled(_) => "set_push_enabled",
            Self::RequestDeviceRegistration => "request_device_registration",
            Self::Flush(_) => "flush",
        }
    }
}

/// Sending half of the command channel
#[derive(Clone)]
pub struct CommandSender {
    tx: mpsc::UnboundedSender<Command>,
}

impl CommandSender {
    /// Spawn the worker on the current tokio runtime
    ///
    /// Panics outside a runtime context, like `tokio::spawn`.
    pub fn spawn(provider: Arc<dyn PushProvider>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_worker(provider, rx));
        Self { tx }
    }

    /// Queue a command; returns immediately
    pub fn send(&self, command: Command) {
        let name = command.name();
        if self.tx.send(command).is_err() {
            warn!("Dropping {} command: provider worker has stopped", name);
        }
    }

    /// Wait until all previously queued commands reached the provider
    ///
    /// This says nothing about server acceptance.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        self.send(Command::Flush(done_tx));
        let _ = done_rx.await;
    }
}

async fn run_worker(provider: Arc<dyn PushProvider>, mut rx: mpsc::UnboundedReceiver<Command>) {
    while let Some(command) = rx.recv().await {
        debug!("Applying {} command", command.name());
        match command {
            Command::SetLogLevel(level) => provider.set_log_level(level).await,
            Command::SetProfileId(id) => provider.set_profile_id(id).await,
            Command::SetProfileAttributes(attributes) => {
                provider.set_profile_attributes(attributes).await
            }
            Command::SetPushEnabled(enabled) => provider.set_push_enabled(enabled).await,
            Command::RequestDeviceRegistration => provider.request_device_registration().await,
            Command::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!("Provider command worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::InMemoryProvider;

    #[tokio::test]
    async fn test_commands_reach_provider() {
        let provider = Arc::new(InMemoryProvider::new());
        let sender = CommandSender::spawn(provider.clone());

        sender.send(Command::SetProfileId("user-1".to_string()));
        sender.send(Command::SetPushEnabled(false));
        sender.send(Command::SetLogLevel(VendorLogLevel::Debug));
        sender.flush().await;

        assert_eq!(provider.profile_id().await.as_deref(), Some("user-1"));
        assert!(!provider.is_push_enabled().await);
        assert_eq!(provider.log_level(), VendorLogLevel::Debug);
    }

    #[tokio::test]
    async fn test_send_returns_before_provider_runs() {
        let provider = Arc::new(InMemoryProvider::new());
        let sender = CommandSender::spawn(provider.clone());

        sender.send(Command::RequestDeviceRegistration);
        // current-thread runtime: the worker has not been polled yet
        assert_eq!(provider.registration_requests(), 0);

        sender.flush().await;
        assert_eq!(provider.registration_requests(), 1);
    }
}
