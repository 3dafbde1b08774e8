//! Device and profile identity
//!
//! Pass-throughs to the provider. Reads wait for the provider's current
//! value; writes are queued on the command channel and return immediately.
//! Nothing is cached locally.

use std::sync::Arc;

use crate::dispatch::{Command, CommandSender};
use crate::models::ProfileAttributes;
use crate::provider::PushProvider;

pub struct IdentityManager {
    provider: Arc<dyn PushProvider>,
    commands: CommandSender,
}

impl IdentityManager {
    pub fn new(provider: Arc<dyn PushProvider>, commands: CommandSender) -> Self {
        Self { provider, commands }
    }

    /// Token currently held by the provider, `None` until one is assigned
    pub async fn device_token(&self) -> Option<String> {
        self.provider.device_token().await
    }

    pub async fn profile_id(&self) -> Option<String> {
        self.provider.profile_id().await
    }

    pub fn set_profile_id(&self, profile_id: impl Into<String>) {
        self.commands.send(Command::SetProfileId(profile_id.into()));
    }

    pub fn set_profile_attributes(&self, attributes: ProfileAttributes) {
        self.commands.send(Command::SetProfileAttributes(attributes));
    }

    pub async fn is_push_enabled(&self) -> bool {
        self.provider.is_push_enabled().await
    }

    pub fn set_push_enabled(&self, enabled: bool) {
        self.commands.send(Command::SetPushEnabled(enabled));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::InMemoryProvider;
    use serde_json::json;

    #[tokio::test]
    async fn test_reads_pass_through() {
        let provider = Arc::new(InMemoryProvider::new().with_device_token("abc"));
        let commands = CommandSender::spawn(provider.clone());
        let identity = IdentityManager::new(provider, commands);

        assert_eq!(identity.device_token().await.as_deref(), Some("abc"));
        assert_eq!(identity.profile_id().await, None);
        assert!(identity.is_push_enabled().await);
    }

    #[tokio::test]
    async fn test_attribute_writes_are_stringified() {
        let provider = Arc::new(InMemoryProvider::new());
        let commands = CommandSender::spawn(provider.clone());
        let identity = IdentityManager::new(provider.clone(), commands.clone());

        identity.set_profile_attributes(ProfileAttributes::from_values([
            ("visits", json!(12)),
            ("member", json!(false)),
        ]));
        commands.flush().await;

        let stored = provider.profile_attributes();
        assert_eq!(stored.get("visits"), Some("12"));
        assert_eq!(stored.get("member"), Some("false"));
    }
}
