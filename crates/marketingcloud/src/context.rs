//! Host-owned SDK context
//!
//! Holds the configuration and the initialization state. The host creates one
//! context and hands it to the facade; there is no global.

use std::sync::RwLock;

use crate::config::SdkConfiguration;
use crate::models::InitializationState;

/// Configuration plus initialization state, shared via `Arc`
#[derive(Debug, Default)]
pub struct SdkContext {
    config: Option<SdkConfiguration>,
    state: RwLock<InitializationState>,
}

impl SdkContext {
    pub fn new(config: SdkConfiguration) -> Self {
        Self {
            config: Some(config),
            state: RwLock::new(InitializationState::Uninitialized),
        }
    }

    /// Context with no configuration; initialization will be rejected
    pub fn unconfigured() -> Self {
        Self::default()
    }

    pub fn config(&self) -> Option<&SdkConfiguration> {
        self.config.as_ref()
    }

    pub fn state(&self) -> InitializationState {
        match self.state.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// Overwrite the state, returning the previous one
    ///
    /// No compare-and-swap: concurrent handshakes race and the last writer wins.
    pub(crate) fn set_state(&self, next: InitializationState) -> InitializationState {
        match self.state.write() {
            Ok(mut guard) => std::mem::replace(&mut *guard, next),
            Err(poisoned) => std::mem::replace(&mut *poisoned.into_inner(), next),
        }
    }
}
