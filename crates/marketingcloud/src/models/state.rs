//! Provider initialization lifecycle

use serde::{Deserialize, Serialize};

/// Where the provider handshake currently stands
///
/// `Uninitialized` → `Configuring` → `Ready` | `Failed`. A later
/// initialization attempt moves `Ready`/`Failed` back to `Configuring`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InitializationState {
    #[default]
    Uninitialized,
    Configuring,
    Ready,
    Failed,
}

impl InitializationState {
    pub fn is_ready(self) -> bool {
        self == Self::Ready
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Configuring => "configuring",
            Self::Ready => "ready",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for InitializationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
