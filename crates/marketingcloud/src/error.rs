//! Errors surfaced by the facade
//!
//! Only conditions that stop an operation from being attempted at all are
//! errors. A provider that was asked and declined answers with `false` or an
//! empty value instead.

/// Facade error with a stable, platform-independent code
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FacadeError {
    /// Configuration missing or incomplete; the provider was never called
    #[error("SDK configuration is invalid: {message}")]
    ConfigInvalid { message: String },

    /// No native provider is linked into the host
    #[error("The native Marketing Cloud provider is not linked")]
    LinkageMissing,
}

impl FacadeError {
    pub const CONFIG_INVALID: &'static str = "E_SDK_CONFIG_INVALID";
    pub const LINKAGE_MISSING: &'static str = "E_LINKAGE_MISSING";

    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            message: message.into(),
        }
    }

    /// Stable code callers can branch on
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigInvalid { .. } => Self::CONFIG_INVALID,
            Self::LinkageMissing => Self::LINKAGE_MISSING,
        }
    }
}

pub type Result<T, E = FacadeError> = std::result::Result<T, E>;
