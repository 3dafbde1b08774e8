//! FFI-friendly type wrappers for UniFFI export
//!
//! These types convert internal Rust types to FFI-compatible versions:
//! - `DateTime<Utc>` → `i64` (milliseconds since epoch)
//! - `Url` → `String`
//! - `MessageId` → `String`

use url::Url;

use crate::config::SdkConfiguration;
use crate::error::FacadeError;
use crate::init::{NavigationAction, PendingNavigation};
use crate::models::{InboxMessage, InitializationState};
use crate::provider::{PushConfig, VendorLogLevel};

// ============================================================================
// Error Types
// ============================================================================

/// FFI-friendly error type carrying the stable error code
#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum MarketingCloudError {
    #[error("{code}: {message}")]
    ConfigInvalid { code: String, message: String },

    #[error("{code}: the native Marketing Cloud provider is not linked")]
    LinkageMissing { code: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<FacadeError> for MarketingCloudError {
    fn from(e: FacadeError) -> Self {
        let code = e.code().to_string();
        match e {
            FacadeError::ConfigInvalid { message } => Self::ConfigInvalid { code, message },
            FacadeError::LinkageMissing => Self::LinkageMissing { code },
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// FFI-friendly SDK configuration
///
/// The notification URL handler is passed to the service constructor
/// separately since records cannot hold callbacks.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSdkConfiguration {
    pub application_id: String,
    pub access_token: Option<String>,
    pub server_url: Option<String>,
    pub sender_id: Option<String>,
    pub notification_icon: Option<String>,
    pub analytics_enabled: bool,
    pub inbox_enabled: bool,
    pub location_enabled: bool,
    pub application_controls_badging: bool,
}

impl TryFrom<FfiSdkConfiguration> for SdkConfiguration {
    type Error = MarketingCloudError;

    fn try_from(c: FfiSdkConfiguration) -> Result<Self, Self::Error> {
        let server_url = c
            .server_url
            .filter(|s| !s.is_empty())
            .map(|s| {
                Url::parse(&s).map_err(|e| {
                    MarketingCloudError::from(FacadeError::config_invalid(format!(
                        "server url {s:?} is invalid: {e}"
                    )))
                })
            })
            .transpose()?;

        Ok(SdkConfiguration {
            application_id: c.application_id,
            access_token: c.access_token,
            server_url,
            sender_id: c.sender_id,
            notification_icon: c.notification_icon,
            url_handler: None,
            analytics_enabled: c.analytics_enabled,
            inbox_enabled: c.inbox_enabled,
            location_enabled: c.location_enabled,
            application_controls_badging: c.application_controls_badging,
        })
    }
}

/// FFI-friendly push configuration handed to the native provider
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPushConfig {
    pub application_id: String,
    pub access_token: Option<String>,
    pub server_url: Option<String>,
    pub sender_id: Option<String>,
    pub notification_icon: Option<String>,
    pub analytics_enabled: bool,
    pub inbox_enabled: bool,
    pub location_enabled: bool,
    pub application_controls_badging: bool,
}

impl From<&PushConfig> for FfiPushConfig {
    fn from(c: &PushConfig) -> Self {
        Self {
            application_id: c.application_id.clone(),
            access_token: c.access_token.clone(),
            server_url: c.server_url.as_ref().map(|u| u.to_string()),
            sender_id: c.sender_id.clone(),
            notification_icon: c.notification_icon.clone(),
            analytics_enabled: c.analytics_enabled,
            inbox_enabled: c.inbox_enabled,
            location_enabled: c.location_enabled,
            application_controls_badging: c.application_controls_badging,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiVendorLogLevel {
    Debug,
    Warn,
}

impl From<VendorLogLevel> for FfiVendorLogLevel {
    fn from(level: VendorLogLevel) -> Self {
        match level {
            VendorLogLevel::Debug => Self::Debug,
            VendorLogLevel::Warn => Self::Warn,
        }
    }
}

// ============================================================================
// State
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiInitializationState {
    Uninitialized,
    Configuring,
    Ready,
    Failed,
}

impl From<InitializationState> for FfiInitializationState {
    fn from(s: InitializationState) -> Self {
        match s {
            InitializationState::Uninitialized => Self::Uninitialized,
            InitializationState::Configuring => Self::Configuring,
            InitializationState::Ready => Self::Ready,
            InitializationState::Failed => Self::Failed,
        }
    }
}

// ============================================================================
// Inbox
// ============================================================================

/// FFI-friendly inbox message
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiInboxMessage {
    pub id: String,
    pub subject: String,
    pub url: Option<String>,
    pub read: bool,
    pub deleted: bool,
    /// Milliseconds since epoch
    pub send_date_utc: i64,
    pub start_date_utc: i64,
    pub end_date_utc: i64,
}

impl From<InboxMessage> for FfiInboxMessage {
    fn from(m: InboxMessage) -> Self {
        Self {
            id: m.id.0,
            subject: m.subject,
            url: m.url,
            read: m.read,
            deleted: m.deleted,
            send_date_utc: m.send_date_utc.timestamp_millis(),
            start_date_utc: m.start_date_utc.timestamp_millis(),
            end_date_utc: m.end_date_utc.timestamp_millis(),
        }
    }
}

// ============================================================================
// Navigation
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Enum)]
pub enum FfiNavigationAction {
    OpenUrl { url: String },
    LaunchApp,
    ProviderDefault,
}

impl From<NavigationAction> for FfiNavigationAction {
    fn from(a: NavigationAction) -> Self {
        match a {
            NavigationAction::OpenUrl(url) => Self::OpenUrl { url: url.to_string() },
            NavigationAction::LaunchApp => Self::LaunchApp,
            NavigationAction::ProviderDefault => Self::ProviderDefault,
        }
    }
}

impl From<FfiNavigationAction> for NavigationAction {
    /// An unparsable URL degrades to the provider default
    fn from(a: FfiNavigationAction) -> Self {
        match a {
            FfiNavigationAction::OpenUrl { url } => match Url::parse(&url) {
                Ok(url) => NavigationAction::OpenUrl(url),
                Err(e) => {
                    log::warn!("Handler returned invalid url {:?}: {}", url, e);
                    NavigationAction::ProviderDefault
                }
            },
            FfiNavigationAction::LaunchApp => NavigationAction::LaunchApp,
            FfiNavigationAction::ProviderDefault => NavigationAction::ProviderDefault,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPendingNavigation {
    pub request_code: u32,
    pub action: FfiNavigationAction,
}

impl From<PendingNavigation> for FfiPendingNavigation {
    fn from(p: PendingNavigation) -> Self {
        Self {
            request_code: p.request_code,
            action: p.action.into(),
        }
    }
}

/// Host-implemented mapping from a notification URL to a navigation action
#[uniffi::export(callback_interface)]
pub trait NotificationUrlCallback: Send + Sync {
    fn navigation_for(&self, url: Option<String>) -> FfiNavigationAction;
}

// ============================================================================
// Log Callback
// ============================================================================

/// Log level for FFI callback
#[derive(Debug, Clone, Copy, uniffi::Enum)]
pub enum FfiLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<log::Level> for FfiLogLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => FfiLogLevel::Error,
            log::Level::Warn => FfiLogLevel::Warn,
            log::Level::Info => FfiLogLevel::Info,
            log::Level::Debug => FfiLogLevel::Debug,
            log::Level::Trace => FfiLogLevel::Trace,
        }
    }
}

impl From<FfiLogLevel> for log::Level {
    fn from(level: FfiLogLevel) -> Self {
        match level {
            FfiLogLevel::Error => log::Level::Error,
            FfiLogLevel::Warn => log::Level::Warn,
            FfiLogLevel::Info => log::Level::Info,
            FfiLogLevel::Debug => log::Level::Debug,
            FfiLogLevel::Trace => log::Level::Trace,
        }
    }
}

/// Callback interface for receiving log messages from Rust
///
/// Swift should forward to os_log/Logger, Kotlin to Logcat.
#[uniffi::export(callback_interface)]
pub trait LogCallback: Send + Sync {
    /// Called when a log message is emitted
    ///
    /// # Arguments
    /// * `level` - The log level (error, warn, info, debug, trace)
    /// * `target` - The logging target (module path, e.g. "marketingcloud::init")
    /// * `message` - The log message
    fn on_log(&self, level: FfiLogLevel, target: String, message: String);
}
