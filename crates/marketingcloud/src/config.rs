//! SDK configuration and its validation
//!
//! A configuration is assembled by the host, either with
//! [`SdkConfiguration::builder`] or loaded from (in order of priority):
//! 1. A JSON settings file (`marketingcloud.json` in the shared config directory)
//! 2. Environment variables (`MARKETINGCLOUD_APP_ID`, ...)
//!
//! Loading never checks completeness. [`validate`] is the single gate that
//! runs before any provider call.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use url::Url;

use crate::error::FacadeError;
use crate::init::NotificationUrlHandler;

/// Settings filename in the shared config directory
pub const SETTINGS_FILE: &str = "marketingcloud.json";

const ENV_APP_ID: &str = "MARKETINGCLOUD_APP_ID";
const ENV_ACCESS_TOKEN: &str = "MARKETINGCLOUD_ACCESS_TOKEN";
const ENV_SERVER_URL: &str = "MARKETINGCLOUD_SERVER_URL";
const ENV_SENDER_ID: &str = "MARKETINGCLOUD_SENDER_ID";

/// Everything the provider needs to start, set once before initialization
#[derive(Clone, Default)]
pub struct SdkConfiguration {
    pub application_id: String,
    pub access_token: Option<String>,
    pub server_url: Option<Url>,
    /// Sender id on Android, MID on iOS
    pub sender_id: Option<String>,
    /// Platform resource name of the small notification icon
    pub notification_icon: Option<String>,
    /// Maps a tapped notification's URL to a navigation action
    pub url_handler: Option<Arc<dyn NotificationUrlHandler>>,
    pub analytics_enabled: bool,
    pub inbox_enabled: bool,
    pub location_enabled: bool,
    pub application_controls_badging: bool,
}

impl std::fmt::Debug for SdkConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SdkConfiguration")
            .field("application_id", &self.application_id)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("server_url", &self.server_url.as_ref().map(Url::as_str))
            .field("sender_id", &self.sender_id)
            .field("notification_icon", &self.notification_icon)
            .field("url_handler", &self.url_handler.is_some())
            .field("analytics_enabled", &self.analytics_enabled)
            .field("inbox_enabled", &self.inbox_enabled)
            .field("location_enabled", &self.location_enabled)
            .field("application_controls_badging", &self.application_controls_badging)
            .finish()
    }
}

/// JSON settings file format
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SdkSettings {
    app_id: String,
    access_token: Option<String>,
    server_url: Option<String>,
    #[serde(alias = "mid")]
    sender_id: Option<String>,
    notification_icon: Option<String>,
    analytics_enabled: bool,
    inbox_enabled: bool,
    location_enabled: bool,
    application_controls_badging: bool,
}

impl SdkConfiguration {
    pub fn builder(application_id: impl Into<String>) -> SdkConfigurationBuilder {
        SdkConfigurationBuilder::new(application_id)
    }

    /// Load from the settings file if present, otherwise from the environment
    pub fn load() -> Result<Self> {
        if let Some(settings) = config::load_json_if_exists::<SdkSettings>(SETTINGS_FILE)? {
            return Self::from_settings(settings);
        }
        Self::from_env()
    }

    /// Load from a specific JSON settings file
    pub fn from_file(path: &Path) -> Result<Self> {
        let settings: SdkSettings = config::load_json_file(path)?;
        Self::from_settings(settings)
    }

    /// Parse a JSON settings document
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: SdkSettings =
            serde_json::from_str(json).context("Failed to parse SDK settings JSON")?;
        Self::from_settings(settings)
    }

    /// Load from `MARKETINGCLOUD_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let app_id = lookup(ENV_APP_ID)
            .with_context(|| format!("{ENV_APP_ID} environment variable not set"))?;

        Self::from_settings(SdkSettings {
            app_id,
            access_token: lookup(ENV_ACCESS_TOKEN),
            server_url: lookup(ENV_SERVER_URL),
            sender_id: lookup(ENV_SENDER_ID),
            ..SdkSettings::default()
        })
    }

    fn from_settings(settings: SdkSettings) -> Result<Self> {
        let server_url = settings
            .server_url
            .filter(|s| !s.is_empty())
            .map(|s| Url::parse(&s).with_context(|| format!("Invalid server URL: {s}")))
            .transpose()?;

        Ok(Self {
            application_id: settings.app_id,
            access_token: settings.access_token,
            server_url,
            sender_id: settings.sender_id,
            notification_icon: settings.notification_icon,
            url_handler: None,
            analytics_enabled: settings.analytics_enabled,
            inbox_enabled: settings.inbox_enabled,
            location_enabled: settings.location_enabled,
            application_controls_badging: settings.application_controls_badging,
        })
    }

    /// Default settings file path
    pub fn default_settings_path() -> Option<PathBuf> {
        config::config_path(SETTINGS_FILE)
    }

    /// Same configuration with a notification URL handler attached
    pub fn with_url_handler(mut self, handler: Arc<dyn NotificationUrlHandler>) -> Self {
        self.url_handler = Some(handler);
        self
    }
}

/// Check a configuration before any provider call
///
/// Only the application id is checked here. Everything else the provider
/// needs is the provider's to reject during the handshake.
pub fn validate(config: Option<&SdkConfiguration>) -> Result<&SdkConfiguration, FacadeError> {
    let config =
        config.ok_or_else(|| FacadeError::config_invalid("no SDK configuration was provided"))?;

    if config.application_id.is_empty() {
        return Err(FacadeError::config_invalid("application id is empty"));
    }

    Ok(config)
}

/// Builder for [`SdkConfiguration`]
pub struct SdkConfigurationBuilder {
    config: SdkConfiguration,
}

impl SdkConfigurationBuilder {
    fn new(application_id: impl Into<String>) -> Self {
        Self {
            config: SdkConfiguration {
                application_id: application_id.into(),
                ..SdkConfiguration::default()
            },
        }
    }

    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.config.access_token = Some(token.into());
        self
    }

    pub fn server_url(mut self, url: Url) -> Self {
        self.config.server_url = Some(url);
        self
    }

    pub fn sender_id(mut self, sender_id: impl Into<String>) -> Self {
        self.config.sender_id = Some(sender_id.into());
        self
    }

    pub fn notification_icon(mut self, icon: impl Into<String>) -> Self {
        self.config.notification_icon = Some(icon.into());
        self
    }

    pub fn url_handler(mut self, handler: Arc<dyn NotificationUrlHandler>) -> Self {
        self.config.url_handler = Some(handler);
        self
    }

    pub fn analytics_enabled(mut self, enabled: bool) -> Self {
        self.config.analytics_enabled = enabled;
        self
    }

    pub fn inbox_enabled(mut self, enabled: bool) -> Self {
        self.config.inbox_enabled = enabled;
        self
    }

    pub fn location_enabled(mut self, enabled: bool) -> Self {
        self.config.location_enabled = enabled;
        self
    }

    pub fn application_controls_badging(mut self, enabled: bool) -> Self {
        self.config.application_controls_badging = enabled;
        self
    }

    pub fn build(self) -> SdkConfiguration {
        self.config
    }
}
