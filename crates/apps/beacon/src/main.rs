//! Beacon - a desktop harness for the Marketing Cloud facade
//!
//! Runs the facade end to end against the in-memory provider: validates the
//! configuration, performs the handshake, simulates an arriving and an
//! opened notification, then prints the normalized inbox as JSON.
//!
//! Optional inputs in the config directory:
//! - `marketingcloud.json` - SDK settings (falls back to `MARKETINGCLOUD_*` env vars)
//! - `beacon-inbox.json` - native inbox records to seed the provider with

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use chrono::{Duration, Utc};
use log::{error, info, warn};
use marketingcloud::init::open_url_or_launch;
use marketingcloud::{
    InMemoryProvider, MarketingCloud, NotificationPayload, ProfileAttributes, SdkConfiguration,
    SdkContext,
};
use serde_json::{Value, json};

const INBOX_SEED_FILE: &str = "beacon-inbox.json";

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    if let Err(e) = config::init() {
        error!("Failed to initialize config directory: {}", e);
    }

    let context = match SdkConfiguration::load() {
        Ok(config) => SdkContext::new(config.with_url_handler(Arc::new(open_url_or_launch))),
        Err(e) => {
            warn!("Marketing Cloud settings not found: {:#}", e);
            if let Some(path) = SdkConfiguration::default_settings_path() {
                warn!(
                    "To configure the SDK, either:\n\
                     1. Write your settings to: {}\n\
                     2. Or set environment variables: \
                     MARKETINGCLOUD_APP_ID and MARKETINGCLOUD_ACCESS_TOKEN",
                    path.display()
                );
            }
            SdkContext::unconfigured()
        }
    };

    let provider = Arc::new(InMemoryProvider::new().with_records(seed_records()?));
    let cloud = MarketingCloud::new(Arc::new(context), provider.clone());
    cloud.set_debug_logging_enabled(log::log_enabled!(log::Level::Debug))?;

    match cloud.initialize_sdk().await {
        Ok(true) => info!("Provider handshake succeeded"),
        Ok(false) => bail!("Provider handshake failed"),
        Err(e) => bail!("Cannot initialize ({}): {}", e.code(), e),
    }

    cloud.set_profile_id("beacon-user")?;
    let mut attributes = ProfileAttributes::new();
    attributes.insert("source", "beacon");
    attributes.insert("launched_at", Utc::now().to_rfc3339());
    cloud.set_profile_attributes(attributes)?;
    cloud.flush().await?;

    cloud
        .process_notification(
            [
                (NotificationPayload::MESSAGE_ID_KEY, "beacon-welcome"),
                (NotificationPayload::ALERT_KEY, "Welcome to Beacon"),
                (NotificationPayload::URL_KEY, "https://example.com/welcome"),
            ]
            .into_iter()
            .collect(),
        )
        .await?;

    if let Some(pending) = provider.open_notification(Some("https://example.com/welcome")) {
        info!(
            "Opening the notification would run {:?} (request {})",
            pending.action, pending.request_code
        );
    }

    info!(
        "Device token: {}",
        cloud.get_device_token().await?.unwrap_or_else(|| "<none>".to_string())
    );
    info!(
        "Inbox: {} messages, {} unread",
        cloud.get_all_messages_count().await?,
        cloud.get_unread_messages_count().await?
    );
    if !cloud.refresh_messages().await? {
        warn!("Inbox refresh was throttled");
    }

    let messages = cloud.get_all_messages().await?;
    let output = serde_json::to_string_pretty(&messages).context("Failed to serialize inbox")?;
    println!("{output}");

    Ok(())
}

/// Native records from the config directory, or a small built-in inbox
fn seed_records() -> Result<Vec<Value>> {
    if let Some(records) = config::load_json_if_exists::<Vec<Value>>(INBOX_SEED_FILE)? {
        info!("Seeding inbox with {} records from {}", records.len(), INBOX_SEED_FILE);
        return Ok(records);
    }

    let now = Utc::now();
    let week_ago = (now - Duration::days(7)).timestamp_millis();
    Ok(vec![
        json!({
            "id": "beacon-1",
            "subject": "Spring sale starts today",
            "url": "https://example.com/sale",
            "read": 0,
            "deleted": 0,
            "sendDateEpoch": week_ago,
            "startDateEpoch": week_ago,
            "endDateEpoch": (now + Duration::days(7)).timestamp_millis(),
        }),
        json!({
            "id": "beacon-2",
            "subject": "Your order shipped",
            "read": true,
            "deleted": false,
            "sendDateUtc": now.to_rfc3339(),
        }),
    ])
}
