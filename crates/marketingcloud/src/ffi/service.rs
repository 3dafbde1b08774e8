//! MarketingCloudService facade for UniFFI export
//!
//! Wraps [`MarketingCloud`] in an FFI-friendly object. Async methods run on
//! the tokio runtime UniFFI drives; the command worker runs on a small
//! process-wide runtime owned by this module so services can be created from
//! any host thread.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use log::info;
use tokio::runtime::{Builder, Handle, Runtime};

use crate::config::SdkConfiguration;
use crate::context::SdkContext;
use crate::facade::MarketingCloud;
use crate::ffi::logging;
use crate::ffi::native::{HostUrlHandler, NativeBridge, NativeProvider};
use crate::ffi::types::*;
use crate::init::NotificationUrlHandler;
use crate::models::{MessageId, ProfileAttributes};
use crate::provider::NotificationPayload;

/// Built at most once; a build error is kept so later calls report it too
static WORKER_RUNTIME: OnceLock<Result<Runtime, String>> = OnceLock::new();

fn worker_handle() -> Result<Handle, MarketingCloudError> {
    let runtime = WORKER_RUNTIME.get_or_init(|| {
        Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("marketingcloud-worker")
            .enable_all()
            .build()
            .map_err(|e| e.to_string())
    });

    match runtime {
        Ok(runtime) => Ok(runtime.handle().clone()),
        Err(e) => Err(MarketingCloudError::Internal {
            message: format!("Failed to start worker runtime: {}", e),
        }),
    }
}

/// Main service object for push, identity and inbox operations
///
/// One instance per application. Swift/Kotlin code calls this instead of the
/// vendor SDK so every platform shares the same validation, handshake
/// bookkeeping and inbox normalization.
#[derive(uniffi::Object)]
pub struct MarketingCloudService {
    facade: MarketingCloud,
}

#[uniffi::export(async_runtime = "tokio")]
impl MarketingCloudService {
    /// Create a service over the host's vendor SDK binding
    ///
    /// # Arguments
    /// * `config` - SDK configuration; validated when `initialize_sdk` runs
    /// * `provider` - The host's implementation of the vendor SDK calls
    /// * `url_handler` - Maps opened notification URLs to navigation actions
    #[uniffi::constructor]
    pub fn new(
        config: FfiSdkConfiguration,
        provider: Box<dyn NativeProvider>,
        url_handler: Box<dyn NotificationUrlCallback>,
    ) -> Result<Arc<Self>, MarketingCloudError> {
        let handler: Arc<dyn NotificationUrlHandler> = Arc::new(HostUrlHandler(url_handler));
        let config = SdkConfiguration::try_from(config)?.with_url_handler(handler);
        let bridge = Arc::new(NativeBridge::new(provider));

        let handle = worker_handle()?;
        let _guard = handle.enter();
        let facade = MarketingCloud::new(Arc::new(SdkContext::new(config)), bridge);

        info!("Marketing Cloud service created");
        Ok(Arc::new(Self { facade }))
    }

    /// Create a service for a build that links no vendor SDK
    ///
    /// Every operation fails with `LinkageMissing`.
    #[uniffi::constructor]
    pub fn unlinked(config: FfiSdkConfiguration) -> Result<Arc<Self>, MarketingCloudError> {
        let config = SdkConfiguration::try_from(config)?;
        Ok(Arc::new(Self {
            facade: MarketingCloud::unlinked(Arc::new(SdkContext::new(config))),
        }))
    }

    pub fn state(&self) -> FfiInitializationState {
        self.facade.state().into()
    }

    // ========================================================================
    // Setup
    // ========================================================================

    /// Validate the configuration and run the vendor handshake
    ///
    /// Returns `true` when the vendor reported success.
    pub async fn initialize_sdk(&self) -> Result<bool, MarketingCloudError> {
        Ok(self.facade.initialize_sdk().await?)
    }

    /// Toggle vendor debug logging
    ///
    /// While on, Rust logs are forwarded at `Debug` or above; turning it off
    /// goes back to the level given to `initialize_logging`/`update_log_level`.
    pub fn set_debug_logging_enabled(&self, enabled: bool) -> Result<(), MarketingCloudError> {
        self.facade.set_debug_logging_enabled(enabled)?;
        logging::set_debug_logging(enabled);
        Ok(())
    }

    /// Wait until earlier fire-and-forget calls reached the native provider
    pub async fn flush(&self) -> Result<(), MarketingCloudError> {
        Ok(self.facade.flush().await?)
    }

    // ========================================================================
    // Push Messaging
    // ========================================================================

    pub async fn get_device_token(&self) -> Result<Option<String>, MarketingCloudError> {
        Ok(self.facade.get_device_token().await?)
    }

    pub async fn get_profile_id(&self) -> Result<Option<String>, MarketingCloudError> {
        Ok(self.facade.get_profile_id().await?)
    }

    pub fn set_profile_id(&self, profile_id: String) -> Result<(), MarketingCloudError> {
        Ok(self.facade.set_profile_id(profile_id)?)
    }

    /// Replace or add profile attributes; values are sent as strings
    pub fn set_profile_attributes(
        &self,
        attributes: HashMap<String, String>,
    ) -> Result<(), MarketingCloudError> {
        Ok(self
            .facade
            .set_profile_attributes(ProfileAttributes::from(attributes))?)
    }

    pub async fn is_push_enabled(&self) -> Result<bool, MarketingCloudError> {
        Ok(self.facade.is_push_enabled().await?)
    }

    pub fn set_push_enabled(&self, enabled: bool) -> Result<(), MarketingCloudError> {
        Ok(self.facade.set_push_enabled(enabled)?)
    }

    // ========================================================================
    // Inbox
    // ========================================================================

    pub async fn get_all_messages(&self) -> Result<Vec<FfiInboxMessage>, MarketingCloudError> {
        let messages = self.facade.get_all_messages().await?;
        Ok(messages.into_iter().map(FfiInboxMessage::from).collect())
    }

    pub async fn get_all_messages_count(&self) -> Result<u32, MarketingCloudError> {
        Ok(self.facade.get_all_messages_count().await?)
    }

    pub async fn get_unread_messages_count(&self) -> Result<u32, MarketingCloudError> {
        Ok(self.facade.get_unread_messages_count().await?)
    }

    pub async fn mark_message_deleted(
        &self,
        message_id: String,
    ) -> Result<bool, MarketingCloudError> {
        Ok(self
            .facade
            .mark_message_deleted(&MessageId::new(message_id))
            .await?)
    }

    pub async fn mark_message_read(
        &self,
        message_id: String,
    ) -> Result<bool, MarketingCloudError> {
        Ok(self
            .facade
            .mark_message_read(&MessageId::new(message_id))
            .await?)
    }

    pub async fn mark_all_messages_deleted(&self) -> Result<bool, MarketingCloudError> {
        Ok(self.facade.mark_all_messages_deleted().await?)
    }

    pub async fn mark_all_messages_read(&self) -> Result<bool, MarketingCloudError> {
        Ok(self.facade.mark_all_messages_read().await?)
    }

    /// Re-sync the inbox; `false` when the vendor throttled the request
    pub async fn refresh_messages(&self) -> Result<bool, MarketingCloudError> {
        Ok(self.facade.refresh_messages().await?)
    }

    // ========================================================================
    // Native events
    // ========================================================================

    /// Forward the APNs/FCM device token received by the application delegate
    pub async fn set_device_token(&self, token: Vec<u8>) -> Result<(), MarketingCloudError> {
        Ok(self.facade.set_device_token(token).await?)
    }

    /// Forward a received notification's user info
    pub async fn process_notification(
        &self,
        user_info: HashMap<String, String>,
    ) -> Result<(), MarketingCloudError> {
        Ok(self
            .facade
            .process_notification(NotificationPayload::new(user_info))
            .await?)
    }
}

// ============================================================================
// Free functions
// ============================================================================

/// Route Rust logs to the host's logger
///
/// Returns `false` when another logger was already installed; the callback
/// is kept and takes effect if this backend becomes active.
#[uniffi::export]
pub fn initialize_logging(callback: Box<dyn LogCallback>, max_level: FfiLogLevel) -> bool {
    logging::install_host_logger(Some(Arc::from(callback)), max_level.into()).is_ok()
}

/// Change the level forwarded to the host's logger
#[uniffi::export]
pub fn update_log_level(max_level: FfiLogLevel) {
    logging::set_log_level(max_level.into());
}

/// Stop forwarding logs to the host
#[uniffi::export]
pub fn clear_log_callback() {
    logging::set_log_callback(None);
}

/// Error code strings hosts can match on
#[uniffi::export]
pub fn config_invalid_code() -> String {
    crate::error::FacadeError::CONFIG_INVALID.to_string()
}

#[uniffi::export]
pub fn linkage_missing_code() -> String {
    crate::error::FacadeError::LINKAGE_MISSING.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ffi::native::{NativeCompletion, NotificationIntentResolver};
    use log::Level;
    use serde_json::json;
    use std::sync::{Barrier, Mutex};

    /// Host double that records what the facade hands it
    #[derive(Default)]
    struct RecordingNative {
        records: Vec<String>,
        configured: Mutex<Vec<String>>,
        profile_id: Mutex<Option<String>>,
        push_enabled: Mutex<Option<bool>>,
        attributes: Mutex<HashMap<String, String>>,
    }

    impl NativeProvider for Arc<RecordingNative> {
        fn configure(
            &self,
            config: FfiPushConfig,
            _resolver: Arc<NotificationIntentResolver>,
            completion: Arc<NativeCompletion>,
        ) {
            self.configured.lock().unwrap().push(config.application_id);
            completion.complete(true);
        }
        fn request_device_registration(&self) {}
        fn set_device_token(&self, _token: Vec<u8>) {}
        fn process_notification(&self, _user_info: HashMap<String, String>) {}
        fn set_log_level(&self, _level: FfiVendorLogLevel) {}
        fn device_token(&self) -> Option<String> {
            None
        }
        fn profile_id(&self) -> Option<String> {
            self.profile_id.lock().unwrap().clone()
        }
        fn set_profile_id(&self, profile_id: String) {
            *self.profile_id.lock().unwrap() = Some(profile_id);
        }
        fn set_profile_attributes(&self, attributes: HashMap<String, String>) {
            self.attributes.lock().unwrap().extend(attributes);
        }
        fn is_push_enabled(&self) -> bool {
            self.push_enabled.lock().unwrap().unwrap_or(true)
        }
        fn set_push_enabled(&self, enabled: bool) {
            *self.push_enabled.lock().unwrap() = Some(enabled);
        }
        fn messages_json(&self) -> Vec<String> {
            self.records.clone()
        }
        fn message_count(&self) -> u32 {
            self.records.len() as u32
        }
        fn unread_message_count(&self) -> u32 {
            0
        }
        fn mark_message_deleted(&self, _message_id: String) -> bool {
            false
        }
        fn mark_message_read(&self, _message_id: String) -> bool {
            false
        }
        fn mark_all_messages_deleted(&self) -> bool {
            false
        }
        fn mark_all_messages_read(&self) -> bool {
            false
        }
        fn refresh_messages(&self, completion: Arc<NativeCompletion>) {
            completion.complete(true);
        }
    }

    struct LaunchOnly;

    impl NotificationUrlCallback for LaunchOnly {
        fn navigation_for(&self, _url: Option<String>) -> FfiNavigationAction {
            FfiNavigationAction::LaunchApp
        }
    }

    struct Discard;

    impl LogCallback for Discard {
        fn on_log(&self, _level: FfiLogLevel, _target: String, _message: String) {}
    }

    fn ffi_config(application_id: &str) -> FfiSdkConfiguration {
        FfiSdkConfiguration {
            application_id: application_id.to_string(),
            access_token: Some("token".to_string()),
            server_url: None,
            sender_id: None,
            notification_icon: None,
            analytics_enabled: false,
            inbox_enabled: true,
            location_enabled: false,
            application_controls_badging: false,
        }
    }

    fn service_over(
        application_id: &str,
        native: Arc<RecordingNative>,
    ) -> Arc<MarketingCloudService> {
        let config = ffi_config(application_id);
        MarketingCloudService::new(config, Box::new(native), Box::new(LaunchOnly)).unwrap()
    }

    #[tokio::test]
    async fn test_empty_application_id_is_config_invalid() {
        let native = Arc::new(RecordingNative::default());
        let service = service_over("", native.clone());

        match service.initialize_sdk().await {
            Err(MarketingCloudError::ConfigInvalid { code, .. }) => {
                assert_eq!(code, "E_SDK_CONFIG_INVALID");
                assert_eq!(code, config_invalid_code());
            }
            other => panic!("expected ConfigInvalid, got {:?}", other),
        }
        assert_eq!(service.state(), FfiInitializationState::Uninitialized);
        assert!(native.configured.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unlinked_rejects_every_call() {
        let service = MarketingCloudService::unlinked(ffi_config("app")).unwrap();

        let results = vec![
            service.initialize_sdk().await.map(|_| ()),
            service.get_device_token().await.map(|_| ()),
            service.set_profile_id("contact-1".to_string()),
            service.set_debug_logging_enabled(true),
            service.get_all_messages().await.map(|_| ()),
            service.refresh_messages().await.map(|_| ()),
            service.flush().await,
        ];

        for result in results {
            match result {
                Err(MarketingCloudError::LinkageMissing { code }) => {
                    assert_eq!(code, linkage_missing_code());
                    assert_eq!(code, "E_LINKAGE_MISSING");
                }
                other => panic!("expected LinkageMissing, got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_messages_cross_as_epoch_millis() {
        let native = Arc::new(RecordingNative {
            records: vec![
                json!({"id": "m1", "subject": "Hi", "read": 1, "deleted": false,
                       "sendDateEpoch": 1000, "startDateEpoch": 2000, "endDateEpoch": 2000})
                .to_string(),
            ],
            ..Default::default()
        });
        let service = service_over("app", native.clone());

        assert!(service.initialize_sdk().await.unwrap());
        assert_eq!(service.state(), FfiInitializationState::Ready);
        assert_eq!(*native.configured.lock().unwrap(), vec!["app".to_string()]);

        let messages = service.get_all_messages().await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].id, "m1");
        assert!(messages[0].read);
        assert_eq!(messages[0].send_date_utc, 1000);
        assert_eq!(messages[0].start_date_utc, 2000);
        // Equal start and end dates are widened by one day
        assert_eq!(messages[0].end_date_utc, 86_402_000);
    }

    #[tokio::test]
    async fn test_fire_and_forget_calls_reach_native() {
        let native = Arc::new(RecordingNative::default());
        let service = service_over("app", native.clone());
        service.initialize_sdk().await.unwrap();

        service.set_profile_id("contact-42".to_string()).unwrap();
        service.set_push_enabled(false).unwrap();
        service
            .set_profile_attributes([("tier".to_string(), "gold".to_string())].into())
            .unwrap();
        service.flush().await.unwrap();

        assert_eq!(service.get_profile_id().await.unwrap().as_deref(), Some("contact-42"));
        assert!(!service.is_push_enabled().await.unwrap());
        assert_eq!(
            native.attributes.lock().unwrap().get("tier").map(String::as_str),
            Some("gold")
        );
    }

    #[tokio::test]
    async fn test_debug_logging_returns_to_host_level() {
        let native = Arc::new(RecordingNative::default());
        let service = service_over("app", native);

        // Install may lose to another logger; the level is tracked either way
        initialize_logging(Box::new(Discard), FfiLogLevel::Error);
        assert_eq!(logging::current_log_level(), Some(Level::Error));

        service.set_debug_logging_enabled(true).unwrap();
        assert_eq!(logging::current_log_level(), Some(Level::Debug));
        service.set_debug_logging_enabled(false).unwrap();
        assert_eq!(logging::current_log_level(), Some(Level::Error));

        update_log_level(FfiLogLevel::Trace);
        service.set_debug_logging_enabled(true).unwrap();
        assert_eq!(logging::current_log_level(), Some(Level::Trace));
        service.set_debug_logging_enabled(false).unwrap();
        assert_eq!(logging::current_log_level(), Some(Level::Trace));
    }

    #[test]
    fn test_racing_callers_share_one_worker_runtime() {
        let barrier = Arc::new(Barrier::new(8));
        let threads: Vec<_> = (0..8)
            .map(|_| {
                let barrier = barrier.clone();
                std::thread::spawn(move || {
                    // Each caller sits inside its own runtime, as UniFFI callers may
                    let local = Builder::new_current_thread().build().unwrap();
                    local.block_on(async {
                        barrier.wait();
                        worker_handle().unwrap()
                    })
                })
            })
            .collect();

        for thread in threads {
            let handle = thread.join().expect("caller thread panicked");
            let name = handle
                .block_on(handle.spawn(async {
                    std::thread::current().name().map(String::from)
                }))
                .unwrap();
            assert_eq!(name.as_deref(), Some("marketingcloud-worker"));
        }
    }
}
