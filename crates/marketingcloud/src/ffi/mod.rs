//! FFI bindings for UniFFI export
//!
//! This module provides Swift/Kotlin bindings for the marketingcloud crate
//! via UniFFI. The host implements `NativeProvider` over the vendor SDK and
//! hands it to `MarketingCloudService`.
//!
//! ## Usage from Swift
//!
//! ```swift
//! import MarketingCloudFFI
//!
//! // Route Rust logs to os_log
//! _ = initializeLogging(callback: OSLogForwarder(), maxLevel: .info)
//!
//! let service = try MarketingCloudService(
//!     config: FfiSdkConfiguration(
//!         applicationId: appId,
//!         accessToken: accessToken,
//!         serverUrl: "https://mc.example.com",
//!         senderId: nil,
//!         notificationIcon: nil,
//!         analyticsEnabled: true,
//!         inboxEnabled: true,
//!         locationEnabled: false,
//!         applicationControlsBadging: false
//!     ),
//!     provider: SFMCProvider(),
//!     urlHandler: DeepLinkHandler()
//! )
//!
//! if try await service.initializeSdk() {
//!     let inbox = try await service.getAllMessages()
//! }
//! ```

mod logging;
mod native;
mod service;
mod types;

pub use logging::{
    current_log_level, install_host_logger, set_debug_logging, set_log_callback, set_log_level,
};
pub use native::{NativeBridge, NativeCompletion, NativeProvider, NotificationIntentResolver};
pub use service::*;
pub use types::*;
