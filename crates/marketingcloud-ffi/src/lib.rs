//! Linkable Marketing Cloud bindings for iOS and Android hosts
//!
//! The facade and its UniFFI exports live in the `marketingcloud` crate; this
//! crate only produces the static/dynamic library the host app links and
//! that `uniffi-bindgen` reads in library mode.
//!
//! ## Swift
//!
//! ```bash
//! cargo build --release -p marketingcloud-ffi --target aarch64-apple-ios
//! cargo run -p marketingcloud-ffi --features bindgen --bin uniffi-bindgen generate \
//!     --library target/aarch64-apple-ios/release/libmarketingcloud_ffi.a \
//!     --language swift \
//!     --out-dir generated/swift
//! ```
//!
//! ## Kotlin
//!
//! ```bash
//! cargo build --release -p marketingcloud-ffi --target aarch64-linux-android
//! cargo run -p marketingcloud-ffi --features bindgen --bin uniffi-bindgen generate \
//!     --library target/aarch64-linux-android/release/libmarketingcloud_ffi.so \
//!     --language kotlin \
//!     --out-dir generated/kotlin
//! ```

pub use marketingcloud::ffi::*;

// Library mode needs the scaffolding symbols in this artifact
marketingcloud::uniffi_reexport_scaffolding!();
