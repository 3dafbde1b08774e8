//! Binding generator for the Swift and Kotlin facades
//!
//!   cargo run -p marketingcloud-ffi --features bindgen --bin uniffi-bindgen generate \
//!       --library <path to libmarketingcloud_ffi> --language <swift|kotlin> --out-dir <dir>

fn main() {
    uniffi::uniffi_bindgen_main()
}
