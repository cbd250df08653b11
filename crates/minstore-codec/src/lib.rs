//! Response encoders for MinStore.
//!
//! Listing results and errors have two wire forms built from the same model
//! values:
//!
//! - [`xml`]: S3 RestXml documents written with quick-xml (the default).
//! - [`json`]: the same fields as plain JSON objects, with no XML artifacts.
//!
//! [`Encoding`] selects between them at the response boundary.

pub mod encoding;
pub mod error;
pub mod json;
pub mod xml;

pub use encoding::{Encoding, encode_error, encode_list_buckets, encode_list_objects};
pub use error::CodecError;

/// Storage class reported for every listed object.
pub const STORAGE_CLASS: &str = "STANDARD";

/// Format a timestamp as ISO 8601 with milliseconds and `Z` suffix.
fn format_timestamp(dt: &chrono::DateTime<chrono::Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
