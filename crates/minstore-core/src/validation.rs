//! Bucket name and object key validation.
//!
//! Naming follows the
//! [Amazon S3 bucket naming rules](https://docs.aws.amazon.com/AmazonS3/latest/userguide/bucketnamingrules.html)
//! so that clients written for S3 keep working.

use std::net::Ipv4Addr;

use crate::error::DriverError;

/// Maximum object key length in bytes.
pub const MAX_KEY_BYTES: usize = 1024;

/// Minimum bucket name length.
const MIN_BUCKET_NAME_LEN: usize = 3;

/// Maximum bucket name length.
const MAX_BUCKET_NAME_LEN: usize = 63;

/// Validate a bucket name.
///
/// Rules:
/// - 3-63 characters long
/// - Only lowercase letters, numbers, hyphens, and dots
/// - Must start and end with a letter or number
/// - No consecutive dots (`..`)
/// - Not formatted as an IPv4 address (e.g. `192.168.0.1`)
/// - Must not start with `xn--`
///
/// # Errors
///
/// Returns [`DriverError::InvalidBucketName`] naming the violated rule.
///
/// # Examples
///
/// ```
/// use minstore_core::validation::validate_bucket_name;
///
/// assert!(validate_bucket_name("my-valid-bucket").is_ok());
/// assert!(validate_bucket_name("AB").is_err());
/// ```
pub fn validate_bucket_name(name: &str) -> Result<(), DriverError> {
    let invalid = |reason: &str| DriverError::InvalidBucketName {
        bucket: name.to_owned(),
        reason: reason.to_owned(),
    };

    let len = name.len();
    if !(MIN_BUCKET_NAME_LEN..=MAX_BUCKET_NAME_LEN).contains(&len) {
        return Err(invalid(&format!(
            "Bucket name must be between {MIN_BUCKET_NAME_LEN} and {MAX_BUCKET_NAME_LEN} characters long"
        )));
    }

    if !name
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'.')
    {
        return Err(invalid(
            "Bucket name must only contain lowercase letters, numbers, hyphens, and dots",
        ));
    }

    let first = name.as_bytes()[0];
    let last = name.as_bytes()[len - 1];
    if !first.is_ascii_alphanumeric() || !last.is_ascii_alphanumeric() {
        return Err(invalid("Bucket name must start and end with a letter or number"));
    }

    if name.contains("..") {
        return Err(invalid("Bucket name must not contain consecutive dots"));
    }

    if name.parse::<Ipv4Addr>().is_ok() {
        return Err(invalid("Bucket name must not be formatted as an IP address"));
    }

    if name.starts_with("xn--") {
        return Err(invalid("Bucket name must not start with 'xn--'"));
    }

    Ok(())
}

/// Validate an object key.
///
/// Keys must be 1-1024 bytes long. Any UTF-8 content is accepted, including `/`.
///
/// # Errors
///
/// Returns [`DriverError::InvalidObjectKey`] if the key is empty or too long.
///
/// # Examples
///
/// ```
/// use minstore_core::validation::validate_object_key;
///
/// assert!(validate_object_key("photos/2024/image.jpg").is_ok());
/// assert!(validate_object_key("").is_err());
/// ```
pub fn validate_object_key(key: &str) -> Result<(), DriverError> {
    if key.is_empty() {
        return Err(DriverError::InvalidObjectKey {
            key: String::new(),
            reason: "Object key must not be empty".to_owned(),
        });
    }

    if key.len() > MAX_KEY_BYTES {
        return Err(DriverError::InvalidObjectKey {
            key: key.to_owned(),
            reason: format!("Object key must not exceed {MAX_KEY_BYTES} bytes"),
        });
    }

    Ok(())
}
