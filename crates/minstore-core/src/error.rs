//! Driver error types and their mapping to API errors.
//!
//! [`DriverError`] is the closed set of failures a [`Driver`](crate::Driver)
//! reports. The [`From`] implementation towards [`ApiError`] is the single place
//! where driver failures turn into HTTP status codes:
//!
//! | Variant | Status | Code |
//! |---------|--------|------|
//! | `BucketNotFound` | 404 | `NoSuchBucket` |
//! | `ObjectNotFound` | 404 | `NoSuchKey` |
//! | `BucketExists` | 409 | `BucketAlreadyExists` |
//! | `InvalidBucketName` | 400 | `InvalidBucketName` |
//! | `InvalidObjectKey` | 400 | `KeyTooLongError` / `InvalidArgument` |
//! | `BadDigest` | 400 | `BadDigest` |
//! | `Io`, `Internal` | 500 | `InternalError` |
//!
//! # Usage
//!
//! ```
//! use minstore_core::error::DriverError;
//! use minstore_model::{ApiError, ErrorCode};
//!
//! let err = DriverError::BucketNotFound {
//!     bucket: "photos".to_owned(),
//! };
//! let api: ApiError = err.into();
//! assert_eq!(api.code, ErrorCode::NoSuchBucket);
//! assert_eq!(api.status_code.as_u16(), 404);
//! ```

use minstore_model::{ApiError, ErrorCode};

use crate::validation::MAX_KEY_BYTES;

/// Failures reported by a storage driver.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// The bucket does not exist.
    #[error("bucket not found: {bucket}")]
    BucketNotFound {
        /// The missing bucket.
        bucket: String,
    },

    /// The object does not exist.
    #[error("object not found: {bucket}/{key}")]
    ObjectNotFound {
        /// The bucket that was searched.
        bucket: String,
        /// The missing key.
        key: String,
    },

    /// A bucket with this name already exists.
    #[error("bucket already exists: {bucket}")]
    BucketExists {
        /// The conflicting bucket name.
        bucket: String,
    },

    /// The bucket name violates the naming rules.
    #[error("invalid bucket name {bucket}: {reason}")]
    InvalidBucketName {
        /// The rejected name.
        bucket: String,
        /// Which rule was violated.
        reason: String,
    },

    /// The object key violates the key rules.
    #[error("invalid object key: {reason}")]
    InvalidObjectKey {
        /// The rejected key.
        key: String,
        /// Which rule was violated.
        reason: String,
    },

    /// The content did not hash to the expected MD5.
    #[error("content digest mismatch: expected {expected}, computed {actual}")]
    BadDigest {
        /// The digest the client announced.
        expected: String,
        /// The digest of the received content.
        actual: String,
    },

    /// An I/O failure while reading the body or writing to the sink.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other backend fault.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Result alias for driver operations.
pub type DriverResult<T> = Result<T, DriverError>;

impl DriverError {
    /// Whether the error is a backend fault rather than a client-visible condition.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Internal(_))
    }
}

impl From<DriverError> for ApiError {
    fn from(err: DriverError) -> Self {
        match err {
            DriverError::BucketNotFound { bucket } => ApiError::no_such_bucket(bucket),
            DriverError::ObjectNotFound { key, .. } => ApiError::no_such_key(key),
            DriverError::BucketExists { bucket } => ApiError::bucket_already_exists(bucket),
            DriverError::InvalidBucketName { bucket, reason } => {
                ApiError::with_message(ErrorCode::InvalidBucketName, reason).with_resource(bucket)
            }
            DriverError::InvalidObjectKey { key, reason } => {
                let code = if key.len() > MAX_KEY_BYTES {
                    ErrorCode::KeyTooLongError
                } else {
                    ErrorCode::InvalidArgument
                };
                ApiError::with_message(code, reason)
            }
            DriverError::BadDigest { .. } => ApiError::new(ErrorCode::BadDigest),
            DriverError::Io(_) | DriverError::Internal(_) => ApiError::internal_error(),
        }
    }
}
