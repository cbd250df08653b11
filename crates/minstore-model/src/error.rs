//! API error codes and the wire-level error type.

use std::fmt;

/// Error codes MinStore reports to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum ErrorCode {
    /// The Content-MD5 did not match the received body.
    BadDigest,
    /// The bucket name is already taken.
    BucketAlreadyExists,
    /// Unexpected backend fault.
    #[default]
    InternalError,
    /// A request argument is malformed.
    InvalidArgument,
    /// The bucket name violates the naming rules.
    InvalidBucketName,
    /// The Content-MD5 header could not be decoded.
    InvalidDigest,
    /// The request is structurally invalid.
    InvalidRequest,
    /// The object key is longer than allowed.
    KeyTooLongError,
    /// The HTTP method is not served at all.
    MethodNotAllowed,
    /// The bucket does not exist.
    NoSuchBucket,
    /// The object does not exist.
    NoSuchKey,
    /// No route matches the method and path shape.
    NotFound,
    /// A recognized feature that is not implemented.
    NotImplemented,
}

impl ErrorCode {
    /// Returns the error code as a string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BadDigest => "BadDigest",
            Self::BucketAlreadyExists => "BucketAlreadyExists",
            Self::InternalError => "InternalError",
            Self::InvalidArgument => "InvalidArgument",
            Self::InvalidBucketName => "InvalidBucketName",
            Self::InvalidDigest => "InvalidDigest",
            Self::InvalidRequest => "InvalidRequest",
            Self::KeyTooLongError => "KeyTooLongError",
            Self::MethodNotAllowed => "MethodNotAllowed",
            Self::NoSuchBucket => "NoSuchBucket",
            Self::NoSuchKey => "NoSuchKey",
            Self::NotFound => "NotFound",
            Self::NotImplemented => "NotImplemented",
        }
    }

    /// Returns the HTTP status code for this error code.
    #[must_use]
    pub fn default_status_code(&self) -> http::StatusCode {
        match self {
            Self::BadDigest
            | Self::InvalidArgument
            | Self::InvalidBucketName
            | Self::InvalidDigest
            | Self::InvalidRequest
            | Self::KeyTooLongError => http::StatusCode::BAD_REQUEST,
            Self::NoSuchBucket | Self::NoSuchKey | Self::NotFound => http::StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => http::StatusCode::METHOD_NOT_ALLOWED,
            Self::BucketAlreadyExists => http::StatusCode::CONFLICT,
            Self::NotImplemented => http::StatusCode::NOT_IMPLEMENTED,
            Self::InternalError => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the default human-readable message for this error code.
    #[must_use]
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::BadDigest => "The Content-MD5 you specified did not match what we received",
            Self::BucketAlreadyExists => "The requested bucket name is not available",
            Self::InternalError => "We encountered an internal error. Please try again.",
            Self::InvalidArgument => "Invalid Argument",
            Self::InvalidBucketName => "The specified bucket is not valid",
            Self::InvalidDigest => "The Content-MD5 you specified is not valid",
            Self::InvalidRequest => "Invalid Request",
            Self::KeyTooLongError => "Your key is too long",
            Self::MethodNotAllowed => "The specified method is not allowed against this resource",
            Self::NoSuchBucket => "The specified bucket does not exist",
            Self::NoSuchKey => "The specified key does not exist",
            Self::NotFound => "The specified resource does not exist",
            Self::NotImplemented => {
                "A header or query you provided implies functionality that is not implemented"
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error response sent back to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// The error code.
    pub code: ErrorCode,
    /// A human-readable error message.
    pub message: String,
    /// The resource that caused the error.
    pub resource: Option<String>,
    /// The request ID.
    pub request_id: Option<String>,
    /// The HTTP status code.
    pub status_code: http::StatusCode,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiError({}): {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Create a new error from a code, using its default message and status.
    #[must_use]
    pub fn new(code: ErrorCode) -> Self {
        Self {
            status_code: code.default_status_code(),
            message: code.default_message().to_owned(),
            code,
            resource: None,
            request_id: None,
        }
    }

    /// Create a new error with a custom message.
    #[must_use]
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status_code: code.default_status_code(),
            message: message.into(),
            code,
            resource: None,
            request_id: None,
        }
    }

    /// Set the resource that caused this error.
    #[must_use]
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Set the request ID.
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Create a NoSuchBucket error.
    #[must_use]
    pub fn no_such_bucket(bucket: impl Into<String>) -> Self {
        Self::new(ErrorCode::NoSuchBucket).with_resource(bucket)
    }

    /// Create a NoSuchKey error.
    #[must_use]
    pub fn no_such_key(key: impl Into<String>) -> Self {
        Self::new(ErrorCode::NoSuchKey).with_resource(key)
    }

    /// Create a BucketAlreadyExists error.
    #[must_use]
    pub fn bucket_already_exists(bucket: impl Into<String>) -> Self {
        Self::new(ErrorCode::BucketAlreadyExists).with_resource(bucket)
    }

    /// Create an InternalError carrying only the generic message.
    #[must_use]
    pub fn internal_error() -> Self {
        Self::new(ErrorCode::InternalError)
    }

    /// Create an InvalidArgument error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidArgument, message)
    }

    /// Create a MethodNotAllowed error.
    #[must_use]
    pub fn method_not_allowed(method: impl Into<String>) -> Self {
        Self::new(ErrorCode::MethodNotAllowed).with_resource(method)
    }

    /// Create a NotFound error for an unmatched route.
    #[must_use]
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound).with_resource(path)
    }

    /// Create a NotImplemented error naming the unsupported feature.
    #[must_use]
    pub fn not_implemented(feature: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotImplemented).with_resource(feature)
    }
}

/// Create an [`ApiError`] from an error code.
///
/// # Examples
///
/// ```
/// use minstore_model::api_error;
/// use minstore_model::error::ErrorCode;
///
/// let err = api_error!(NoSuchBucket);
/// assert_eq!(err.code, ErrorCode::NoSuchBucket);
///
/// let err = api_error!(InvalidArgument, "max-keys must be a number");
/// assert_eq!(err.message, "max-keys must be a number");
/// ```
#[macro_export]
macro_rules! api_error {
    ($code:ident) => {
        $crate::error::ApiError::new($crate::error::ErrorCode::$code)
    };
    ($code:ident, $msg:expr) => {
        $crate::error::ApiError::with_message($crate::error::ErrorCode::$code, $msg)
    };
}
