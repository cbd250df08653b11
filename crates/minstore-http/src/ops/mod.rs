//! Operation handlers.
//!
//! Each handler validates its syntactic input, calls the [`Driver`], and
//! turns the result into a response. Driver failures go through the error
//! mapper (`From<DriverError> for ApiError`) after being logged here.
//!
//! [`Driver`]: minstore_core::Driver

pub mod bucket;
pub mod object;

use minstore_codec::CodecError;
use minstore_core::DriverError;
use minstore_model::ApiError;
use tracing::{debug, error};

/// Log a driver failure and map it to an API error.
///
/// Internal faults are logged in full; the client only sees the generic
/// `InternalError` message.
pub(crate) fn driver_error(err: DriverError) -> ApiError {
    if err.is_internal() {
        error!(error = %err, "driver fault");
    } else {
        debug!(error = %err, "driver rejected request");
    }
    err.into()
}

pub(crate) fn codec_error(err: CodecError) -> ApiError {
    error!(error = %err, "failed to encode response");
    ApiError::internal_error()
}
