//! Encoding selection.

use std::fmt;

use minstore_model::{ListBucketsResult, ListObjectsResult};

use crate::error::CodecError;
use crate::{json, xml};

/// Wire representation of a response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Encoding {
    /// S3 RestXml (the default).
    #[default]
    Xml,
    /// Plain JSON with the same field names.
    Json,
}

impl Encoding {
    /// The `Content-Type` header value for bodies in this encoding.
    #[must_use]
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Xml => "application/xml",
            Self::Json => "application/json",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Xml => "xml",
            Self::Json => "json",
        })
    }
}

/// Encode a bucket listing.
///
/// # Errors
///
/// Returns [`CodecError`] if the encoder fails.
pub fn encode_list_buckets(
    encoding: Encoding,
    result: &ListBucketsResult,
) -> Result<Vec<u8>, CodecError> {
    match encoding {
        Encoding::Xml => xml::to_xml(xml::LIST_BUCKETS_ROOT, result),
        Encoding::Json => json::list_buckets_to_json(result),
    }
}

/// Encode an object listing.
///
/// # Errors
///
/// Returns [`CodecError`] if the encoder fails.
pub fn encode_list_objects(
    encoding: Encoding,
    result: &ListObjectsResult,
) -> Result<Vec<u8>, CodecError> {
    match encoding {
        Encoding::Xml => xml::to_xml(xml::LIST_OBJECTS_ROOT, result),
        Encoding::Json => json::list_objects_to_json(result),
    }
}

/// Encode an error body.
#[must_use]
pub fn encode_error(
    encoding: Encoding,
    code: &str,
    message: &str,
    resource: Option<&str>,
    request_id: &str,
) -> Vec<u8> {
    match encoding {
        Encoding::Xml => xml::error_to_xml(code, message, resource, request_id),
        Encoding::Json => json::error_to_json(code, message, resource, request_id),
    }
}
