//! JSON encoding.
//!
//! Serializable views borrow from the model results and mirror the XML element
//! names one to one, minus the document root and namespace. Empty repeated
//! fields are omitted, just as the XML form has no element for them.

use minstore_model::{BucketMetadata, ListBucketsResult, ListObjectsResult, ObjectMetadata};
use serde::Serialize;

use crate::error::CodecError;
use crate::{STORAGE_CLASS, format_timestamp};

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct BucketListView<'a> {
    buckets: BucketsView<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct BucketsView<'a> {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    bucket: Vec<BucketView<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct BucketView<'a> {
    name: &'a str,
    creation_date: String,
}

impl<'a> From<&'a BucketMetadata> for BucketView<'a> {
    fn from(bucket: &'a BucketMetadata) -> Self {
        Self {
            name: &bucket.name,
            creation_date: format_timestamp(&bucket.created),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ObjectListView<'a> {
    name: &'a str,
    prefix: &'a str,
    marker: &'a str,
    max_keys: usize,
    #[serde(skip_serializing_if = "str::is_empty")]
    delimiter: &'a str,
    is_truncated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_marker: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    contents: Vec<ObjectView<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    common_prefixes: Vec<CommonPrefixView<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ObjectView<'a> {
    key: &'a str,
    last_modified: String,
    #[serde(rename = "ETag")]
    etag: &'a str,
    size: u64,
    storage_class: &'static str,
}

impl<'a> From<&'a ObjectMetadata> for ObjectView<'a> {
    fn from(object: &'a ObjectMetadata) -> Self {
        Self {
            key: &object.key,
            last_modified: format_timestamp(&object.created),
            etag: &object.md5,
            size: object.size,
            storage_class: STORAGE_CLASS,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct CommonPrefixView<'a> {
    prefix: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ErrorView<'a> {
    code: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    resource: Option<&'a str>,
    request_id: &'a str,
}

/// Encode a bucket listing as JSON.
///
/// # Errors
///
/// Returns [`CodecError::Json`] if serialization fails.
pub fn list_buckets_to_json(result: &ListBucketsResult) -> Result<Vec<u8>, CodecError> {
    let view = BucketListView {
        buckets: BucketsView {
            bucket: result.buckets.iter().map(BucketView::from).collect(),
        },
    };
    Ok(serde_json::to_vec(&view)?)
}

/// Encode an object listing as JSON.
///
/// # Errors
///
/// Returns [`CodecError::Json`] if serialization fails.
pub fn list_objects_to_json(result: &ListObjectsResult) -> Result<Vec<u8>, CodecError> {
    let resources = &result.resources;
    let view = ObjectListView {
        name: &result.bucket,
        prefix: &resources.prefix,
        marker: &resources.marker,
        max_keys: resources.max_keys,
        delimiter: &resources.delimiter,
        is_truncated: resources.is_truncated,
        next_marker: resources.next_marker.as_deref(),
        contents: result.objects.iter().map(ObjectView::from).collect(),
        common_prefixes: resources
            .common_prefixes
            .iter()
            .map(|prefix| CommonPrefixView { prefix })
            .collect(),
    };
    Ok(serde_json::to_vec(&view)?)
}

/// Encode an error as a flat JSON object.
#[must_use]
pub fn error_to_json(
    code: &str,
    message: &str,
    resource: Option<&str>,
    request_id: &str,
) -> Vec<u8> {
    let view = ErrorView {
        code,
        message,
        resource,
        request_id,
    };
    serde_json::to_vec(&view).unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to serialize error JSON");
        Vec::new()
    })
}
