//! Bucket-level handlers: create, list buckets, list objects.

use http::header::LOCATION;
use http::{Response, StatusCode};
use minstore_codec::{Encoding, encode_list_buckets, encode_list_objects};
use minstore_core::Driver;
use minstore_core::validation::validate_bucket_name;
use minstore_model::metadata::DEFAULT_MAX_KEYS;
use minstore_model::{
    ApiError, BucketResourcesMetadata, ListBucketsResult, ListObjectsResult,
};
use tracing::info;

use super::{codec_error, driver_error};
use crate::body::ResponseBody;
use crate::response::{build_response, encoded_response, set_optional_header};
use crate::router::RoutingContext;

/// Handle `PUT /{bucket}`.
///
/// # Errors
///
/// `InvalidBucketName` (400) before the driver is consulted, then whatever the
/// driver reports (`BucketAlreadyExists` on a duplicate).
pub async fn create_bucket(
    driver: &dyn Driver,
    bucket: &str,
) -> Result<Response<ResponseBody>, ApiError> {
    validate_bucket_name(bucket).map_err(driver_error)?;
    driver.create_bucket(bucket).await.map_err(driver_error)?;
    info!(bucket, "created bucket");

    let location = format!("/{bucket}");
    let builder = Response::builder().status(StatusCode::OK);
    let builder = set_optional_header(builder, LOCATION, Some(&location));
    build_response(builder, ResponseBody::empty())
}

/// Handle `GET /`.
///
/// # Errors
///
/// Driver and encoding failures.
pub async fn list_buckets(
    driver: &dyn Driver,
    encoding: Encoding,
) -> Result<Response<ResponseBody>, ApiError> {
    let buckets = driver.list_buckets().await.map_err(driver_error)?;
    let result = ListBucketsResult { buckets };
    let payload = encode_list_buckets(encoding, &result).map_err(codec_error)?;
    encoded_response(encoding, payload)
}

/// Handle `GET /{bucket}` with `prefix`, `marker`, `delimiter` and `max-keys`.
///
/// # Errors
///
/// `NoSuchBucket` (404) when the bucket is absent, plus driver and encoding
/// failures.
pub async fn list_objects(
    driver: &dyn Driver,
    bucket: &str,
    ctx: &RoutingContext,
    encoding: Encoding,
) -> Result<Response<ResponseBody>, ApiError> {
    let query = listing_query(ctx);
    let (objects, resources) = driver
        .list_objects(bucket, query)
        .await
        .map_err(driver_error)?;

    let result = ListObjectsResult {
        bucket: bucket.to_owned(),
        resources,
        objects,
    };
    let payload = encode_list_objects(encoding, &result).map_err(codec_error)?;
    encoded_response(encoding, payload)
}

fn listing_query(ctx: &RoutingContext) -> BucketResourcesMetadata {
    let text = |name: &str| ctx.query_value(name).unwrap_or_default().to_owned();
    BucketResourcesMetadata {
        prefix: text("prefix"),
        delimiter: text("delimiter"),
        marker: text("marker"),
        max_keys: parse_max_keys(ctx.query_value("max-keys")),
        ..BucketResourcesMetadata::default()
    }
}

/// Parse `max-keys`: absent, negative or malformed values fall back to the
/// default, larger values are clamped to it.
fn parse_max_keys(raw: Option<&str>) -> usize {
    raw.and_then(|v| v.trim().parse::<usize>().ok())
        .map_or(DEFAULT_MAX_KEYS, |n| n.min(DEFAULT_MAX_KEYS))
}
