//! Operation dispatch: routes a resolved operation to its handler.

use std::sync::Arc;

use bytes::Bytes;
use http::Response;
use http_body::Body;
use minstore_codec::Encoding;
use minstore_core::Driver;
use minstore_model::{ApiError, Operation, api_error};

use crate::body::ResponseBody;
use crate::ops::{bucket, object};
use crate::router::RoutingContext;
use crate::service::HttpConfig;

/// Dispatch a routed request to the handler for its operation.
///
/// # Errors
///
/// Whatever the handler reports, already mapped to an [`ApiError`].
pub async fn dispatch_operation<B>(
    driver: &Arc<dyn Driver>,
    config: &HttpConfig,
    ctx: RoutingContext,
    parts: http::request::Parts,
    body: B,
    encoding: Encoding,
) -> Result<Response<ResponseBody>, ApiError>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let op = ctx.operation;
    tracing::debug!(operation = %op, bucket = ?ctx.bucket, key = ?ctx.key, "dispatching operation");

    match op {
        Operation::ListBuckets => bucket::list_buckets(driver.as_ref(), encoding).await,
        Operation::CreateBucket => {
            bucket::create_bucket(driver.as_ref(), require_bucket(&ctx)?).await
        }
        Operation::ListObjects => {
            bucket::list_objects(driver.as_ref(), require_bucket(&ctx)?, &ctx, encoding).await
        }
        Operation::CreateObject => {
            let (bucket, key) = require_object(&ctx)?;
            object::create_object(driver.as_ref(), bucket, key, &parts.headers, body).await
        }
        Operation::GetObject => {
            let (bucket, key) = require_object(&ctx)?;
            object::get_object(driver, bucket, key, config.stream_buffer_size).await
        }
        Operation::GetObjectMetadata => {
            let (bucket, key) = require_object(&ctx)?;
            object::head_object(driver.as_ref(), bucket, key).await
        }
    }
}

fn require_bucket(ctx: &RoutingContext) -> Result<&str, ApiError> {
    ctx.bucket
        .as_deref()
        .ok_or_else(|| api_error!(InvalidRequest, "missing bucket name"))
}

fn require_object(ctx: &RoutingContext) -> Result<(&str, &str), ApiError> {
    let bucket = require_bucket(ctx)?;
    let key = ctx
        .key
        .as_deref()
        .ok_or_else(|| api_error!(InvalidRequest, "missing object key"))?;
    Ok((bucket, key))
}
