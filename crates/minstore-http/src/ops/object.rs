//! Object-level handlers: create, download, metadata.
//!
//! Uploads hand the request body to the driver as a stream of frames.
//! Downloads run the driver in its own task, writing into a bounded
//! [`tokio::io::duplex`] pipe whose read half becomes the response body.

use std::io;
use std::sync::Arc;

use bytes::Bytes;
use futures::{StreamExt, TryStreamExt, stream};
use http::header::{CONTENT_LENGTH, CONTENT_TYPE, ETAG};
use http::{HeaderMap, Response, StatusCode};
use http_body::Body;
use http_body_util::BodyExt;
use minstore_core::checksums::{StreamingMd5, decode_content_md5};
use minstore_core::validation::validate_object_key;
use minstore_core::{ByteStream, Driver, DriverResult};
use minstore_model::metadata::DEFAULT_CONTENT_TYPE;
use minstore_model::{ApiError, api_error};
use tokio::io::DuplexStream;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::io::ReaderStream;
use tracing::{error, info};

use super::driver_error;
use crate::body::{ChunkStream, ResponseBody};
use crate::response::{build_response, set_object_headers, set_optional_header};

const CONTENT_MD5: &str = "content-md5";

/// Handle `PUT /{bucket}/{key}`.
///
/// A missing or empty `Content-Type` is stored as
/// `application/octet-stream`. A `Content-MD5` header is checked by the
/// driver against the streamed content.
///
/// # Errors
///
/// `InvalidArgument` (400) for a `Content-Type` that is not visible ASCII,
/// `InvalidDigest` (400) for an undecodable `Content-MD5`, key validation
/// errors, then whatever the driver reports.
pub async fn create_object<B>(
    driver: &dyn Driver,
    bucket: &str,
    key: &str,
    headers: &HeaderMap,
    body: B,
) -> Result<Response<ResponseBody>, ApiError>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    validate_object_key(key).map_err(driver_error)?;
    let content_type = request_content_type(headers)?;
    let expected_md5 = expected_md5(headers)?;

    let stream: ByteStream = Box::pin(TryStreamExt::map_err(
        body.into_data_stream(),
        io::Error::other,
    ));
    let metadata = driver
        .create_object(bucket, key, content_type, expected_md5.as_deref(), stream)
        .await
        .map_err(driver_error)?;
    info!(bucket, key, size = metadata.size, etag = %metadata.md5, "stored object");

    let builder = Response::builder().status(StatusCode::OK);
    let builder = set_optional_header(builder, ETAG, Some(&metadata.md5));
    build_response(builder.header(CONTENT_LENGTH, 0), ResponseBody::empty())
}

/// Handle `GET /{bucket}/{key}`.
///
/// Headers come from a fresh metadata lookup. The body streams through a pipe
/// of `buffer_size` bytes while its size and MD5 are tracked. If the driver
/// fails mid-transfer, or the bytes sent do not match the announced
/// `Content-Length` and `ETag` (the key was overwritten in between), the body
/// ends with an error so the connection is aborted instead of completing.
///
/// # Errors
///
/// `NoSuchBucket` / `NoSuchKey` (404) and driver faults detected before the
/// transfer starts.
pub async fn get_object(
    driver: &Arc<dyn Driver>,
    bucket: &str,
    key: &str,
    buffer_size: usize,
) -> Result<Response<ResponseBody>, ApiError> {
    let metadata = driver
        .get_object_metadata(bucket, key, "")
        .await
        .map_err(driver_error)?;

    let (mut writer, reader) = tokio::io::duplex(buffer_size.max(1));
    let task_driver = Arc::clone(driver);
    let (task_bucket, task_key) = (bucket.to_owned(), key.to_owned());
    let transfer = tokio::spawn(async move {
        task_driver
            .get_object(&mut writer, &task_bucket, &task_key)
            .await
    });

    let download = Download {
        reader: ReaderStream::with_capacity(reader, buffer_size.max(1)),
        transfer,
        digest: StreamingMd5::new(),
        expected_size: metadata.size,
        expected_md5: metadata.md5.clone(),
    };
    let chunks: ChunkStream = Box::pin(stream::unfold(Some(download), |state| async move {
        let Some(mut download) = state else {
            return None;
        };
        match download.reader.next().await {
            Some(Ok(chunk)) => {
                download.digest.update(&chunk);
                if download.digest.size() > download.expected_size {
                    error!(expected = download.expected_size, "object grew while streaming");
                    download.transfer.abort();
                    let err =
                        io::Error::new(io::ErrorKind::InvalidData, "object grew while streaming");
                    return Some((Err(err), None));
                }
                Some((Ok(chunk), Some(download)))
            }
            Some(Err(err)) => Some((Err(err), None)),
            None => download.finish().await.map(|err| (Err(err), None)),
        }
    }));

    let builder = set_object_headers(Response::builder().status(StatusCode::OK), &metadata);
    build_response(builder, ResponseBody::streaming(chunks, metadata.size))
}

/// Handle `HEAD /{bucket}/{key}`.
///
/// # Errors
///
/// `NoSuchBucket` / `NoSuchKey` (404) and driver faults.
pub async fn head_object(
    driver: &dyn Driver,
    bucket: &str,
    key: &str,
) -> Result<Response<ResponseBody>, ApiError> {
    let metadata = driver
        .get_object_metadata(bucket, key, "")
        .await
        .map_err(driver_error)?;
    let builder = set_object_headers(Response::builder().status(StatusCode::OK), &metadata);
    build_response(builder, ResponseBody::empty())
}

fn request_content_type(headers: &HeaderMap) -> Result<&str, ApiError> {
    let Some(value) = headers.get(CONTENT_TYPE) else {
        return Ok(DEFAULT_CONTENT_TYPE);
    };
    let value = value.to_str().map_err(|_| {
        ApiError::invalid_argument("Content-Type must be visible ASCII")
            .with_resource(CONTENT_TYPE.as_str())
    })?;
    let value = value.trim();
    if value.is_empty() {
        return Ok(DEFAULT_CONTENT_TYPE);
    }
    Ok(value)
}

fn expected_md5(headers: &HeaderMap) -> Result<Option<String>, ApiError> {
    let Some(value) = headers.get(CONTENT_MD5) else {
        return Ok(None);
    };
    value
        .to_str()
        .ok()
        .and_then(decode_content_md5)
        .map(Some)
        .ok_or_else(|| api_error!(InvalidDigest))
}

/// An in-flight download: the read half of the pipe, the driver task
/// filling it, and a running digest of what has been sent.
struct Download {
    reader: ReaderStream<DuplexStream>,
    transfer: JoinHandle<DriverResult<u64>>,
    digest: StreamingMd5,
    expected_size: u64,
    expected_md5: String,
}

impl Download {
    /// Wait for the driver once the pipe is drained. Returns the error that
    /// must end the body, if any.
    async fn finish(self) -> Option<io::Error> {
        let joined = self.transfer.await;
        transfer_outcome(joined, self.digest, self.expected_size, &self.expected_md5)
    }
}

/// Check a finished transfer: the driver must have succeeded and the bytes
/// sent must have the size and MD5 announced in the headers.
fn transfer_outcome(
    joined: Result<DriverResult<u64>, JoinError>,
    digest: StreamingMd5,
    expected_size: u64,
    expected_md5: &str,
) -> Option<io::Error> {
    match joined {
        Ok(Ok(_)) => {
            let (md5, size) = digest.finish();
            if size != expected_size {
                error!(size, expected_size, "object transfer length mismatch");
                return Some(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "object transfer length mismatch",
                ));
            }
            if !md5.eq_ignore_ascii_case(expected_md5) {
                error!(%md5, expected_md5, "object changed while streaming");
                return Some(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "object changed while streaming",
                ));
            }
            None
        }
        Ok(Err(err)) => {
            error!(error = %err, "driver failed while streaming object");
            Some(io::Error::other(err))
        }
        Err(err) => {
            error!(error = %err, "object transfer task failed");
            Some(io::Error::other(err))
        }
    }
}
