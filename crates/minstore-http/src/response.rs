//! Response construction: object headers, encoded listings and error bodies.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use http::header::{CONTENT_LENGTH, CONTENT_TYPE, ETAG, HeaderValue, LAST_MODIFIED};
use http::{Response, StatusCode};
use minstore_codec::{Encoding, encode_error};
use minstore_model::{ApiError, ObjectMetadata};

use crate::body::ResponseBody;

/// Format a timestamp as an RFC 1123 HTTP date (`Mon, 03 Nov 2014 12:30:05 GMT`).
#[must_use]
pub fn format_http_date(dt: &DateTime<Utc>) -> String {
    dt.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Set a header only if the value is a valid header value.
pub(crate) fn set_optional_header(
    mut builder: http::response::Builder,
    name: impl http::header::IntoHeaderName,
    value: Option<&str>,
) -> http::response::Builder {
    if let Some(hv) = value.and_then(|v| HeaderValue::from_str(v).ok()) {
        if let Some(headers) = builder.headers_mut() {
            headers.insert(name, hv);
        }
    }
    builder
}

/// Set `Last-Modified`, `Content-Length`, `Content-Type` and `ETag` from
/// object metadata.
pub(crate) fn set_object_headers(
    builder: http::response::Builder,
    metadata: &ObjectMetadata,
) -> http::response::Builder {
    let builder = set_optional_header(
        builder,
        LAST_MODIFIED,
        Some(&format_http_date(&metadata.created)),
    );
    let builder = builder.header(CONTENT_LENGTH, metadata.size);
    let builder = set_optional_header(builder, CONTENT_TYPE, Some(&metadata.content_type));
    set_optional_header(builder, ETAG, Some(&metadata.md5))
}

/// Build a response from a builder, converting build errors to `ApiError`.
pub(crate) fn build_response(
    builder: http::response::Builder,
    body: ResponseBody,
) -> Result<Response<ResponseBody>, ApiError> {
    builder.body(body).map_err(|e| {
        tracing::error!(error = %e, "failed to build HTTP response");
        ApiError::internal_error()
    })
}

/// A 200 response carrying an encoded listing.
pub(crate) fn encoded_response(
    encoding: Encoding,
    payload: Vec<u8>,
) -> Result<Response<ResponseBody>, ApiError> {
    let builder = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, encoding.content_type())
        .header(CONTENT_LENGTH, payload.len());
    build_response(builder, ResponseBody::from_bytes(Bytes::from(payload)))
}

/// Convert an [`ApiError`] into a response.
///
/// The body is an error document in the negotiated encoding, carrying the
/// error's request id, or nothing at all when `head_only` is set.
#[must_use]
pub fn error_to_response(
    err: &ApiError,
    encoding: Encoding,
    head_only: bool,
) -> Response<ResponseBody> {
    let mut response = if head_only {
        Response::new(ResponseBody::empty())
    } else {
        let payload = encode_error(
            encoding,
            err.code.as_str(),
            &err.message,
            err.resource.as_deref(),
            err.request_id.as_deref().unwrap_or_default(),
        );
        let mut response = Response::new(ResponseBody::from_bytes(Bytes::from(payload)));
        response.headers_mut().insert(
            CONTENT_TYPE,
            HeaderValue::from_static(encoding.content_type()),
        );
        response
    };
    *response.status_mut() = err.status_code;
    response
}
