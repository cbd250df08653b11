//! Request routing.
//!
//! Maps an incoming request to an [`Operation`] by examining:
//!
//! - The HTTP method (GET, HEAD, PUT)
//! - Whether a bucket name is present (first path segment)
//! - Whether an object key is present (the rest of the path)
//! - Query parameters naming features this server does not implement
//!
//! Only path-style addressing is supported.

use std::borrow::Cow;

use http::Method;
use minstore_model::{ApiError, Operation};
use percent_encoding::percent_decode_str;

/// Query parameters that name recognized S3 sub-resources this server does
/// not implement. Their presence short-circuits to 501.
const UNIMPLEMENTED_FEATURES: &[&str] = &[
    "acl",
    "policy",
    "uploads",
    "uploadId",
    "partNumber",
    "versioning",
    "versions",
    "versionId",
    "replication",
    "tagging",
    "cors",
    "lifecycle",
    "website",
    "logging",
    "notification",
    "encryption",
    "torrent",
    "location",
    "delete",
    "object-lock",
    "retention",
    "legal-hold",
    "requestPayment",
    "accelerate",
];

/// The result of routing an HTTP request to an operation.
#[derive(Debug, Clone)]
pub struct RoutingContext {
    /// The decoded bucket name, if any.
    pub bucket: Option<String>,
    /// The decoded object key, if any.
    pub key: Option<String>,
    /// The identified operation.
    pub operation: Operation,
    /// Decoded query parameters, in request order.
    pub query_params: Vec<(String, String)>,
}

impl RoutingContext {
    /// Look up the first value of a query parameter.
    #[must_use]
    pub fn query_value(&self, key: &str) -> Option<&str> {
        query_value(&self.query_params, key)
    }
}

/// Resolve an HTTP request to a routing context.
///
/// # Errors
///
/// - `NotImplemented` (501) when the query names an unimplemented feature,
///   whatever the method or path.
/// - `MethodNotAllowed` (405) for methods other than GET, HEAD and PUT.
/// - `NotFound` (404) for a supported method on a path shape it does not serve.
/// - `InvalidArgument` (400) when the path or query does not percent-decode
///   to UTF-8.
pub fn resolve<B>(req: &http::Request<B>) -> Result<RoutingContext, ApiError> {
    let uri = req.uri();
    let query_params = parse_query_params(uri.query().unwrap_or(""))?;

    if let Some(feature) = unimplemented_feature(&query_params) {
        return Err(ApiError::not_implemented(feature));
    }

    let path = uri.path();
    let (bucket, key) = parse_path(path)?;
    let operation = identify_operation(req.method(), bucket.is_some(), key.is_some(), path)?;

    Ok(RoutingContext {
        bucket,
        key,
        operation,
        query_params,
    })
}

/// Split a path into bucket and key.
///
/// `/` yields neither, `/b` and `/b/` yield a bucket, `/b/k/x` yields bucket
/// `b` and key `k/x`. An empty first segment (`//k`) yields a key without a
/// bucket, which no route accepts.
fn parse_path(path: &str) -> Result<(Option<String>, Option<String>), ApiError> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    if trimmed.is_empty() {
        return Ok((None, None));
    }

    let (bucket_raw, key_raw) = match trimmed.split_once('/') {
        Some((bucket, key)) => (bucket, key),
        None => (trimmed, ""),
    };
    let bucket = (!bucket_raw.is_empty())
        .then(|| decode_uri_component(bucket_raw))
        .transpose()?;
    let key = (!key_raw.is_empty())
        .then(|| decode_uri_component(key_raw))
        .transpose()?;
    Ok((bucket, key))
}

/// Percent-decode one component. Sequences that do not form UTF-8 are
/// rejected rather than replaced, so distinct raw keys never collide.
fn decode_uri_component(s: &str) -> Result<String, ApiError> {
    percent_decode_str(s)
        .decode_utf8()
        .map(Cow::into_owned)
        .map_err(|_| {
            ApiError::invalid_argument("URI component is not valid UTF-8").with_resource(s)
        })
}

/// Parse a raw query string into decoded key/value pairs.
///
/// `+` is treated literally; clients encode spaces as `%20`.
fn parse_query_params(query: &str) -> Result<Vec<(String, String)>, ApiError> {
    query
        .split('&')
        .filter(|s| !s.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => Ok((decode_uri_component(key)?, decode_uri_component(value)?)),
            None => Ok((decode_uri_component(pair)?, String::new())),
        })
        .collect()
}

fn query_value<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn unimplemented_feature(params: &[(String, String)]) -> Option<&'static str> {
    UNIMPLEMENTED_FEATURES
        .iter()
        .copied()
        .find(|feature| params.iter().any(|(k, _)| k == feature))
}

fn identify_operation(
    method: &Method,
    has_bucket: bool,
    has_key: bool,
    path: &str,
) -> Result<Operation, ApiError> {
    match (method, has_bucket, has_key) {
        (&Method::GET, false, false) => Ok(Operation::ListBuckets),
        (&Method::GET, true, false) => Ok(Operation::ListObjects),
        (&Method::GET, true, true) => Ok(Operation::GetObject),
        (&Method::HEAD, true, true) => Ok(Operation::GetObjectMetadata),
        (&Method::PUT, true, false) => Ok(Operation::CreateBucket),
        (&Method::PUT, true, true) => Ok(Operation::CreateObject),
        (&Method::GET | &Method::HEAD | &Method::PUT, _, _) => Err(ApiError::not_found(path)),
        (other, _, _) => Err(ApiError::method_not_allowed(other.as_str())),
    }
}
