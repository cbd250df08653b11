//! The HTTP service implementing hyper's `Service` trait.
//!
//! [`MinstoreService`] ties together negotiation, routing, dispatch and error
//! rendering. For every request it:
//!
//! 1. Assigns a request id
//! 2. Answers health probes (`GET /_health`)
//! 3. Picks the response encoding from `Accept`
//! 4. Routes the request (501 / 405 / 404 short-circuits happen here)
//! 5. Dispatches to the operation handler
//! 6. Adds common headers (`x-amz-request-id`, `Server`)

use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderValue, SERVER};
use http::{Method, Request, Response, StatusCode};
use http_body::Body;
use hyper::body::Incoming;
use hyper::service::Service;
use minstore_core::Driver;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::body::ResponseBody;
use crate::dispatch::dispatch_operation;
use crate::negotiate::negotiate;
use crate::response::error_to_response;
use crate::router::resolve;

const HEALTH_PATH: &str = "/_health";
const REQUEST_ID_HEADER: &str = "x-amz-request-id";

/// Configuration for the HTTP service.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Capacity in bytes of the pipe between the driver and a download.
    pub stream_buffer_size: usize,
    /// Value of the `Server` response header.
    pub server_name: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            stream_buffer_size: 65_536,
            server_name: "MinStore".to_owned(),
        }
    }
}

/// The MinStore HTTP service.
///
/// Cheap to clone: the driver and configuration are shared.
#[derive(Clone)]
pub struct MinstoreService {
    driver: Arc<dyn Driver>,
    config: Arc<HttpConfig>,
}

impl fmt::Debug for MinstoreService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MinstoreService")
            .field("driver", &"..")
            .field("config", &self.config)
            .finish()
    }
}

impl MinstoreService {
    /// Create a service over the given driver.
    #[must_use]
    pub fn new(driver: Arc<dyn Driver>, config: HttpConfig) -> Self {
        Self {
            driver,
            config: Arc::new(config),
        }
    }

    /// Serve one request end to end.
    ///
    /// Generic over the request body so the service can be driven in-process
    /// with buffered bodies as well as by hyper with [`Incoming`].
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    ///
    /// use bytes::Bytes;
    /// use http_body_util::Full;
    /// use minstore_core::MemoryDriver;
    /// use minstore_http::{HttpConfig, MinstoreService};
    ///
    /// # tokio_test::block_on(async {
    /// let service = MinstoreService::new(Arc::new(MemoryDriver::new()), HttpConfig::default());
    /// let req = http::Request::put("/photos").body(Full::new(Bytes::new())).unwrap();
    /// assert_eq!(service.handle(req).await.status(), 200);
    /// # });
    /// ```
    pub async fn handle<B>(&self, req: Request<B>) -> Response<ResponseBody>
    where
        B: Body<Data = Bytes> + Send + 'static,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let request_id = Uuid::new_v4().to_string();
        let response = self.process_request(req, &request_id).await;
        add_common_headers(response, &request_id, &self.config.server_name)
    }

    async fn process_request<B>(&self, req: Request<B>, request_id: &str) -> Response<ResponseBody>
    where
        B: Body<Data = Bytes> + Send + 'static,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let method = req.method().clone();
        let uri = req.uri().clone();
        debug!(%method, %uri, request_id, "processing request");

        if is_health_check(&method, uri.path()) {
            return health_check_response();
        }

        let encoding = negotiate(req.headers());
        let head_only = method == Method::HEAD;

        let ctx = match resolve(&req) {
            Ok(ctx) => ctx,
            Err(err) => {
                warn!(%method, %uri, error = %err, request_id, "failed to route request");
                let err = err.with_request_id(request_id);
                return error_to_response(&err, encoding, head_only);
            }
        };

        info!(
            operation = %ctx.operation,
            bucket = ?ctx.bucket,
            key = ?ctx.key,
            %encoding,
            request_id,
            "routed request"
        );

        let (parts, body) = req.into_parts();
        match dispatch_operation(&self.driver, &self.config, ctx, parts, body, encoding).await {
            Ok(response) => response,
            Err(err) => {
                debug!(error = %err, request_id, "operation returned error");
                error_to_response(&err.with_request_id(request_id), encoding, head_only)
            }
        }
    }
}

impl Service<Request<Incoming>> for MinstoreService {
    type Response = Response<ResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: Request<Incoming>) -> Self::Future {
        let service = self.clone();
        Box::pin(async move { Ok(service.handle(req).await) })
    }
}

fn is_health_check(method: &Method, path: &str) -> bool {
    *method == Method::GET && path == HEALTH_PATH
}

fn health_check_response() -> Response<ResponseBody> {
    let mut response = Response::new(ResponseBody::from_string(
        r#"{"status":"running","service":"minstore"}"#,
    ));
    *response.status_mut() = StatusCode::OK;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

/// Add `x-amz-request-id` and `Server` to every response.
fn add_common_headers(
    mut response: Response<ResponseBody>,
    request_id: &str,
    server_name: &str,
) -> Response<ResponseBody> {
    let headers = response.headers_mut();
    if let Ok(hv) = HeaderValue::from_str(request_id) {
        headers.insert(REQUEST_ID_HEADER, hv);
    }
    if let Ok(hv) = HeaderValue::from_str(server_name) {
        headers.insert(SERVER, hv);
    }
    response
}
