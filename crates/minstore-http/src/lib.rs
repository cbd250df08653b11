//! HTTP layer for MinStore.
//!
//! This crate turns HTTP requests into driver calls and driver results into
//! HTTP responses:
//!
//! ```text
//! Request ─► service ─► router ─► dispatch ─► ops::* ─► Driver
//!               │                                │
//!               └─ negotiate (Accept) ──► response / codec ◄─┘
//! ```
//!
//! - [`router`]: method + path + query to an [`Operation`](minstore_model::Operation),
//!   answering unimplemented feature flags with 501 before anything else runs.
//! - [`negotiate`]: picks XML or JSON from the `Accept` header.
//! - [`ops`]: one handler per operation.
//! - [`response`]: header synthesis and error responses.
//! - [`body`]: the response body type, buffered or streamed.
//! - [`service`]: the hyper `Service` tying it together.

pub mod body;
pub mod dispatch;
pub mod negotiate;
pub mod ops;
pub mod response;
pub mod router;
pub mod service;

pub use body::ResponseBody;
pub use service::{HttpConfig, MinstoreService};
