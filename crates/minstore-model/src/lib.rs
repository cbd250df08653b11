//! Shared model types for MinStore.
//!
//! Everything exchanged between the storage driver and the HTTP layer lives here:
//!
//! - [`metadata`]: bucket and object metadata plus the listing query/result record.
//! - [`listing`]: the logical listing results handed to the response encoders.
//! - [`operations`]: the closed set of operations the router can select.
//! - [`error`]: the wire-level API error with its code and HTTP status.
//!
//! The types carry no encoding-specific attributes. XML and JSON rendering
//! belongs to `minstore-codec`.

pub mod error;
pub mod listing;
pub mod metadata;
pub mod operations;

pub use error::{ApiError, ErrorCode};
pub use listing::{ListBucketsResult, ListObjectsResult};
pub use metadata::{BucketMetadata, BucketResourcesMetadata, ObjectMetadata};
pub use operations::Operation;
