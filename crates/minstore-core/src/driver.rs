//! The storage driver contract.
//!
//! A [`Driver`] is the only thing the HTTP layer knows about storage. Any backend
//! (in-memory, on-disk, a test double) plugs in by implementing it, and the
//! service holds it as `Arc<dyn Driver>`.
//!
//! Content moves as streams in both directions: [`Driver::create_object`] pulls
//! from a [`ByteStream`] and [`Driver::get_object`] pushes into an
//! [`AsyncWrite`] sink, so the caller never needs the whole object in memory.

use std::io;
use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use minstore_model::{BucketMetadata, BucketResourcesMetadata, ObjectMetadata};
use tokio::io::AsyncWrite;

use crate::error::DriverResult;

/// A request body as handed to [`Driver::create_object`].
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, io::Error>> + Send>>;

/// Capability contract every storage backend satisfies.
///
/// Implementations must be safe to call concurrently from many in-flight
/// requests, on the same or on different buckets and keys.
#[async_trait]
pub trait Driver: Send + Sync + 'static {
    /// Register a new bucket.
    ///
    /// Fails with [`DriverError::BucketExists`](crate::DriverError::BucketExists)
    /// when the name is already taken.
    async fn create_bucket(&self, bucket: &str) -> DriverResult<()>;

    /// List all buckets in ascending name order.
    async fn list_buckets(&self) -> DriverResult<Vec<BucketMetadata>>;

    /// Store `body` under `(bucket, key)`, replacing any previous content.
    ///
    /// The MD5 and size are computed while the stream is consumed. When
    /// `expected_md5` (lowercase hex) is given and does not match, nothing is
    /// stored and [`DriverError::BadDigest`](crate::DriverError::BadDigest) is
    /// returned. A stream error also leaves the previous object untouched.
    async fn create_object(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
        expected_md5: Option<&str>,
        body: ByteStream,
    ) -> DriverResult<ObjectMetadata>;

    /// Write the content of `(bucket, key)` into `sink`.
    ///
    /// Returns the number of bytes written.
    async fn get_object(
        &self,
        sink: &mut (dyn AsyncWrite + Send + Unpin),
        bucket: &str,
        key: &str,
    ) -> DriverResult<u64>;

    /// Fetch the metadata of `(bucket, key)`.
    ///
    /// `prefix` is a lookup hint for backends that resolve keys relative to a
    /// prefix. Backends without such a notion ignore it.
    async fn get_object_metadata(
        &self,
        bucket: &str,
        key: &str,
        prefix: &str,
    ) -> DriverResult<ObjectMetadata>;

    /// List one page of objects.
    ///
    /// Returns at most `resources.max_keys` entries (objects plus common
    /// prefixes) that sort after `resources.marker` and start with
    /// `resources.prefix`, in ascending key order, along with the updated
    /// listing state.
    async fn list_objects(
        &self,
        bucket: &str,
        resources: BucketResourcesMetadata,
    ) -> DriverResult<(Vec<ObjectMetadata>, BucketResourcesMetadata)>;
}
