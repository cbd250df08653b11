//! Logical listing results.
//!
//! One structure per listing endpoint. The XML and JSON encoders in
//! `minstore-codec` both render these, so the two forms always carry the same
//! values in the same order.

use crate::metadata::{BucketMetadata, BucketResourcesMetadata, ObjectMetadata};

/// Result of listing all buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListBucketsResult {
    /// Buckets in the order the driver returned them.
    pub buckets: Vec<BucketMetadata>,
}

/// Result of listing the objects of one bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListObjectsResult {
    /// The listed bucket.
    pub bucket: String,
    /// The query as answered by the driver, including truncation state.
    pub resources: BucketResourcesMetadata,
    /// Objects in the order the driver returned them.
    pub objects: Vec<ObjectMetadata>,
}
