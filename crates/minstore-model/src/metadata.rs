//! Metadata records exchanged between the driver and the HTTP layer.

use chrono::{DateTime, Utc};

/// Page size cap applied when a listing does not ask for one, and the upper
/// bound for any requested page size.
pub const DEFAULT_MAX_KEYS: usize = 1000;

/// Content type stored when a client does not send one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// A bucket as reported by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketMetadata {
    /// Bucket name, unique across the store.
    pub name: String,
    /// Creation time.
    pub created: DateTime<Utc>,
}

/// An object's metadata, computed when the object is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMetadata {
    /// Owning bucket.
    pub bucket: String,
    /// Object key, unique within the bucket.
    pub key: String,
    /// Content type recorded at creation. Never empty.
    pub content_type: String,
    /// Creation time, reported as `Last-Modified`.
    pub created: DateTime<Utc>,
    /// Lowercase hex MD5 of the content. Doubles as the ETag.
    pub md5: String,
    /// Content length in bytes.
    pub size: u64,
}

/// Listing query sent to the driver and the page description it returns.
///
/// The driver reads `prefix`, `delimiter`, `marker` and `max_keys`, and fills
/// in `is_truncated`, `next_marker` and `common_prefixes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketResourcesMetadata {
    /// Only keys starting with this prefix are listed.
    pub prefix: String,
    /// Groups keys sharing the segment after `prefix` up to this delimiter.
    pub delimiter: String,
    /// Exclusive lower bound: only entries sorting after it are listed.
    pub marker: String,
    /// Page size cap.
    pub max_keys: usize,
    /// Whether more entries exist past this page.
    pub is_truncated: bool,
    /// Marker that resumes right after this page, set when truncated.
    pub next_marker: Option<String>,
    /// Grouped key prefixes, in lexicographic order.
    pub common_prefixes: Vec<String>,
}

impl Default for BucketResourcesMetadata {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            delimiter: String::new(),
            marker: String::new(),
            max_keys: DEFAULT_MAX_KEYS,
            is_truncated: false,
            next_marker: None,
            common_prefixes: Vec::new(),
        }
    }
}
