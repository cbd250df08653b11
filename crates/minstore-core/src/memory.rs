//! In-memory storage driver.
//!
//! Buckets live in a [`DashMap`] keyed by name. Each bucket keeps its objects in
//! a `BTreeMap` behind a [`parking_lot::RwLock`], which gives ordered listings
//! for free. Locks are only taken for the in-memory lookups and swaps, never
//! across an `.await`.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::StreamExt;
use minstore_model::{BucketMetadata, BucketResourcesMetadata, ObjectMetadata};
use parking_lot::RwLock;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use crate::checksums::StreamingMd5;
use crate::driver::{ByteStream, Driver};
use crate::error::{DriverError, DriverResult};
use crate::validation::{validate_bucket_name, validate_object_key};

/// A driver that keeps everything in process memory.
///
/// # Examples
///
/// ```
/// use minstore_core::{Driver, MemoryDriver};
///
/// # tokio_test::block_on(async {
/// let driver = MemoryDriver::new();
/// driver.create_bucket("photos").await.unwrap();
/// let buckets = driver.list_buckets().await.unwrap();
/// assert_eq!(buckets[0].name, "photos");
/// # });
/// ```
#[derive(Debug, Default)]
pub struct MemoryDriver {
    buckets: DashMap<String, Arc<MemoryBucket>>,
}

#[derive(Debug)]
struct MemoryBucket {
    metadata: BucketMetadata,
    objects: RwLock<BTreeMap<String, StoredObject>>,
}

#[derive(Debug, Clone)]
struct StoredObject {
    metadata: ObjectMetadata,
    data: Bytes,
}

impl MemoryDriver {
    /// Create an empty driver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone the bucket handle out of the map so no shard lock outlives the call.
    fn bucket(&self, name: &str) -> DriverResult<Arc<MemoryBucket>> {
        self.buckets
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| DriverError::BucketNotFound {
                bucket: name.to_owned(),
            })
    }

    fn stored_object(&self, bucket: &str, key: &str) -> DriverResult<StoredObject> {
        let handle = self.bucket(bucket)?;
        let objects = handle.objects.read();
        objects
            .get(key)
            .cloned()
            .ok_or_else(|| DriverError::ObjectNotFound {
                bucket: bucket.to_owned(),
                key: key.to_owned(),
            })
    }
}

#[async_trait]
impl Driver for MemoryDriver {
    async fn create_bucket(&self, bucket: &str) -> DriverResult<()> {
        validate_bucket_name(bucket)?;

        match self.buckets.entry(bucket.to_owned()) {
            Entry::Occupied(_) => Err(DriverError::BucketExists {
                bucket: bucket.to_owned(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(MemoryBucket {
                    metadata: BucketMetadata {
                        name: bucket.to_owned(),
                        created: Utc::now(),
                    },
                    objects: RwLock::new(BTreeMap::new()),
                }));
                info!(bucket = %bucket, "bucket created");
                Ok(())
            }
        }
    }

    async fn list_buckets(&self) -> DriverResult<Vec<BucketMetadata>> {
        let mut buckets: Vec<BucketMetadata> = self
            .buckets
            .iter()
            .map(|entry| entry.value().metadata.clone())
            .collect();
        buckets.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(buckets)
    }

    async fn create_object(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
        expected_md5: Option<&str>,
        mut body: ByteStream,
    ) -> DriverResult<ObjectMetadata> {
        validate_object_key(key)?;
        let handle = self.bucket(bucket)?;

        let mut hasher = StreamingMd5::new();
        let mut buf = BytesMut::new();
        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            hasher.update(&chunk);
            buf.extend_from_slice(&chunk);
        }
        let (md5, size) = hasher.finish();

        if let Some(expected) = expected_md5 {
            if !expected.eq_ignore_ascii_case(&md5) {
                return Err(DriverError::BadDigest {
                    expected: expected.to_owned(),
                    actual: md5,
                });
            }
        }

        let metadata = ObjectMetadata {
            bucket: bucket.to_owned(),
            key: key.to_owned(),
            content_type: content_type.to_owned(),
            created: Utc::now(),
            md5,
            size,
        };

        handle.objects.write().insert(
            key.to_owned(),
            StoredObject {
                metadata: metadata.clone(),
                data: buf.freeze(),
            },
        );

        debug!(bucket = %bucket, key = %key, size, md5 = %metadata.md5, "object stored");
        Ok(metadata)
    }

    async fn get_object(
        &self,
        sink: &mut (dyn AsyncWrite + Send + Unpin),
        bucket: &str,
        key: &str,
    ) -> DriverResult<u64> {
        let object = self.stored_object(bucket, key)?;
        sink.write_all(&object.data).await?;
        sink.flush().await?;
        Ok(object.data.len() as u64)
    }

    async fn get_object_metadata(
        &self,
        bucket: &str,
        key: &str,
        _prefix: &str,
    ) -> DriverResult<ObjectMetadata> {
        Ok(self.stored_object(bucket, key)?.metadata)
    }

    async fn list_objects(
        &self,
        bucket: &str,
        mut resources: BucketResourcesMetadata,
    ) -> DriverResult<(Vec<ObjectMetadata>, BucketResourcesMetadata)> {
        let handle = self.bucket(bucket)?;
        let objects = handle.objects.read();
        let page = list_page(&objects, &resources);
        drop(objects);

        debug!(
            bucket = %bucket,
            prefix = %resources.prefix,
            marker = %resources.marker,
            returned = page.objects.len(),
            truncated = page.is_truncated,
            "listed objects"
        );

        resources.is_truncated = page.is_truncated;
        resources.next_marker = page.next_marker;
        resources.common_prefixes = page.common_prefixes;
        Ok((page.objects, resources))
    }
}

/// One page of a listing.
#[derive(Debug, Default)]
struct ListPage {
    objects: Vec<ObjectMetadata>,
    common_prefixes: Vec<String>,
    is_truncated: bool,
    next_marker: Option<String>,
}

/// Walk the ordered key space after `marker` and collect up to `max_keys`
/// entries. Objects and common prefixes both count as entries.
fn list_page(
    objects: &BTreeMap<String, StoredObject>,
    resources: &BucketResourcesMetadata,
) -> ListPage {
    let prefix = resources.prefix.as_str();
    let delimiter = resources.delimiter.as_str();
    let marker = resources.marker.as_str();

    // Start at whichever of marker and prefix sorts later.
    let lower = if !marker.is_empty() && marker >= prefix {
        Bound::Excluded(marker)
    } else if !prefix.is_empty() {
        Bound::Included(prefix)
    } else {
        Bound::Unbounded
    };

    let mut page = ListPage::default();
    let mut last_entry: Option<String> = None;
    let mut count = 0usize;

    for (key, object) in objects.range::<str, _>((lower, Bound::Unbounded)) {
        // Every key past the prefix range sorts after it.
        if !key.starts_with(prefix) {
            break;
        }

        if !delimiter.is_empty() {
            let rest = &key[prefix.len()..];
            if let Some(pos) = rest.find(delimiter) {
                let group = &key[..prefix.len() + pos + delimiter.len()];
                // Group already emitted on this page or a previous one.
                if last_entry.as_deref() == Some(group) || (!marker.is_empty() && group <= marker)
                {
                    continue;
                }
                if count >= resources.max_keys {
                    page.is_truncated = true;
                    break;
                }
                page.common_prefixes.push(group.to_owned());
                last_entry = Some(group.to_owned());
                count += 1;
                continue;
            }
        }

        if count >= resources.max_keys {
            page.is_truncated = true;
            break;
        }
        page.objects.push(object.metadata.clone());
        last_entry = Some(key.clone());
        count += 1;
    }

    if page.is_truncated {
        page.next_marker = last_entry;
    }
    page
}
