//! MD5 helpers for ETags and `Content-MD5` verification.
//!
//! # Streaming Hashing
//!
//! Object bodies arrive in chunks, so drivers feed them to a [`StreamingMd5`]
//! as they go and read the hex digest once the stream is exhausted.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use md5::{Digest, Md5};

/// Length of a raw MD5 digest in bytes.
const MD5_LEN: usize = 16;

/// Compute the lowercase hex MD5 of `data`.
///
/// # Examples
///
/// ```
/// use minstore_core::checksums::compute_md5;
///
/// assert_eq!(compute_md5(b""), "d41d8cd98f00b204e9800998ecf8427e");
/// ```
#[must_use]
pub fn compute_md5(data: &[u8]) -> String {
    hex::encode(Md5::digest(data))
}

/// Decode a `Content-MD5` header value (base64 of the raw digest) into
/// lowercase hex.
///
/// Returns `None` if the value is not valid base64 or does not decode to
/// exactly 16 bytes.
#[must_use]
pub fn decode_content_md5(header: &str) -> Option<String> {
    let raw = BASE64_STANDARD.decode(header.trim()).ok()?;
    (raw.len() == MD5_LEN).then(|| hex::encode(raw))
}

/// Incremental MD5 hasher that also counts the bytes it has seen.
#[derive(Debug, Default)]
pub struct StreamingMd5 {
    hasher: Md5,
    size: u64,
}

impl StreamingMd5 {
    /// Create an empty hasher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next chunk.
    pub fn update(&mut self, chunk: &[u8]) {
        self.hasher.update(chunk);
        self.size += chunk.len() as u64;
    }

    /// Number of bytes fed so far.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Consume the hasher, returning the hex digest and the total size.
    #[must_use]
    pub fn finish(self) -> (String, u64) {
        (hex::encode(self.hasher.finalize()), self.size)
    }
}
