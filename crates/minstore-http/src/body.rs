//! Response body types supporting buffered, streamed and empty modes.
//!
//! - **Buffered**: listings, error documents, health probes.
//! - **Streaming**: object downloads, fed chunk by chunk from the driver.
//! - **Empty**: HEAD responses and bodiless confirmations.

use std::fmt;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::Stream;
use http_body::{Frame, SizeHint};
use http_body_util::Full;

/// A boxed stream of body chunks.
pub type ChunkStream = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send>>;

/// HTTP response body.
///
/// Implements [`http_body::Body`] so it can be used directly with hyper responses.
#[derive(Default)]
pub enum ResponseBody {
    /// Fully buffered payload.
    Buffered(Full<Bytes>),
    /// Chunked payload of a known total length.
    Streaming {
        /// Source of chunks. An `Err` item aborts the response.
        stream: ChunkStream,
        /// Number of bytes the stream is expected to yield.
        len: u64,
    },
    /// No payload.
    #[default]
    Empty,
}

impl ResponseBody {
    /// Create a buffered body from bytes.
    #[must_use]
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        Self::Buffered(Full::new(data.into()))
    }

    /// Create a buffered body from a UTF-8 string.
    #[must_use]
    pub fn from_string(s: impl Into<String>) -> Self {
        Self::Buffered(Full::new(Bytes::from(s.into())))
    }

    /// Create a streamed body that is expected to yield exactly `len` bytes.
    #[must_use]
    pub fn streaming(stream: ChunkStream, len: u64) -> Self {
        Self::Streaming { stream, len }
    }

    /// Create an empty body.
    #[must_use]
    pub fn empty() -> Self {
        Self::Empty
    }
}

impl fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buffered(full) => f.debug_tuple("Buffered").field(full).finish(),
            Self::Streaming { len, .. } => {
                f.debug_struct("Streaming").field("len", len).finish_non_exhaustive()
            }
            Self::Empty => f.write_str("Empty"),
        }
    }
}

impl http_body::Body for ResponseBody {
    type Data = Bytes;
    type Error = io::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        match self.get_mut() {
            Self::Buffered(full) => Pin::new(full)
                .poll_frame(cx)
                .map_err(|never| match never {}),
            Self::Streaming { stream, .. } => stream
                .as_mut()
                .poll_next(cx)
                .map(|item| item.map(|chunk| chunk.map(Frame::data))),
            Self::Empty => Poll::Ready(None),
        }
    }

    fn is_end_stream(&self) -> bool {
        match self {
            Self::Buffered(full) => full.is_end_stream(),
            Self::Streaming { .. } => false,
            Self::Empty => true,
        }
    }

    fn size_hint(&self) -> SizeHint {
        match self {
            Self::Buffered(full) => full.size_hint(),
            Self::Streaming { len, .. } => SizeHint::with_exact(*len),
            Self::Empty => SizeHint::with_exact(0),
        }
    }
}
