//! The operations the router can select.

use std::fmt;

/// All supported operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `GET /`
    ListBuckets,
    /// `PUT /{bucket}`
    CreateBucket,
    /// `GET /{bucket}`
    ListObjects,
    /// `PUT /{bucket}/{key}`
    CreateObject,
    /// `GET /{bucket}/{key}`
    GetObject,
    /// `HEAD /{bucket}/{key}`
    GetObjectMetadata,
}

impl Operation {
    /// Returns the operation name as a static string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ListBuckets => "ListBuckets",
            Self::CreateBucket => "CreateBucket",
            Self::ListObjects => "ListObjects",
            Self::CreateObject => "CreateObject",
            Self::GetObject => "GetObject",
            Self::GetObjectMetadata => "GetObjectMetadata",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
