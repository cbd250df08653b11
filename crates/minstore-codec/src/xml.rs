//! XML encoding following the S3 RestXml conventions.
//!
//! - Namespace: `http://s3.amazonaws.com/doc/2006-03-01/`
//! - Booleans: lowercase `true`/`false`
//! - Timestamps: ISO 8601 format (`2006-02-03T16:45:09.000Z`)
//! - XML declaration: `<?xml version="1.0" encoding="UTF-8"?>`

use std::io::{self, Write};

use minstore_model::{BucketMetadata, ListBucketsResult, ListObjectsResult, ObjectMetadata};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesText, Event};

use crate::error::CodecError;
use crate::{STORAGE_CLASS, format_timestamp};

/// The S3 XML namespace.
pub const S3_NAMESPACE: &str = "http://s3.amazonaws.com/doc/2006-03-01/";

/// Root element of a bucket listing.
pub const LIST_BUCKETS_ROOT: &str = "ListAllMyBucketsResult";

/// Root element of an object listing.
pub const LIST_OBJECTS_ROOT: &str = "ListBucketResult";

/// Types that write themselves as XML child elements.
///
/// The root element and namespace are added by [`to_xml`].
pub trait XmlSerialize {
    /// Serialize this value as XML child elements into the given writer.
    ///
    /// # Errors
    ///
    /// Returns `io::Error` if writing to the underlying writer fails.
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()>;
}

/// Serialize a value as a complete XML document with declaration and namespace.
///
/// # Errors
///
/// Returns [`CodecError`] if serialization fails.
pub fn to_xml<T: XmlSerialize>(root_element: &str, value: &T) -> Result<Vec<u8>, CodecError> {
    let mut buf = Vec::with_capacity(512);
    let mut writer = Writer::new(&mut buf);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    writer
        .create_element(root_element)
        .with_attribute(("xmlns", S3_NAMESPACE))
        .write_inner_content(|w| value.serialize_xml(w))?;

    Ok(buf)
}

/// Format an error as a flat `<Error>` document.
///
/// ```xml
/// <?xml version="1.0" encoding="UTF-8"?>
/// <Error>
///   <Code>NoSuchBucket</Code>
///   <Message>The specified bucket does not exist</Message>
///   <Resource>photos</Resource>
///   <RequestId>4442587FB7D0A2F9</RequestId>
/// </Error>
/// ```
#[must_use]
pub fn error_to_xml(
    code: &str,
    message: &str,
    resource: Option<&str>,
    request_id: &str,
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(256);
    // Writing to Vec<u8> is infallible; if this fails it means a logic error.
    if let Err(e) = write_error_xml(&mut buf, code, message, resource, request_id) {
        tracing::error!(error = %e, "failed to serialize error XML");
        buf.clear();
    }
    buf
}

fn write_error_xml(
    buf: &mut Vec<u8>,
    code: &str,
    message: &str,
    resource: Option<&str>,
    request_id: &str,
) -> io::Result<()> {
    let mut writer = Writer::new(buf);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    writer.create_element("Error").write_inner_content(|w| {
        write_text_element(w, "Code", code)?;
        write_text_element(w, "Message", message)?;
        write_optional_text(w, "Resource", resource)?;
        write_text_element(w, "RequestId", request_id)?;
        Ok(())
    })?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Helper functions for writing common XML patterns
// ---------------------------------------------------------------------------

/// Write a simple `<tag>text</tag>` element.
fn write_text_element<W: Write>(writer: &mut Writer<W>, tag: &str, text: &str) -> io::Result<()> {
    writer
        .create_element(tag)
        .write_text_content(BytesText::new(text))?;
    Ok(())
}

/// Write `<tag>text</tag>` only if the value is `Some`.
fn write_optional_text<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    value: Option<&str>,
) -> io::Result<()> {
    if let Some(v) = value {
        write_text_element(writer, tag, v)?;
    }
    Ok(())
}

fn write_bool<W: Write>(writer: &mut Writer<W>, tag: &str, value: bool) -> io::Result<()> {
    write_text_element(writer, tag, if value { "true" } else { "false" })
}

// ---------------------------------------------------------------------------
// Implementations
// ---------------------------------------------------------------------------

impl XmlSerialize for BucketMetadata {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        writer.create_element("Bucket").write_inner_content(|w| {
            write_text_element(w, "Name", &self.name)?;
            write_text_element(w, "CreationDate", &format_timestamp(&self.created))?;
            Ok(())
        })?;
        Ok(())
    }
}

impl XmlSerialize for ObjectMetadata {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        writer.create_element("Contents").write_inner_content(|w| {
            write_text_element(w, "Key", &self.key)?;
            write_text_element(w, "LastModified", &format_timestamp(&self.created))?;
            write_text_element(w, "ETag", &self.md5)?;
            write_text_element(w, "Size", &self.size.to_string())?;
            write_text_element(w, "StorageClass", STORAGE_CLASS)?;
            Ok(())
        })?;
        Ok(())
    }
}

impl XmlSerialize for ListBucketsResult {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        writer.create_element("Buckets").write_inner_content(|w| {
            for bucket in &self.buckets {
                bucket.serialize_xml(w)?;
            }
            Ok(())
        })?;
        Ok(())
    }
}

impl XmlSerialize for ListObjectsResult {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        let resources = &self.resources;
        write_text_element(writer, "Name", &self.bucket)?;
        write_text_element(writer, "Prefix", &resources.prefix)?;
        write_text_element(writer, "Marker", &resources.marker)?;
        write_text_element(writer, "MaxKeys", &resources.max_keys.to_string())?;
        if !resources.delimiter.is_empty() {
            write_text_element(writer, "Delimiter", &resources.delimiter)?;
        }
        write_bool(writer, "IsTruncated", resources.is_truncated)?;
        write_optional_text(writer, "NextMarker", resources.next_marker.as_deref())?;
        for object in &self.objects {
            object.serialize_xml(writer)?;
        }
        for prefix in &resources.common_prefixes {
            writer
                .create_element("CommonPrefixes")
                .write_inner_content(|w| write_text_element(w, "Prefix", prefix))?;
        }
        Ok(())
    }
}
