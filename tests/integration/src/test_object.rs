//! Object upload, download and metadata tests.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bytes::Bytes;
    use minstore_core::checksums::compute_md5;
    use minstore_core::{Driver, MemoryDriver};
    use minstore_http::HttpConfig;
    use minstore_http::response::format_http_date;

    use crate::{TestServer, content_md5};

    fn header(resp: &reqwest::Response, name: &str) -> Option<String> {
        resp.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToOwned::to_owned)
    }

    #[tokio::test]
    async fn test_should_put_and_get_object() {
        let driver: Arc<dyn Driver> = Arc::new(MemoryDriver::new());
        let server = TestServer::start_with(Arc::clone(&driver), HttpConfig::default()).await;
        let bucket = server.create_bucket("putget").await;

        let resp = server
            .client()
            .put(server.url(&format!("/{bucket}/greeting.txt")))
            .header("Content-Type", "text/plain")
            .body("hello world")
            .send()
            .await
            .expect("put object");
        assert_eq!(resp.status(), 200);
        assert_eq!(
            header(&resp, "etag").as_deref(),
            Some("5eb63bbbe01eeed093cb22bb8f5acdc3")
        );

        let resp = server
            .client()
            .get(server.url(&format!("/{bucket}/greeting.txt")))
            .send()
            .await
            .expect("get object");
        assert_eq!(resp.status(), 200);
        assert_eq!(header(&resp, "content-type").as_deref(), Some("text/plain"));
        assert_eq!(header(&resp, "content-length").as_deref(), Some("11"));
        assert_eq!(
            header(&resp, "etag").as_deref(),
            Some("5eb63bbbe01eeed093cb22bb8f5acdc3")
        );

        let stored = driver
            .get_object_metadata(&bucket, "greeting.txt", "")
            .await
            .expect("stored metadata");
        assert_eq!(header(&resp, "etag"), Some(stored.md5));
        assert_eq!(header(&resp, "content-length"), Some(stored.size.to_string()));
        assert_eq!(header(&resp, "content-type"), Some(stored.content_type));
        assert_eq!(header(&resp, "last-modified"), Some(format_http_date(&stored.created)));
        assert_eq!(resp.bytes().await.expect("body"), Bytes::from_static(b"hello world"));
    }

    #[tokio::test]
    async fn test_should_match_head_and_get_headers() {
        let server = TestServer::start().await;
        let bucket = server.create_bucket("head").await;
        server.put_object(&bucket, "file.bin", vec![7u8; 2048]).await;

        let url = server.url(&format!("/{bucket}/file.bin"));
        let head = server.client().head(&url).send().await.expect("head");
        assert_eq!(head.status(), 200);
        let get = server.client().get(&url).send().await.expect("get");

        for name in ["content-length", "content-type", "etag", "last-modified"] {
            assert!(header(&head, name).is_some(), "{name} missing on HEAD");
            assert_eq!(header(&head, name), header(&get, name), "{name}");
        }
        assert_eq!(header(&head, "content-length").as_deref(), Some("2048"));
        let etag = header(&get, "etag");
        let body = get.bytes().await.expect("body");
        assert_eq!(body.len(), 2048);
        assert_eq!(etag, Some(compute_md5(&body)));
        assert!(head.bytes().await.expect("body").is_empty());
    }

    #[tokio::test]
    async fn test_should_handle_zero_byte_object() {
        let server = TestServer::start().await;
        let bucket = server.create_bucket("empty").await;
        server.put_object(&bucket, "nothing", Vec::new()).await;

        let resp = server
            .client()
            .get(server.url(&format!("/{bucket}/nothing")))
            .send()
            .await
            .expect("get object");
        assert_eq!(resp.status(), 200);
        assert_eq!(header(&resp, "content-length").as_deref(), Some("0"));
        assert_eq!(
            header(&resp, "etag").as_deref(),
            Some("d41d8cd98f00b204e9800998ecf8427e")
        );
        assert!(resp.bytes().await.expect("body").is_empty());
    }

    #[tokio::test]
    async fn test_should_default_and_preserve_content_type() {
        let server = TestServer::start().await;
        let bucket = server.create_bucket("ctype").await;
        server.put_object(&bucket, "raw", "bytes").await;

        let resp = server
            .client()
            .put(server.url(&format!("/{bucket}/doc.json")))
            .header("Content-Type", "application/json")
            .body("{}")
            .send()
            .await
            .expect("put object");
        assert_eq!(resp.status(), 200);

        let raw = server
            .client()
            .head(server.url(&format!("/{bucket}/raw")))
            .send()
            .await
            .expect("head raw");
        assert_eq!(
            header(&raw, "content-type").as_deref(),
            Some("application/octet-stream")
        );

        let doc = server
            .client()
            .get(server.url(&format!("/{bucket}/doc.json")))
            .send()
            .await
            .expect("get doc");
        assert_eq!(header(&doc, "content-type").as_deref(), Some("application/json"));
    }

    #[tokio::test]
    async fn test_should_overwrite_existing_object() {
        let server = TestServer::start().await;
        let bucket = server.create_bucket("overwrite").await;
        server.put_object(&bucket, "k", "first version").await;
        server.put_object(&bucket, "k", "second").await;

        let body = server
            .client()
            .get(server.url(&format!("/{bucket}/k")))
            .send()
            .await
            .expect("get object")
            .text()
            .await
            .expect("body");
        assert_eq!(body, "second");
    }

    #[tokio::test]
    async fn test_should_verify_content_md5() {
        let server = TestServer::start().await;
        let bucket = server.create_bucket("md5").await;
        let url = server.url(&format!("/{bucket}/checked"));

        let resp = server
            .client()
            .put(&url)
            .header("Content-MD5", content_md5(b"payload"))
            .body("payload")
            .send()
            .await
            .expect("put with digest");
        assert_eq!(resp.status(), 200);

        let resp = server
            .client()
            .put(&url)
            .header("Content-MD5", content_md5(b"other"))
            .body("tampered")
            .send()
            .await
            .expect("put with wrong digest");
        assert_eq!(resp.status(), 400);
        assert!(resp.text().await.expect("body").contains("<Code>BadDigest</Code>"));

        let resp = server
            .client()
            .put(&url)
            .header("Content-MD5", "%%%")
            .body("payload")
            .send()
            .await
            .expect("put with garbage digest");
        assert_eq!(resp.status(), 400);
        assert!(resp.text().await.expect("body").contains("<Code>InvalidDigest</Code>"));

        let body = server.client().get(&url).send().await.expect("get").text().await.expect("body");
        assert_eq!(body, "payload");
    }

    #[tokio::test]
    async fn test_should_address_keys_with_slashes_and_escapes() {
        let server = TestServer::start().await;
        let bucket = server.create_bucket("keys").await;
        server
            .put_object(&bucket, "dir/sub/hello%20world.txt", "nested")
            .await;

        let resp = server
            .client()
            .get(server.url(&format!("/{bucket}/dir/sub/hello%20world.txt")))
            .send()
            .await
            .expect("get object");
        assert_eq!(resp.status(), 200);

        let listing = server
            .client()
            .get(server.url(&format!("/{bucket}?prefix=dir%2F")))
            .send()
            .await
            .expect("list")
            .text()
            .await
            .expect("body");
        assert!(listing.contains("<Key>dir/sub/hello world.txt</Key>"));
    }

    #[tokio::test]
    async fn test_should_stream_large_object_through_small_pipe() {
        let config = HttpConfig {
            stream_buffer_size: 1024,
            ..HttpConfig::default()
        };
        let server = TestServer::start_with(Arc::new(MemoryDriver::new()), config).await;
        let bucket = server.create_bucket("large").await;

        let content: Vec<u8> = (0..3 * 1024 * 1024u32)
            .map(|i| u8::try_from(i % 251).expect("fits in u8"))
            .collect();
        server.put_object(&bucket, "blob", content.clone()).await;

        let resp = server
            .client()
            .get(server.url(&format!("/{bucket}/blob")))
            .send()
            .await
            .expect("get object");
        assert_eq!(
            header(&resp, "content-length").as_deref(),
            Some("3145728")
        );
        let body = resp.bytes().await.expect("body");
        assert_eq!(body.len(), content.len());
        assert!(body.as_ref() == content.as_slice());
    }

    #[tokio::test]
    async fn test_should_return_404_for_missing_object_or_bucket() {
        let server = TestServer::start().await;
        let bucket = server.create_bucket("missing").await;

        let resp = server
            .client()
            .get(server.url(&format!("/{bucket}/ghost")))
            .send()
            .await
            .expect("get object");
        assert_eq!(resp.status(), 404);
        assert!(resp.text().await.expect("body").contains("<Code>NoSuchKey</Code>"));

        let resp = server
            .client()
            .get(server.url("/no-such-bucket/anykey"))
            .send()
            .await
            .expect("get object");
        assert_eq!(resp.status(), 404);
        assert!(resp.text().await.expect("body").contains("<Code>NoSuchBucket</Code>"));

        let resp = server
            .client()
            .put(server.url("/no-such-bucket/anykey"))
            .body("data")
            .send()
            .await
            .expect("put object");
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn test_should_reject_overlong_key() {
        let server = TestServer::start().await;
        let bucket = server.create_bucket("longkey").await;
        let key = "k".repeat(1025);

        let resp = server
            .client()
            .put(server.url(&format!("/{bucket}/{key}")))
            .body("data")
            .send()
            .await
            .expect("put object");
        assert_eq!(resp.status(), 400);
        assert!(resp.text().await.expect("body").contains("<Code>KeyTooLongError</Code>"));
    }
}
