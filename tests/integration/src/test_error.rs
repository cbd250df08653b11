//! Routing errors and error body tests.

#[cfg(test)]
mod tests {
    use reqwest::Method;
    use serde_json::Value;

    use crate::TestServer;

    #[tokio::test]
    async fn test_should_return_501_for_unimplemented_flags_regardless_of_target() {
        let server = TestServer::start().await;
        let bucket = server.create_bucket("flags").await;
        server.put_object(&bucket, "k", "v").await;

        for (method, path) in [
            (Method::GET, format!("/{bucket}?acl")),
            (Method::GET, "/missing-bucket?acl".to_owned()),
            (Method::PUT, format!("/{bucket}/k?tagging")),
            (Method::GET, format!("/{bucket}/k?versionId=3")),
            (Method::POST, format!("/{bucket}?uploads")),
            (Method::GET, "/?location".to_owned()),
        ] {
            let resp = server
                .client()
                .request(method.clone(), server.url(&path))
                .send()
                .await
                .expect("request");
            assert_eq!(resp.status(), 501, "{method} {path}");
            let body = resp.text().await.expect("body");
            assert!(body.contains("<Code>NotImplemented</Code>"), "{path}");
        }

        // The flagged PUT must not have reached the driver.
        let body = server
            .client()
            .get(server.url(&format!("/{bucket}/k")))
            .send()
            .await
            .expect("get")
            .text()
            .await
            .expect("body");
        assert_eq!(body, "v");
    }

    #[tokio::test]
    async fn test_should_reject_keys_that_are_not_utf8() {
        let server = TestServer::start().await;
        let bucket = server.create_bucket("utf8").await;

        let resp = server
            .client()
            .put(server.url(&format!("/{bucket}/%FF")))
            .body("secret")
            .send()
            .await
            .expect("put");
        assert_eq!(resp.status(), 400);
        let body = resp.text().await.expect("body");
        assert!(body.contains("<Code>InvalidArgument</Code>"));

        // Other invalid sequences are rejected too, never aliased to one key.
        let resp = server
            .client()
            .get(server.url(&format!("/{bucket}/%FE")))
            .send()
            .await
            .expect("get");
        assert_eq!(resp.status(), 400);

        let resp = server
            .client()
            .get(server.url(&format!("/{bucket}?prefix=%FF")))
            .send()
            .await
            .expect("list");
        assert_eq!(resp.status(), 400);
    }

    #[tokio::test]
    async fn test_should_return_405_for_unsupported_methods() {
        let server = TestServer::start().await;
        for method in [Method::DELETE, Method::POST, Method::PATCH] {
            let resp = server
                .client()
                .request(method.clone(), server.url("/bucket/key"))
                .send()
                .await
                .expect("request");
            assert_eq!(resp.status(), 405, "{method}");
            let body = resp.text().await.expect("body");
            assert!(body.contains("<Code>MethodNotAllowed</Code>"));
        }
    }

    #[tokio::test]
    async fn test_should_return_404_for_unserved_shapes() {
        let server = TestServer::start().await;
        let bucket = server.create_bucket("shapes").await;

        let resp = server.client().put(server.url("/")).send().await.expect("put /");
        assert_eq!(resp.status(), 404);

        let resp = server
            .client()
            .head(server.url(&format!("/{bucket}")))
            .send()
            .await
            .expect("head bucket");
        assert_eq!(resp.status(), 404);
        assert!(resp.bytes().await.expect("body").is_empty());
    }

    #[tokio::test]
    async fn test_should_send_head_errors_without_body() {
        let server = TestServer::start().await;
        let resp = server
            .client()
            .head(server.url("/nope/key"))
            .send()
            .await
            .expect("head");
        assert_eq!(resp.status(), 404);
        assert!(resp.headers().contains_key("x-amz-request-id"));
        assert!(resp.bytes().await.expect("body").is_empty());
    }

    #[tokio::test]
    async fn test_should_render_errors_as_json_when_negotiated() {
        let server = TestServer::start().await;
        let resp = server
            .client()
            .get(server.url("/nope/key"))
            .header("Accept", "application/json")
            .send()
            .await
            .expect("get");
        assert_eq!(resp.status(), 404);
        let request_id = resp
            .headers()
            .get("x-amz-request-id")
            .and_then(|v| v.to_str().ok())
            .expect("request id")
            .to_owned();
        let value: Value = resp.json().await.expect("json body");
        assert_eq!(value["Code"], "NoSuchBucket");
        assert_eq!(value["Resource"], "nope");
        assert_eq!(value["RequestId"], request_id.as_str());
        assert!(value["Message"].as_str().is_some_and(|m| !m.is_empty()));
    }

    #[tokio::test]
    async fn test_should_report_health_and_server_header() {
        let server = TestServer::start().await;
        let resp = server
            .client()
            .get(server.url("/_health"))
            .send()
            .await
            .expect("health");
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers().get("server").and_then(|v| v.to_str().ok()),
            Some("MinStore")
        );
        let value: Value = resp.json().await.expect("json body");
        assert_eq!(value, serde_json::json!({ "status": "running", "service": "minstore" }));
    }
}
