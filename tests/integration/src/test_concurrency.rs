//! Concurrent requests against one server.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use futures::future::join_all;

    use crate::{TestServer, test_bucket_name};

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_should_create_contended_bucket_exactly_once() {
        let server = Arc::new(TestServer::start().await);
        let name = test_bucket_name("race");

        let attempts = (0..16).map(|_| {
            let server = Arc::clone(&server);
            let name = name.clone();
            tokio::spawn(async move {
                server
                    .client()
                    .put(server.url(&format!("/{name}")))
                    .send()
                    .await
                    .expect("create bucket")
                    .status()
                    .as_u16()
            })
        });
        let statuses: Vec<u16> = join_all(attempts)
            .await
            .into_iter()
            .map(|r| r.expect("task"))
            .collect();

        assert_eq!(statuses.iter().filter(|s| **s == 200).count(), 1);
        assert_eq!(statuses.iter().filter(|s| **s == 409).count(), 15);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_should_keep_one_whole_version_under_concurrent_writes() {
        let server = Arc::new(TestServer::start().await);
        let bucket = server.create_bucket("writers").await;

        let versions: Vec<Vec<u8>> = (0..8u8).map(|i| vec![b'a' + i; 64 * 1024]).collect();
        let writers = versions.iter().cloned().map(|content| {
            let server = Arc::clone(&server);
            let bucket = bucket.clone();
            tokio::spawn(async move { server.put_object(&bucket, "shared", content).await })
        });
        for result in join_all(writers).await {
            result.expect("writer task");
        }

        let body = server
            .client()
            .get(server.url(&format!("/{bucket}/shared")))
            .send()
            .await
            .expect("get object")
            .bytes()
            .await
            .expect("body");
        assert!(
            versions.iter().any(|v| v.as_slice() == body.as_ref()),
            "stored content must be exactly one of the written versions"
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_should_serve_parallel_downloads() {
        let server = Arc::new(TestServer::start().await);
        let bucket = server.create_bucket("readers").await;
        let content = vec![42u8; 256 * 1024];
        server.put_object(&bucket, "big", content.clone()).await;

        let readers = (0..8).map(|_| {
            let server = Arc::clone(&server);
            let url = server.url(&format!("/{bucket}/big"));
            tokio::spawn(async move {
                server
                    .client()
                    .get(url)
                    .send()
                    .await
                    .expect("get object")
                    .bytes()
                    .await
                    .expect("body")
            })
        });
        for body in join_all(readers).await {
            assert_eq!(body.expect("reader task").as_ref(), content.as_slice());
        }
    }
}
