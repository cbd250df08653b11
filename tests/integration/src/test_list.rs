//! Object listing tests: prefix, pagination, delimiter, encodings.

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use crate::TestServer;

    async fn list_json(server: &TestServer, bucket: &str, query: &str) -> Value {
        let resp = server
            .client()
            .get(server.url(&format!("/{bucket}?{query}")))
            .header("Accept", "application/json")
            .send()
            .await
            .expect("list objects");
        assert_eq!(resp.status(), 200);
        resp.json().await.expect("json body")
    }

    fn keys(page: &Value) -> Vec<String> {
        page["Contents"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|o| o["Key"].as_str().map(ToOwned::to_owned))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn prefixes(page: &Value) -> Vec<String> {
        page["CommonPrefixes"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|p| p["Prefix"].as_str().map(ToOwned::to_owned))
                    .collect()
            })
            .unwrap_or_default()
    }

    async fn seeded_bucket(server: &TestServer, keys: &[&'static str]) -> String {
        let bucket = server.create_bucket("list").await;
        for key in keys {
            server.put_object(&bucket, key, *key).await;
        }
        bucket
    }

    #[tokio::test]
    async fn test_should_list_objects_in_key_order_with_metadata() {
        let server = TestServer::start().await;
        let bucket = seeded_bucket(&server, &["b", "a", "c"]).await;

        let page = list_json(&server, &bucket, "").await;
        assert_eq!(keys(&page), vec!["a", "b", "c"]);
        assert_eq!(page["Name"], bucket.as_str());
        assert_eq!(page["MaxKeys"], 1000);
        assert_eq!(page["IsTruncated"], false);
        let first = &page["Contents"][0];
        assert_eq!(first["Size"], 1);
        assert_eq!(first["ETag"], "0cc175b9c0f1b6a831c399e269772661");
        assert_eq!(first["StorageClass"], "STANDARD");
        assert!(first["LastModified"].as_str().is_some_and(|t| t.ends_with('Z')));
    }

    #[tokio::test]
    async fn test_should_filter_by_prefix() {
        let server = TestServer::start().await;
        let bucket = seeded_bucket(&server, &["apple", "apricot", "banana", "ap"]).await;

        let page = list_json(&server, &bucket, "prefix=ap").await;
        assert_eq!(keys(&page), vec!["ap", "apple", "apricot"]);
        assert_eq!(page["Prefix"], "ap");

        let page = list_json(&server, &bucket, "prefix=zzz").await;
        assert!(keys(&page).is_empty());
        assert_eq!(page["IsTruncated"], false);
    }

    #[tokio::test]
    async fn test_should_paginate_with_marker_without_gaps_or_repeats() {
        let server = TestServer::start().await;
        let all = ["k0", "k1", "k2", "k3", "k4", "k5", "k6"];
        let bucket = seeded_bucket(&server, &all).await;

        let mut seen = Vec::new();
        let mut marker = String::new();
        let mut pages = 0;
        loop {
            let page = list_json(&server, &bucket, &format!("max-keys=3&marker={marker}")).await;
            pages += 1;
            seen.extend(keys(&page));
            if page["IsTruncated"] == false {
                assert!(page.get("NextMarker").is_none());
                break;
            }
            marker = page["NextMarker"].as_str().expect("next marker").to_owned();
            assert!(pages < 10, "pagination must terminate");
        }
        assert_eq!(pages, 3);
        assert_eq!(seen, all);
    }

    #[tokio::test]
    async fn test_should_group_common_prefixes_with_delimiter() {
        let server = TestServer::start().await;
        let bucket = seeded_bucket(
            &server,
            &["photos/2023/a.jpg", "photos/2024/b.jpg", "photos/index.html", "readme"],
        )
        .await;

        let page = list_json(&server, &bucket, "delimiter=%2F").await;
        assert_eq!(keys(&page), vec!["readme"]);
        assert_eq!(prefixes(&page), vec!["photos/"]);
        assert_eq!(page["Delimiter"], "/");

        let page = list_json(&server, &bucket, "prefix=photos%2F&delimiter=%2F").await;
        assert_eq!(keys(&page), vec!["photos/index.html"]);
        assert_eq!(prefixes(&page), vec!["photos/2023/", "photos/2024/"]);
    }

    #[tokio::test]
    async fn test_should_clamp_and_default_max_keys() {
        let server = TestServer::start().await;
        let bucket = seeded_bucket(&server, &["a", "b"]).await;

        assert_eq!(list_json(&server, &bucket, "max-keys=99999").await["MaxKeys"], 1000);
        assert_eq!(list_json(&server, &bucket, "max-keys=abc").await["MaxKeys"], 1000);

        let page = list_json(&server, &bucket, "max-keys=0").await;
        assert!(keys(&page).is_empty());
        assert_eq!(page["IsTruncated"], true);
    }

    #[tokio::test]
    async fn test_should_expose_same_fields_in_xml_and_json() {
        let server = TestServer::start().await;
        let bucket = seeded_bucket(&server, &["dir/x", "y"]).await;
        let query = "delimiter=%2F&max-keys=1";

        let json_text = server
            .client()
            .get(server.url(&format!("/{bucket}?{query}")))
            .header("Accept", "application/json")
            .send()
            .await
            .expect("json listing")
            .text()
            .await
            .expect("body");
        assert!(!json_text.contains("XML"));
        assert!(!json_text.contains("xmlns"));

        let xml_text = server
            .client()
            .get(server.url(&format!("/{bucket}?{query}")))
            .send()
            .await
            .expect("xml listing")
            .text()
            .await
            .expect("body");

        let value: Value = serde_json::from_str(&json_text).expect("valid JSON");
        let object = value.as_object().expect("object");
        for field in object.keys() {
            assert!(xml_text.contains(&format!("<{field}>")), "{field} missing in XML");
        }
        assert!(xml_text.contains("<ListBucketResult xmlns="));
        assert!(xml_text.contains("<IsTruncated>true</IsTruncated>"));
    }

    #[tokio::test]
    async fn test_should_return_404_when_listing_missing_bucket() {
        let server = TestServer::start().await;
        let resp = server
            .client()
            .get(server.url("/ghost-bucket"))
            .send()
            .await
            .expect("list objects");
        assert_eq!(resp.status(), 404);
        let body = resp.text().await.expect("body");
        assert!(body.contains("<Code>NoSuchBucket</Code>"));
        assert!(body.contains("<Resource>ghost-bucket</Resource>"));
    }
}
