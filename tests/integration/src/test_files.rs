//! File upload and download integration tests.

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use crate::{bucket_name, gateway_url, http_client, s3_client, test_file_name, upload_file};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_upload_and_download_file() {
        let client = http_client();
        let name = test_file_name("roundtrip");

        let resp = upload_file(&client, &name, "hello gateway", Some("text/plain")).await;
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["message"], "File uploaded");
        assert_eq!(body["fileName"], name.as_str());

        let resp = client
            .get(gateway_url(&format!("/api/files/{name}")))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["content-type"], "text/plain");
        assert_eq!(resp.text().await.unwrap(), "hello gateway");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_fetch_file_with_name_needing_encoding() {
        let client = http_client();
        let name = format!("{} 日本.txt", test_file_name("encoded"));

        let resp = upload_file(&client, &name, "encoded", Some("text/plain")).await;
        assert_eq!(resp.status(), 200);

        // The URL parser percent-encodes the space and the non-ASCII bytes.
        let resp = client
            .get(gateway_url(&format!("/api/files/{name}")))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.text().await.unwrap(), "encoded");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_default_upload_content_type_to_json() {
        let client = http_client();
        let name = test_file_name("default-ct");

        let resp = upload_file(&client, &name, r#"{"a":1}"#, None).await;
        assert_eq!(resp.status(), 200);

        let resp = client
            .get(gateway_url(&format!("/api/files/{name}")))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.headers()["content-type"], "application/json");
        assert_eq!(resp.text().await.unwrap(), r#"{"a":1}"#);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_overwrite_existing_file() {
        let client = http_client();
        let name = test_file_name("overwrite");

        upload_file(&client, &name, "first", Some("text/plain")).await;
        upload_file(&client, &name, "second", Some("text/plain")).await;

        let text = client
            .get(gateway_url(&format!("/api/files/{name}")))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(text, "second");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_404_for_missing_file() {
        let client = http_client();
        let resp = client
            .get(gateway_url(&format!("/api/files/{}", test_file_name("missing"))))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 404);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["message"], "File not found");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_upload_without_content() {
        let client = http_client();
        let resp = client
            .post(gateway_url("/api/files"))
            .json(&serde_json::json!({ "fileName": "a.txt" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["message"], "fileName and content fields are required");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_empty_upload_body() {
        let client = http_client();
        let resp = client.post(gateway_url("/api/files")).send().await.unwrap();
        assert_eq!(resp.status(), 400);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["message"], "Request body is empty");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_malformed_upload_body() {
        let client = http_client();
        let resp = client
            .post(gateway_url("/api/files"))
            .header("content-type", "application/json")
            .body("{not json")
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);
    }

    #[tokio::test]
    #[ignore = "requires running server and S3 endpoint"]
    async fn test_should_store_upload_in_bucket() {
        let client = http_client();
        let name = test_file_name("direct");

        let resp = upload_file(&client, &name, "stored bytes", Some("text/plain")).await;
        assert_eq!(resp.status(), 200);

        let s3 = s3_client();
        let object = s3
            .get_object()
            .bucket(bucket_name())
            .key(&name)
            .send()
            .await
            .expect("get_object");
        assert_eq!(object.content_type(), Some("text/plain"));
        let data = object.body.collect().await.unwrap().into_bytes();
        assert_eq!(data.as_ref(), b"stored bytes");

        let _ = s3
            .delete_object()
            .bucket(bucket_name())
            .key(&name)
            .send()
            .await;
    }
}
