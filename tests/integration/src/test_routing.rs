//! Routing, CORS, and health endpoint integration tests.

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use crate::{gateway_url, http_client};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_404_for_unknown_route() {
        let client = http_client();
        let resp = client.get(gateway_url("/nope")).send().await.unwrap();
        assert_eq!(resp.status(), 404);
        assert_eq!(resp.headers()["content-type"], "application/json");
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["message"], "404 Not Found");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_404_for_unsupported_method_on_files() {
        let client = http_client();
        let resp = client
            .delete(gateway_url("/api/files/a.txt"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_require_file_name_on_bare_prefix() {
        let client = http_client();
        let resp = client.get(gateway_url("/api/files")).send().await.unwrap();
        assert_eq!(resp.status(), 400);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["message"], "File name is required");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_add_common_headers() {
        let client = http_client();
        let resp = client.get(gateway_url("/nope")).send().await.unwrap();
        let headers = resp.headers();
        assert!(headers.contains_key("x-request-id"));
        assert_eq!(headers["server"], "bucketgate");
        assert!(headers.contains_key("access-control-allow-origin"));
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_answer_preflight() {
        let client = http_client();
        let resp = client
            .request(reqwest::Method::OPTIONS, gateway_url("/api/files"))
            .header("origin", "https://app.example.com")
            .header("access-control-request-method", "POST")
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 204);
        assert!(resp.headers().contains_key("access-control-allow-methods"));
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_report_health() {
        let client = http_client();
        let resp = client.get(gateway_url("/health")).send().await.unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["status"], "running");
        assert!(body["queue"] == "enabled" || body["queue"] == "disabled");
    }
}
