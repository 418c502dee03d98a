//! Queue integration tests.
//!
//! The expected status depends on whether the server was started with a
//! `QUEUE_URL`; the health endpoint tells us which.

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use crate::{gateway_url, http_client, queue_enabled};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_send_message_or_report_disabled() {
        let client = http_client();
        let enabled = queue_enabled(&client).await;

        let resp = client
            .post(gateway_url("/api/queue"))
            .json(&serde_json::json!({ "message": { "job": "resize", "id": 7 } }))
            .send()
            .await
            .unwrap();
        let status = resp.status();
        let body: Value = resp.json().await.unwrap();

        if enabled {
            assert_eq!(status, 200);
            assert_eq!(body["message"], "Message sent to queue");
        } else {
            assert_eq!(status, 501);
            assert_eq!(body["message"], "Queue feature is not enabled");
        }
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_missing_message_field() {
        let client = http_client();
        if !queue_enabled(&client).await {
            return;
        }

        let resp = client
            .post(gateway_url("/api/queue"))
            .json(&serde_json::json!({ "other": 1 }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["message"], "message field is required");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_check_queue_before_body() {
        let client = http_client();
        if queue_enabled(&client).await {
            return;
        }

        let resp = client
            .post(gateway_url("/api/queue"))
            .body("{not json")
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 501);
    }
}
