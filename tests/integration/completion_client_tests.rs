//! Completion client against a mock upstream over real HTTP

#[cfg(test)]
mod tests {
    use crate::common::{TestClient, chunk_sse};
    use completion_gateway::{
        ChatMessage, CompletionOptions, GatewayError, RetryPolicy, collect_streaming_response,
    };
    use futures::StreamExt;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;
    use wiremock::matchers::{bearer_token, body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sse_ok(parts: &[&str]) -> ResponseTemplate {
        ResponseTemplate::new(200)
            .insert_header("content-type", "text/event-stream")
            .set_body_string(format!("{}data: [DONE]\n\n", chunk_sse(parts)))
    }

    async fn received(server: &MockServer) -> usize {
        server.received_requests().await.map(|r| r.len()).unwrap_or(0)
    }

    /// Two server errors, then a stream: three attempts, 1s then 2s apart
    #[tokio::test]
    async fn test_retries_transient_failures() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .up_to_n_times(2)
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(sse_ok(&["Hello", ", world"]))
            .with_priority(2)
            .mount(&server)
            .await;

        let test = TestClient::new(&server.uri(), Some("sk-test"));
        let stream = test
            .client
            .ask_completion(vec![ChatMessage::user("hi")], None, CompletionOptions::default())
            .await
            .unwrap();

        let text = collect_streaming_response(stream).await.unwrap();
        assert_eq!(text, "Hello, world");
        assert_eq!(received(&server).await, 3);
        assert_eq!(
            test.sleeper.delays(),
            vec![Duration::from_millis(1_000), Duration::from_millis(2_000)]
        );
    }

    /// Client errors are returned after a single attempt
    #[tokio::test]
    async fn test_client_error_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
            .mount(&server)
            .await;

        let test = TestClient::new(&server.uri(), Some("sk-test"));
        let err = crate::assert_err!(
            test.client
                .ask_completion(vec![ChatMessage::user("hi")], None, CompletionOptions::default())
                .await
        );

        assert_eq!(err.upstream_status(), Some(400));
        assert_eq!(received(&server).await, 1);
        assert!(test.sleeper.delays().is_empty());
    }

    /// Persistent failures exhaust the retry budget
    #[tokio::test]
    async fn test_retry_budget_exhausted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let test = TestClient::new(&server.uri(), Some("sk-test"));
        let err = crate::assert_err!(
            test.client
                .ask_completion(vec![ChatMessage::user("hi")], None, CompletionOptions::default())
                .await
        );

        assert!(matches!(
            err,
            GatewayError::RetriesExhausted { attempts: 4, .. }
        ));
        assert_eq!(received(&server).await, 4);
        assert_eq!(test.sleeper.delays().len(), 3);
    }

    /// Request defaults and the bearer credential reach the upstream
    #[tokio::test]
    async fn test_request_shape() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(bearer_token("sk-shape"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-4",
                "temperature": 0.7,
                "stream": true,
                "messages": [{"role": "user", "content": "hi"}]
            })))
            .respond_with(sse_ok(&["ok"]))
            .expect(1)
            .mount(&server)
            .await;

        let test = TestClient::new(&server.uri(), Some("sk-shape"));
        let completion = test
            .client
            .ask_completion_aggregate(
                vec![ChatMessage::user("hi")],
                None,
                CompletionOptions::default(),
            )
            .await
            .unwrap();

        assert_eq!(completion.content(), Some("ok"));
    }

    /// Without a credential nothing is sent upstream
    #[tokio::test]
    async fn test_missing_credential() {
        let server = MockServer::start().await;

        let test = TestClient::new(&server.uri(), None);
        let err = crate::assert_err!(
            test.client
                .ask_completion(vec![ChatMessage::user("hi")], None, CompletionOptions::default())
                .await
        );

        assert!(matches!(err, GatewayError::Config(_)));
        assert_eq!(received(&server).await, 0);
    }

    /// A cancelled request never reaches the upstream
    #[tokio::test]
    async fn test_cancelled_before_send() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(sse_ok(&["unused"]))
            .mount(&server)
            .await;

        let cancel = CancellationToken::new();
        cancel.cancel();

        let test = TestClient::new(&server.uri(), Some("sk-test"));
        let err = crate::assert_err!(
            test.client
                .ask_completion(
                    vec![ChatMessage::user("hi")],
                    None,
                    CompletionOptions::default().with_cancel(cancel),
                )
                .await
        );

        assert!(err.is_aborted());
        assert_eq!(received(&server).await, 0);
    }

    /// Cancelling while reading stops the stream with an abort
    #[tokio::test]
    async fn test_cancel_while_streaming() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(sse_ok(&["one", "two", "three"]))
            .mount(&server)
            .await;

        let cancel = CancellationToken::new();
        let test = TestClient::new(&server.uri(), Some("sk-test"));
        let mut stream = test
            .client
            .ask_completion(
                vec![ChatMessage::user("hi")],
                None,
                CompletionOptions::default().with_cancel(cancel.clone()),
            )
            .await
            .unwrap();

        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first.content(), Some("one"));

        cancel.cancel();
        let next = stream.next().await.unwrap();
        assert!(next.unwrap_err().is_aborted());
        assert!(stream.next().await.is_none());
    }

    /// Per-call retry overrides replace the client policy
    #[tokio::test]
    async fn test_per_call_no_retry() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let test = TestClient::new(&server.uri(), Some("sk-test"));
        let err = crate::assert_err!(
            test.client
                .ask_completion(
                    vec![ChatMessage::user("hi")],
                    None,
                    CompletionOptions::default().with_retry(RetryPolicy::no_retry()),
                )
                .await
        );

        assert_eq!(err.upstream_status(), Some(500));
        assert_eq!(received(&server).await, 1);
    }
}
