//! E2E tests for chat completion
//!
//! These tests make real API calls and require an API key.
//! Run with: cargo test -- --ignored

#[cfg(test)]
mod tests {
    use completion_gateway::config::Config;
    use completion_gateway::{
        ChatMessage, CompletionGatewayClient, CompletionOptions, collect_streaming_response,
    };
    use futures::StreamExt;

    fn client() -> CompletionGatewayClient {
        let config = Config::from_env().expect("config from env");
        CompletionGatewayClient::from_config(config.provider(), config.retry())
            .expect("client")
    }

    /// Streamed completion ends with text
    #[tokio::test]
    #[ignore]
    async fn test_streaming_completion() {
        crate::skip_without_env!("OPENAI_API_KEY");

        let stream = client()
            .ask_completion(
                vec![ChatMessage::user("Say 'test passed' and nothing else")],
                None,
                CompletionOptions::default().with_max_tokens(20),
            )
            .await
            .expect("Failed to open stream");

        let text = collect_streaming_response(stream).await.expect("stream");
        assert!(!text.is_empty(), "No content received");
    }

    /// Every chunk decodes and the stream terminates
    #[tokio::test]
    #[ignore]
    async fn test_stream_chunks() {
        crate::skip_without_env!("OPENAI_API_KEY");

        let mut stream = client()
            .ask_completion(
                vec![
                    ChatMessage::system("You are terse."),
                    ChatMessage::user("Count to 3"),
                ],
                None,
                CompletionOptions::default().with_max_tokens(20),
            )
            .await
            .expect("Failed to open stream");

        let mut chunk_count = 0;
        while let Some(result) = stream.next().await {
            assert!(result.is_ok(), "Stream chunk failed: {:?}", result.err());
            chunk_count += 1;
        }
        assert!(chunk_count > 0, "No chunks received");
    }

    /// Unary completion returns a message
    #[tokio::test]
    #[ignore]
    async fn test_unary_completion() {
        crate::skip_without_env!("OPENAI_API_KEY");

        let completion = client()
            .ask_completion_unary(
                vec![ChatMessage::user("Reply with one word")],
                None,
                CompletionOptions::default().with_max_tokens(5),
            )
            .await
            .expect("completion");
        assert!(completion.content().is_some());
    }
}
