//! Admission control scenarios through the public API

#[cfg(test)]
mod tests {
    use crate::common::fixtures::START_MS;
    use crate::common::admission_controller;
    use completion_gateway::{GatewayError, RateLimitStore};
    use std::time::Duration;

    /// Ten admissions, then a denial carrying the wait until the window ends
    #[tokio::test]
    async fn test_window_fills_then_denies() {
        let (clock, limiter) = admission_controller(10, 60_000);

        for expected_remaining in (0..10).rev() {
            let decision = limiter.enqueue_request("user-1").await.unwrap();
            assert!(decision.allowed);
            assert_eq!(decision.remaining, expected_remaining);
            assert_eq!(decision.reset_at, START_MS + 60_000);
        }

        clock.advance(Duration::from_secs(1));
        let denied = limiter.enqueue_request("user-1").await.unwrap();
        assert!(!denied.allowed);
        assert_eq!(denied.remaining, 0);
        assert_eq!(denied.retry_after_secs, Some(59));
    }

    /// A new window opens once the old one has elapsed
    #[tokio::test]
    async fn test_window_rolls_over() {
        let (clock, limiter) = admission_controller(2, 1_000);

        assert!(limiter.enqueue_request("u").await.unwrap().allowed);
        assert!(limiter.enqueue_request("u").await.unwrap().allowed);
        assert!(!limiter.enqueue_request("u").await.unwrap().allowed);

        clock.advance(Duration::from_millis(1_000));
        let decision = limiter.enqueue_request("u").await.unwrap();
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 1);
        assert_eq!(decision.reset_at, START_MS + 2_000);
    }

    /// Identities never share counters
    #[tokio::test]
    async fn test_identities_are_isolated() {
        let (_, limiter) = admission_controller(1, 60_000);

        assert!(limiter.enqueue_request("alice").await.unwrap().allowed);
        assert!(!limiter.enqueue_request("alice").await.unwrap().allowed);
        assert!(limiter.enqueue_request("bob").await.unwrap().allowed);
    }

    /// Status checks never consume capacity
    #[tokio::test]
    async fn test_status_check_is_read_only() {
        let (_, limiter) = admission_controller(3, 60_000);

        let fresh = limiter.check_rate_limit("u").await;
        assert!(fresh.allowed);
        assert_eq!(fresh.remaining, 3);

        limiter.enqueue_request("u").await.unwrap();
        for _ in 0..5 {
            assert_eq!(limiter.check_rate_limit("u").await.remaining, 2);
        }
        assert_eq!(limiter.enqueue_request("u").await.unwrap().remaining, 1);
    }

    /// Reset gives the identity a full window again
    #[tokio::test]
    async fn test_reset_restores_capacity() {
        let (clock, limiter) = admission_controller(2, 60_000);

        limiter.enqueue_request("u").await.unwrap();
        limiter.enqueue_request("u").await.unwrap();
        assert!(!limiter.check_rate_limit("u").await.allowed);

        limiter.reset_rate_limit("u").await;
        clock.advance(Duration::from_millis(10));

        let decision = limiter.enqueue_request("u").await.unwrap();
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 1);
    }

    /// Concurrent callers on one identity never exceed the limit
    #[tokio::test]
    async fn test_concurrent_admissions_respect_limit() {
        let (_, limiter) = admission_controller(5, 60_000);

        let decisions = futures::future::join_all(
            (0..20).map(|_| limiter.enqueue_request("burst")),
        )
        .await;

        let allowed = decisions
            .into_iter()
            .map(|d| d.unwrap())
            .filter(|d| d.allowed)
            .count();
        assert_eq!(allowed, 5);
    }

    /// Store failures surface as storage errors instead of silent admission
    #[tokio::test]
    async fn test_failing_store_is_reported() {
        use async_trait::async_trait;
        use completion_gateway::config::RateLimitConfig;
        use completion_gateway::{AdmissionController, ManualClock};
        use std::sync::Arc;

        struct ReadOnlyStore;

        #[async_trait]
        impl RateLimitStore for ReadOnlyStore {
            fn name(&self) -> &'static str {
                "read-only"
            }
            async fn get(&self, _key: &str) -> Option<String> {
                None
            }
            async fn set(&self, _key: &str, _value: &str, _ttl_secs: Option<u64>) {}
            async fn increment(
                &self,
                _key: &str,
                _ttl_secs: Option<u64>,
            ) -> completion_gateway::Result<i64> {
                Err(GatewayError::storage("counter unavailable"))
            }
        }

        let limiter = AdmissionController::new(
            Arc::new(ReadOnlyStore),
            Arc::new(ManualClock::new(START_MS)),
            RateLimitConfig::default(),
        );

        let err = crate::assert_err!(limiter.enqueue_request("u").await);
        assert!(matches!(err, GatewayError::Storage(_)));
    }
}
