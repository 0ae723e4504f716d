use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use triad_core::ServiceTier;
use triad_model::ServiceStatus;

/// HTTP surface of the worker service.
pub struct ServiceApi {
    tier: Arc<ServiceTier>,
}

impl ServiceApi {
    pub fn new(tier: Arc<ServiceTier>) -> Self {
        Self { tier }
    }

    /// Routes:
    /// - GET /status - Replica status snapshot
    /// - POST /stop - Close the service listener
    pub fn router(self) -> Router {
        Router::new()
            .route("/status", get(status))
            .route("/stop", post(stop))
            .with_state(self.tier)
    }
}

/// GET /status
async fn status(State(tier): State<Arc<ServiceTier>>) -> Json<ServiceStatus> {
    Json(tier.status().await)
}

/// POST /stop
async fn stop(State(tier): State<Arc<ServiceTier>>) -> &'static str {
    tier.stop().await
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;
    use triad_core::{ListenerHandle, ServiceConfig, TierState};
    use triad_journal::RequestLog;

    use super::*;

    fn tier() -> (tempfile::TempDir, Arc<ServiceTier>) {
        let dir = tempfile::tempdir().unwrap();
        let log = RequestLog::new(dir.path().join("service_requests_log.json"));
        let tier = ServiceTier::new(ServiceConfig::default(), log, ListenerHandle::new());
        (dir, Arc::new(tier))
    }

    #[tokio::test]
    async fn status_is_json() {
        let (_dir, tier) = tier();
        tier.add_tasks(11);
        let app = ServiceApi::new(Arc::clone(&tier)).router();

        let response = app
            .oneshot(Request::builder().uri("/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let status: ServiceStatus = serde_json::from_slice(&body).unwrap();
        assert_eq!(status.id, "replica-1");
        assert_eq!(status.task_count, 11);
    }

    #[tokio::test]
    async fn stop_answers_before_closing() {
        let (_dir, tier) = tier();
        let app = ServiceApi::new(Arc::clone(&tier)).router();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/stop")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"Server stopping...\n");

        tokio::time::timeout(Duration::from_secs(1), tier.handle().closed())
            .await
            .unwrap();
        assert_eq!(tier.handle().state(), TierState::Closed);
    }

    #[tokio::test]
    async fn stop_requires_post() {
        let (_dir, tier) = tier();
        let app = ServiceApi::new(Arc::clone(&tier)).router();

        let response = app
            .oneshot(Request::builder().uri("/stop").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(tier.handle().state(), TierState::Running);
    }
}
