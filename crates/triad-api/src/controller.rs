use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};
use triad_core::ControllerTier;
use triad_model::ClusterStatus;
use triad_relay::CommandRelay;

use crate::error::ApiError;

/// HTTP surface of the controller.
pub struct ControllerApi<R> {
    tier: Arc<ControllerTier<R>>,
}

impl<R> ControllerApi<R>
where
    R: CommandRelay,
{
    pub fn new(tier: Arc<ControllerTier<R>>) -> Self {
        Self { tier }
    }

    /// Routes:
    /// - GET /cluster-status - Replica roster
    /// - GET|POST /start-agent - Relay `start` to the agent
    /// - GET|POST /stop-agent - Relay `stop` to the agent
    pub fn router(self) -> Router {
        Router::new()
            .route("/cluster-status", get(cluster_status::<R>))
            .route(
                "/start-agent",
                get(start_agent::<R>).post(start_agent::<R>),
            )
            .route("/stop-agent", get(stop_agent::<R>).post(stop_agent::<R>))
            .with_state(self.tier)
    }
}

/// GET /cluster-status
async fn cluster_status<R>(State(tier): State<Arc<ControllerTier<R>>>) -> Json<ClusterStatus>
where
    R: CommandRelay,
{
    Json(tier.cluster_status().await)
}

/// GET|POST /start-agent
async fn start_agent<R>(State(tier): State<Arc<ControllerTier<R>>>) -> Result<&'static str, ApiError>
where
    R: CommandRelay,
{
    Ok(tier.start_agent().await?)
}

/// GET|POST /stop-agent
async fn stop_agent<R>(State(tier): State<Arc<ControllerTier<R>>>) -> Result<&'static str, ApiError>
where
    R: CommandRelay,
{
    Ok(tier.stop_agent().await?)
}
