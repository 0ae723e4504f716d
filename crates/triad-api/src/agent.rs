use std::sync::Arc;

use axum::{Router, body::Bytes, extract::State, response::IntoResponse, routing::post};
use serde::Deserialize;
use tracing::debug;
use triad_core::AgentTier;
use triad_relay::CommandRelay;

use crate::error::ApiError;

/// HTTP surface of the agent.
pub struct AgentApi<R> {
    tier: Arc<AgentTier<R>>,
}

impl<R> AgentApi<R>
where
    R: CommandRelay,
{
    pub fn new(tier: Arc<AgentTier<R>>) -> Self {
        Self { tier }
    }

    /// Routes:
    /// - POST /command - Apply a start/stop command
    pub fn router(self) -> Router {
        Router::new()
            .route(
                "/command",
                post(command::<R>).fallback(method_not_allowed),
            )
            .with_state(self.tier)
    }
}

// ============================================================================
// Request types
// ============================================================================

// Missing `action` decodes as empty and is then refused as an unknown action.
#[derive(Debug, Deserialize)]
struct CommandRequest {
    #[serde(default)]
    action: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /command
async fn command<R>(
    State(tier): State<Arc<AgentTier<R>>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError>
where
    R: CommandRelay,
{
    let req: CommandRequest = serde_json::from_slice(&body).map_err(ApiError::InvalidJson)?;
    debug!(action = %req.action, "command received");

    let reply = tier.command(&req.action).await?;
    Ok(reply)
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
