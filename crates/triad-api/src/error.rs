use std::net::SocketAddr;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use triad_core::CoreError;

/// Failure answered directly to the HTTP caller.
///
/// The display text is the response body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Only POST requests are allowed")]
    MethodNotAllowed,

    #[error("Invalid JSON")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Unknown action")]
    UnknownAction(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::InvalidJson(_) | ApiError::UnknownAction(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnknownAction(action) => ApiError::UnknownAction(action),
            CoreError::ServiceStop(e) if e.is_unreachable() => {
                ApiError::Internal("Failed to stop the service".into())
            }
            CoreError::ServiceStop(_) => ApiError::Internal("Service failed to stop".into()),
            CoreError::AgentRelay { action, .. } => {
                ApiError::Internal(format!("Failed to {action} agent"))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), format!("{self}\n")).into_response()
    }
}

#[derive(Debug, Error)]
pub enum ServeError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}
