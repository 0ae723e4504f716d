use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use triad_model::Command;

use crate::{config::RelayConfig, errors::RelayError};

/// Successful (HTTP 200) answer to a relayed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ack {
    pub body: String,
}

/// Capability to hand a command to the next tier down.
///
/// Tiers depend on this instead of on the HTTP client, which keeps their
/// orchestration logic testable without a live peer.
#[async_trait]
pub trait CommandRelay: Send + Sync + 'static {
    async fn relay(&self, url: &str, command: Command) -> Result<Ack, RelayError>;
}

/// HTTP implementation of [`CommandRelay`].
///
/// No retries: the caller decides what a failed relay means for its own request.
#[derive(Debug, Clone)]
pub struct RelayClient {
    http: reqwest::Client,
}

impl RelayClient {
    pub fn new(cfg: &RelayConfig) -> Result<Self, RelayError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = cfg.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(RelayError::Client)?;
        Ok(Self { http })
    }

    /// POST `command` as JSON to `url`.
    pub async fn send(&self, url: &str, command: &Command) -> Result<Ack, RelayError> {
        debug!(url, action = %command.action, "relaying command");

        let response = self
            .http
            .post(url)
            .json(command)
            .send()
            .await
            .map_err(|source| unreachable(url, source))?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(url, status = status.as_u16(), "downstream rejected command");
            return Err(RelayError::Rejected {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // the peer already acknowledged; a body lost to a closing socket does not undo that
        let body = response.text().await.unwrap_or_default();
        debug!(url, action = %command.action, "command acknowledged");
        Ok(Ack { body })
    }

    /// GET `url` and decode a JSON body.
    pub async fn fetch_json<T>(&self, url: &str) -> Result<T, RelayError>
    where
        T: DeserializeOwned,
    {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| unreachable(url, source))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(RelayError::Rejected {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| unreachable(url, source))?;
        serde_json::from_str(&body).map_err(|e| RelayError::InvalidResponse {
            url: url.to_string(),
            reason: format!("failed to parse response: {e}, body: {body}"),
        })
    }
}

#[async_trait]
impl CommandRelay for RelayClient {
    async fn relay(&self, url: &str, command: Command) -> Result<Ack, RelayError> {
        self.send(url, &command).await
    }
}

fn unreachable(url: &str, source: reqwest::Error) -> RelayError {
    RelayError::Unreachable {
        url: url.to_string(),
        source,
    }
}
