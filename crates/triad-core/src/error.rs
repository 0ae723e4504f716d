use thiserror::Error;
use triad_model::Action;
use triad_relay::RelayError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown action: '{0}'")]
    UnknownAction(String),

    #[error("failed to stop the service: {0}")]
    ServiceStop(#[source] RelayError),

    #[error("failed to {action} agent: {source}")]
    AgentRelay {
        action: Action,
        #[source]
        source: RelayError,
    },
}
