use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown action: '{0}' (expected: start|stop)")]
    UnknownAction(String),
}
