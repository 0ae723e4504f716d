pub mod error;
pub use error::CoreError;

pub mod lifecycle;
pub use lifecycle::{LifecycleError, ListenerHandle, TierState};

pub mod signal;
pub use signal::close_on_signal;

pub mod tier;
pub use tier::{
    AgentConfig, AgentTier, ControllerConfig, ControllerTier, ServiceConfig, ServiceTier,
};

#[cfg(test)]
pub(crate) mod testing;
