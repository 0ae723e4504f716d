mod agent;
pub use agent::{AgentConfig, AgentTier};

mod controller;
pub use controller::{ControllerConfig, ControllerTier};

mod service;
pub use service::{ServiceConfig, ServiceTier};
