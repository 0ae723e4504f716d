mod error;
pub use error::{ApiError, ServeError};

mod server;
pub use server::{bind, serve};

mod agent;
pub use agent::AgentApi;

mod controller;
pub use controller::ControllerApi;

mod service;
pub use service::ServiceApi;

pub use axum;
