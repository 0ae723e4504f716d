mod client;
pub use client::{Ack, CommandRelay, RelayClient};

mod config;
pub use config::RelayConfig;

mod errors;
pub use errors::RelayError;
