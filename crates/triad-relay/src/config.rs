use std::time::Duration;

/// Transport settings for relay calls.
///
/// With `timeout: None` a call waits as long as the transport allows.
#[derive(Debug, Clone, Default)]
pub struct RelayConfig {
    pub timeout: Option<Duration>,
}
