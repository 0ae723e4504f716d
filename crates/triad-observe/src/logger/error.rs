use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("invalid logger format: {0} (expected: text|json|journald)")]
    InvalidFormat(String),
    #[error("journald is not supported on this platform or the feature is disabled")]
    JournaldNotSupported,
    #[error("logger for tier {tier} has already been initialized")]
    AlreadyInitialized { tier: String },
    #[error("failed to initialize logger for tier {tier}: {reason}")]
    InitializationFailed { tier: String, reason: String },
    #[error("invalid log level {level:?}: {reason}")]
    InvalidLogLevel { level: String, reason: String },
}
