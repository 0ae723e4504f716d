use std::io::IsTerminal;

use crate::logger::format::LoggerFormat;

/// Settings shared by every tier binary.
///
/// `level` accepts any `EnvFilter` directive, e.g. `info` or `triad_core=debug,info`.
/// `tier` names the emitting process: it is stamped on the startup event and
/// used as the journald syslog identifier.
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub tier: String,
    pub format: LoggerFormat,
    pub level: String,
    pub with_targets: bool,
    pub use_color: bool,
}

impl LoggerConfig {
    pub fn new(format: LoggerFormat, level: impl Into<String>) -> Self {
        Self {
            format,
            level: level.into(),
            ..Default::default()
        }
    }

    pub fn for_tier(
        tier: impl Into<String>,
        format: LoggerFormat,
        level: impl Into<String>,
    ) -> Self {
        Self {
            tier: tier.into(),
            ..Self::new(format, level)
        }
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            tier: "triad".to_string(),
            format: LoggerFormat::Text,
            level: "info".to_string(),
            with_targets: true,
            use_color: std::io::stdout().is_terminal(),
        }
    }
}
