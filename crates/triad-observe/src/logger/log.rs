use time::{UtcOffset, format_description::well_known::Rfc3339};
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt,
    fmt::time::OffsetTime,
    layer::{Layered, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::logger::{config::LoggerConfig, error::LoggerError, format::LoggerFormat};

type Filtered = Layered<EnvFilter, Registry>;
type BoxedLayer = Box<dyn Layer<Filtered> + Send + Sync + 'static>;

/// Install `filter` + the output layer for `cfg.format` as the global default,
/// then announce the tier on the freshly installed subscriber.
pub(crate) fn install(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    let filter = mk_filter(&cfg.level)?;
    let layer = mk_layer(cfg)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|e| {
            let msg = e.to_string();
            if msg.contains("SetGlobalDefaultError") || msg.contains("global default") {
                LoggerError::AlreadyInitialized {
                    tier: cfg.tier.clone(),
                }
            } else {
                LoggerError::InitializationFailed {
                    tier: cfg.tier.clone(),
                    reason: msg,
                }
            }
        })?;

    tracing::info!(tier = %cfg.tier, format = ?cfg.format, level = %cfg.level, "logger initialized");
    Ok(())
}

fn mk_layer(cfg: &LoggerConfig) -> Result<BoxedLayer, LoggerError> {
    match cfg.format {
        LoggerFormat::Text => Ok(fmt::layer()
            .with_ansi(cfg.use_color)
            .with_target(cfg.with_targets)
            .with_timer(mk_timer())
            .boxed()),
        LoggerFormat::Json => Ok(fmt::layer()
            .json()
            .with_ansi(false)
            .with_target(cfg.with_targets)
            .with_timer(mk_timer())
            .boxed()),
        LoggerFormat::Journald => mk_journald(&cfg.tier),
    }
}

fn mk_filter(level: &str) -> Result<EnvFilter, LoggerError> {
    EnvFilter::try_new(level).map_err(|e| LoggerError::InvalidLogLevel {
        level: level.to_string(),
        reason: e.to_string(),
    })
}

fn mk_timer() -> OffsetTime<Rfc3339> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetTime::new(offset, Rfc3339)
}

#[cfg(all(target_os = "linux", feature = "journald"))]
fn mk_journald(tier: &str) -> Result<BoxedLayer, LoggerError> {
    let layer = tracing_journald::layer().map_err(|e| LoggerError::InitializationFailed {
        tier: tier.to_string(),
        reason: format!("journald: {e}"),
    })?;
    Ok(layer.with_syslog_identifier(format!("triad-{tier}")).boxed())
}

#[cfg(not(all(target_os = "linux", feature = "journald")))]
fn mk_journald(_tier: &str) -> Result<BoxedLayer, LoggerError> {
    Err(LoggerError::JournaldNotSupported)
}
