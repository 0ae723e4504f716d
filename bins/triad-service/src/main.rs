use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use clap::Parser;
use tracing::info;

use triad_api::{ServiceApi, bind, serve};
use triad_core::{ListenerHandle, ServiceConfig, ServiceTier, close_on_signal};
use triad_journal::RequestLog;
use triad_observe::{LoggerConfig, LoggerFormat, logger_init};

/// Worker service: simulates load and reports its status.
#[derive(Debug, Parser)]
#[command(name = "triad-service", version)]
struct Args {
    #[arg(long, env = "TRIAD_LISTEN", default_value = "0.0.0.0:8081")]
    listen: SocketAddr,

    #[arg(long, env = "TRIAD_REPLICA_ID", default_value = "replica-1")]
    replica_id: String,

    /// Milliseconds between simulated load ticks.
    #[arg(long, env = "TRIAD_LOAD_PERIOD_MS", default_value = "1000")]
    load_period_ms: u64,

    #[arg(long, env = "TRIAD_REQUEST_LOG", default_value = "service_requests_log.json")]
    request_log: PathBuf,

    #[arg(long, env = "TRIAD_LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[arg(long, env = "TRIAD_LOG_FORMAT", default_value = "text")]
    log_format: LoggerFormat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 1) Logger
    logger_init(&LoggerConfig::for_tier("service", args.log_format, args.log_level))?;

    // 2) Tier state
    let handle = ListenerHandle::new();
    let config = ServiceConfig {
        id: args.replica_id,
        load_period: Duration::from_millis(args.load_period_ms),
        ..Default::default()
    };
    let tier = Arc::new(ServiceTier::new(
        config,
        RequestLog::new(args.request_log),
        handle.clone(),
    ));
    let load = tier.spawn_load();

    // 3) Listener
    let listener = bind(args.listen).await?;
    info!("service is running on http://{}", listener.local_addr()?);
    close_on_signal(handle.clone());

    serve(listener, ServiceApi::new(tier).router(), handle).await?;
    load.await?;
    info!("service shutdown complete");
    Ok(())
}
