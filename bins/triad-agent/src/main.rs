use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use clap::Parser;
use tracing::info;

use triad_api::{AgentApi, bind, serve};
use triad_core::{AgentConfig, AgentTier, ListenerHandle, close_on_signal};
use triad_journal::RequestLog;
use triad_observe::{LoggerConfig, LoggerFormat, logger_init};
use triad_relay::{RelayClient, RelayConfig};

/// Agent: accepts start/stop commands and drives the worker service.
#[derive(Debug, Parser)]
#[command(name = "triad-agent", version)]
struct Args {
    #[arg(long, env = "TRIAD_LISTEN", default_value = "0.0.0.0:8082")]
    listen: SocketAddr,

    #[arg(long, env = "TRIAD_SERVICE_STOP_URL", default_value = "http://localhost:8081/stop")]
    service_stop_url: String,

    /// Milliseconds to wait after the service acknowledges a stop.
    #[arg(long, env = "TRIAD_GRACE_MS", default_value = "2000")]
    grace_ms: u64,

    /// Relay timeout in milliseconds; unset waits for the transport.
    #[arg(long, env = "TRIAD_RELAY_TIMEOUT_MS")]
    relay_timeout_ms: Option<u64>,

    #[arg(long, env = "TRIAD_REQUEST_LOG", default_value = "agent_requests_log.json")]
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
    logger_init(&LoggerConfig::for_tier("agent", args.log_format, args.log_level))?;

    // 2) Relay to the service
    let relay = RelayClient::new(&RelayConfig {
        timeout: args.relay_timeout_ms.map(Duration::from_millis),
    })?;

    // 3) Tier state
    let handle = ListenerHandle::new();
    let config = AgentConfig {
        service_stop_url: args.service_stop_url,
        grace: Duration::from_millis(args.grace_ms),
    };
    info!(
        "agent configured: service={}, grace_ms={}",
        config.service_stop_url, args.grace_ms
    );
    let tier = Arc::new(AgentTier::new(
        config,
        relay,
        RequestLog::new(args.request_log),
        handle.clone(),
    ));

    // 4) Listener
    let listener = bind(args.listen).await?;
    info!("agent listening on http://{}", listener.local_addr()?);
    close_on_signal(handle.clone());

    serve(listener, AgentApi::new(tier).router(), handle).await?;
    info!("agent has stopped");
    Ok(())
}
