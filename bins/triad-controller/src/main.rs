use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use clap::Parser;
use tracing::info;

use triad_api::{ControllerApi, bind, serve};
use triad_core::{ControllerConfig, ControllerTier, ListenerHandle, close_on_signal};
use triad_journal::RequestLog;
use triad_observe::{LoggerConfig, LoggerFormat, logger_init};
use triad_relay::{RelayClient, RelayConfig};

/// Controller: reports the replica roster and relays start/stop to the agent.
#[derive(Debug, Parser)]
#[command(name = "triad-controller", version)]
struct Args {
    #[arg(long, env = "TRIAD_LISTEN", default_value = "0.0.0.0:8080")]
    listen: SocketAddr,

    #[arg(long, env = "TRIAD_AGENT_URL", default_value = "http://localhost:8082/command")]
    agent_url: String,

    /// Relay timeout in milliseconds; unset waits for the transport.
    #[arg(long, env = "TRIAD_RELAY_TIMEOUT_MS")]
    relay_timeout_ms: Option<u64>,

    #[arg(long, env = "TRIAD_REQUEST_LOG", default_value = "controller_requests_log.json")]
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
    logger_init(&LoggerConfig::for_tier("controller", args.log_format, args.log_level))?;

    // 2) Relay to the agent
    let relay = RelayClient::new(&RelayConfig {
        timeout: args.relay_timeout_ms.map(Duration::from_millis),
    })?;

    // 3) Tier state
    let handle = ListenerHandle::new();
    let config = ControllerConfig {
        agent_command_url: args.agent_url,
        ..Default::default()
    };
    info!(
        "controller configured: agent={}, replicas={}",
        config.agent_command_url,
        config.roster.len()
    );
    let tier = Arc::new(ControllerTier::new(
        config,
        relay,
        RequestLog::new(args.request_log),
    ));

    // 4) Listener
    let listener = bind(args.listen).await?;
    info!("controller listening on http://{}", listener.local_addr()?);
    close_on_signal(handle.clone());

    serve(listener, ControllerApi::new(tier).router(), handle).await?;
    info!("controller has stopped");
    Ok(())
}
