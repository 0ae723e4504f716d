use clap::{Parser, Subcommand};
use tracing::debug;

use triad_model::{ClusterStatus, Command};
use triad_observe::{LoggerConfig, LoggerFormat, logger_init};
use triad_relay::{Ack, RelayClient, RelayConfig, RelayError};

/// One-shot client for the controller.
#[derive(Debug, Parser)]
#[command(name = "triad-ctl", version)]
struct Args {
    #[arg(long, env = "TRIAD_CONTROLLER", default_value = "http://localhost:8080")]
    controller: String,

    #[arg(long, env = "TRIAD_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    action: CtlAction,
}

#[derive(Debug, Subcommand)]
enum CtlAction {
    /// Ask the controller to start the agent.
    Start,
    /// Ask the controller to stop the agent (and, through it, the service).
    Stop,
    /// Print the replica roster.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger_init(&LoggerConfig::for_tier("ctl", LoggerFormat::Text, args.log_level))?;

    let client = RelayClient::new(&RelayConfig::default())?;
    let base = args.controller.trim_end_matches('/');

    match args.action {
        CtlAction::Start => relay(&client, &format!("{base}/start-agent"), Command::start()).await?,
        CtlAction::Stop => relay(&client, &format!("{base}/stop-agent"), Command::stop()).await?,
        CtlAction::Status => {
            let status: ClusterStatus = client.fetch_json(&format!("{base}/cluster-status")).await?;
            for replica in status.replicas {
                println!("{}\t{}", replica.id, replica.status);
            }
        }
    }
    Ok(())
}

async fn relay(client: &RelayClient, url: &str, command: Command) -> anyhow::Result<()> {
    debug!(url, action = %command.action, "sending command");
    let outcome = client.send(url, &command).await;
    if let Some(line) = status_line(&outcome) {
        println!("{line}");
    }
    let ack = outcome?;
    print!("{}", ack.body);
    Ok(())
}

/// The HTTP status the controller answered with; `None` when it never answered.
fn status_line(outcome: &Result<Ack, RelayError>) -> Option<String> {
    match outcome {
        Ok(_) => Some("Response status: 200 OK".to_string()),
        Err(e) => e.status().map(|status| format!("Response status: {status}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_line_follows_the_answer() {
        let ok = Ok(Ack {
            body: "Agent started\n".to_string(),
        });
        assert_eq!(status_line(&ok).as_deref(), Some("Response status: 200 OK"));

        let rejected = Err(RelayError::Rejected {
            url: "http://localhost:8080/stop-agent".to_string(),
            status: 500,
        });
        assert_eq!(
            status_line(&rejected).as_deref(),
            Some("Response status: 500")
        );

        let garbled = Err(RelayError::InvalidResponse {
            url: "http://localhost:8080/stop-agent".to_string(),
            reason: "truncated".to_string(),
        });
        assert_eq!(status_line(&garbled), None);
    }
}
