use tracing::{info, warn};
use triad_journal::RequestLog;
use triad_model::{Action, ClusterStatus, Command, Replica};
use triad_relay::{Ack, CommandRelay};

use crate::error::CoreError;

pub const STARTED_REPLY: &str = "Agent started\n";
pub const STOPPED_REPLY: &str = "Agent stopped\n";

#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Command endpoint of the agent this controller drives.
    pub agent_command_url: String,
    /// Replicas reported by `cluster_status`.
    pub roster: Vec<Replica>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            agent_command_url: "http://localhost:8082/command".to_string(),
            roster: vec![Replica::running("replica-1"), Replica::running("replica-2")],
        }
    }
}

/// Top tier: holds the replica roster and relays start/stop to the agent.
///
/// The roster is seeded at construction and never follows what the agent
/// actually does.
pub struct ControllerTier<R> {
    config: ControllerConfig,
    relay: R,
    journal: RequestLog,
}

impl<R> ControllerTier<R>
where
    R: CommandRelay,
{
    pub fn new(config: ControllerConfig, relay: R, journal: RequestLog) -> Self {
        Self {
            config,
            relay,
            journal,
        }
    }

    pub fn journal(&self) -> &RequestLog {
        &self.journal
    }

    /// `GET /cluster-status`.
    pub async fn cluster_status(&self) -> ClusterStatus {
        self.journal.record_or_warn("/cluster-status", "status").await;
        ClusterStatus {
            replicas: self.config.roster.clone(),
        }
    }

    /// `/start-agent`.
    pub async fn start_agent(&self) -> Result<&'static str, CoreError> {
        self.dispatch("/start-agent", Action::Start).await?;
        Ok(STARTED_REPLY)
    }

    /// `/stop-agent`.
    pub async fn stop_agent(&self) -> Result<&'static str, CoreError> {
        self.dispatch("/stop-agent", Action::Stop).await?;
        Ok(STOPPED_REPLY)
    }

    async fn dispatch(&self, endpoint: &str, action: Action) -> Result<Ack, CoreError> {
        self.journal.record_or_warn(endpoint, action.as_str()).await;

        let url = &self.config.agent_command_url;
        match self.relay.relay(url, Command::new(action)).await {
            Ok(ack) => {
                info!(url, %action, "agent accepted command");
                Ok(ack)
            }
            Err(source) => {
                warn!(url, %action, error = %source, "agent relay failed");
                Err(CoreError::AgentRelay { action, source })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockRelay, temp_log};

    fn controller(relay: MockRelay) -> (tempfile::TempDir, ControllerTier<MockRelay>) {
        let (dir, log) = temp_log("controller_requests_log.json");
        let config = ControllerConfig {
            agent_command_url: "http://agent.test/command".to_string(),
            ..Default::default()
        };
        (dir, ControllerTier::new(config, relay, log))
    }

    #[tokio::test]
    async fn relays_typed_commands() {
        let (_dir, controller) = controller(MockRelay::acking());

        assert_eq!(controller.start_agent().await.unwrap(), STARTED_REPLY);
        assert_eq!(controller.stop_agent().await.unwrap(), STOPPED_REPLY);

        let url = "http://agent.test/command".to_string();
        assert_eq!(
            controller.relay.calls(),
            vec![(url.clone(), Command::start()), (url, Command::stop())]
        );
    }

    #[tokio::test]
    async fn relay_failure_names_the_action() {
        let (_dir, controller) = controller(MockRelay::answering(500));

        let err = controller.stop_agent().await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::AgentRelay { action: Action::Stop, ref source } if source.status() == Some(500)
        ));
    }

    #[tokio::test]
    async fn roster_ignores_agent_traffic() {
        let (_dir, controller) = controller(MockRelay::acking());
        let before = controller.cluster_status().await;

        controller.stop_agent().await.unwrap();
        controller.start_agent().await.unwrap();

        let after = controller.cluster_status().await;
        assert_eq!(after, before);
        assert_eq!(after.replicas.len(), 2);
        assert_eq!(after.replicas[0], Replica::running("replica-1"));
    }

    #[tokio::test]
    async fn every_call_is_logged() {
        let (_dir, controller) = controller(MockRelay::answering(503));

        controller.cluster_status().await;
        let _ = controller.start_agent().await;
        let _ = controller.stop_agent().await;

        let seen: Vec<_> = controller
            .journal()
            .entries()
            .await
            .unwrap()
            .into_iter()
            .map(|e| (e.endpoint, e.action))
            .collect();
        assert_eq!(
            seen,
            vec![
                ("/cluster-status".to_string(), "status".to_string()),
                ("/start-agent".to_string(), "start".to_string()),
                ("/stop-agent".to_string(), "stop".to_string()),
            ]
        );
    }
}
