use std::time::Duration;

use tracing::{debug, error, info};
use triad_journal::RequestLog;
use triad_model::{Action, Command};
use triad_relay::CommandRelay;

use crate::{error::CoreError, lifecycle::ListenerHandle};

#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Stop endpoint of the worker service this agent fronts.
    pub service_stop_url: String,
    /// Delay between the service acknowledging a stop and the agent closing itself.
    pub grace: Duration,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            service_stop_url: "http://localhost:8081/stop".to_string(),
            grace: Duration::from_secs(2),
        }
    }
}

/// Middle tier: turns commands into service lifecycle calls.
///
/// A `stop` only tears the agent down after the service has acknowledged its
/// own stop. The wait that follows is a fixed delay, not a readiness check, so
/// the service may still be closing when the agent goes away.
pub struct AgentTier<R> {
    config: AgentConfig,
    relay: R,
    journal: RequestLog,
    handle: ListenerHandle,
}

impl<R> AgentTier<R>
where
    R: CommandRelay,
{
    pub fn new(config: AgentConfig, relay: R, journal: RequestLog, handle: ListenerHandle) -> Self {
        Self {
            config,
            relay,
            journal,
            handle,
        }
    }

    pub fn handle(&self) -> &ListenerHandle {
        &self.handle
    }

    pub fn journal(&self) -> &RequestLog {
        &self.journal
    }

    /// `POST /command`. The raw action is logged before it is validated.
    pub async fn command(&self, action: &str) -> Result<String, CoreError> {
        self.journal.record_or_warn("/command", action).await;

        let action: Action = action
            .parse()
            .map_err(|_| CoreError::UnknownAction(action.to_string()))?;

        match action {
            // the service process is started outside the agent
            Action::Start => info!("starting the service"),
            Action::Stop => self.stop_service().await?,
        }
        Ok(format!("Command {action} executed successfully"))
    }

    async fn stop_service(&self) -> Result<(), CoreError> {
        let url = &self.config.service_stop_url;
        info!(url, "stopping the service");

        if let Err(e) = self.relay.relay(url, Command::stop()).await {
            error!(url, error = %e, "service did not accept stop");
            return Err(CoreError::ServiceStop(e));
        }
        info!(url, "service acknowledged stop");

        self.schedule_shutdown();
        Ok(())
    }

    fn schedule_shutdown(&self) {
        if !self.handle.begin_stop() {
            debug!(state = ?self.handle.state(), "agent shutdown already scheduled");
            return;
        }

        let handle = self.handle.clone();
        let grace = self.config.grace;
        tokio::spawn(async move {
            info!(grace_ms = grace.as_millis() as u64, "waiting before stopping the agent");
            tokio::time::sleep(grace).await;
            handle.close_or_warn("stop command");
        });
    }
}
