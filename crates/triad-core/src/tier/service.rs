use std::{
    sync::{Arc, Mutex, PoisonError},
    time::{Duration, Instant},
};

use rand::Rng;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace};
use triad_journal::RequestLog;
use triad_model::ServiceStatus;

use crate::lifecycle::ListenerHandle;

pub const STOPPING_REPLY: &str = "Server stopping...\n";

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Replica id reported by `status`.
    pub id: String,
    /// Interval between simulated load ticks.
    pub load_period: Duration,
    /// Upper bound (inclusive) of tasks added per tick.
    pub max_increment: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            id: "replica-1".to_string(),
            load_period: Duration::from_secs(1),
            max_increment: 9,
        }
    }
}

/// Worker tier: simulates load and reports a status snapshot.
pub struct ServiceTier {
    config: ServiceConfig,
    started: Instant,
    tasks: Mutex<u64>,
    journal: RequestLog,
    handle: ListenerHandle,
}

impl ServiceTier {
    pub fn new(config: ServiceConfig, journal: RequestLog, handle: ListenerHandle) -> Self {
        Self {
            config,
            started: Instant::now(),
            tasks: Mutex::new(0),
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

    /// `GET /status`.
    pub async fn status(&self) -> ServiceStatus {
        self.journal.record_or_warn("/status", "check").await;
        self.snapshot()
    }

    /// Current status without touching the request log.
    pub fn snapshot(&self) -> ServiceStatus {
        ServiceStatus {
            id: self.config.id.clone(),
            uptime: self.started.elapsed(),
            task_count: *self.tasks.lock().unwrap_or_else(PoisonError::into_inner),
        }
    }

    /// Add `n` to the task counter and return the new total.
    pub fn add_tasks(&self, n: u64) -> u64 {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        *tasks = tasks.saturating_add(n);
        *tasks
    }

    /// `POST /stop`.
    ///
    /// Returns immediately; the listener is closed from a separate task so the
    /// reply to this request goes out before the socket does.
    pub async fn stop(&self) -> &'static str {
        self.journal.record_or_warn("/stop", "stop").await;

        if !self.handle.begin_stop() {
            debug!(state = ?self.handle.state(), "stop requested again");
        }
        info!("service stopping");

        let handle = self.handle.clone();
        tokio::spawn(async move {
            tokio::task::yield_now().await;
            handle.close_or_warn("stop command");
        });
        STOPPING_REPLY
    }

    /// Start the load simulation. The loop ends when the listener closes.
    pub fn spawn_load(self: &Arc<Self>) -> JoinHandle<()> {
        let tier = Arc::clone(self);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(tier.config.load_period);
            // interval fires once right away; the first real tick is one period out
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = tier.handle.closed() => {
                        debug!("load simulation stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        let added = next_increment(tier.config.max_increment);
                        let total = tier.add_tasks(added);
                        trace!(added, total, "load tick");
                    }
                }
            }
        })
    }
}

fn next_increment(max: u64) -> u64 {
    rand::thread_rng().gen_range(0..=max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lifecycle::TierState, testing::temp_log};

    fn tier(config: ServiceConfig) -> (tempfile::TempDir, Arc<ServiceTier>) {
        let (dir, log) = temp_log("service_requests_log.json");
        let tier = ServiceTier::new(config, log, ListenerHandle::new());
        (dir, Arc::new(tier))
    }

    #[tokio::test]
    async fn status_reports_counter_and_logs() {
        let (_dir, tier) = tier(ServiceConfig::default());
        tier.add_tasks(5);
        tier.add_tasks(2);

        let status = tier.status().await;
        assert_eq!(status.id, "replica-1");
        assert_eq!(status.task_count, 7);

        let entries = tier.journal().entries().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].endpoint, "/status");
        assert_eq!(entries[0].action, "check");
    }

    #[tokio::test]
    async fn uptime_grows() {
        let (_dir, tier) = tier(ServiceConfig::default());
        let first = tier.snapshot().uptime;
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(tier.snapshot().uptime > first);
    }

    #[tokio::test]
    async fn stop_replies_then_closes() {
        let (_dir, tier) = tier(ServiceConfig::default());

        let reply = tier.stop().await;
        assert_eq!(reply, STOPPING_REPLY);
        assert_ne!(tier.handle().state(), TierState::Running);

        tokio::time::timeout(Duration::from_secs(1), tier.handle().closed())
            .await
            .unwrap();
        assert_eq!(tier.handle().state(), TierState::Closed);

        let entries = tier.journal().entries().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].endpoint, "/stop");
    }

    #[tokio::test]
    async fn repeated_stop_does_not_panic() {
        let (_dir, tier) = tier(ServiceConfig::default());
        tier.stop().await;
        tier.stop().await;

        tokio::time::timeout(Duration::from_secs(1), tier.handle().closed())
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(tier.handle().state(), TierState::Closed);
        assert_eq!(tier.journal().entries().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn load_loop_adds_and_stops_on_close() {
        let config = ServiceConfig {
            load_period: Duration::from_millis(5),
            ..Default::default()
        };
        let (_dir, tier) = tier(config);

        let join = tier.spawn_load();
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert!(tier.snapshot().task_count > 0);

        tier.handle().close().unwrap();
        tokio::time::timeout(Duration::from_secs(1), join)
            .await
            .unwrap()
            .unwrap();

        let frozen = tier.snapshot().task_count;
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(tier.snapshot().task_count, frozen);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_reads_never_go_backwards() {
        let (_dir, tier) = tier(ServiceConfig::default());

        let writer = {
            let tier = Arc::clone(&tier);
            tokio::spawn(async move {
                for _ in 0..2_000 {
                    tier.add_tasks(3);
                    tokio::task::yield_now().await;
                }
            })
        };

        let mut readers = Vec::new();
        for _ in 0..4 {
            let tier = Arc::clone(&tier);
            readers.push(tokio::spawn(async move {
                let mut last = 0;
                for _ in 0..2_000 {
                    let seen = tier.snapshot().task_count;
                    assert!(seen >= last);
                    assert_eq!(seen % 3, 0);
                    last = seen;
                    tokio::task::yield_now().await;
                }
            }));
        }

        writer.await.unwrap();
        for r in readers {
            r.await.unwrap();
        }
        assert_eq!(tier.snapshot().task_count, 6_000);
    }

    #[test]
    fn increments_stay_in_bounds() {
        for _ in 0..1_000 {
            assert!(next_increment(9) <= 9);
        }
        assert_eq!(next_increment(0), 0);
    }
}
