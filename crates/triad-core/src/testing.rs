use std::sync::Mutex;

use async_trait::async_trait;
use tempfile::TempDir;
use triad_journal::RequestLog;
use triad_model::Command;
use triad_relay::{Ack, CommandRelay, RelayError};

/// Relay double that records calls and answers with a fixed status.
pub struct MockRelay {
    status: u16,
    calls: Mutex<Vec<(String, Command)>>,
}

impl MockRelay {
    pub fn acking() -> Self {
        Self::answering(200)
    }

    pub fn answering(status: u16) -> Self {
        Self {
            status,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, Command)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRelay for MockRelay {
    async fn relay(&self, url: &str, command: Command) -> Result<Ack, RelayError> {
        self.calls.lock().unwrap().push((url.to_string(), command));
        if self.status == 200 {
            Ok(Ack {
                body: "ok".to_string(),
            })
        } else {
            Err(RelayError::Rejected {
                url: url.to_string(),
                status: self.status,
            })
        }
    }
}

pub fn temp_log(name: &str) -> (TempDir, RequestLog) {
    let dir = tempfile::tempdir().unwrap();
    let log = RequestLog::new(dir.path().join(name));
    (dir, log)
}
