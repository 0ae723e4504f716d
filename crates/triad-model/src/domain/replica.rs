use std::fmt;

use serde::{Deserialize, Serialize};

/// Last known state of a replica as reported by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplicaStatus {
    Running,
    Stopped,
}

impl fmt::Display for ReplicaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplicaStatus::Running => f.write_str("running"),
            ReplicaStatus::Stopped => f.write_str("stopped"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replica {
    pub id: String,
    pub status: ReplicaStatus,
}

impl Replica {
    pub fn running(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: ReplicaStatus::Running,
        }
    }
}

/// Roster snapshot returned by `GET /cluster-status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterStatus {
    pub replicas: Vec<Replica>,
}
