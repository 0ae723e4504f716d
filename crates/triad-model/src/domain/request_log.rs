use serde::{Deserialize, Serialize};

/// One inbound request as recorded by a tier.
///
/// `time` is an RFC3339 timestamp taken when the entry was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestLogEntry {
    pub endpoint: String,
    pub action: String,
    pub time: String,
}

impl RequestLogEntry {
    pub fn new(endpoint: impl Into<String>, action: impl Into<String>, time: String) -> Self {
        Self {
            endpoint: endpoint.into(),
            action: action.into(),
            time,
        }
    }
}
