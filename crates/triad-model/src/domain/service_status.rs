use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Point-in-time snapshot reported by the worker service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub id: String,
    /// Time since the service process started, rendered as seconds (`"12.345s"`).
    #[serde(with = "uptime_serde")]
    pub uptime: Duration,
    pub task_count: u64,
}

mod uptime_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S>(uptime: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{:.3}s", uptime.as_secs_f64()))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let secs = raw
            .strip_suffix('s')
            .ok_or_else(|| D::Error::custom(format!("uptime without unit: {raw}")))?
            .parse::<f64>()
            .map_err(D::Error::custom)?;
        Duration::try_from_secs_f64(secs).map_err(D::Error::custom)
    }
}
