use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Lifecycle action relayed down the tier chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Start,
    Stop,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Start => "start",
            Action::Stop => "stop",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(Action::Start),
            "stop" => Ok(Action::Stop),
            other => Err(ModelError::UnknownAction(other.to_string())),
        }
    }
}

/// Command body sent to a downstream tier.
///
/// Built per relay call and never persisted; only its effect ends up in a request log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub action: Action,
}

impl Command {
    pub fn new(action: Action) -> Self {
        Self { action }
    }

    pub fn start() -> Self {
        Self::new(Action::Start)
    }

    pub fn stop() -> Self {
        Self::new(Action::Stop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_actions() {
        assert_eq!("start".parse::<Action>(), Ok(Action::Start));
        assert_eq!("stop".parse::<Action>(), Ok(Action::Stop));
    }

    #[test]
    fn parse_is_case_sensitive() {
        assert_eq!(
            "STOP".parse::<Action>(),
            Err(ModelError::UnknownAction("STOP".to_string()))
        );
        assert!("".parse::<Action>().is_err());
    }

    #[test]
    fn command_wire_format() {
        let json = serde_json::to_string(&Command::stop()).unwrap();
        assert_eq!(json, r#"{"action":"stop"}"#);

        let back: Command = serde_json::from_str(r#"{"action":"start"}"#).unwrap();
        assert_eq!(back, Command::start());
    }

    #[test]
    fn unknown_action_rejected_on_decode() {
        let res = serde_json::from_str::<Command>(r#"{"action":"restart"}"#);
        assert!(res.is_err());
    }
}
