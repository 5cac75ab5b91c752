//! Scripted simulation configuration
//!
//! Describes how simulated clients and a simulated host behave so the
//! orchestrator can be exercised end to end without real services.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::registry::{ClientId, ClientSet};
use crate::types::codes;

/// Configuration for a scripted simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Result of the host's service availability check
    pub service_available: bool,

    /// Lifecycle steps, applied in order
    pub steps: Vec<SimulationStep>,

    /// Outcomes of external resolution actions, consumed in order
    pub resolution: Vec<ResolutionOutcome>,

    /// Per-client connection scripts
    pub clients: SimulatedClients,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            service_available: true,
            steps: vec![SimulationStep::Start, SimulationStep::SignIn],
            resolution: vec![ResolutionOutcome::Succeed],
            clients: SimulatedClients::default(),
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self, requested: ClientSet) -> Result<(), ConfigError> {
        let scripted = self.clients.scripted();
        let unrequested = scripted.difference(requested);
        if !unrequested.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "simulation scripts clients that are not requested: {}",
                unrequested
            )));
        }
        Ok(())
    }
}

/// A host lifecycle step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationStep {
    Start,
    Stop,
    SignIn,
    SignOut,
    Reconnect,
}

impl fmt::Display for SimulationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SimulationStep::Start => "start",
            SimulationStep::Stop => "stop",
            SimulationStep::SignIn => "sign_in",
            SimulationStep::SignOut => "sign_out",
            SimulationStep::Reconnect => "reconnect",
        };
        f.write_str(name)
    }
}

/// Scripts for each simulated client; unlisted clients always connect
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatedClients {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub games: Option<SimulatedClientConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social: Option<SimulatedClientConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_state: Option<SimulatedClientConfig>,
}

impl SimulatedClients {
    pub fn get(&self, id: ClientId) -> Option<&SimulatedClientConfig> {
        match id {
            ClientId::Games => self.games.as_ref(),
            ClientId::Social => self.social.as_ref(),
            ClientId::AppState => self.app_state.as_ref(),
        }
    }

    /// Clients with an explicit script
    pub fn scripted(&self) -> ClientSet {
        ClientId::ALL
            .into_iter()
            .filter(|id| self.get(*id).is_some())
            .collect()
    }
}

/// Script for one simulated client
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatedClientConfig {
    /// Outcome of each connection attempt; the last one repeats
    pub outcomes: Vec<ConnectOutcome>,

    /// How the client signs out
    pub sign_out: SignOutMode,
}

/// How a simulated client signs out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignOutMode {
    #[default]
    Immediate,
    Deferred,
}

/// Outcome of an external resolution action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionOutcome {
    /// The user resolved the problem
    Succeed,
    /// The user backed out
    Decline,
    /// The action could not be started
    Undeliverable,
}

/// Outcome of one simulated connection attempt
///
/// Written in configuration as `connect`, `invite:<id>`, `fail`,
/// `fail:<code>`, `fail_resolvable`, `hang`, or `drop`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ConnectOutcome {
    /// Connect successfully
    Connect,
    /// Connect successfully carrying an invitation
    Invite(String),
    /// Fail without a resolution
    Fail(i32),
    /// Fail with a resolution available
    FailResolvable,
    /// Never report back
    Hang,
    /// Connect, then drop the connection
    ConnectThenDrop,
}

impl FromStr for ConnectOutcome {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(id) = s.strip_prefix("invite:") {
            return Ok(ConnectOutcome::Invite(id.to_string()));
        }
        if let Some(code) = s.strip_prefix("fail:") {
            let code = code
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("Invalid failure code in '{}'", s)))?;
            return Ok(ConnectOutcome::Fail(code));
        }
        match s {
            "connect" => Ok(ConnectOutcome::Connect),
            "fail" => Ok(ConnectOutcome::Fail(codes::NETWORK_ERROR)),
            "fail_resolvable" => Ok(ConnectOutcome::FailResolvable),
            "hang" => Ok(ConnectOutcome::Hang),
            "drop" => Ok(ConnectOutcome::ConnectThenDrop),
            other => Err(ConfigError::Invalid(format!(
                "Unknown connect outcome: {}",
                other
            ))),
        }
    }
}

impl TryFrom<String> for ConnectOutcome {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ConnectOutcome> for String {
    fn from(outcome: ConnectOutcome) -> Self {
        outcome.to_string()
    }
}

impl fmt::Display for ConnectOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectOutcome::Connect => f.write_str("connect"),
            ConnectOutcome::Invite(id) => write!(f, "invite:{}", id),
            ConnectOutcome::Fail(code) => write!(f, "fail:{}", code),
            ConnectOutcome::FailResolvable => f.write_str("fail_resolvable"),
            ConnectOutcome::Hang => f.write_str("hang"),
            ConnectOutcome::ConnectThenDrop => f.write_str("drop"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_outcome_parsing() {
        assert_eq!("connect".parse::<ConnectOutcome>().unwrap(), ConnectOutcome::Connect);
        assert_eq!(
            "invite:inv-42".parse::<ConnectOutcome>().unwrap(),
            ConnectOutcome::Invite("inv-42".to_string())
        );
        assert_eq!(
            "fail".parse::<ConnectOutcome>().unwrap(),
            ConnectOutcome::Fail(codes::NETWORK_ERROR)
        );
        assert_eq!("fail:5".parse::<ConnectOutcome>().unwrap(), ConnectOutcome::Fail(5));
        assert!("fail:x".parse::<ConnectOutcome>().is_err());
        assert!("explode".parse::<ConnectOutcome>().is_err());
    }

    #[test]
    fn test_simulation_section_from_toml() {
        let config: SimulationConfig = toml::from_str(
            r#"
            service_available = false
            steps = ["sign_in", "sign_out"]
            resolution = ["decline"]

            [clients.games]
            outcomes = ["fail_resolvable", "invite:abc"]
            sign_out = "deferred"
            "#,
        )
        .unwrap();

        assert!(!config.service_available);
        assert_eq!(config.steps, vec![SimulationStep::SignIn, SimulationStep::SignOut]);
        assert_eq!(config.resolution, vec![ResolutionOutcome::Decline]);

        let games = config.clients.get(ClientId::Games).unwrap();
        assert_eq!(games.sign_out, SignOutMode::Deferred);
        assert_eq!(
            games.outcomes,
            vec![
                ConnectOutcome::FailResolvable,
                ConnectOutcome::Invite("abc".to_string())
            ]
        );
        assert!(config.clients.get(ClientId::Social).is_none());
    }

    #[test]
    fn test_validate_rejects_unrequested_scripts() {
        let mut config = SimulationConfig::default();
        config.clients.social = Some(SimulatedClientConfig::default());

        assert!(config.validate(ClientSet::from(ClientId::Games)).is_err());
        assert!(config.validate(ClientSet::ALL).is_ok());
    }
}
