//! Orchestrator configuration

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::registry::{ClientId, ClientSet};

/// Configuration for the connection orchestrator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Clients requested for initialization and connection
    pub clients: ClientSet,

    /// Whether a host start connects automatically before the user has
    /// signed in once
    pub auto_sign_in: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            clients: ClientSet::from(ClientId::Games),
            auto_sign_in: false,
        }
    }
}

impl OrchestratorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.clients.is_empty() {
            return Err(ConfigError::Invalid(
                "orchestrator.clients must name at least one client".to_string(),
            ));
        }
        Ok(())
    }
}
