//! Core domain types

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::registry::ClientId;

/// Well-known failure codes reported by remote clients
pub mod codes {
    pub const SUCCESS: i32 = 0;
    pub const SERVICE_MISSING: i32 = 1;
    pub const SERVICE_VERSION_UPDATE_REQUIRED: i32 = 2;
    pub const SERVICE_DISABLED: i32 = 3;
    pub const SIGN_IN_REQUIRED: i32 = 4;
    pub const INVALID_ACCOUNT: i32 = 5;
    pub const RESOLUTION_REQUIRED: i32 = 6;
    pub const NETWORK_ERROR: i32 = 7;
    pub const INTERNAL_ERROR: i32 = 8;
}

/// Token pairing an external resolution request with its result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorrelationCode(Uuid);

impl CorrelationCode {
    /// Issue a fresh code
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for CorrelationCode {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CorrelationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque data the host needs to run a resolution action
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolutionPayload(pub serde_json::Value);

/// Side-channel data delivered with a successful connection
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConnectionHint {
    /// Identifier of a pending invitation, if the connection carried one
    pub invitation_id: Option<String>,
}

impl ConnectionHint {
    pub fn with_invitation(invitation_id: impl Into<String>) -> Self {
        Self {
            invitation_id: Some(invitation_id.into()),
        }
    }
}

/// Why a client failed to connect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionFailure {
    /// Failure code (see [`codes`])
    pub code: i32,
    /// Human-readable description
    pub description: Option<String>,
    /// Present when the failure can be resolved by an external action
    pub resolution: Option<ResolutionPayload>,
}

impl ConnectionFailure {
    /// A failure with no resolution path
    pub fn new(code: i32) -> Self {
        Self {
            code,
            description: None,
            resolution: None,
        }
    }

    /// A failure the host can try to resolve
    pub fn resolvable(code: i32, payload: ResolutionPayload) -> Self {
        Self {
            code,
            description: None,
            resolution: Some(payload),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn has_resolution(&self) -> bool {
        self.resolution.is_some()
    }

    /// Diagnostic to present to the user for this failure
    pub fn diagnostic(&self) -> Diagnostic {
        Diagnostic {
            code: self.code,
            description: self.description.clone(),
        }
    }
}

/// A diagnostic the host presents to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: i32,
    pub description: Option<String>,
}

impl Diagnostic {
    pub fn new(code: i32) -> Self {
        Self {
            code,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.description {
            Some(description) => write!(f, "error {}: {}", self.code, description),
            None => write!(f, "error {}", self.code),
        }
    }
}

/// Request for the host to start an external resolution action
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolutionRequest {
    /// Code the host must echo back with the result
    pub code: CorrelationCode,
    /// Client whose connection will be retried
    pub client: ClientId,
    /// Opaque resolution data from the failure
    pub payload: ResolutionPayload,
}

impl ResolutionRequest {
    /// Build a request with a freshly issued correlation code
    pub fn new(client: ClientId, payload: ResolutionPayload) -> Self {
        Self {
            code: CorrelationCode::new(),
            client,
            payload,
        }
    }
}

/// The host could not start a resolution action
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Resolution could not be dispatched: {0}")]
pub struct DispatchError(pub String);
