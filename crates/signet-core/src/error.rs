//! Core error types for signet

use std::path::PathBuf;
use thiserror::Error;

use crate::types::CorrelationCode;

/// Top-level error type for the signet ecosystem
#[derive(Error, Debug)]
pub enum SignetError {
    /// Orchestrator contract violation
    #[error("Orchestrator error: {0}")]
    Orchestrator(#[from] OrchestratorError),

    /// Client registry error
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Misuse of the orchestrator by its host.
///
/// These are programming-contract violations, not runtime conditions the
/// orchestrator can recover from on its own.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrchestratorError {
    /// `initialize` was called a second time
    #[error("Orchestrator is already initialized")]
    AlreadyInitialized,

    /// An operation was invoked before `initialize`
    #[error("Orchestrator has not been initialized")]
    NotInitialized,

    /// A resolution result arrived while no resolution was outstanding
    #[error("Unexpected resolution result {code}: no resolution is outstanding")]
    UnexpectedResolutionResult { code: CorrelationCode },

    /// A resolution result carried a code this orchestrator did not issue
    #[error("Resolution result code mismatch: expected {expected}, received {received}")]
    CorrelationMismatch {
        expected: CorrelationCode,
        received: CorrelationCode,
    },
}

/// Client registry errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Client name does not match any known client
    #[error("Unknown client: {0}")]
    UnknownClient(String),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// Invalid configuration
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialize error
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
