//! signet-core: Core abstractions and configuration for signet
//!
//! This crate provides the client identifiers, scope registry, failure
//! types, collaborator traits, and configuration structures shared by the
//! orchestrator and the CLI.

pub mod config;
pub mod error;
pub mod registry;
pub mod traits;
pub mod types;

pub use error::{ConfigError, OrchestratorError, RegistryError, SignetError};
pub use registry::{ClientId, ClientSet};
pub use types::{
    ConnectionFailure, ConnectionHint, CorrelationCode, Diagnostic, DispatchError,
    ResolutionPayload, ResolutionRequest,
};
