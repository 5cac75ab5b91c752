//! signet-cli: Command-line interface for signet
//!
//! Provides the `signet` CLI for inspecting client scopes, managing the
//! configuration file, and running scripted sign-in simulations against the
//! orchestrator.

pub mod commands;
pub mod output;
pub mod sim;
