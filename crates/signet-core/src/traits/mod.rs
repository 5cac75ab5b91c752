//! Core trait definitions

mod client;
mod host;

pub use client::{ClientFactory, RemoteClient, SignOutProgress};
pub use host::{EventSink, Host};
