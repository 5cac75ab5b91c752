//! signet-orchestrator: Sequential client sign-in state machine
//!
//! The orchestrator connects the requested remote clients one at a time,
//! escalates failures to host-mediated resolution when the user asked to
//! sign in, and unwinds on host stop, sign-out, or forced disconnection.
//! The lifecycle adapter feeds it host and client events from a single
//! queue so every callback runs to completion before the next one.

pub mod clients;
pub mod lifecycle;
pub mod orchestrator;
pub mod state;

pub use clients::{ClientHandle, ClientTable};
pub use lifecycle::{
    event_channel, ClientEvent, EventReceiver, EventSender, HostLifecycleAdapter, LifecycleEvent,
    OrchestratorEvent,
};
pub use orchestrator::ConnectionOrchestrator;
pub use state::{OrchestratorState, Phase, StatusSnapshot};
