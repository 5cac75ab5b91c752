//! Events delivered to the orchestrator
//!
//! Clients and hosts report asynchronously through an [`EventSender`]; the
//! adapter owning the matching [`EventReceiver`] applies them one at a time.
//! The channel is unbounded so callbacks can be delivered from synchronous
//! client code without blocking or dropping an outcome.

use tokio::sync::mpsc;

use signet_core::{ClientId, ConnectionFailure, ConnectionHint, CorrelationCode};

/// Events raised by the host container
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleEvent {
    /// Host became visible
    Start,
    /// Host went away
    Stop,
    /// An external resolution action finished
    ResolutionResult {
        code: CorrelationCode,
        succeeded: bool,
    },
    /// The user asked to sign in
    SignInRequested,
    /// The user asked to sign out
    SignOutRequested,
    /// The host asked for every client to reconnect
    ReconnectRequested,
}

/// Callbacks raised by remote clients
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// `connect()` succeeded
    Connected {
        client: ClientId,
        hint: Option<ConnectionHint>,
    },
    /// `connect()` failed
    ConnectionFailed {
        client: ClientId,
        failure: ConnectionFailure,
    },
    /// The connection dropped without being asked to
    Disconnected { client: ClientId },
    /// An asynchronous sign-out finished
    SignOutComplete { client: ClientId },
}

/// Anything the orchestrator reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum OrchestratorEvent {
    Lifecycle(LifecycleEvent),
    Client(ClientEvent),
}

impl From<LifecycleEvent> for OrchestratorEvent {
    fn from(event: LifecycleEvent) -> Self {
        OrchestratorEvent::Lifecycle(event)
    }
}

impl From<ClientEvent> for OrchestratorEvent {
    fn from(event: ClientEvent) -> Self {
        OrchestratorEvent::Client(event)
    }
}

/// Receiving half of the orchestrator event queue
pub type EventReceiver = mpsc::UnboundedReceiver<OrchestratorEvent>;

/// Create the orchestrator event queue
pub fn event_channel() -> (EventSender, EventReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSender { tx }, rx)
}

/// Cloneable handle for delivering events to the orchestrator
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<OrchestratorEvent>,
}

impl EventSender {
    /// Queue an event; returns false once the adapter is gone
    pub fn send(&self, event: impl Into<OrchestratorEvent>) -> bool {
        let event = event.into();
        if self.tx.send(event).is_err() {
            tracing::debug!("Orchestrator event queue closed; event dropped");
            return false;
        }
        true
    }

    pub fn connected(&self, client: ClientId, hint: Option<ConnectionHint>) -> bool {
        self.send(ClientEvent::Connected { client, hint })
    }

    pub fn connection_failed(&self, client: ClientId, failure: ConnectionFailure) -> bool {
        self.send(ClientEvent::ConnectionFailed { client, failure })
    }

    pub fn disconnected(&self, client: ClientId) -> bool {
        self.send(ClientEvent::Disconnected { client })
    }

    pub fn sign_out_complete(&self, client: ClientId) -> bool {
        self.send(ClientEvent::SignOutComplete { client })
    }

    pub fn resolution_result(&self, code: CorrelationCode, succeeded: bool) -> bool {
        self.send(LifecycleEvent::ResolutionResult { code, succeeded })
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
