//! Connection orchestrator
//!
//! Connects the requested clients strictly one at a time in priority order
//! and keeps an aggregate signed-in status across them.
//!
//! # Sign-in cycle
//!
//! ```text
//!   Idle --start/sign-in--> Connecting(c) --connected--> Connecting(next) ... --> SignedIn
//!                               |
//!                               +--failed, automatic--> Idle (failure reported, held)
//!                               +--failed, user-initiated--> ResolvingFailure(c)
//!                                       |--resolution ok / dispatch failed--> Connecting(c)
//!                                       +--declined / no resolution--> SignInFailed
//! ```
//!
//! Host stop, sign-out, and forced disconnection return the machine to
//! `Idle`. They do not abort an outstanding `connect()`; a callback that
//! arrives for a client which is no longer pending is ignored.

use signet_core::traits::{ClientFactory, EventSink, Host, SignOutProgress};
use signet_core::{
    ClientId, ClientSet, ConnectionFailure, ConnectionHint, CorrelationCode, OrchestratorError,
    ResolutionRequest,
};

use crate::clients::ClientTable;
use crate::state::{HeldFailure, OrchestratorState, PendingResolution, Phase, StatusSnapshot};

/// Sequential sign-in state machine over the requested clients
pub struct ConnectionOrchestrator {
    state: OrchestratorState,
    clients: Option<ClientTable>,
    host: Box<dyn Host>,
    sink: Option<Box<dyn EventSink>>,
}

impl ConnectionOrchestrator {
    /// Create an orchestrator with automatic sign-in disabled
    pub fn new(host: Box<dyn Host>) -> Self {
        Self::with_auto_sign_in(host, false)
    }

    /// Create an orchestrator with the given initial automatic sign-in mode
    pub fn with_auto_sign_in(host: Box<dyn Host>, auto_sign_in: bool) -> Self {
        Self {
            state: OrchestratorState::new(auto_sign_in),
            clients: None,
            host,
            sink: None,
        }
    }

    /// Install the receiver of terminal outcomes
    pub fn set_event_sink(&mut self, sink: Box<dyn EventSink>) {
        self.sink = Some(sink);
    }

    pub fn state(&self) -> &OrchestratorState {
        &self.state
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        self.state.snapshot()
    }

    pub fn clients(&self) -> Option<&ClientTable> {
        self.clients.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.clients.is_some()
    }

    /// Invitation captured from the games client's connection, if any
    pub fn pending_invitation(&self) -> Option<&str> {
        self.state.pending_invitation()
    }

    /// Hand the captured invitation to the host, clearing it
    pub fn take_invitation(&mut self) -> Option<String> {
        self.state.pending_invitation.take()
    }

    // ------------------------------------------------------------------
    // Host-facing operations
    // ------------------------------------------------------------------

    /// Create one client handle per requested client
    pub fn initialize(
        &mut self,
        requested: ClientSet,
        factory: &mut dyn ClientFactory,
    ) -> Result<(), OrchestratorError> {
        if self.clients.is_some() {
            tracing::error!("Orchestrator initialized twice");
            return Err(OrchestratorError::AlreadyInitialized);
        }

        self.clients = Some(ClientTable::build(requested, factory));
        self.state.requested = requested;
        tracing::info!("Initialized clients: {}", requested);
        Ok(())
    }

    /// Host became visible; connect automatically when allowed
    pub fn on_host_start(&mut self) -> Result<(), OrchestratorError> {
        self.ensure_initialized()?;

        if self.state.awaiting_external_resolution() {
            tracing::debug!("Host started while a resolution is outstanding; not connecting");
            return Ok(());
        }
        if !self.state.auto_sign_in {
            tracing::debug!("Automatic sign-in disabled; waiting for the user");
            return Ok(());
        }
        if let Some(client) = self.state.pending_client() {
            tracing::debug!("Connection of {} already in flight", client);
            return Ok(());
        }
        if self.state.is_signed_in() {
            tracing::debug!("Already signed in");
            return Ok(());
        }

        tracing::info!("Starting automatic sign-in");
        self.start_connections();
        Ok(())
    }

    /// Host went away; tear down every connection
    pub fn on_host_stop(&mut self) {
        if self.clients.is_none() {
            tracing::debug!("Host stopped before initialization");
            return;
        }

        self.disconnect_clients(ClientSet::ALL);
        self.state.connected = ClientSet::NONE;
        self.state.deferred_sign_out = ClientSet::NONE;
        self.state.retried_client = None;
        self.state.phase = Phase::Idle;
        tracing::info!("Host stopped; all clients disconnected");
    }

    /// Result of an external resolution action this orchestrator requested
    pub fn on_external_resolution_result(
        &mut self,
        code: CorrelationCode,
        succeeded: bool,
    ) -> Result<(), OrchestratorError> {
        self.ensure_initialized()?;

        if self.state.is_superseded(&code) {
            tracing::warn!("Ignoring result of superseded resolution {}", code);
            return Ok(());
        }

        let pending = match self.state.resolution {
            Some(pending) if pending.code == code => pending,
            Some(pending) => {
                tracing::error!(
                    "Resolution result {} does not match outstanding request {}",
                    code,
                    pending.code
                );
                return Err(OrchestratorError::CorrelationMismatch {
                    expected: pending.code,
                    received: code,
                });
            }
            None => {
                tracing::error!("Resolution result {} with no resolution outstanding", code);
                return Err(OrchestratorError::UnexpectedResolutionResult { code });
            }
        };

        self.state.resolution = None;
        if succeeded {
            tracing::info!("Resolution succeeded; retrying {}", pending.client);
            self.retry_client(pending.client);
        } else {
            tracing::info!("Resolution declined for {}", pending.client);
            self.cancel_sign_in(None);
        }
        Ok(())
    }

    /// The user asked to sign in
    pub fn begin_user_initiated_sign_in(&mut self) -> Result<(), OrchestratorError> {
        self.ensure_initialized()?;

        if self.state.is_signed_in() {
            tracing::debug!("Already signed in");
            return Ok(());
        }

        self.state.auto_sign_in = true;

        if let Err(diagnostic) = self.host.check_service_availability() {
            tracing::warn!("Service unavailable: {}", diagnostic);
            self.host.present_diagnostic(&diagnostic);
            self.notify_sign_in_failure();
            return Ok(());
        }

        self.state.user_initiated = true;

        if let Some(client) = self.state.pending_client() {
            tracing::debug!("Connection of {} already in flight; now user-initiated", client);
            return Ok(());
        }

        // A held failure means a resolution is in progress; resume it
        if let Some(held) = self.state.held_failure.clone() {
            tracing::info!("Resuming resolution of {} failure", held.client);
            self.state.supersede_resolution();
            self.state.retried_client = None;
            self.state.phase = Phase::ResolvingFailure(held.client);
            self.resolve_failure(held.client, held.failure);
            return Ok(());
        }

        tracing::info!("Starting user-initiated sign-in");
        self.start_connections();
        Ok(())
    }

    /// Sign out of every client and stop connecting automatically
    pub fn sign_out(&mut self) -> Result<(), OrchestratorError> {
        self.ensure_initialized()?;

        self.state.auto_sign_in = false;
        self.state.phase = Phase::Idle;
        self.state.user_initiated = false;
        self.state.retried_client = None;
        self.state.held_failure = None;
        self.state.supersede_resolution();

        let mut deferred = ClientSet::NONE;
        if let Some(clients) = self.clients.as_mut() {
            for id in clients.live().iter() {
                let Some(handle) = clients.get_mut(id) else {
                    continue;
                };
                if handle.begin_sign_out() == SignOutProgress::Pending {
                    tracing::debug!("Sign-out of {} pending; keeping it connected", id);
                    deferred = deferred.with(id);
                }
            }
        }

        self.state.deferred_sign_out = deferred;
        self.disconnect_clients(ClientSet::ALL.difference(deferred));
        tracing::info!("Signed out");
        Ok(())
    }

    /// Disconnect every client in `mask` that is present and connected
    pub fn disconnect_clients(&mut self, mask: ClientSet) {
        let Some(clients) = self.clients.as_mut() else {
            return;
        };

        let live = clients.live();
        for id in mask.intersection(clients.present()).iter() {
            if live.contains(id) {
                if let Some(handle) = clients.get_mut(id) {
                    handle.disconnect();
                }
            }
            // Also forgets clients that dropped on their own since connecting
            self.state.connected = self.state.connected.without(id);
        }
    }

    /// Drop every connection and restart the sequence from the first client
    pub fn reconnect(&mut self) -> Result<(), OrchestratorError> {
        self.ensure_initialized()?;

        if self.state.awaiting_external_resolution() {
            tracing::warn!("Not reconnecting while a resolution is outstanding");
            return Ok(());
        }
        if let Some(client) = self.state.pending_client() {
            tracing::warn!("Not reconnecting while {} is connecting", client);
            return Ok(());
        }

        tracing::info!("Reconnecting all clients");
        self.disconnect_clients(ClientSet::ALL);
        self.start_connections();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Client callbacks
    // ------------------------------------------------------------------

    pub fn on_client_connected(&mut self, client: ClientId, hint: Option<ConnectionHint>) {
        if self.state.pending_client() != Some(client) {
            tracing::warn!(
                "Ignoring connected callback from {} while {}",
                client,
                self.state.phase
            );
            return;
        }

        self.state.connected = self.state.connected.with(client);
        self.state.retried_client = None;
        tracing::debug!("Client {} connected", client);

        if client == ClientId::Games {
            if let Some(invitation_id) = hint.and_then(|h| h.invitation_id) {
                tracing::info!("Connection carried invitation {}", invitation_id);
                self.state.pending_invitation = Some(invitation_id);
            }
        }

        self.connect_next_pending_client();
    }

    pub fn on_client_connection_failed(&mut self, client: ClientId, failure: ConnectionFailure) {
        if self.state.pending_client() != Some(client) {
            tracing::warn!(
                "Ignoring failure callback from {} while {}",
                client,
                self.state.phase
            );
            return;
        }

        tracing::info!("Client {} failed to connect (code {})", client, failure.code);

        if !self.state.user_initiated {
            self.state.phase = Phase::Idle;
            self.state.retried_client = None;
            if failure.has_resolution() {
                self.state.held_failure = Some(HeldFailure { client, failure });
            }
            self.notify_sign_in_failure();
            return;
        }

        if self.state.retried_client == Some(client) {
            tracing::info!("Client {} failed again after resolution; giving up", client);
            self.cancel_sign_in(Some(failure));
            return;
        }

        self.state.phase = Phase::ResolvingFailure(client);
        self.state.held_failure = Some(HeldFailure {
            client,
            failure: failure.clone(),
        });
        self.resolve_failure(client, failure);
    }

    /// A client's connection dropped without being asked to
    pub fn on_forced_disconnection(&mut self) {
        tracing::info!("Forced disconnection while {}", self.state.phase);

        self.state.auto_sign_in = false;
        self.state.phase = Phase::Idle;
        self.state.pending_invitation = None;
        self.state.connected = ClientSet::NONE;
        self.state.retried_client = None;
        self.state.held_failure = None;
        // Nothing is left to resolve, so a late result must not reconnect
        self.state.supersede_resolution();

        if let Some(sink) = self.sink.as_mut() {
            sink.on_disconnection();
        }
    }

    /// A deferred sign-out finished; the client may now be disconnected
    pub fn on_sign_out_operation_complete(&mut self, client: ClientId) {
        if !self.state.deferred_sign_out.contains(client) {
            tracing::warn!("Ignoring unexpected sign-out completion from {}", client);
            return;
        }
        self.state.deferred_sign_out = self.state.deferred_sign_out.without(client);
        self.disconnect_clients(ClientSet::from(client));
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    fn ensure_initialized(&self) -> Result<(), OrchestratorError> {
        if self.clients.is_none() {
            tracing::error!("Orchestrator used before initialization");
            return Err(OrchestratorError::NotInitialized);
        }
        Ok(())
    }

    fn start_connections(&mut self) {
        // A fresh attempt abandons any earlier resolution or sign-out
        self.state.supersede_resolution();
        self.state.deferred_sign_out = ClientSet::NONE;
        self.state.connected = ClientSet::NONE;
        self.state.retried_client = None;
        self.state.held_failure = None;
        self.connect_next_pending_client();
    }

    fn connect_next_pending_client(&mut self) {
        let pending = self.state.requested.difference(self.state.connected);
        match pending.first() {
            None => self.complete_sign_in(),
            Some(client) => self.connect_client(client),
        }
    }

    fn connect_client(&mut self, client: ClientId) {
        self.state.phase = Phase::Connecting(client);
        if let Some(handle) = self.clients.as_mut().and_then(|c| c.get_mut(client)) {
            handle.connect();
        }
    }

    fn retry_client(&mut self, client: ClientId) {
        self.state.retried_client = Some(client);
        self.state.held_failure = None;
        self.connect_client(client);
    }

    fn complete_sign_in(&mut self) {
        self.state.phase = Phase::SignedIn;
        self.state.auto_sign_in = true;
        self.state.user_initiated = false;
        self.state.retried_client = None;
        self.state.held_failure = None;
        tracing::info!("Signed in: {}", self.state.connected);

        if let Some(sink) = self.sink.as_mut() {
            sink.on_sign_in_success();
        }
    }

    fn resolve_failure(&mut self, client: ClientId, failure: ConnectionFailure) {
        let Some(payload) = failure.resolution.clone() else {
            tracing::info!("Failure of {} has no resolution", client);
            self.cancel_sign_in(Some(failure));
            return;
        };

        let request = ResolutionRequest::new(client, payload);
        self.state.resolution = Some(PendingResolution {
            code: request.code,
            client,
        });

        match self.host.start_resolution(&request) {
            Ok(()) => {
                tracing::info!("Requested resolution {} for {}", request.code, client);
            }
            Err(e) => {
                tracing::warn!("{}; retrying {} directly", e, client);
                self.state.resolution = None;
                self.retry_client(client);
            }
        }
    }

    fn cancel_sign_in(&mut self, failure: Option<ConnectionFailure>) {
        self.state.phase = Phase::SignInFailed;
        self.state.auto_sign_in = false;
        self.state.retried_client = None;
        self.state.held_failure = None;
        tracing::info!("Sign-in cancelled");

        if let Some(failure) = failure {
            self.host.present_diagnostic(&failure.diagnostic());
            self.notify_sign_in_failure();
        }
    }

    fn notify_sign_in_failure(&mut self) {
        if let Some(sink) = self.sink.as_mut() {
            sink.on_sign_in_failure();
        }
    }
}

impl std::fmt::Debug for ConnectionOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionOrchestrator")
            .field("state", &self.state)
            .field("clients", &self.clients)
            .field("has_event_sink", &self.sink.is_some())
            .finish()
    }
}
