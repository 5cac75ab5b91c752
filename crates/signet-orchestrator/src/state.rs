//! Orchestrator state record
//!
//! All mutable bookkeeping of the orchestrator lives in one record. The
//! aggregate `signed_in` / `sign_in_error` flags and the pending client are
//! projections of a single [`Phase`], so they can never disagree.

use serde::Serialize;
use std::fmt;

use signet_core::{ClientId, ClientSet, ConnectionFailure, CorrelationCode};

/// Maximum number of superseded resolution codes remembered
const SUPERSEDED_CODES_LIMIT: usize = 8;

/// Where the orchestrator is in the sign-in cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "client", rename_all = "snake_case")]
pub enum Phase {
    /// Nothing in flight
    Idle,
    /// `connect()` is outstanding on exactly this client
    Connecting(ClientId),
    /// This client failed and its failure is being resolved
    ResolvingFailure(ClientId),
    /// Every requested client is connected
    SignedIn,
    /// The last sign-in attempt was given up
    SignInFailed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => f.write_str("idle"),
            Phase::Connecting(client) => write!(f, "connecting({})", client),
            Phase::ResolvingFailure(client) => write!(f, "resolving_failure({})", client),
            Phase::SignedIn => f.write_str("signed_in"),
            Phase::SignInFailed => f.write_str("sign_in_failed"),
        }
    }
}

/// An external resolution the host was asked to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PendingResolution {
    pub code: CorrelationCode,
    pub client: ClientId,
}

/// A failure kept so a later user-initiated sign-in can resolve it
#[derive(Debug, Clone)]
pub(crate) struct HeldFailure {
    pub client: ClientId,
    pub failure: ConnectionFailure,
}

/// Mutable state of one orchestrator instance
#[derive(Debug, Clone)]
pub struct OrchestratorState {
    pub(crate) requested: ClientSet,
    pub(crate) connected: ClientSet,
    pub(crate) phase: Phase,
    pub(crate) auto_sign_in: bool,
    pub(crate) user_initiated: bool,
    /// Client reconnecting after its failure was resolved (or its resolution
    /// could not be dispatched); its next failure is terminal.
    pub(crate) retried_client: Option<ClientId>,
    pub(crate) resolution: Option<PendingResolution>,
    pub(crate) superseded: Vec<CorrelationCode>,
    /// Resolvable failure awaiting resolution. Its presence is what makes the
    /// orchestrator "resolving a failure".
    pub(crate) held_failure: Option<HeldFailure>,
    pub(crate) deferred_sign_out: ClientSet,
    pub(crate) pending_invitation: Option<String>,
}

impl OrchestratorState {
    pub(crate) fn new(auto_sign_in: bool) -> Self {
        Self {
            requested: ClientSet::NONE,
            connected: ClientSet::NONE,
            phase: Phase::Idle,
            auto_sign_in,
            user_initiated: false,
            retried_client: None,
            resolution: None,
            superseded: Vec::new(),
            held_failure: None,
            deferred_sign_out: ClientSet::NONE,
            pending_invitation: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn requested(&self) -> ClientSet {
        self.requested
    }

    pub fn connected(&self) -> ClientSet {
        self.connected
    }

    /// Client with an outstanding `connect()` call
    pub fn pending_client(&self) -> Option<ClientId> {
        match self.phase {
            Phase::Connecting(client) => Some(client),
            _ => None,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.phase == Phase::SignedIn
    }

    pub fn has_sign_in_error(&self) -> bool {
        self.phase == Phase::SignInFailed
    }

    pub fn auto_sign_in_enabled(&self) -> bool {
        self.auto_sign_in
    }

    pub fn is_user_initiated(&self) -> bool {
        self.user_initiated
    }

    pub fn awaiting_external_resolution(&self) -> bool {
        self.resolution.is_some()
    }

    /// A resolvable failure is held; a user sign-in resumes its resolution
    pub fn is_resolving_failure(&self) -> bool {
        self.held_failure.is_some()
    }

    pub fn pending_invitation(&self) -> Option<&str> {
        self.pending_invitation.as_deref()
    }

    /// Retire the outstanding resolution, remembering its code so a late
    /// result for it can be recognized.
    pub(crate) fn supersede_resolution(&mut self) {
        if let Some(previous) = self.resolution.take() {
            if self.superseded.len() == SUPERSEDED_CODES_LIMIT {
                self.superseded.remove(0);
            }
            self.superseded.push(previous.code);
        }
    }

    pub(crate) fn is_superseded(&self, code: &CorrelationCode) -> bool {
        self.superseded.contains(code)
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            phase: self.phase,
            requested: self.requested,
            connected: self.connected,
            pending_client: self.pending_client(),
            signed_in: self.is_signed_in(),
            sign_in_error: self.has_sign_in_error(),
            auto_sign_in: self.auto_sign_in,
            user_initiated: self.user_initiated,
            awaiting_external_resolution: self.awaiting_external_resolution(),
            resolving_failure: self.is_resolving_failure(),
            pending_invitation: self.pending_invitation.clone(),
        }
    }
}

/// Read-only view of the orchestrator state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSnapshot {
    pub phase: Phase,
    pub requested: ClientSet,
    pub connected: ClientSet,
    pub pending_client: Option<ClientId>,
    pub signed_in: bool,
    pub sign_in_error: bool,
    pub auto_sign_in: bool,
    pub user_initiated: bool,
    pub awaiting_external_resolution: bool,
    pub resolving_failure: bool,
    pub pending_invitation: Option<String>,
}
