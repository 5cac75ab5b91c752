//! Ordered record of everything observed during a simulation

use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;

use signet_core::config::{ResolutionOutcome, SimulationStep};
use signet_core::ClientId;

/// One observed event
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TranscriptEntry {
    Step {
        step: SimulationStep,
    },
    ClientCreated {
        client: ClientId,
        scopes: Vec<String>,
    },
    Connect {
        client: ClientId,
        attempt: usize,
        outcome: String,
    },
    Disconnect {
        client: ClientId,
    },
    SignOut {
        client: ClientId,
        deferred: bool,
    },
    ResolutionRequested {
        client: ClientId,
        code: String,
        outcome: ResolutionOutcome,
    },
    Diagnostic {
        code: i32,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    Invitation {
        id: String,
    },
    SignInSuccess,
    SignInFailure,
    Disconnection,
    Rejected {
        error: String,
    },
}

/// Shared, append-only transcript
///
/// Cloned into every simulated collaborator; all clones append to the same
/// list.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Arc<Mutex<Vec<TranscriptEntry>>>,
}

impl Transcript {
    pub fn record(&self, entry: TranscriptEntry) {
        tracing::debug!("Simulation: {:?}", entry);
        self.lock().push(entry);
    }

    pub fn entries(&self) -> Vec<TranscriptEntry> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<TranscriptEntry>> {
        // Entries are only ever pushed, so a poisoned list is still usable
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
