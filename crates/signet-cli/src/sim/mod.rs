//! Scripted end-to-end simulation
//!
//! Wires simulated clients, a simulated host, and a transcript sink to a
//! real orchestrator, then replays the configured lifecycle steps. After
//! each step the event queue is drained so every callback the step caused
//! has been applied before the next step runs.

mod client;
mod host;
mod transcript;

pub use client::{SimulatedClient, SimulatedClientFactory};
pub use host::{SimulatedHost, TranscriptSink};
pub use transcript::{Transcript, TranscriptEntry};

use serde::Serialize;

use signet_core::config::{SimulationConfig, SimulationStep};
use signet_core::ClientSet;
use signet_orchestrator::{
    event_channel, ConnectionOrchestrator, HostLifecycleAdapter, LifecycleEvent, StatusSnapshot,
};

/// Everything a simulation run observed
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub transcript: Vec<TranscriptEntry>,
    pub status: StatusSnapshot,
}

fn lifecycle_event(step: SimulationStep) -> LifecycleEvent {
    match step {
        SimulationStep::Start => LifecycleEvent::Start,
        SimulationStep::Stop => LifecycleEvent::Stop,
        SimulationStep::SignIn => LifecycleEvent::SignInRequested,
        SimulationStep::SignOut => LifecycleEvent::SignOutRequested,
        SimulationStep::Reconnect => LifecycleEvent::ReconnectRequested,
    }
}

/// Run the scripted steps against a fresh orchestrator
pub fn run_simulation(
    requested: ClientSet,
    auto_sign_in: bool,
    config: &SimulationConfig,
) -> SimulationReport {
    let transcript = Transcript::default();
    let (sender, events) = event_channel();

    let host = SimulatedHost::new(
        config.service_available,
        config.resolution.clone(),
        sender.clone(),
        transcript.clone(),
    );
    let mut orchestrator = ConnectionOrchestrator::with_auto_sign_in(Box::new(host), auto_sign_in);
    orchestrator.set_event_sink(Box::new(TranscriptSink::new(transcript.clone())));

    let mut adapter = HostLifecycleAdapter::with_channel(orchestrator, sender.clone(), events);
    let mut factory =
        SimulatedClientFactory::new(config.clients.clone(), sender, transcript.clone());

    if let Err(e) = adapter.on_create(requested, &mut factory) {
        transcript.record(TranscriptEntry::Rejected {
            error: e.to_string(),
        });
    }

    for step in &config.steps {
        tracing::info!("Simulation step: {}", step);
        transcript.record(TranscriptEntry::Step { step: *step });

        if let Err(e) = adapter.dispatch(lifecycle_event(*step).into()) {
            transcript.record(TranscriptEntry::Rejected {
                error: e.to_string(),
            });
        }
        settle(&mut adapter, &transcript);

        if let Some(id) = adapter.orchestrator_mut().take_invitation() {
            transcript.record(TranscriptEntry::Invitation { id });
        }
    }

    SimulationReport {
        transcript: transcript.entries(),
        status: adapter.orchestrator().snapshot(),
    }
}

/// Drain the queue completely, recording rejected events and carrying on
fn settle(adapter: &mut HostLifecycleAdapter, transcript: &Transcript) {
    loop {
        match adapter.drain() {
            Ok(_) => break,
            Err(e) => transcript.record(TranscriptEntry::Rejected {
                error: e.to_string(),
            }),
        }
    }
}
