//! Simulated host container and event sink

use signet_core::config::ResolutionOutcome;
use signet_core::traits::{EventSink, Host};
use signet_core::types::codes;
use signet_core::{Diagnostic, DispatchError, ResolutionRequest};
use signet_orchestrator::EventSender;

use super::transcript::{Transcript, TranscriptEntry};

/// Host that answers resolution requests from a script
///
/// A delivered resolution reports its result through the event queue, so
/// the orchestrator sees it as a later activity result. Outcomes are
/// consumed in order and the last one repeats.
pub struct SimulatedHost {
    service_available: bool,
    resolutions: Vec<ResolutionOutcome>,
    requests: usize,
    events: EventSender,
    transcript: Transcript,
}

impl SimulatedHost {
    pub fn new(
        service_available: bool,
        resolutions: Vec<ResolutionOutcome>,
        events: EventSender,
        transcript: Transcript,
    ) -> Self {
        Self {
            service_available,
            resolutions,
            requests: 0,
            events,
            transcript,
        }
    }

    fn next_outcome(&mut self) -> ResolutionOutcome {
        let outcome = self
            .resolutions
            .get(self.requests)
            .or_else(|| self.resolutions.last())
            .copied()
            .unwrap_or(ResolutionOutcome::Succeed);
        self.requests += 1;
        outcome
    }
}

impl Host for SimulatedHost {
    fn check_service_availability(&self) -> Result<(), Diagnostic> {
        if self.service_available {
            Ok(())
        } else {
            Err(Diagnostic::new(codes::SERVICE_MISSING)
                .with_description("sign-in service is not installed"))
        }
    }

    fn start_resolution(&mut self, request: &ResolutionRequest) -> Result<(), DispatchError> {
        let outcome = self.next_outcome();
        self.transcript.record(TranscriptEntry::ResolutionRequested {
            client: request.client,
            code: request.code.to_string(),
            outcome,
        });

        match outcome {
            ResolutionOutcome::Undeliverable => Err(DispatchError(format!(
                "no handler for {} resolution",
                request.client
            ))),
            ResolutionOutcome::Succeed | ResolutionOutcome::Decline => {
                self.events
                    .resolution_result(request.code, outcome == ResolutionOutcome::Succeed);
                Ok(())
            }
        }
    }

    fn present_diagnostic(&mut self, diagnostic: &Diagnostic) {
        self.transcript.record(TranscriptEntry::Diagnostic {
            code: diagnostic.code,
            description: diagnostic.description.clone(),
        });
    }
}

/// Event sink that writes terminal outcomes to the transcript
pub struct TranscriptSink {
    transcript: Transcript,
}

impl TranscriptSink {
    pub fn new(transcript: Transcript) -> Self {
        Self { transcript }
    }
}

impl EventSink for TranscriptSink {
    fn on_sign_in_success(&mut self) {
        self.transcript.record(TranscriptEntry::SignInSuccess);
    }

    fn on_sign_in_failure(&mut self) {
        self.transcript.record(TranscriptEntry::SignInFailure);
    }

    fn on_disconnection(&mut self) {
        self.transcript.record(TranscriptEntry::Disconnection);
    }
}
