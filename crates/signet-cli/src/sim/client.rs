//! Scripted remote clients

use signet_core::config::{ConnectOutcome, SignOutMode, SimulatedClients};
use signet_core::traits::{ClientFactory, RemoteClient, SignOutProgress};
use signet_core::types::codes;
use signet_core::{ClientId, ConnectionFailure, ConnectionHint, ResolutionPayload};
use signet_orchestrator::EventSender;

use super::transcript::{Transcript, TranscriptEntry};

/// Remote client that plays back a scripted list of connection outcomes
///
/// Outcomes are reported through the orchestrator's event queue rather than
/// by calling back directly, the way a real client reports from its own
/// thread. The last scripted outcome repeats; an unscripted client always
/// connects.
pub struct SimulatedClient {
    id: ClientId,
    outcomes: Vec<ConnectOutcome>,
    sign_out: SignOutMode,
    attempts: usize,
    connected: bool,
    events: EventSender,
    transcript: Transcript,
}

impl SimulatedClient {
    pub fn new(
        id: ClientId,
        outcomes: Vec<ConnectOutcome>,
        sign_out: SignOutMode,
        events: EventSender,
        transcript: Transcript,
    ) -> Self {
        Self {
            id,
            outcomes,
            sign_out,
            attempts: 0,
            connected: false,
            events,
            transcript,
        }
    }

    fn next_outcome(&self) -> ConnectOutcome {
        self.outcomes
            .get(self.attempts)
            .or_else(|| self.outcomes.last())
            .cloned()
            .unwrap_or(ConnectOutcome::Connect)
    }
}

impl RemoteClient for SimulatedClient {
    fn connect(&mut self) {
        let outcome = self.next_outcome();
        self.attempts += 1;
        self.transcript.record(TranscriptEntry::Connect {
            client: self.id,
            attempt: self.attempts,
            outcome: outcome.to_string(),
        });

        match outcome {
            ConnectOutcome::Connect => {
                self.connected = true;
                self.events.connected(self.id, None);
            }
            ConnectOutcome::Invite(invitation_id) => {
                self.connected = true;
                self.events
                    .connected(self.id, Some(ConnectionHint::with_invitation(invitation_id)));
            }
            ConnectOutcome::Fail(code) => {
                self.connected = false;
                let failure = ConnectionFailure::new(code)
                    .with_description(format!("{} connection failed", self.id));
                self.events.connection_failed(self.id, failure);
            }
            ConnectOutcome::FailResolvable => {
                self.connected = false;
                let payload = ResolutionPayload(serde_json::json!({
                    "client": self.id.name(),
                    "attempt": self.attempts,
                }));
                let failure = ConnectionFailure::resolvable(codes::SIGN_IN_REQUIRED, payload)
                    .with_description("account selection required");
                self.events.connection_failed(self.id, failure);
            }
            ConnectOutcome::Hang => {}
            ConnectOutcome::ConnectThenDrop => {
                self.connected = false;
                self.events.connected(self.id, None);
                self.events.disconnected(self.id);
            }
        }
    }

    fn disconnect(&mut self) {
        self.connected = false;
        self.transcript
            .record(TranscriptEntry::Disconnect { client: self.id });
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn begin_sign_out(&mut self) -> SignOutProgress {
        let deferred = self.sign_out == SignOutMode::Deferred;
        self.transcript.record(TranscriptEntry::SignOut {
            client: self.id,
            deferred,
        });

        if deferred {
            self.events.sign_out_complete(self.id);
            SignOutProgress::Pending
        } else {
            SignOutProgress::Complete
        }
    }
}

/// Builds simulated clients from the `[simulation.clients]` scripts
pub struct SimulatedClientFactory {
    scripts: SimulatedClients,
    events: EventSender,
    transcript: Transcript,
}

impl SimulatedClientFactory {
    pub fn new(scripts: SimulatedClients, events: EventSender, transcript: Transcript) -> Self {
        Self {
            scripts,
            events,
            transcript,
        }
    }
}

impl ClientFactory for SimulatedClientFactory {
    fn create(&mut self, id: ClientId, scopes: &[&'static str]) -> Box<dyn RemoteClient> {
        self.transcript.record(TranscriptEntry::ClientCreated {
            client: id,
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
        });

        let (outcomes, sign_out) = match self.scripts.get(id) {
            Some(script) => (script.outcomes.clone(), script.sign_out),
            None => (Vec::new(), SignOutMode::default()),
        };

        Box::new(SimulatedClient::new(
            id,
            outcomes,
            sign_out,
            self.events.clone(),
            self.transcript.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signet_orchestrator::{event_channel, ClientEvent, OrchestratorEvent};

    fn scripted(outcomes: Vec<ConnectOutcome>) -> (SimulatedClient, signet_orchestrator::EventReceiver) {
        let (sender, rx) = event_channel();
        let client = SimulatedClient::new(
            ClientId::Games,
            outcomes,
            SignOutMode::Immediate,
            sender,
            Transcript::default(),
        );
        (client, rx)
    }

    #[test]
    fn test_last_outcome_repeats() {
        let (mut client, mut rx) = scripted(vec![
            ConnectOutcome::Fail(codes::NETWORK_ERROR),
            ConnectOutcome::Connect,
        ]);

        client.connect();
        assert!(matches!(
            rx.try_recv().unwrap(),
            OrchestratorEvent::Client(ClientEvent::ConnectionFailed { .. })
        ));
        assert!(!client.is_connected());

        for _ in 0..2 {
            client.connect();
            assert!(matches!(
                rx.try_recv().unwrap(),
                OrchestratorEvent::Client(ClientEvent::Connected { .. })
            ));
        }
        assert!(client.is_connected());
    }

    #[test]
    fn test_unscripted_client_connects() {
        let (mut client, mut rx) = scripted(Vec::new());
        client.connect();
        assert_eq!(
            rx.try_recv().unwrap(),
            OrchestratorEvent::Client(ClientEvent::Connected {
                client: ClientId::Games,
                hint: None
            })
        );
    }

    #[test]
    fn test_drop_reports_connected_then_disconnected() {
        let (mut client, mut rx) = scripted(vec![ConnectOutcome::ConnectThenDrop]);
        client.connect();

        assert!(matches!(
            rx.try_recv().unwrap(),
            OrchestratorEvent::Client(ClientEvent::Connected { .. })
        ));
        assert_eq!(
            rx.try_recv().unwrap(),
            OrchestratorEvent::Client(ClientEvent::Disconnected {
                client: ClientId::Games
            })
        );
        assert!(!client.is_connected());
    }

    #[test]
    fn test_hang_reports_nothing() {
        let (mut client, mut rx) = scripted(vec![ConnectOutcome::Hang]);
        client.connect();
        assert!(rx.try_recv().is_err());
    }
}
