//! Host lifecycle adapter
//!
//! Glue between the host container and the orchestrator. The host forwards
//! its create/start/stop/activity-result hooks here, and clients report
//! through the adapter's event queue. Events are applied strictly one at a
//! time, so the orchestrator never sees two callbacks interleave.

use tokio::sync::mpsc::error::TryRecvError;
use tokio_util::sync::CancellationToken;

use signet_core::traits::ClientFactory;
use signet_core::{ClientSet, CorrelationCode, OrchestratorError};

use super::events::{
    event_channel, ClientEvent, EventReceiver, EventSender, LifecycleEvent, OrchestratorEvent,
};
use crate::orchestrator::ConnectionOrchestrator;

/// Owns the orchestrator and feeds it host and client events
pub struct HostLifecycleAdapter {
    orchestrator: ConnectionOrchestrator,
    sender: EventSender,
    events: EventReceiver,
}

impl HostLifecycleAdapter {
    /// Wrap an orchestrator with a fresh event queue
    pub fn new(orchestrator: ConnectionOrchestrator) -> Self {
        let (sender, events) = event_channel();
        Self::with_channel(orchestrator, sender, events)
    }

    /// Wrap an orchestrator with an existing event queue
    ///
    /// Used when the host and clients need a sender before the orchestrator
    /// exists.
    pub fn with_channel(
        orchestrator: ConnectionOrchestrator,
        sender: EventSender,
        events: EventReceiver,
    ) -> Self {
        Self {
            orchestrator,
            sender,
            events,
        }
    }

    /// Sender for clients and hosts to report through
    pub fn sender(&self) -> EventSender {
        self.sender.clone()
    }

    pub fn orchestrator(&self) -> &ConnectionOrchestrator {
        &self.orchestrator
    }

    pub fn orchestrator_mut(&mut self) -> &mut ConnectionOrchestrator {
        &mut self.orchestrator
    }

    /// Host created: build the requested clients
    pub fn on_create(
        &mut self,
        requested: ClientSet,
        factory: &mut dyn ClientFactory,
    ) -> Result<(), OrchestratorError> {
        self.orchestrator.initialize(requested, factory)
    }

    pub fn on_start(&mut self) -> Result<(), OrchestratorError> {
        self.orchestrator.on_host_start()
    }

    pub fn on_stop(&mut self) {
        self.orchestrator.on_host_stop();
    }

    pub fn on_activity_result(
        &mut self,
        code: CorrelationCode,
        succeeded: bool,
    ) -> Result<(), OrchestratorError> {
        self.orchestrator
            .on_external_resolution_result(code, succeeded)
    }

    /// Apply a single event to the orchestrator
    pub fn dispatch(&mut self, event: OrchestratorEvent) -> Result<(), OrchestratorError> {
        tracing::trace!("Dispatching {:?}", event);

        match event {
            OrchestratorEvent::Lifecycle(event) => match event {
                LifecycleEvent::Start => self.on_start(),
                LifecycleEvent::Stop => {
                    self.on_stop();
                    Ok(())
                }
                LifecycleEvent::ResolutionResult { code, succeeded } => {
                    self.on_activity_result(code, succeeded)
                }
                LifecycleEvent::SignInRequested => {
                    self.orchestrator.begin_user_initiated_sign_in()
                }
                LifecycleEvent::SignOutRequested => self.orchestrator.sign_out(),
                LifecycleEvent::ReconnectRequested => self.orchestrator.reconnect(),
            },

            OrchestratorEvent::Client(event) => {
                match event {
                    ClientEvent::Connected { client, hint } => {
                        self.orchestrator.on_client_connected(client, hint);
                    }
                    ClientEvent::ConnectionFailed { client, failure } => {
                        self.orchestrator.on_client_connection_failed(client, failure);
                    }
                    ClientEvent::Disconnected { client } => {
                        tracing::info!("Client {} dropped its connection", client);
                        self.orchestrator.on_forced_disconnection();
                    }
                    ClientEvent::SignOutComplete { client } => {
                        self.orchestrator.on_sign_out_operation_complete(client);
                    }
                }
                Ok(())
            }
        }
    }

    /// Apply queued events until the queue is empty
    ///
    /// Events queued while draining are applied too. Stops at the first
    /// contract violation. Returns the number of events applied.
    pub fn drain(&mut self) -> Result<usize, OrchestratorError> {
        let mut applied = 0;
        loop {
            match self.events.try_recv() {
                Ok(event) => {
                    self.dispatch(event)?;
                    applied += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        Ok(applied)
    }

    /// Apply events as they arrive until cancelled
    ///
    /// Contract violations are logged and do not stop the loop. On
    /// cancellation the host is treated as stopped, disconnecting every
    /// client.
    pub async fn run(&mut self, cancel: CancellationToken) {
        tracing::info!("Lifecycle adapter running");

        loop {
            tokio::select! {
                event = self.events.recv() => {
                    let Some(event) = event else {
                        break;
                    };
                    if let Err(e) = self.dispatch(event) {
                        tracing::error!("Rejected event: {}", e);
                    }
                }
                _ = cancel.cancelled() => {
                    tracing::info!("Lifecycle adapter shutting down");
                    break;
                }
            }
        }

        self.on_stop();
    }
}

impl std::fmt::Debug for HostLifecycleAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostLifecycleAdapter")
            .field("orchestrator", &self.orchestrator)
            .finish()
    }
}
