//! Shared test doubles for orchestrator integration tests
//!
//! Mock clients, host, and event sink record every call into one shared
//! `World`, so a test can assert the exact order of side effects.

#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard};

use signet_core::traits::{ClientFactory, EventSink, Host, RemoteClient, SignOutProgress};
use signet_core::types::codes;
use signet_core::{
    ClientId, ClientSet, ConnectionFailure, ConnectionHint, Diagnostic, DispatchError,
    ResolutionPayload, ResolutionRequest,
};
use signet_orchestrator::ConnectionOrchestrator;

/// A side effect observed by the test doubles
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Connect(ClientId),
    Disconnect(ClientId),
    SignOut(ClientId),
    ResolutionRequested(ClientId),
    Diagnostic(i32),
    SignInSuccess,
    SignInFailure,
    Disconnection,
}

#[derive(Debug, Default)]
pub struct World {
    pub calls: Vec<Call>,
    pub connected: [bool; ClientId::COUNT],
    pub deferred_sign_out: [bool; ClientId::COUNT],
    pub service_unavailable: Option<Diagnostic>,
    pub dispatch_fails: bool,
    pub resolutions: Vec<ResolutionRequest>,
    pub scopes: Vec<(ClientId, Vec<&'static str>)>,
}

pub type SharedWorld = Arc<Mutex<World>>;

fn lock(world: &SharedWorld) -> MutexGuard<'_, World> {
    world.lock().expect("world lock poisoned")
}

pub struct MockClient {
    id: ClientId,
    world: SharedWorld,
}

impl RemoteClient for MockClient {
    fn connect(&mut self) {
        lock(&self.world).calls.push(Call::Connect(self.id));
    }

    fn disconnect(&mut self) {
        let mut world = lock(&self.world);
        world.connected[self.id.index()] = false;
        world.calls.push(Call::Disconnect(self.id));
    }

    fn is_connected(&self) -> bool {
        lock(&self.world).connected[self.id.index()]
    }

    fn begin_sign_out(&mut self) -> SignOutProgress {
        let mut world = lock(&self.world);
        world.calls.push(Call::SignOut(self.id));
        if world.deferred_sign_out[self.id.index()] {
            SignOutProgress::Pending
        } else {
            SignOutProgress::Complete
        }
    }
}

pub struct MockFactory {
    world: SharedWorld,
}

impl ClientFactory for MockFactory {
    fn create(&mut self, id: ClientId, scopes: &[&'static str]) -> Box<dyn RemoteClient> {
        lock(&self.world).scopes.push((id, scopes.to_vec()));
        Box::new(MockClient {
            id,
            world: Arc::clone(&self.world),
        })
    }
}

pub struct MockHost {
    world: SharedWorld,
}

impl Host for MockHost {
    fn check_service_availability(&self) -> Result<(), Diagnostic> {
        match &lock(&self.world).service_unavailable {
            Some(diagnostic) => Err(diagnostic.clone()),
            None => Ok(()),
        }
    }

    fn start_resolution(&mut self, request: &ResolutionRequest) -> Result<(), DispatchError> {
        let mut world = lock(&self.world);
        world.calls.push(Call::ResolutionRequested(request.client));
        world.resolutions.push(request.clone());
        if world.dispatch_fails {
            return Err(DispatchError("no activity to handle the resolution".to_string()));
        }
        Ok(())
    }

    fn present_diagnostic(&mut self, diagnostic: &Diagnostic) {
        lock(&self.world).calls.push(Call::Diagnostic(diagnostic.code));
    }
}

pub struct MockSink {
    world: SharedWorld,
}

impl EventSink for MockSink {
    fn on_sign_in_success(&mut self) {
        lock(&self.world).calls.push(Call::SignInSuccess);
    }

    fn on_sign_in_failure(&mut self) {
        lock(&self.world).calls.push(Call::SignInFailure);
    }

    fn on_disconnection(&mut self) {
        lock(&self.world).calls.push(Call::Disconnection);
    }
}

/// Build an uninitialized orchestrator wired to a fresh world
pub fn uninitialized(auto_sign_in: bool) -> (ConnectionOrchestrator, SharedWorld) {
    let world = SharedWorld::default();
    let mut orchestrator = ConnectionOrchestrator::with_auto_sign_in(
        Box::new(MockHost {
            world: Arc::clone(&world),
        }),
        auto_sign_in,
    );
    orchestrator.set_event_sink(Box::new(MockSink {
        world: Arc::clone(&world),
    }));
    (orchestrator, world)
}

pub fn factory(world: &SharedWorld) -> MockFactory {
    MockFactory {
        world: Arc::clone(world),
    }
}

pub fn resolvable() -> ConnectionFailure {
    ConnectionFailure::resolvable(
        codes::SIGN_IN_REQUIRED,
        ResolutionPayload(serde_json::json!({ "action": "pick-account" })),
    )
}

pub fn unresolvable() -> ConnectionFailure {
    ConnectionFailure::new(codes::NETWORK_ERROR).with_description("network unreachable")
}

/// Initialized orchestrator plus the world its doubles report into
pub struct Harness {
    pub orchestrator: ConnectionOrchestrator,
    pub world: SharedWorld,
}

impl Harness {
    pub fn new(requested: ClientSet) -> Self {
        Self::with_auto_sign_in(requested, false)
    }

    pub fn with_auto_sign_in(requested: ClientSet, auto_sign_in: bool) -> Self {
        let (mut orchestrator, world) = uninitialized(auto_sign_in);
        orchestrator
            .initialize(requested, &mut factory(&world))
            .expect("first initialization succeeds");
        Self {
            orchestrator,
            world,
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        lock(&self.world).calls.clone()
    }

    /// Calls recorded since the last take
    pub fn take_calls(&self) -> Vec<Call> {
        std::mem::take(&mut lock(&self.world).calls)
    }

    pub fn count(&self, call: &Call) -> usize {
        lock(&self.world).calls.iter().filter(|c| *c == call).count()
    }

    pub fn last_resolution(&self) -> Option<ResolutionRequest> {
        lock(&self.world).resolutions.last().cloned()
    }

    pub fn set_live(&self, id: ClientId, connected: bool) {
        lock(&self.world).connected[id.index()] = connected;
    }

    pub fn is_live(&self, id: ClientId) -> bool {
        lock(&self.world).connected[id.index()]
    }

    pub fn defer_sign_out(&self, id: ClientId) {
        lock(&self.world).deferred_sign_out[id.index()] = true;
    }

    pub fn fail_dispatch(&self) {
        lock(&self.world).dispatch_fails = true;
    }

    pub fn make_service_unavailable(&self, code: i32) {
        lock(&self.world).service_unavailable = Some(Diagnostic::new(code));
    }

    /// Client reports a successful connection
    pub fn succeed(&mut self, id: ClientId) {
        self.set_live(id, true);
        self.orchestrator.on_client_connected(id, None);
    }

    pub fn succeed_with_invitation(&mut self, id: ClientId, invitation: &str) {
        self.set_live(id, true);
        self.orchestrator
            .on_client_connected(id, Some(ConnectionHint::with_invitation(invitation)));
    }

    /// Client reports a failed connection
    pub fn fail(&mut self, id: ClientId, failure: ConnectionFailure) {
        self.set_live(id, false);
        self.orchestrator.on_client_connection_failed(id, failure);
    }

    /// Sign in through the user path with every client connecting
    pub fn sign_in_all(&mut self) {
        self.orchestrator
            .begin_user_initiated_sign_in()
            .expect("initialized");
        while let Some(pending) = self.orchestrator.state().pending_client() {
            self.succeed(pending);
        }
        assert!(self.orchestrator.state().is_signed_in());
    }
}
