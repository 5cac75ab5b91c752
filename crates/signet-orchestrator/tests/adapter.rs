//! Host lifecycle adapter tests

mod support;

use tokio_util::sync::CancellationToken;

use signet_core::{ClientId, ClientSet, CorrelationCode, OrchestratorError};
use signet_orchestrator::{HostLifecycleAdapter, LifecycleEvent, Phase};

use support::{factory, resolvable, uninitialized, Call, SharedWorld};

fn build_adapter(requested: ClientSet, auto_sign_in: bool) -> (HostLifecycleAdapter, SharedWorld) {
    let (orchestrator, world) = uninitialized(auto_sign_in);
    let mut adapter = HostLifecycleAdapter::new(orchestrator);
    adapter
        .on_create(requested, &mut factory(&world))
        .expect("fresh orchestrator");
    (adapter, world)
}

fn calls(world: &SharedWorld) -> Vec<Call> {
    world.lock().unwrap().calls.clone()
}

#[test]
fn test_drain_applies_queued_events_in_order() {
    let requested: ClientSet = [ClientId::Games, ClientId::AppState].into_iter().collect();
    let (mut adapter, world) = build_adapter(requested, false);
    let sender = adapter.sender();

    sender.send(LifecycleEvent::SignInRequested);
    sender.connected(ClientId::Games, None);
    sender.connected(ClientId::AppState, None);

    assert_eq!(adapter.drain().unwrap(), 3);
    assert!(adapter.orchestrator().state().is_signed_in());
    assert_eq!(
        calls(&world),
        vec![
            Call::Connect(ClientId::Games),
            Call::Connect(ClientId::AppState),
            Call::SignInSuccess,
        ]
    );
    assert_eq!(adapter.drain().unwrap(), 0);
}

#[test]
fn test_drain_stops_at_rejected_event() {
    let (mut adapter, _world) = build_adapter(ClientSet::from(ClientId::Games), false);
    let sender = adapter.sender();

    let stray = CorrelationCode::new();
    sender.resolution_result(stray, true);
    sender.send(LifecycleEvent::SignInRequested);

    assert_eq!(
        adapter.drain(),
        Err(OrchestratorError::UnexpectedResolutionResult { code: stray })
    );
    // The event behind the rejected one is still queued
    assert_eq!(adapter.drain().unwrap(), 1);
    assert_eq!(
        adapter.orchestrator().state().pending_client(),
        Some(ClientId::Games)
    );
}

#[test]
fn test_resolution_round_trip_through_activity_result() {
    let (mut adapter, world) = build_adapter(ClientSet::from(ClientId::Games), false);
    let sender = adapter.sender();

    sender.send(LifecycleEvent::SignInRequested);
    sender.connection_failed(ClientId::Games, resolvable());
    adapter.drain().unwrap();

    let request = world.lock().unwrap().resolutions[0].clone();
    adapter.on_stop();
    adapter.on_start().unwrap();
    adapter.on_activity_result(request.code, true).unwrap();
    sender.connected(ClientId::Games, None);
    adapter.drain().unwrap();

    assert!(adapter.orchestrator().state().is_signed_in());
}

#[test]
fn test_client_disconnect_is_forced_disconnection() {
    let (mut adapter, world) = build_adapter(ClientSet::ALL, true);
    let sender = adapter.sender();

    adapter.on_start().unwrap();
    for id in ClientId::ALL {
        sender.connected(id, None);
    }
    adapter.drain().unwrap();
    assert!(adapter.orchestrator().state().is_signed_in());

    sender.disconnected(ClientId::Social);
    adapter.drain().unwrap();

    let state = adapter.orchestrator().state();
    assert_eq!(state.phase(), Phase::Idle);
    assert!(!state.auto_sign_in_enabled());
    assert_eq!(calls(&world).last(), Some(&Call::Disconnection));
}

#[test]
fn test_second_create_is_rejected() {
    let (mut adapter, world) = build_adapter(ClientSet::from(ClientId::Games), false);
    assert_eq!(
        adapter.on_create(ClientSet::ALL, &mut factory(&world)),
        Err(OrchestratorError::AlreadyInitialized)
    );
}

#[tokio::test]
async fn test_run_applies_events_until_cancelled() {
    let (mut adapter, world) = build_adapter(ClientSet::from(ClientId::Games), true);
    let sender = adapter.sender();
    let cancel = CancellationToken::new();

    sender.send(LifecycleEvent::Start);
    sender.connected(ClientId::Games, None);

    let token = cancel.clone();
    let task = tokio::spawn(async move {
        adapter.run(token).await;
        adapter
    });

    for _ in 0..100 {
        if calls(&world).contains(&Call::SignInSuccess) {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert!(calls(&world).contains(&Call::SignInSuccess));

    cancel.cancel();
    let adapter = task.await.unwrap();

    // Shutdown treats the host as stopped
    let state = adapter.orchestrator().state();
    assert_eq!(state.phase(), Phase::Idle);
    assert!(state.connected().is_empty());
}

#[tokio::test]
async fn test_run_returns_when_already_cancelled() {
    let (mut adapter, _world) = build_adapter(ClientSet::from(ClientId::Games), false);
    let cancel = CancellationToken::new();
    cancel.cancel();

    adapter.run(cancel).await;
    assert_eq!(adapter.orchestrator().state().phase(), Phase::Idle);
}
