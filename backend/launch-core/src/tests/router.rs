use crate::lifecycle::{LifecycleHandle, LifecycleManager, LifecycleState};
use crate::router::{MessageRouter, RouteAction};
use crate::tests::fakes::Recorder;

use common::{Message, RunLevel};

async fn running_router(recorder: &Recorder, level: RunLevel) -> (MessageRouter, LifecycleHandle) {
    let handle = LifecycleHandle::spawn(LifecycleManager::new(
        recorder.window_factory(),
        recorder.controller_factory(),
    ));
    handle.init(level).await.expect("init should succeed");
    (MessageRouter::new(handle.clone()), handle)
}

/// **VALUE**: `showMain` surfaces a hidden daemon window.
#[tokio::test]
async fn given_hidden_window_when_show_main_routed_then_window_visible() {
    // GIVEN: A daemon with a hidden window
    let recorder = Recorder::default();
    let (router, handle) = running_router(&recorder, RunLevel::Daemon).await;

    // WHEN: Routing showMain
    let action = router.route(Message::show_main()).await;

    // THEN: The window is visible
    assert_eq!(action, RouteAction::ShowMain);
    assert!(handle.snapshot().await.window.expect("window").visible);
}

/// **VALUE**: `restart` goes through the forced restart path.
#[tokio::test]
async fn given_running_client_when_restart_routed_then_window_recreated() {
    // GIVEN: A running client
    let recorder = Recorder::default();
    let (router, handle) = running_router(&recorder, RunLevel::Full).await;

    // WHEN: Routing restart
    let action = router.route(Message::restart()).await;

    // THEN: A second window was created at the same level
    assert_eq!(action, RouteAction::Restart);
    assert_eq!(recorder.lock().windows_created, 2);
    assert_eq!(
        handle.snapshot().await.state,
        LifecycleState::Running(RunLevel::Full)
    );
}

/// **VALUE**: Unknown messages have no side effects.
///
/// **BUG THIS CATCHES**: Case-insensitive or prefix matching turning
/// `ShowMain` or `restart now` into real actions.
#[tokio::test]
async fn given_unknown_messages_when_routed_then_ignored_without_side_effects() {
    // GIVEN: A daemon with a hidden window
    let recorder = Recorder::default();
    let (router, handle) = running_router(&recorder, RunLevel::Daemon).await;
    let before = handle.snapshot().await;

    // WHEN: Routing near-miss messages
    for text in ["ShowMain", "restart now", "hello", " showMain"] {
        let message = Message::new(text).expect("valid message");
        assert_eq!(router.route(message).await, RouteAction::Ignored, "{text:?}");
    }

    // THEN: Nothing changed
    assert_eq!(handle.snapshot().await, before);
    assert_eq!(recorder.lock().windows_created, 1);
}
