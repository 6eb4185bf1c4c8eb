use crate::helpers::{HeadlessWindowFactory, SETTLE_TIMEOUT, settings, unique_key};

use launch_core::application::{Application, ExitStatus};
use launch_core::error::CoreError;
use launch_core::lifecycle::{LifecycleHandle, LifecycleSnapshot, LifecycleState, StubControllerFactory};

use common::{ApplicationKey, InstanceState, Message, RunLevel};

use std::path::Path;
use std::time::Duration;

use tempfile::TempDir;
use tokio::time::{sleep, timeout};

async fn start_primary(dir: &Path, key: &ApplicationKey, level: RunLevel) -> Application {
    let app = Application::start(
        settings(dir, key, level),
        HeadlessWindowFactory::unlimited(),
        Box::new(StubControllerFactory),
    )
    .await
    .expect("primary should start");
    assert_eq!(app.instance_state(), InstanceState::Primary);
    app
}

/// Launch a secondary with `message` and run it to completion.
async fn forward(dir: &Path, key: &ApplicationKey, message: Option<Message>) -> ExitStatus {
    let mut secondary_settings = settings(dir, key, RunLevel::Full);
    secondary_settings.message = message;

    let secondary = Application::start(
        secondary_settings,
        HeadlessWindowFactory::unlimited(),
        Box::new(StubControllerFactory),
    )
    .await
    .expect("secondary should start");
    assert_eq!(secondary.instance_state(), InstanceState::Secondary);
    assert!(secondary.lifecycle().is_none());

    secondary.run_until(std::future::pending()).await
}

/// Poll the snapshot until `condition` holds.
async fn wait_for_snapshot(
    lifecycle: &LifecycleHandle,
    condition: impl Fn(&LifecycleSnapshot) -> bool,
) -> LifecycleSnapshot {
    timeout(SETTLE_TIMEOUT, async {
        loop {
            let snapshot = lifecycle.snapshot().await;
            if condition(&snapshot) {
                return snapshot;
            }
            sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("lifecycle never reached the expected state")
}

/// **VALUE**: The everyday path: a second launch surfaces the running client.
///
/// **WHY THIS MATTERS**: This is what users do when they click the launcher
/// icon while the client sits in the tray.
///
/// **BUG THIS CATCHES**: The secondary starting its own client, or the primary
/// receiving the message without acting on it.
#[tokio::test]
async fn given_hidden_primary_when_second_launch_without_message_then_window_shown_and_exit_code_one() {
    // GIVEN: A daemon primary for "testApp" with a hidden window
    let dir = TempDir::new().expect("temp dir");
    let key = unique_key("testApp");
    let primary = start_primary(dir.path(), &key, RunLevel::Daemon).await;
    let lifecycle = primary.lifecycle().expect("primary lifecycle").clone();
    let before = lifecycle.snapshot().await;
    assert!(!before.window.expect("window").visible);

    // WHEN: A second launch with the same key and no message
    let status = forward(dir.path(), &key, None).await;

    // THEN: Secondary exits with code 1 and the primary's window is shown
    assert_eq!(status, ExitStatus::Forwarded);
    assert_eq!(status.code(), 1);
    let after = wait_for_snapshot(&lifecycle, |s| s.window.is_some_and(|w| w.visible)).await;
    assert_eq!(after.window.map(|w| w.id), before.window.map(|w| w.id));
    assert_eq!(after.state, LifecycleState::Running(RunLevel::Daemon));

    assert_eq!(primary.run_until(async {}).await, ExitStatus::Normal);
}

/// **VALUE**: A forwarded restart recreates the window at the same run level.
#[tokio::test]
async fn given_daemon_primary_when_restart_forwarded_then_fresh_window_still_daemon() {
    // GIVEN: A daemon primary
    let dir = TempDir::new().expect("temp dir");
    let key = unique_key("restart");
    let primary = start_primary(dir.path(), &key, RunLevel::Daemon).await;
    let lifecycle = primary.lifecycle().expect("primary lifecycle").clone();
    let before = lifecycle.snapshot().await.window.expect("window").id;

    // WHEN: A second launch forwards "restart"
    let status = forward(dir.path(), &key, Some(Message::restart())).await;

    // THEN: Running(Daemon) with a new, hidden window
    assert_eq!(status, ExitStatus::Forwarded);
    let after = wait_for_snapshot(&lifecycle, |s| s.window.is_some_and(|w| w.id != before)).await;
    assert_eq!(after.state, LifecycleState::Running(RunLevel::Daemon));
    assert!(!after.window.expect("window").visible);

    assert_eq!(primary.run_until(async {}).await, ExitStatus::Normal);
}

#[tokio::test]
async fn given_running_primary_when_unknown_message_forwarded_then_nothing_changes() {
    let dir = TempDir::new().expect("temp dir");
    let key = unique_key("unknown");
    let primary = start_primary(dir.path(), &key, RunLevel::Full).await;
    let lifecycle = primary.lifecycle().expect("primary lifecycle").clone();
    let before = lifecycle.snapshot().await;

    let status = forward(dir.path(), &key, Some(Message::new("reboot").expect("valid"))).await;
    // Give the server time to read and route before comparing.
    sleep(Duration::from_millis(200)).await;

    assert_eq!(status, ExitStatus::Forwarded);
    assert_eq!(lifecycle.snapshot().await, before);
    assert_eq!(primary.run_until(async {}).await, ExitStatus::Normal);
}

/// **VALUE**: After a normal shutdown the key is free again.
///
/// **BUG THIS CATCHES**: A primary that exits but keeps the lock or the
/// channel, turning every later launch into a secondary talking to nobody.
#[tokio::test]
async fn given_primary_shut_down_when_next_launch_then_primary_again() {
    // GIVEN: A primary that shuts down normally
    let dir = TempDir::new().expect("temp dir");
    let key = unique_key("handover");
    let primary = start_primary(dir.path(), &key, RunLevel::Full).await;
    let lifecycle = primary.lifecycle().expect("primary lifecycle").clone();
    assert_eq!(primary.run_until(async {}).await, ExitStatus::Normal);
    assert_eq!(lifecycle.snapshot().await.state, LifecycleState::Stopped);

    // WHEN/THEN: The next launch is primary
    let next = start_primary(dir.path(), &key, RunLevel::Full).await;
    assert_eq!(next.run_until(async {}).await, ExitStatus::Normal);
}

/// **VALUE**: A failed first init aborts startup and frees the key.
#[tokio::test]
async fn given_window_factory_fails_when_start_then_lifecycle_error_and_key_released() {
    // GIVEN: A factory that cannot create any window
    let dir = TempDir::new().expect("temp dir");
    let key = unique_key("broken");

    // WHEN: Starting
    let result = Application::start(
        settings(dir.path(), &key, RunLevel::Full),
        HeadlessWindowFactory::limited(0),
        Box::new(StubControllerFactory),
    )
    .await;

    // THEN: Fatal lifecycle error, and a later launch can still be primary
    match result {
        Err(CoreError::Lifecycle(e)) => assert!(e.is_fatal()),
        Err(other) => panic!("expected a lifecycle error, got {other}"),
        Ok(_) => panic!("start should fail"),
    }
    let next = start_primary(dir.path(), &key, RunLevel::Daemon).await;
    assert_eq!(next.run_until(async {}).await, ExitStatus::Normal);
}

/// **VALUE**: A fatal error while running ends the primary with a failure code.
///
/// **WHY THIS MATTERS**: Without this the primary would keep the lock with no
/// usable window, and every later launch would forward into the void.
#[tokio::test]
async fn given_restart_cannot_recreate_window_when_forwarded_then_primary_exits_fatal() {
    // GIVEN: A primary whose factory has exactly one window to give
    let dir = TempDir::new().expect("temp dir");
    let key = unique_key("halt");
    let primary = Application::start(
        settings(dir.path(), &key, RunLevel::Full),
        HeadlessWindowFactory::limited(1),
        Box::new(StubControllerFactory),
    )
    .await
    .expect("primary should start");
    let run = tokio::spawn(primary.run_until(std::future::pending()));

    // WHEN: A restart is forwarded
    assert_eq!(
        forward(dir.path(), &key, Some(Message::restart())).await,
        ExitStatus::Forwarded
    );

    // THEN: The primary halts on its own with a failure code
    let status = timeout(SETTLE_TIMEOUT, run)
        .await
        .expect("primary should halt")
        .expect("run task panicked");
    assert_eq!(status, ExitStatus::Fatal);
    assert_eq!(status.code(), 1);
}
