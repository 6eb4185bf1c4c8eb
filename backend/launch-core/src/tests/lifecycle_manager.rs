// Unit tests for the run-level state machine and its shutdown escalation.
// The actor wrapper is covered in lifecycle_handle.rs.

use crate::error::lifecycle::LifecycleError;
use crate::lifecycle::{LifecycleManager, LifecycleState};
use crate::tests::fakes::Recorder;

use common::RunLevel;

fn manager(recorder: &Recorder) -> LifecycleManager {
    LifecycleManager::new(recorder.window_factory(), recorder.controller_factory())
}

fn running_manager(recorder: &Recorder, level: RunLevel) -> LifecycleManager {
    let mut manager = manager(recorder);
    manager.init(level).expect("init should succeed");
    manager
}

/// **VALUE**: Full run level brings up a visible window and a controller.
///
/// **BUG THIS CATCHES**: A launch that leaves the main window hidden, which is
/// exactly what the user did not ask for when starting the client normally.
#[test]
fn given_uninitialized_manager_when_init_full_then_window_visible_and_running() {
    // GIVEN: A fresh manager
    let recorder = Recorder::default();
    let mut manager = manager(&recorder);
    assert_eq!(manager.state(), LifecycleState::Uninitialized);

    // WHEN: Initializing at Full
    manager.init(RunLevel::Full).expect("init should succeed");

    // THEN: Running(Full) with a visible window and a controller
    assert_eq!(manager.state(), LifecycleState::Running(RunLevel::Full));
    let window = manager.window().expect("window should exist");
    assert!(window.is_visible());
    assert!(manager.has_controller());
}

/// **VALUE**: Daemon run level creates the window but keeps it hidden.
///
/// **BUG THIS CATCHES**: A daemon launch popping a window onto the desktop.
#[test]
fn given_uninitialized_manager_when_init_daemon_then_window_hidden() {
    // GIVEN: A fresh manager
    let recorder = Recorder::default();
    let mut manager = manager(&recorder);

    // WHEN: Initializing at Daemon
    manager.init(RunLevel::Daemon).expect("init should succeed");

    // THEN: Running(Daemon), window exists but is hidden
    assert_eq!(manager.state(), LifecycleState::Running(RunLevel::Daemon));
    assert!(!manager.window().expect("window should exist").is_visible());
    assert_eq!(recorder.lock().windows_created, 1);
}

/// **VALUE**: Initializing twice is rejected instead of stacking a second window.
#[test]
fn given_running_manager_when_init_again_then_invalid_transition_and_state_kept() {
    // GIVEN: A running manager
    let recorder = Recorder::default();
    let mut manager = running_manager(&recorder, RunLevel::Full);

    // WHEN: Initializing again
    let result = manager.init(RunLevel::Daemon);

    // THEN: InvalidTransition, still Running(Full), no extra window
    assert!(matches!(result, Err(LifecycleError::InvalidTransition { .. })));
    assert_eq!(manager.state(), LifecycleState::Running(RunLevel::Full));
    assert_eq!(recorder.lock().windows_created, 1);
}

/// **VALUE**: Window creation failure during init is fatal.
///
/// **WHY THIS MATTERS**: A primary without a window holds the lock while
/// serving nobody; it has to halt so the next launch can take over.
///
/// **BUG THIS CATCHES**: Swallowing the failure and reporting Running.
#[test]
fn given_window_creation_fails_when_init_then_fatal_initialization_error() {
    // GIVEN: A window factory that refuses
    let recorder = Recorder::default();
    recorder.lock().faults.create_window = true;
    let mut manager = manager(&recorder);

    // WHEN: Initializing
    let err = manager.init(RunLevel::Full).expect_err("init must fail");

    // THEN: Fatal Initialization error at the requested level, state Failed
    assert!(err.is_fatal());
    assert!(matches!(
        err,
        LifecycleError::Initialization {
            level: RunLevel::Full,
            ..
        }
    ));
    assert_eq!(manager.state(), LifecycleState::Failed);
}

#[test]
fn given_controller_creation_fails_when_init_then_state_failed() {
    // GIVEN: A controller factory that refuses
    let recorder = Recorder::default();
    recorder.lock().faults.create_controller = true;
    let mut manager = manager(&recorder);

    // WHEN: Initializing
    let err = manager.init(RunLevel::Daemon).expect_err("init must fail");

    // THEN: Fatal and Failed
    assert!(err.is_fatal());
    assert_eq!(manager.state(), LifecycleState::Failed);
}

/// **VALUE**: Requesting the main window while one exists returns the same window.
///
/// **BUG THIS CATCHES**: Leaking a second top-level window per request.
#[test]
fn given_existing_window_when_create_main_window_then_same_id_returned() {
    // GIVEN: A manager with a window
    let recorder = Recorder::default();
    let mut manager = manager(&recorder);
    let first = manager.create_main_window().expect("first window");

    // WHEN: Asking for the window again
    let second = manager.create_main_window().expect("second request");

    // THEN: Same window, factory only called once
    assert_eq!(first, second);
    assert_eq!(recorder.lock().windows_created, 1);
}

#[test]
fn given_no_window_when_show_main_then_noop() {
    // GIVEN: An uninitialized manager
    let recorder = Recorder::default();
    let mut manager = manager(&recorder);

    // WHEN: Showing the main window
    let result = manager.show_main();

    // THEN: Nothing to show, nothing fails
    assert!(result.is_ok());
    assert!(manager.window().is_none());
}

#[test]
fn given_hidden_daemon_window_when_show_main_then_visible() {
    // GIVEN: A daemon with a hidden window
    let recorder = Recorder::default();
    let mut manager = running_manager(&recorder, RunLevel::Daemon);

    // WHEN: Showing the main window
    manager.show_main().expect("show should succeed");

    // THEN: Visible, run level unchanged
    assert!(manager.window().expect("window").is_visible());
    assert_eq!(manager.state(), LifecycleState::Running(RunLevel::Daemon));
}

/// **VALUE**: A clean stop releases window and controller through their graceful path.
#[test]
fn given_running_manager_when_stop_then_stopped_and_resources_released() {
    // GIVEN: A running manager
    let recorder = Recorder::default();
    let mut manager = running_manager(&recorder, RunLevel::Full);

    // WHEN: Stopping without force
    manager.stop(false).expect("stop should succeed");

    // THEN: Stopped, both closed gracefully, nothing forced
    assert_eq!(manager.state(), LifecycleState::Stopped);
    assert!(manager.window().is_none());
    assert!(!manager.has_controller());
    let record = recorder.lock();
    assert_eq!(record.windows_closed, 1);
    assert_eq!(record.controllers_closed, 1);
    assert_eq!(record.windows_force_closed, 0);
}

#[test]
fn given_uninitialized_manager_when_stop_then_noop() {
    let recorder = Recorder::default();
    let mut manager = manager(&recorder);

    assert!(manager.stop(true).is_ok());
    assert_eq!(manager.state(), LifecycleState::Uninitialized);
}

/// **VALUE**: Without force, a refused close is recoverable and nothing is torn down.
///
/// **BUG THIS CATCHES**: Dropping the window handle after a failed close, which
/// would leave a live window the manager can no longer reach.
#[test]
fn given_close_refused_when_stop_without_force_then_window_teardown_and_still_running() {
    // GIVEN: A running manager whose window refuses to close
    let recorder = Recorder::default();
    let mut manager = running_manager(&recorder, RunLevel::Full);
    recorder.lock().faults.close_window = true;

    // WHEN: Stopping without force
    let err = manager.stop(false).expect_err("stop must fail");

    // THEN: Recoverable WindowTeardown, still Running, window still owned
    assert!(matches!(err, LifecycleError::WindowTeardown { .. }));
    assert!(!err.is_fatal());
    assert_eq!(manager.state(), LifecycleState::Running(RunLevel::Full));
    assert!(manager.window().is_some());
    assert_eq!(recorder.lock().windows_force_closed, 0);
}

/// **VALUE**: With force, a refused graceful close escalates to a forced close.
#[test]
fn given_close_refused_when_stop_with_force_then_forced_close_and_stopped() {
    // GIVEN: A running manager whose window refuses a graceful close
    let recorder = Recorder::default();
    let mut manager = running_manager(&recorder, RunLevel::Full);
    recorder.lock().faults.close_window = true;

    // WHEN: Stopping with force
    manager.stop(true).expect("forced stop should succeed");

    // THEN: Forced close used, state Stopped
    assert_eq!(manager.state(), LifecycleState::Stopped);
    assert_eq!(recorder.lock().windows_force_closed, 1);
}

/// **VALUE**: The last rung of the ladder: forced close failing is fatal.
///
/// **BUG THIS CATCHES**: Reporting Stopped while a window we could not destroy
/// is still alive.
#[test]
fn given_close_and_force_close_refused_when_stop_with_force_then_forced_teardown_and_failed() {
    // GIVEN: A window that refuses both close paths
    let recorder = Recorder::default();
    let mut manager = running_manager(&recorder, RunLevel::Full);
    {
        let mut record = recorder.lock();
        record.faults.close_window = true;
        record.faults.force_close_window = true;
    }

    // WHEN: Stopping with force
    let err = manager.stop(true).expect_err("stop must fail");

    // THEN: Fatal ForcedTeardown, state Failed
    assert!(matches!(err, LifecycleError::ForcedTeardown { .. }));
    assert!(err.is_fatal());
    assert_eq!(manager.state(), LifecycleState::Failed);
}

#[test]
fn given_controller_close_refused_when_stop_without_force_then_controller_teardown() {
    // GIVEN: A controller that refuses a graceful close
    let recorder = Recorder::default();
    let mut manager = running_manager(&recorder, RunLevel::Daemon);
    recorder.lock().faults.close_controller = true;

    // WHEN: Stopping without force
    let err = manager.stop(false).expect_err("stop must fail");

    // THEN: Recoverable, controller kept, still running
    assert!(matches!(err, LifecycleError::ControllerTeardown { .. }));
    assert!(manager.has_controller());
    assert!(manager.state().is_running());
}

/// **VALUE**: With force, a controller that refuses both close paths halts the client.
///
/// **BUG THIS CATCHES**: Only escalating window failures, so a stuck controller
/// is reported as a clean stop.
#[test]
fn given_controller_close_and_force_close_refused_when_stop_with_force_then_failed() {
    // GIVEN: A controller that refuses both close paths
    let recorder = Recorder::default();
    let mut manager = running_manager(&recorder, RunLevel::Full);
    {
        let mut record = recorder.lock();
        record.faults.close_controller = true;
        record.faults.force_close_controller = true;
    }

    // WHEN: Stopping with force
    let err = manager.stop(true).expect_err("stop must fail");

    // THEN: Fatal ForcedTeardown, window already gone, state Failed
    assert!(matches!(err, LifecycleError::ForcedTeardown { .. }));
    assert!(err.is_fatal());
    assert_eq!(manager.state(), LifecycleState::Failed);
    assert!(manager.window().is_none());
    assert_eq!(recorder.lock().controllers_force_closed, 0);
}

/// **VALUE**: A refused controller close after the window is gone leaves a
/// running client without a window, and a later stop can still finish.
///
/// **WHY THIS MATTERS**: The window is not recreated behind the user's back;
/// show requests become no-ops until the client is restarted.
#[test]
fn given_controller_close_refused_after_window_closed_when_stop_then_running_without_window() {
    // GIVEN: A full client whose controller refuses a graceful close
    let recorder = Recorder::default();
    let mut manager = running_manager(&recorder, RunLevel::Full);
    recorder.lock().faults.close_controller = true;

    // WHEN: Stopping without force
    let err = manager.stop(false).expect_err("stop must fail");

    // THEN: Still Running(Full), window closed, controller kept
    assert!(matches!(err, LifecycleError::ControllerTeardown { .. }));
    assert_eq!(manager.state(), LifecycleState::Running(RunLevel::Full));
    assert!(manager.window().is_none());
    assert!(manager.has_controller());
    assert_eq!(recorder.lock().windows_closed, 1);

    // AND: Showing the main window is a harmless no-op
    assert!(manager.show_main().is_ok());
    assert!(manager.window().is_none());

    // AND: Once the controller cooperates, the stop completes
    recorder.lock().faults.close_controller = false;
    manager.stop(false).expect("second stop should succeed");
    assert_eq!(manager.state(), LifecycleState::Stopped);
    assert_eq!(recorder.lock().windows_closed, 1);
}

#[test]
fn given_failed_manager_when_stop_then_invalid_transition() {
    // GIVEN: A manager that failed to initialize
    let recorder = Recorder::default();
    recorder.lock().faults.create_window = true;
    let mut manager = manager(&recorder);
    let _ = manager.init(RunLevel::Full);

    // WHEN/THEN: Stop is rejected
    assert!(matches!(
        manager.stop(true),
        Err(LifecycleError::InvalidTransition { .. })
    ));
}

/// **VALUE**: Restart keeps the run level and produces a brand new window.
///
/// **WHY THIS MATTERS**: A restart that reuses the old window object would keep
/// whatever broken state prompted the restart.
#[test]
fn given_running_daemon_when_restart_then_new_hidden_window_at_same_level() {
    // GIVEN: A running daemon
    let recorder = Recorder::default();
    let mut manager = running_manager(&recorder, RunLevel::Daemon);
    let before = manager.window().expect("window").id();

    // WHEN: Restarting with force
    manager.restart(true).expect("restart should succeed");

    // THEN: Running(Daemon) with a different, hidden window
    assert_eq!(manager.state(), LifecycleState::Running(RunLevel::Daemon));
    let window = manager.window().expect("window");
    assert_ne!(window.id(), before);
    assert!(!window.is_visible());
    assert_eq!(recorder.lock().windows_created, 2);
}

#[test]
fn given_running_full_when_restart_without_force_then_level_kept() {
    let recorder = Recorder::default();
    let mut manager = running_manager(&recorder, RunLevel::Full);

    manager.restart(false).expect("restart should succeed");

    assert_eq!(manager.state(), LifecycleState::Running(RunLevel::Full));
    assert!(manager.window().expect("window").is_visible());
}

/// **VALUE**: A restart whose graceful stop fails does not start a second client.
///
/// **BUG THIS CATCHES**: Calling init after a failed stop, which would create a
/// new window next to the one that refused to close.
#[test]
fn given_close_refused_when_restart_without_force_then_error_and_no_reinit() {
    // GIVEN: A running client whose window refuses to close
    let recorder = Recorder::default();
    let mut manager = running_manager(&recorder, RunLevel::Full);
    recorder.lock().faults.close_window = true;

    // WHEN: Restarting without force
    let err = manager.restart(false).expect_err("restart must fail");

    // THEN: The stop error, still Running(Full) on the original window
    assert!(matches!(err, LifecycleError::WindowTeardown { .. }));
    assert_eq!(manager.state(), LifecycleState::Running(RunLevel::Full));
    assert_eq!(recorder.lock().windows_created, 1);
    assert_eq!(recorder.lock().controllers_created, 1);
}

/// **VALUE**: A forced restart whose forced close fails ends in Failed.
///
/// **BUG THIS CATCHES**: Re-initializing on top of a window that could not be
/// destroyed instead of halting.
#[test]
fn given_close_and_force_close_refused_when_restart_with_force_then_failed_and_no_reinit() {
    // GIVEN: A window that refuses both close paths
    let recorder = Recorder::default();
    let mut manager = running_manager(&recorder, RunLevel::Daemon);
    {
        let mut record = recorder.lock();
        record.faults.close_window = true;
        record.faults.force_close_window = true;
    }

    // WHEN: Restarting with force
    let err = manager.restart(true).expect_err("restart must fail");

    // THEN: Fatal, Failed, no second window
    assert!(matches!(err, LifecycleError::ForcedTeardown { .. }));
    assert!(err.is_fatal());
    assert_eq!(manager.state(), LifecycleState::Failed);
    assert_eq!(recorder.lock().windows_created, 1);
}

#[test]
fn given_stopped_manager_when_restart_then_invalid_transition() {
    let recorder = Recorder::default();
    let mut manager = running_manager(&recorder, RunLevel::Full);
    manager.stop(false).expect("stop should succeed");

    assert!(matches!(
        manager.restart(true),
        Err(LifecycleError::InvalidTransition { .. })
    ));
    assert_eq!(manager.state(), LifecycleState::Stopped);
}

/// **VALUE**: A stopped manager can be brought back up.
#[test]
fn given_stopped_manager_when_init_then_running_again() {
    let recorder = Recorder::default();
    let mut manager = running_manager(&recorder, RunLevel::Full);
    manager.stop(false).expect("stop should succeed");

    manager.init(RunLevel::Daemon).expect("re-init should succeed");

    assert_eq!(manager.state(), LifecycleState::Running(RunLevel::Daemon));
    assert_eq!(recorder.lock().controllers_created, 2);
}
