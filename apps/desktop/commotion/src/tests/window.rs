use crate::window::{HeadlessWindow, HeadlessWindowFactory};

use launch_core::lifecycle::{MainWindow, WindowFactory};

#[test]
fn given_new_window_when_created_then_hidden() {
    let window = HeadlessWindowFactory.create_window().expect("window");

    assert!(!window.is_visible());
}

#[test]
fn given_window_when_show_then_hide_then_visibility_follows() {
    let mut window = HeadlessWindow::new();

    window.show().expect("show");
    assert!(window.is_visible());

    window.hide().expect("hide");
    assert!(!window.is_visible());
}

#[test]
fn given_factory_when_creating_twice_then_ids_differ() {
    let mut factory = HeadlessWindowFactory;

    let first = factory.create_window().expect("first");
    let second = factory.create_window().expect("second");

    assert_ne!(first.id(), second.id());
}

/// **VALUE**: A closed window refuses a second graceful close but can still be
/// force closed, which is what the shutdown escalation relies on.
#[test]
fn given_closed_window_when_close_again_then_error_but_force_close_succeeds() {
    // GIVEN: A window that was closed
    let mut window = HeadlessWindow::new();
    window.show().expect("show");
    window.close().expect("first close");

    // WHEN/THEN: Graceful close fails, forced close succeeds
    assert!(window.close().is_err());
    assert!(window.force_close().is_ok());
    assert!(!window.is_visible());
}
