//! Run-level state machine for the primary instance.
//!
//! [`LifecycleManager`] owns the main window and the controller and moves
//! between `Uninitialized`, `Running(level)`, `Stopped` and `Failed`.
//! [`LifecycleHandle`] is the only way other components reach it: a single
//! task owns the manager and applies commands one after another.

mod controller;
mod handle;
mod manager;
mod state;
mod window;

pub use controller::{Controller, ControllerFactory, StubController, StubControllerFactory};
pub use handle::{LifecycleCommand, LifecycleHandle};
pub use manager::LifecycleManager;
pub use state::{LifecycleSnapshot, LifecycleState, WindowSnapshot};
pub use window::{MainWindow, WindowFactory, WindowId};
