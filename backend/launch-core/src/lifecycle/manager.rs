use crate::error::lifecycle::{LifecycleError, WindowError};
use crate::lifecycle::{
    Controller, ControllerFactory, LifecycleSnapshot, LifecycleState, MainWindow, WindowFactory,
    WindowId, WindowSnapshot,
};

use common::{ErrorLocation, RunLevel};

use std::panic::Location;

use log::{debug, error, info};

/// Owns the main window and controller of the primary instance.
///
/// Not thread-safe by itself; [`LifecycleHandle`](crate::lifecycle::LifecycleHandle)
/// gives it a single owner so transitions never overlap.
///
/// # Shutdown escalation
///
/// `stop(force_close)` closes the window and then the controller:
///
/// 1. graceful close of each resource
/// 2. if that fails and `force_close` is set, forced close
/// 3. if forced close also fails, [`LifecycleError::ForcedTeardown`], which is fatal
///
/// Without `force_close`, a failed graceful close is returned as a
/// recoverable error and the manager stays `Running`.
pub struct LifecycleManager {
    state: LifecycleState,
    window: Option<Box<dyn MainWindow>>,
    controller: Option<Box<dyn Controller>>,
    window_factory: Box<dyn WindowFactory>,
    controller_factory: Box<dyn ControllerFactory>,
}

impl LifecycleManager {
    pub fn new(
        window_factory: Box<dyn WindowFactory>,
        controller_factory: Box<dyn ControllerFactory>,
    ) -> Self {
        Self {
            state: LifecycleState::Uninitialized,
            window: None,
            controller: None,
            window_factory,
            controller_factory,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn window(&self) -> Option<&dyn MainWindow> {
        self.window.as_deref()
    }

    pub fn has_controller(&self) -> bool {
        self.controller.is_some()
    }

    pub fn snapshot(&self) -> LifecycleSnapshot {
        LifecycleSnapshot {
            state: self.state,
            window: self.window.as_ref().map(|window| WindowSnapshot {
                id: window.id(),
                visible: window.is_visible(),
            }),
        }
    }

    /// Bring the client up at `level`.
    ///
    /// `Full` creates and shows the window, `Daemon` creates it and keeps it
    /// hidden. Allowed from `Uninitialized` and `Stopped`.
    ///
    /// # Errors
    ///
    /// Any creation failure is [`LifecycleError::Initialization`] and moves the
    /// manager to `Failed`; the process must halt.
    pub fn init(&mut self, level: RunLevel) -> Result<(), LifecycleError> {
        match self.state {
            LifecycleState::Uninitialized | LifecycleState::Stopped => {}
            other => {
                return Err(LifecycleError::invalid_transition(format!(
                    "cannot initialize client while {other}"
                )));
            }
        }

        info!("Initializing client at run level {level}");

        if let Err(e) = self.start_level(level) {
            error!("CRITICAL: Could not fully initialize application. Application must be halted. {e}");
            self.state = LifecycleState::Failed;
            return Err(e);
        }

        self.state = LifecycleState::Running(level);
        Ok(())
    }

    fn start_level(&mut self, level: RunLevel) -> Result<(), LifecycleError> {
        self.create_main_window().map_err(|e| {
            LifecycleError::initialization(level, format!("could not create main window: {}", e.message))
        })?;

        if let Some(window) = self.window.as_mut() {
            let prepared = if level.shows_window() {
                window.show()
            } else {
                window.hide()
            };
            prepared.map_err(|e| {
                LifecycleError::initialization(level, format!("could not prepare main window: {}", e.message))
            })?;
        }

        if self.controller.is_none() {
            let controller = self.controller_factory.create_controller().map_err(|e| {
                LifecycleError::initialization(level, format!("could not create controller: {}", e.message))
            })?;
            self.controller = Some(controller);
        }

        Ok(())
    }

    /// Create the main window, or return the id of the one that already exists.
    ///
    /// Asking again while a window is live is not an error.
    pub fn create_main_window(&mut self) -> Result<WindowId, WindowError> {
        if let Some(window) = self.window.as_ref() {
            debug!("New window requested when one already exists. Returning existing main window.");
            info!("To re-open the main window, close it first.");
            return Ok(window.id());
        }

        let window = self.window_factory.create_window()?;
        let id = window.id();
        debug!("Created main window {id}");
        self.window = Some(window);
        Ok(id)
    }

    /// Show the main window and bring it to the front. No window is a no-op.
    pub fn show_main(&mut self) -> Result<(), LifecycleError> {
        let Some(window) = self.window.as_mut() else {
            debug!("Show requested but there is no main window");
            return Ok(());
        };

        window.show()?;
        window.raise()?;
        debug!("Main window {} shown", window.id());
        Ok(())
    }

    /// Close the window, then the controller.
    ///
    /// A stop while not running is a no-op.
    pub fn stop(&mut self, force_close: bool) -> Result<(), LifecycleError> {
        match self.state {
            LifecycleState::Running(_) => {}
            LifecycleState::Failed => {
                return Err(LifecycleError::invalid_transition("cannot stop a failed client"));
            }
            other => {
                debug!("Stop requested while {other}, nothing to close");
                return Ok(());
            }
        }

        let result = self
            .close_main_window(force_close)
            .and_then(|()| self.close_controller(force_close));

        match result {
            Ok(()) => {
                info!("Client stopped");
                self.state = LifecycleState::Stopped;
                Ok(())
            }
            Err(e) if e.is_fatal() => {
                error!("CRITICAL: Could not cleanly close client. Application must be halted. {e}");
                self.state = LifecycleState::Failed;
                Err(e)
            }
            Err(e) => {
                error!("Client could not be closed: {e}");
                info!("It is recommended that you restart the application.");
                Err(e)
            }
        }
    }

    /// Stop, then initialize again at the level that was running.
    ///
    /// A failed stop is returned as-is and nothing is re-initialized.
    pub fn restart(&mut self, force_close: bool) -> Result<(), LifecycleError> {
        let LifecycleState::Running(level) = self.state else {
            return Err(LifecycleError::invalid_transition(format!(
                "cannot restart client while {}",
                self.state
            )));
        };

        info!("Restarting client at run level {level}");
        self.stop(force_close)?;
        self.init(level)
    }

    fn close_main_window(&mut self, force_close: bool) -> Result<(), LifecycleError> {
        let Some(mut window) = self.window.take() else {
            return Ok(());
        };

        let Err(e) = window.close() else {
            debug!("Main window {} closed", window.id());
            return Ok(());
        };

        error!("Could not close main window: {e}");

        if !force_close {
            self.window = Some(window);
            return Err(LifecycleError::WindowTeardown {
                message: e.message,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        info!("force_close activated, destroying main window");
        window.force_close().map_err(|forced| LifecycleError::ForcedTeardown {
            message: format!(
                "could not close main window using its internal mechanisms: {}",
                forced.message
            ),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    fn close_controller(&mut self, force_close: bool) -> Result<(), LifecycleError> {
        let Some(mut controller) = self.controller.take() else {
            return Ok(());
        };

        let Err(e) = controller.close() else {
            debug!("Controller closed");
            return Ok(());
        };

        error!("Could not close controller: {e}");

        if !force_close {
            self.controller = Some(controller);
            return Err(LifecycleError::ControllerTeardown {
                message: e.message,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        info!("force_close activated, destroying controller");
        controller.force_close().map_err(|forced| LifecycleError::ForcedTeardown {
            message: format!("could not force controller closed: {}", forced.message),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}
