use crate::error::lifecycle::WindowError;

use std::fmt;

use uuid::Uuid;

/// Identity of one created window. A recreated window gets a new id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(Uuid);

impl WindowId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WindowId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The main window as seen by the lifecycle manager.
///
/// A freshly created window is hidden. `close` asks the window to release
/// itself cleanly; `force_close` destroys it and signals its internal exit.
pub trait MainWindow: Send {
    fn id(&self) -> WindowId;

    fn is_visible(&self) -> bool;

    fn show(&mut self) -> Result<(), WindowError>;

    /// Hide the window while keeping its background presence.
    fn hide(&mut self) -> Result<(), WindowError>;

    /// Bring the window to the foreground.
    fn raise(&mut self) -> Result<(), WindowError>;

    fn close(&mut self) -> Result<(), WindowError>;

    fn force_close(&mut self) -> Result<(), WindowError>;
}

/// Creates main windows.
pub trait WindowFactory: Send {
    fn create_window(&mut self) -> Result<Box<dyn MainWindow>, WindowError>;
}
