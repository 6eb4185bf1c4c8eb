//! Headless main window.
//!
//! Rendering is outside this launcher; the window only tracks its visibility
//! and logs what a real window would do.

use launch_core::error::lifecycle::WindowError;
use launch_core::lifecycle::{MainWindow, WindowFactory, WindowId};

use log::{debug, info};

#[derive(Debug)]
pub struct HeadlessWindow {
    id: WindowId,
    visible: bool,
    closed: bool,
}

impl HeadlessWindow {
    pub fn new() -> Self {
        Self {
            id: WindowId::new(),
            visible: false,
            closed: false,
        }
    }

    fn ensure_open(&self, operation: &str) -> Result<(), WindowError> {
        if self.closed {
            return Err(WindowError::new(format!(
                "cannot {operation} window {}: already closed",
                self.id
            )));
        }
        Ok(())
    }
}

impl Default for HeadlessWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl MainWindow for HeadlessWindow {
    fn id(&self) -> WindowId {
        self.id
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn show(&mut self) -> Result<(), WindowError> {
        self.ensure_open("show")?;
        self.visible = true;
        info!("Main window {} shown", self.id);
        Ok(())
    }

    fn hide(&mut self) -> Result<(), WindowError> {
        self.ensure_open("hide")?;
        self.visible = false;
        debug!("Main window {} hidden", self.id);
        Ok(())
    }

    fn raise(&mut self) -> Result<(), WindowError> {
        self.ensure_open("raise")?;
        debug!("Main window {} raised", self.id);
        Ok(())
    }

    fn close(&mut self) -> Result<(), WindowError> {
        self.ensure_open("close")?;
        self.visible = false;
        self.closed = true;
        info!("Main window {} closed", self.id);
        Ok(())
    }

    // Always succeeds, even on a window that is already closed.
    fn force_close(&mut self) -> Result<(), WindowError> {
        self.visible = false;
        self.closed = true;
        info!("Main window {} destroyed", self.id);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct HeadlessWindowFactory;

impl HeadlessWindowFactory {
    pub fn boxed() -> Box<dyn WindowFactory> {
        Box::new(Self)
    }
}

impl WindowFactory for HeadlessWindowFactory {
    fn create_window(&mut self) -> Result<Box<dyn MainWindow>, WindowError> {
        Ok(Box::new(HeadlessWindow::new()))
    }
}
