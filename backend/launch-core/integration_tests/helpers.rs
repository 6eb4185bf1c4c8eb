//! Test helpers for launch integration tests.
//!
//! - Unique keys so parallel tests never share a lock or channel
//! - A message handler that records what the server delivered
//! - A headless window factory that can be told to stop producing windows

use launch_core::config::LaunchSettings;
use launch_core::error::lifecycle::WindowError;
use launch_core::instance::Endpoint;
use launch_core::ipc::MessageHandler;
use launch_core::lifecycle::{MainWindow, WindowFactory, WindowId};

use common::{ApplicationKey, Message, RunLevel};

use std::path::Path;
use std::time::Duration;

use tokio::sync::mpsc;

/// Generous bound for "should have happened by now" waits.
pub const SETTLE_TIMEOUT: Duration = Duration::from_secs(5);

/// Key that no other test uses. Named pipes on Windows ignore the runtime dir.
pub fn unique_key(prefix: &str) -> ApplicationKey {
    ApplicationKey::new(format!("{prefix}-{}", uuid::Uuid::new_v4().simple()))
        .expect("generated key is valid")
}

pub fn endpoint(dir: &Path, key: &ApplicationKey) -> Endpoint {
    Endpoint::new(key.clone(), Some(dir.to_path_buf()))
}

pub fn settings(dir: &Path, key: &ApplicationKey, run_level: RunLevel) -> LaunchSettings {
    LaunchSettings {
        key: key.clone(),
        run_level,
        runtime_dir: Some(dir.to_path_buf()),
        ipc_timeout: Duration::from_millis(500),
        ..LaunchSettings::default()
    }
}

/// Forwards every delivered message into a channel.
#[derive(Clone)]
pub struct RecordingHandler {
    tx: mpsc::UnboundedSender<Message>,
}

pub fn recording_handler() -> (RecordingHandler, mpsc::UnboundedReceiver<Message>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (RecordingHandler { tx }, rx)
}

impl MessageHandler for RecordingHandler {
    async fn handle(&self, message: Message) {
        let _ = self.tx.send(message);
    }
}

/// Headless window factory. `None` creates windows forever, `Some(n)` fails
/// after `n` windows.
pub struct HeadlessWindowFactory {
    remaining: Option<usize>,
}

impl HeadlessWindowFactory {
    pub fn unlimited() -> Box<dyn WindowFactory> {
        Box::new(Self { remaining: None })
    }

    pub fn limited(windows: usize) -> Box<dyn WindowFactory> {
        Box::new(Self {
            remaining: Some(windows),
        })
    }
}

impl WindowFactory for HeadlessWindowFactory {
    fn create_window(&mut self) -> Result<Box<dyn MainWindow>, WindowError> {
        match self.remaining.as_mut() {
            Some(0) => return Err(WindowError::new("no more windows")),
            Some(remaining) => *remaining -= 1,
            None => {}
        }
        Ok(Box::new(HeadlessWindow {
            id: WindowId::new(),
            visible: false,
        }))
    }
}

struct HeadlessWindow {
    id: WindowId,
    visible: bool,
}

impl MainWindow for HeadlessWindow {
    fn id(&self) -> WindowId {
        self.id
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn show(&mut self) -> Result<(), WindowError> {
        self.visible = true;
        Ok(())
    }

    fn hide(&mut self) -> Result<(), WindowError> {
        self.visible = false;
        Ok(())
    }

    fn raise(&mut self) -> Result<(), WindowError> {
        Ok(())
    }

    fn close(&mut self) -> Result<(), WindowError> {
        self.visible = false;
        Ok(())
    }

    fn force_close(&mut self) -> Result<(), WindowError> {
        self.visible = false;
        Ok(())
    }
}
