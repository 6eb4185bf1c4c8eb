use crate::error::lifecycle::ControllerError;

use log::debug;

/// Middleware between the window and the rest of the client.
pub trait Controller: Send {
    fn close(&mut self) -> Result<(), ControllerError>;

    fn force_close(&mut self) -> Result<(), ControllerError>;
}

pub trait ControllerFactory: Send {
    fn create_controller(&mut self) -> Result<Box<dyn Controller>, ControllerError>;
}

/// Controller placeholder. Every operation succeeds and does nothing.
#[derive(Debug, Default)]
pub struct StubController;

impl Controller for StubController {
    fn close(&mut self) -> Result<(), ControllerError> {
        debug!("Stub controller closed");
        Ok(())
    }

    fn force_close(&mut self) -> Result<(), ControllerError> {
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct StubControllerFactory;

impl ControllerFactory for StubControllerFactory {
    fn create_controller(&mut self) -> Result<Box<dyn Controller>, ControllerError> {
        debug!("Creating stub controller");
        Ok(Box::new(StubController))
    }
}
