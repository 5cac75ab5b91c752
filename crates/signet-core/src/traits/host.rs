//! Host-facing traits

use crate::types::{Diagnostic, DispatchError, ResolutionRequest};

/// Services the host application provides to the orchestrator
pub trait Host: Send {
    /// Check that the underlying service is available on this device
    fn check_service_availability(&self) -> Result<(), Diagnostic> {
        Ok(())
    }

    /// Start an external resolution action
    ///
    /// The host must later report the outcome with the request's correlation
    /// code. An error means the action could not be started at all.
    fn start_resolution(&mut self, request: &ResolutionRequest) -> Result<(), DispatchError>;

    /// Present a diagnostic to the user
    fn present_diagnostic(&mut self, diagnostic: &Diagnostic);
}

/// Receiver of terminal sign-in outcomes
pub trait EventSink: Send {
    /// Every requested client connected
    fn on_sign_in_success(&mut self);

    /// The sign-in attempt failed
    fn on_sign_in_failure(&mut self);

    /// A client connection dropped without being asked to
    fn on_disconnection(&mut self);
}
