//! Remote client traits

use crate::registry::ClientId;

/// Progress of a client's sign-out when it is requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignOutProgress {
    /// Sign-out finished synchronously; the client may be disconnected now
    Complete,
    /// Sign-out is running; the client reports completion later and must
    /// stay connected until then
    Pending,
}

/// Abstraction over a concrete remote service client
///
/// Every call returns immediately. The outcome of `connect` is delivered
/// later as exactly one connected or connection-failed callback to the
/// orchestrator's host adapter.
pub trait RemoteClient: Send {
    /// Start an asynchronous connection attempt
    fn connect(&mut self);

    /// Tear down the connection; a no-op when already disconnected
    fn disconnect(&mut self);

    /// Whether the client is currently connected
    fn is_connected(&self) -> bool;

    /// Start signing the user out of this client
    ///
    /// Clients whose sign-out is asynchronous start the operation, answer
    /// [`SignOutProgress::Pending`], and report completion later.
    fn begin_sign_out(&mut self) -> SignOutProgress {
        SignOutProgress::Complete
    }
}

/// Builds remote clients during orchestrator initialization
pub trait ClientFactory {
    /// Create the client for `id`, configured with every scope of the request
    fn create(&mut self, id: ClientId, scopes: &[&'static str]) -> Box<dyn RemoteClient>;
}
