//! Client handles
//!
//! A flat table of handles indexed by [`ClientId`]. The orchestrator selects
//! the active client by tag instead of through per-client types.

use signet_core::registry;
use signet_core::traits::{ClientFactory, RemoteClient, SignOutProgress};
use signet_core::{ClientId, ClientSet};

/// Uniform wrapper over one remote client
pub struct ClientHandle {
    id: ClientId,
    client: Box<dyn RemoteClient>,
}

impl ClientHandle {
    pub fn new(id: ClientId, client: Box<dyn RemoteClient>) -> Self {
        Self { id, client }
    }

    pub fn id(&self) -> ClientId {
        self.id
    }

    pub fn connect(&mut self) {
        tracing::debug!("Connecting client {}", self.id);
        self.client.connect();
    }

    /// Disconnect the client; does nothing when it is not connected
    pub fn disconnect(&mut self) {
        if self.client.is_connected() {
            tracing::debug!("Disconnecting client {}", self.id);
            self.client.disconnect();
        }
    }

    pub fn is_connected(&self) -> bool {
        self.client.is_connected()
    }

    pub fn begin_sign_out(&mut self) -> SignOutProgress {
        self.client.begin_sign_out()
    }
}

impl std::fmt::Debug for ClientHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientHandle")
            .field("id", &self.id)
            .field("connected", &self.client.is_connected())
            .finish()
    }
}

/// One optional handle per known client
#[derive(Debug)]
pub struct ClientTable {
    slots: [Option<ClientHandle>; ClientId::COUNT],
}

impl ClientTable {
    /// Create one handle per requested client
    ///
    /// Every client is built with the scopes of the whole request.
    pub fn build(requested: ClientSet, factory: &mut dyn ClientFactory) -> Self {
        let scopes = registry::derive_scopes(requested);
        let mut slots: [Option<ClientHandle>; ClientId::COUNT] = [None, None, None];

        for id in requested.iter() {
            let client = factory.create(id, &scopes);
            slots[id.index()] = Some(ClientHandle::new(id, client));
        }

        Self { slots }
    }

    pub fn get(&self, id: ClientId) -> Option<&ClientHandle> {
        self.slots[id.index()].as_ref()
    }

    pub fn get_mut(&mut self, id: ClientId) -> Option<&mut ClientHandle> {
        self.slots[id.index()].as_mut()
    }

    /// Clients with a handle
    pub fn present(&self) -> ClientSet {
        self.iter().map(ClientHandle::id).collect()
    }

    /// Clients whose handle reports a live connection
    pub fn live(&self) -> ClientSet {
        self.iter()
            .filter(|handle| handle.is_connected())
            .map(ClientHandle::id)
            .collect()
    }

    /// Iterate handles in priority order
    pub fn iter(&self) -> impl Iterator<Item = &ClientHandle> {
        self.slots.iter().flatten()
    }
}
