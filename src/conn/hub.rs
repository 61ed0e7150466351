use super::client::{Client, Role};
use super::state::HubState;
use tokio::sync::RwLock;
use uuid::Uuid;

/// The serialized owner of the live-connection registry.
///
/// Every operation takes the lock exactly once for its whole pass, so no
/// two operations ever observe the registry in a torn state.
#[derive(Default)]
pub struct Hub {
    inner: RwLock<HubState>,
}

impl Hub {
    /// Admit a client to the registry
    pub async fn register(&self, client: Client) {
        let mut inner = self.inner.write().await;
        inner.register(client);
    }

    /// Idempotent removal by connection identity
    pub async fn unregister(&self, id: Uuid) {
        let mut inner = self.inner.write().await;
        inner.unregister(id);
    }

    /// Deliver a line to every client registered at this instant
    pub async fn broadcast(&self, line: &str) {
        let mut inner = self.inner.write().await;
        inner.send_to_all(line).await;
    }

    pub async fn direct_message(&self, sender: &str, recipient: &str, body: &str) {
        let mut inner = self.inner.write().await;
        inner.send_private(sender, recipient, body).await;
    }

    /// Force-disconnect a client by name; true if one was registered
    pub async fn kick(&self, name: &str) -> bool {
        let mut inner = self.inner.write().await;
        inner.kick(name).await
    }

    pub async fn list_active(&self) -> Vec<(String, Role)> {
        let inner = self.inner.read().await;
        inner.roster()
    }
}

// ========================// tests //======================== //
