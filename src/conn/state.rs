use super::client::{Client, Role};
use crate::core::constant::USER_NOT_FOUND;
use std::collections::HashMap;
use uuid::Uuid;

/// The authoritative mapping of connection identity to Client.
///
/// Only ever touched while the Hub's lock is held.
#[derive(Default)]
pub struct HubState {
    clients: HashMap<Uuid, Client>,
}

impl HubState {
    pub fn register(&mut self, client: Client) {
        self.clients.insert(client.id(), client);
    }

    /// Removing an absent entry is a no-op
    pub fn unregister(&mut self, id: Uuid) {
        self.clients.remove(&id);
    }

    /// Send a line to every registered client; peers whose writer task is
    /// gone are dropped from the registry in the same pass.
    pub async fn send_to_all(&mut self, line: &str) {
        let mut gone = Vec::new();
        for client in self.clients.values() {
            if !client.send(line).await {
                gone.push(client.id());
            }
        }
        for id in gone {
            self.clients.remove(&id);
        }
    }

    /// Deliver a private message to the first client named `recipient`,
    /// or a not-found notice back to the sender.
    pub async fn send_private(&mut self, sender: &str, recipient: &str, body: &str) {
        let gone = match self.find_by_name(recipient) {
            Some(client) => {
                let line = format!("Private message from {}: {}", sender, body);
                (!client.send(&line).await).then(|| client.id())
            }
            None => match self.find_by_name(sender) {
                // the sender may be gone as well; then the notice is dropped
                Some(client) => (!client.send(USER_NOT_FOUND).await).then(|| client.id()),
                None => None,
            },
        };

        if let Some(id) = gone {
            self.clients.remove(&id);
        }
    }

    /// Close and remove the first client named `name`; true if one was found
    pub async fn kick(&mut self, name: &str) -> bool {
        let id = self.find_by_name(name).map(Client::id);
        match id {
            Some(id) => {
                if let Some(client) = self.clients.remove(&id) {
                    client.close().await;
                }
                true
            }
            None => false,
        }
    }

    /// Snapshot of the registry for the participant listing
    pub fn roster(&self) -> Vec<(String, Role)> {
        self.clients
            .values()
            .map(|c| (c.name().to_owned(), c.role()))
            .collect()
    }

    // Linear scan: active chat populations are small
    fn find_by_name(&self, name: &str) -> Option<&Client> {
        self.clients.values().find(|c| c.name() == name)
    }
}
