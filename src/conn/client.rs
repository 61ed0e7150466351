use crate::core::constant::{ROLE_ADMIN, ROLE_GUEST};
use std::fmt;
use tokio::sync::mpsc;
use uuid::Uuid;

/// One frame on a client's outgoing queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Line(String),
    /// Stop signal for the connection's writer task
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Guest,
}

impl Role {
    /// Case-sensitive parse of a role answer
    pub fn parse(value: &str) -> Option<Role> {
        match value {
            ROLE_ADMIN => Some(Role::Admin),
            ROLE_GUEST => Some(Role::Guest),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => ROLE_ADMIN,
            Role::Guest => ROLE_GUEST,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One authenticated, currently-connected participant.
///
/// Immutable once registered; the `tx` end is the only write path
/// to the connection.
#[derive(Clone)]
pub struct Client {
    id: Uuid,
    name: String,
    role: Role,
    tx: mpsc::Sender<Outbound>,
}

impl Client {
    pub fn new(name: String, role: Role, tx: mpsc::Sender<Outbound>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            role,
            tx,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Queue one line for the writer task; false means the peer is gone
    pub async fn send(&self, line: &str) -> bool {
        self.tx.send(Outbound::Line(line.to_owned())).await.is_ok()
    }

    pub async fn close(&self) {
        let _ = self.tx.send(Outbound::Close).await;
    }
}
