//! Persistence of name/password/role accounts.
//!
//! The chat core only ever talks to the store through [`UserStore`]; the
//! connection hub never learns store-level outcomes beyond the lines it
//! relays to clients.

use crate::conn::Role;
use crate::core::Error;
use async_trait::async_trait;

mod memory;
pub use memory::MemoryStore;

mod postgres;
pub use postgres::PgStore;

/// Result of the upsert-or-validate done at handshake time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureOutcome {
    SignedUp,
    AlreadyExists,
    RoleNotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

/// A persisted account row
#[derive(Debug, Clone)]
pub struct Account {
    pub name: String,
    pub role: String,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Idempotent upsert-or-validate of an account
    async fn ensure_account(
        &self,
        name: &str,
        password: &str,
        role: Role,
    ) -> Result<EnsureOutcome, Error>;

    async fn delete_account(&self, name: &str) -> Result<DeleteOutcome, Error>;

    async fn list_accounts(&self) -> Result<Vec<Account>, Error>;

    async fn count_accounts(&self) -> Result<i64, Error>;
}
