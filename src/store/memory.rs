use super::{Account, DeleteOutcome, EnsureOutcome, UserStore};
use crate::conn::Role;
use crate::core::constant::{ROLE_ADMIN, ROLE_GUEST};
use crate::core::Error;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory account store.
///
/// Backs the test suite and lets the binary run without Postgres.
pub struct MemoryStore {
    roles: Vec<String>,
    users: Mutex<HashMap<String, StoredUser>>,
}

struct StoredUser {
    password: String,
    role: String,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_roles(&[ROLE_ADMIN, ROLE_GUEST])
    }

    pub fn with_roles(roles: &[&str]) -> Self {
        Self {
            roles: roles.iter().map(|r| (*r).to_owned()).collect(),
            users: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl MemoryStore {
    fn password_of(&self, name: &str) -> Option<String> {
        let users = self.users.lock().expect("poison error when acquiring the account lock");
        users.get(name).map(|u| u.password.clone())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn ensure_account(
        &self,
        name: &str,
        password: &str,
        role: Role,
    ) -> Result<EnsureOutcome, Error> {
        let mut users = self.users.lock().expect("poison error when acquiring the account lock");

        if users.contains_key(name) {
            return Ok(EnsureOutcome::AlreadyExists);
        }
        if !self.roles.iter().any(|r| r == role.as_str()) {
            return Ok(EnsureOutcome::RoleNotFound);
        }

        users.insert(
            name.to_owned(),
            StoredUser {
                password: password.to_owned(),
                role: role.as_str().to_owned(),
            },
        );
        Ok(EnsureOutcome::SignedUp)
    }

    async fn delete_account(&self, name: &str) -> Result<DeleteOutcome, Error> {
        let mut users = self.users.lock().expect("poison error when acquiring the account lock");

        match users.remove(name) {
            Some(_) => Ok(DeleteOutcome::Deleted),
            None => Ok(DeleteOutcome::NotFound),
        }
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, Error> {
        let users = self.users.lock().expect("poison error when acquiring the account lock");

        let mut accounts: Vec<Account> = users
            .iter()
            .map(|(name, user)| Account {
                name: name.clone(),
                role: user.role.clone(),
            })
            .collect();
        accounts.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(accounts)
    }

    async fn count_accounts(&self) -> Result<i64, Error> {
        let users = self.users.lock().expect("poison error when acquiring the account lock");
        Ok(users.len() as i64)
    }
}

// ========================// tests //======================== //
