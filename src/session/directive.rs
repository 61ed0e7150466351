use crate::conn::{Outbound, Role};
use crate::core::constant::{
    ACTIVE_HEADER, NOT_ENOUGH_RIGHTS, REGISTERED_HEADER, USAGE_KICK, USAGE_MSG, USER_DELETED,
    USER_NOT_DELETED,
};
use crate::core::Error;
use crate::store::{DeleteOutcome, UserStore};
use crate::util::common;
use crate::util::transcript::Transcript;
use crate::AppState;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

// ========================// Directive //======================== //

/// A parsed command or plain-message intent derived from one input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Exit,
    ListParticipants,
    PrivateMessage { recipient: String, body: String },
    Kick { target: String },
    PlainMessage { body: String },
}

impl Directive {
    /// Map one trimmed line to a directive, first match wins.
    ///
    /// `Err` carries the usage notice for a malformed command.
    pub fn parse(line: &str) -> Result<Directive, &'static str> {
        if line == "/exit" {
            return Ok(Directive::Exit);
        }
        if line == "/list" {
            return Ok(Directive::ListParticipants);
        }

        if line.starts_with("/msg") {
            let mut parts = line.splitn(3, ' ');
            parts.next();
            return match (parts.next(), parts.next()) {
                (Some(recipient), Some(body)) => Ok(Directive::PrivateMessage {
                    recipient: recipient.to_owned(),
                    body: body.to_owned(),
                }),
                _ => Err(USAGE_MSG),
            };
        }

        if line.starts_with("/kick") {
            let mut parts = line.splitn(2, ' ');
            parts.next();
            return match parts.next() {
                Some(target) => Ok(Directive::Kick {
                    target: target.to_owned(),
                }),
                None => Err(USAGE_KICK),
            };
        }

        Ok(Directive::PlainMessage {
            body: line.to_owned(),
        })
    }
}

// ========================// Session //======================== //

/// The registered side of one connection, driving per-line dispatch
pub struct Session {
    pub state: Arc<AppState>,
    pub id: Uuid,
    pub name: String,
    pub role: Role,
    pub tx: mpsc::Sender<Outbound>,
}

impl Session {
    /// Handle one trimmed input line.
    ///
    /// Returns whether to keep the session alive.
    pub async fn dispatch(&self, line: &str, transcript: &mut Option<Transcript>) -> bool {
        let timestamp = common::timestamp();

        let directive = match Directive::parse(line) {
            Ok(directive) => directive,
            Err(usage) => {
                // lines rejected for malformed usage are not logged
                self.reply(usage).await;
                return true;
            }
        };

        if let Some(transcript) = transcript {
            transcript.append(&timestamp, line).await;
        }

        match directive {
            Directive::Exit => return false,
            Directive::ListParticipants => self.list_participants().await,
            Directive::PrivateMessage { recipient, body } => {
                self.state
                    .hub
                    .direct_message(&self.name, &recipient, &body)
                    .await;
            }
            Directive::Kick { target } => self.kick(&target).await,
            Directive::PlainMessage { body } => {
                let line = format!("{} {}: {}", timestamp, self.name, body);
                self.state.hub.broadcast(&line).await;
            }
        }
        true
    }

    /// Render the known and active participant groups back to the sender
    async fn list_participants(&self) {
        match self.roster_block().await {
            Ok(block) => self.reply(&block).await,
            Err(e) => tracing::error!("failed to build participant list: {}", e),
        }
    }

    async fn roster_block(&self) -> Result<String, Error> {
        let accounts = self.state.store.list_accounts().await?;
        let total = self.state.store.count_accounts().await?;

        let mut block = String::new();
        block.push_str(REGISTERED_HEADER);
        block.push('\n');
        for account in &accounts {
            block.push_str(&format!("• {} ({})\n", account.name, account.role));
        }
        block.push_str(&format!("Total: {}\n", total));

        let active = self.state.hub.list_active().await;
        block.push_str(ACTIVE_HEADER);
        block.push('\n');
        let count = active.len();
        for (name, role) in active {
            block.push_str(&format!("• {} ({})\n", name, role));
        }
        block.push_str(&format!("Total: {}", count));

        Ok(block)
    }

    async fn kick(&self, target: &str) {
        // only admins may disconnect other participants
        if !self.role.is_admin() {
            self.reply(NOT_ENOUGH_RIGHTS).await;
            return;
        }

        match self.state.store.delete_account(target).await {
            Ok(DeleteOutcome::Deleted) => self.reply(USER_DELETED).await,
            Ok(DeleteOutcome::NotFound) => self.reply(USER_NOT_DELETED).await,
            Err(e) => tracing::error!("failed to delete account {}: {}", target, e),
        }

        // a live session is dropped even if the store call failed
        self.state.hub.kick(target).await;
    }

    async fn reply(&self, line: &str) {
        if self.tx.send(Outbound::Line(line.to_owned())).await.is_err() {
            tracing::debug!("failed to reply to {}", self.name);
        }
    }
}

// ========================// tests //======================== //
