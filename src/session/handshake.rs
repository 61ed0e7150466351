use crate::conn::{Client, Outbound, Role};
use crate::core::constant::{
    PROMPT_NAME, PROMPT_PASSWORD, PROMPT_ROLE, ROLE_MISSING, ROLE_REJECTED, SIGNED_IN, SIGNED_UP,
};
use crate::core::Error;
use crate::store::{EnsureOutcome, UserStore};
use crate::AppState;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, Lines};
use tokio::sync::mpsc;

/// Collect name, password and role from a fresh connection and validate
/// the account against the user store.
///
/// Any read failure aborts the connection before it touches the Hub.
pub async fn handshake<R>(
    state: &Arc<AppState>,
    lines: &mut Lines<R>,
    tx: &mpsc::Sender<Outbound>,
) -> Result<Client, Error>
where
    R: AsyncBufRead + Unpin,
{
    send(tx, PROMPT_NAME).await?;
    let name = read_trimmed(lines).await?;

    send(tx, PROMPT_PASSWORD).await?;
    // the password is opaque to the core and kept verbatim
    let password = match lines.next_line().await? {
        Some(line) => line,
        None => return Err(Error::ConnectionClosed),
    };

    send(tx, PROMPT_ROLE).await?;
    let role = loop {
        let answer = read_trimmed(lines).await?;
        match Role::parse(&answer) {
            Some(role) => break role,
            None => send(tx, ROLE_REJECTED).await?,
        }
    };

    let outcome = state.store.ensure_account(&name, &password, role).await?;
    send(tx, outcome_line(outcome)).await?;
    if outcome == EnsureOutcome::RoleNotFound {
        // not recoverable mid-handshake
        return Err(Error::RoleNotFound);
    }

    Ok(Client::new(name, role, tx.clone()))
}

fn outcome_line(outcome: EnsureOutcome) -> &'static str {
    match outcome {
        EnsureOutcome::SignedUp => SIGNED_UP,
        EnsureOutcome::AlreadyExists => SIGNED_IN,
        EnsureOutcome::RoleNotFound => ROLE_MISSING,
    }
}

async fn send(tx: &mpsc::Sender<Outbound>, line: &str) -> Result<(), Error> {
    tx.send(Outbound::Line(line.to_owned())).await?;
    Ok(())
}

async fn read_trimmed<R>(lines: &mut Lines<R>) -> Result<String, Error>
where
    R: AsyncBufRead + Unpin,
{
    match lines.next_line().await? {
        Some(line) => Ok(line.trim().to_owned()),
        None => Err(Error::ConnectionClosed),
    }
}

// ========================// tests //======================== //
