//! Line-based TCP chat server.
//!
//! Clients authenticate with name, password and role, then exchange
//! newline-delimited messages: broadcasts, private `/msg` delivery, a
//! `/list` roster and an admin-only `/kick`.

mod conn;
mod core;
mod session;
mod store;
mod util;

pub use crate::core::Error;
pub use conn::Hub;
pub use store::{MemoryStore, PgStore, UserStore};
pub use util::config::Config;

use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Shared state of the chat server
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn UserStore>,
    pub hub: Hub,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn UserStore>) -> Arc<Self> {
        Arc::new(Self {
            config,
            store,
            hub: Hub::default(),
        })
    }
}

/// Accept connections until `shutdown` resolves.
///
/// Each accepted socket gets its own session task; a failed accept never
/// takes the loop down.
pub async fn serve(state: Arc<AppState>, listener: TcpListener, shutdown: impl Future<Output = ()>) {
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok((socket, addr)) => {
                    tracing::debug!("accepted connection from {}", addr);
                    tokio::spawn(session::handle_connection(state.clone(), socket, addr));
                }
                Err(e) => tracing::error!("connection error: {}", e),
            },
            _ = &mut shutdown => {
                tracing::info!("signal received, starting graceful shutdown");
                return;
            }
        }
    }
}
