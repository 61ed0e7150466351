use chat_server::{serve, AppState, Config, MemoryStore, PgStore, UserStore};
use std::sync::Arc;
use tokio::{net::TcpListener, signal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Read environment variables from '.env'
    dotenvy::dotenv().ok();

    // Initialize the logger
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chat_server=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse our configuration from the environment
    let config = Config::from_env();

    let store: Arc<dyn UserStore> = match &config.database_url {
        Some(url) => {
            let store = PgStore::connect(url)
                .await
                .expect("cannot connect to database");
            tracing::info!("db was successfully connected");
            Arc::new(store)
        }
        None => {
            tracing::info!("DATABASE_URL not set, using the in-memory account store");
            Arc::new(MemoryStore::new())
        }
    };

    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .expect("failed to bind server address");
    tracing::info!("listening on {}", addr);

    let state = AppState::new(config, store);
    serve(state, listener, shutdown_signal()).await;
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
