use crate::core::constant::CHAN_CAPACITY;
use std::env;

// ========================// Config //======================== //

/// Configure of the App
#[derive(Debug, Clone)]
pub struct Config {
    pub server_ip: String,
    pub server_port: String,
    /// Unset means the in-memory account store
    pub database_url: Option<String>,
    pub storage_directory: String,
    pub client_channel_capacity: usize,
}

impl Config {
    /// Initialize the Config from env
    pub fn from_env() -> Config {
        let server_ip = env::var("SERVER_IP").unwrap_or("0.0.0.0".to_owned());
        let server_port = env::var("SERVER_PORT").unwrap_or("8080".to_owned());
        let database_url = env::var("DATABASE_URL").ok();
        let storage_directory = env::var("STORAGE_DIRECTORY").unwrap_or("storage".to_owned());

        let client_channel_capacity = env::var("CLIENT_CHANNEL_CAPACITY")
            .unwrap_or(CHAN_CAPACITY.to_string())
            .parse()
            .expect("failed to parse CLIENT_CHANNEL_CAPACITY");

        Config {
            server_ip,
            server_port,
            database_url,
            storage_directory,
            client_channel_capacity,
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_ip, self.server_port)
    }
}
