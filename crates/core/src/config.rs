//! Client configuration
//!
//! Defaults match a server started locally on port 8000. Every field can be
//! overridden from the environment.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_CHAT_ENDPOINT: &str = "ws://127.0.0.1:8000/ws/chat";

/// Delay before the first chat connection after startup
pub const STARTUP_CONNECT_DELAY_MS: u64 = 1000;
/// Delay before reconnecting the chat after a successful login
pub const LOGIN_RECONNECT_DELAY_MS: u64 = 500;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Storefront HTTP origin
    pub base_url: String,
    /// Chat websocket URL
    pub chat_endpoint: String,
    pub startup_connect_delay: Duration,
    pub login_reconnect_delay: Duration,
    /// Where the client state database lives
    pub data_dir: PathBuf,
}

impl ClientConfig {
    /// Defaults with `PETSHOP_BASE_URL`, `PETSHOP_CHAT_URL` and
    /// `PETSHOP_DATA_DIR` applied on top
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("PETSHOP_BASE_URL") {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(url) = std::env::var("PETSHOP_CHAT_URL") {
            config.chat_endpoint = url;
        }
        if let Ok(dir) = std::env::var("PETSHOP_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }

        config
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("petshop.db")
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        let data_dir = dirs_next::data_local_dir()
            .map(|p| p.join("PetShop"))
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            chat_endpoint: DEFAULT_CHAT_ENDPOINT.to_string(),
            startup_connect_delay: Duration::from_millis(STARTUP_CONNECT_DELAY_MS),
            login_reconnect_delay: Duration::from_millis(LOGIN_RECONNECT_DELAY_MS),
            data_dir,
        }
    }
}
