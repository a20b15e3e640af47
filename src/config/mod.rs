// Configuration module entry point
// Loads layered configuration and holds the shared application state

mod state;
mod types;

use std::net::SocketAddr;
use std::time::Duration;

// Re-export public types
pub use state::AppState;
pub use types::{Config, StoreBackend, StoreConfig};

/// Environment variable prefix, e.g. `BOOKSHELF__STORE__HOST=db`
const ENV_PREFIX: &str = "BOOKSHELF";

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Missing files are fine; defaults and environment variables still apply
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("performance.shutdown_timeout", 10)?
            .set_default("http.server_name", "bookshelf")?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .set_default("store.backend", "mongodb")?
            .set_default("store.host", "127.0.0.1")?
            .set_default("store.port", 27017)?
            .set_default("store.database", "library")?
            .set_default("store.collection", "books")?
            .set_default("store.request_timeout_ms", 5000)?
            .set_default("store.connect_timeout_ms", 5000)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Bound for a whole connection, the larger of read and write timeouts
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(std::cmp::max(
            self.performance.read_timeout,
            self.performance.write_timeout,
        ))
    }

    pub const fn store_deadline(&self) -> Duration {
        Duration::from_millis(self.store.request_timeout_ms)
    }
}
