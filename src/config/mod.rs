// Configuration module entry point
// Loads layered configuration (file, environment, defaults) and holds the runtime state

mod state;
mod types;

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, FileFormat};
use hyper::header::HeaderValue;
use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{ChatConfig, Config};

pub const DEFAULT_MODEL: &str = "gpt-5-nano";
pub const DEFAULT_NOTE: &str =
    "This is a mock response generated locally. No external model was called.";

/// Builder pre-populated with every default value
fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    config::Config::builder()
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8787)?
        .set_default("logging.level", "info")?
        .set_default("logging.access_log", true)?
        .set_default("logging.access_log_format", "combined")?
        .set_default("logging.log_webhook_payloads", true)?
        .set_default("performance.keep_alive_timeout", 75)?
        .set_default("performance.read_timeout", 30)?
        .set_default("performance.write_timeout", 30)?
        .set_default("http.server_name", "edge-chat-router")?
        .set_default("http.max_body_size", 1_048_576)? // 1MB
        .set_default("chat.default_model", DEFAULT_MODEL)?
        .set_default("chat.note", DEFAULT_NOTE)?
        .set_default("chat.utc_offset_minutes", 0)
}

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, ConfigError> {
        builder_with_defaults()?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("ROUTER").separator("__"))
            .build()?
            .try_deserialize::<Self>()?
            .validated()
    }

    /// Parse configuration from an inline TOML document, ignoring the environment
    pub fn from_toml(document: &str) -> Result<Self, ConfigError> {
        builder_with_defaults()?
            .add_source(config::File::from_str(document, FileFormat::Toml))
            .build()?
            .try_deserialize::<Self>()?
            .validated()
    }

    /// Reject values that would make every response fail to build
    fn validated(self) -> Result<Self, ConfigError> {
        if HeaderValue::from_str(&self.http.server_name).is_err() {
            return Err(ConfigError::Message(format!(
                "http.server_name {:?} is not a valid header value",
                self.http.server_name
            )));
        }
        Ok(self)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
