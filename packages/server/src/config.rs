use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::database::InFlightPolicy;

/// Environment variable holding the document store connection string.
pub const MONGODB_URI_ENV: &str = "MONGODB_URI";

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    /// Allowed origins. Empty allows any origin.
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// Connection string. Left unset, blog requests fail with a connection
    /// error instead of the server refusing to start.
    #[serde(default)]
    pub url: Option<String>,
    /// Logical database holding the `blogs` collection.
    pub name: String,
    /// What callers do when they find a connection attempt already running.
    #[serde(default)]
    pub in_flight: InFlightPolicy,
    /// Round-trip to the server while connecting so handshake failures are
    /// reported by `ensure_connected` rather than by the first query.
    #[serde(default)]
    pub ping_on_connect: bool,
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
    #[serde(default)]
    pub server_selection_timeout_secs: Option<u64>,
}

impl DatabaseConfig {
    /// The configured connection string, if it is present and non-blank.
    pub fn uri(&self) -> Option<&str> {
        self.url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            name: "koigor".into(),
            in_flight: InFlightPolicy::default(),
            ping_on_connect: false,
            connect_timeout_secs: None,
            server_selection_timeout_secs: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    /// Fallback filter directive when `RUST_LOG` is not set.
    pub filter: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub log: LogConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("database.name", "koigor")?
            .set_default("log.filter", "info")?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., FOLIO__SERVER__PORT)
            .add_source(
                Environment::with_prefix("FOLIO")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors.allow_origins")
                    .try_parsing(true),
            )
            .set_override_option("database.url", std::env::var(MONGODB_URI_ENV).ok())?
            .build()?;

        s.try_deserialize()
    }
}
