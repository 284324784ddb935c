use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory uploaded files are written to and served from (under /storage).
    pub root: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub session_cookie: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.base_url", "http://localhost:8080")?
            .set_default("database.url", "sqlite://osis.db")?
            .set_default("database.max_connections", 10)?
            .set_default("storage.root", "storage")?
            .set_default("auth.session_cookie", "session")?
            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (with OSIS__ prefix, double underscore separates levels)
            .add_source(Environment::with_prefix("OSIS").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                base_url: "http://localhost:8080".to_string(),
            },
            database: DatabaseConfig {
                url: "sqlite://osis.db".to_string(),
                max_connections: 10,
            },
            storage: StorageConfig {
                root: "storage".to_string(),
            },
            auth: AuthConfig {
                session_cookie: "session".to_string(),
            },
        }
    }
}
