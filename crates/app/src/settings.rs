//! Handles settings for the application.
//!
//! Values come from an optional `settings.toml` in the working directory,
//! overridden by `LEDGER__SECTION__KEY` environment variables
//! (`LEDGER__SERVER__PORT=9000`). See `settings.example.toml`.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    /// Path of the SQLite file, created if missing.
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
    pub cors_origins: Vec<String>,
    pub bcrypt_cost: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("app.level", "info")?
            .set_default("server.port", 8080)?
            .set_default("server.database", "memory")?
            .set_default("server.token_ttl_minutes", 24 * 60)?
            .set_default(
                "server.cors_origins",
                vec!["http://localhost:3000", "http://localhost:3001"],
            )?
            .add_source(File::with_name("settings").required(false))
            .add_source(
                Environment::with_prefix("LEDGER")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Self = settings.try_deserialize()?;
        settings.server.validate()?;
        Ok(settings)
    }
}

impl Server {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Message(
                "server.jwt_secret must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server(jwt_secret: &str) -> Server {
        Server {
            bind: None,
            port: 8080,
            database: Database::Memory,
            jwt_secret: jwt_secret.to_string(),
            token_ttl_minutes: 60,
            cors_origins: Vec::new(),
            bcrypt_cost: None,
        }
    }

    #[test]
    fn blank_jwt_secret_is_rejected() {
        assert!(server("").validate().is_err());
        assert!(server("   ").validate().is_err());
        assert!(server("a-long-random-secret").validate().is_ok());
    }
}
