//! Application configuration loaded from environment variables and config files.
//!
//! Supports `.env` files for development and environment variables for production.
//! Config precedence: env vars > .env file > config.toml > defaults

use serde::{Deserialize, Serialize};

/// Load the application configuration.
///
/// Should be called once at application startup; the result is handed to the
/// database layer and the API state.
pub fn init() -> Result<AppConfig, config::ConfigError> {
    // Load .env file if present (development)
    let _ = dotenvy::dotenv();

    let cfg = config::Config::builder()
        // Defaults
        .add_source(config::Config::try_from(&AppConfig::default())?)
        // Optional config file
        .add_source(config::File::with_name("config").required(false))
        // Environment variables (POLYGLOT_SERVER__PORT, POLYGLOT_DATABASE__URL, etc.)
        .add_source(
            config::Environment::with_prefix("POLYGLOT")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    cfg.try_deserialize()
}

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub pagination: PaginationConfig,
    pub translations: TranslationsConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// SQLite connection URL, e.g. `sqlite://polyglot.db?mode=rwc` or `sqlite::memory:`
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://polyglot.db?mode=rwc".into(),
            max_connections: 10,
            min_connections: 1,
        }
    }
}

impl DatabaseConfig {
    /// Whether the URL points at a private in-memory database.
    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
pub struct AuthConfig {
    /// Access token lifetime in seconds. `0` means tokens live until revoked.
    pub token_ttl_secs: u64,
}

impl AuthConfig {
    pub fn token_ttl(&self) -> Option<chrono::Duration> {
        // Out-of-range lifetimes behave like "never expires".
        match self.token_ttl_secs {
            0 => None,
            secs => i64::try_from(secs)
                .ok()
                .and_then(chrono::Duration::try_seconds),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct PaginationConfig {
    /// Page size used when the client sends no `per_page`
    pub default_per_page: i64,
    /// Upper bound applied to client-supplied `per_page`
    pub max_per_page: i64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_per_page: 30,
            max_per_page: 100,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
pub struct TranslationsConfig {
    /// Reject a second translation with the same key in the same locale.
    pub unique_key_per_locale: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.pagination.default_per_page, 30);
        assert_eq!(cfg.pagination.max_per_page, 100);
        assert!(!cfg.translations.unique_key_per_locale);
        assert!(cfg.auth.token_ttl().is_none());
    }

    #[test]
    fn token_ttl_is_seconds() {
        let auth = AuthConfig { token_ttl_secs: 90 };
        assert_eq!(auth.token_ttl(), Some(chrono::Duration::seconds(90)));
    }

    #[test]
    fn detects_in_memory_urls() {
        let mut db = DatabaseConfig::default();
        assert!(!db.is_in_memory());
        db.url = "sqlite::memory:".into();
        assert!(db.is_in_memory());
    }
}
