// SPDX-License-Identifier: Apache-2.0

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEV_TOKEN_SECRET: &str = "sooru-dev-secret-change-me";
pub const MIN_TOKEN_SECRET_LEN: usize = 16;

/// Request-path knobs carried in `AppState`.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub max_body_bytes: usize,
    pub token_ttl: Duration,
    pub enforce_generated_fit: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 64 * 1024,
            token_ttl: Duration::from_secs(86_400),
            enforce_generated_fit: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    Memory,
    Sqlite(PathBuf),
}

impl StoreConfig {
    pub fn parse(raw: &str) -> Result<Self, String> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("memory") {
            return Ok(Self::Memory);
        }
        match raw.strip_prefix("sqlite:") {
            Some(path) if !path.trim().is_empty() => Ok(Self::Sqlite(PathBuf::from(path.trim()))),
            Some(_) => Err("SOORU_STORE=sqlite: requires a database path".to_string()),
            None => Err(format!(
                "SOORU_STORE must be `memory` or `sqlite:<path>`, got `{raw}`"
            )),
        }
    }
}

/// Process-level settings read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub store: StoreConfig,
    pub token_secret: Option<String>,
    pub log_json: bool,
    pub event_channel_capacity: usize,
    pub shutdown_drain: Duration,
    pub api: ApiConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            store: StoreConfig::Memory,
            token_secret: None,
            log_json: true,
            event_channel_capacity: 256,
            shutdown_drain: Duration::from_millis(2000),
            api: ApiConfig::default(),
        }
    }
}

impl ServerConfig {
    /// The configured secret, or the development default when none was set.
    #[must_use]
    pub fn effective_token_secret(&self) -> &str {
        self.token_secret.as_deref().unwrap_or(DEV_TOKEN_SECRET)
    }
}

pub fn validate_startup_config_contract(config: &ServerConfig) -> Result<(), String> {
    if config.api.max_body_bytes == 0 {
        return Err("SOORU_MAX_BODY_BYTES must be > 0".to_string());
    }
    if config.api.token_ttl.is_zero() {
        return Err("SOORU_TOKEN_TTL_SECS must be > 0".to_string());
    }
    if config.event_channel_capacity == 0 {
        return Err("SOORU_EVENT_CHANNEL_CAPACITY must be > 0".to_string());
    }
    if let Some(secret) = &config.token_secret {
        if secret.len() < MIN_TOKEN_SECRET_LEN {
            return Err(format!(
                "SOORU_TOKEN_SECRET must be at least {MIN_TOKEN_SECRET_LEN} bytes"
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_startup_contract() {
        let cfg = ServerConfig::default();
        assert!(validate_startup_config_contract(&cfg).is_ok());
        assert_eq!(cfg.bind_addr.port(), 5000);
        assert_eq!(cfg.api.max_body_bytes, 65_536);
        assert!(!cfg.api.enforce_generated_fit);
        assert_eq!(cfg.effective_token_secret(), DEV_TOKEN_SECRET);
    }

    #[test]
    fn zero_limits_and_short_secrets_are_rejected() {
        let mut cfg = ServerConfig::default();
        cfg.api.max_body_bytes = 0;
        assert!(validate_startup_config_contract(&cfg).is_err());

        let mut cfg = ServerConfig::default();
        cfg.token_secret = Some("short".to_string());
        let err = validate_startup_config_contract(&cfg).expect_err("short secret");
        assert!(err.contains("SOORU_TOKEN_SECRET"));
    }

    #[test]
    fn store_selector_parses_memory_and_sqlite() {
        assert_eq!(StoreConfig::parse("memory"), Ok(StoreConfig::Memory));
        assert_eq!(
            StoreConfig::parse("sqlite:/var/lib/sooru/db.sqlite"),
            Ok(StoreConfig::Sqlite(PathBuf::from("/var/lib/sooru/db.sqlite")))
        );
        assert!(StoreConfig::parse("sqlite:").is_err());
        assert!(StoreConfig::parse("postgres://x").is_err());
    }
}
