#![forbid(unsafe_code)]

use sooru_core::{ENV_SOORU_LOG_JSON, ENV_SOORU_TOKEN_SECRET};
use sooru_server::{init_tracing, run, ApiConfig, ServerConfig, StoreConfig};
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

fn config_from_env() -> Result<ServerConfig, String> {
    let defaults = ServerConfig::default();
    let api_defaults = ApiConfig::default();

    let bind_addr = match env::var("SOORU_BIND") {
        Ok(raw) => raw
            .parse::<SocketAddr>()
            .map_err(|e| format!("SOORU_BIND `{raw}` is not a socket address: {e}"))?,
        Err(_) => defaults.bind_addr,
    };
    let store = match env::var("SOORU_STORE") {
        Ok(raw) => StoreConfig::parse(&raw)?,
        Err(_) => defaults.store,
    };
    let token_secret = env::var(ENV_SOORU_TOKEN_SECRET)
        .ok()
        .filter(|s| !s.trim().is_empty());

    Ok(ServerConfig {
        bind_addr,
        store,
        token_secret,
        log_json: env_bool(ENV_SOORU_LOG_JSON, defaults.log_json),
        event_channel_capacity: env_usize(
            "SOORU_EVENT_CHANNEL_CAPACITY",
            defaults.event_channel_capacity,
        ),
        shutdown_drain: Duration::from_millis(env_u64(
            "SOORU_SHUTDOWN_DRAIN_MS",
            u64::try_from(defaults.shutdown_drain.as_millis()).unwrap_or(2000),
        )),
        api: ApiConfig {
            max_body_bytes: env_usize("SOORU_MAX_BODY_BYTES", api_defaults.max_body_bytes),
            token_ttl: Duration::from_secs(env_u64(
                "SOORU_TOKEN_TTL_SECS",
                api_defaults.token_ttl.as_secs(),
            )),
            enforce_generated_fit: env_bool(
                "SOORU_ENFORCE_GENERATED_FIT",
                api_defaults.enforce_generated_fit,
            ),
        },
    })
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let config = config_from_env()?;
    init_tracing(config.log_json);
    run(config).await
}
