use crate::config::{validate_startup_config_contract, ServerConfig, StoreConfig};
use crate::events::BroadcastPublisher;
use crate::identity::TokenSigner;
use crate::{build_router, AppState};
use sooru_store::{MemoryStore, RecordStore, SqliteStore};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` overrides the `info` default.
/// A second call is a no-op.
pub fn init_tracing(log_json: bool) {
    init_tracing_with(log_json, "info");
}

/// Like [`init_tracing`] with a caller-chosen fallback directive.
pub fn init_tracing_with(log_json: bool, default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    let result = if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
    };
    if result.is_err() {
        debug!("tracing subscriber already installed");
    }
}

pub fn open_store(config: &StoreConfig) -> Result<Arc<dyn RecordStore>, String> {
    match config {
        StoreConfig::Memory => Ok(Arc::new(MemoryStore::new())),
        StoreConfig::Sqlite(path) => SqliteStore::open(path)
            .map(|store| Arc::new(store) as Arc<dyn RecordStore>)
            .map_err(|e| format!("open sqlite store {}: {e}", path.display())),
    }
}

pub async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
            }
            _ => {
                warn!("signal handlers unavailable, falling back to ctrl-c");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

/// Serve until SIGINT/SIGTERM, then give in-flight requests
/// `shutdown_drain` to finish.
pub async fn run(config: ServerConfig) -> Result<(), String> {
    validate_startup_config_contract(&config)?;
    if config.token_secret.is_none() {
        warn!("SOORU_TOKEN_SECRET not set; using the development secret");
    }

    let store = open_store(&config.store)?;
    let tokens = TokenSigner::new(config.effective_token_secret().as_bytes(), config.api.token_ttl)
        .map_err(|e| e.to_string())?;
    let publisher = BroadcastPublisher::new(config.event_channel_capacity);
    spawn_event_log(&publisher);

    let state = AppState::with_config(store, Arc::new(publisher), tokens, config.api.clone());
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .map_err(|e| format!("bind {} failed: {e}", config.bind_addr))?;
    info!(
        bind = %config.bind_addr,
        store = ?config.store,
        max_body_bytes = config.api.max_body_bytes,
        enforce_generated_fit = config.api.enforce_generated_fit,
        "sooru-server listening"
    );

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let server = async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                wait_for_shutdown_signal().await;
                info!("shutdown signal received; draining");
                let _ = shutdown_tx.send(true);
            })
            .await
    };
    let drain = config.shutdown_drain;
    let deadline = async move {
        if shutdown_rx.wait_for(|stopping| *stopping).await.is_err() {
            std::future::pending::<()>().await;
        }
        tokio::time::sleep(drain).await;
    };

    tokio::select! {
        result = server => result.map_err(|e| format!("server failed: {e}"))?,
        () = deadline => warn!(drain_ms = u64::try_from(drain.as_millis()).unwrap_or(u64::MAX), "drain deadline reached; dropping open connections"),
    }
    info!("sooru-server stopped");
    Ok(())
}

// Keeps one receiver on the channel so events show up in debug logs.
fn spawn_event_log(publisher: &BroadcastPublisher) {
    let mut rx = publisher.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => debug!(topic = %event.topic, event = %event.event, "event"),
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "event log lagged"),
                Err(RecvError::Closed) => break,
            }
        }
    });
}
