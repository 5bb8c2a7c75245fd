#![forbid(unsafe_code)]

// SPDX-License-Identifier: Apache-2.0

use std::env;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vitrage_model::builtin_catalog;
use vitrage_server::{build_router, ApiConfig, AppState, LogQuoteRepository};

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

fn env_i64(name: &str, default: i64) -> i64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

fn env_duration_ms(name: &str, default_ms: u64) -> Duration {
    Duration::from_millis(env_u64(name, default_ms))
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("register SIGTERM");
        let mut sigint = signal(SignalKind::interrupt()).expect("register SIGINT");
        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if env_bool("VITRAGE_LOG_JSON", true) {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    init_tracing();

    let bind_addr = env::var("VITRAGE_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let api_cfg = ApiConfig {
        max_body_bytes: env_usize("VITRAGE_MAX_BODY_BYTES", 64 * 1024),
        request_timeout: env_duration_ms("VITRAGE_REQUEST_TIMEOUT_MS", 5000),
        catalog_ttl: env_duration_ms("VITRAGE_CATALOG_TTL_MS", 300_000),
        vat_rate_permille: env_i64("VITRAGE_VAT_RATE_PERMILLE", 210),
        max_quote_lines: env_usize("VITRAGE_MAX_QUOTE_LINES", 20),
        estimated_response: env::var("VITRAGE_ESTIMATED_RESPONSE")
            .unwrap_or_else(|_| "binnen 1 werkdag".to_string()),
        readiness_requires_catalog: env_bool("VITRAGE_READINESS_REQUIRES_CATALOG", true),
        shutdown_drain: env_duration_ms("VITRAGE_SHUTDOWN_DRAIN_MS", 5000),
    };
    api_cfg.validate()?;

    let catalog = builtin_catalog();
    for product in &catalog.products {
        product
            .validate()
            .map_err(|e| format!("invalid catalog product {}: {e}", product.id))?;
    }

    let state = AppState::new(catalog, api_cfg, Arc::new(LogQuoteRepository));
    let app = build_router(state.clone());

    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| format!("bind failed on {bind_addr}: {e}"))?;
    info!("vitrage-server listening on {bind_addr}");

    let accepting = state.accepting_requests.clone();
    let drain = state.api.shutdown_drain;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            wait_for_shutdown_signal().await;
            // Refuse new quote submissions, then drain in-flight requests.
            accepting.store(false, Ordering::Relaxed);
            tokio::time::sleep(drain).await;
        })
        .await
        .map_err(|e| format!("server failed: {e}"))
}
