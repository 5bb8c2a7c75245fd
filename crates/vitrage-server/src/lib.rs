#![forbid(unsafe_code)]

// SPDX-License-Identifier: Apache-2.0

//! HTTP surface of the quote service: catalog discovery, price previews and
//! quote intake over a small axum router.

use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;
use std::sync::atomic::{AtomicBool, AtomicU64};
use std::sync::Arc;
use vitrage_model::Catalog;

pub mod config;
mod http;
pub mod repository;
mod telemetry;

pub use config::{ApiConfig, CONFIG_SCHEMA_VERSION};
pub use repository::{LogQuoteRepository, MemoryQuoteRepository, QuoteRepository, RepositoryError};

pub const CRATE_NAME: &str = "vitrage-server";

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub api: ApiConfig,
    pub quotes: Arc<dyn QuoteRepository>,
    pub ready: Arc<AtomicBool>,
    pub accepting_requests: Arc<AtomicBool>,
    pub(crate) metrics: Arc<telemetry::RequestMetrics>,
    pub(crate) request_id_seed: Arc<AtomicU64>,
}

impl AppState {
    #[must_use]
    pub fn new(catalog: Catalog, api: ApiConfig, quotes: Arc<dyn QuoteRepository>) -> Self {
        Self {
            catalog: Arc::new(catalog),
            api,
            quotes,
            ready: Arc::new(AtomicBool::new(true)),
            accepting_requests: Arc::new(AtomicBool::new(true)),
            metrics: Arc::new(telemetry::RequestMetrics::default()),
            request_id_seed: Arc::new(AtomicU64::new(1)),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let max_body = state.api.max_body_bytes;
    Router::new()
        .route("/healthz", get(http::healthz_handler))
        .route("/readyz", get(http::readyz_handler))
        .route("/metrics", get(http::metrics_handler))
        .route("/v1/version", get(http::version_handler))
        .route("/v1/products", get(http::products_handler))
        .route("/v1/products/:product_id", get(http::product_detail_handler))
        .route(
            "/v1/products/:product_id/price",
            post(http::price_preview_handler),
        )
        .route("/v1/quotes", post(http::submit_quote_handler))
        .layer(DefaultBodyLimit::max(max_body))
        .layer(from_fn_with_state(state.clone(), http::timeout_middleware))
        .with_state(state)
}
