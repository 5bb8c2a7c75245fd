// SPDX-License-Identifier: Apache-2.0

use crate::{AppState, CRATE_NAME};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Request, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use sha2::{Digest, Sha256};
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tracing::{error, info};
use vitrage_api::{
    product_detail, product_summary, validate_submission, ApiError, ApiErrorCode, FieldError,
    PricePreview, PricePreviewRequest, QuoteAccepted, QuoteSubmission,
};
use vitrage_model::{ProductId, Quote, QuoteId};
use vitrage_pricing::{unit_price, PricingError};

pub(crate) fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    let mut out = String::with_capacity(64);
    for b in digest {
        out.push_str(&format!("{b:02x}"));
    }
    out
}

pub(crate) fn api_error_response(status: StatusCode, err: ApiError) -> Response {
    (status, Json(json!({ "error": err }))).into_response()
}

pub(crate) fn if_none_match(headers: &HeaderMap) -> Option<String> {
    headers
        .get("if-none-match")
        .and_then(|v| v.to_str().ok())
        .map(std::string::ToString::to_string)
}

pub(crate) fn put_cache_headers(headers: &mut HeaderMap, ttl: Duration, etag: &str) {
    if let Ok(value) = HeaderValue::from_str(&format!("public, max-age={}", ttl.as_secs())) {
        headers.insert("cache-control", value);
    }
    if let Ok(value) = HeaderValue::from_str(etag) {
        headers.insert("etag", value);
    }
}

pub(crate) fn make_request_id(state: &AppState) -> String {
    let id = state.request_id_seed.fetch_add(1, Ordering::Relaxed);
    format!("req-{id:016x}")
}

pub(crate) fn propagated_request_id(headers: &HeaderMap, state: &AppState) -> String {
    if let Some(raw) = headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() && trimmed.len() <= 128 {
            return trimmed.to_string();
        }
    }
    make_request_id(state)
}

pub(crate) fn with_request_id(mut response: Response, request_id: &str) -> Response {
    if let Ok(v) = HeaderValue::from_str(request_id) {
        response.headers_mut().insert("x-request-id", v);
    }
    response
}

/// Bounds end-to-end handler time at `ApiConfig::request_timeout`; a stuck
/// request becomes a 504 instead of holding the connection open.
pub(crate) async fn timeout_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let deadline = state.api.request_timeout;
    match tokio::time::timeout(deadline, next.run(request)).await {
        Ok(response) => response,
        Err(_) => api_error_response(
            StatusCode::GATEWAY_TIMEOUT,
            ApiError::new(
                ApiErrorCode::Internal,
                "request timed out",
                json!({ "timeout_ms": deadline.as_millis() as u64 }),
            ),
        ),
    }
}

fn is_draining(state: &AppState) -> bool {
    !state.accepting_requests.load(Ordering::Relaxed)
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as u64)
}

pub(crate) async fn healthz_handler(State(state): State<AppState>) -> impl IntoResponse {
    let request_id = make_request_id(&state);
    let started = Instant::now();
    let resp = (StatusCode::OK, "ok").into_response();
    state
        .metrics
        .observe_request("/healthz", StatusCode::OK, started.elapsed())
        .await;
    with_request_id(resp, &request_id)
}

pub(crate) async fn readyz_handler(State(state): State<AppState>) -> impl IntoResponse {
    let request_id = make_request_id(&state);
    let started = Instant::now();
    let catalog_ready =
        !state.api.readiness_requires_catalog || !state.catalog.products.is_empty();
    let (status, body) = if state.ready.load(Ordering::Relaxed) && catalog_ready {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not-ready")
    };
    let resp = (status, body).into_response();
    state
        .metrics
        .observe_request("/readyz", status, started.elapsed())
        .await;
    with_request_id(resp, &request_id)
}

pub(crate) async fn version_handler(State(state): State<AppState>) -> impl IntoResponse {
    let request_id = make_request_id(&state);
    let started = Instant::now();
    let payload = json!({
        "name": CRATE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "config_schema_version": crate::config::CONFIG_SCHEMA_VERSION,
        "vat_rate_permille": state.api.vat_rate_permille,
    });
    let mut response = Json(payload).into_response();
    if let Ok(value) = HeaderValue::from_str("public, max-age=30") {
        response.headers_mut().insert("cache-control", value);
    }
    state
        .metrics
        .observe_request("/v1/version", StatusCode::OK, started.elapsed())
        .await;
    with_request_id(response, &request_id)
}

pub(crate) async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    let body = state.metrics.render().await;
    let mut resp = (StatusCode::OK, body).into_response();
    resp.headers_mut().insert(
        "content-type",
        HeaderValue::from_static("text/plain; version=0.0.4"),
    );
    resp
}

pub(crate) async fn products_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let items = state
        .catalog
        .products
        .iter()
        .map(product_summary)
        .collect::<Vec<_>>();
    let count = items.len();
    let payload = json!({ "items": items, "count": count });
    let etag = format!(
        "\"{}\"",
        sha256_hex(&serde_json::to_vec(&payload).unwrap_or_default())
    );
    if if_none_match(&headers).as_deref() == Some(etag.as_str()) {
        let mut resp = StatusCode::NOT_MODIFIED.into_response();
        put_cache_headers(resp.headers_mut(), state.api.catalog_ttl, &etag);
        state
            .metrics
            .observe_request("/v1/products", StatusCode::NOT_MODIFIED, started.elapsed())
            .await;
        return with_request_id(resp, &request_id);
    }
    let mut response = Json(payload).into_response();
    put_cache_headers(response.headers_mut(), state.api.catalog_ttl, &etag);
    state
        .metrics
        .observe_request("/v1/products", StatusCode::OK, started.elapsed())
        .await;
    with_request_id(response, &request_id)
}

pub(crate) async fn product_detail_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(product_id): Path<String>,
) -> impl IntoResponse {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let route = "/v1/products/{product_id}";
    let product = ProductId::parse(&product_id)
        .ok()
        .and_then(|id| state.catalog.product(&id));
    let Some(product) = product else {
        let resp = api_error_response(
            StatusCode::NOT_FOUND,
            ApiError::unknown_product(&product_id),
        );
        state
            .metrics
            .observe_request(route, StatusCode::NOT_FOUND, started.elapsed())
            .await;
        return with_request_id(resp, &request_id);
    };
    let payload = product_detail(product);
    let etag = format!(
        "\"{}\"",
        sha256_hex(&serde_json::to_vec(&payload).unwrap_or_default())
    );
    if if_none_match(&headers).as_deref() == Some(etag.as_str()) {
        let mut resp = StatusCode::NOT_MODIFIED.into_response();
        put_cache_headers(resp.headers_mut(), state.api.catalog_ttl, &etag);
        state
            .metrics
            .observe_request(route, StatusCode::NOT_MODIFIED, started.elapsed())
            .await;
        return with_request_id(resp, &request_id);
    }
    let mut response = Json(payload).into_response();
    put_cache_headers(response.headers_mut(), state.api.catalog_ttl, &etag);
    state
        .metrics
        .observe_request(route, StatusCode::OK, started.elapsed())
        .await;
    with_request_id(response, &request_id)
}

fn preview_field_error(err: &PricingError) -> FieldError {
    match err {
        PricingError::InvalidDimension("width_mm") => FieldError::new("widthMm", "out_of_range"),
        PricingError::InvalidDimension(_) => FieldError::new("heightMm", "out_of_range"),
        PricingError::UnknownOption(key) => {
            FieldError::new(format!("options.{key}"), "unknown_option")
        }
        PricingError::UnknownChoice { option, .. } => {
            FieldError::new(format!("options.{option}"), "unknown_choice")
        }
        PricingError::MissingOption(key) => {
            FieldError::new(format!("options.{key}"), "missing_option")
        }
        _ => FieldError::new("productId", "invalid"),
    }
}

pub(crate) async fn price_preview_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(product_id): Path<String>,
    body: Result<Json<PricePreviewRequest>, JsonRejection>,
) -> impl IntoResponse {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let route = "/v1/products/{product_id}/price";
    let request = match body {
        Ok(Json(v)) => v,
        Err(rejection) => {
            let resp = api_error_response(
                StatusCode::BAD_REQUEST,
                ApiError::invalid_json(&rejection.body_text()),
            );
            state
                .metrics
                .observe_request(route, StatusCode::BAD_REQUEST, started.elapsed())
                .await;
            return with_request_id(resp, &request_id);
        }
    };
    let product = ProductId::parse(&product_id)
        .ok()
        .and_then(|id| state.catalog.product(&id));
    let Some(product) = product else {
        let resp = api_error_response(
            StatusCode::NOT_FOUND,
            ApiError::unknown_product(&product_id),
        );
        state
            .metrics
            .observe_request(route, StatusCode::NOT_FOUND, started.elapsed())
            .await;
        return with_request_id(resp, &request_id);
    };
    match unit_price(product, request.width_mm, request.height_mm, &request.options) {
        Ok(net) => {
            let preview = PricePreview::from_net(net, state.api.vat_rate_permille);
            let resp = Json(preview).into_response();
            state
                .metrics
                .observe_request(route, StatusCode::OK, started.elapsed())
                .await;
            with_request_id(resp, &request_id)
        }
        Err(err) => {
            let field_error = preview_field_error(&err);
            let api_error = match err {
                PricingError::UnknownOption(_)
                | PricingError::UnknownChoice { .. }
                | PricingError::MissingOption(_) => ApiError::invalid_option(field_error),
                _ => ApiError::validation_failed(vec![field_error]),
            };
            let resp = api_error_response(StatusCode::BAD_REQUEST, api_error);
            state
                .metrics
                .observe_request(route, StatusCode::BAD_REQUEST, started.elapsed())
                .await;
            with_request_id(resp, &request_id)
        }
    }
}

pub(crate) async fn submit_quote_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<QuoteSubmission>, JsonRejection>,
) -> impl IntoResponse {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let route = "/v1/quotes";
    if is_draining(&state) {
        let resp = api_error_response(StatusCode::SERVICE_UNAVAILABLE, ApiError::not_ready());
        state
            .metrics
            .observe_request(route, StatusCode::SERVICE_UNAVAILABLE, started.elapsed())
            .await;
        return with_request_id(resp, &request_id);
    }
    let submission = match body {
        Ok(Json(v)) => v,
        Err(rejection) => {
            let resp = api_error_response(
                StatusCode::BAD_REQUEST,
                ApiError::invalid_json(&rejection.body_text()),
            );
            state
                .metrics
                .observe_request(route, StatusCode::BAD_REQUEST, started.elapsed())
                .await;
            return with_request_id(resp, &request_id);
        }
    };
    if submission.lines.len() > state.api.max_quote_lines {
        let resp = api_error_response(
            StatusCode::BAD_REQUEST,
            ApiError::validation_failed(vec![FieldError::new("lines", "too_long")]),
        );
        state
            .metrics
            .observe_request(route, StatusCode::BAD_REQUEST, started.elapsed())
            .await;
        return with_request_id(resp, &request_id);
    }
    let data = match validate_submission(&state.catalog, &submission) {
        Ok(data) => data,
        Err(field_errors) => {
            state
                .metrics
                .quotes_rejected_total
                .fetch_add(1, Ordering::Relaxed);
            info!(
                request_id = %request_id,
                errors = field_errors.len(),
                "quote submission rejected"
            );
            let resp = api_error_response(
                StatusCode::BAD_REQUEST,
                ApiError::validation_failed(field_errors),
            );
            state
                .metrics
                .observe_request(route, StatusCode::BAD_REQUEST, started.elapsed())
                .await;
            return with_request_id(resp, &request_id);
        }
    };

    let received_at = unix_millis();
    let quote_id = QuoteId::mint(received_at, u64::from(rand::random::<u32>()));
    let quote = Quote::new(quote_id, received_at, data);
    if let Err(e) = state.quotes.save(&quote).await {
        error!(request_id = %request_id, "quote save failed: {e}");
        let resp = api_error_response(StatusCode::INTERNAL_SERVER_ERROR, ApiError::internal());
        state
            .metrics
            .observe_request(route, StatusCode::INTERNAL_SERVER_ERROR, started.elapsed())
            .await;
        return with_request_id(resp, &request_id);
    }
    state
        .metrics
        .quotes_accepted_total
        .fetch_add(1, Ordering::Relaxed);
    info!(
        request_id = %request_id,
        quote_id = %quote.id.as_str(),
        total_cents = quote.data.total_price.amount(),
        "quote accepted"
    );
    let accepted = QuoteAccepted::from_quote(
        &quote,
        state.api.vat_rate_permille,
        &state.api.estimated_response,
    );
    let resp = (StatusCode::CREATED, Json(accepted)).into_response();
    state
        .metrics
        .observe_request(route, StatusCode::CREATED, started.elapsed())
        .await;
    with_request_id(resp, &request_id)
}
