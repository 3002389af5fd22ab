use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::Config;
use crate::dates::DigestDate;
use crate::error::{upstream_message, ErrorBody};

pub struct AppState {
    client: reqwest::Client,
    upstream_url: String,
    upstream_timeout: Duration,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("DailyDigest/1.0 (digest proxy)")
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            upstream_url: config.upstream_url.trim_end_matches('/').to_string(),
            upstream_timeout: config.upstream_timeout(),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/digest", get(daily_digest).options(preflight))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Deserialize)]
pub struct DigestQuery {
    pub date: Option<String>,
}

/// Forwards a digest request to the upstream API, relaying its status and
/// body. Every failure mode comes back as a structured `{error}` JSON body;
/// nothing escapes as an unhandled error.
pub async fn daily_digest(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DigestQuery>,
) -> Response {
    let Some(raw_date) = query.date else {
        return error_response(StatusCode::BAD_REQUEST, "Date parameter is required");
    };

    let date = match DigestDate::parse(&raw_date) {
        Ok(date) => date,
        Err(_) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "Invalid date format. Expected YYYY-MM-DD",
            );
        }
    };

    // The timeout covers the whole exchange, headers and body both.
    match tokio::time::timeout(state.upstream_timeout, forward(&state, &date)).await {
        Ok(response) => response,
        Err(_) => {
            warn!("Upstream digest request for {} timed out", date);
            error_response(
                StatusCode::GATEWAY_TIMEOUT,
                "Upstream digest request timed out",
            )
        }
    }
}

async fn forward(state: &AppState, date: &DigestDate) -> Response {
    let url = format!("{}/daily_digest", state.upstream_url);
    let result = state
        .client
        .get(&url)
        .query(&[("date", date.as_str())])
        .send()
        .await;

    let response = match result {
        Ok(response) => response,
        Err(e) if e.is_connect() => {
            warn!("Digest upstream unreachable: {}", e);
            return error_response(
                StatusCode::SERVICE_UNAVAILABLE,
                "Digest service is unreachable",
            );
        }
        Err(e) => {
            warn!("Digest upstream request failed: {}", e);
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Unexpected error while contacting the digest service",
            );
        }
    };

    let status =
        StatusCode::from_u16(response.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);

    if !status.is_success() {
        let message = match response.text().await {
            Ok(body) => upstream_message(status.as_u16(), &body),
            Err(_) => format!("Digest service returned status {}", status.as_u16()),
        };
        return error_response(status, message);
    }

    let bytes = match response.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Digest upstream body could not be read: {}", e);
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Digest service returned an unreadable response",
            );
        }
    };

    // The body is relayed byte-for-byte; decoding it into a JSON value
    // would reorder the category keys.
    if let Err(e) = serde_json::from_slice::<serde_json::Value>(&bytes) {
        warn!("Digest upstream returned an unreadable body: {}", e);
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Digest service returned an unreadable response",
        );
    }

    (status, [(header::CONTENT_TYPE, "application/json")], bytes).into_response()
}

/// CORS preflight. The permissive CORS layer attaches the actual headers.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn health() -> &'static str {
    "OK"
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorBody::new(message))).into_response()
}
