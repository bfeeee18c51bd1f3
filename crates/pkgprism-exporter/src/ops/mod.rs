//! Operational HTTP endpoints.
//!
//! - `/metrics` : Prometheus text format

use axum::{extract::State, http::StatusCode, response::{IntoResponse, Response}};

use crate::app_state::AppState;

pub const METRICS_ROUTE: &str = "/metrics";

pub async fn metrics(State(state): State<AppState>) -> Response {
    match state.render_metrics() {
        Ok(body) => (
            StatusCode::OK,
            [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(code = e.code().as_str(), error = %e, "metrics render failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
