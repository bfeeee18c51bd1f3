//! Axum router wiring.
//!
//! Exposes a single `GET /metrics` route.

use axum::{routing::get, Router};

use crate::{app_state::AppState, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(ops::METRICS_ROUTE, get(ops::metrics))
        .with_state(state)
}
