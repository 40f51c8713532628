use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{health, scan_share, AppState};

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/scan_share", post(scan_share))
        .route("/health", get(health))
        .with_state(state)
}
