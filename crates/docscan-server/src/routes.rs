use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::state::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        // Health
        .route("/api/health", get(handlers::health::health_check))
        // Extraction
        .route("/api/extract", post(handlers::extract::extract_json))
        .route("/api/extract/upload", post(handlers::extract::extract_upload))
}
