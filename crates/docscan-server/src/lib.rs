use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod errors;
pub mod handlers;
pub mod routes;
pub mod state;

pub use state::AppState;

/// Router with state and the standard layers applied.
pub fn app(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;
    routes::create_router()
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
