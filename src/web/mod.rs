//! Web front-end: one form, one result page, and a PDF download.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

pub mod handlers;
pub mod pages;
pub mod state;

pub use state::AppState;

/// Build the application [`Router`]; shared by the binary and the integration tests.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index).post(handlers::predict))
        .route("/download_pdf", get(handlers::download_pdf))
        .route("/health", get(handlers::health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
