pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::limit::RequestBodyLimitLayer;

use crate::render::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let max_body_bytes = state.config.max_body_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Render API
        .route("/api/v1/render", post(handlers::handle_render_pdf))
        .route("/api/v1/render/layout", post(handlers::handle_render_layout))
        .route(
            "/api/v1/render/analysis",
            post(handlers::handle_render_analysis),
        )
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .with_state(state)
}
