pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

/// Headroom for multipart framing and the `booleanStrings` field on top of the PDF itself.
const MULTIPART_OVERHEAD_BYTES: usize = 256 * 1024;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_pdf_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/analyze_jd", post(handlers::handle_analyze_jd))
        .route(
            "/api/analyze-relevancy",
            post(handlers::handle_analyze_relevancy).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .with_state(state)
}
