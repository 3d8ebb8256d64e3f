//! Application router.
//!
//! JSON API under `/api`; the static single-screen front-end is served from
//! `static/` at the root.

use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::core_state::CoreState;

/// Build the full application router.
///
/// NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
pub fn app_router(core: Arc<CoreState>) -> Router {
    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/sessions", post(endpoints::session::create))
        .route("/sessions/:id", delete(endpoints::session::delete))
        .route(
            "/sessions/:id/messages",
            get(endpoints::session::messages).post(endpoints::chat::send),
        )
        .route("/sessions/:id/report", post(endpoints::report::compile))
        .route("/sessions/:id/report.pdf", get(endpoints::report::download))
        .with_state(core)
        .layer(CorsLayer::permissive());

    Router::new()
        .nest("/api", api)
        .fallback_service(ServeDir::new("static"))
        .layer(TraceLayer::new_for_http())
}
