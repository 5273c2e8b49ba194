use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/index.html", get(handlers::index))
        .route("/script.js", get(handlers::script))
        .route("/health", get(handlers::health))
        .route("/avatar", get(handlers::avatar))
        .route("/api/counters", get(handlers::counters))
        .fallback(handlers::static_file)
        .with_state(state)
}
