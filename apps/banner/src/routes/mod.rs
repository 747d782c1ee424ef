pub mod health;

use axum::{routing::get, Router};

use crate::banner::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/banner", get(handlers::handle_banner))
        .with_state(state)
}
