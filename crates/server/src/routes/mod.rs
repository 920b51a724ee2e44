use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::{AppState, middleware as app_middleware};

pub mod health;
pub mod task;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/task", post(task::create_task))
        .route("/command", post(task::raw_command))
        .with_state(state)
        .layer(middleware::from_fn(app_middleware::request_id_middleware))
        .layer(app_middleware::trace_layer())
}
