use axum::extract::State;

use crate::AppState;

/// Liveness probe
pub async fn root() -> &'static str {
    "OK"
}

/// Server status plus whether the completion service answers its own probe
pub async fn health_check(State(state): State<AppState>) -> String {
    let llm = if state.router.completion_healthy().await {
        "ok"
    } else {
        "unreachable"
    };
    format!("server=ok llm={}", llm)
}
