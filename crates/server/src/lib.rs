pub mod error;
pub mod middleware;
pub mod routes;


use std::sync::Arc;

use phonebot::TaskRouter;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<TaskRouter>,
}

impl AppState {
    pub fn new(router: TaskRouter) -> Self {
        Self {
            router: Arc::new(router),
        }
    }
}
