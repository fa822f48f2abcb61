pub mod auth;
pub mod security;

use axum::Router;
use std::sync::Arc;

pub use auth::AppState;

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(auth::routes(state.clone()))
        .merge(security::routes(state.clone()))
        .layer(axum::middleware::from_fn_with_state(
            state,
            crate::middleware::auth::session_guard,
        ))
}
