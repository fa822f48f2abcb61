use axum::{
    Router,
    extract::State,
    response::{IntoResponse, Redirect},
    routing::{get, post},
};
use axum_extra::extract::{CookieJar, cookie::Cookie};
use std::sync::Arc;

use crate::middleware::auth::SESSION_COOKIE;
use crate::services::report::ReportService;
use crate::utils::jwt::JwtService;

pub struct AppState {
    pub reports: ReportService,
    pub jwt_service: Arc<JwtService>,
    pub login_path: String,
    pub trust_forwarded_for: bool,
}

async fn health_check() -> &'static str {
    "OK"
}

async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> impl IntoResponse {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, Redirect::to(&state.login_path))
}

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/logout", post(logout))
        .with_state(state)
}
