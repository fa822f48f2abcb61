use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::api::AppState;
use crate::models::session::{Identity, SessionContext};
use crate::utils::helpers::{bearer_token, client_address};

pub const SESSION_COOKIE: &str = "session";

/// Resolves who is calling and from where, and attaches it as a
/// [`SessionContext`]. Never rejects; handlers decide what "no identity" means.
pub async fn session_guard(
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .or_else(|| bearer_token(request.headers()));

    let identity: Option<Identity> = token.and_then(|token| {
        state
            .jwt_service
            .extract_identity(&token)
            .map_err(|e| tracing::debug!("Ignoring session token: {}", e))
            .ok()
    });

    let address = client_address(request.headers(), peer, state.trust_forwarded_for);

    request
        .extensions_mut()
        .insert(SessionContext { identity, address });

    next.run(request).await
}
