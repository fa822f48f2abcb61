use axum::Router;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::api::AppState;
use crate::config::Config;
use crate::database::{self, DbPool};
use crate::services::report::ReportService;
use crate::stores::{MatchPolicy, SqliteAttemptStore, SqliteProfileStore};
use crate::utils::jwt::JwtService;

pub fn build_state(config: &Config, db: DbPool) -> Arc<AppState> {
    let policy = MatchPolicy::from_match_by_address(config.match_by_address);
    if policy == MatchPolicy::UserOrAddress {
        tracing::info!("Recent attempts include other accounts seen from the caller's address");
    }

    let reports = ReportService::new(
        Arc::new(SqliteAttemptStore::new(db.clone())),
        Arc::new(SqliteProfileStore::new(db)),
        config.attempt_window,
        policy,
    );

    Arc::new(AppState {
        reports,
        jwt_service: Arc::new(JwtService::new(&config.secret_key)),
        login_path: config.login_path.clone(),
        trust_forwarded_for: config.trust_forwarded_for,
    })
}

pub fn build_router(state: Arc<AppState>) -> Router {
    crate::api::routes(state).layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

pub async fn register_routes(config: &Config) -> anyhow::Result<Router> {
    let db = database::create_pool(&config.database_url).await?;
    tracing::info!("Database connected and migrations applied");

    let state = build_state(config, db);
    tracing::info!(
        window = config.attempt_window,
        "Security dashboard routes registered"
    );

    Ok(build_router(state))
}
