use axum::{
    Extension, Json, Router,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use std::sync::Arc;

use crate::api::AppState;
use crate::models::session::SessionContext;
use crate::render::render_report;
use crate::services::report::{ReportOutcome, SecurityReport};
use crate::utils::error::{AppError, AppResult};

async fn security_page(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
) -> AppResult<Response> {
    let outcome = state
        .reports
        .build(session.identity.as_ref(), &session.address)
        .await?;

    match outcome {
        ReportOutcome::Unauthorized => Ok(Redirect::to(&state.login_path).into_response()),
        ReportOutcome::Ready(report) => Ok(Html(render_report(&report)?).into_response()),
    }
}

async fn activity_json(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
) -> AppResult<Json<SecurityReport>> {
    let outcome = state
        .reports
        .build(session.identity.as_ref(), &session.address)
        .await?;

    match outcome {
        ReportOutcome::Unauthorized => Err(AppError::Auth("Not signed in".to_string())),
        ReportOutcome::Ready(report) => Ok(Json(*report)),
    }
}

async fn index() -> Redirect {
    Redirect::to("/security")
}

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/security", get(security_page))
        .route("/api/activity", get(activity_json))
        .with_state(state)
}
