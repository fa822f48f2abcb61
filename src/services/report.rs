use serde::Serialize;
use std::sync::Arc;

use crate::models::activity::ActivitySummary;
use crate::models::login_attempt::{InvalidAttempt, LoginAttempt, LoginAttemptRow};
use crate::models::session::Identity;
use crate::models::user::UserProfile;
use crate::services::activity::aggregate;
use crate::stores::{AttemptStore, MatchPolicy, ProfileStore};
use crate::utils::error::AppResult;

#[derive(Debug, Clone, Serialize)]
pub struct SecurityReport {
    pub profile: UserProfile,
    pub attempts: Vec<LoginAttempt>,
    pub summary: ActivitySummary,
    /// Account-scoped, unlike `summary`, which only covers the recent window.
    pub last_success: Option<LoginAttempt>,
    pub last_failure: Option<LoginAttempt>,
    pub rejected: Vec<InvalidAttempt>,
    pub current_address: String,
}

#[derive(Debug)]
pub enum ReportOutcome {
    Unauthorized,
    Ready(Box<SecurityReport>),
}

pub struct ReportService {
    attempts: Arc<dyn AttemptStore>,
    profiles: Arc<dyn ProfileStore>,
    window: usize,
    policy: MatchPolicy,
}

impl ReportService {
    pub fn new(
        attempts: Arc<dyn AttemptStore>,
        profiles: Arc<dyn ProfileStore>,
        window: usize,
        policy: MatchPolicy,
    ) -> Self {
        Self {
            attempts,
            profiles,
            window,
            policy,
        }
    }

    pub async fn build(&self, identity: Option<&Identity>, address: &str) -> AppResult<ReportOutcome> {
        let Some(identity) = identity else {
            return Ok(ReportOutcome::Unauthorized);
        };
        let user_id = identity.user_id;

        let (recent, last_success, last_failure, profile) = tokio::try_join!(
            self.attempts
                .fetch_recent_attempts(user_id, address, self.window, self.policy),
            self.attempts.fetch_most_recent(user_id, true),
            self.attempts.fetch_most_recent(user_id, false),
            self.profiles.fetch_profile(user_id),
        )?;

        let Some(profile) = profile else {
            tracing::warn!(user_id, "Session refers to a user without a profile");
            return Ok(ReportOutcome::Unauthorized);
        };

        let aggregation = aggregate(recent, self.window);
        let mut rejected = aggregation.rejected;
        let last_success = validate_single(last_success, &mut rejected);
        let last_failure = validate_single(last_failure, &mut rejected);

        tracing::debug!(
            user_id,
            total = aggregation.summary.total_count,
            rejected = rejected.len(),
            "Built security report"
        );

        Ok(ReportOutcome::Ready(Box::new(SecurityReport {
            profile,
            attempts: aggregation.attempts,
            summary: aggregation.summary,
            last_success,
            last_failure,
            rejected,
            current_address: address.to_string(),
        })))
    }
}

fn validate_single(
    row: Option<LoginAttemptRow>,
    rejected: &mut Vec<InvalidAttempt>,
) -> Option<LoginAttempt> {
    match LoginAttempt::try_from(row?) {
        Ok(attempt) => Some(attempt),
        Err(e) => {
            tracing::warn!(attempt_id = e.id, reason = %e.reason, "Skipping malformed login attempt");
            if !rejected.contains(&e) {
                rejected.push(e);
            }
            None
        }
    }
}
