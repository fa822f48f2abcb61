use serde::Serialize;

use crate::models::login_attempt::LoginAttempt;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActivitySummary {
    pub total_count: usize,
    pub success_count: usize,
    pub failure_count: usize,
    pub most_recent_success: Option<LoginAttempt>,
    pub most_recent_failure: Option<LoginAttempt>,
}
