use std::cmp::Reverse;

use crate::models::activity::ActivitySummary;
use crate::models::login_attempt::{InvalidAttempt, LoginAttempt, LoginAttemptRow};

pub const DEFAULT_ATTEMPT_WINDOW: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregation {
    /// Valid attempts, newest first, at most `window` of them.
    pub attempts: Vec<LoginAttempt>,
    pub summary: ActivitySummary,
    pub rejected: Vec<InvalidAttempt>,
}

/// Splits raw rows into valid attempts and per-record errors, keeping store order.
pub fn validate_rows(rows: Vec<LoginAttemptRow>) -> (Vec<LoginAttempt>, Vec<InvalidAttempt>) {
    let mut valid = Vec::with_capacity(rows.len());
    let mut rejected = Vec::new();

    for row in rows {
        match LoginAttempt::try_from(row) {
            Ok(attempt) => valid.push(attempt),
            Err(e) => {
                tracing::warn!(attempt_id = e.id, reason = %e.reason, "Skipping malformed login attempt");
                rejected.push(e);
            }
        }
    }

    (valid, rejected)
}

pub fn order_newest_first(attempts: &mut [LoginAttempt]) {
    attempts.sort_by_key(|a| (Reverse(a.attempted_at), Reverse(a.id)));
}

/// Picks the latest attempt with the given outcome. Equal timestamps resolve to
/// the earlier position in `attempts`, matching a newest-first scan.
fn most_recent(attempts: &[LoginAttempt], success: bool) -> Option<&LoginAttempt> {
    attempts
        .iter()
        .filter(|a| a.success == success)
        .fold(None, |best: Option<&LoginAttempt>, candidate| match best {
            Some(current) if current.attempted_at >= candidate.attempted_at => Some(current),
            _ => Some(candidate),
        })
}

pub fn summarize(attempts: &[LoginAttempt]) -> ActivitySummary {
    let total_count = attempts.len();
    let success_count = attempts.iter().filter(|a| a.success).count();

    ActivitySummary {
        total_count,
        success_count,
        failure_count: total_count - success_count,
        most_recent_success: most_recent(attempts, true).cloned(),
        most_recent_failure: most_recent(attempts, false).cloned(),
    }
}

pub fn aggregate(rows: Vec<LoginAttemptRow>, window: usize) -> Aggregation {
    let (mut attempts, rejected) = validate_rows(rows);
    order_newest_first(&mut attempts);
    attempts.truncate(window);

    let summary = summarize(&attempts);

    Aggregation {
        attempts,
        summary,
        rejected,
    }
}
