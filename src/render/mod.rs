//! HTML rendering of a [`SecurityReport`].
//!
//! Every string that reaches the template is an [`Escaped`] value built by
//! [`escape_html`]. `Escaped` is marked HTML-safe, so askama's auto-escaping
//! passes it through once and still escapes anything else.

use askama::Template;
use chrono::{DateTime, Utc};

use crate::models::login_attempt::LoginAttempt;
use crate::services::report::SecurityReport;
use crate::utils::error::AppResult;
use crate::utils::escape::{Escaped, escape_html, escape_or};

const NOT_AVAILABLE: &str = "N/A";
const DISPLAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct AttemptRowView {
    pub id: i64,
    pub address: Escaped,
    pub attempted_at: Escaped,
    pub success: bool,
    pub user_agent: Escaped,
}

pub struct AttemptHighlightView {
    pub attempted_at: Escaped,
    pub address: Escaped,
}

#[derive(Template)]
#[template(path = "security_report.html")]
pub struct ReportView {
    pub email: Escaped,
    pub last_login: Escaped,
    pub last_known_address: Escaped,
    pub current_address: Escaped,
    pub success_count: usize,
    pub failure_count: usize,
    pub total_count: usize,
    pub last_success: Option<AttemptHighlightView>,
    pub last_failure: Option<AttemptHighlightView>,
    pub rows: Vec<AttemptRowView>,
    pub rejected_count: usize,
}

fn display_time(at: &DateTime<Utc>) -> Escaped {
    escape_html(&at.format(DISPLAY_TIME_FORMAT).to_string())
}

impl From<&LoginAttempt> for AttemptRowView {
    fn from(attempt: &LoginAttempt) -> Self {
        Self {
            id: attempt.id,
            address: escape_html(&attempt.ip_address),
            attempted_at: display_time(&attempt.attempted_at),
            success: attempt.success,
            user_agent: escape_or(attempt.user_agent.as_deref(), NOT_AVAILABLE),
        }
    }
}

impl From<&LoginAttempt> for AttemptHighlightView {
    fn from(attempt: &LoginAttempt) -> Self {
        Self {
            attempted_at: display_time(&attempt.attempted_at),
            address: escape_html(&attempt.ip_address),
        }
    }
}

impl ReportView {
    pub fn from_report(report: &SecurityReport) -> Self {
        let profile = &report.profile;

        Self {
            email: escape_html(&profile.email),
            last_login: escape_or(profile.last_login.as_deref(), NOT_AVAILABLE),
            last_known_address: escape_or(profile.last_ip.as_deref(), NOT_AVAILABLE),
            current_address: escape_or(
                Some(report.current_address.as_str()).filter(|a| !a.is_empty()),
                NOT_AVAILABLE,
            ),
            success_count: report.summary.success_count,
            failure_count: report.summary.failure_count,
            total_count: report.summary.total_count,
            last_success: report.last_success.as_ref().map(AttemptHighlightView::from),
            last_failure: report.last_failure.as_ref().map(AttemptHighlightView::from),
            rows: report.attempts.iter().map(AttemptRowView::from).collect(),
            rejected_count: report.rejected.len(),
        }
    }
}

pub fn render_report(report: &SecurityReport) -> AppResult<String> {
    Ok(ReportView::from_report(report).render()?)
}
