use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::cmp::Reverse;
use thiserror::Error;

const NAIVE_TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// A `login_attempts` row exactly as stored. The authentication subsystem
/// writes these, so nothing here is trusted until it passes `LoginAttempt::try_from`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LoginAttemptRow {
    pub id: i64,
    pub user_id: Option<i64>,
    pub ip: String,
    pub attempt_time: Option<String>,
    pub success: Option<i64>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginAttempt {
    pub id: i64,
    pub user_id: Option<i64>,
    pub ip_address: String,
    pub attempted_at: DateTime<Utc>,
    pub success: bool,
    pub user_agent: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("Invalid login attempt {id}: {reason}")]
pub struct InvalidAttempt {
    pub id: i64,
    pub reason: String,
}

impl InvalidAttempt {
    fn new(id: i64, reason: impl Into<String>) -> Self {
        Self {
            id,
            reason: reason.into(),
        }
    }
}

pub fn parse_attempt_time(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}

impl LoginAttemptRow {
    /// When the attempt happened, or `None` if the row would not convert to a
    /// [`LoginAttempt`].
    pub fn valid_time(&self) -> Option<DateTime<Utc>> {
        if !matches!(self.success, Some(0 | 1)) {
            return None;
        }
        parse_attempt_time(self.attempt_time.as_deref()?.trim())
    }
}

/// Splits rows into well-formed ones, newest first by parsed time (ties: higher
/// id first), and malformed ones in their original order.
///
/// Stored timestamps come in several formats, so their text order says nothing
/// about which attempt is newer.
pub fn rank_newest_first(rows: Vec<LoginAttemptRow>) -> (Vec<LoginAttemptRow>, Vec<LoginAttemptRow>) {
    let mut ranked = Vec::with_capacity(rows.len());
    let mut malformed = Vec::new();

    for row in rows {
        match row.valid_time() {
            Some(at) => ranked.push((at, row)),
            None => malformed.push(row),
        }
    }

    ranked.sort_by_key(|(at, row)| (Reverse(*at), Reverse(row.id)));
    (ranked.into_iter().map(|(_, row)| row).collect(), malformed)
}

impl TryFrom<LoginAttemptRow> for LoginAttempt {
    type Error = InvalidAttempt;

    fn try_from(row: LoginAttemptRow) -> Result<Self, Self::Error> {
        let raw_time = row
            .attempt_time
            .as_deref()
            .ok_or_else(|| InvalidAttempt::new(row.id, "missing timestamp"))?;

        let attempted_at = parse_attempt_time(raw_time.trim()).ok_or_else(|| {
            InvalidAttempt::new(row.id, format!("unparseable timestamp '{}'", raw_time))
        })?;

        let success = match row.success {
            Some(1) => true,
            Some(0) => false,
            Some(other) => {
                return Err(InvalidAttempt::new(
                    row.id,
                    format!("success flag out of range: {}", other),
                ));
            }
            None => return Err(InvalidAttempt::new(row.id, "missing success flag")),
        };

        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            ip_address: row.ip,
            attempted_at,
            success,
            user_agent: row.user_agent,
        })
    }
}
