//! Read-only access to login attempts and user profiles.
//!
//! The report service only sees these traits, so it can be exercised without a
//! database and so an unauthenticated request provably never reaches storage.

pub mod sqlite;

use async_trait::async_trait;

use crate::models::login_attempt::LoginAttemptRow;
use crate::models::user::UserProfile;
use crate::utils::error::AppResult;

pub use sqlite::{SqliteAttemptStore, SqliteProfileStore};

/// Which attempts count as "this user's" when building the recent window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPolicy {
    /// Attempts recorded against the user id only.
    UserOnly,
    /// Attempts recorded against the user id, plus any attempt from the
    /// caller's current address. Can include other accounts' attempts when the
    /// address is shared.
    UserOrAddress,
}

impl MatchPolicy {
    pub fn from_match_by_address(match_by_address: bool) -> Self {
        if match_by_address {
            MatchPolicy::UserOrAddress
        } else {
            MatchPolicy::UserOnly
        }
    }
}

#[async_trait]
pub trait AttemptStore: Send + Sync + 'static {
    /// Attempts for the user (and the address, per `policy`): the `limit`
    /// newest well-formed rows by parsed time, then every malformed row so the
    /// caller can report it.
    async fn fetch_recent_attempts(
        &self,
        user_id: i64,
        address: &str,
        limit: usize,
        policy: MatchPolicy,
    ) -> AppResult<Vec<LoginAttemptRow>>;

    /// The newest well-formed attempt for the user with the given outcome.
    async fn fetch_most_recent(&self, user_id: i64, success: bool)
    -> AppResult<Option<LoginAttemptRow>>;
}

#[async_trait]
pub trait ProfileStore: Send + Sync + 'static {
    async fn fetch_profile(&self, user_id: i64) -> AppResult<Option<UserProfile>>;
}
