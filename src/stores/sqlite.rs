use async_trait::async_trait;

use crate::database::DbPool;
use crate::models::login_attempt::{LoginAttemptRow, rank_newest_first};
use crate::models::user::UserProfile;
use crate::stores::{AttemptStore, MatchPolicy, ProfileStore};
use crate::utils::error::{AppError, AppResult};

fn retrieval_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        tracing::error!(error = %e, "{}", context);
        AppError::Retrieval(context.to_string())
    }
}

pub struct SqliteAttemptStore {
    pool: DbPool,
}

impl SqliteAttemptStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttemptStore for SqliteAttemptStore {
    async fn fetch_recent_attempts(
        &self,
        user_id: i64,
        address: &str,
        limit: usize,
        policy: MatchPolicy,
    ) -> AppResult<Vec<LoginAttemptRow>> {
        // attempt_time is free-form text, so ranking and the limit happen after parsing
        let query = match policy {
            MatchPolicy::UserOrAddress => sqlx::query_as::<_, LoginAttemptRow>(
                r#"
                SELECT id, user_id, ip, attempt_time, success, user_agent
                FROM login_attempts
                WHERE user_id = ? OR ip = ?
                "#,
            )
            .bind(user_id)
            .bind(address),
            MatchPolicy::UserOnly => sqlx::query_as::<_, LoginAttemptRow>(
                r#"
                SELECT id, user_id, ip, attempt_time, success, user_agent
                FROM login_attempts
                WHERE user_id = ?
                "#,
            )
            .bind(user_id),
        };

        let rows = query
            .fetch_all(self.pool.as_ref())
            .await
            .map_err(retrieval_error("Failed to fetch recent login attempts"))?;

        let (mut recent, malformed) = rank_newest_first(rows);
        recent.truncate(limit);
        recent.extend(malformed);
        Ok(recent)
    }

    async fn fetch_most_recent(
        &self,
        user_id: i64,
        success: bool,
    ) -> AppResult<Option<LoginAttemptRow>> {
        let rows = sqlx::query_as::<_, LoginAttemptRow>(
            r#"
            SELECT id, user_id, ip, attempt_time, success, user_agent
            FROM login_attempts
            WHERE user_id = ? AND success = ?
            "#,
        )
        .bind(user_id)
        .bind(if success { 1_i64 } else { 0_i64 })
        .fetch_all(self.pool.as_ref())
        .await
        .map_err(retrieval_error("Failed to fetch most recent login attempt"))?;

        let (ranked, _) = rank_newest_first(rows);
        Ok(ranked.into_iter().next())
    }
}

pub struct SqliteProfileStore {
    pool: DbPool,
}

impl SqliteProfileStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for SqliteProfileStore {
    async fn fetch_profile(&self, user_id: i64) -> AppResult<Option<UserProfile>> {
        sqlx::query_as::<_, UserProfile>(
            "SELECT id, email, last_login, last_ip FROM users WHERE id = ?",
        )
        .bind(user_id)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(retrieval_error("Failed to fetch user profile"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::create_memory_pool;

    async fn seeded_pool() -> DbPool {
        let pool = create_memory_pool().await.unwrap();

        sqlx::query("INSERT INTO users (id, email, last_login, last_ip) VALUES (42, 'ana@example.com', '2024-01-01 10:00:00', '203.0.113.5'), (7, 'bo@example.com', NULL, NULL)")
            .execute(pool.as_ref())
            .await
            .unwrap();

        sqlx::query(
            "INSERT INTO login_attempts (id, user_id, ip, attempt_time, success, user_agent) VALUES
             (1, 42, '198.51.100.1', '2024-01-01 10:00:00', 1, 'Firefox'),
             (2, 42, '198.51.100.1', '2024-01-01 09:00:00', 0, 'Firefox'),
             (3, 7, '203.0.113.5', '2024-01-01 11:00:00', 0, 'curl'),
             (4, NULL, '203.0.113.5', '2024-01-01 08:00:00', 0, NULL),
             (5, 42, '198.51.100.1', '2024-01-01 07:00:00', 1, 'Firefox')",
        )
        .execute(pool.as_ref())
        .await
        .unwrap();

        pool
    }

    #[tokio::test]
    async fn test_recent_attempts_by_user_or_address() {
        let store = SqliteAttemptStore::new(seeded_pool().await);
        let rows = store
            .fetch_recent_attempts(42, "203.0.113.5", 10, MatchPolicy::UserOrAddress)
            .await
            .unwrap();
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 1, 2, 4, 5]);
    }

    #[tokio::test]
    async fn test_recent_attempts_user_only() {
        let store = SqliteAttemptStore::new(seeded_pool().await);
        let rows = store
            .fetch_recent_attempts(42, "203.0.113.5", 10, MatchPolicy::UserOnly)
            .await
            .unwrap();
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 5]);
    }

    #[tokio::test]
    async fn test_recent_attempts_respects_limit() {
        let store = SqliteAttemptStore::new(seeded_pool().await);
        let rows = store
            .fetch_recent_attempts(42, "203.0.113.5", 2, MatchPolicy::UserOrAddress)
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn test_most_recent_by_outcome() {
        let store = SqliteAttemptStore::new(seeded_pool().await);
        let success = store.fetch_most_recent(42, true).await.unwrap().unwrap();
        let failure = store.fetch_most_recent(42, false).await.unwrap().unwrap();
        assert_eq!(success.id, 1);
        assert_eq!(failure.id, 2);
        assert!(store.fetch_most_recent(99, true).await.unwrap().is_none());
    }

    async fn insert_attempt(pool: &DbPool, id: i64, attempt_time: Option<&str>, success: i64) {
        sqlx::query("INSERT INTO login_attempts (id, user_id, ip, attempt_time, success, user_agent) VALUES (?, 42, '198.51.100.1', ?, ?, 'Firefox')")
            .bind(id)
            .bind(attempt_time)
            .bind(success)
            .execute(pool.as_ref())
            .await
            .unwrap();
    }

    async fn mixed_format_pool() -> DbPool {
        let pool = create_memory_pool().await.unwrap();
        sqlx::query("INSERT INTO users (id, email) VALUES (42, 'ana@example.com')")
            .execute(pool.as_ref())
            .await
            .unwrap();
        for i in 1..=10 {
            let attempt_time = format!("2024-03-01T{:02}:00", i - 1);
            insert_attempt(&pool, i, Some(attempt_time.as_str()), 0).await;
        }
        insert_attempt(&pool, 100, Some("2024-03-01 23:00:00"), 1).await;
        insert_attempt(&pool, 101, Some("2024-03-01T22:00"), 1).await;
        // 2024-02-29 20:30 UTC
        insert_attempt(&pool, 150, Some("2024-03-01T05:30:00+09:00"), 0).await;
        insert_attempt(&pool, 200, Some("yesterday"), 0).await;
        insert_attempt(&pool, 201, None, 1).await;
        pool
    }

    #[tokio::test]
    async fn test_recent_attempts_ranked_by_parsed_time() {
        let store = SqliteAttemptStore::new(mixed_format_pool().await);
        let rows = store
            .fetch_recent_attempts(42, "203.0.113.5", 10, MatchPolicy::UserOnly)
            .await
            .unwrap();
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();

        assert_eq!(ids[..10].to_vec(), vec![100, 101, 10, 9, 8, 7, 6, 5, 4, 3]);
        let mut malformed = ids[10..].to_vec();
        malformed.sort();
        assert_eq!(malformed, vec![200, 201]);
    }

    #[tokio::test]
    async fn test_most_recent_ranked_by_parsed_time() {
        let store = SqliteAttemptStore::new(mixed_format_pool().await);
        let success = store.fetch_most_recent(42, true).await.unwrap().unwrap();
        let failure = store.fetch_most_recent(42, false).await.unwrap().unwrap();
        assert_eq!(success.id, 100);
        assert_eq!(failure.id, 10);
    }

    #[tokio::test]
    async fn test_fetch_profile() {
        let store = SqliteProfileStore::new(seeded_pool().await);
        let profile = store.fetch_profile(42).await.unwrap().unwrap();
        assert_eq!(profile.email, "ana@example.com");
        assert_eq!(profile.last_ip.as_deref(), Some("203.0.113.5"));

        let bare = store.fetch_profile(7).await.unwrap().unwrap();
        assert!(bare.last_login.is_none());
        assert!(store.fetch_profile(1000).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_closed_pool_is_retrieval_error() {
        let pool = seeded_pool().await;
        pool.close().await;
        let store = SqliteProfileStore::new(pool);
        assert!(matches!(
            store.fetch_profile(42).await,
            Err(AppError::Retrieval(_))
        ));
    }
}
