//! Session repository for database operations.
//!
//! Sessions are looked up on every authenticated request; queries here
//! stay on the `token_hash` unique index.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::SessionEntity;
use crate::metrics::QueryTimer;

/// Repository for session-related database operations.
#[derive(Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Creates a new SessionRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist a new session. Only the token hash is stored.
    pub async fn create(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<SessionEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_session");
        let result = sqlx::query_as::<_, SessionEntity>(
            r#"
            INSERT INTO sessions (user_id, token_hash, expires_at)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, token_hash, expires_at, created_at, last_used_at, revoked_at
            "#,
        )
        .bind(user_id)
        .bind(token_hash)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a session by token hash, regardless of expiry or revocation.
    ///
    /// The caller decides how to report inactive sessions; keeping the
    /// row visible here lets it log the precise reason.
    pub async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<SessionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_session_by_token_hash");
        let result = sqlx::query_as::<_, SessionEntity>(
            r#"
            SELECT id, user_id, token_hash, expires_at, created_at, last_used_at, revoked_at
            FROM sessions
            WHERE token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update last-used bookkeeping; extends expiry when a sliding TTL
    /// policy supplies a new deadline.
    pub async fn touch(
        &self,
        id: Uuid,
        new_expires_at: Option<DateTime<Utc>>,
    ) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("touch_session");
        sqlx::query(
            r#"
            UPDATE sessions
            SET last_used_at = NOW(), expires_at = COALESCE($2, expires_at)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(new_expires_at)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(())
    }

    /// Revoke the session carrying the given token hash.
    ///
    /// Idempotent: revoking an already-revoked or unknown token is not an
    /// error.
    pub async fn revoke_by_token_hash(&self, token_hash: &str) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("revoke_session");
        let result = sqlx::query(
            r#"
            UPDATE sessions
            SET revoked_at = NOW()
            WHERE token_hash = $1 AND revoked_at IS NULL
            "#,
        )
        .bind(token_hash)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Delete sessions that expired or were revoked before the cutoff.
    pub async fn delete_inactive_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_inactive_sessions");
        let result = sqlx::query(
            r#"
            DELETE FROM sessions
            WHERE expires_at < $1 OR revoked_at < $1
            "#,
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    // SessionRepository tests require a database connection and are
    // covered by the auth integration tests.
}
