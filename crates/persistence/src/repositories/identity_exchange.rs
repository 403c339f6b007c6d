//! Identity exchange repository.
//!
//! Tracks consumed external session identifiers so each one can mint at
//! most one session.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::metrics::QueryTimer;

/// Repository for one-time external session identifiers.
#[derive(Clone)]
pub struct IdentityExchangeRepository {
    pool: PgPool,
}

impl IdentityExchangeRepository {
    /// Creates a new IdentityExchangeRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Atomically consume an external session identifier.
    ///
    /// Returns `true` if this call won the identifier, `false` if it was
    /// already consumed. Concurrent calls with the same identifier race
    /// on the primary key; exactly one insert succeeds.
    pub async fn consume(&self, external_session_id: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("consume_identity_exchange");
        let result = sqlx::query(
            r#"
            INSERT INTO identity_exchanges (external_session_id)
            VALUES ($1)
            ON CONFLICT (external_session_id) DO NOTHING
            "#,
        )
        .bind(external_session_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected() == 1)
    }

    /// Delete consumed identifiers older than the cutoff.
    ///
    /// The upstream provider expires its identifiers long before this
    /// cutoff, so pruning does not reopen a replay window.
    pub async fn delete_consumed_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_consumed_exchanges");
        let result = sqlx::query(
            r#"
            DELETE FROM identity_exchanges
            WHERE consumed_at < $1
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
    // Consume-once semantics are exercised end to end by the replay test
    // in the auth integration suite.
}
