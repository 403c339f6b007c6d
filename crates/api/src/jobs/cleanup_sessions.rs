//! Session and identity-exchange cleanup background job.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use tracing::info;

use persistence::repositories::{IdentityExchangeRepository, SessionRepository};

use super::scheduler::{Job, JobFrequency};

/// Background job that prunes dead sessions and consumed exchange
/// identifiers.
///
/// Expired and revoked sessions already fail validation; deleting them
/// only bounds table growth. Consumed identifiers are kept past the
/// upstream identifier lifetime so pruning never reopens a replay
/// window.
pub struct CleanupSessionsJob {
    sessions: SessionRepository,
    exchanges: IdentityExchangeRepository,
    retention_secs: i64,
}

impl CleanupSessionsJob {
    /// Create a new cleanup job.
    pub fn new(pool: PgPool, retention_secs: i64) -> Self {
        Self {
            sessions: SessionRepository::new(pool.clone()),
            exchanges: IdentityExchangeRepository::new(pool),
            retention_secs,
        }
    }
}

#[async_trait::async_trait]
impl Job for CleanupSessionsJob {
    fn name(&self) -> &'static str {
        "cleanup_sessions"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Hourly
    }

    async fn execute(&self) -> Result<(), String> {
        let cutoff = Utc::now() - Duration::seconds(self.retention_secs);

        let sessions_deleted = self
            .sessions
            .delete_inactive_before(cutoff)
            .await
            .map_err(|e| format!("Failed to delete inactive sessions: {}", e))?;

        let exchanges_deleted = self
            .exchanges
            .delete_consumed_before(cutoff)
            .await
            .map_err(|e| format!("Failed to delete consumed exchanges: {}", e))?;

        info!(
            sessions_deleted,
            exchanges_deleted,
            retention_secs = self.retention_secs,
            "Session cleanup completed"
        );

        Ok(())
    }
}
