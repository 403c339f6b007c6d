//! Session store service: issuing, validating and revoking sessions.

use chrono::{Duration, Utc};
use domain::models::{Session, UserIdentity};
use sqlx::PgPool;
use thiserror::Error;

use persistence::repositories::{SessionRepository, UserRepository};
use shared::crypto::{generate_session_token, sha256_hex};
use uuid::Uuid;

use crate::config::SessionConfig;

/// Errors that can occur during session operations.
///
/// Unknown, expired and revoked tokens all surface as `Unauthenticated`;
/// the distinction exists only in debug logs.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Unauthenticated")]
    Unauthenticated,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A freshly issued session. The raw token exists only here and in the
/// cookie built from it.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub user_id: Uuid,
}

/// Session store backed by the sessions table.
#[derive(Clone)]
pub struct SessionService {
    sessions: SessionRepository,
    users: UserRepository,
    ttl: Duration,
    sliding: bool,
}

impl SessionService {
    /// Creates a new SessionService with the given pool and policy.
    pub fn new(pool: PgPool, config: &SessionConfig) -> Self {
        Self {
            sessions: SessionRepository::new(pool.clone()),
            users: UserRepository::new(pool),
            ttl: Duration::seconds(config.ttl_secs),
            sliding: config.sliding,
        }
    }

    /// Issue a new session for a user.
    pub async fn create(&self, user_id: Uuid) -> Result<IssuedSession, sqlx::Error> {
        let token = generate_session_token();
        let token_hash = sha256_hex(&token);
        let expires_at = Utc::now() + self.ttl;

        let session = self.sessions.create(user_id, &token_hash, expires_at).await?;

        tracing::info!(user_id = %user_id, session_id = %session.id, "Session created");

        Ok(IssuedSession { token, user_id })
    }

    /// Validate a session token and resolve the owning user.
    ///
    /// Safe to call on every request: one indexed lookup plus the
    /// last-used bookkeeping update.
    pub async fn validate(&self, token: &str) -> Result<UserIdentity, SessionError> {
        let token_hash = sha256_hex(token);

        let session: Session = match self.sessions.find_by_token_hash(&token_hash).await? {
            Some(entity) => entity.into(),
            None => {
                tracing::debug!("Session validation failed: unknown token");
                return Err(SessionError::Unauthenticated);
            }
        };

        let now = Utc::now();
        if !session.is_active(now) {
            let reason = if session.revoked_at.is_some() {
                "revoked"
            } else {
                "expired"
            };
            tracing::debug!(session_id = %session.id, reason, "Session validation failed");
            return Err(SessionError::Unauthenticated);
        }

        let new_expiry = self.sliding.then(|| now + self.ttl);
        self.sessions.touch(session.id, new_expiry).await?;

        let user = match self.users.find_by_id(session.user_id).await? {
            Some(user) => user,
            None => {
                // Sessions cascade on user deletion; hitting this means
                // the row vanished mid-request.
                tracing::warn!(session_id = %session.id, "Session points at missing user");
                return Err(SessionError::Unauthenticated);
            }
        };

        Ok(user.into())
    }

    /// Revoke the session carrying a token. Idempotent.
    pub async fn revoke(&self, token: &str) -> Result<(), sqlx::Error> {
        let token_hash = sha256_hex(token);
        let revoked = self.sessions.revoke_by_token_hash(&token_hash).await?;

        if revoked == 0 {
            tracing::debug!("Revoke on unknown or already-revoked session");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    // Session lifecycle (create/validate/expire/revoke) is covered by the
    // auth integration tests against a real database.
}
