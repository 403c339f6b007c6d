//! Identity exchange gateway.
//!
//! Converts a one-time external session identifier (handed back by the
//! hosted login flow via a redirect fragment) into a durable session.

use domain::models::User;
use serde::Deserialize;
use sqlx::PgPool;
use std::time::Duration;
use thiserror::Error;

use persistence::entities::UserEntity;
use persistence::repositories::{IdentityExchangeRepository, UserRepository};

use crate::config::IdentityConfig;
use crate::services::sessions::{IssuedSession, SessionService};

/// Errors that can occur during an identity exchange.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// The identifier is invalid, already consumed, or rejected upstream.
    #[error("Exchange failed: {0}")]
    Rejected(String),

    /// The upstream provider could not be reached; the client may retry.
    #[error("Identity provider unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Profile returned by the upstream identity provider.
#[derive(Debug, Clone, Deserialize)]
struct UpstreamProfile {
    /// Provider-assigned subject identifier.
    id: String,
    email: String,
    name: String,
    picture: Option<String>,
}

/// Identity exchange service.
#[derive(Clone)]
pub struct IdentityExchangeService {
    http: reqwest::Client,
    provider_url: String,
    users: UserRepository,
    exchanges: IdentityExchangeRepository,
    sessions: SessionService,
}

impl IdentityExchangeService {
    /// Creates a new IdentityExchangeService.
    pub fn new(
        pool: PgPool,
        config: &IdentityConfig,
        sessions: SessionService,
    ) -> Result<Self, String> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| format!("Failed to build identity HTTP client: {}", e))?;

        Ok(Self {
            http,
            provider_url: config.provider_url.clone(),
            users: UserRepository::new(pool.clone()),
            exchanges: IdentityExchangeRepository::new(pool),
            sessions,
        })
    }

    /// Exchange a one-time external session identifier for a session.
    ///
    /// Order matters: the identifier is verified upstream first and
    /// consumed second. The consume insert is the serialization point,
    /// so concurrent exchanges with the same identifier mint at most one
    /// session, and a transient upstream failure does not burn the
    /// identifier.
    pub async fn exchange(
        &self,
        external_session_id: &str,
    ) -> Result<(IssuedSession, User), ExchangeError> {
        if external_session_id.is_empty() {
            return Err(ExchangeError::Rejected("Empty session identifier".into()));
        }

        let profile = self.fetch_profile(external_session_id).await?;

        let consumed = self.exchanges.consume(external_session_id).await?;
        if !consumed {
            tracing::warn!("Replayed identity exchange rejected");
            return Err(ExchangeError::Rejected(
                "Session identifier already used".into(),
            ));
        }

        let user = self.provision_user(&profile).await?;
        self.users.touch_last_login(user.id).await?;

        let issued = self.sessions.create(user.id).await?;

        tracing::info!(user_id = %user.id, "Identity exchange completed");

        Ok((issued, user.into()))
    }

    /// Resolve the external identifier against the provider's profile
    /// endpoint.
    async fn fetch_profile(
        &self,
        external_session_id: &str,
    ) -> Result<UpstreamProfile, ExchangeError> {
        let response = self
            .http
            .get(&self.provider_url)
            .header("X-Session-ID", external_session_id)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Identity provider request failed");
                ExchangeError::Unavailable(format!("Identity provider error: {}", e))
            })?;

        if !response.status().is_success() {
            tracing::debug!(status = %response.status(), "Identity provider rejected session id");
            return Err(ExchangeError::Rejected(
                "Invalid session identifier".into(),
            ));
        }

        response.json::<UpstreamProfile>().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to parse identity provider response");
            ExchangeError::Rejected("Malformed identity provider response".into())
        })
    }

    /// Look up the user by external subject id, creating the record on
    /// first sight.
    async fn provision_user(&self, profile: &UpstreamProfile) -> Result<UserEntity, ExchangeError> {
        if let Some(user) = self.users.find_by_external_id(&profile.id).await? {
            return Ok(user);
        }

        let created = self
            .users
            .create(
                &profile.id,
                &profile.email,
                &profile.name,
                profile.picture.as_deref(),
            )
            .await;

        // Concurrent first-sight provisioning races on the external_id
        // unique index; the loser falls back to the winner's row.
        if let Err(sqlx::Error::Database(db_err)) = &created {
            if db_err.code().as_deref() == Some("23505") {
                if let Some(user) = self.users.find_by_external_id(&profile.id).await? {
                    return Ok(user);
                }
            }
        }

        Ok(created?)
    }
}

#[cfg(test)]
mod tests {
    // The exchange flow, including replay rejection, is covered by the
    // auth integration tests.
}
