//! Session authentication extractors.
//!
//! Extracts the session cookie, validates it against the session store
//! and resolves the calling user. Handlers receive the identity as an
//! explicit value; nothing downstream reads ambient auth state.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use domain::models::UserIdentity;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::SessionError;

/// The message returned for every authentication failure. Unknown,
/// expired and revoked sessions are deliberately indistinguishable.
const UNAUTHENTICATED_DETAIL: &str = "Not authenticated";

/// Authenticated caller resolved from the session cookie.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: UserIdentity,
}

impl CurrentUser {
    pub fn user_id(&self) -> Uuid {
        self.user.id
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = state
            .cookies
            .extract_session_token(&parts.headers)
            .ok_or_else(|| ApiError::Unauthenticated(UNAUTHENTICATED_DETAIL.to_string()))?;

        let user = state.sessions.validate(token).await.map_err(|e| match e {
            SessionError::Unauthenticated => {
                ApiError::Unauthenticated(UNAUTHENTICATED_DETAIL.to_string())
            }
            SessionError::Database(db_err) => {
                ApiError::Internal(format!("Session lookup failed: {}", db_err))
            }
        })?;

        Ok(CurrentUser { user })
    }
}

/// Optional session authentication.
///
/// Read-only routes use this to personalize output (`user_joined`)
/// without rejecting anonymous callers.
#[derive(Debug, Clone)]
pub struct OptionalCurrentUser(pub Option<CurrentUser>);

impl OptionalCurrentUser {
    pub fn user_id(&self) -> Option<Uuid> {
        self.0.as_ref().map(|current| current.user.id)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for OptionalCurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = match state.cookies.extract_session_token(&parts.headers) {
            Some(token) => token,
            None => return Ok(OptionalCurrentUser(None)),
        };

        match state.sessions.validate(token).await {
            Ok(user) => Ok(OptionalCurrentUser(Some(CurrentUser { user }))),
            Err(SessionError::Unauthenticated) => Ok(OptionalCurrentUser(None)),
            Err(SessionError::Database(db_err)) => Err(ApiError::Internal(format!(
                "Session lookup failed: {}",
                db_err
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> UserIdentity {
        UserIdentity {
            id: Uuid::new_v4(),
            email: "vera@example.com".to_string(),
            display_name: "Vera".to_string(),
            avatar_url: None,
        }
    }

    #[test]
    fn test_current_user_id_accessor() {
        let user = identity();
        let id = user.id;
        let current = CurrentUser { user };
        assert_eq!(current.user_id(), id);
    }

    #[test]
    fn test_optional_current_user_none() {
        let optional = OptionalCurrentUser(None);
        assert!(optional.user_id().is_none());
    }

    #[test]
    fn test_optional_current_user_some() {
        let user = identity();
        let id = user.id;
        let optional = OptionalCurrentUser(Some(CurrentUser { user }));
        assert_eq!(optional.user_id(), Some(id));
    }
}
