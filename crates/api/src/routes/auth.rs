//! Authentication routes: identity exchange, current user, logout.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use domain::models::UserIdentity;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::middleware::metrics::record_session_issued;
use crate::services::ExchangeError;

/// Body of the identity exchange callback.
#[derive(Debug, Deserialize)]
pub struct ExchangeRequest {
    pub session_id: String,
}

/// Response for logout.
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub status: String,
}

/// Exchange a one-time external session identifier for a session cookie.
///
/// POST /api/auth/session
///
/// The session token is delivered only via the Set-Cookie header; the
/// body carries the user identity for the front-end to render.
pub async fn exchange_session(
    State(state): State<AppState>,
    Json(request): Json<ExchangeRequest>,
) -> Result<(StatusCode, HeaderMap, Json<UserIdentity>), ApiError> {
    let (issued, user) = state
        .identity
        .exchange(&request.session_id)
        .await
        .map_err(|e| match e {
            ExchangeError::Rejected(detail) => ApiError::ExchangeFailed(detail),
            ExchangeError::Unavailable(detail) => ApiError::ServiceUnavailable(detail),
            ExchangeError::Database(db_err) => db_err.into(),
        })?;

    record_session_issued();

    let mut headers = HeaderMap::new();
    state.cookies.add_session_cookie(&mut headers, &issued.token);

    info!(user_id = %user.id, "User logged in");

    Ok((StatusCode::OK, headers, Json(user.into())))
}

/// Return the identity of the current session.
///
/// GET /api/auth/me
pub async fn me(current: CurrentUser) -> Json<UserIdentity> {
    Json(current.user)
}

/// Revoke the current session and clear the cookie.
///
/// POST /api/auth/logout
///
/// Succeeds even when the cookie is stale or absent; revocation is
/// idempotent and the client outcome is the same.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<(HeaderMap, Json<LogoutResponse>), ApiError> {
    if let Some(token) = state.cookies.extract_session_token(&headers) {
        state
            .sessions
            .revoke(token)
            .await
            .map_err(ApiError::from)?;
    }

    let mut response_headers = HeaderMap::new();
    state.cookies.add_clear_cookie(&mut response_headers);

    Ok((
        response_headers,
        Json(LogoutResponse {
            status: "logged_out".to_string(),
        }),
    ))
}
