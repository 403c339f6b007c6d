use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use persistence::repositories::RegistrationError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Not registered: {0}")]
    NotRegistered(String),

    #[error("Already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Event full: {0}")]
    EventFull(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Exchange failed: {0}")]
    ExchangeFailed(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Error body shape: the `detail` field carries the human-readable
/// message the front-end surfaces in its toast.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, detail) = match &self {
            ApiError::Unauthenticated(msg) => {
                (StatusCode::UNAUTHORIZED, "unauthenticated", msg.clone())
            }
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::NotRegistered(msg) => {
                (StatusCode::NOT_FOUND, "not_registered", msg.clone())
            }
            ApiError::AlreadyRegistered(msg) => {
                (StatusCode::CONFLICT, "already_registered", msg.clone())
            }
            ApiError::EventFull(msg) => (StatusCode::CONFLICT, "event_full", msg.clone()),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg.clone()),
            ApiError::ExchangeFailed(msg) => {
                (StatusCode::UNAUTHORIZED, "exchange_failed", msg.clone())
            }
            ApiError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "rate_limited",
                "Too many requests. Please try again later.".into(),
            ),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".into(),
                )
            }
            ApiError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                msg.clone(),
            ),
        };

        let body = ErrorBody {
            error: error_code.into(),
            detail,
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".into()),
            sqlx::Error::Database(db_err) => {
                if let Some(code) = db_err.code() {
                    match code.as_ref() {
                        "23505" => ApiError::AlreadyRegistered("Resource already exists".into()),
                        "23503" => ApiError::NotFound("Referenced resource not found".into()),
                        _ => ApiError::Internal(format!("Database error: {}", db_err)),
                    }
                } else {
                    ApiError::Internal(format!("Database error: {}", db_err))
                }
            }
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

impl From<RegistrationError> for ApiError {
    fn from(err: RegistrationError) -> Self {
        match err {
            RegistrationError::EventNotFound => ApiError::NotFound("Event not found".into()),
            RegistrationError::OrganizerSelfJoin => ApiError::Forbidden(
                "Organizers cannot register for their own event".into(),
            ),
            RegistrationError::AlreadyRegistered => {
                ApiError::AlreadyRegistered("You are already registered for this event".into())
            }
            RegistrationError::EventFull => ApiError::EventFull("Event is full".into()),
            RegistrationError::NotRegistered => {
                ApiError::NotRegistered("You are not registered for this event".into())
            }
            RegistrationError::Database(db_err) => db_err.into(),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    format!(
                        "{}: {}",
                        field,
                        e.message.clone().map(|m| m.to_string()).unwrap_or_default()
                    )
                })
            })
            .collect();

        ApiError::Validation(details.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_api_error_unauthenticated() {
        let error = ApiError::Unauthenticated("no session".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_api_error_forbidden() {
        let error = ApiError::Forbidden("access denied".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_api_error_not_found() {
        let error = ApiError::NotFound("event not found".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_api_error_not_registered_is_404() {
        let error = ApiError::NotRegistered("not registered".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_api_error_conflicts_are_409() {
        let already = ApiError::AlreadyRegistered("already in".to_string());
        assert_eq!(already.into_response().status(), StatusCode::CONFLICT);

        let full = ApiError::EventFull("full".to_string());
        assert_eq!(full.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_api_error_validation() {
        let error = ApiError::Validation("invalid input".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_api_error_exchange_failed_is_401() {
        let error = ApiError::ExchangeFailed("replayed".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_api_error_rate_limited() {
        let error = ApiError::RateLimited;
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_api_error_internal() {
        let error = ApiError::Internal("database connection failed".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_from_registration_error() {
        let cases = [
            (RegistrationError::EventNotFound, StatusCode::NOT_FOUND),
            (RegistrationError::OrganizerSelfJoin, StatusCode::FORBIDDEN),
            (RegistrationError::AlreadyRegistered, StatusCode::CONFLICT),
            (RegistrationError::EventFull, StatusCode::CONFLICT),
            (RegistrationError::NotRegistered, StatusCode::NOT_FOUND),
        ];
        for (err, expected) in cases {
            let api_err: ApiError = err.into();
            assert_eq!(api_err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_from_sqlx_row_not_found() {
        let error: ApiError = sqlx::Error::RowNotFound.into();
        match error {
            ApiError::NotFound(detail) => assert_eq!(detail, "Resource not found"),
            _ => panic!("Expected NotFound error"),
        }
    }

    #[test]
    fn test_api_error_display() {
        assert_eq!(
            format!("{}", ApiError::EventFull("full".to_string())),
            "Event full: full"
        );
        assert_eq!(format!("{}", ApiError::RateLimited), "Rate limited");
    }
}
