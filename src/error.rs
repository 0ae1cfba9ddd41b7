use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::auth::repo_types::StoreError;

/// Outcome of a failed auth operation.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    #[error("User not found")]
    NotFound,

    #[error("Incorrect Password")]
    InvalidCredential,

    #[error("Invalid or expired token")]
    Unauthorized,

    #[error("Email already registered")]
    Conflict,

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::NotFound => StatusCode::NOT_FOUND,
            AuthError::InvalidCredential | AuthError::Unauthorized => StatusCode::UNAUTHORIZED,
            AuthError::Conflict => StatusCode::CONFLICT,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AuthError::Validation(_) => "VALIDATION_ERROR",
            AuthError::NotFound => "USER_NOT_FOUND",
            AuthError::InvalidCredential => "INVALID_CREDENTIAL",
            AuthError::Unauthorized => "UNAUTHORIZED",
            AuthError::Conflict => "CONFLICT",
            AuthError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateEmail => AuthError::Conflict,
            StoreError::Database(e) => AuthError::Internal(anyhow::Error::new(e)),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if let AuthError::Internal(e) = &self {
            // Detail stays in the logs.
            tracing::error!(error = ?e, "internal error");
        }
        let body = ErrorBody {
            error: self.to_string(),
            code: self.code(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_internal_maps_to_server_error() {
        let client_errors = [
            AuthError::Validation("bad".into()),
            AuthError::NotFound,
            AuthError::InvalidCredential,
            AuthError::Unauthorized,
            AuthError::Conflict,
        ];
        for e in client_errors {
            assert!(e.status().is_client_error(), "{e:?}");
        }
        let internal = AuthError::Internal(anyhow::anyhow!("db down"));
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(internal.to_string(), "Internal server error");
    }

    #[test]
    fn duplicate_email_becomes_conflict() {
        let e: AuthError = StoreError::DuplicateEmail.into();
        assert!(matches!(e, AuthError::Conflict));
        assert_eq!(e.status(), StatusCode::CONFLICT);
    }
}
