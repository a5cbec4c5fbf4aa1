use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("token must have exactly three non-empty segments")]
    MalformedToken,
    #[error("token signature does not match")]
    InvalidSignature,
    #[error("token payload could not be decoded: {0}")]
    InvalidPayload(String),
    #[error("token expired")]
    Expired,
    #[error("authorization header missing")]
    MissingAuthorization,
    #[error("authorization header malformed")]
    InvalidAuthorization,
    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MalformedToken => "malformed_token",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::InvalidPayload(_) => "invalid_payload",
            AuthError::Expired => "token_expired",
            AuthError::MissingAuthorization | AuthError::InvalidAuthorization => "missing_token",
            AuthError::Signing(_) => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingAuthorization | AuthError::InvalidAuthorization => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::MalformedToken
            | AuthError::InvalidSignature
            | AuthError::InvalidPayload(_)
            | AuthError::Expired => StatusCode::FORBIDDEN,
            AuthError::Signing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message. Token failures are deliberately indistinguishable.
    fn public_message(&self) -> &'static str {
        match self {
            AuthError::MissingAuthorization | AuthError::InvalidAuthorization => {
                "Access token required"
            }
            AuthError::MalformedToken
            | AuthError::InvalidSignature
            | AuthError::InvalidPayload(_)
            | AuthError::Expired => "Invalid or expired token",
            AuthError::Signing(_) => "Internal server error",
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    code: &'static str,
    message: &'static str,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let code = self.code();
        let body = ErrorBody {
            success: false,
            code,
            message: self.public_message(),
        };
        let mut resp = (self.status(), Json(body)).into_response();
        resp.headers_mut()
            .insert("X-Error-Code", HeaderValue::from_static(code));
        resp
    }
}
