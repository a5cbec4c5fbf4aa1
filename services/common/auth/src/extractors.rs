use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::{header::AUTHORIZATION, request::Parts, HeaderValue};
use tracing::warn;

use crate::claims::Credential;
use crate::codec::TokenCodec;
use crate::error::{AuthError, AuthResult};

/// Extracts a verified credential from the `Authorization: Bearer` header.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub credential: Credential,
}

impl AuthContext {
    pub fn into_credential(self) -> Credential {
        self.credential
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    Arc<TokenCodec>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let codec = Arc::<TokenCodec>::from_ref(state);

        let token = parse_bearer(parts.headers.get(AUTHORIZATION))?;
        let credential = codec.verify(&token).map_err(|err| {
            warn!(error = %err, path = %parts.uri.path(), "token verification failed");
            err
        })?;

        Ok(Self { credential })
    }
}

/// Token from an `Authorization` value. The scheme is matched without
/// regard to case; a header that is present but unusable is distinguished
/// from one that is absent.
pub fn parse_bearer(value: Option<&HeaderValue>) -> AuthResult<String> {
    let Some(value) = value else {
        return Err(AuthError::MissingAuthorization);
    };
    let text = value.to_str().map_err(|_| AuthError::InvalidAuthorization)?;
    match text.trim().split_once(char::is_whitespace) {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
            Ok(token.trim().to_owned())
        }
        _ => Err(AuthError::InvalidAuthorization),
    }
}
