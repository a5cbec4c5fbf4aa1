use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};
use crate::roles::Role;

/// Identity a token is issued for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSubject {
    pub id: u64,
    pub username: String,
    pub role: Role,
}

/// Application-focused representation of a verified token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credential {
    pub id: u64,
    pub username: String,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

/// Payload exactly as it travels inside the token.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct CredentialRepr {
    pub id: u64,
    pub username: String,
    pub role: Role,
    pub exp: i64,
}

impl CredentialRepr {
    pub(crate) fn new(subject: &TokenSubject, exp: i64) -> Self {
        Self {
            id: subject.id,
            username: subject.username.clone(),
            role: subject.role,
            exp,
        }
    }
}

impl TryFrom<CredentialRepr> for Credential {
    type Error = AuthError;

    fn try_from(value: CredentialRepr) -> AuthResult<Self> {
        let expires_at = Utc
            .timestamp_opt(value.exp, 0)
            .single()
            .ok_or_else(|| AuthError::InvalidPayload(format!("exp out of range: {}", value.exp)))?;

        Ok(Self {
            id: value.id,
            username: value.username,
            role: value.role,
            expires_at,
        })
    }
}
