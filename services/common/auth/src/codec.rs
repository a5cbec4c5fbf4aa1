use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::claims::{Credential, CredentialRepr, TokenSubject};
use crate::config::TokenConfig;
use crate::error::{AuthError, AuthResult};

type HmacSha256 = Hmac<Sha256>;

#[derive(Serialize)]
struct TokenHeader {
    alg: &'static str,
    typ: &'static str,
}

const HEADER: TokenHeader = TokenHeader {
    alg: "HS256",
    typ: "JWT",
};

/// Issues and verifies `header.payload.signature` bearer tokens signed with
/// HMAC-SHA256. Holds no state beyond its configuration.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    config: TokenConfig,
}

impl TokenCodec {
    pub fn new(config: TokenConfig) -> Self {
        Self { config }
    }

    /// Issue a token expiring `ttl_seconds` from now.
    pub fn issue(&self, subject: &TokenSubject) -> AuthResult<String> {
        let exp = Utc::now().timestamp() + self.config.ttl_seconds;
        self.issue_with_expiry(subject, exp)
    }

    /// Issue a token with an explicit `exp` (epoch seconds).
    pub fn issue_with_expiry(&self, subject: &TokenSubject, exp: i64) -> AuthResult<String> {
        let header = encode_segment(&HEADER)?;
        let payload = encode_segment(&CredentialRepr::new(subject, exp))?;
        let signing_input = format!("{header}.{payload}");
        let signature = URL_SAFE_NO_PAD.encode(self.sign(signing_input.as_bytes())?);
        Ok(format!("{signing_input}.{signature}"))
    }

    pub fn verify(&self, token: &str) -> AuthResult<Credential> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verify against an explicit clock (epoch seconds).
    pub fn verify_at(&self, token: &str, now: i64) -> AuthResult<Credential> {
        let (header, payload, signature) = split_segments(token)?;

        let signing_input = &token[..header.len() + 1 + payload.len()];
        let expected = URL_SAFE_NO_PAD.encode(self.sign(signing_input.as_bytes())?);
        if expected.as_bytes().ct_eq(signature.as_bytes()).unwrap_u8() != 1 {
            return Err(AuthError::InvalidSignature);
        }

        let bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|err| AuthError::InvalidPayload(err.to_string()))?;
        let repr: CredentialRepr = serde_json::from_slice(&bytes)
            .map_err(|err| AuthError::InvalidPayload(err.to_string()))?;

        if repr.exp <= now {
            return Err(AuthError::Expired);
        }

        let credential = Credential::try_from(repr)?;
        debug!(user_id = credential.id, role = %credential.role, "verified token");
        Ok(credential)
    }

    fn sign(&self, input: &[u8]) -> AuthResult<Vec<u8>> {
        let mut mac = HmacSha256::new_from_slice(&self.config.secret)
            .map_err(|err| AuthError::Signing(err.to_string()))?;
        mac.update(input);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

fn encode_segment<T: Serialize>(value: &T) -> AuthResult<String> {
    let json = serde_json::to_vec(value).map_err(|err| AuthError::Signing(err.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

fn split_segments(token: &str) -> AuthResult<(&str, &str, &str)> {
    let mut parts = token.split('.');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(header), Some(payload), Some(signature), None)
            if !header.is_empty() && !payload.is_empty() && !signature.is_empty() =>
        {
            Ok((header, payload, signature))
        }
        _ => Err(AuthError::MalformedToken),
    }
}
