/// Default credential lifetime: 24 hours.
pub const DEFAULT_TTL_SECONDS: i64 = 24 * 60 * 60;

/// Runtime configuration for token issuance and verification.
#[derive(Clone)]
pub struct TokenConfig {
    /// Process-wide HMAC secret. Read-only after startup.
    pub secret: Vec<u8>,
    /// Lifetime of issued credentials in seconds.
    pub ttl_seconds: i64,
}

impl TokenConfig {
    /// Construct config with the default 24 hour lifetime.
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
            ttl_seconds: DEFAULT_TTL_SECONDS,
        }
    }

    /// Adjust the credential lifetime.
    pub fn with_ttl(mut self, seconds: i64) -> Self {
        self.ttl_seconds = seconds;
        self
    }
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &format_args!("<{} bytes>", self.secret.len()))
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}
