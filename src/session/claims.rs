//! Unverified peek at the bearer token's JWT claims.
//!
//! Only used to tell the user who they are logged in as and when the token
//! runs out. The server remains the sole judge of validity.

use base64::Engine;
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenClaims {
    pub sub: Option<String>,
    pub exp: Option<i64>,
}

impl TokenClaims {
    /// Decode the payload segment of `header.payload.signature`
    pub fn peek(token: &str) -> Option<Self> {
        let payload = token.split('.').nth(1)?;

        // JWTs use URL-safe base64 without padding, but be lenient about padding
        let trimmed = payload.trim_end_matches('=');
        let decoded = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(trimmed)
            .or_else(|_| base64::engine::general_purpose::STANDARD_NO_PAD.decode(trimmed))
            .ok()?;

        serde_json::from_slice(&decoded).ok()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| Utc.timestamp_opt(exp, 0).single())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().map(|exp| now >= exp).unwrap_or(false)
    }
}
