use crate::error::{AppResult, Error};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Audience claim that separates state tokens from session tokens
pub const STATE_AUDIENCE: &str = "ikhalenda-oauth-state";

/// How long a user has to finish the consent screen
const STATE_TTL_MINUTES: i64 = 10;

/// Claims carried by the OAuth `state` parameter
#[derive(Debug, Serialize, Deserialize)]
struct StateClaims {
    /// User the callback will be bound to
    sub: String,
    aud: String,
    iat: i64,
    exp: i64,
    nonce: String,
}

/// Signs and verifies the OAuth `state` parameter
#[derive(Clone)]
pub struct StateSigner {
    secret: String,
    ttl: Duration,
}

impl StateSigner {
    pub fn new(secret: impl Into<String>) -> Self {
        Self::with_ttl(secret, Duration::minutes(STATE_TTL_MINUTES))
    }

    pub fn with_ttl(secret: impl Into<String>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }

    /// Create a signed, short-lived state bound to `user_id`
    pub fn sign(&self, user_id: &str) -> AppResult<String> {
        let now = Utc::now();
        let claims = StateClaims {
            sub: user_id.to_string(),
            aud: STATE_AUDIENCE.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
            nonce: uuid::Uuid::new_v4().to_string(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| Error::Other(format!("Failed to sign OAuth state: {}", e)))
    }

    /// Check the signature and expiry, returning the bound user id
    pub fn verify(&self, state: &str) -> AppResult<String> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[STATE_AUDIENCE]);

        decode::<StateClaims>(
            state,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims.sub)
        .map_err(|e| {
            warn!("Rejected OAuth state: {:?}", e);
            Error::InvalidState(e.to_string())
        })
    }
}
