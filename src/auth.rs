use crate::components::google_calendar::state::STATE_AUDIENCE;
use crate::error::{AppResult, Error};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Claims of a session token issued by the identity provider
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (as UTC timestamp)
    pub exp: usize,
    /// Issued at (as UTC timestamp)
    pub iat: usize,
    /// Audience, a string or a list of strings when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<serde_json::Value>,
}

impl SessionClaims {
    fn has_audience(&self, audience: &str) -> bool {
        match &self.aud {
            Some(serde_json::Value::String(aud)) => aud == audience,
            Some(serde_json::Value::Array(auds)) => auds.iter().any(|a| a.as_str() == Some(audience)),
            _ => false,
        }
    }
}

/// Verifies bearer sessions against the shared secret
#[derive(Clone)]
pub struct SessionVerifier {
    secret: Arc<String>,
}

impl SessionVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: Arc::new(secret.to_string()),
        }
    }

    /// Issue a session token. The identity provider normally does this;
    /// the server only needs it for local development and tests.
    pub fn generate_token(&self, user_id: &str, ttl: Duration) -> AppResult<String> {
        let now = Utc::now();
        let exp = now + ttl;

        let claims = SessionClaims {
            sub: user_id.to_string(),
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
            aud: None,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| Error::Other(format!("Failed to generate token: {}", e)))
    }

    /// Validate a session token, returning its claims
    pub fn validate_token(&self, token: &str) -> AppResult<SessionClaims> {
        // Providers add their own audience; only signature and expiry matter here
        let mut validation = Validation::default();
        validation.validate_aud = false;

        let claims = decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|token_data| token_data.claims)
        .map_err(|e| {
            debug!("Session validation error: {:?}", e);
            Error::Unauthorized
        })?;

        // OAuth state tokens travel through the consent URL and never grant a session
        if claims.has_audience(STATE_AUDIENCE) {
            warn!("Rejected OAuth state token presented as a session");
            return Err(Error::Unauthorized);
        }

        Ok(claims)
    }

    /// Resolve the user behind an `Authorization` header value
    pub fn user_id(&self, authorization: Option<&str>) -> AppResult<String> {
        let token = bearer_token(authorization)?;
        Ok(self.validate_token(&token)?.sub)
    }
}

/// Extract the token from a `Bearer <token>` header value
pub fn bearer_token(authorization: Option<&str>) -> AppResult<String> {
    let auth_str = authorization.ok_or(Error::Unauthorized)?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(Error::Unauthorized)?;

    Ok(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::google_calendar::StateSigner;
    use crate::config::Config;

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token(Some("Bearer abc")).unwrap(), "abc");
        assert!(bearer_token(None).is_err());
        assert!(bearer_token(Some("Basic abc")).is_err());
        assert!(bearer_token(Some("Bearer ")).is_err());
    }

    #[test]
    fn test_generated_token_validates() {
        let verifier = SessionVerifier::new("secret");
        let token = verifier.generate_token("user-1", Duration::hours(1)).unwrap();
        let header = format!("Bearer {}", token);

        assert_eq!(verifier.user_id(Some(&header)).unwrap(), "user-1");
    }

    #[test]
    fn test_wrong_secret_is_unauthorized() {
        let token = SessionVerifier::new("one")
            .generate_token("user-1", Duration::hours(1))
            .unwrap();

        let result = SessionVerifier::new("two").validate_token(&token);
        assert!(matches!(result, Err(Error::Unauthorized)));
    }

    #[test]
    fn test_expired_token_is_unauthorized() {
        let verifier = SessionVerifier::new("secret");
        let token = verifier.generate_token("user-1", Duration::hours(-2)).unwrap();
        assert!(matches!(verifier.validate_token(&token), Err(Error::Unauthorized)));
    }

    #[test]
    fn test_oauth_state_is_not_a_session() {
        // Even when both tokens share one secret
        let state = StateSigner::new("shared").sign("user-1").unwrap();
        let header = format!("Bearer {}", state);

        let result = SessionVerifier::new("shared").user_id(Some(&header));
        assert!(matches!(result, Err(Error::Unauthorized)));
    }

    #[test]
    fn test_oauth_state_from_default_config_is_not_a_session() {
        let config = Config::new("id", "secret", "session-secret");
        let state = StateSigner::new(&config.oauth_state_secret).sign("user-1").unwrap();
        let header = format!("Bearer {}", state);

        let result = SessionVerifier::new(&config.session_secret).user_id(Some(&header));
        assert!(matches!(result, Err(Error::Unauthorized)));
    }

    #[test]
    fn test_provider_audience_is_accepted() {
        let claims = serde_json::json!({
            "sub": "user-1",
            "iat": Utc::now().timestamp(),
            "exp": (Utc::now() + Duration::hours(1)).timestamp(),
            "aud": ["authenticated"],
        });
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"secret")).unwrap();

        let claims = SessionVerifier::new("secret").validate_token(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
    }
}
