use super::models::{TokenRecord, TokenResponse};
use super::provider::GoogleClient;
use super::store::TokenStore;
use crate::error::{AppResult, Error};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::info;

/// Lifetime assumed when the token endpoint omits `expires_in`
const DEFAULT_EXPIRES_IN: i64 = 3600;

/// Keeps per-user Google tokens in the store and fresh
#[derive(Clone)]
pub struct TokenManager {
    store: Arc<dyn TokenStore>,
    google: GoogleClient,
}

impl TokenManager {
    pub fn new(store: Arc<dyn TokenStore>, google: GoogleClient) -> Self {
        Self { store, google }
    }

    pub fn google(&self) -> &GoogleClient {
        &self.google
    }

    /// Whether a record exists for the user
    pub async fn is_connected(&self, user_id: &str) -> AppResult<bool> {
        Ok(self.store.get_token(user_id).await?.is_some())
    }

    /// Get a usable access token, refreshing it first when it has expired
    pub async fn access_token(&self, user_id: &str) -> AppResult<String> {
        let record = self
            .store
            .get_token(user_id)
            .await?
            .ok_or(Error::NotConnected)?;

        if !record.is_expired(Utc::now()) {
            return Ok(record.access_token);
        }

        info!("Token expired for user {}, refreshing...", user_id);
        let refreshed = self.google.refresh_token(&record.refresh_token).await?;
        let expires_at = expires_at(Utc::now(), refreshed.expires_in);

        self.store
            .update_access_token(user_id, refreshed.access_token.clone(), expires_at)
            .await?;

        Ok(refreshed.access_token)
    }

    /// Store the tokens from a successful code exchange.
    ///
    /// Google only returns a refresh token on consent; when it is missing
    /// the previously stored one is kept.
    pub async fn store_grant(&self, user_id: &str, grant: TokenResponse) -> AppResult<TokenRecord> {
        let refresh_token = match grant.refresh_token {
            Some(token) => token,
            None => self
                .store
                .get_token(user_id)
                .await?
                .map(|existing| existing.refresh_token)
                .ok_or_else(|| {
                    Error::ExchangeFailed("Token response missing 'refresh_token' field".to_string())
                })?,
        };

        let record = TokenRecord {
            user_id: user_id.to_string(),
            access_token: grant.access_token,
            refresh_token,
            expires_at: expires_at(Utc::now(), grant.expires_in),
        };

        self.store.save_token(record.clone()).await?;
        info!("Stored Google Calendar tokens for user {}", user_id);

        Ok(record)
    }
}

fn expires_at(now: DateTime<Utc>, expires_in: Option<i64>) -> DateTime<Utc> {
    now + Duration::seconds(expires_in.unwrap_or(DEFAULT_EXPIRES_IN))
}
