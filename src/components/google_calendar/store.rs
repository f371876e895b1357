use super::models::TokenRecord;
use crate::error::{AppResult, Error};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Storage for per-user Google credentials
#[async_trait]
pub trait TokenStore: Send + Sync + 'static {
    /// Get the record for a user
    async fn get_token(&self, user_id: &str) -> AppResult<Option<TokenRecord>>;

    /// Insert or replace the record for `record.user_id`
    async fn save_token(&self, record: TokenRecord) -> AppResult<()>;

    /// Replace the access token and expiry after a refresh
    async fn update_access_token(
        &self,
        user_id: &str,
        access_token: String,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let record = self.get_token(user_id).await?.ok_or(Error::NotConnected)?;
        self.save_token(TokenRecord {
            access_token,
            expires_at,
            ..record
        })
        .await
    }
}

/// In-memory implementation of the token store (for testing)
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    records: RwLock<HashMap<String, TokenRecord>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn get_token(&self, user_id: &str) -> AppResult<Option<TokenRecord>> {
        let records = self.records.read().await;
        Ok(records.get(user_id).cloned())
    }

    async fn save_token(&self, record: TokenRecord) -> AppResult<()> {
        let mut records = self.records.write().await;
        records.insert(record.user_id.clone(), record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(user_id: &str, access_token: &str) -> TokenRecord {
        TokenRecord {
            user_id: user_id.to_string(),
            access_token: access_token.to_string(),
            refresh_token: "refresh".to_string(),
            expires_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_save_is_upsert() {
        let store = InMemoryTokenStore::new();
        store.save_token(record("user", "first")).await.unwrap();
        store.save_token(record("user", "second")).await.unwrap();

        let stored = store.get_token("user").await.unwrap().unwrap();
        assert_eq!(stored.access_token, "second");
        assert!(store.get_token("someone-else").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_keeps_refresh_token() {
        let store = InMemoryTokenStore::new();
        store.save_token(record("user", "old")).await.unwrap();

        let expires_at = Utc::now() + chrono::Duration::hours(1);
        store
            .update_access_token("user", "new".to_string(), expires_at)
            .await
            .unwrap();

        let stored = store.get_token("user").await.unwrap().unwrap();
        assert_eq!(stored.access_token, "new");
        assert_eq!(stored.refresh_token, "refresh");
        assert_eq!(stored.expires_at, expires_at);
    }

    #[tokio::test]
    async fn test_update_without_record_is_not_connected() {
        let store = InMemoryTokenStore::new();
        let result = store
            .update_access_token("user", "new".to_string(), Utc::now())
            .await;
        assert!(matches!(result, Err(Error::NotConnected)));
    }
}
