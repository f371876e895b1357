use super::models::{GoogleEvent, SyncRequest};
use super::token::TokenManager;
use crate::error::{AppResult, Error};
use tracing::info;

/// Server side of event sync: pushes one event to the user's calendar
#[derive(Clone)]
pub struct SyncService {
    tokens: TokenManager,
}

impl SyncService {
    pub fn new(tokens: TokenManager) -> Self {
        Self { tokens }
    }

    /// Create the event on Google Calendar and return the provider's event id.
    ///
    /// The payload is built before any token work so malformed requests
    /// never trigger a refresh.
    pub async fn sync_event(&self, user_id: &str, request: &SyncRequest) -> AppResult<String> {
        if request.title.trim().is_empty() {
            return Err(Error::InvalidEvent("Title must not be empty".to_string()));
        }
        let event = GoogleEvent::from_request(request)?;

        let access_token = self.tokens.access_token(user_id).await?;
        let event_id = self.tokens.google().insert_event(&access_token, &event).await?;

        info!("Synced event '{}' on {} for user {}", request.title, request.date, user_id);
        Ok(event_id)
    }
}
