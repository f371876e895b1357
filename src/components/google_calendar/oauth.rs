use super::state::StateSigner;
use super::token::TokenManager;
use crate::error::{AppResult, Error};
use tracing::info;

/// Server side of the Google connect flow
#[derive(Clone)]
pub struct OAuthService {
    signer: StateSigner,
    tokens: TokenManager,
}

impl OAuthService {
    pub fn new(signer: StateSigner, tokens: TokenManager) -> Self {
        Self { signer, tokens }
    }

    /// Consent screen URL whose `state` is bound to `user_id`
    pub fn issue_auth_url(&self, user_id: &str) -> AppResult<String> {
        let state = self.signer.sign(user_id)?;
        self.tokens.google().authorization_url(&state)
    }

    /// Handle Google's redirect back to us.
    ///
    /// Verifies `state`, exchanges `code` and upserts the user's token
    /// record. Returns the user the tokens were stored for.
    pub async fn handle_callback(&self, code: Option<&str>, state: Option<&str>) -> AppResult<String> {
        let state = state.filter(|s| !s.is_empty()).ok_or(Error::MissingState)?;
        let code = code
            .filter(|c| !c.is_empty())
            .ok_or_else(|| Error::ExchangeFailed("Missing authorization code".to_string()))?;

        let user_id = self.signer.verify(state)?;
        let grant = self.tokens.google().exchange_code(code).await?;
        self.tokens.store_grant(&user_id, grant).await?;

        info!("Google Calendar connected for user {}", user_id);
        Ok(user_id)
    }

    pub async fn connection_status(&self, user_id: &str) -> AppResult<bool> {
        self.tokens.is_connected(user_id).await
    }
}
