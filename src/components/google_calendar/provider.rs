use super::models::{CreatedEvent, GoogleEvent, TokenResponse};
use crate::config::{Config, CALENDAR_EVENTS_SCOPE};
use crate::error::{AppResult, Error};
use reqwest::{Client, Response};
use tracing::{error, info};
use url::Url;

/// HTTP client for the Google OAuth and Calendar endpoints
#[derive(Clone)]
pub struct GoogleClient {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    auth_url: String,
    token_url: String,
    calendar_api: String,
    client: Client,
}

impl GoogleClient {
    pub fn new(config: &Config) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.http_timeout())
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client_id: config.google_client_id.clone(),
            client_secret: config.google_client_secret.clone(),
            redirect_uri: config.redirect_uri(),
            auth_url: config.google_auth_url.clone(),
            token_url: config.google_token_url.clone(),
            calendar_api: config.google_calendar_api.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Consent screen URL carrying the given `state`
    pub fn authorization_url(&self, state: &str) -> AppResult<String> {
        let url = Url::parse_with_params(
            &self.auth_url,
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", CALENDAR_EVENTS_SCOPE),
                // Offline access plus forced consent guarantees a refresh token
                ("access_type", "offline"),
                ("prompt", "consent"),
                ("state", state),
            ],
        )
        .map_err(|e| Error::Config(format!("Invalid authorization URL: {}", e)))?;

        Ok(url.to_string())
    }

    /// Exchange an authorization code for tokens
    pub async fn exchange_code(&self, code: &str) -> AppResult<TokenResponse> {
        let params = [
            ("code", code),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let response = self
            .client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| Error::ExchangeFailed(e.to_string()))?;

        if !response.status().is_success() {
            let detail = error_detail(response).await;
            error!("Token exchange error: {}", detail);
            return Err(Error::ExchangeFailed(detail));
        }

        response
            .json()
            .await
            .map_err(|e| Error::ExchangeFailed(format!("Failed to parse token response: {}", e)))
    }

    /// Mint a new access token from a refresh token
    pub async fn refresh_token(&self, refresh_token: &str) -> AppResult<TokenResponse> {
        let params = [
            ("refresh_token", refresh_token),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "refresh_token"),
        ];

        let response = self
            .client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| Error::RefreshFailed(e.to_string()))?;

        if !response.status().is_success() {
            let detail = error_detail(response).await;
            error!("Token refresh error: {}", detail);
            return Err(Error::RefreshFailed(detail));
        }

        response
            .json()
            .await
            .map_err(|e| Error::RefreshFailed(format!("Failed to parse token response: {}", e)))
    }

    /// Create an event on the user's primary calendar, returning its id
    pub async fn insert_event(&self, access_token: &str, event: &GoogleEvent) -> AppResult<String> {
        let url = format!("{}/calendars/primary/events", self.calendar_api);

        let response = self
            .client
            .post(url)
            .bearer_auth(access_token)
            .json(event)
            .send()
            .await
            .map_err(|e| Error::SyncFailed(e.to_string()))?;

        if !response.status().is_success() {
            let detail = error_detail(response).await;
            error!("Calendar API error: {}", detail);
            return Err(Error::SyncFailed(detail));
        }

        let created: CreatedEvent = response
            .json()
            .await
            .map_err(|e| Error::SyncFailed(format!("Failed to parse event response: {}", e)))?;

        info!("Created Google Calendar event {}", created.id);
        Ok(created.id)
    }
}

async fn error_detail(response: Response) -> String {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Could not read error response".to_string());
    format!("HTTP {} - {}", status, body)
}
