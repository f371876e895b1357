use super::{ApiError, AppState, AuthSession};
use crate::components::google_calendar::models::{
    AuthUrlResponse, ConnectionStatus, SyncRequest, SyncResponse,
};
use askama::Template;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use tracing::{error, info};

/// Query string Google redirects back with
#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "oauth_connected.html")]
struct ConnectedPage {
    lang: String,
    title: String,
    message: String,
}

/// Handler for health check endpoint
pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Issue a consent URL for the signed-in user
pub async fn authorize_handler(
    State(state): State<AppState>,
    AuthSession(user_id): AuthSession,
) -> Result<Json<AuthUrlResponse>, ApiError> {
    let auth_url = state.oauth.issue_auth_url(&user_id)?;
    info!("Issued Google consent URL for user {}", user_id);
    Ok(Json(AuthUrlResponse { auth_url }))
}

/// Google redirects here after consent
pub async fn callback_handler(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Result<Html<String>, ApiError> {
    if let Some(reason) = &params.error {
        error!("Google returned an OAuth error: {}", reason);
        return Err(ApiError::bad_request(format!("Authorization denied: {}", reason)));
    }

    state
        .oauth
        .handle_callback(params.code.as_deref(), params.state.as_deref())
        .await
        .map_err(ApiError::callback)?;

    let page = ConnectedPage {
        lang: rust_i18n::locale().to_string(),
        title: t!("oauth_success_title").to_string(),
        message: t!("oauth_success").to_string(),
    };
    let html = page
        .render()
        .map_err(|e| ApiError::internal(format!("Failed to render page: {}", e)))?;

    Ok(Html(html))
}

/// Multiplexed route: callback mode when `code` is present, otherwise
/// issue-URL mode for the bearer session
pub async fn legacy_oauth_handler(
    state: State<AppState>,
    Query(params): Query<CallbackParams>,
    session: Result<AuthSession, ApiError>,
) -> Response {
    if params.code.is_some() {
        return callback_handler(state, Query(params)).await.into_response();
    }

    match session {
        Ok(session) => authorize_handler(state, session).await.into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn status_handler(
    State(state): State<AppState>,
    AuthSession(user_id): AuthSession,
) -> Result<Json<ConnectionStatus>, ApiError> {
    let connected = state.oauth.connection_status(&user_id).await?;
    Ok(Json(ConnectionStatus { connected }))
}

/// Create one event on the user's Google Calendar
pub async fn sync_handler(
    State(state): State<AppState>,
    AuthSession(user_id): AuthSession,
    Json(request): Json<SyncRequest>,
) -> Result<Json<SyncResponse>, ApiError> {
    let event_id = state.sync.sync_event(&user_id, &request).await?;

    Ok(Json(SyncResponse {
        success: true,
        event_id,
        message: "Event synced to Google Calendar".to_string(),
    }))
}
