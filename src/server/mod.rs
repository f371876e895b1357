//! HTTP surface of the Google Calendar integration

mod handlers;

pub use handlers::CallbackParams;

use crate::auth::SessionVerifier;
use crate::components::google_calendar::{OAuthService, SyncService};
use crate::components::google_calendar::models::ErrorBody;
use crate::error::Error;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub oauth: OAuthService,
    pub sync: SyncService,
    pub sessions: SessionVerifier,
}

/// User id of a verified bearer session
#[derive(Debug, Clone)]
pub struct AuthSession(pub String);

impl FromRequestParts<AppState> for AuthSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let authorization = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        let user_id = state.sessions.user_id(authorization)?;
        Ok(AuthSession(user_id))
    }
}

/// Error response carrying an `{ "error": ... }` body
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }

    /// Every OAuth callback failure is the client's to retry
    pub fn callback(err: Error) -> Self {
        Self::bad_request(err.to_string())
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match &err {
            Error::Unauthorized => StatusCode::UNAUTHORIZED,
            Error::NotConnected | Error::MissingState | Error::InvalidState(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::InvalidEvent(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("Request failed: {}", err);
        }

        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

/// Build the router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/oauth/authorize", get(handlers::authorize_handler))
        .route("/oauth/callback", get(handlers::callback_handler))
        .route("/oauth/status", get(handlers::status_handler))
        .route("/google-calendar-oauth", get(handlers::legacy_oauth_handler))
        .route("/sync", post(handlers::sync_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve until `shutdown` fires
pub async fn serve(listener: TcpListener, state: AppState, shutdown: oneshot::Receiver<()>) -> std::io::Result<()> {
    let addr: SocketAddr = listener.local_addr()?;
    info!("Listening on {}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = shutdown.await;
            info!("Server shutting down");
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(ApiError::from(Error::Unauthorized).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::from(Error::NotConnected).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from(Error::InvalidEvent("bad date".to_string())).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::from(Error::RefreshFailed("HTTP 400".to_string())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::callback(Error::ExchangeFailed("HTTP 400".to_string())).status(),
            StatusCode::BAD_REQUEST
        );
    }
}
