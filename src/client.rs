use crate::components::google_calendar::models::{
    AuthUrlResponse, ConnectionStatus, ErrorBody, SyncRequest, SyncResponse,
};
use crate::error::{AppResult, Error};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::time::Duration;
use tracing::debug;

/// Calls the client makes against the ikhalenda server
#[async_trait]
pub trait ServerApi: Send + Sync + 'static {
    /// Ask the server for a Google consent URL bound to the session's user
    async fn auth_url(&self, session: &str) -> AppResult<String>;

    /// Whether the session's user has a stored Google token record
    async fn is_connected(&self, session: &str) -> AppResult<bool>;

    /// Push one event to the user's Google Calendar
    async fn sync_event(&self, session: &str, request: &SyncRequest) -> AppResult<SyncResponse>;
}

/// reqwest-backed [`ServerApi`]
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn get(&self, path: &str, session: &str) -> RequestBuilder {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .bearer_auth(session)
    }
}

#[async_trait]
impl ServerApi for ApiClient {
    async fn auth_url(&self, session: &str) -> AppResult<String> {
        let response = self.get("/oauth/authorize", session).send().await?;
        let response = check_status(response, Error::Other).await?;
        let body: AuthUrlResponse = response.json().await?;
        Ok(body.auth_url)
    }

    async fn is_connected(&self, session: &str) -> AppResult<bool> {
        let response = self.get("/oauth/status", session).send().await?;
        let response = check_status(response, Error::Other).await?;
        let body: ConnectionStatus = response.json().await?;
        Ok(body.connected)
    }

    async fn sync_event(&self, session: &str, request: &SyncRequest) -> AppResult<SyncResponse> {
        debug!("Syncing '{}' on {}", request.title, request.date);

        let response = self
            .client
            .post(format!("{}/sync", self.base_url))
            .bearer_auth(session)
            .json(request)
            .send()
            .await
            .map_err(|e| Error::SyncFailed(e.to_string()))?;

        let response = check_status(response, sync_error).await?;
        response
            .json()
            .await
            .map_err(|e| Error::SyncFailed(format!("Failed to parse sync response: {}", e)))
    }
}

/// Map a non-success response to an error, using the server's `{ error }` body
async fn check_status(response: Response, otherwise: fn(String) -> Error) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(Error::Unauthorized);
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => format!("HTTP {}", status),
    };
    Err(otherwise(message))
}

/// The server reports a missing token record with the `NotConnected` message
fn sync_error(message: String) -> Error {
    if message == Error::NotConnected.to_string() {
        Error::NotConnected
    } else {
        Error::SyncFailed(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> SyncRequest {
        SyncRequest {
            title: "Meeting".to_string(),
            description: None,
            date: "2025-03-15".to_string(),
            time: Some("14:30".to_string()),
        }
    }

    #[tokio::test]
    async fn test_auth_url_sends_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/oauth/authorize"))
            .and(header("authorization", "Bearer session-1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "authUrl": "https://consent" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
        assert_eq!(client.auth_url("session-1").await.unwrap(), "https://consent");
    }

    #[tokio::test]
    async fn test_unauthorized_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/oauth/status"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(serde_json::json!({ "error": "Unauthorized" })),
            )
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
        assert!(matches!(client.is_connected("bad").await, Err(Error::Unauthorized)));
    }

    #[tokio::test]
    async fn test_sync_error_mapping() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sync"))
            .respond_with(ResponseTemplate::new(400).set_body_json(
                serde_json::json!({ "error": "Google Calendar not connected. Please connect first." }),
            ))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
        assert!(matches!(
            client.sync_event("session", &request()).await,
            Err(Error::NotConnected)
        ));

        server.reset().await;
        Mock::given(method("POST"))
            .and(path("/sync"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(serde_json::json!({ "error": "quota" })),
            )
            .mount(&server)
            .await;

        match client.sync_event("session", &request()).await {
            Err(Error::SyncFailed(message)) => assert_eq!(message, "quota"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_other_bad_request_is_sync_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sync"))
            .respond_with(ResponseTemplate::new(400).set_body_string("Failed to parse the request body as JSON"))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
        match client.sync_event("session", &request()).await {
            Err(Error::SyncFailed(message)) => assert_eq!(message, "HTTP 400 Bad Request"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_stalled_server_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sync"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_secs(5))
                    .set_body_json(serde_json::json!({ "success": true, "eventId": "g1", "message": "ok" })),
            )
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri(), Duration::from_millis(100)).unwrap();
        let result = tokio::time::timeout(Duration::from_secs(2), client.sync_event("session", &request())).await;

        assert!(matches!(result, Ok(Err(Error::SyncFailed(_)))));
    }
}
