use crate::error::{config_error, env_error, AppResult};
use chrono_tz::Tz;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Google OAuth authorization endpoint
pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
/// Google OAuth token endpoint
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
/// Google Calendar REST API base
pub const GOOGLE_CALENDAR_API: &str = "https://www.googleapis.com/calendar/v3";
/// Scope needed to create events on the user's calendars
pub const CALENDAR_EVENTS_SCOPE: &str = "https://www.googleapis.com/auth/calendar.events";

/// Default bound on a single outgoing HTTP request
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 30_000;

/// Optional overrides read from `config/ikhalenda.toml`
const CONFIG_FILE: &str = "config/ikhalenda.toml";

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Google OAuth client ID
    pub google_client_id: String,
    /// Google OAuth client secret
    pub google_client_secret: String,
    /// Secret the identity provider signs session tokens with
    pub session_secret: String,
    /// Secret used to sign the OAuth `state` parameter
    pub oauth_state_secret: String,
    /// Externally reachable base URL of this server, used for the redirect URI
    pub public_base_url: String,
    /// Redis connection URL for token records
    pub redis_url: String,
    /// Port to listen on
    pub port: u16,
    /// Locale for user-visible messages ("xh" or "en")
    pub locale: String,
    /// Authorization endpoint
    pub google_auth_url: String,
    /// Token endpoint
    pub google_token_url: String,
    /// Calendar API base URL
    pub google_calendar_api: String,
    /// Timeout for each request to Google, in milliseconds
    pub http_timeout_ms: u64,
}

/// Values that may be set in the config file instead of the environment
#[derive(Debug, Default, Deserialize)]
struct FileOverrides {
    public_base_url: Option<String>,
    redis_url: Option<String>,
    port: Option<u16>,
    locale: Option<String>,
}

impl Config {
    /// Configuration with default endpoints and settings
    pub fn new(
        google_client_id: impl Into<String>,
        google_client_secret: impl Into<String>,
        session_secret: impl Into<String>,
    ) -> Self {
        let session_secret = session_secret.into();
        Self {
            google_client_id: google_client_id.into(),
            google_client_secret: google_client_secret.into(),
            oauth_state_secret: derive_state_secret(&session_secret),
            session_secret,
            public_base_url: "http://localhost:3000".to_string(),
            redis_url: "redis://127.0.0.1:6379".to_string(),
            port: 3000,
            locale: "xh".to_string(),
            google_auth_url: GOOGLE_AUTH_URL.to_string(),
            google_token_url: GOOGLE_TOKEN_URL.to_string(),
            google_calendar_api: GOOGLE_CALENDAR_API.to_string(),
            http_timeout_ms: DEFAULT_HTTP_TIMEOUT_MS,
        }
    }

    /// Point every Google endpoint at `base`, e.g. a local mock server
    pub fn with_google_base(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        self.google_auth_url = format!("{}/o/oauth2/v2/auth", base);
        self.google_token_url = format!("{}/token", base);
        self.google_calendar_api = format!("{}/calendar/v3", base);
        self
    }

    /// Load configuration from environment and config file
    pub fn load() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let google_client_id =
            env::var("GOOGLE_CLIENT_ID").map_err(|_| env_error("GOOGLE_CLIENT_ID"))?;
        let google_client_secret =
            env::var("GOOGLE_CLIENT_SECRET").map_err(|_| env_error("GOOGLE_CLIENT_SECRET"))?;
        let session_secret =
            env::var("SESSION_SECRET").map_err(|_| env_error("SESSION_SECRET"))?;
        let oauth_state_secret =
            env::var("OAUTH_STATE_SECRET").unwrap_or_else(|_| derive_state_secret(&session_secret));

        let overrides = match fs::read_to_string(CONFIG_FILE) {
            Ok(content) => toml::from_str::<FileOverrides>(&content)?,
            Err(_) => FileOverrides::default(),
        };

        let http_timeout_ms = match env::var("HTTP_TIMEOUT_MS") {
            Ok(ms) => ms
                .parse::<u64>()
                .map_err(|_| config_error("Invalid HTTP_TIMEOUT_MS format"))?,
            Err(_) => DEFAULT_HTTP_TIMEOUT_MS,
        };

        let public_base_url = env::var("PUBLIC_BASE_URL")
            .ok()
            .or(overrides.public_base_url)
            .unwrap_or_else(|| "http://localhost:3000".to_string());

        let redis_url = env::var("REDIS_URL")
            .ok()
            .or(overrides.redis_url)
            .unwrap_or_else(|| "redis://127.0.0.1:6379".to_string());

        let port = match env::var("PORT") {
            Ok(p) => p
                .parse::<u16>()
                .map_err(|_| config_error("Invalid PORT format"))?,
            Err(_) => overrides.port.unwrap_or(3000),
        };

        let locale = env::var("LOCALE")
            .ok()
            .or(overrides.locale)
            .unwrap_or_else(|| "xh".to_string());

        Ok(Config {
            google_client_id,
            google_client_secret,
            session_secret,
            oauth_state_secret,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            redis_url,
            port,
            locale,
            google_auth_url: env::var("GOOGLE_AUTH_URL")
                .unwrap_or_else(|_| GOOGLE_AUTH_URL.to_string()),
            google_token_url: env::var("GOOGLE_TOKEN_URL")
                .unwrap_or_else(|_| GOOGLE_TOKEN_URL.to_string()),
            google_calendar_api: env::var("GOOGLE_CALENDAR_API")
                .unwrap_or_else(|_| GOOGLE_CALENDAR_API.to_string()),
            http_timeout_ms,
        })
    }

    /// Redirect URI registered with Google for the OAuth callback
    pub fn redirect_uri(&self) -> String {
        format!("{}/oauth/callback", self.public_base_url)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }
}

/// State secret used when `OAUTH_STATE_SECRET` is unset, never equal to the session secret
fn derive_state_secret(session_secret: &str) -> String {
    format!("{}:oauth-state", session_secret)
}

/// Configuration for the terminal client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the ikhalenda server
    pub api_url: String,
    /// Session token issued by the identity provider, if signed in
    pub session: Option<String>,
    /// Directory holding the local event list
    pub data_dir: PathBuf,
    /// Time zone used to decide which day is "today"
    pub timezone: Tz,
    /// Locale for user-visible messages
    pub locale: String,
    /// Timeout for each request to the server, in milliseconds
    pub http_timeout_ms: u64,
}

impl ClientConfig {
    /// Load client configuration from the environment
    pub fn load() -> AppResult<Self> {
        dotenv().ok();

        let api_url = env::var("IKHALENDA_API_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .trim_end_matches('/')
            .to_string();

        let session = env::var("IKHALENDA_SESSION")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let data_dir = env::var("IKHALENDA_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".ikhalenda"));

        let timezone_str = env::var("TIMEZONE").unwrap_or_else(|_| String::from("Africa/Johannesburg"));
        let timezone: Tz = timezone_str
            .parse()
            .map_err(|_| config_error(&format!("Invalid TIMEZONE: {}", timezone_str)))?;

        let locale = env::var("LOCALE").unwrap_or_else(|_| "xh".to_string());

        let http_timeout_ms = match env::var("HTTP_TIMEOUT_MS") {
            Ok(ms) => ms
                .parse::<u64>()
                .map_err(|_| config_error("Invalid HTTP_TIMEOUT_MS format"))?,
            Err(_) => DEFAULT_HTTP_TIMEOUT_MS,
        };

        Ok(ClientConfig {
            api_url,
            session,
            data_dir,
            timezone,
            locale,
            http_timeout_ms,
        })
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }
}
