use miette::Diagnostic;
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Unauthorized")]
    #[diagnostic(code(ikhalenda::unauthorized), help("Sign in and pass the session as a bearer token"))]
    Unauthorized,

    #[error("Missing user state")]
    #[diagnostic(code(ikhalenda::oauth::missing_state))]
    MissingState,

    #[error("Invalid OAuth state: {0}")]
    #[diagnostic(code(ikhalenda::oauth::invalid_state))]
    InvalidState(String),

    #[error("Failed to exchange code for tokens: {0}")]
    #[diagnostic(code(ikhalenda::oauth::exchange_failed))]
    ExchangeFailed(String),

    #[error("Google Calendar not connected. Please connect first.")]
    #[diagnostic(code(ikhalenda::sync::not_connected))]
    NotConnected,

    #[error("Failed to refresh access token: {0}")]
    #[diagnostic(code(ikhalenda::sync::refresh_failed))]
    RefreshFailed(String),

    #[error("Failed to create calendar event: {0}")]
    #[diagnostic(code(ikhalenda::sync::sync_failed))]
    SyncFailed(String),

    #[error("Invalid event: {0}")]
    #[diagnostic(code(ikhalenda::events::invalid))]
    InvalidEvent(String),

    #[error("Storage error: {0}")]
    #[diagnostic(code(ikhalenda::storage))]
    Storage(String),

    #[error("Environment error: {0}")]
    #[diagnostic(code(ikhalenda::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(ikhalenda::config))]
    Config(String),

    #[error("HTTP error: {0}")]
    #[diagnostic(code(ikhalenda::http))]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    #[diagnostic(code(ikhalenda::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(ikhalenda::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(ikhalenda::other))]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type AppResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create storage errors
pub fn storage_error(message: &str) -> Error {
    Error::Storage(message.to_string())
}
