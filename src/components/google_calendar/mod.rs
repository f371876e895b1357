//! Google Calendar integration.
//!
//! Server side: consent URL issuing, OAuth callback handling, token storage
//! and refresh, event creation. Client side: the connect flow and background
//! sync of saved events.

pub mod connector;
pub mod dispatcher;
pub mod models;
pub mod oauth;
pub mod provider;
pub mod state;
pub mod store;
pub mod sync;
pub mod token;

pub use connector::{
    BrowserOpener, ConnectAttempt, ConnectOutcome, ConnectionState, Connector, UrlOpener,
};
pub use dispatcher::SyncDispatcher;
pub use models::{SyncRequest, SyncResponse, TokenRecord, TokenResponse};
pub use oauth::OAuthService;
pub use provider::GoogleClient;
pub use state::StateSigner;
pub use store::{InMemoryTokenStore, TokenStore};
pub use sync::SyncService;
pub use token::TokenManager;
