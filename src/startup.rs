use crate::config::Config;
use crate::error::Error;
use tracing::error;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging(default_filter: &str) -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the server config
pub fn load_config() -> miette::Result<Config> {
    match Config::load() {
        Ok(config) => Ok(config),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Wire the services together and run the HTTP server until a shutdown signal
#[cfg(feature = "server")]
pub async fn start_server(config: Config) -> miette::Result<()> {
    use crate::auth::SessionVerifier;
    use crate::components::google_calendar::{
        GoogleClient, OAuthService, StateSigner, SyncService, TokenManager,
    };
    use crate::components::redis_service::RedisActor;
    use crate::server::{self, AppState};
    use crate::shutdown;
    use std::net::SocketAddr;
    use std::sync::Arc;
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;
    use tracing::info;

    crate::utils::i18n::set_locale(&config.locale);
    info!("Setting locale to {}", config.locale);

    // Start the Redis actor
    let (mut redis_actor, redis_handle) = RedisActor::new(&config.redis_url)?;
    tokio::spawn(async move {
        redis_actor.run().await;
    });

    let tokens = TokenManager::new(Arc::new(redis_handle.clone()), GoogleClient::new(&config)?);
    let state = AppState {
        oauth: OAuthService::new(StateSigner::new(&config.oauth_state_secret), tokens.clone()),
        sync: SyncService::new(tokens),
        sessions: SessionVerifier::new(&config.session_secret),
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await.map_err(Error::from)?;
    info!("Redirect URI: {}", config.redirect_uri());

    // Set up signal handlers for graceful shutdown
    let (shutdown_send, shutdown_recv) = oneshot::channel();
    tokio::spawn(shutdown::handle_signals(shutdown_send, redis_handle));

    server::serve(listener, state, shutdown_recv)
        .await
        .map_err(Error::from)?;

    info!("Shutdown complete");
    Ok(())
}
