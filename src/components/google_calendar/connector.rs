use crate::client::ServerApi;
use crate::error::{AppResult, Error};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const POLL_INTERVAL: Duration = Duration::from_secs(2);
const POLL_TIMEOUT: Duration = Duration::from_secs(120);

/// Connection state as seen by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Authorizing,
    Connected,
}

/// How a connect attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectOutcome {
    Connected,
    TimedOut,
    Cancelled,
}

/// Opens the consent URL for the user
pub trait UrlOpener: Send + Sync {
    fn open(&self, url: &str) -> AppResult<()>;
}

/// Opens URLs in the system browser
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserOpener;

impl UrlOpener for BrowserOpener {
    fn open(&self, url: &str) -> AppResult<()> {
        webbrowser::open(url)?;
        Ok(())
    }
}

/// Drives the client side of the Google connect flow
#[derive(Clone)]
pub struct Connector {
    api: Arc<dyn ServerApi>,
    opener: Arc<dyn UrlOpener>,
    poll_interval: Duration,
    timeout: Duration,
}

impl Connector {
    pub fn new(api: Arc<dyn ServerApi>, opener: Arc<dyn UrlOpener>) -> Self {
        Self {
            api,
            opener,
            poll_interval: POLL_INTERVAL,
            timeout: POLL_TIMEOUT,
        }
    }

    pub fn with_timing(mut self, poll_interval: Duration, timeout: Duration) -> Self {
        self.poll_interval = poll_interval;
        self.timeout = timeout;
        self
    }

    /// Start connecting the signed-in user's Google Calendar.
    ///
    /// Fetches the consent URL from the server, opens it, then polls the
    /// connection status in the background until it flips, the timeout
    /// passes or the attempt is cancelled.
    pub async fn begin_connect(&self, session: Option<&str>) -> AppResult<ConnectAttempt> {
        let session = session.ok_or(Error::Unauthorized)?.to_string();

        let auth_url = self.api.auth_url(&session).await?;
        self.opener.open(&auth_url)?;
        info!("Opened Google consent page, waiting for authorization");

        let (state_tx, state_rx) = watch::channel(ConnectionState::Authorizing);
        let cancel = CancellationToken::new();

        let task = tokio::spawn(poll_connection(
            self.api.clone(),
            session,
            self.poll_interval,
            self.timeout,
            state_tx,
            cancel.clone(),
        ));

        Ok(ConnectAttempt {
            state: state_rx,
            cancel,
            task: Some(task),
        })
    }
}

async fn poll_connection(
    api: Arc<dyn ServerApi>,
    session: String,
    poll_interval: Duration,
    timeout: Duration,
    state_tx: watch::Sender<ConnectionState>,
    cancel: CancellationToken,
) -> ConnectOutcome {
    let mut ticker = interval_at(Instant::now() + poll_interval, poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let deadline = sleep(timeout);
    tokio::pin!(deadline);

    let outcome = loop {
        tokio::select! {
            _ = cancel.cancelled() => break ConnectOutcome::Cancelled,
            _ = &mut deadline => break ConnectOutcome::TimedOut,
            _ = ticker.tick() => {
                match api.is_connected(&session).await {
                    Ok(true) => break ConnectOutcome::Connected,
                    Ok(false) => debug!("Google Calendar not connected yet"),
                    // Transient; keep polling until the deadline
                    Err(e) => warn!("Connection status check failed: {}", e),
                }
            }
        }
    };

    let state = match outcome {
        ConnectOutcome::Connected => ConnectionState::Connected,
        ConnectOutcome::TimedOut | ConnectOutcome::Cancelled => ConnectionState::Disconnected,
    };
    info!("Connect attempt finished: {:?}", outcome);
    let _ = state_tx.send(state);

    outcome
}

/// A running connect attempt; dropping it stops the polling
pub struct ConnectAttempt {
    state: watch::Receiver<ConnectionState>,
    cancel: CancellationToken,
    task: Option<JoinHandle<ConnectOutcome>>,
}

impl ConnectAttempt {
    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Watch state changes, e.g. to redraw a status line
    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.state.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Wait for the attempt to finish
    pub async fn wait(mut self) -> ConnectOutcome {
        match self.task.take() {
            Some(task) => task.await.unwrap_or(ConnectOutcome::Cancelled),
            None => ConnectOutcome::Cancelled,
        }
    }
}

impl Drop for ConnectAttempt {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
