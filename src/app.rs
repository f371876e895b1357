use crate::client::ServerApi;
use crate::components::calendar::{CalendarState, GridCell, MonthHeader, SelectedDayInfo};
use crate::components::events::{Event, EventStore, LocalStorage, NewEvent};
use crate::components::google_calendar::{
    ConnectAttempt, ConnectOutcome, ConnectionState, Connector, SyncDispatcher, UrlOpener,
};
use crate::components::notifications::Notification;
use crate::error::{AppResult, Error};
use crate::utils::time::format_date;
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Everything the calendar UI works with
pub struct App {
    calendar: CalendarState,
    events: EventStore,
    connection: ConnectionState,
    session: Option<String>,
    api: Arc<dyn ServerApi>,
    connector: Connector,
    dispatcher: SyncDispatcher,
    notifier: mpsc::UnboundedSender<Notification>,
    notifications: mpsc::UnboundedReceiver<Notification>,
}

impl App {
    pub fn new(
        today: NaiveDate,
        storage: Arc<dyn LocalStorage>,
        session: Option<String>,
        api: Arc<dyn ServerApi>,
        opener: Arc<dyn UrlOpener>,
    ) -> Self {
        let (notifier, notifications) = mpsc::unbounded_channel();

        Self {
            calendar: CalendarState::new(today),
            events: EventStore::load(storage),
            connection: ConnectionState::Disconnected,
            session,
            connector: Connector::new(api.clone(), opener),
            dispatcher: SyncDispatcher::new(api.clone(), notifier.clone()),
            api,
            notifier,
            notifications,
        }
    }

    /// Replace the connector, e.g. to shorten its polling in tests
    pub fn with_connector(mut self, connector: Connector) -> Self {
        self.connector = connector;
        self
    }

    pub fn calendar(&self) -> &CalendarState {
        &self.calendar
    }

    pub fn events(&self) -> &EventStore {
        &self.events
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    pub fn grid(&self) -> Vec<GridCell> {
        self.calendar.grid(&self.events)
    }

    pub fn header(&self) -> MonthHeader {
        self.calendar.header()
    }

    pub fn selected_info(&self) -> Option<SelectedDayInfo> {
        self.calendar.selected_info()
    }

    /// Events on the selected day
    pub fn selected_events(&self) -> Vec<&Event> {
        match self.calendar.selected() {
            Some(date) => self.events.list_for_date(&format_date(date)),
            None => Vec::new(),
        }
    }

    pub fn next_month(&mut self) {
        self.calendar = self.calendar.next_month();
    }

    pub fn previous_month(&mut self) {
        self.calendar = self.calendar.previous_month();
    }

    /// Show the month `offset` months away from the current one
    pub fn shift_months(&mut self, offset: i32) {
        for _ in 0..offset.unsigned_abs() {
            if offset > 0 {
                self.next_month();
            } else {
                self.previous_month();
            }
        }
    }

    /// Select a day in the displayed month
    pub fn select(&mut self, date: NaiveDate) {
        self.calendar = self.calendar.select(date);
    }

    /// Show the month of `date` and select it
    pub fn go_to(&mut self, date: NaiveDate) {
        self.calendar = self.calendar.go_to(date);
    }

    pub fn go_today(&mut self) {
        self.calendar = self.calendar.go_today();
    }

    pub fn go_yesterday(&mut self) {
        self.calendar = self.calendar.go_yesterday();
    }

    pub fn go_tomorrow(&mut self) {
        self.calendar = self.calendar.go_tomorrow();
    }

    /// Save an event locally, then sync it in the background when connected.
    ///
    /// The returned handle is `Some` only when a sync was started.
    pub fn add_event(&mut self, new_event: NewEvent) -> AppResult<(Event, Option<JoinHandle<()>>)> {
        let event = self.events.add(new_event)?;
        info!("Added event {} on {}", event.id, event.date);

        let sync = match (&self.session, self.connection) {
            (Some(session), ConnectionState::Connected) => {
                Some(self.dispatcher.dispatch(session, &event))
            }
            _ => None,
        };

        Ok((event, sync))
    }

    pub fn delete_event(&mut self, id: &str) -> AppResult<()> {
        self.events.delete(id)
    }

    /// Ask the server whether the user's calendar is connected
    pub async fn refresh_connection(&mut self) -> ConnectionState {
        let Some(session) = &self.session else {
            self.connection = ConnectionState::Disconnected;
            return self.connection;
        };

        self.connection = match self.api.is_connected(session).await {
            Ok(true) => ConnectionState::Connected,
            Ok(false) => ConnectionState::Disconnected,
            Err(e) => {
                warn!("Could not check Google Calendar connection: {}", e);
                ConnectionState::Disconnected
            }
        };
        self.connection
    }

    /// Open the consent page and start waiting for the connection
    pub async fn begin_connect(&mut self) -> AppResult<ConnectAttempt> {
        if self.session.is_none() {
            self.notify(Notification::sign_in_required());
            return Err(Error::Unauthorized);
        }

        self.connection = ConnectionState::Authorizing;
        match self.connector.begin_connect(self.session.as_deref()).await {
            Ok(attempt) => Ok(attempt),
            Err(e) => {
                self.connection = ConnectionState::Disconnected;
                self.notify(Notification::connect_failed(&e));
                Err(e)
            }
        }
    }

    /// Wait for a started attempt and record how it ended
    pub async fn finish_connect(&mut self, attempt: ConnectAttempt) -> ConnectOutcome {
        let outcome = attempt.wait().await;
        match outcome {
            ConnectOutcome::Connected => {
                self.connection = ConnectionState::Connected;
                self.notify(Notification::connected());
            }
            ConnectOutcome::TimedOut => {
                self.connection = ConnectionState::Disconnected;
                self.notify(Notification::connect_timed_out());
            }
            ConnectOutcome::Cancelled => {
                self.connection = ConnectionState::Disconnected;
            }
        }
        outcome
    }

    /// Run the connect flow to completion
    pub async fn connect(&mut self) -> AppResult<ConnectOutcome> {
        let attempt = self.begin_connect().await?;
        Ok(self.finish_connect(attempt).await)
    }

    /// Take every notification raised so far
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        let mut drained = Vec::new();
        while let Ok(notification) = self.notifications.try_recv() {
            drained.push(notification);
        }
        drained
    }

    fn notify(&self, notification: Notification) {
        let _ = self.notifier.send(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::events::MemoryStorage;
    use crate::components::google_calendar::models::{SyncRequest, SyncResponse};
    use crate::components::notifications::Level;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    struct FakeApi {
        connected: AtomicBool,
        syncs: AtomicUsize,
    }

    #[async_trait]
    impl ServerApi for FakeApi {
        async fn auth_url(&self, _session: &str) -> AppResult<String> {
            self.connected.store(true, Ordering::SeqCst);
            Ok("https://consent.example".to_string())
        }

        async fn is_connected(&self, _session: &str) -> AppResult<bool> {
            Ok(self.connected.load(Ordering::SeqCst))
        }

        async fn sync_event(&self, _session: &str, _request: &SyncRequest) -> AppResult<SyncResponse> {
            self.syncs.fetch_add(1, Ordering::SeqCst);
            if self.connected.load(Ordering::SeqCst) {
                Ok(SyncResponse {
                    success: true,
                    event_id: "g1".to_string(),
                    message: "Event synced to Google Calendar".to_string(),
                })
            } else {
                Err(Error::NotConnected)
            }
        }
    }

    struct NoopOpener;

    impl UrlOpener for NoopOpener {
        fn open(&self, _url: &str) -> AppResult<()> {
            Ok(())
        }
    }

    fn app(session: Option<&str>, connected: bool) -> (App, Arc<FakeApi>) {
        let api = Arc::new(FakeApi {
            connected: AtomicBool::new(connected),
            syncs: AtomicUsize::new(0),
        });
        let today = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        let app = App::new(
            today,
            Arc::new(MemoryStorage::new()),
            session.map(str::to_string),
            api.clone(),
            Arc::new(NoopOpener),
        );
        let connector = Connector::new(api.clone(), Arc::new(NoopOpener))
            .with_timing(Duration::from_millis(5), Duration::from_millis(200));
        (app.with_connector(connector), api)
    }

    fn meeting() -> NewEvent {
        NewEvent::new("2025-03-15", "Meeting").with_time("14:30")
    }

    #[tokio::test]
    async fn test_add_without_connection_only_saves_locally() {
        let (mut app, api) = app(Some("session"), false);
        app.refresh_connection().await;

        let (event, sync) = app.add_event(meeting()).unwrap();

        assert!(sync.is_none());
        assert_eq!(app.selected_events(), vec![&event]);
        assert_eq!(api.syncs.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_add_when_connected_syncs_in_background() {
        let (mut app, api) = app(Some("session"), true);
        assert_eq!(app.refresh_connection().await, ConnectionState::Connected);

        let (_, sync) = app.add_event(meeting()).unwrap();
        sync.unwrap().await.unwrap();

        assert_eq!(api.syncs.load(Ordering::SeqCst), 1);
        let notifications = app.drain_notifications();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].level, Level::Success);
    }

    #[tokio::test]
    async fn test_sync_failure_keeps_local_event() {
        let (mut app, api) = app(Some("session"), true);
        app.refresh_connection().await;
        // Server lost the record after the status check
        api.connected.store(false, Ordering::SeqCst);

        let (event, sync) = app.add_event(meeting()).unwrap();
        sync.unwrap().await.unwrap();

        assert!(app.events().get(&event.id).is_some());
        let notifications = app.drain_notifications();
        assert_eq!(notifications[0].level, Level::Warning);
    }

    #[tokio::test]
    async fn test_connect_without_session() {
        let (mut app, _) = app(None, false);

        assert!(matches!(app.connect().await, Err(Error::Unauthorized)));
        assert_eq!(app.connection(), ConnectionState::Disconnected);
        assert_eq!(app.drain_notifications()[0].level, Level::Error);
    }

    #[tokio::test]
    async fn test_connect_flow() {
        let (mut app, _) = app(Some("session"), false);

        assert_eq!(app.connect().await.unwrap(), ConnectOutcome::Connected);
        assert_eq!(app.connection(), ConnectionState::Connected);
    }

    #[tokio::test]
    async fn test_attempt_is_authorizing_until_finished() {
        let (app, api) = app(Some("session"), false);
        let mut app = app.with_connector(
            Connector::new(api, Arc::new(NoopOpener))
                .with_timing(Duration::from_millis(200), Duration::from_secs(2)),
        );

        let attempt = app.begin_connect().await.unwrap();
        assert_eq!(attempt.state(), ConnectionState::Authorizing);
        assert_eq!(app.connection(), ConnectionState::Authorizing);

        assert_eq!(app.finish_connect(attempt).await, ConnectOutcome::Connected);
        assert_eq!(app.connection(), ConnectionState::Connected);
        assert_eq!(app.drain_notifications()[0].level, Level::Success);
    }

    #[test]
    fn test_navigation() {
        let (mut app, _) = app(None, false);
        app.shift_months(-3);
        assert_eq!(app.header().year, 2024);
        app.go_tomorrow();
        assert_eq!(
            app.calendar().selected(),
            NaiveDate::from_ymd_opt(2025, 3, 16)
        );
    }
}
