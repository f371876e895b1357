use super::models::SyncRequest;
use crate::client::ServerApi;
use crate::components::events::Event;
use crate::components::notifications::Notification;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Pushes freshly saved events to the server in the background
#[derive(Clone)]
pub struct SyncDispatcher {
    api: Arc<dyn ServerApi>,
    notifications: mpsc::UnboundedSender<Notification>,
}

impl SyncDispatcher {
    pub fn new(api: Arc<dyn ServerApi>, notifications: mpsc::UnboundedSender<Notification>) -> Self {
        Self { api, notifications }
    }

    /// Sync one event without waiting for the result.
    ///
    /// The outcome arrives as a notification. The returned handle only
    /// exists so callers that want to can await completion.
    pub fn dispatch(&self, session: &str, event: &Event) -> JoinHandle<()> {
        let api = self.api.clone();
        let notifications = self.notifications.clone();
        let session = session.to_string();
        let request = SyncRequest::from(event);

        tokio::spawn(async move {
            let notification = match api.sync_event(&session, &request).await {
                Ok(response) => {
                    info!("Event '{}' synced as {}", request.title, response.event_id);
                    Notification::synced()
                }
                Err(e) => {
                    warn!("Event '{}' saved locally but not synced: {}", request.title, e);
                    Notification::sync_failed(&e)
                }
            };
            let _ = notifications.send(notification);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::google_calendar::models::SyncResponse;
    use crate::components::notifications::Level;
    use crate::error::{AppResult, Error};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeApi {
        result: fn() -> AppResult<SyncResponse>,
        seen: Mutex<Vec<SyncRequest>>,
    }

    #[async_trait]
    impl ServerApi for FakeApi {
        async fn auth_url(&self, _session: &str) -> AppResult<String> {
            Err(Error::Other("unused".to_string()))
        }

        async fn is_connected(&self, _session: &str) -> AppResult<bool> {
            Ok(true)
        }

        async fn sync_event(&self, _session: &str, request: &SyncRequest) -> AppResult<SyncResponse> {
            self.seen.lock().unwrap().push(request.clone());
            (self.result)()
        }
    }

    fn event() -> Event {
        Event {
            id: "e1".to_string(),
            date: "2025-03-15".to_string(),
            title: "Meeting".to_string(),
            description: None,
            time: Some("14:30".to_string()),
        }
    }

    #[tokio::test]
    async fn test_success_notifies() {
        let api = Arc::new(FakeApi {
            result: || {
                Ok(SyncResponse {
                    success: true,
                    event_id: "g1".to_string(),
                    message: "Event synced to Google Calendar".to_string(),
                })
            },
            seen: Mutex::new(Vec::new()),
        });
        let (tx, mut rx) = mpsc::unbounded_channel();

        SyncDispatcher::new(api.clone(), tx)
            .dispatch("session", &event())
            .await
            .unwrap();

        assert_eq!(rx.recv().await.unwrap().level, Level::Success);
        let seen = api.seen.lock().unwrap();
        assert_eq!(seen[0].time.as_deref(), Some("14:30"));
    }

    #[tokio::test]
    async fn test_failure_becomes_warning() {
        let api = Arc::new(FakeApi {
            result: || Err(Error::NotConnected),
            seen: Mutex::new(Vec::new()),
        });
        let (tx, mut rx) = mpsc::unbounded_channel();

        SyncDispatcher::new(api, tx)
            .dispatch("session", &event())
            .await
            .unwrap();

        let notification = rx.recv().await.unwrap();
        assert_eq!(notification.level, Level::Warning);
    }
}
