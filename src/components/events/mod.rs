pub mod models;
pub mod storage;

pub use models::{Event, NewEvent};
pub use storage::{FileStorage, LocalStorage, MemoryStorage};

use crate::error::AppResult;
use std::sync::Arc;
use tracing::{debug, warn};

/// Storage key holding the serialized event list
pub const EVENTS_KEY: &str = "ikhalenda_events";

/// Ordered list of local events, written through to storage on every change
pub struct EventStore {
    events: Vec<Event>,
    storage: Arc<dyn LocalStorage>,
}

impl EventStore {
    /// Load the stored event list.
    ///
    /// A missing or unreadable payload yields an empty store.
    pub fn load(storage: Arc<dyn LocalStorage>) -> Self {
        let events = match storage.get(EVENTS_KEY) {
            Ok(Some(payload)) => match serde_json::from_str::<Vec<Event>>(&payload) {
                Ok(events) => events,
                Err(e) => {
                    warn!("Failed to parse stored events, starting empty: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to read stored events, starting empty: {}", e);
                Vec::new()
            }
        };

        debug!("Loaded {} events", events.len());
        Self { events, storage }
    }

    /// Validate, assign a fresh id and append the event.
    ///
    /// The event stays in memory even when persisting fails; the error is
    /// still returned so the caller can tell the user.
    pub fn add(&mut self, new_event: NewEvent) -> AppResult<Event> {
        let new_event = new_event.validate()?;

        let mut id = uuid::Uuid::new_v4().to_string();
        while self.events.iter().any(|e| e.id == id) {
            id = uuid::Uuid::new_v4().to_string();
        }

        let event = new_event.into_event(id);
        self.events.push(event.clone());
        self.persist()?;

        Ok(event)
    }

    /// Remove the event with `id`; unknown ids are ignored
    pub fn delete(&mut self, id: &str) -> AppResult<()> {
        let before = self.events.len();
        self.events.retain(|e| e.id != id);
        if self.events.len() == before {
            debug!("No event with id {} to delete", id);
        }
        self.persist()
    }

    /// Events whose date string equals `date`, in insertion order
    pub fn list_for_date(&self, date: &str) -> Vec<&Event> {
        self.events.iter().filter(|e| e.date == date).collect()
    }

    pub fn has_events_on(&self, date: &str) -> bool {
        self.events.iter().any(|e| e.date == date)
    }

    pub fn get(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn all(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn persist(&self) -> AppResult<()> {
        let payload = serde_json::to_string(&self.events)?;
        self.storage.set(EVENTS_KEY, &payload)
    }
}
