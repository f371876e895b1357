use crate::components::events::Event;
use crate::error::AppResult;
use crate::utils::time::event_window;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored Google credentials for one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub user_id: String,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl TokenRecord {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

/// Response of the Google token endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// Body of `POST /sync`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncRequest {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

impl From<&Event> for SyncRequest {
    fn from(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            description: event.description.clone(),
            date: event.date.clone(),
            time: event.time.clone(),
        }
    }
}

/// Successful response of `POST /sync`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    pub success: bool,
    pub event_id: String,
    pub message: String,
}

/// Response of `GET /oauth/authorize`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUrlResponse {
    pub auth_url: String,
}

/// Response of `GET /oauth/status`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConnectionStatus {
    pub connected: bool,
}

/// Error body returned by every endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Start or end of a Google Calendar event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    pub date_time: String,
    pub time_zone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderOverride {
    pub method: String,
    pub minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminders {
    pub use_default: bool,
    pub overrides: Vec<ReminderOverride>,
}

/// Event resource sent to the Calendar API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoogleEvent {
    pub summary: String,
    pub description: String,
    pub start: EventDateTime,
    pub end: EventDateTime,
    pub reminders: Reminders,
}

impl GoogleEvent {
    /// Build the provider payload; times are sent as UTC
    pub fn from_request(request: &SyncRequest) -> AppResult<Self> {
        let (start, end) = event_window(&request.date, request.time.as_deref())?;

        Ok(Self {
            summary: request.title.clone(),
            description: request.description.clone().unwrap_or_default(),
            start: EventDateTime {
                date_time: start,
                time_zone: "UTC".to_string(),
            },
            end: EventDateTime {
                date_time: end,
                time_zone: "UTC".to_string(),
            },
            reminders: Reminders {
                use_default: false,
                overrides: vec![
                    ReminderOverride {
                        method: "email".to_string(),
                        minutes: 24 * 60,
                    },
                    ReminderOverride {
                        method: "popup".to_string(),
                        minutes: 30,
                    },
                ],
            },
        })
    }
}

/// The part of the Calendar API response we keep
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedEvent {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_google_event_payload_shape() {
        let request = SyncRequest {
            title: "Meeting".to_string(),
            description: None,
            date: "2025-03-15".to_string(),
            time: Some("14:30".to_string()),
        };

        let payload = serde_json::to_value(GoogleEvent::from_request(&request).unwrap()).unwrap();
        assert_eq!(
            payload,
            json!({
                "summary": "Meeting",
                "description": "",
                "start": { "dateTime": "2025-03-15T14:30:00", "timeZone": "UTC" },
                "end": { "dateTime": "2025-03-15T15:30:00", "timeZone": "UTC" },
                "reminders": {
                    "useDefault": false,
                    "overrides": [
                        { "method": "email", "minutes": 1440 },
                        { "method": "popup", "minutes": 30 }
                    ]
                }
            })
        );
    }

    #[test]
    fn test_sync_response_uses_camel_case() {
        let response = SyncResponse {
            success: true,
            event_id: "abc".to_string(),
            message: "ok".to_string(),
        };
        let value = serde_json::to_value(response).unwrap();
        assert_eq!(value["eventId"], "abc");
    }

    #[test]
    fn test_token_record_expiry() {
        let now = Utc::now();
        let record = TokenRecord {
            user_id: "user".to_string(),
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            expires_at: now - chrono::Duration::seconds(1),
        };
        assert!(record.is_expired(now));
        assert!(!TokenRecord { expires_at: now + chrono::Duration::hours(1), ..record }.is_expired(now));
    }
}
