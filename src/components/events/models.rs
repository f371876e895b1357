use crate::error::{AppResult, Error};
use crate::utils::time::{parse_date, parse_time};
use serde::{Deserialize, Serialize};

/// A locally stored calendar event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    /// ISO date, `YYYY-MM-DD`
    pub date: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Local time, `HH:MM`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

/// An event as submitted by the user, before it gets an id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    pub date: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

impl NewEvent {
    pub fn new(date: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Trim the text fields and check the date and time formats.
    ///
    /// Blank descriptions and times are dropped rather than rejected.
    pub fn validate(self) -> AppResult<NewEvent> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(Error::InvalidEvent("Title must not be empty".to_string()));
        }

        if parse_date(&self.date).is_none() {
            return Err(Error::InvalidEvent(format!("Invalid date: {}", self.date)));
        }

        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        let time = match self.time.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()) {
            Some(t) if t.len() == 5 && parse_time(&t).is_some() => Some(t),
            Some(t) => return Err(Error::InvalidEvent(format!("Invalid time: {}", t))),
            None => None,
        };

        Ok(NewEvent {
            date: self.date,
            title,
            description,
            time,
        })
    }

    pub(crate) fn into_event(self, id: String) -> Event {
        Event {
            id,
            date: self.date,
            title: self.title,
            description: self.description,
            time: self.time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_trims_and_drops_blanks() {
        let event = NewEvent::new("2025-03-15", "  Meeting ")
            .with_description("   ")
            .with_time("")
            .validate()
            .unwrap();

        assert_eq!(event.title, "Meeting");
        assert_eq!(event.description, None);
        assert_eq!(event.time, None);
    }

    #[test]
    fn test_validate_rejects_empty_title() {
        let result = NewEvent::new("2025-03-15", "   ").validate();
        assert!(matches!(result, Err(Error::InvalidEvent(_))));
    }

    #[test]
    fn test_validate_rejects_malformed_date_and_time() {
        assert!(NewEvent::new("2025-3-15", "Meeting").validate().is_err());
        assert!(NewEvent::new("2025-03-15", "Meeting").with_time("9:30").validate().is_err());
        assert!(NewEvent::new("2025-03-15", "Meeting").with_time("14:75").validate().is_err());
    }

    #[test]
    fn test_optional_fields_are_omitted_in_json() {
        let event = NewEvent::new("2025-03-15", "Meeting").into_event("abc".to_string());
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"id":"abc","date":"2025-03-15","title":"Meeting"}"#);
    }
}
