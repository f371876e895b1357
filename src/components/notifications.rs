use crate::error::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

/// A user-visible message raised by background work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn new(level: Level, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn connected() -> Self {
        Self::new(Level::Success, t!("connected_title"), t!("connected"))
    }

    pub fn connect_failed(error: &Error) -> Self {
        let message = t!("connect_failed", error = error.to_string());
        Self::new(Level::Error, t!("connect_failed_title"), message)
    }

    pub fn connect_timed_out() -> Self {
        Self::new(Level::Warning, t!("connect_failed_title"), t!("connect_timed_out"))
    }

    pub fn sign_in_required() -> Self {
        Self::new(Level::Error, t!("sign_in_required_title"), t!("sign_in_required"))
    }

    pub fn synced() -> Self {
        Self::new(Level::Success, t!("sync_success_title"), t!("sync_success"))
    }

    /// The local save stands; only the remote copy is missing
    pub fn sync_failed(error: &Error) -> Self {
        let message = t!("sync_failed", error = error.to_string());
        Self::new(Level::Warning, t!("sync_failed_title"), message)
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match self.level {
            Level::Info => "i",
            Level::Success => "+",
            Level::Warning => "!",
            Level::Error => "x",
        };
        write!(f, "[{}] {}: {}", marker, self.title, self.message)
    }
}
