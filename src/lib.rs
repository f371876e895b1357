#[macro_use]
extern crate rust_i18n;

pub mod app;
pub mod auth;
pub mod client;
pub mod components;
pub mod config;
pub mod error;
#[cfg(feature = "server")]
pub mod server;
pub mod shutdown;
pub mod startup;
pub mod utils;

// Initialize i18n
i18n!("locales", fallback = "en");
