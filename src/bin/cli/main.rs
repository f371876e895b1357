#[macro_use]
extern crate rust_i18n;

mod render;

use chrono::{NaiveDate, Utc};
use clap::Parser;
use ikhalenda::app::App;
use ikhalenda::client::ApiClient;
use ikhalenda::components::events::{FileStorage, NewEvent};
use ikhalenda::components::google_calendar::{BrowserOpener, ConnectOutcome, ConnectionState};
use ikhalenda::config::ClientConfig;
use ikhalenda::error::Error;
use ikhalenda::startup;
use ikhalenda::utils::time::parse_date;
use std::sync::Arc;

// Initialize i18n
i18n!("locales", fallback = "en");

#[derive(Debug, clap::Parser)]
#[clap(name = "ikhalenda-cli", about = "Ikhalenda, the isiXhosa calendar")]
struct Args {
    #[clap(subcommand)]
    cmd: Cmd,
}

#[derive(Debug, clap::Parser)]
enum Cmd {
    /// Show a month grid
    Month {
        /// Months away from the current one
        #[clap(long, default_value_t = 0, allow_negative_numbers = true)]
        offset: i32,
    },
    /// Show the events of one day
    Day {
        /// `today`, `yesterday`, `tomorrow` or a YYYY-MM-DD date
        #[clap(default_value = "today")]
        when: String,
    },
    /// Add an event, syncing it when Google Calendar is connected
    Add {
        #[clap(long)]
        date: String,
        #[clap(long)]
        title: String,
        /// HH:MM
        #[clap(long)]
        time: Option<String>,
        #[clap(long)]
        description: Option<String>,
    },
    /// Delete an event by id
    Delete { id: String },
    /// Connect Google Calendar
    Connect,
    /// Show whether Google Calendar is connected
    Status,
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    startup::init_logging("warn")?;

    let args = Args::parse();
    let config = ClientConfig::load()?;
    ikhalenda::utils::i18n::set_locale(&config.locale);

    let today = Utc::now().with_timezone(&config.timezone).date_naive();
    let mut app = App::new(
        today,
        Arc::new(FileStorage::new(&config.data_dir)),
        config.session.clone(),
        Arc::new(ApiClient::new(&config.api_url, config.http_timeout())?),
        Arc::new(BrowserOpener),
    );

    match args.cmd {
        Cmd::Month { offset } => {
            app.shift_months(offset);
            print!("{}", render::month(&app));
        }
        Cmd::Day { when } => {
            match when.as_str() {
                "today" => app.go_today(),
                "yesterday" => app.go_yesterday(),
                "tomorrow" => app.go_tomorrow(),
                other => app.go_to(parse_day(other)?),
            }
            print!("{}", render::month(&app));
            println!();
            print!("{}", render::day(&app));
        }
        Cmd::Add {
            date,
            title,
            time,
            description,
        } => {
            if app.is_signed_in() {
                app.refresh_connection().await;
            }

            let mut new_event = NewEvent::new(date, title);
            if let Some(time) = time {
                new_event = new_event.with_time(time);
            }
            if let Some(description) = description {
                new_event = new_event.with_description(description);
            }

            let (event, sync) = app.add_event(new_event)?;
            println!("{}: {}", t!("event_added"), render::event_line(&event));

            if let Some(sync) = sync {
                // The process exits after this command, so wait for the sync here
                let _ = sync.await;
            }
        }
        Cmd::Delete { id } => {
            if app.events().get(&id).is_none() {
                println!("{}", t!("event_not_found", id = id));
            } else {
                app.delete_event(&id)?;
                println!("{}", t!("event_deleted"));
            }
        }
        Cmd::Connect => {
            if app.is_signed_in() {
                println!("{}", t!("connect_opening"));
            }
            match app.begin_connect().await {
                Ok(attempt) => {
                    if attempt.state() == ConnectionState::Authorizing {
                        println!("{}", t!("connect_waiting"));
                    }
                    if app.finish_connect(attempt).await == ConnectOutcome::Cancelled {
                        println!("{}", t!("connect_cancelled"));
                    }
                }
                // Already reported through a notification
                Err(e) => tracing::debug!("Connect failed: {}", e),
            }
        }
        Cmd::Status => {
            let status = match app.refresh_connection().await {
                ConnectionState::Connected => t!("status_connected"),
                _ => t!("status_disconnected"),
            };
            println!("{}", status);
        }
    }

    for notification in app.drain_notifications() {
        println!("{}", notification);
    }

    Ok(())
}

fn parse_day(value: &str) -> Result<NaiveDate, Error> {
    parse_date(value).ok_or_else(|| Error::InvalidEvent(format!("Invalid date: {}", value)))
}
