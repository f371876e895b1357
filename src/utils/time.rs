use crate::error::{AppResult, Error};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Format used for stored event dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Format used for provider `dateTime` values
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parse time string in HH:MM format
pub fn parse_time(time_str: &str) -> Option<(u32, u32)> {
    let parts: Vec<&str> = time_str.split(':').collect();
    if parts.len() != 2 {
        return None;
    }
    let hour = parts[0].parse::<u32>().ok()?;
    let minute = parts[1].parse::<u32>().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some((hour, minute))
}

/// Parse an ISO `YYYY-MM-DD` date
pub fn parse_date(date_str: &str) -> Option<NaiveDate> {
    // chrono accepts unpadded fields, stored dates must be exactly 10 chars
    if date_str.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(date_str, DATE_FORMAT).ok()
}

/// Format a date the way events store it
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// First day of the month `offset` months away from `date`'s month
pub fn shift_month(date: NaiveDate, offset: i32) -> NaiveDate {
    let months = date.year() * 12 + date.month0() as i32 + offset;
    let year = months.div_euclid(12);
    let month0 = months.rem_euclid(12) as u32;
    // Day 1 exists in every month of every representable year
    NaiveDate::from_ymd_opt(year, month0 + 1, 1).unwrap_or(date)
}

/// Number of days in the month containing `date`
pub fn days_in_month(date: NaiveDate) -> u32 {
    let first = shift_month(date, 0);
    let next = shift_month(date, 1);
    next.signed_duration_since(first).num_days() as u32
}

/// Start and end of a synced event as provider `dateTime` strings.
///
/// Without a time the event occupies 09:00-10:00. With a time the event
/// lasts one hour and the end carries into the next hour or day.
pub fn event_window(date: &str, time: Option<&str>) -> AppResult<(String, String)> {
    let day = parse_date(date).ok_or_else(|| Error::InvalidEvent(format!("Invalid date: {}", date)))?;

    let (hour, minute) = match time {
        Some(t) => parse_time(t).ok_or_else(|| Error::InvalidEvent(format!("Invalid time: {}", t)))?,
        None => (9, 0),
    };

    let start_time = NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or_else(|| Error::InvalidEvent("Failed to create time".to_string()))?;
    let start = NaiveDateTime::new(day, start_time);
    let end = start + Duration::hours(1);

    Ok((
        start.format(DATE_TIME_FORMAT).to_string(),
        end.format(DATE_TIME_FORMAT).to_string(),
    ))
}
