//! Month navigation and day selection.
//!
//! `CalendarState` is a plain value; every navigation step returns a new
//! state instead of mutating shared UI state.

mod grid;

pub use grid::{DayCell, GridCell};

use crate::components::events::EventStore;
use crate::utils::locale::{self, Season};
use crate::utils::time::{days_in_month, format_date, shift_month};
use chrono::{Datelike, Duration, NaiveDate};

/// Displayed month, selected day and the day considered "today"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarState {
    /// Always the first day of the displayed month
    displayed: NaiveDate,
    selected: Option<NaiveDate>,
    today: NaiveDate,
}

/// Heading shown above the grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthHeader {
    pub month_name: &'static str,
    pub year: i32,
    pub season: Option<&'static Season>,
}

/// Description of the selected day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedDayInfo {
    pub date: String,
    pub day_name: &'static str,
    pub day_number: u32,
    pub month_name: &'static str,
    pub year: i32,
}

impl CalendarState {
    /// Show the month of `today` with `today` selected
    pub fn new(today: NaiveDate) -> Self {
        Self {
            displayed: shift_month(today, 0),
            selected: Some(today),
            today,
        }
    }

    pub fn displayed_month(&self) -> NaiveDate {
        self.displayed
    }

    pub fn selected(&self) -> Option<NaiveDate> {
        self.selected
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn next_month(self) -> Self {
        Self {
            displayed: shift_month(self.displayed, 1),
            ..self
        }
    }

    pub fn previous_month(self) -> Self {
        Self {
            displayed: shift_month(self.displayed, -1),
            ..self
        }
    }

    pub fn select(self, date: NaiveDate) -> Self {
        Self {
            selected: Some(date),
            ..self
        }
    }

    pub fn clear_selection(self) -> Self {
        Self {
            selected: None,
            ..self
        }
    }

    /// Jump to a day and select it
    pub fn go_to(self, date: NaiveDate) -> Self {
        Self {
            displayed: shift_month(date, 0),
            selected: Some(date),
            ..self
        }
    }

    pub fn go_today(self) -> Self {
        self.go_to(self.today)
    }

    pub fn go_yesterday(self) -> Self {
        self.go_to(self.today - Duration::days(1))
    }

    pub fn go_tomorrow(self) -> Self {
        self.go_to(self.today + Duration::days(1))
    }

    /// Cells for the displayed month: leading blanks, then one cell per day
    pub fn grid(&self, events: &EventStore) -> Vec<GridCell> {
        let offset = self.displayed.weekday().num_days_from_sunday() as usize;
        let days = days_in_month(self.displayed);

        let mut cells = Vec::with_capacity(offset + days as usize);
        cells.extend(std::iter::repeat(GridCell::Blank).take(offset));

        for day in self.displayed.iter_days().take(days as usize) {
            let date = format_date(day);
            cells.push(GridCell::Day(DayCell {
                day: day.day(),
                is_today: day == self.today,
                is_selected: self.selected == Some(day),
                has_events: events.has_events_on(&date),
                date,
            }));
        }

        cells
    }

    pub fn header(&self) -> MonthHeader {
        let month0 = self.displayed.month0();
        MonthHeader {
            month_name: locale::month_name(month0 as usize).unwrap_or_default(),
            year: self.displayed.year(),
            season: locale::season_for_month(month0),
        }
    }

    pub fn selected_info(&self) -> Option<SelectedDayInfo> {
        let date = self.selected?;
        Some(SelectedDayInfo {
            date: format_date(date),
            day_name: locale::day_name(date.weekday().num_days_from_sunday() as usize)
                .unwrap_or_default(),
            day_number: date.day(),
            month_name: locale::month_name(date.month0() as usize).unwrap_or_default(),
            year: date.year(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::events::{MemoryStorage, NewEvent};
    use std::sync::Arc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_forward_then_back_returns_to_same_month() {
        for month in 1..=12 {
            let state = CalendarState::new(date(2024, month, 15));
            assert_eq!(state.next_month().previous_month(), state);
            assert_eq!(state.previous_month().next_month(), state);
        }
    }

    #[test]
    fn test_year_boundaries() {
        let december = CalendarState::new(date(2024, 12, 31));
        assert_eq!(december.next_month().displayed_month(), date(2025, 1, 1));

        let january = CalendarState::new(date(2025, 1, 1));
        assert_eq!(january.previous_month().displayed_month(), date(2024, 12, 1));
    }

    #[test]
    fn test_grid_leading_blanks_and_no_trailing_padding() {
        // 1 March 2025 is a Saturday
        let state = CalendarState::new(date(2025, 3, 10));
        let store = EventStore::load(Arc::new(MemoryStorage::new()));
        let grid = state.grid(&store);

        assert_eq!(grid.iter().take_while(|c| **c == GridCell::Blank).count(), 6);
        assert_eq!(grid.len(), 6 + 31);
        match grid.last() {
            Some(GridCell::Day(cell)) => assert_eq!(cell.date, "2025-03-31"),
            other => panic!("unexpected last cell: {:?}", other),
        }
    }

    #[test]
    fn test_grid_flags() {
        let mut store = EventStore::load(Arc::new(MemoryStorage::new()));
        store.add(NewEvent::new("2025-06-20", "Meeting")).unwrap();

        let state = CalendarState::new(date(2025, 6, 10)).select(date(2025, 6, 12));
        let days: Vec<DayCell> = state.grid(&store).into_iter().filter_map(GridCell::into_day).collect();

        assert_eq!(days.len(), 30);
        assert!(days[9].is_today && !days[9].is_selected);
        assert!(days[11].is_selected && !days[11].is_today);
        assert!(days[19].has_events);
        assert_eq!(days.iter().filter(|d| d.has_events).count(), 1);
    }

    #[test]
    fn test_today_not_flagged_in_other_months() {
        let store = EventStore::load(Arc::new(MemoryStorage::new()));
        let state = CalendarState::new(date(2025, 6, 10)).next_month();
        assert!(state
            .grid(&store)
            .iter()
            .filter_map(GridCell::as_day)
            .all(|d| !d.is_today && !d.is_selected));
    }

    #[test]
    fn test_quick_navigation() {
        let state = CalendarState::new(date(2025, 1, 1)).next_month().next_month();

        let yesterday = state.go_yesterday();
        assert_eq!(yesterday.selected(), Some(date(2024, 12, 31)));
        assert_eq!(yesterday.displayed_month(), date(2024, 12, 1));

        let tomorrow = state.go_tomorrow();
        assert_eq!(tomorrow.selected(), Some(date(2025, 1, 2)));

        assert_eq!(state.go_today().displayed_month(), date(2025, 1, 1));
    }

    #[test]
    fn test_header_and_selected_info() {
        let state = CalendarState::new(date(2025, 3, 15));
        let header = state.header();
        assert_eq!(header.month_name, "EyoKwindla");
        assert_eq!(header.year, 2025);
        assert_eq!(header.season.map(|s| s.english), Some("Autumn"));

        // 15 March 2025 is a Saturday
        let info = state.selected_info().unwrap();
        assert_eq!(info.day_name, "uMgqibelo");
        assert_eq!(info.day_number, 15);
        assert_eq!(info.date, "2025-03-15");

        assert!(state.clear_selection().selected_info().is_none());
    }
}
