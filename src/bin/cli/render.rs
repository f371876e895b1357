use ikhalenda::app::App;
use ikhalenda::components::calendar::GridCell;
use ikhalenda::components::events::Event;
use ikhalenda::utils::locale;
use std::fmt::Write;

/// Month heading, weekday row and grid
pub fn month(app: &App) -> String {
    let header = app.header();
    let mut out = String::new();

    let _ = write!(out, "{} {}", header.month_name, header.year);
    if let Some(season) = header.season {
        let _ = write!(out, "  ({}: {})", t!("season_label"), season.xhosa);
    }
    out.push('\n');

    for index in 0..7 {
        let name = locale::day_name(index).unwrap_or_default();
        let short: String = name.chars().take(4).collect();
        let _ = write!(out, "{:>6}", short);
    }
    out.push('\n');

    for (position, cell) in app.grid().iter().enumerate() {
        match cell {
            GridCell::Blank => out.push_str("      "),
            GridCell::Day(day) => {
                let number = if day.is_selected {
                    format!("[{:>2}]", day.day)
                } else if day.is_today {
                    format!("({:>2})", day.day)
                } else {
                    format!(" {:>2} ", day.day)
                };
                let marker = if day.has_events { '*' } else { ' ' };
                let _ = write!(out, " {}{}", number, marker);
            }
        }
        if position % 7 == 6 {
            out.push('\n');
        }
    }
    if !out.ends_with('\n') {
        out.push('\n');
    }
    let _ = writeln!(out, "(dd) {}   [dd] {}   * {}", locale::terms::TODAY, t!("selected_label"), t!("events_heading"));

    out
}

/// Selected day heading followed by its events
pub fn day(app: &App) -> String {
    let mut out = String::new();

    if let Some(info) = app.selected_info() {
        let _ = writeln!(
            out,
            "{}, {} {} {}",
            info.day_name, info.day_number, info.month_name, info.year
        );
    }

    let events = app.selected_events();
    if events.is_empty() {
        let _ = writeln!(out, "  {}", t!("no_events"));
    } else {
        let _ = writeln!(out, "{}:", t!("events_heading"));
        for event in events {
            let _ = writeln!(out, "  {}", event_line(event));
        }
    }

    out
}

pub fn event_line(event: &Event) -> String {
    let mut line = match &event.time {
        Some(time) => format!("{} {}", time, event.title),
        None => event.title.clone(),
    };
    if let Some(description) = &event.description {
        let _ = write!(line, " - {}", description);
    }
    let _ = write!(line, "  [{}]", event.id);
    line
}
