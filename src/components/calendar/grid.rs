/// One day of the month grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    /// ISO date, formatted the same way events store it
    pub date: String,
    pub day: u32,
    pub is_today: bool,
    pub is_selected: bool,
    pub has_events: bool,
}

/// A position in the seven-column month grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridCell {
    /// Padding before the 1st of the month
    Blank,
    Day(DayCell),
}

impl GridCell {
    pub fn as_day(&self) -> Option<&DayCell> {
        match self {
            GridCell::Day(cell) => Some(cell),
            GridCell::Blank => None,
        }
    }

    pub fn into_day(self) -> Option<DayCell> {
        match self {
            GridCell::Day(cell) => Some(cell),
            GridCell::Blank => None,
        }
    }
}
