//! isiXhosa names for days, months and seasons.
//!
//! Indices follow the usual calendar conventions: days are Sunday-first
//! (`0` = Sunday) and months are zero-based (`0` = January).

/// A weekday with its isiXhosa name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayName {
    pub english: &'static str,
    pub xhosa: &'static str,
    pub meaning: &'static str,
}

/// A month with its isiXhosa name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthName {
    pub english: &'static str,
    pub xhosa: &'static str,
}

/// A season and the zero-based months it covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Season {
    pub english: &'static str,
    pub xhosa: &'static str,
    pub months: [u32; 3],
}

pub const DAYS: [DayName; 7] = [
    DayName { english: "Sunday", xhosa: "iCawa", meaning: "Church Day" },
    DayName { english: "Monday", xhosa: "uMvulo", meaning: "The Opening (of the work week)" },
    DayName { english: "Tuesday", xhosa: "uLwesibini", meaning: "The Second (day)" },
    DayName { english: "Wednesday", xhosa: "uLwesithathu", meaning: "The Third (day)" },
    DayName { english: "Thursday", xhosa: "uLwesine", meaning: "The Fourth (day)" },
    DayName { english: "Friday", xhosa: "uLwesihlanu", meaning: "The Fifth (day)" },
    DayName { english: "Saturday", xhosa: "uMgqibelo", meaning: "The Closing/Ending (of the work week)" },
];

pub const MONTHS: [MonthName; 12] = [
    MonthName { english: "January", xhosa: "EyoMqungu" },
    MonthName { english: "February", xhosa: "EyoMdumba" },
    MonthName { english: "March", xhosa: "EyoKwindla" },
    MonthName { english: "April", xhosa: "UTshazimpuzi" },
    MonthName { english: "May", xhosa: "UCanzibe" },
    MonthName { english: "June", xhosa: "Isilimela" },
    MonthName { english: "July", xhosa: "EyeKhala" },
    MonthName { english: "August", xhosa: "EyeThupha" },
    MonthName { english: "September", xhosa: "EyoMsintsi" },
    MonthName { english: "October", xhosa: "EyeDwarha" },
    MonthName { english: "November", xhosa: "EyeNkanga" },
    MonthName { english: "December", xhosa: "EyoMnga" },
];

/// Southern hemisphere seasons
pub const SEASONS: [Season; 4] = [
    Season { english: "Autumn", xhosa: "eyoKwindla", months: [2, 3, 4] },
    Season { english: "Winter", xhosa: "uBusika", months: [5, 6, 7] },
    Season { english: "Spring", xhosa: "iNtlakohlaza", months: [8, 9, 10] },
    Season { english: "Summer", xhosa: "uHlobo", months: [11, 0, 1] },
];

/// Common calendar vocabulary
pub mod terms {
    pub const DAY: &str = "Usuku";
    pub const DAYS: &str = "Iintsuku";
    pub const MONTH: &str = "Inyanga";
    pub const MONTHS: &str = "Iinyanga";
    pub const YEAR: &str = "Unyaka";
    pub const YEARS: &str = "Iminyaka";
    pub const TODAY: &str = "Namhlanje";
    pub const YESTERDAY: &str = "Izolo";
    pub const TOMORROW: &str = "Ngomso";
    pub const HOLIDAY: &str = "Usuku Olumisiweyo";
    pub const NEW_YEAR: &str = "Unyaka Omtsha";
}

/// isiXhosa weekday name for a Sunday-first index
pub fn day_name(day_index: usize) -> Option<&'static str> {
    DAYS.get(day_index).map(|d| d.xhosa)
}

/// isiXhosa month name for a zero-based month index
pub fn month_name(month_index: usize) -> Option<&'static str> {
    MONTHS.get(month_index).map(|m| m.xhosa)
}

/// Season containing the zero-based month
pub fn season_for_month(month_index: u32) -> Option<&'static Season> {
    SEASONS.iter().find(|s| s.months.contains(&month_index))
}
