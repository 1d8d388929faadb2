use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Entry for the "Today" selector in the info panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayLabel {
    pub day: String,
}

impl DayLabel {
    pub fn new(day: &str) -> Self {
        Self { day: day.to_string() }
    }
}

/// Full English name of a weekday, as used in the day list
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Index of the label matching the weekday of `date` (case-insensitive)
pub fn find_day(days: &[DayLabel], date: NaiveDate) -> Option<usize> {
    let name = weekday_name(date.weekday());
    days.iter().position(|d| d.day.eq_ignore_ascii_case(name))
}
