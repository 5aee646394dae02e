use chrono::{Datelike, NaiveDate};

use crate::error::PortalError;

/// Accepted input formats, tried in order.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d.%m.%Y"];

/// Weekday names as shown to students, Monday first.
pub const WEEKDAYS_RU: [&str; 7] = [
    "Понедельник",
    "Вторник",
    "Среда",
    "Четверг",
    "Пятница",
    "Суббота",
    "Воскресенье",
];

/// Parses `2025-01-14` or `14.01.2025` into a calendar date.
pub fn parse_date(value: &str) -> Result<NaiveDate, PortalError> {
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return Ok(date);
        }
    }
    Err(PortalError::DateFormat(value.to_string()))
}

/// Display format used everywhere in the UI.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

pub fn weekday_name(date: NaiveDate) -> &'static str {
    WEEKDAYS_RU[date.weekday().num_days_from_monday() as usize]
}
