use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::dates::{format_date, parse_date, weekday_name};

/// One configured weekly class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassDef {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub first_date: String,
    pub time: String,
    #[serde(default)]
    pub classroom: String,
}

/// Contents of schedule.json.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub semester_end: String,
    #[serde(default)]
    pub classes: Vec<ClassDef>,
}

impl Default for ScheduleConfig {
    /// The literal example config seeded on first access, so there is
    /// something to edit in the admin panel.
    fn default() -> Self {
        ScheduleConfig {
            semester_end: "2025-05-31".to_string(),
            classes: vec![ClassDef {
                name: "Тестовый предмет".to_string(),
                kind: "lecture".to_string(),
                first_date: "2024-12-30".to_string(),
                time: "10:00 - 11:30".to_string(),
                classroom: "Ауд. 101".to_string(),
            }],
        }
    }
}

/// One concrete calendar instance of a recurring class. Recomputed on every
/// request, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct Occurrence {
    #[serde(skip)]
    pub date: NaiveDate,
    pub date_str: String,
    pub weekday: &'static str,
    pub time: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub classroom: String,
}

/// Expands every class into weekly occurrences from `first_date` up to and
/// including `semester_end`. A class with a malformed `first_date` is
/// skipped on its own; a malformed `semester_end` empties the whole
/// schedule.
pub fn generate_schedule(config: &ScheduleConfig) -> Vec<Occurrence> {
    let end = match parse_date(&config.semester_end) {
        Ok(date) => date,
        Err(err) => {
            log::warn!("bad semester_end in schedule config: {}", err);
            return Vec::new();
        }
    };

    let mut occurrences = Vec::new();
    for class in &config.classes {
        let mut current = match parse_date(&class.first_date) {
            Ok(date) => date,
            Err(err) => {
                log::warn!("skipping class \"{}\": {}", class.name, err);
                continue;
            }
        };
        while current <= end {
            occurrences.push(Occurrence {
                date: current,
                date_str: format_date(current),
                weekday: weekday_name(current),
                time: class.time.clone(),
                name: class.name.clone(),
                kind: class.kind.clone(),
                classroom: class.classroom.clone(),
            });
            current = current + Duration::days(7);
        }
    }

    // Stable sort keeps generation order for same-date occurrences.
    occurrences.sort_by_key(|occ| occ.date);
    occurrences
}
