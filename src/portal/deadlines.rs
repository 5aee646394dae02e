use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::{format_date, parse_date, weekday_name};

/// Expired labs sort as if this many days were left, so they land after
/// every upcoming one while still showing their real negative count.
const EXPIRED_SORT_KEY: i64 = 9999;

/// One dated task as stored in deadlines.json.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeadlineRecord {
    pub subject: String,
    pub title: String,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub file: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TestDeadline {
    pub subject: String,
    pub title: String,
    pub date_str: String,
    pub days_left: i64,
    pub weekday: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct LabDeadline {
    pub subject: String,
    pub title: String,
    pub date_str: String,
    pub days_left: i64,
    pub status: &'static str,
    pub file: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DeadlineBoard {
    pub tests: Vec<TestDeadline>,
    pub labs: Vec<LabDeadline>,
}

/// Splits raw records into upcoming tests and labs with day counts.
/// Tests that already passed are dropped; labs stay forever, flagged as
/// expired. Records with unparseable dates or an unknown kind are skipped
/// without failing the batch.
pub fn classify_deadlines(records: &[DeadlineRecord], today: NaiveDate) -> DeadlineBoard {
    let mut board = DeadlineBoard::default();

    for record in records {
        let date = match parse_date(&record.date) {
            Ok(date) => date,
            Err(_) => continue,
        };
        let days_left = (date - today).num_days();

        match record.kind.as_str() {
            "test" => {
                if days_left >= 0 {
                    board.tests.push(TestDeadline {
                        subject: record.subject.clone(),
                        title: record.title.clone(),
                        date_str: format_date(date),
                        days_left,
                        weekday: weekday_name(date),
                    });
                }
            }
            "lab" => {
                board.labs.push(LabDeadline {
                    subject: record.subject.clone(),
                    title: record.title.clone(),
                    date_str: format_date(date),
                    days_left,
                    status: if days_left < 0 { "expired" } else { "active" },
                    file: record.file.clone(),
                });
            }
            _ => {}
        }
    }

    board.tests.sort_by_key(|t| t.days_left);
    board.labs.sort_by_key(|l| {
        if l.days_left >= 0 {
            l.days_left
        } else {
            EXPIRED_SORT_KEY
        }
    });
    board
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: &str, title: &str, date: &str) -> DeadlineRecord {
        DeadlineRecord {
            subject: "ОС".to_string(),
            title: title.to_string(),
            date: date.to_string(),
            kind: kind.to_string(),
            file: None,
        }
    }

    fn today() -> NaiveDate {
        parse_date("2025-03-10").unwrap()
    }

    #[test]
    fn passed_tests_are_dropped_but_labs_expire() {
        let records = vec![
            record("test", "missed test", "2025-03-09"),
            record("lab", "missed lab", "2025-03-09"),
        ];

        let board = classify_deadlines(&records, today());
        assert!(board.tests.is_empty());
        assert_eq!(board.labs.len(), 1);
        assert_eq!(board.labs[0].status, "expired");
        assert_eq!(board.labs[0].days_left, -1);
    }

    #[test]
    fn expired_labs_sort_after_all_active_ones() {
        let records = vec![
            record("lab", "expired", "2025-03-01"),
            record("lab", "far", "2025-04-01"),
            record("lab", "near", "2025-03-12"),
        ];

        let board = classify_deadlines(&records, today());
        let titles: Vec<&str> = board.labs.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["near", "far", "expired"]);
    }

    #[test]
    fn tests_sort_ascending_by_days_left() {
        let records = vec![
            record("test", "later", "2025-03-20"),
            record("test", "today", "2025-03-10"),
        ];

        let board = classify_deadlines(&records, today());
        assert_eq!(board.tests[0].title, "today");
        assert_eq!(board.tests[0].days_left, 0);
        assert_eq!(board.tests[1].days_left, 10);
        assert_eq!(board.tests[0].date_str, "10.03.2025");
    }

    #[test]
    fn bad_dates_and_unknown_kinds_are_skipped() {
        let records = vec![
            record("test", "garbled", "someday"),
            record("exam", "unknown kind", "2025-03-15"),
            record("lab", "kept", "2025-03-15"),
        ];

        let board = classify_deadlines(&records, today());
        assert!(board.tests.is_empty());
        assert_eq!(board.labs.len(), 1);
        assert_eq!(board.labs[0].title, "kept");
    }
}
