// File: ./src/calendar/events.rs
use crate::calendar::date::parse_month_day;
use crate::model::{NamedSyllabus, ScheduleEntry};
use chrono::{Datelike, NaiveDate, Weekday};

/// A schedule entry placed on a calendar day. Computed per render, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub source_course_title: String,
    /// 1-based position of the source syllabus in the input list.
    pub color_index: usize,
    pub topic: String,
    pub assignments: Option<String>,
    pub is_exam: bool,
}

/// Calendar-month week bucket of `day`: `ceil((day_of_month - 1) / 7) + 1`.
///
/// This approximates semester weeks with calendar-month weeks and can
/// misplace week-only entries. It is kept separate so the policy can change.
pub fn week_bucket(day: NaiveDate) -> u32 {
    (day.day() - 1).div_ceil(7) + 1
}

/// Week-only entries land on the Monday whose week bucket equals `week`.
pub fn matches_week_bucket(week: u32, day: NaiveDate) -> bool {
    day.weekday() == Weekday::Mon && week_bucket(day) == week
}

/// Whether `entry` belongs on `day`. Explicit dates resolve in `grid_year`.
pub fn entry_matches_day(entry: &ScheduleEntry, day: NaiveDate, grid_year: i32) -> bool {
    if let Some(token) = entry.date_token() {
        return parse_month_day(token, grid_year).is_ok_and(|d| d == day);
    }
    entry.week.is_some_and(|w| matches_week_bucket(w, day))
}

/// All events from all syllabuses landing on `day`, in syllabus then entry order.
pub fn events_on(day: NaiveDate, grid_year: i32, syllabuses: &[NamedSyllabus]) -> Vec<CalendarEvent> {
    syllabuses
        .iter()
        .enumerate()
        .flat_map(|(index, syllabus)| {
            syllabus
                .parsed
                .schedule_entries()
                .iter()
                .filter(move |entry| entry_matches_day(entry, day, grid_year))
                .map(move |entry| CalendarEvent {
                    source_course_title: syllabus.title().to_string(),
                    color_index: index + 1,
                    topic: entry.topic.clone(),
                    assignments: entry.assignments.clone(),
                    is_exam: entry.is_exam(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_bucket_boundaries() {
        assert_eq!(week_bucket(ymd(2024, 1, 1)), 1);
        assert_eq!(week_bucket(ymd(2024, 1, 2)), 2);
        assert_eq!(week_bucket(ymd(2024, 1, 8)), 2);
        assert_eq!(week_bucket(ymd(2024, 1, 9)), 3);
        assert_eq!(week_bucket(ymd(2024, 1, 15)), 3);
        assert_eq!(week_bucket(ymd(2024, 1, 31)), 6);
    }

    #[test]
    fn test_week_entries_only_match_mondays() {
        // 2024-01-15 is a Monday in bucket 3; the 16th is a Tuesday.
        assert!(matches_week_bucket(3, ymd(2024, 1, 15)));
        assert!(!matches_week_bucket(3, ymd(2024, 1, 14)));
        assert!(!matches_week_bucket(2, ymd(2024, 1, 15)));
    }

    #[test]
    fn test_explicit_date_beats_week() {
        let entry = ScheduleEntry {
            week: Some(3),
            date: Some("3/10".into()),
            topic: "Graphs".into(),
            assignments: None,
        };
        assert!(entry_matches_day(&entry, ymd(2024, 3, 10), 2024));
        assert!(!entry_matches_day(&entry, ymd(2024, 1, 15), 2024));
        assert!(!entry_matches_day(&entry, ymd(2023, 3, 10), 2024));
    }

    #[test]
    fn test_malformed_date_does_not_fall_back_to_week() {
        let entry = ScheduleEntry {
            week: Some(3),
            date: Some("soonish".into()),
            topic: "Graphs".into(),
            assignments: None,
        };
        assert!(!entry_matches_day(&entry, ymd(2024, 1, 15), 2024));
    }
}
