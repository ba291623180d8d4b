// File: ./src/calendar/date.rs
use crate::model::ScheduleEntry;
use chrono::{Duration, NaiveDate, Weekday};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateTokenError {
    #[error("expected month/day, got '{0}'")]
    Shape(String),
    #[error("'{0}' is not a number")]
    NotNumeric(String),
    #[error("month {0} is out of range")]
    Month(u32),
    #[error("day {0} is out of range")]
    Day(u32),
    #[error("{month}/{day} does not exist in {year}")]
    NoSuchDay { year: i32, month: u32, day: u32 },
}

/// Generic US-semester start heuristic: the second Monday of January.
pub fn second_monday_of_january(year: i32) -> NaiveDate {
    NaiveDate::from_weekday_of_month_opt(year, 1, Weekday::Mon, 2)
        // Every year has a second Monday in January; this only guards chrono's range.
        .unwrap_or(NaiveDate::MIN)
}

fn parse_component(raw: &str) -> Result<u32, DateTokenError> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return Err(DateTokenError::NotNumeric(raw.to_string()));
    }
    raw.parse::<u32>()
        .map_err(|_| DateTokenError::NotNumeric(raw.to_string()))
}

/// Parses a `"M/D"` token into a date in `year`.
pub fn parse_month_day(token: &str, year: i32) -> Result<NaiveDate, DateTokenError> {
    let mut parts = token.trim().split('/');
    let (Some(m), Some(d), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(DateTokenError::Shape(token.to_string()));
    };
    let month = parse_component(m)?;
    let day = parse_component(d)?;
    if !(1..=12).contains(&month) {
        return Err(DateTokenError::Month(month));
    }
    if !(1..=31).contains(&day) {
        return Err(DateTokenError::Day(day));
    }
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(DateTokenError::NoSuchDay { year, month, day })
}

/// Turns schedule date tokens and week numbers into concrete dates for one reference year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateNormalizer {
    year: i32,
    anchor: NaiveDate,
}

impl DateNormalizer {
    /// Uses the second Monday of January of `year` as the week-1 anchor.
    pub fn new(year: i32) -> Self {
        Self {
            year,
            anchor: second_monday_of_january(year),
        }
    }

    /// Uses an explicit week-1 anchor (from configuration).
    pub fn with_anchor(year: i32, anchor: NaiveDate) -> Self {
        Self { year, anchor }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    /// `None` for the unresolved marker and for malformed tokens (logged).
    pub fn normalize_token(&self, token: &str) -> Option<NaiveDate> {
        if token.trim().eq_ignore_ascii_case(crate::model::UNRESOLVED_DATE) {
            return None;
        }
        match parse_month_day(token, self.year) {
            Ok(date) => Some(date),
            Err(e) => {
                log::warn!("Ignoring schedule date '{}': {}", token, e);
                None
            }
        }
    }

    /// `anchor + (week - 1) * 7 days`; week 0 is unresolvable.
    pub fn week_start(&self, week: u32) -> Option<NaiveDate> {
        let offset = i64::from(week.checked_sub(1)?) * 7;
        self.anchor.checked_add_signed(Duration::days(offset))
    }

    /// The explicit date wins unless absent or TBD; otherwise the week fallback applies.
    pub fn resolve(&self, entry: &ScheduleEntry) -> Option<NaiveDate> {
        match (entry.date_token(), entry.week) {
            (Some(token), _) => self.normalize_token(token),
            (None, Some(week)) => self.week_start(week),
            (None, None) => None,
        }
    }
}
