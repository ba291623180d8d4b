// File: ./src/calendar/mod.rs
//! Semester calendar composition: resolve schedule dates, tile months into
//! weeks, and place every course's entries on the right day.
pub mod date;
pub mod events;
pub mod grid;
pub mod range;

pub use date::{DateNormalizer, DateTokenError, parse_month_day, second_monday_of_january};
pub use events::{CalendarEvent, entry_matches_day, events_on, matches_week_bucket, week_bucket};
pub use grid::{DAYS_PER_WEEK, MonthGrid, WEEKDAY_LABELS, build_calendar};
pub use range::SemesterRange;

use crate::model::NamedSyllabus;
use chrono::{Datelike, NaiveDate};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    /// False for days outside the semester range (rendered greyed out).
    pub in_range: bool,
    pub events: Vec<CalendarEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthView {
    pub grid_date: NaiveDate,
    pub title: String,
    pub weeks: Vec<[Option<DayCell>; DAYS_PER_WEEK]>,
}

impl MonthView {
    pub fn cell(&self, date: NaiveDate) -> Option<&DayCell> {
        self.weeks
            .iter()
            .flatten()
            .flatten()
            .find(|c| c.date == date)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    pub title: String,
    pub color_index: usize,
}

/// Everything the schedule pages need: legend plus one view per month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarView {
    pub range: SemesterRange,
    pub legend: Vec<LegendEntry>,
    pub months: Vec<MonthView>,
}

impl CalendarView {
    pub fn month(&self, year: i32, month: u32) -> Option<&MonthView> {
        self.months
            .iter()
            .find(|m| m.grid_date.year() == year && m.grid_date.month() == month)
    }
}

/// Range estimation, month tiling and event placement in one pass.
/// Pure: identical inputs produce identical views.
pub fn compose(syllabuses: &[NamedSyllabus], normalizer: &DateNormalizer) -> CalendarView {
    let range = SemesterRange::estimate(syllabuses, normalizer);
    let months = build_calendar(range.start, range.end)
        .into_iter()
        .map(|grid| {
            let grid_year = grid.date.year();
            let title = grid.title();
            let weeks = grid
                .weeks
                .into_iter()
                .map(|week| {
                    week.map(|slot| {
                        slot.map(|date| DayCell {
                            date,
                            in_range: range.contains(date),
                            events: events_on(date, grid_year, syllabuses),
                        })
                    })
                })
                .collect();
            MonthView {
                grid_date: grid.date,
                title,
                weeks,
            }
        })
        .collect();

    let legend = syllabuses
        .iter()
        .enumerate()
        .map(|(i, s)| LegendEntry {
            title: s.title().to_string(),
            color_index: i + 1,
        })
        .collect();

    CalendarView {
        range,
        legend,
        months,
    }
}
