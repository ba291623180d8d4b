// File: ./src/calendar/grid.rs
use chrono::{Datelike, Months, NaiveDate};

pub const DAYS_PER_WEEK: usize = 7;
pub const WEEKDAY_LABELS: [&str; DAYS_PER_WEEK] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// One calendar week, Sunday first. `None` cells pad the month's edges.
pub type WeekRow = [Option<NaiveDate>; DAYS_PER_WEEK];

/// Week-tiled matrix for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    /// First day of the month.
    pub date: NaiveDate,
    pub weeks: Vec<WeekRow>,
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

impl MonthGrid {
    /// Tiles the month containing `date` into Sunday-aligned week rows.
    pub fn for_month(date: NaiveDate) -> Self {
        let first = first_of_month(date);
        let mut weeks: Vec<WeekRow> = Vec::with_capacity(6);
        let mut row: WeekRow = [None; DAYS_PER_WEEK];
        let mut slot = first.weekday().num_days_from_sunday() as usize;

        for day in first.iter_days().take_while(|d| d.month() == first.month()) {
            if slot == DAYS_PER_WEEK {
                weeks.push(row);
                row = [None; DAYS_PER_WEEK];
                slot = 0;
            }
            row[slot] = Some(day);
            slot += 1;
        }
        weeks.push(row);

        Self { date: first, weeks }
    }

    /// "January 2026".
    pub fn title(&self) -> String {
        self.date.format("%B %Y").to_string()
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.weeks.iter().flatten().flatten().copied()
    }
}

/// One grid per calendar month overlapping `[start, end]`, in chronological order.
pub fn build_calendar(start: NaiveDate, end: NaiveDate) -> Vec<MonthGrid> {
    let last = first_of_month(end);
    let mut anchor = first_of_month(start);
    let mut months = Vec::new();

    while anchor <= last {
        months.push(MonthGrid::for_month(anchor));
        match anchor.checked_add_months(Months::new(1)) {
            Some(next) => anchor = next,
            None => break,
        }
    }

    log::debug!(
        "Generated months: {:?}",
        months.iter().map(MonthGrid::title).collect::<Vec<_>>()
    );
    months
}
