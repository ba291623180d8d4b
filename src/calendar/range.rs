// File: ./src/calendar/range.rs
use crate::calendar::date::DateNormalizer;
use crate::model::NamedSyllabus;
use chrono::{Months, NaiveDate};

/// Inferred start/end window covering all schedule entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SemesterRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl SemesterRange {
    /// Anchor (second Monday of January by default) through four months later.
    pub fn default_for(normalizer: &DateNormalizer) -> Self {
        let start = normalizer.anchor();
        let end = start.checked_add_months(Months::new(4)).unwrap_or(start);
        Self { start, end }
    }

    /// Earliest to latest resolvable entry date across every syllabus.
    /// Never fails: with nothing resolvable it returns `default_for`.
    pub fn estimate(syllabuses: &[NamedSyllabus], normalizer: &DateNormalizer) -> Self {
        let resolved = syllabuses
            .iter()
            .flat_map(|s| s.parsed.schedule_entries())
            .filter_map(|entry| normalizer.resolve(entry));

        let bounds = resolved.fold(None, |acc: Option<(NaiveDate, NaiveDate)>, date| {
            Some(match acc {
                Some((lo, hi)) => (lo.min(date), hi.max(date)),
                None => (date, date),
            })
        });

        match bounds {
            Some((start, end)) => Self { start, end },
            None => {
                log::debug!("No resolvable schedule dates, using the default semester window");
                Self::default_for(normalizer)
            }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}
