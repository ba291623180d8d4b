// File: ./src/export/mod.rs
//! Comparison export.
//!
//! Every selected section gets its own page(s). The schedule, if selected,
//! always comes last as a legend page followed by one page per month.
pub mod layout;
pub mod pdf;
pub mod schedule;
pub mod sections;

use crate::calendar::{CalendarView, DateNormalizer, compose};
use crate::color_utils::CoursePalette;
use crate::config::Config;
use crate::model::{NamedSyllabus, Section};
use crate::session::SectionSelection;
use crate::storage::LocalStorage;
use anyhow::{Result, bail};
use layout::PageCanvas;
use std::path::Path;

pub const EXPORT_ERROR_MESSAGE: &str = "There was an error exporting the PDF. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageKind {
    /// `part` is 1-based; sections longer than a page get several parts.
    Section { section: Section, part: usize },
    Legend,
    Month { title: String },
}

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub palette: CoursePalette,
    pub normalizer: DateNormalizer,
    pub margin_mm: f32,
}

impl ExportOptions {
    pub fn from_config(config: &Config, year: i32) -> Self {
        Self {
            palette: config.palette(),
            normalizer: config.date_normalizer(year),
            margin_mm: config.page_margin_mm,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Page {
    pub kind: PageKind,
    pub canvas: PageCanvas,
}

/// Lays out every page of the comparison, in output order.
pub fn layout_pages(
    syllabuses: &[NamedSyllabus],
    selection: &SectionSelection,
    options: &ExportOptions,
) -> Result<Vec<Page>> {
    if syllabuses.is_empty() {
        bail!("No parsed syllabuses to export");
    }
    if selection.is_empty() {
        bail!("No sections selected");
    }

    let mut pages = Vec::new();
    for section in selection.ordered() {
        if section.is_schedule() {
            let view = compose(syllabuses, &options.normalizer);
            pages.extend(schedule_pages(&view, options));
            continue;
        }
        let parts = sections::section_pages(&section, syllabuses, options.margin_mm);
        pages.extend(parts.into_iter().enumerate().map(|(i, canvas)| Page {
            kind: PageKind::Section {
                section: section.clone(),
                part: i + 1,
            },
            canvas,
        }));
    }
    Ok(pages)
}

fn schedule_pages(view: &CalendarView, options: &ExportOptions) -> Vec<Page> {
    let legend = Page {
        kind: PageKind::Legend,
        canvas: schedule::legend_page(view, &options.palette, options.margin_mm),
    };
    std::iter::once(legend)
        .chain(view.months.iter().map(|month| Page {
            kind: PageKind::Month {
                title: month.title.clone(),
            },
            canvas: schedule::month_page(month, &options.palette, options.margin_mm),
        }))
        .collect()
}

/// The page sequence without the drawing, for previews and tests.
pub fn plan_pages(
    syllabuses: &[NamedSyllabus],
    selection: &SectionSelection,
    options: &ExportOptions,
) -> Result<Vec<PageKind>> {
    Ok(layout_pages(syllabuses, selection, options)?
        .into_iter()
        .map(|p| p.kind)
        .collect())
}

pub fn render_pdf(
    syllabuses: &[NamedSyllabus],
    selection: &SectionSelection,
    options: &ExportOptions,
) -> Result<Vec<u8>> {
    let pages = layout_pages(syllabuses, selection, options)?;
    log::info!(
        "Rendering {} page(s) for {} syllabus(es)",
        pages.len(),
        syllabuses.len()
    );
    let ops: Vec<_> = pages.into_iter().map(|p| p.canvas.into_ops()).collect();
    pdf::render(&ops)
}

/// Renders and writes the PDF. A failure leaves no partial file behind.
pub fn export_to_file(
    path: &Path,
    syllabuses: &[NamedSyllabus],
    selection: &SectionSelection,
    options: &ExportOptions,
) -> Result<()> {
    let bytes = render_pdf(syllabuses, selection, options)?;
    LocalStorage::atomic_write(path, &bytes)?;
    log::info!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CourseSchedule, ParsedSyllabus, ScheduleEntry};

    fn syllabus() -> NamedSyllabus {
        NamedSyllabus::new(
            "a.pdf",
            ParsedSyllabus {
                materials: Some(vec!["Book".into()]),
                schedule: Some(CourseSchedule {
                    entries: vec![ScheduleEntry {
                        date: Some("2/3".into()),
                        topic: "Intro".into(),
                        ..Default::default()
                    }],
                }),
                ..Default::default()
            },
        )
    }

    fn options() -> ExportOptions {
        ExportOptions::from_config(&Config::default(), 2025)
    }

    #[test]
    fn test_schedule_is_planned_last_even_when_selected_first() {
        let selection = SectionSelection::from_sections([Section::Schedule, Section::Materials]);
        let plan = plan_pages(&[syllabus()], &selection, &options()).unwrap();
        assert_eq!(
            plan,
            vec![
                PageKind::Section {
                    section: Section::Materials,
                    part: 1
                },
                PageKind::Legend,
                PageKind::Month {
                    title: "February 2025".into()
                },
            ]
        );
    }

    #[test]
    fn test_empty_inputs_are_rejected() {
        let err = plan_pages(&[], &SectionSelection::from_sections([Section::Materials]), &options());
        assert!(err.is_err());
        let err = plan_pages(&[syllabus()], &SectionSelection::new(), &options());
        assert!(err.is_err());
    }
}
