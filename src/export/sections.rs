// File: ./src/export/sections.rs
//! Side-by-side tables for the non-schedule sections.
use crate::color_utils::{BLACK, GRAY_200, GRAY_400};
use crate::export::layout::{Font, PAGE_HEIGHT_MM, PAGE_WIDTH_MM, PageCanvas, line_height, wrap_paragraphs};
use crate::format::format_section;
use crate::model::{NamedSyllabus, Section};

const TITLE_SIZE: f32 = 16.0;
const HEADER_SIZE: f32 = 10.0;
const BODY_SIZE: f32 = 9.0;
const CELL_PADDING: f32 = 2.0;
const TITLE_GAP: f32 = 4.0;

/// One column per syllabus; rows are wrapped lines so a long cell can
/// continue on the next page.
struct Table {
    title: String,
    headers: Vec<Vec<String>>,
    columns: Vec<Vec<String>>,
}

impl Table {
    fn build(section: &Section, syllabuses: &[NamedSyllabus], column_width: f32) -> Self {
        let text_width = column_width - 2.0 * CELL_PADDING;
        let headers = syllabuses
            .iter()
            .map(|s| wrap_paragraphs(s.title(), text_width, HEADER_SIZE, Font::Bold))
            .collect();
        let columns = syllabuses
            .iter()
            .map(|s| {
                wrap_paragraphs(
                    &format_section(s, section),
                    text_width,
                    BODY_SIZE,
                    Font::Regular,
                )
            })
            .collect();
        Self {
            title: section.display_name(),
            headers,
            columns,
        }
    }

    fn row_count(&self) -> usize {
        self.columns.iter().map(Vec::len).max().unwrap_or(0)
    }

    fn header_height(&self) -> f32 {
        let lines = self.headers.iter().map(Vec::len).max().unwrap_or(1);
        lines as f32 * line_height(HEADER_SIZE) + 2.0 * CELL_PADDING
    }
}

/// Lays out one section, starting on a fresh page. Returns one op list per page.
pub fn section_pages(
    section: &Section,
    syllabuses: &[NamedSyllabus],
    margin: f32,
) -> Vec<PageCanvas> {
    let content_width = PAGE_WIDTH_MM - 2.0 * margin;
    let columns = syllabuses.len().max(1);
    let column_width = content_width / columns as f32;
    let table = Table::build(section, syllabuses, column_width);

    let bottom = PAGE_HEIGHT_MM - margin;
    let row_height = line_height(BODY_SIZE);
    let total_rows = table.row_count();

    let mut pages = Vec::new();
    let mut next_row = 0;
    loop {
        let mut canvas = PageCanvas::new();
        let title = if pages.is_empty() {
            table.title.clone()
        } else {
            format!("{} (continued)", table.title)
        };
        canvas.centered_text(
            PAGE_WIDTH_MM / 2.0,
            margin,
            TITLE_SIZE,
            Font::Bold,
            BLACK,
            &title,
        );

        let table_top = margin + line_height(TITLE_SIZE) + TITLE_GAP;
        let header_height = table.header_height();
        canvas.fill_rect(margin, table_top, content_width, header_height, GRAY_200);
        for (i, header) in table.headers.iter().enumerate() {
            let x = margin + i as f32 * column_width + CELL_PADDING;
            for (l, line) in header.iter().enumerate() {
                let y = table_top + CELL_PADDING + l as f32 * line_height(HEADER_SIZE);
                canvas.text(x, y, HEADER_SIZE, Font::Bold, BLACK, line);
            }
        }

        let body_top = table_top + header_height;
        let mut y = body_top + CELL_PADDING;
        // At least one row per page so an oversized row cannot stall the flow.
        let mut placed = 0;
        while next_row < total_rows && (placed == 0 || y + row_height <= bottom - CELL_PADDING) {
            for (i, column) in table.columns.iter().enumerate() {
                if let Some(line) = column.get(next_row) {
                    let x = margin + i as f32 * column_width + CELL_PADDING;
                    canvas.text(x, y, BODY_SIZE, Font::Regular, BLACK, line);
                }
            }
            y += row_height;
            next_row += 1;
            placed += 1;
        }

        let table_bottom = y + CELL_PADDING;
        canvas.rect(
            margin,
            table_top,
            content_width,
            table_bottom - table_top,
            None,
            Some(GRAY_400),
            0.3,
        );
        canvas.line(
            (margin, body_top),
            (margin + content_width, body_top),
            GRAY_400,
            0.3,
        );
        for i in 1..columns {
            let x = margin + i as f32 * column_width;
            canvas.line((x, table_top), (x, table_bottom), GRAY_400, 0.3);
        }

        pages.push(canvas);
        if next_row >= total_rows {
            break;
        }
    }
    pages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::layout::DrawOp;
    use crate::model::{CourseInfo, ParsedSyllabus};

    fn syllabus(name: &str, title: &str, materials: Vec<String>) -> NamedSyllabus {
        NamedSyllabus::new(
            name,
            ParsedSyllabus {
                course_info: CourseInfo {
                    title: title.into(),
                    ..Default::default()
                },
                materials: Some(materials),
                ..Default::default()
            },
        )
    }

    fn texts(page: &PageCanvas) -> Vec<String> {
        page.ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_short_section_fits_one_page_with_course_headers() {
        let pages = section_pages(
            &Section::Materials,
            &[
                syllabus("a.pdf", "Calculus I", vec!["Stewart".into()]),
                syllabus("b.pdf", "Physics", vec!["Halliday".into()]),
            ],
            10.0,
        );
        assert_eq!(pages.len(), 1);
        let texts = texts(&pages[0]);
        assert_eq!(texts[0], "Materials");
        assert!(texts.contains(&"Calculus I".to_string()));
        assert!(texts.contains(&"Physics".to_string()));
        assert!(texts.iter().any(|t| t.contains("Stewart")));
    }

    #[test]
    fn test_long_section_flows_onto_more_pages_without_dropping_rows() {
        let books: Vec<String> = (1..=150).map(|i| format!("Book {}", i)).collect();
        let pages = section_pages(
            &Section::Materials,
            &[syllabus("a.pdf", "Long", books)],
            10.0,
        );
        assert!(pages.len() > 1);
        assert_eq!(texts(&pages[1])[0], "Materials (continued)");

        let all: Vec<String> = pages.iter().flat_map(texts).collect();
        assert!(all.iter().any(|t| t.ends_with("Book 1")));
        assert!(all.iter().any(|t| t.ends_with("Book 150")));
    }
}
