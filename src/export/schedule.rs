// File: ./src/export/schedule.rs
//! Legend and month pages for the combined semester calendar.
use crate::calendar::{CalendarEvent, CalendarView, DAYS_PER_WEEK, DayCell, MonthView, WEEKDAY_LABELS};
use crate::color_utils::{
    BLACK, CoursePalette, EXAM_SWATCH, GRAY_50, GRAY_200, GRAY_400, GRAY_500, Swatch, WHITE,
};
use crate::export::layout::{
    DrawOp, Font, PAGE_HEIGHT_MM, PAGE_WIDTH_MM, PageCanvas, line_height, wrap_paragraphs,
};
use chrono::Datelike;

const TITLE_SIZE: f32 = 16.0;
const MONTH_TITLE_SIZE: f32 = 14.0;
const LEGEND_SIZE: f32 = 10.0;
const WEEKDAY_SIZE: f32 = 8.0;
const DAY_NUMBER_SIZE: f32 = 8.0;
const EVENT_SIZE: f32 = 6.0;

const SWATCH_SIZE: f32 = 5.0;
const WEEKDAY_ROW: f32 = 7.0;
const MIN_WEEK_ROW: f32 = 20.0;
const CELL_PADDING: f32 = 1.0;
const EVENT_GAP: f32 = 1.0;
const EXAM_RING_WIDTH: f32 = 0.6;

pub const EXAM_LEGEND_LABEL: &str = "Exam Day";

/// Course colours and the exam marker, plus the semester range.
pub fn legend_page(view: &CalendarView, palette: &CoursePalette, margin: f32) -> PageCanvas {
    let mut canvas = PageCanvas::new();
    canvas.centered_text(
        PAGE_WIDTH_MM / 2.0,
        margin,
        TITLE_SIZE,
        Font::Bold,
        BLACK,
        "Course Calendar",
    );
    let subtitle = format!(
        "{} to {}",
        view.range.start.format("%B %-d, %Y"),
        view.range.end.format("%B %-d, %Y")
    );
    let mut y = margin + line_height(TITLE_SIZE);
    canvas.centered_text(
        PAGE_WIDTH_MM / 2.0,
        y,
        LEGEND_SIZE,
        Font::Regular,
        GRAY_500,
        &subtitle,
    );
    y += line_height(LEGEND_SIZE) + 6.0;

    canvas.text(margin, y, LEGEND_SIZE, Font::Bold, BLACK, "Legend");
    y += line_height(LEGEND_SIZE) + 2.0;

    let row = SWATCH_SIZE + 2.0;
    let label_x = margin + SWATCH_SIZE + 3.0;
    let label_width = PAGE_WIDTH_MM - margin - label_x;
    let draw_entry = |canvas: &mut PageCanvas, y: &mut f32, swatch: Swatch, label: &str| {
        draw_swatch(canvas, margin, *y, SWATCH_SIZE, SWATCH_SIZE, swatch);
        let lines = wrap_paragraphs(label, label_width, LEGEND_SIZE, Font::Regular);
        for (i, line) in lines.iter().enumerate() {
            let ly = *y + i as f32 * line_height(LEGEND_SIZE);
            canvas.text(label_x, ly, LEGEND_SIZE, Font::Regular, BLACK, line);
        }
        *y += row.max(lines.len() as f32 * line_height(LEGEND_SIZE) + 2.0);
    };

    for entry in &view.legend {
        draw_entry(&mut canvas, &mut y, palette.course(entry.color_index), &entry.title);
    }
    draw_entry(&mut canvas, &mut y, EXAM_SWATCH, EXAM_LEGEND_LABEL);
    canvas
}

fn draw_swatch(canvas: &mut PageCanvas, x: f32, y: f32, w: f32, h: f32, swatch: Swatch) {
    match swatch.ring {
        Some(ring) => canvas.rect(x, y, w, h, Some(swatch.background), Some(ring), EXAM_RING_WIDTH),
        None => canvas.fill_rect(x, y, w, h, swatch.background),
    }
}

/// Wrapped lines of one event box: course title (bold), topic, then assignments.
fn event_lines(event: &CalendarEvent, width: f32) -> Vec<(Font, String)> {
    let mut lines: Vec<(Font, String)> =
        wrap_paragraphs(&event.source_course_title, width, EVENT_SIZE, Font::Bold)
            .into_iter()
            .map(|l| (Font::Bold, l))
            .collect();
    lines.extend(
        wrap_paragraphs(&event.topic, width, EVENT_SIZE, Font::Regular)
            .into_iter()
            .map(|l| (Font::Regular, l)),
    );
    if let Some(assignments) = event.assignments.as_deref().filter(|a| !a.trim().is_empty()) {
        lines.extend(
            wrap_paragraphs(assignments, width, EVENT_SIZE, Font::Regular)
                .into_iter()
                .map(|l| (Font::Regular, l)),
        );
    }
    lines
}

fn event_box_height(line_count: usize) -> f32 {
    line_count as f32 * line_height(EVENT_SIZE) + 2.0 * CELL_PADDING
}

fn cell_height(cell: &DayCell, text_width: f32) -> f32 {
    let events: f32 = cell
        .events
        .iter()
        .map(|e| event_box_height(event_lines(e, text_width).len()) + EVENT_GAP)
        .sum();
    CELL_PADDING + line_height(DAY_NUMBER_SIZE) + events + CELL_PADDING
}

fn draw_cell(canvas: &mut PageCanvas, cell: &DayCell, palette: &CoursePalette, x: f32, y: f32, w: f32) {
    let text_width = w - 4.0 * CELL_PADDING;
    let number_color = if cell.in_range { BLACK } else { GRAY_400 };
    canvas.text(
        x + CELL_PADDING,
        y + CELL_PADDING,
        DAY_NUMBER_SIZE,
        Font::Bold,
        number_color,
        &cell.date.day().to_string(),
    );

    let mut ey = y + CELL_PADDING + line_height(DAY_NUMBER_SIZE);
    for event in &cell.events {
        let swatch = palette.event(event.color_index, event.is_exam);
        let lines = event_lines(event, text_width);
        let height = event_box_height(lines.len());
        draw_swatch(canvas, x + CELL_PADDING, ey, w - 2.0 * CELL_PADDING, height, swatch);
        for (i, (font, line)) in lines.iter().enumerate() {
            let ly = ey + CELL_PADDING + i as f32 * line_height(EVENT_SIZE);
            canvas.text(x + 2.0 * CELL_PADDING, ly, EVENT_SIZE, *font, swatch.text, line);
        }
        ey += height + EVENT_GAP;
    }
}

/// Lays a month out at full width, then scales it down if it would not fit
/// on one page.
pub fn month_page(month: &MonthView, palette: &CoursePalette, margin: f32) -> PageCanvas {
    let width = PAGE_WIDTH_MM - 2.0 * margin;
    let available = PAGE_HEIGHT_MM - 2.0 * margin;
    let cell_width = width / DAYS_PER_WEEK as f32;
    let text_width = cell_width - 4.0 * CELL_PADDING;

    // Local coordinates: origin at the top-left of the content box.
    let mut local = PageCanvas::new();
    local.centered_text(
        width / 2.0,
        0.0,
        MONTH_TITLE_SIZE,
        Font::Bold,
        BLACK,
        &month.title,
    );
    let grid_top = line_height(MONTH_TITLE_SIZE) + 3.0;

    local.fill_rect(0.0, grid_top, width, WEEKDAY_ROW, GRAY_200);
    for (i, label) in WEEKDAY_LABELS.iter().enumerate() {
        let center = (i as f32 + 0.5) * cell_width;
        let ty = grid_top + (WEEKDAY_ROW - line_height(WEEKDAY_SIZE)) / 2.0;
        local.centered_text(center, ty, WEEKDAY_SIZE, Font::Bold, BLACK, label);
    }

    let mut y = grid_top + WEEKDAY_ROW;
    for week in &month.weeks {
        let row_height = week
            .iter()
            .flatten()
            .map(|cell| cell_height(cell, text_width))
            .fold(MIN_WEEK_ROW, f32::max);
        for (i, slot) in week.iter().enumerate() {
            let x = i as f32 * cell_width;
            match slot {
                Some(cell) => {
                    let background = if cell.in_range { WHITE } else { GRAY_50 };
                    local.fill_rect(x, y, cell_width, row_height, background);
                    draw_cell(&mut local, cell, palette, x, y, cell_width);
                }
                None => local.fill_rect(x, y, cell_width, row_height, GRAY_50),
            }
            local.rect(x, y, cell_width, row_height, None, Some(GRAY_400), 0.2);
        }
        y += row_height;
    }

    let scale = if y > available { available / y } else { 1.0 };
    if scale < 1.0 {
        log::debug!("Scaling {} to {:.2} to fit one page", month.title, scale);
    }
    // Centre horizontally when shrunk.
    let dx = margin + (width - width * scale) / 2.0;
    let mut canvas = PageCanvas::new();
    canvas.extend(
        local
            .into_ops()
            .into_iter()
            .map(|op: DrawOp| op.transformed(scale, dx, margin)),
    );
    canvas
}
