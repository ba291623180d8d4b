// File: ./src/export/layout.rs
//! Page geometry and drawing primitives.
//!
//! Layout works in millimetres with the origin at the top-left corner of the
//! page and y growing downwards. The PDF writer flips to PDF user space.
use crate::color_utils::Rgb;
use unicode_width::UnicodeWidthStr;

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const PT_TO_MM: f32 = 25.4 / 72.0;

/// Average Helvetica glyph advance as a fraction of the font size.
const REGULAR_ADVANCE: f32 = 0.5;
const BOLD_ADVANCE: f32 = 0.55;
const LINE_SPACING: f32 = 1.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    pub fn resource_name(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }

    fn advance(self) -> f32 {
        match self {
            Font::Regular => REGULAR_ADVANCE,
            Font::Bold => BOLD_ADVANCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// `y` is the top of the line box.
    Text {
        x: f32,
        y: f32,
        size: f32,
        font: Font,
        color: Rgb,
        text: String,
    },
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        fill: Option<Rgb>,
        stroke: Option<Rgb>,
        line_width: f32,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        color: Rgb,
        line_width: f32,
    },
}

impl DrawOp {
    /// Scales about the origin, then shifts by (`dx`, `dy`).
    pub fn transformed(self, scale: f32, dx: f32, dy: f32) -> Self {
        let px = |x: f32| dx + x * scale;
        let py = |y: f32| dy + y * scale;
        match self {
            DrawOp::Text {
                x,
                y,
                size,
                font,
                color,
                text,
            } => DrawOp::Text {
                x: px(x),
                y: py(y),
                size: size * scale,
                font,
                color,
                text,
            },
            DrawOp::Rect {
                x,
                y,
                w,
                h,
                fill,
                stroke,
                line_width,
            } => DrawOp::Rect {
                x: px(x),
                y: py(y),
                w: w * scale,
                h: h * scale,
                fill,
                stroke,
                line_width: line_width * scale,
            },
            DrawOp::Line {
                x1,
                y1,
                x2,
                y2,
                color,
                line_width,
            } => DrawOp::Line {
                x1: px(x1),
                y1: py(y1),
                x2: px(x2),
                y2: py(y2),
                color,
                line_width: line_width * scale,
            },
        }
    }
}

/// Height of one text line in millimetres.
pub fn line_height(size: f32) -> f32 {
    size * PT_TO_MM * LINE_SPACING
}

/// Approximate rendered width in millimetres.
pub fn text_width(text: &str, size: f32, font: Font) -> f32 {
    UnicodeWidthStr::width(text) as f32 * size * font.advance() * PT_TO_MM
}

/// Greedy word wrap. Words wider than the line are broken by character.
/// Always returns at least one (possibly empty) line.
pub fn wrap_text(text: &str, max_width: f32, size: f32, font: Font) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if text_width(&candidate, size, font) <= max_width {
            current = candidate;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if text_width(word, size, font) <= max_width {
            current = word.to_string();
            continue;
        }
        for ch in word.chars() {
            current.push(ch);
            if text_width(&current, size, font) > max_width && current.chars().count() > 1 {
                current.pop();
                lines.push(std::mem::replace(&mut current, ch.to_string()));
            }
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Wraps multi-line text, keeping explicit line breaks.
pub fn wrap_paragraphs(text: &str, max_width: f32, size: f32, font: Font) -> Vec<String> {
    text.lines()
        .flat_map(|line| wrap_text(&pdf_safe(line), max_width, size, font))
        .collect()
}

/// WinAnsi code points 0x80..=0x9F that differ from Latin-1.
const WIN_ANSI_HIGH: [(char, u8); 27] = [
    ('\u{20AC}', 0x80),
    ('\u{201A}', 0x82),
    ('\u{0192}', 0x83),
    ('\u{201E}', 0x84),
    ('\u{2026}', 0x85),
    ('\u{2020}', 0x86),
    ('\u{2021}', 0x87),
    ('\u{02C6}', 0x88),
    ('\u{2030}', 0x89),
    ('\u{0160}', 0x8A),
    ('\u{2039}', 0x8B),
    ('\u{0152}', 0x8C),
    ('\u{017D}', 0x8E),
    ('\u{2018}', 0x91),
    ('\u{2019}', 0x92),
    ('\u{201C}', 0x93),
    ('\u{201D}', 0x94),
    ('\u{2022}', 0x95),
    ('\u{2013}', 0x96),
    ('\u{2014}', 0x97),
    ('\u{02DC}', 0x98),
    ('\u{2122}', 0x99),
    ('\u{0161}', 0x9A),
    ('\u{203A}', 0x9B),
    ('\u{0153}', 0x9C),
    ('\u{017E}', 0x9E),
    ('\u{0178}', 0x9F),
];

/// Single-byte WinAnsi code for `c`, if the standard fonts can show it.
pub fn win_ansi_byte(c: char) -> Option<u8> {
    match c as u32 {
        0x20..=0x7E | 0xA0..=0xFF => u8::try_from(c as u32).ok(),
        _ => WIN_ANSI_HIGH
            .iter()
            .find(|(ch, _)| *ch == c)
            .map(|(_, byte)| *byte),
    }
}

/// Encodes already-folded text for a `Tj` operand.
pub fn win_ansi_bytes(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| win_ansi_byte(c).unwrap_or(b'?'))
        .collect()
}

/// The standard fonts only cover WinAnsi. A few lookalikes outside it are
/// folded to their nearest WinAnsi character; anything else becomes '?'.
pub fn pdf_safe(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{201B}' => '\'',
            '\u{201F}' => '"',
            '\u{2010}' | '\u{2011}' | '\u{2212}' => '-',
            '\u{2015}' => '\u{2014}',
            '\t' => ' ',
            c if win_ansi_byte(c).is_some() => c,
            _ => '?',
        })
        .collect()
}

/// A single page under construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageCanvas {
    ops: Vec<DrawOp>,
}

impl PageCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&mut self, x: f32, y: f32, size: f32, font: Font, color: Rgb, text: &str) {
        if text.is_empty() {
            return;
        }
        self.ops.push(DrawOp::Text {
            x,
            y,
            size,
            font,
            color,
            text: pdf_safe(text),
        });
    }

    pub fn centered_text(&mut self, center_x: f32, y: f32, size: f32, font: Font, color: Rgb, text: &str) {
        let x = center_x - text_width(text, size, font) / 2.0;
        self.text(x, y, size, font, color, text);
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, fill: Rgb) {
        self.rect(x, y, w, h, Some(fill), None, 0.0);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn rect(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        fill: Option<Rgb>,
        stroke: Option<Rgb>,
        line_width: f32,
    ) {
        self.ops.push(DrawOp::Rect {
            x,
            y,
            w,
            h,
            fill,
            stroke,
            line_width,
        });
    }

    pub fn line(&mut self, (x1, y1): (f32, f32), (x2, y2): (f32, f32), color: Rgb, line_width: f32) {
        self.ops.push(DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            color,
            line_width,
        });
    }

    pub fn extend(&mut self, ops: impl IntoIterator<Item = DrawOp>) {
        self.ops.extend(ops);
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<DrawOp> {
        self.ops
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_respects_width_and_keeps_words() {
        let lines = wrap_text("alpha beta gamma delta epsilon", 20.0, 10.0, Font::Regular);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, 10.0, Font::Regular) <= 20.0);
        }
        assert_eq!(lines.join(" "), "alpha beta gamma delta epsilon");
    }

    #[test]
    fn test_wrap_breaks_overlong_word() {
        let word = "x".repeat(80);
        let lines = wrap_text(&word, 15.0, 10.0, Font::Bold);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
    }

    #[test]
    fn test_wrap_paragraphs_keeps_blank_lines() {
        let lines = wrap_paragraphs("Grade Weights:\n\nGrade Scale:", 100.0, 9.0, Font::Regular);
        assert_eq!(lines, vec!["Grade Weights:", "", "Grade Scale:"]);
    }

    #[test]
    fn test_pdf_safe_keeps_win_ansi_and_folds_the_rest() {
        assert_eq!(
            pdf_safe("Jos\u{e9} N\u{fa}\u{f1}ez \u{2014} Caf\u{e9}"),
            "Jos\u{e9} N\u{fa}\u{f1}ez \u{2014} Caf\u{e9}"
        );
        assert_eq!(pdf_safe("\u{201C}Quiz\u{201D}\t\u{2212}1"), "\u{201C}Quiz\u{201D} -1");
        assert_eq!(pdf_safe("\u{65e5}\u{672c} \u{3b1}"), "?? ?");
    }

    #[test]
    fn test_win_ansi_bytes_use_single_byte_codes() {
        assert_eq!(
            win_ansi_bytes("Caf\u{e9} \u{2014} \u{20AC}5 \u{2019}"),
            vec![b'C', b'a', b'f', 0xE9, b' ', 0x97, b' ', 0x80, b'5', b' ', 0x92]
        );
        assert_eq!(win_ansi_byte('\u{3b1}'), None);
        assert_eq!(win_ansi_byte('\u{1}'), None);
    }

    #[test]
    fn test_transform_scales_geometry_and_font() {
        let op = DrawOp::Text {
            x: 10.0,
            y: 20.0,
            size: 8.0,
            font: Font::Regular,
            color: (0.0, 0.0, 0.0),
            text: "a".into(),
        }
        .transformed(0.5, 10.0, 10.0);
        match op {
            DrawOp::Text { x, y, size, .. } => {
                assert_eq!((x, y, size), (15.0, 20.0, 4.0));
            }
            other => panic!("unexpected op {:?}", other),
        }
    }
}
