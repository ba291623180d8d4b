// File: ./src/color_utils.rs
// Course colour palette used to tell overlapping calendar events apart.
// Colours are (r, g, b) tuples in [0.0, 1.0] so the PDF writer can use them directly.

use serde::{Deserialize, Serialize};

pub type Rgb = (f32, f32, f32);

pub const BLACK: Rgb = (0.0, 0.0, 0.0);
pub const WHITE: Rgb = (1.0, 1.0, 1.0);
pub const GRAY_50: Rgb = (0.976, 0.980, 0.984);
pub const GRAY_200: Rgb = (0.898, 0.906, 0.922);
pub const GRAY_400: Rgb = (0.612, 0.639, 0.686);
pub const GRAY_500: Rgb = (0.420, 0.447, 0.502);

/// Reserved exam treatment, never part of the course rotation.
pub const EXAM_BACKGROUND: Rgb = (0.996, 0.886, 0.886); // red-100
pub const EXAM_RING: Rgb = (0.937, 0.267, 0.267); // red-500
pub const EXAM_TEXT: Rgb = (0.498, 0.114, 0.114); // red-900

/// A course colour as stored in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseColor {
    pub background: String,
    pub text: String,
}

impl CourseColor {
    fn new(background: &str, text: &str) -> Self {
        Self {
            background: background.to_string(),
            text: text.to_string(),
        }
    }
}

/// Blue, emerald, purple, amber, rose, cyan (200 backgrounds, 900 text).
pub fn default_course_colors() -> Vec<CourseColor> {
    vec![
        CourseColor::new("#BFDBFE", "#1E3A8A"),
        CourseColor::new("#A7F3D0", "#064E3B"),
        CourseColor::new("#E9D5FF", "#581C87"),
        CourseColor::new("#FDE68A", "#78350F"),
        CourseColor::new("#FECDD3", "#881337"),
        CourseColor::new("#A5F3FC", "#164E63"),
    ]
}

/// Resolved background/text pair for a calendar event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Swatch {
    pub background: Rgb,
    pub text: Rgb,
    pub ring: Option<Rgb>,
}

pub const EXAM_SWATCH: Swatch = Swatch {
    background: EXAM_BACKGROUND,
    text: EXAM_TEXT,
    ring: Some(EXAM_RING),
};

#[derive(Debug, Clone, PartialEq)]
pub struct CoursePalette {
    colors: Vec<Swatch>,
}

impl CoursePalette {
    /// Builds a palette from config entries. Unparsable entries are skipped;
    /// an empty result falls back to the defaults.
    pub fn from_config(colors: &[CourseColor]) -> Self {
        let parsed: Vec<Swatch> = colors
            .iter()
            .filter_map(|c| {
                let swatch = parse_hex_to_floats(&c.background)
                    .zip(parse_hex_to_floats(&c.text))
                    .map(|(background, text)| Swatch {
                        background,
                        text,
                        ring: None,
                    });
                if swatch.is_none() {
                    log::warn!(
                        "Ignoring course colour {} / {}: expected #RRGGBB",
                        c.background,
                        c.text
                    );
                }
                swatch
            })
            .collect();

        if parsed.is_empty() {
            return Self::default();
        }
        Self { colors: parsed }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Colour for a 1-based course index. Indices beyond the palette reuse colours.
    pub fn course(&self, color_index: usize) -> Swatch {
        let slot = color_index.saturating_sub(1) % self.colors.len();
        self.colors[slot]
    }

    /// Exam events always get the reserved red treatment.
    pub fn event(&self, color_index: usize, is_exam: bool) -> Swatch {
        if is_exam {
            EXAM_SWATCH
        } else {
            self.course(color_index)
        }
    }
}

impl Default for CoursePalette {
    fn default() -> Self {
        let colors = default_course_colors()
            .iter()
            .filter_map(|c| {
                Some(Swatch {
                    background: parse_hex_to_floats(&c.background)?,
                    text: parse_hex_to_floats(&c.text)?,
                    ring: None,
                })
            })
            .collect();
        Self { colors }
    }
}

/// Parse a hex color string like "#RRGGBB" or "RRGGBB" into floats (0.0..1.0).
pub fn parse_hex_to_floats(hex: &str) -> Option<Rgb> {
    let hex = hex.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0))
}
