// File: ./src/export/pdf.rs
//! Serializes laid-out pages into a PDF document.
use crate::color_utils::Rgb;
use crate::export::layout::{
    DrawOp, Font, PAGE_HEIGHT_MM, PAGE_WIDTH_MM, PT_TO_MM, win_ansi_bytes,
};
use anyhow::{Context, Result};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, StringFormat, dictionary};

fn pt(mm: f32) -> f32 {
    mm / PT_TO_MM
}

/// Baseline sits roughly 80% down the line box.
const BASELINE: f32 = 0.8;

fn color_operands((r, g, b): Rgb) -> Vec<Object> {
    vec![r.into(), g.into(), b.into()]
}

fn encode_ops(ops: &[DrawOp]) -> Vec<Operation> {
    let flip = |y_mm: f32| pt(PAGE_HEIGHT_MM - y_mm);
    let mut out = Vec::new();

    for op in ops {
        match op {
            DrawOp::Text {
                x,
                y,
                size,
                font,
                color,
                text,
            } => {
                let baseline = y + size * PT_TO_MM * BASELINE;
                out.push(Operation::new("BT", vec![]));
                out.push(Operation::new("rg", color_operands(*color)));
                out.push(Operation::new(
                    "Tf",
                    vec![font.resource_name().into(), (*size).into()],
                ));
                out.push(Operation::new("Td", vec![pt(*x).into(), flip(baseline).into()]));
                out.push(Operation::new(
                    "Tj",
                    vec![Object::String(win_ansi_bytes(text), StringFormat::Literal)],
                ));
                out.push(Operation::new("ET", vec![]));
            }
            DrawOp::Rect {
                x,
                y,
                w,
                h,
                fill,
                stroke,
                line_width,
            } => {
                let operator = match (fill, stroke) {
                    (Some(_), Some(_)) => "B",
                    (Some(_), None) => "f",
                    (None, Some(_)) => "S",
                    (None, None) => continue,
                };
                if let Some(fill) = fill {
                    out.push(Operation::new("rg", color_operands(*fill)));
                }
                if let Some(stroke) = stroke {
                    out.push(Operation::new("RG", color_operands(*stroke)));
                    out.push(Operation::new("w", vec![pt(*line_width).into()]));
                }
                out.push(Operation::new(
                    "re",
                    vec![
                        pt(*x).into(),
                        flip(y + h).into(),
                        pt(*w).into(),
                        pt(*h).into(),
                    ],
                ));
                out.push(Operation::new(operator, vec![]));
            }
            DrawOp::Line {
                x1,
                y1,
                x2,
                y2,
                color,
                line_width,
            } => {
                out.push(Operation::new("RG", color_operands(*color)));
                out.push(Operation::new("w", vec![pt(*line_width).into()]));
                out.push(Operation::new("m", vec![pt(*x1).into(), flip(*y1).into()]));
                out.push(Operation::new("l", vec![pt(*x2).into(), flip(*y2).into()]));
                out.push(Operation::new("S", vec![]));
            }
        }
    }
    out
}

fn font_dict(base_font: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    }
}

/// Writes one A4 page per entry in `pages`.
pub fn render(pages: &[Vec<DrawOp>]) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(font_dict("Helvetica"));
    let bold_id = doc.add_object(font_dict("Helvetica-Bold"));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            Font::Regular.resource_name() => regular_id,
            Font::Bold.resource_name() => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for (index, ops) in pages.iter().enumerate() {
        let content = Content {
            operations: encode_ops(ops),
        };
        let bytes = content
            .encode()
            .with_context(|| format!("Failed to encode page {}", index + 1))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, bytes));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let media_box: Vec<Object> = vec![
        0.into(),
        0.into(),
        pt(PAGE_WIDTH_MM).into(),
        pt(PAGE_HEIGHT_MM).into(),
    ];
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => media_box,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .context("Failed to serialize PDF document")?;
    Ok(buffer)
}
