use pdf_writer::{Content, Name, Str};

use crate::assembly::Annotation;
use crate::config::{AnnotStyle, Rgb};
use crate::error::Error;
use crate::fonts::{FontEntry, FontSet, to_winansi_bytes};
use crate::layout::arrange_in_two;

/// Annotations are laid out on a canvas this many times larger than their
/// box, then scaled down onto the page.
const CANVAS_RATIO: f32 = 2.3;
/// Text inset from the box edges, in font sizes.
const EXTRA_MARGIN: f32 = 0.3;

fn fill(content: &mut Content, c: Rgb) {
    content.set_fill_rgb(c.r, c.g, c.b);
}

fn stroke(content: &mut Content, c: Rgb) {
    content.set_stroke_rgb(c.r, c.g, c.b);
}

/// Lines ending with a closing parenthesis are unit headers, e.g.
/// `Intercessor Squad (80 points)`.
fn is_header_line(line: &str) -> bool {
    line.ends_with(')')
}

fn draw_column(
    content: &mut Content,
    text: &str,
    x: f32,
    first_baseline: f32,
    font_size: f32,
    line_h: f32,
    fonts: &FontSet,
) {
    for (i, line) in text.split('\n').enumerate() {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        let font: &FontEntry = if is_header_line(line) {
            &fonts.bold
        } else {
            &fonts.regular
        };
        content
            .begin_text()
            .set_font(Name(font.pdf_name.as_bytes()), font_size)
            .next_line(x, first_baseline - i as f32 * line_h)
            .show(Str(&to_winansi_bytes(line)))
            .end_text();
    }
}

/// Draw a filled box at `annotation.region` holding its text in up to two
/// columns. Overflowing text is still drawn and logged.
pub(super) fn draw_annotation(
    content: &mut Content,
    annotation: &Annotation,
    style: &AnnotStyle,
    fonts: &FontSet,
) -> Result<(), Error> {
    let region = annotation.region;
    let font_size = annotation.font_size.unwrap_or(style.font_size);
    let line_h = style.line_height(font_size);
    let canvas_w = region.w * CANVAS_RATIO;
    let canvas_h = region.h * CANVAS_RATIO;

    let lines_limit = (canvas_h / line_h).floor().max(0.0) as usize;
    let split = arrange_in_two(&annotation.text, lines_limit, annotation.separator)?;
    for overflow in &split.overflows {
        log::warn!(
            "Overflowing text in column {} ({} lines for {lines_limit}): {:?}",
            overflow.column,
            overflow.lines,
            overflow.text,
        );
    }

    content.save_state();
    content.transform([
        1.0 / CANVAS_RATIO,
        0.0,
        0.0,
        1.0 / CANVAS_RATIO,
        region.x,
        region.y,
    ]);

    fill(content, style.color_bg);
    stroke(content, style.color_br);
    content.set_line_width(1.0);
    content.rect(0.0, 0.0, canvas_w, canvas_h).fill_nonzero_and_stroke();

    fill(content, style.color_fg);
    let inset = EXTRA_MARGIN * font_size;
    let first_baseline = canvas_h - (1.0 + (EXTRA_MARGIN - 0.2).max(0.0)) * font_size;
    draw_column(
        content,
        &split.column1,
        inset,
        first_baseline,
        font_size,
        line_h,
        fonts,
    );

    if !split.column2.is_empty() {
        let mid_x = canvas_w / 2.0;
        content.move_to(mid_x, 0.0);
        content.line_to(mid_x, canvas_h);
        content.stroke();
        draw_column(
            content,
            &split.column2,
            mid_x + inset,
            first_baseline,
            font_size,
            line_h,
            fonts,
        );
    }

    content.restore_state();
    Ok(())
}
