use std::fmt::{self, Write};

use crate::error::{TimelineError, TimelineResult};
use crate::render::{BarRect, GroupFrame, Renderer, TimelineFrame};

/// Serializes frames into a standalone SVG document.
///
/// Each group becomes one `<g>` carrying `visibility` and `transform`, so a
/// host can patch attributes in place instead of re-emitting bars on zoom.
#[derive(Debug, Default)]
pub struct SvgRenderer {
    document: String,
}

impl SvgRenderer {
    #[must_use]
    pub fn document(&self) -> &str {
        &self.document
    }

    #[must_use]
    pub fn into_document(self) -> String {
        self.document
    }
}

impl Renderer for SvgRenderer {
    fn render(&mut self, frame: &TimelineFrame) -> TimelineResult<()> {
        frame.validate()?;
        let mut document = String::new();
        write_document(&mut document, frame).map_err(|e| {
            TimelineError::InvalidData(format!("failed to write svg document: {e}"))
        })?;
        self.document = document;
        Ok(())
    }
}

fn write_document(out: &mut String, frame: &TimelineFrame) -> fmt::Result {
    write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" id="timeline-svg-{}" width="{}" height="{}">"#,
        escape_attr(&frame.chart_id),
        frame.width,
        frame.height
    )?;
    write!(
        out,
        r#"<defs><filter id="blur"><feGaussianBlur stdDeviation="{}"/></filter></defs>"#,
        frame.blur_std_deviation
    )?;
    for group in &frame.groups {
        write_group(out, group)?;
    }
    out.write_str("</svg>")
}

fn write_group(out: &mut String, group: &GroupFrame) -> fmt::Result {
    write!(
        out,
        r#"<g data-start="{}" data-end="{}" visibility="{}""#,
        group.start,
        group.end,
        group.container.visibility()
    )?;
    if let Some(transform) = group.container.transform() {
        write!(out, r#" transform="{transform}""#)?;
    }
    out.write_char('>')?;
    for rect in group.container.rects() {
        let (sharp, blurred) = rect.blur_split();
        if sharp > 0.0 {
            write_rect(out, rect, rect.x, sharp, false)?;
        }
        if blurred > 0.0 {
            write_rect(out, rect, rect.x + sharp, blurred, true)?;
        }
    }
    out.write_str("</g>")
}

fn write_rect(
    out: &mut String,
    rect: &BarRect,
    x: f64,
    width: f64,
    blurred: bool,
) -> fmt::Result {
    write!(
        out,
        r#"<rect class="bar" x="{x}" y="{}" width="{width}" height="{}" fill="{}""#,
        rect.y,
        rect.height,
        rect.fill.to_hex()
    )?;
    if blurred {
        out.write_str(r#" filter="url(#blur)""#)?;
    }
    out.write_str("/>")
}

fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
