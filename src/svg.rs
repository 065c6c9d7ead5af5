//! SVG visualization of a viewBox fit.
//!
//! Generates a vertical sequence of annotated panels: the source viewBox,
//! then the viewport with the fitted content and the visible region. Handy
//! for eyeballing `preserveAspectRatio` combinations.
//!
//! # Example
//!
//! ```
//! use zenviewbox::{PreserveAspectRatio, Size, ViewBox, svg::render_fit_svg};
//!
//! let par: PreserveAspectRatio = "xMaxYMid slice".parse().unwrap();
//! let svg = render_fit_svg(
//!     ViewBox::new(0.0, 0.0, 100.0, 50.0),
//!     Size::new(80.0, 80.0),
//!     par,
//! )
//! .unwrap();
//! assert!(svg.starts_with("<svg"));
//! ```

use crate::aspect::{PreserveAspectRatio, ViewBoxError, visible_rect};
use crate::geometry::{Rect, Size, ViewBox};

/// Maximum width for any panel in the SVG output.
const MAX_PANEL_W: f64 = 300.0;
/// Maximum height for any panel in the SVG output.
const MAX_PANEL_H: f64 = 200.0;
/// Vertical gap between panels.
const PANEL_GAP: f64 = 50.0;
/// Horizontal margin.
const MARGIN_X: f64 = 50.0;
/// Top margin for first panel.
const MARGIN_TOP: f64 = 30.0;
/// Height of label text area above each panel.
const LABEL_H: f64 = 22.0;

/// A single panel in the visualization.
struct Step {
    label: String,
    /// The panel's bounding box, in its own units.
    outer: Size,
    /// Fitted content, relative to `outer`. May extend past it (slice).
    content: Option<Rect>,
    /// Region of `outer` actually covered by content.
    visible: Option<Rect>,
    annotation: String,
}

/// Render a complete SVG document showing `view_box` fitted into `viewport`.
///
/// Fails with the same errors as [`compute`](crate::aspect::compute).
pub fn render_fit_svg(
    view_box: ViewBox,
    viewport: Size,
    par: PreserveAspectRatio,
) -> Result<String, ViewBoxError> {
    let t = par.compute(view_box, viewport)?;
    let visible = visible_rect(view_box, viewport, par)?;

    let steps = [
        Step {
            label: format!(
                "ViewBox  {}×{}",
                fmt_num(view_box.width),
                fmt_num(view_box.height)
            ),
            outer: view_box.size(),
            content: None,
            visible: None,
            annotation: format!(
                "origin ({}, {})",
                fmt_num(view_box.min_x),
                fmt_num(view_box.min_y)
            ),
        },
        Step {
            label: format!(
                "Viewport  {}×{}  {} {}",
                fmt_num(viewport.width),
                fmt_num(viewport.height),
                par.align.keyword(),
                par.meet_or_slice.keyword()
            ),
            outer: viewport,
            content: Some(t.map_view_box(&view_box)),
            visible: Some(visible),
            annotation: format!(
                "scale ({}, {}) translate ({}, {})",
                fmt_num(t.scale_x),
                fmt_num(t.scale_y),
                fmt_num(t.translate_x),
                fmt_num(t.translate_y)
            ),
        },
    ];
    Ok(render_steps(&steps))
}

/// Scale a size to fit within MAX_PANEL_W × MAX_PANEL_H, preserving aspect ratio.
fn scale_to_fit(size: Size) -> (f64, f64, f64) {
    let (w, h) = (size.width, size.height);
    if w <= 0.0 || h <= 0.0 {
        return (1.0, 1.0, 1.0);
    }
    let scale = (MAX_PANEL_W / w).min(MAX_PANEL_H / h);
    (w * scale, h * scale, scale)
}

/// Up to three decimals, trailing zeros trimmed.
fn fmt_num(v: f64) -> String {
    let s = format!("{v:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { String::from("0") } else { String::from(s) }
}

/// Render panels into a complete SVG document.
fn render_steps(steps: &[Step]) -> String {
    let total_h = MARGIN_TOP * 2.0
        + steps.len() as f64 * (LABEL_H + MAX_PANEL_H)
        + steps.len().saturating_sub(1) as f64 * PANEL_GAP;
    let total_w = MAX_PANEL_W + 2.0 * MARGIN_X;

    let mut svg = String::with_capacity(4096);

    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        total_w as u32, total_h as u32, total_w, total_h
    ));
    svg.push('\n');

    // Style: light/dark mode via prefers-color-scheme
    svg.push_str(
        r##"<style>
  text { font-family: "Consolas", "DejaVu Sans Mono", "Courier New", monospace; }
  .label { font-size: 13px; font-weight: bold; fill: #333; }
  .annotation { font-size: 11px; fill: #666; }
  .outer { fill: #e8e8e8; stroke: #999; stroke-width: 1; }
  .content { fill: none; stroke: #2c6faa; stroke-width: 1.5; stroke-dasharray: 4,2; }
  .visible { fill: #6ba3d6; stroke: #2c6faa; stroke-width: 1; }
  .arrow { stroke: #666; stroke-width: 1.5; fill: none; marker-end: url(#arrowhead); }
  .arrowhead { fill: #666; }
  @media (prefers-color-scheme: dark) {
    .label { fill: #e0e0e0; }
    .annotation { fill: #aaa; }
    .outer { fill: #2d2d2d; stroke: #555; }
    .content { stroke: #5a9fd4; }
    .visible { fill: #3a72a4; stroke: #5a9fd4; }
    .arrow { stroke: #888; }
    .arrowhead { fill: #888; }
  }
</style>
"##,
    );

    svg.push_str(
        r##"<defs>
  <marker id="arrowhead" markerWidth="8" markerHeight="6" refX="8" refY="3" orient="auto">
    <polygon points="0 0, 8 3, 0 6" class="arrowhead"/>
  </marker>
</defs>
"##,
    );

    let mut y = MARGIN_TOP;
    let center_x = total_w / 2.0;

    for (i, step) in steps.iter().enumerate() {
        svg.push_str(&format!(
            r#"<text x="{}" y="{}" class="label" text-anchor="middle">{}</text>"#,
            center_x,
            y + 14.0,
            escape_xml(&step.label)
        ));
        svg.push('\n');
        y += LABEL_H;

        let (sw, sh, scale) = scale_to_fit(step.outer);
        let panel_x = center_x - sw / 2.0;
        let panel_y = y;

        svg.push_str(&format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" class="outer" rx="2"/>"#,
            panel_x, panel_y, sw, sh
        ));
        svg.push('\n');

        let to_panel = |r: &Rect| {
            (
                panel_x + r.x * scale,
                panel_y + r.y * scale,
                r.width * scale,
                r.height * scale,
            )
        };

        match &step.visible {
            Some(v) => {
                let (vx, vy, vw, vh) = to_panel(v);
                svg.push_str(&format!(
                    r#"<rect x="{vx:.1}" y="{vy:.1}" width="{vw:.1}" height="{vh:.1}" class="visible"/>"#
                ));
            }
            None => {
                svg.push_str(&format!(
                    r#"<rect x="{panel_x:.1}" y="{panel_y:.1}" width="{sw:.1}" height="{sh:.1}" class="visible" rx="2"/>"#
                ));
            }
        }
        svg.push('\n');

        // Content outline last so overflow past the panel stays visible.
        if let Some(c) = &step.content {
            let (cx, cy, cw, ch) = to_panel(c);
            svg.push_str(&format!(
                r#"<rect x="{cx:.1}" y="{cy:.1}" width="{cw:.1}" height="{ch:.1}" class="content"/>"#
            ));
            svg.push('\n');
        }

        if !step.annotation.is_empty() {
            svg.push_str(&format!(
                r#"<text x="{}" y="{:.1}" class="annotation" text-anchor="middle">{}</text>"#,
                center_x,
                panel_y + sh + 14.0,
                escape_xml(&step.annotation)
            ));
            svg.push('\n');
        }

        y += MAX_PANEL_H;

        if i < steps.len() - 1 {
            let arrow_top = y + 8.0;
            let arrow_bot = y + PANEL_GAP - 8.0;
            svg.push_str(&format!(
                r#"<line x1="{}" y1="{:.1}" x2="{}" y2="{:.1}" class="arrow"/>"#,
                center_x, arrow_top, center_x, arrow_bot
            ));
            svg.push('\n');
            y += PANEL_GAP;
        }
    }

    svg.push_str("</svg>\n");
    svg
}

/// Escape special characters for XML text content.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
