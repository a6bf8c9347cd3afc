//! Donut chart for the match percentage, rendered as a standalone SVG document.

use std::f64::consts::PI;

const WIDTH: u32 = 300;
const HEIGHT: u32 = 330;
const CENTER_X: f64 = 150.0;
const CENTER_Y: f64 = 180.0;
const OUTER_RADIUS: f64 = 110.0;
/// Ring thickness as a fraction of the outer radius.
const RING_WIDTH_RATIO: f64 = 0.4;

const BACKGROUND: &str = "#0a0a0a";
const ACCENT: &str = "#00ffff";
const TRACK: &str = "#1a1a1a";
const EDGE: &str = "#333333";
const MUTED: &str = "#888888";

/// Renders the donut chart. Values above 100 are clamped.
///
/// The ring is a single stroked circle; the filled share is drawn with a
/// dash pattern starting at twelve o'clock.
pub fn render_donut_svg(percentage: u8) -> String {
    let percentage = percentage.min(100);
    let ring_width = OUTER_RADIUS * RING_WIDTH_RATIO;
    let radius = OUTER_RADIUS - ring_width / 2.0;
    let circumference = 2.0 * PI * radius;
    let filled = circumference * f64::from(percentage) / 100.0;

    let arc = match percentage {
        0 => String::new(),
        100 => format!(
            r#"<circle class="arc" cx="{CENTER_X}" cy="{CENTER_Y}" r="{radius:.2}" fill="none" stroke="{ACCENT}" stroke-width="{ring_width:.2}"/>"#
        ),
        _ => format!(
            r#"<circle class="arc" cx="{CENTER_X}" cy="{CENTER_Y}" r="{radius:.2}" fill="none" stroke="{ACCENT}" stroke-width="{ring_width:.2}" stroke-dasharray="{filled:.2} {circumference:.2}" transform="rotate(-90 {CENTER_X} {CENTER_Y})"/>"#
        ),
    };

    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" role="img" aria-label="Resume match score {p}%">"#,
            r#"<rect width="100%" height="100%" fill="{bg}"/>"#,
            r#"<text x="{cx}" y="36" text-anchor="middle" font-family="sans-serif" font-size="14" fill="{accent}">Resume Match Score</text>"#,
            r#"<circle class="track" cx="{cx}" cy="{cy}" r="{r:.2}" fill="none" stroke="{track}" stroke-width="{rw:.2}"/>"#,
            r#"<circle cx="{cx}" cy="{cy}" r="{outer:.2}" fill="none" stroke="{edge}" stroke-width="1"/>"#,
            r#"<circle cx="{cx}" cy="{cy}" r="{inner:.2}" fill="none" stroke="{edge}" stroke-width="1"/>"#,
            "{arc}",
            r#"<text x="{cx}" y="{cy}" text-anchor="middle" dominant-baseline="middle" font-family="sans-serif" font-size="24" font-weight="bold" fill="{accent}">{p}%</text>"#,
            r#"<text x="{cx}" y="{label_y}" text-anchor="middle" font-family="sans-serif" font-size="12" font-weight="bold" fill="{muted}">MATCH</text>"#,
            "</svg>"
        ),
        w = WIDTH,
        h = HEIGHT,
        p = percentage,
        bg = BACKGROUND,
        accent = ACCENT,
        track = TRACK,
        edge = EDGE,
        muted = MUTED,
        cx = CENTER_X,
        cy = CENTER_Y,
        r = radius,
        rw = ring_width,
        outer = OUTER_RADIUS,
        inner = OUTER_RADIUS - ring_width,
        label_y = CENTER_Y + 30.0,
        arc = arc,
    )
}
