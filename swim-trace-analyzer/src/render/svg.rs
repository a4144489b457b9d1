use std::fmt::Write;
use std::path::{Path, PathBuf};

use crate::chart::{ChartView, LatencyChart, Palette, Panel};
use crate::config::DEFAULT_CHART_PATH;
use crate::error::{AnalyzerError, Result};

use super::{check_chart_path, RenderOutcome, Renderer};

const TITLE_HEIGHT: f64 = 40.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 30.0;
const MARGIN_BOTTOM: f64 = 45.0;
const GRID_LINES: usize = 4;

/// Writes the chart as a 2x2 grid of line plots in one SVG document.
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    pub panel_width: f64,
    pub panel_height: f64,
    pub default_path: PathBuf,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            panel_width: 700.0,
            panel_height: 500.0,
            default_path: PathBuf::from(DEFAULT_CHART_PATH),
        }
    }
}

impl Renderer for SvgRenderer {
    fn render(&self, chart: &LatencyChart, output: Option<&Path>) -> Result<RenderOutcome> {
        let path = output.map_or_else(|| self.default_path.clone(), Path::to_path_buf);
        check_chart_path(&path)?;
        std::fs::write(&path, self.document(chart)).map_err(|e| {
            AnalyzerError::RenderingUnavailable(format!("cannot write {}: {e}", path.display()))
        })?;
        Ok(RenderOutcome::Written(path))
    }
}

impl SvgRenderer {
    pub fn document(&self, chart: &LatencyChart) -> String {
        let width = self.panel_width * 2.0;
        let rows = chart.panels.len().div_ceil(2).max(1);
        let height = TITLE_HEIGHT + self.panel_height * rows as f64;

        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" font-family="sans-serif" font-size="11">"#
        );
        let _ = writeln!(out, r#"<rect width="100%" height="100%" fill="white"/>"#);
        let _ = writeln!(
            out,
            r#"<text x="{}" y="26" text-anchor="middle" font-size="16" font-weight="bold">{}</text>"#,
            width / 2.0,
            escape(&chart.title)
        );

        for (i, panel) in chart.panels.iter().enumerate() {
            let x0 = (i % 2) as f64 * self.panel_width;
            let y0 = TITLE_HEIGHT + (i / 2) as f64 * self.panel_height;
            self.draw_panel(&mut out, panel, chart.palette, x0, y0);
        }
        out.push_str("</svg>\n");
        out
    }

    fn draw_panel(&self, out: &mut String, panel: &Panel, palette: Palette, x0: f64, y0: f64) {
        let left = x0 + MARGIN_LEFT;
        let top = y0 + MARGIN_TOP;
        let w = self.panel_width - MARGIN_LEFT - MARGIN_RIGHT;
        let h = self.panel_height - MARGIN_TOP - MARGIN_BOTTOM;

        let _ = writeln!(
            out,
            r#"<text x="{}" y="{}" text-anchor="middle" font-size="13" font-weight="bold">{}</text>"#,
            left + w / 2.0,
            top - 10.0,
            escape(&panel.title)
        );
        let _ = writeln!(
            out,
            r##"<rect x="{left}" y="{top}" width="{w}" height="{h}" fill="none" stroke="#333"/>"##
        );
        let _ = writeln!(
            out,
            r#"<text x="{}" y="{}" text-anchor="middle">{}</text>"#,
            left + w / 2.0,
            top + h + 35.0,
            escape(panel.x_label)
        );
        let _ = writeln!(
            out,
            r#"<text x="{x}" y="{y}" text-anchor="middle" transform="rotate(-90 {x} {y})">{}</text>"#,
            escape(panel.y_label),
            x = x0 + 18.0,
            y = top + h / 2.0,
        );

        let Some(((x_lo, x_hi), (y_lo, y_hi))) = panel_ranges(panel) else {
            let _ = writeln!(
                out,
                r##"<text x="{}" y="{}" text-anchor="middle" fill="#888">no data</text>"##,
                left + w / 2.0,
                top + h / 2.0
            );
            return;
        };
        let px = |x: f64| left + (x - x_lo) / (x_hi - x_lo) * w;
        let py = |y: f64| top + h - (y - y_lo) / (y_hi - y_lo) * h;

        for k in 0..=GRID_LINES {
            let frac = k as f64 / GRID_LINES as f64;
            let gy = top + h - frac * h;
            let gx = left + frac * w;
            let _ = writeln!(
                out,
                r##"<line x1="{left}" y1="{gy:.1}" x2="{}" y2="{gy:.1}" stroke="#ddd"/>"##,
                left + w
            );
            let _ = writeln!(
                out,
                r#"<text x="{:.1}" y="{:.1}" text-anchor="end">{}</text>"#,
                left - 6.0,
                gy + 4.0,
                tick(y_lo + frac * (y_hi - y_lo))
            );
            let _ = writeln!(
                out,
                r#"<text x="{gx:.1}" y="{:.1}" text-anchor="middle">{}</text>"#,
                top + h + 16.0,
                tick(x_lo + frac * (x_hi - x_lo))
            );
        }

        for series in &panel.series {
            let points: Vec<String> = series
                .points
                .iter()
                .map(|(x, y)| format!("{:.1},{:.1}", px(*x), py(*y)))
                .collect();
            let width = match panel.view {
                ChartView::Cdf => 2.0,
                _ => 1.2,
            };
            let _ = writeln!(
                out,
                r#"<polyline fill="none" stroke="{}" stroke-width="{width}" stroke-opacity="0.8" points="{}"/>"#,
                palette.color(series.color_index),
                points.join(" ")
            );
        }

        for (i, marker) in panel.markers.iter().enumerate() {
            let my = py(marker.y);
            let dash = ["6,4", "2,3", "8,3,2,3"][i % 3];
            let _ = writeln!(
                out,
                r##"<line x1="{left}" y1="{my:.1}" x2="{}" y2="{my:.1}" stroke="gray" stroke-opacity="0.6" stroke-dasharray="{dash}"/>"##,
                left + w
            );
            let _ = writeln!(
                out,
                r##"<text x="{}" y="{:.1}" fill="gray">{}</text>"##,
                left + 4.0,
                my - 3.0,
                escape(marker.label)
            );
        }

        for (i, series) in panel.series.iter().enumerate() {
            let ly = top + 14.0 + i as f64 * 14.0;
            let lx = left + w - 150.0;
            let _ = writeln!(
                out,
                r#"<line x1="{lx}" y1="{ly}" x2="{}" y2="{ly}" stroke="{}" stroke-width="2"/>"#,
                lx + 18.0,
                palette.color(series.color_index)
            );
            let _ = writeln!(
                out,
                r#"<text x="{}" y="{}">{}</text>"#,
                lx + 24.0,
                ly + 4.0,
                escape(&series.label)
            );
        }
    }
}

type Range = (f64, f64);

/// Axis ranges over every point and marker; y always includes 0. `None`
/// when the panel has no points.
fn panel_ranges(panel: &Panel) -> Option<(Range, Range)> {
    let mut points = panel.series.iter().flat_map(|s| s.points.iter()).peekable();
    points.peek()?;

    let (mut x_lo, mut x_hi) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_lo, mut y_hi) = (0.0f64, f64::NEG_INFINITY);
    for (x, y) in points {
        x_lo = x_lo.min(*x);
        x_hi = x_hi.max(*x);
        y_lo = y_lo.min(*y);
        y_hi = y_hi.max(*y);
    }
    for m in &panel.markers {
        y_hi = y_hi.max(m.y);
    }
    Some((widen(x_lo, x_hi), widen(y_lo, y_hi)))
}

fn widen(lo: f64, hi: f64) -> Range {
    match hi - lo > 0.0 {
        true => (lo, hi),
        false => (lo, lo + 1.0),
    }
}

fn tick(v: f64) -> String {
    match v.abs() {
        a if a >= 1000.0 => format!("{:.0}", v),
        a if a >= 1.0 => format!("{:.1}", v),
        _ => format!("{:.2}", v),
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
