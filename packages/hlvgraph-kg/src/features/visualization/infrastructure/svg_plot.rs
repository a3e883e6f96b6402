//! Scatter plots as standalone SVG documents

use std::fmt::Write as _;
use std::path::Path;

use crate::errors::Result;
use crate::features::visualization::domain::LegendEntry;
use crate::shared::utils::write_atomic;

const WIDTH: f64 = 1000.0;
const HEIGHT: f64 = 1000.0;
const MARGIN: f64 = 60.0;
const LEGEND_WIDTH: f64 = 220.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScatterPlot {
    pub title: String,
    pub points: Vec<ScatterPoint>,
    pub legend: Vec<LegendEntry>,
}

impl ScatterPlot {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn push(&mut self, x: f64, y: f64, radius: f64, color: impl Into<String>) {
        self.points.push(ScatterPoint {
            x,
            y,
            radius,
            color: color.into(),
        });
    }

    /// Data bounds, padded so a single point still gets a non-empty box
    fn bounds(&self) -> (f64, f64, f64, f64) {
        if self.points.is_empty() {
            return (-1.0, 1.0, -1.0, 1.0);
        }
        let (mut min_x, mut max_x, mut min_y, mut max_y) =
            (f64::MAX, f64::MIN, f64::MAX, f64::MIN);
        for p in &self.points {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }
        let pad_x = ((max_x - min_x) * 0.05).max(1.0);
        let pad_y = ((max_y - min_y) * 0.05).max(1.0);
        (min_x - pad_x, max_x + pad_x, min_y - pad_y, max_y + pad_y)
    }

    pub fn to_svg(&self) -> String {
        let plot_w = WIDTH - 2.0 * MARGIN;
        let plot_h = HEIGHT - 2.0 * MARGIN;
        let (min_x, max_x, min_y, max_y) = self.bounds();
        let sx = plot_w / (max_x - min_x);
        let sy = plot_h / (max_y - min_y);
        let scale = sx.min(sy);
        let off_x = MARGIN + (plot_w - (max_x - min_x) * scale) / 2.0;
        let off_y = MARGIN + (plot_h - (max_y - min_y) * scale) / 2.0;

        let mut svg = String::new();
        let total_w = WIDTH + LEGEND_WIDTH;
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = total_w,
            h = HEIGHT
        );
        let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
        let _ = writeln!(
            svg,
            r#"<text x="{}" y="{}" font-family="sans-serif" font-size="22" text-anchor="middle">{}</text>"#,
            WIDTH / 2.0,
            MARGIN / 2.0,
            escape_xml(&self.title)
        );

        let _ = writeln!(svg, "<g>");
        for p in &self.points {
            // SVG y grows downwards
            let cx = off_x + (p.x - min_x) * scale;
            let cy = HEIGHT - (off_y + (p.y - min_y) * scale);
            let _ = writeln!(
                svg,
                r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}" fill-opacity="0.8"/>"#,
                cx,
                cy,
                p.radius,
                escape_xml(&p.color)
            );
        }
        let _ = writeln!(svg, "</g>");

        if !self.legend.is_empty() {
            let x = WIDTH + 10.0;
            let _ = writeln!(svg, r#"<g font-family="sans-serif" font-size="14">"#);
            for (i, entry) in self.legend.iter().enumerate() {
                let y = MARGIN + 24.0 * i as f64;
                let _ = writeln!(
                    svg,
                    r#"<circle cx="{}" cy="{}" r="7" fill="{}"/><text x="{}" y="{}">{}</text>"#,
                    x + 8.0,
                    y,
                    escape_xml(&entry.color),
                    x + 22.0,
                    y + 5.0,
                    escape_xml(&entry.label)
                );
            }
            let _ = writeln!(svg, "</g>");
        }

        svg.push_str("</svg>\n");
        svg
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let svg = self.to_svg();
        write_atomic(path, |w| {
            w.write_all(svg.as_bytes())?;
            Ok(())
        })
    }
}

fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}
