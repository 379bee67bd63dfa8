//! services/api/src/adapters/chart.rs
//!
//! Renders mood series as PNG line charts into the static directory.
//! It implements the `ChartRenderingService` port from the `core` crate.

use image::{Rgb, RgbImage};
use mindmate_core::aggregator::MoodSeries;
use mindmate_core::ports::{ChartRenderingService, PortError, PortResult};
use std::path::PathBuf;
use tracing::info;

mod colors {
    use image::Rgb;

    pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
    pub const LIGHT_GRAY: Rgb<u8> = Rgb([200, 200, 200]);
    pub const BLUE: Rgb<u8> = Rgb([31, 119, 180]);
}

/// Chart geometry.
#[derive(Debug, Clone)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
    pub marker_radius: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 400,
            margin: 40,
            marker_radius: 3,
        }
    }
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// Writes charts to `output_dir` and returns `<public_prefix>/<artifact_name>`.
#[derive(Debug, Clone)]
pub struct PngChartRenderer {
    output_dir: PathBuf,
    public_prefix: String,
    config: ChartConfig,
}

impl PngChartRenderer {
    pub fn new(output_dir: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            public_prefix: public_prefix.into(),
            config: ChartConfig::default(),
        }
    }

    /// Draws the chart in memory. Points are evenly spaced in input order.
    pub fn draw(&self, series: &MoodSeries) -> RgbImage {
        let ChartConfig { width, height, margin, marker_radius } = self.config;
        let mut img = RgbImage::from_pixel(width, height, colors::WHITE);

        let left = margin as i64;
        let right = (width - margin) as i64;
        let top = margin as i64;
        let bottom = (height - margin) as i64;

        let y_for = |value: i8| -> i64 {
            // value 1 sits on `top`, -1 on `bottom`
            let fraction = 1.0 - (f64::from(value) + 1.0) / 2.0;
            top + (fraction * (bottom - top) as f64).round() as i64
        };

        // dashed grid at -1, 0 and 1
        for value in [-1, 0, 1] {
            let y = y_for(value);
            for x in (left..=right).step_by(8) {
                draw_line(&mut img, (x, y), ((x + 4).min(right), y), colors::LIGHT_GRAY);
            }
        }

        // axes
        draw_line(&mut img, (left, top), (left, bottom), colors::BLACK);
        draw_line(&mut img, (left, bottom), (right, bottom), colors::BLACK);

        let n = series.len();
        let points: Vec<(i64, i64)> = series
            .values
            .iter()
            .enumerate()
            .map(|(i, &value)| {
                let x = if n <= 1 {
                    (left + right) / 2
                } else {
                    left + (i as i64 * (right - left)) / (n as i64 - 1)
                };
                (x, y_for(value))
            })
            .collect();

        for pair in points.windows(2) {
            draw_line(&mut img, pair[0], pair[1], colors::BLUE);
            draw_line(&mut img, (pair[0].0, pair[0].1 + 1), (pair[1].0, pair[1].1 + 1), colors::BLUE);
        }
        for &(x, y) in &points {
            draw_marker(&mut img, x, y, marker_radius as i64, colors::BLUE);
        }

        img
    }
}

/// Bresenham line, clipped to the image.
fn draw_line(img: &mut RgbImage, from: (i64, i64), to: (i64, i64), color: Rgb<u8>) {
    let (mut x0, mut y0) = from;
    let (x1, y1) = to;
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        put_pixel_clipped(img, x0, y0, color);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

fn draw_marker(img: &mut RgbImage, cx: i64, cy: i64, radius: i64, color: Rgb<u8>) {
    for y in (cy - radius)..=(cy + radius) {
        for x in (cx - radius)..=(cx + radius) {
            if (x - cx).pow(2) + (y - cy).pow(2) <= radius.pow(2) {
                put_pixel_clipped(img, x, y, color);
            }
        }
    }
}

fn put_pixel_clipped(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, color);
    }
}

//=========================================================================================
// `ChartRenderingService` Trait Implementation
//=========================================================================================

impl ChartRenderingService for PngChartRenderer {
    fn render_line_chart(&self, series: &MoodSeries, artifact_name: &str) -> PortResult<String> {
        if series.is_empty() {
            return Err(PortError::Unexpected("refusing to render an empty series".to_string()));
        }

        std::fs::create_dir_all(&self.output_dir)
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        let path = self.output_dir.join(artifact_name);
        self.draw(series)
            .save(&path)
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        info!("Rendered mood chart with {} points to {}", series.len(), path.display());
        Ok(format!("{}/{}", self.public_prefix.trim_end_matches('/'), artifact_name))
    }
}
