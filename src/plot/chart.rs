//! Loss-curve rendering.
//!
//! Draws one polyline per error series on an 800×400 white canvas with black
//! axes, ten tick marks per axis and a colour swatch per series in the top
//! right corner. The y axis spans `[0, max(max_error, 1.0)]`; the x axis
//! spans the longest series.
//!
//! There are no numeric axis labels or legend text: `image` has no font
//! rendering, so series are told apart by colour only.

use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage};
use log::debug;

use crate::error::{NetError, Result};
use crate::train::ErrorSeries;

pub const WIDTH: u32 = 800;
pub const HEIGHT: u32 = 400;

pub const SEQUENTIAL_COLOR: Rgb<u8> = Rgb([220, 30, 30]);
pub const PARALLEL_COLOR: Rgb<u8> = Rgb([30, 60, 220]);

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([0, 0, 0]);

// Plot area, in pixels from the image edges.
const LEFT: i64 = 50;
const RIGHT: i64 = WIDTH as i64 - 20;
const TOP: i64 = 20;
const BOTTOM: i64 = HEIGHT as i64 - 50;

/// One curve to draw.
pub struct ChartLine<'a> {
    pub label: &'a str,
    pub series: &'a ErrorSeries,
    pub color: Rgb<u8>,
}

/// Renders `lines` and saves the chart as a PNG at `path`.
pub fn render_error_chart(lines: &[ChartLine<'_>], path: impl AsRef<Path>) -> Result<()> {
    let img = draw_error_chart(lines);
    img.save_with_format(path.as_ref(), ImageFormat::Png)
        .map_err(|e| NetError::Chart(e.to_string()))
}

/// Renders `lines` into an in-memory image.
pub fn draw_error_chart(lines: &[ChartLine<'_>]) -> RgbImage {
    let mut img = RgbImage::from_pixel(WIDTH, HEIGHT, BACKGROUND);
    draw_axes(&mut img);

    let max_error = lines.iter()
        .filter_map(|l| l.series.max_error())
        .fold(1.0_f64, f64::max);
    let longest = lines.iter().map(|l| l.series.len()).max().unwrap_or(0);
    let x_span = longest.saturating_sub(1).max(1) as f64;

    for (slot, line) in lines.iter().enumerate() {
        debug!("plotting {} ({} points)", line.label, line.series.len());

        let to_pixel = |i: usize, err: f64| -> (i64, i64) {
            let x = LEFT + ((RIGHT - LEFT) as f64 * i as f64 / x_span).round() as i64;
            let y = BOTTOM - ((BOTTOM - TOP) as f64 * err / max_error).round() as i64;
            (x, y)
        };

        let points: Vec<(i64, i64)> = line.series.points().iter().enumerate()
            .map(|(i, p)| to_pixel(i, p.mean_error))
            .collect();
        for pair in points.windows(2) {
            draw_line(&mut img, pair[0], pair[1], line.color);
            draw_line(&mut img, (pair[0].0, pair[0].1 + 1), (pair[1].0, pair[1].1 + 1), line.color);
        }
        if let [only] = points.as_slice() {
            fill_rect(&mut img, only.0 - 1, only.1 - 1, 3, 3, line.color);
        }

        // Legend swatch.
        fill_rect(&mut img, WIDTH as i64 - 180, TOP + 20 * slot as i64, 10, 10, line.color);
    }

    img
}

fn draw_axes(img: &mut RgbImage) {
    for t in 0..2 {
        draw_line(img, (LEFT, BOTTOM + t), (RIGHT, BOTTOM + t), AXIS);
        draw_line(img, (LEFT - t, BOTTOM), (LEFT - t, TOP), AXIS);
    }
    for k in 0..=10 {
        let x = LEFT + (RIGHT - LEFT) * k / 10;
        let y = BOTTOM - (BOTTOM - TOP) * k / 10;
        draw_line(img, (x, BOTTOM), (x, BOTTOM + 5), AXIS);
        draw_line(img, (LEFT - 5, y), (LEFT, y), AXIS);
    }
}

fn put(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && x < WIDTH as i64 && y < HEIGHT as i64 {
        img.put_pixel(x as u32, y as u32, color);
    }
}

fn fill_rect(img: &mut RgbImage, x: i64, y: i64, w: i64, h: i64, color: Rgb<u8>) {
    for dy in 0..h {
        for dx in 0..w {
            put(img, x + dx, y + dy, color);
        }
    }
}

/// Bresenham line between two pixel coordinates; off-canvas pixels are clipped.
fn draw_line(img: &mut RgbImage, from: (i64, i64), to: (i64, i64), color: Rgb<u8>) {
    let (mut x, mut y) = from;
    let dx = (to.0 - x).abs();
    let dy = -(to.1 - y).abs();
    let sx = if x < to.0 { 1 } else { -1 };
    let sy = if y < to.1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        put(img, x, y, color);
        if x == to.0 && y == to.1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::train::EpochError;

    fn series(values: &[f64]) -> ErrorSeries {
        let mut s = ErrorSeries::default();
        for (epoch, &mean_error) in values.iter().enumerate() {
            s.push(EpochError { epoch, mean_error });
        }
        s
    }

    #[test]
    fn curve_pixels_use_series_colour() {
        let s = series(&[0.5, 0.25, 0.1]);
        let img = draw_error_chart(&[ChartLine { label: "seq", series: &s, color: SEQUENTIAL_COLOR }]);
        assert_eq!(img.dimensions(), (WIDTH, HEIGHT));
        // First point: x = LEFT, y = BOTTOM - (BOTTOM - TOP) * 0.5
        let y = (BOTTOM - ((BOTTOM - TOP) as f64 * 0.5).round() as i64) as u32;
        assert_eq!(*img.get_pixel(LEFT as u32, y), SEQUENTIAL_COLOR);
    }

    #[test]
    fn empty_chart_still_has_axes() {
        let img = draw_error_chart(&[]);
        assert_eq!(*img.get_pixel(LEFT as u32, BOTTOM as u32), AXIS);
        assert_eq!(*img.get_pixel(WIDTH - 1, 0), BACKGROUND);
    }
}
