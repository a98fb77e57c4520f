//! Raster drawing for bar and pie charts
//!
//! Shapes and lines go through `imageproc`; labels are set in the embedded
//! DejaVu Sans face.

use ab_glyph::{FontRef, PxScale};
use image::RgbImage;
use imageproc::drawing::{draw_filled_rect_mut, draw_line_segment_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;

use super::font;
use super::palette;
use super::{BarChart, ChartError, PieChart};

pub const BAR_CANVAS: (u32, u32) = (1000, 600);
pub const PIE_CANVAS: (u32, u32) = (600, 600);

const MARGIN_LEFT: u32 = 80;
const MARGIN_RIGHT: u32 = 40;
const MARGIN_TOP: u32 = 60;
const MARGIN_BOTTOM: u32 = 80;
const GRID_LINES: u32 = 5;

/// Fraction of each slot a bar occupies
const BAR_WIDTH: f64 = 0.8;

const PIE_RADIUS: f64 = 240.0;

/// matplotlib-style start angle: first slice begins at 12 o'clock
const PIE_START_DEGREES: f64 = 90.0;

/// Slice names sit just outside the rim, percentages inside the wedge
const PIE_LABEL_DISTANCE: f64 = 1.1;
const PIE_PERCENT_DISTANCE: f64 = 0.6;

const TITLE_SCALE: f32 = 24.0;
const LABEL_SCALE: f32 = 16.0;
const TICK_SCALE: f32 = 14.0;
const PERCENT_SCALE: f32 = 18.0;

const TITLE_Y: i32 = 14;

pub fn draw_bar(chart: &BarChart) -> Result<RgbImage, ChartError> {
    let font = font::load()?;
    let (width, height) = BAR_CANVAS;
    let mut img = RgbImage::from_pixel(width, height, palette::BACKGROUND);

    let plot_left = MARGIN_LEFT;
    let plot_right = width - MARGIN_RIGHT;
    let plot_top = MARGIN_TOP;
    let plot_bottom = height - MARGIN_BOTTOM;
    let plot_height = (plot_bottom - plot_top) as f64;

    let max = chart.points.iter().map(|p| p.value).max().unwrap_or(0);
    let tick_scale = PxScale::from(TICK_SCALE);

    for i in 0..=GRID_LINES {
        let y = plot_bottom - (plot_height * i as f64 / GRID_LINES as f64).round() as u32;
        if i > 0 {
            draw_line_segment_mut(
                &mut img,
                (plot_left as f32, y as f32),
                (plot_right as f32, y as f32),
                palette::GRID,
            );
        }

        let tick = tick_label(max as f64 * i as f64 / GRID_LINES as f64);
        let (w, h) = text_size(tick_scale, &font, &tick);
        draw_text_mut(
            &mut img,
            palette::TEXT,
            plot_left as i32 - 8 - w as i32,
            y as i32 - h as i32 / 2,
            tick_scale,
            &font,
            &tick,
        );
    }

    let slot = (plot_right - plot_left) as f64 / chart.points.len().max(1) as f64;

    for (i, point) in chart.points.iter().enumerate() {
        let center = plot_left as f64 + slot * (i as f64 + 0.5);

        let label = font::fit(&font, tick_scale, &point.label, (slot as u32).saturating_sub(4));
        draw_centered(&mut img, &font, tick_scale, center.round() as i32, plot_bottom as i32 + 8, &label);

        if max == 0 || point.value == 0 {
            continue;
        }
        let bar_height = (plot_height * point.value as f64 / max as f64).round() as u32;
        let half = (slot * BAR_WIDTH / 2.0).max(0.5);
        let x0 = (center - half).round().max(plot_left as f64) as u32;
        let x1 = (center + half).round().min(plot_right as f64) as u32;
        if x1 > x0 && bar_height > 0 {
            draw_filled_rect_mut(
                &mut img,
                Rect::at(x0 as i32, (plot_bottom - bar_height) as i32).of_size(x1 - x0, bar_height),
                palette::BAR_FILL,
            );
        }
    }

    draw_line_segment_mut(
        &mut img,
        (plot_left as f32, plot_bottom as f32),
        (plot_right as f32, plot_bottom as f32),
        palette::AXIS,
    );
    draw_line_segment_mut(
        &mut img,
        (plot_left as f32, plot_top as f32),
        (plot_left as f32, plot_bottom as f32),
        palette::AXIS,
    );

    let label_scale = PxScale::from(LABEL_SCALE);
    let plot_center = ((plot_left + plot_right) / 2) as i32;
    draw_centered(&mut img, &font, label_scale, plot_center, height as i32 - 32, &chart.x_label);

    let y_label = font::fit(&font, label_scale, &chart.y_label, plot_right - 8);
    draw_text_mut(&mut img, palette::TEXT, 8, plot_top as i32 - 22, label_scale, &font, &y_label);

    draw_title(&mut img, &font, &chart.title);
    Ok(img)
}

pub fn draw_pie(chart: &PieChart) -> Result<RgbImage, ChartError> {
    let font = font::load()?;
    let (width, height) = PIE_CANVAS;
    let mut img = RgbImage::from_pixel(width, height, palette::BACKGROUND);

    // cumulative end angle of each slice, degrees from the start angle
    let mut ends = Vec::with_capacity(chart.slices.len());
    let mut acc = 0.0;
    for slice in &chart.slices {
        acc += slice.percent * 3.6;
        ends.push(acc);
    }

    let cx = width as f64 / 2.0;
    let cy = height as f64 / 2.0;

    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let dx = x as f64 + 0.5 - cx;
        let dy = cy - (y as f64 + 0.5);
        if dx * dx + dy * dy > PIE_RADIUS * PIE_RADIUS {
            continue;
        }

        let angle = (dy.atan2(dx).to_degrees() - PIE_START_DEGREES).rem_euclid(360.0);
        let index = ends
            .iter()
            .position(|end| angle < *end)
            .unwrap_or(ends.len().saturating_sub(1));
        *pixel = palette::slice_colour(index);
    }

    let label_scale = PxScale::from(LABEL_SCALE);
    let percent_scale = PxScale::from(PERCENT_SCALE);
    let mut start = 0.0;

    for (slice, end) in chart.slices.iter().zip(&ends) {
        let mid = (PIE_START_DEGREES + (start + end) / 2.0).to_radians();
        start = *end;
        let (cos, sin) = (mid.cos(), mid.sin());

        let px = cx + PIE_RADIUS * PIE_PERCENT_DISTANCE * cos;
        let py = cy - PIE_RADIUS * PIE_PERCENT_DISTANCE * sin;
        let (_, h) = text_size(percent_scale, &font, &slice.percent_label);
        draw_centered(
            &mut img,
            &font,
            percent_scale,
            px.round() as i32,
            py.round() as i32 - h as i32 / 2,
            &slice.percent_label,
        );

        // names on the right half read away from the rim, on the left half towards it
        let lx = (cx + PIE_RADIUS * PIE_LABEL_DISTANCE * cos).round() as i32;
        let ly = (cy - PIE_RADIUS * PIE_LABEL_DISTANCE * sin).round() as i32;
        let room = if cos >= 0.0 { width as i32 - lx - 4 } else { lx - 4 };
        let name = font::fit(&font, label_scale, &slice.label, room.max(0) as u32);
        let (w, h) = text_size(label_scale, &font, &name);
        let x = if cos >= 0.0 { lx } else { lx - w as i32 };
        draw_text_mut(&mut img, palette::TEXT, x, ly - h as i32 / 2, label_scale, &font, &name);
    }

    draw_title(&mut img, &font, &chart.title);
    Ok(img)
}

fn draw_title(img: &mut RgbImage, font: &FontRef<'_>, title: &str) {
    let scale = PxScale::from(TITLE_SCALE);
    let title = font::fit(font, scale, title, img.width().saturating_sub(20));
    let center = img.width() as i32 / 2;
    draw_centered(img, font, scale, center, TITLE_Y, &title);
}

fn draw_centered(img: &mut RgbImage, font: &FontRef<'_>, scale: PxScale, cx: i32, y: i32, text: &str) {
    let (w, _) = text_size(scale, font, text);
    draw_text_mut(img, palette::TEXT, cx - w as i32 / 2, y, scale, font, text);
}

fn tick_label(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as u64)
    } else {
        format!("{:.1}", value)
    }
}
