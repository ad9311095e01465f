//! Summary snapshot and PNG rendering.
//!
//! After each refresh the service renders an 800x600 image showing the total
//! country count, the top countries by estimated GDP, and the refresh time.
//! Text is drawn with the bitmap font in [`crate::font`].

use std::io::Cursor;

use image::{ImageFormat, Rgb, RgbImage};
use serde::Serialize;

use crate::font::{self, GLYPH_HEIGHT, GLYPH_SPACING, GLYPH_WIDTH};
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Layout constants
// ---------------------------------------------------------------------------

pub const IMAGE_WIDTH: u32 = 800;
pub const IMAGE_HEIGHT: u32 = 600;

/// Number of countries listed on the summary image.
pub const TOP_COUNTRIES_LIMIT: i64 = 5;

const GRADIENT_TOP: [u8; 3] = [0x1e, 0x3c, 0x72];
const GRADIENT_BOTTOM: [u8; 3] = [0x2a, 0x52, 0x98];
const TEXT_COLOR: Rgb<u8> = Rgb([0xff, 0xff, 0xff]);
const BAR_COLOR: Rgb<u8> = Rgb([0x7f, 0xb3, 0xff]);

const LIST_X: u32 = 100;
const LIST_TOP: u32 = 260;
const LIST_ROW_HEIGHT: u32 = 50;
const BAR_MAX_WIDTH: u32 = 600;
const BAR_HEIGHT: u32 = 8;

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// One ranked row on the summary image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryEntry {
    pub name: String,
    pub estimated_gdp: Option<f64>,
}

/// Input to the renderer: totals plus the top countries by GDP.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummarySnapshot {
    pub total_countries: i64,
    pub top_countries: Vec<SummaryEntry>,
    pub last_refreshed_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Format a GDP value with a T/B/M suffix and two decimals.
pub fn format_gdp(gdp: f64) -> String {
    const TRILLION: f64 = 1_000_000_000_000.0;
    const BILLION: f64 = 1_000_000_000.0;
    const MILLION: f64 = 1_000_000.0;

    if gdp >= TRILLION {
        format!("${:.2}T", gdp / TRILLION)
    } else if gdp >= BILLION {
        format!("${:.2}B", gdp / BILLION)
    } else if gdp >= MILLION {
        format!("${:.2}M", gdp / MILLION)
    } else {
        format!("${gdp:.2}")
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render the snapshot to PNG bytes.
pub fn render_summary_png(snapshot: &SummarySnapshot) -> Result<Vec<u8>, image::ImageError> {
    let mut canvas = RgbImage::new(IMAGE_WIDTH, IMAGE_HEIGHT);
    fill_gradient(&mut canvas);

    draw_text_centered(&mut canvas, "Country Statistics Summary", 60, 4);
    draw_text_centered(
        &mut canvas,
        &format!("Total Countries: {}", snapshot.total_countries),
        130,
        3,
    );
    draw_text_centered(
        &mut canvas,
        &format!("Top {TOP_COUNTRIES_LIMIT} Countries by GDP"),
        200,
        3,
    );

    let max_gdp = snapshot
        .top_countries
        .iter()
        .filter_map(|c| c.estimated_gdp)
        .fold(0.0_f64, f64::max);

    for (index, entry) in snapshot.top_countries.iter().enumerate() {
        let y = LIST_TOP + index as u32 * LIST_ROW_HEIGHT;
        let gdp_label = entry
            .estimated_gdp
            .map(format_gdp)
            .unwrap_or_else(|| "N/A".to_string());
        let line = format!("{}. {} - {}", index + 1, entry.name, gdp_label);
        draw_text(&mut canvas, &line, LIST_X, y, 2);

        if let Some(gdp) = entry.estimated_gdp.filter(|_| max_gdp > 0.0) {
            let width = ((gdp / max_gdp) * BAR_MAX_WIDTH as f64).round() as u32;
            fill_rect(
                &mut canvas,
                LIST_X,
                y + GLYPH_HEIGHT * 2 + 6,
                width.max(1),
                BAR_HEIGHT,
                BAR_COLOR,
            );
        }
    }

    let refreshed = snapshot
        .last_refreshed_at
        .format("%Y-%m-%d %H:%M:%S UTC")
        .to_string();
    draw_text_centered(
        &mut canvas,
        &format!("Last Refreshed At: {refreshed}"),
        IMAGE_HEIGHT - 50,
        2,
    );

    let mut bytes = Vec::new();
    canvas.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

fn fill_gradient(canvas: &mut RgbImage) {
    let height = canvas.height().max(2) - 1;
    for y in 0..canvas.height() {
        let t = y as f32 / height as f32;
        let mut color = [0u8; 3];
        for (i, channel) in color.iter_mut().enumerate() {
            let top = GRADIENT_TOP[i] as f32;
            let bottom = GRADIENT_BOTTOM[i] as f32;
            *channel = (top + (bottom - top) * t).round() as u8;
        }
        for x in 0..canvas.width() {
            canvas.put_pixel(x, y, Rgb(color));
        }
    }
}

fn fill_rect(canvas: &mut RgbImage, x: u32, y: u32, width: u32, height: u32, color: Rgb<u8>) {
    let x_end = (x + width).min(canvas.width());
    let y_end = (y + height).min(canvas.height());
    for py in y..y_end {
        for px in x..x_end {
            canvas.put_pixel(px, py, color);
        }
    }
}

/// Draw text with its top-left corner at `(x, y)`. Pixels outside the
/// canvas are clipped.
fn draw_text(canvas: &mut RgbImage, text: &str, x: u32, y: u32, scale: u32) {
    let advance = (GLYPH_WIDTH + GLYPH_SPACING) * scale;
    for (i, ch) in text.chars().enumerate() {
        let origin_x = x + i as u32 * advance;
        if origin_x >= canvas.width() {
            break;
        }
        for (row, bits) in font::glyph(ch).iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - col)) != 0 {
                    fill_rect(
                        canvas,
                        origin_x + col * scale,
                        y + row as u32 * scale,
                        scale,
                        scale,
                        TEXT_COLOR,
                    );
                }
            }
        }
    }
}

fn draw_text_centered(canvas: &mut RgbImage, text: &str, y: u32, scale: u32) {
    let width = font::text_width(text, scale);
    let x = canvas.width().saturating_sub(width) / 2;
    draw_text(canvas, text, x, y, scale);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn snapshot(entries: Vec<SummaryEntry>) -> SummarySnapshot {
        SummarySnapshot {
            total_countries: 250,
            top_countries: entries,
            last_refreshed_at: chrono::Utc.with_ymd_and_hms(2025, 10, 22, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn format_gdp_uses_suffixes() {
        assert_eq!(format_gdp(2_500_000_000_000.0), "$2.50T");
        assert_eq!(format_gdp(1_234_000_000.0), "$1.23B");
        assert_eq!(format_gdp(7_890_000.0), "$7.89M");
        assert_eq!(format_gdp(12.5), "$12.50");
        assert_eq!(format_gdp(0.0), "$0.00");
    }

    #[test]
    fn render_produces_png_of_expected_size() {
        let snap = snapshot(vec![
            SummaryEntry {
                name: "United States of America".to_string(),
                estimated_gdp: Some(4.9e14),
            },
            SummaryEntry {
                name: "Côte d'Ivoire".to_string(),
                estimated_gdp: Some(1.2e10),
            },
        ]);

        let bytes = render_summary_png(&snap).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), IMAGE_WIDTH);
        assert_eq!(decoded.height(), IMAGE_HEIGHT);
    }

    #[test]
    fn render_handles_empty_snapshot() {
        let bytes = render_summary_png(&snapshot(vec![])).unwrap();
        assert!(!bytes.is_empty());
    }

    #[test]
    fn long_names_are_clipped_not_panicking() {
        let snap = snapshot(vec![SummaryEntry {
            name: "X".repeat(400),
            estimated_gdp: None,
        }]);
        assert!(render_summary_png(&snap).is_ok());
    }

    #[test]
    fn gradient_runs_top_to_bottom() {
        let mut canvas = RgbImage::new(4, IMAGE_HEIGHT);
        fill_gradient(&mut canvas);
        assert_eq!(canvas.get_pixel(0, 0).0, GRADIENT_TOP);
        assert_eq!(canvas.get_pixel(0, IMAGE_HEIGHT - 1).0, GRADIENT_BOTTOM);
    }
}
