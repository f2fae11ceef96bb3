use crate::error::NoiseError;
use crate::generation::FieldMap;
use crate::palette::{ColorRamp, to_rgb8};
use font8x8::UnicodeFonts;
use image::{Rgb, RgbImage};
use log::info;
use std::path::Path;

// Fraction to darken a pixel by when it sits on a contour line (0.0 = no change, 1.0 = black).
const CONTOUR_DARKNESS: f32 = 0.40;

/// One pixel per sample, coloured by the ramp. Pixels whose 4-neighbourhood
/// straddles a ramp threshold are darkened to outline the bands.
pub fn export_png(
    map: &FieldMap,
    ramp: &ColorRamp,
    path: impl AsRef<Path>,
) -> Result<(), NoiseError> {
    let path = path.as_ref();
    let (w, h) = (map.width, map.height);
    let mut img = RgbImage::new(w, h);

    let height_at = |col: i64, row: i64| -> Option<f64> {
        if col < 0 || row < 0 || col >= i64::from(w) || row >= i64::from(h) {
            return None;
        }
        map.get(col as u32, row as u32).map(|s| s.height)
    };

    // Returns true if the edge between heights `a` and `b` crosses any threshold.
    let crosses_contour = |a: f64, b: f64| -> bool { ramp.thresholds().any(|lvl| (a < lvl) != (b < lvl)) };

    for sample in &map.samples {
        let mut color = sample.color;
        let (c, r) = (i64::from(sample.col), i64::from(sample.row));

        let is_contour = [
            height_at(c - 1, r),
            height_at(c + 1, r),
            height_at(c, r - 1),
            height_at(c, r + 1),
        ]
        .iter()
        .filter_map(|n| *n)
        .any(|nh| crosses_contour(sample.height, nh));

        if is_contour {
            color = color.map(|ch| (ch as f32 * (1.0 - CONTOUR_DARKNESS)) as u8);
        }

        img.put_pixel(sample.col, sample.row, Rgb(color));
    }

    img.save(path)?;
    info!("wrote {}", path.display());
    Ok(())
}

// ── Legend PNG ────────────────────────────────────────────────────────────────

/// Scale factor for the bitmap font (each logical pixel becomes `SCALE` screen pixels).
const FONT_SCALE: u32 = 2;
/// Width of one character in screen pixels.
const CHAR_W: u32 = 8 * FONT_SCALE;
/// Height of one character in screen pixels.
const CHAR_H: u32 = 8 * FONT_SCALE;

/// Draw a single character at (x, y) using the 8×8 bitmap font.
fn draw_char(img: &mut RgbImage, c: char, x: u32, y: u32, color: [u8; 3]) {
    let Some(glyph) = font8x8::BASIC_FONTS.get(c) else {
        return;
    };
    for (row, &byte) in glyph.iter().enumerate() {
        for col in 0u32..8 {
            if byte & (1 << col) == 0 {
                continue;
            }
            for dy in 0..FONT_SCALE {
                for dx in 0..FONT_SCALE {
                    let px = x + col * FONT_SCALE + dx;
                    let py = y + row as u32 * FONT_SCALE + dy;
                    if px < img.width() && py < img.height() {
                        img.put_pixel(px, py, Rgb(color));
                    }
                }
            }
        }
    }
}

fn draw_str(img: &mut RgbImage, s: &str, x: u32, y: u32, color: [u8; 3]) {
    for (i, c) in s.chars().enumerate() {
        draw_char(img, c, x + i as u32 * CHAR_W, y, color);
    }
}

/// Fill a rectangular area with `color`, clipped to the image.
fn fill_rect(img: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: [u8; 3]) {
    for py in y..(y + h).min(img.height()) {
        for px in x..(x + w).min(img.width()) {
            img.put_pixel(px, py, Rgb(color));
        }
    }
}

/// Text for one legend row: the band's upper bound and its label.
fn legend_line(threshold: f64, label: Option<&str>) -> String {
    match label {
        Some(label) => format!("< {threshold:+.2}  {label}"),
        None => format!("< {threshold:+.2}"),
    }
}

/// One swatch row per ramp stop, top to bottom in threshold order.
pub fn export_legend_png(ramp: &ColorRamp, path: impl AsRef<Path>) -> Result<(), NoiseError> {
    let path = path.as_ref();

    const PAD: u32 = 14;
    const SWATCH_W: u32 = 48;
    const SWATCH_GAP: u32 = 8;
    const ROW_H: u32 = CHAR_H + 6;
    const TITLE_GAP: u32 = 10;

    const BG: [u8; 3] = [22, 22, 35];
    const TITLE_COLOR: [u8; 3] = [240, 240, 240];
    const TEXT_COLOR: [u8; 3] = [210, 210, 210];

    let title = "COLOR RAMP";
    let lines: Vec<String> = ramp
        .stops()
        .iter()
        .map(|s| legend_line(s.threshold, s.label.as_deref()))
        .collect();
    let max_line = lines.iter().map(|l| l.len()).max().unwrap_or(0) as u32;

    let content_w = (SWATCH_W + SWATCH_GAP + max_line * CHAR_W).max(title.len() as u32 * CHAR_W);
    let img_w = PAD + content_w + PAD;
    let img_h = PAD + CHAR_H + TITLE_GAP + lines.len() as u32 * ROW_H + PAD;

    let mut img = RgbImage::from_pixel(img_w, img_h, Rgb(BG));

    let title_x = img_w.saturating_sub(title.len() as u32 * CHAR_W) / 2;
    draw_str(&mut img, title, title_x, PAD, TITLE_COLOR);

    let mut y = PAD + CHAR_H + TITLE_GAP;
    for (stop, line) in ramp.stops().iter().zip(&lines) {
        fill_rect(&mut img, PAD, y, SWATCH_W, CHAR_H, to_rgb8(stop.color));
        draw_str(&mut img, line, PAD + SWATCH_W + SWATCH_GAP, y, TEXT_COLOR);
        y += ROW_H;
    }

    img.save(path)?;
    info!("wrote {}", path.display());
    Ok(())
}
