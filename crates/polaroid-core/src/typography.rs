//! Caption and date overlay for framed renders.

use crate::error::{RenderError, Result};
use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use std::fmt;
use std::path::Path;

/// Caption script size in canvas pixels.
const CAPTION_PX: f32 = 220.0;
/// Date sans size in canvas pixels.
const DATE_PX: f32 = 70.0;
/// Caption baseline drop below the photo area.
const CAPTION_DROP: f32 = 300.0;
/// Date baseline drop below the caption baseline.
const DATE_DROP: f32 = 120.0;

const CAPTION_INK: Rgba<u8> = Rgba([0x2A, 0x2A, 0x2A, 255]);
const DATE_INK: Rgba<u8> = Rgba([0x88, 0x88, 0x88, 255]);

/// The two typefaces of a framed print: a script face for the caption and a
/// sans face for the date line.
#[derive(Clone)]
pub struct FontSet {
    pub caption: FontArc,
    pub date: FontArc,
}

impl fmt::Debug for FontSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FontSet { caption, date }")
    }
}

impl FontSet {
    pub fn from_bytes(caption: Vec<u8>, date: Vec<u8>) -> Result<Self> {
        Ok(Self {
            caption: FontArc::try_from_vec(caption)
                .map_err(|e| RenderError::Font(format!("caption typeface: {e}")))?,
            date: FontArc::try_from_vec(date)
                .map_err(|e| RenderError::Font(format!("date typeface: {e}")))?,
        })
    }

    pub fn load(caption: &Path, date: &Path) -> Result<Self> {
        Self::from_bytes(std::fs::read(caption)?, std::fs::read(date)?)
    }
}

/// Draw the caption and, below it, the upper-cased letter-spaced date,
/// both centered on `center_x`. `photo_bottom` is the bottom edge of the
/// photo area; the text lives in the paper strip underneath it.
pub fn draw_caption_block(
    canvas: &mut RgbaImage,
    fonts: &FontSet,
    caption: &str,
    date: &str,
    center_x: f32,
    photo_bottom: f32,
) {
    let caption_baseline = photo_bottom + CAPTION_DROP;
    draw_centered(
        canvas,
        &fonts.caption,
        CAPTION_PX,
        CAPTION_INK,
        caption,
        center_x,
        caption_baseline,
    );

    // Single-space-separated capitals, the stamped-date look.
    let spaced: String = date
        .to_uppercase()
        .chars()
        .flat_map(|c| [c, ' '])
        .collect();
    let spaced = spaced.trim_end();
    draw_centered(
        canvas,
        &fonts.date,
        DATE_PX,
        DATE_INK,
        spaced,
        center_x,
        caption_baseline + DATE_DROP,
    );
}

fn draw_centered(
    canvas: &mut RgbaImage,
    font: &FontArc,
    px: f32,
    ink: Rgba<u8>,
    text: &str,
    center_x: f32,
    baseline_y: f32,
) {
    if text.is_empty() {
        return;
    }
    let scale = PxScale::from(px);
    let (w, _) = text_size(scale, font, text);
    let ascent = font.as_scaled(scale).ascent();
    let x = (center_x - w as f32 / 2.0).round() as i32;
    let y = (baseline_y - ascent).round() as i32;
    draw_text_mut(canvas, ink, x, y, scale, font, text);
}
