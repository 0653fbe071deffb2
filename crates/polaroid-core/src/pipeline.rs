//! The single-image and collage compositors.
//!
//! Both follow the same fixed stage order: draw the graded photo(s), then the
//! analog effect stack clipped to the photo area (washes, vignette, light
//! leak, dust, streaks), then film grain over the entire canvas, then the
//! caption block, then JPEG encode. Any decode, crop or encode failure aborts
//! the whole render; there is no partial output.

use crate::compositing::{
    BlendMode, ClipRect, GradientStop, RotatedRect, draw_photo_in_slot, fill_rect,
    fill_radial_gradient, fill_rotated_rect, rgb, shadow_rotated_rect, stroke_rotated_rect,
};
use crate::config::RenderConfig;
use crate::crop::{SmartCrop, resolve_crop};
use crate::error::{RenderError, Result};
use crate::grade::Grade;
use crate::layout;
use crate::model::{
    CropBox, FocalOffset, LayoutStyle, Photo, RectF, RenderSpec, RenderedImage, Slot,
};
use crate::scale::stepped_downscale;
use crate::texture;
use crate::typography;
use image::codecs::jpeg::JpegEncoder;
use image::{Rgba, RgbaImage};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, instrument, warn};

/// Warm off-white paper color of the framed print.
const PAPER: Rgba<u8> = Rgba([0xFA, 0xF9, 0xF6, 255]);

/// Render one spec to an encoded JPEG.
///
/// A single photo takes the single-image path; two or more are arranged into
/// slots by the layout engine. `cropper` is the saliency dependency seam;
/// pass [`crate::crop::CenterCrop`] for a deterministic centered crop.
#[instrument(skip_all, fields(photos = spec.photos.len(), style = ?spec.style, framed = spec.framed))]
pub fn render(
    spec: &RenderSpec,
    cfg: &RenderConfig,
    cropper: &dyn SmartCrop,
) -> Result<RenderedImage> {
    cfg.validate()?;
    if spec.photos.is_empty() {
        return Err(RenderError::Empty);
    }
    let mut rng = match cfg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    if spec.photos.len() == 1 {
        render_single(&spec.photos[0], spec, cfg, cropper, &mut rng)
    } else {
        render_collage(spec, cfg, cropper, &mut rng)
    }
}

fn render_single(
    photo: &Photo,
    spec: &RenderSpec,
    cfg: &RenderConfig,
    cropper: &dyn SmartCrop,
    rng: &mut StdRng,
) -> Result<RenderedImage> {
    let framed = spec.framed;
    let mut canvas = new_canvas(cfg, framed);
    let area = cfg.photo_area(framed);
    let clip = ClipRect::from_area(&area, &canvas);

    // The single-image path always slides the crop; an unset focus means
    // centered, not "trust the saliency origin".
    let focus = photo.focus.unwrap_or(FocalOffset::CENTER);
    let slot = Slot::axis_aligned(area);
    draw_photo(
        &mut canvas,
        photo,
        Some(focus),
        &slot,
        &cfg.grade_single,
        cropper,
        &clip,
    )?;

    // Analog stack, clipped to the photo rectangle.
    fill_rect(&mut canvas, &area, rgb(255, 253, 248), 0.10, BlendMode::Screen, &clip);
    fill_rect(&mut canvas, &area, rgb(255, 180, 50), 0.12, BlendMode::Overlay, &clip);
    vignette(&mut canvas, &area, 0.25, &clip);
    fill_rect(&mut canvas, &area, rgb(20, 20, 35), 0.15, BlendMode::Screen, &clip);
    texture::light_leak(&mut canvas, &area, rng, &clip);
    texture::scatter_dust(&mut canvas, &area, rng, &clip);
    if !framed {
        texture::grain_streaks(&mut canvas, &area, rng, &clip);
    }

    texture::apply_grain(&mut canvas, rng, cfg.grain_alpha_single);

    if framed {
        caption_block(&mut canvas, spec, cfg, &area);
    }

    let quality = if framed {
        cfg.quality_framed_single
    } else {
        cfg.quality_frameless
    };
    encode_jpeg(&canvas, quality)
}

fn render_collage(
    spec: &RenderSpec,
    cfg: &RenderConfig,
    cropper: &dyn SmartCrop,
    rng: &mut StdRng,
) -> Result<RenderedImage> {
    let framed = spec.framed;
    let mut canvas = new_canvas(cfg, framed);
    let area = cfg.photo_area(framed);
    let clip = ClipRect::from_area(&area, &canvas);

    let slots = layout::slots(spec.photos.len(), spec.style, &area, cfg.gutter_fraction);
    debug!(slots = slots.len(), "collage layout");

    if framed && spec.style == LayoutStyle::Scrapbook {
        texture::draw_doodles(&mut canvas, &area, rng, &clip);
    }

    for (photo, slot) in spec.photos.iter().zip(slots.iter()) {
        if slot.is_rotated() {
            draw_scrapbook_slot(&mut canvas, photo, slot, cfg, cropper, &clip)?;
        } else {
            draw_photo(
                &mut canvas,
                photo,
                photo.focus,
                slot,
                &cfg.grade_collage,
                cropper,
                &clip,
            )?;
        }
    }

    // Collage-level analog stack.
    fill_rect(&mut canvas, &area, rgb(255, 180, 50), 0.08, BlendMode::Overlay, &clip);
    vignette(&mut canvas, &area, 0.20, &clip);
    fill_rect(&mut canvas, &area, rgb(20, 20, 35), 0.12, BlendMode::Screen, &clip);
    texture::light_leak(&mut canvas, &area, rng, &clip);
    texture::scatter_dust(&mut canvas, &area, rng, &clip);
    texture::grain_streaks(&mut canvas, &area, rng, &clip);

    texture::apply_grain(&mut canvas, rng, cfg.grain_alpha_collage);

    // Scrapbook relies on its doodles; only the grid gets the caption.
    if framed && spec.style == LayoutStyle::Grid {
        caption_block(&mut canvas, spec, cfg, &area);
    }

    let quality = if framed {
        cfg.quality_framed_collage
    } else {
        cfg.quality_frameless
    };
    encode_jpeg(&canvas, quality)
}

/// Crop, downscale and draw one photo into its slot.
fn draw_photo(
    canvas: &mut RgbaImage,
    photo: &Photo,
    focus: Option<FocalOffset>,
    slot: &Slot,
    grade: &Grade,
    cropper: &dyn SmartCrop,
    clip: &ClipRect,
) -> Result<()> {
    let rgba = photo.image.to_rgba8();
    let target_w = slot.rect.w.round().max(1.0) as u32;
    let target_h = slot.rect.h.round().max(1.0) as u32;
    let crop = resolve_crop(cropper, &rgba, target_w, target_h, focus)?;

    // Shrink toward the slot draw size, not the crop size: a maximal-aspect
    // crop matches its own dimensions and would never trigger a reduction.
    let scaled = stepped_downscale(&rgba, target_w, target_h);
    let crop_f = scaled_crop(&crop, rgba.dimensions(), scaled.dimensions());
    draw_photo_in_slot(canvas, &scaled, &crop_f, slot, grade, clip);
    Ok(())
}

/// Map a source-space crop box into the coordinates of a pre-shrunk copy.
/// Halving rounds each axis down independently, so the axes need separate
/// factors to keep the box inside the shrunk image.
fn scaled_crop(crop: &CropBox, (sw, sh): (u32, u32), (dw, dh): (u32, u32)) -> RectF {
    let fx = dw as f32 / sw as f32;
    let fy = dh as f32 / sh as f32;
    RectF::new(
        crop.x as f32 * fx,
        crop.y as f32 * fy,
        crop.w as f32 * fx,
        crop.h as f32 * fy,
    )
}

/// Scrapbook slot: shadowed white mini-frame backing, the rotated photo, then
/// a faint inner border stroke.
fn draw_scrapbook_slot(
    canvas: &mut RgbaImage,
    photo: &Photo,
    slot: &Slot,
    cfg: &RenderConfig,
    cropper: &dyn SmartCrop,
    clip: &ClipRect,
) -> Result<()> {
    let w = slot.rect.w;
    let frame_pad = w * 0.08;
    let bottom_pad = w * 0.25;

    // Backing extends `frame_pad` on three sides and `bottom_pad` below, so
    // its center sits below the slot center along the slot's local y axis.
    let photo_rect = RotatedRect::from_slot(slot);
    let local_dy = (bottom_pad - frame_pad) / 2.0;
    let (sin, cos) = photo_rect.angle.sin_cos();
    let backing = RotatedRect {
        cx: photo_rect.cx - local_dy * sin,
        cy: photo_rect.cy + local_dy * cos,
        w: w + frame_pad * 2.0,
        h: slot.rect.h + frame_pad + bottom_pad,
        angle: photo_rect.angle,
    };

    shadow_rotated_rect(canvas, &backing, 5.0, 10.0, 30.0, [0.0, 0.0, 0.0], 0.15, clip);
    fill_rotated_rect(canvas, &backing, [1.0, 1.0, 1.0], 1.0, clip);

    draw_photo(
        canvas,
        photo,
        photo.focus,
        slot,
        &cfg.grade_collage,
        cropper,
        clip,
    )?;

    stroke_rotated_rect(canvas, &photo_rect, 2.0, [0.0, 0.0, 0.0], 0.05, clip);
    Ok(())
}

/// Radial multiply gradient darkening toward the corners.
fn vignette(canvas: &mut RgbaImage, area: &RectF, strength: f32, clip: &ClipRect) {
    let (cx, cy) = area.center();
    let stops: [GradientStop; 2] = [
        (0.0, [0.0, 0.0, 0.0], 0.0),
        (1.0, rgb(30, 20, 10), strength),
    ];
    fill_radial_gradient(
        canvas,
        area,
        cx,
        cy,
        area.w * 0.4,
        area.w * 0.95,
        &stops,
        BlendMode::Multiply,
        clip,
    );
}

fn caption_block(canvas: &mut RgbaImage, spec: &RenderSpec, cfg: &RenderConfig, area: &RectF) {
    match &cfg.fonts {
        Some(fonts) => {
            let (cx, _) = area.center();
            typography::draw_caption_block(
                canvas,
                fonts,
                &spec.caption,
                &spec.date,
                cx,
                area.bottom(),
            );
        }
        None => warn!("no fonts configured; framed render omits caption/date"),
    }
}

fn new_canvas(cfg: &RenderConfig, framed: bool) -> RgbaImage {
    let (w, h) = cfg.canvas_size(framed);
    let background = if framed { PAPER } else { Rgba([0, 0, 0, 255]) };
    RgbaImage::from_pixel(w, h, background)
}

fn encode_jpeg(canvas: &RgbaImage, quality: u8) -> Result<RenderedImage> {
    let (w, h) = canvas.dimensions();
    let mut rgb = image::RgbImage::new(w, h);
    for (src, dst) in canvas.pixels().zip(rgb.pixels_mut()) {
        dst.0 = [src.0[0], src.0[1], src.0[2]];
    }
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality)
        .encode_image(&rgb)
        .map_err(|e| RenderError::Encode(e.to_string()))?;
    debug!(width = w, height = h, bytes = bytes.len(), "encoded jpeg");
    Ok(RenderedImage {
        bytes,
        width: w,
        height: h,
    })
}
