//! Pixel-level drawing primitives over an opaque RGBA canvas.
//!
//! Every operation takes its blend mode, opacity and clip rectangle as
//! explicit arguments; there is no ambient drawing state to save/restore, so
//! one stage can never leak filter or blend settings into the next.

use crate::grade::Grade;
use crate::model::{RectF, Slot};
use image::{Rgba, RgbaImage};

/// Canvas blend modes used by the compositors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// Plain alpha-over.
    SourceOver,
    /// `1 - (1-s)(1-d)`: lightens, used for washes and light leaks.
    Screen,
    /// Contrast-preserving mix keyed on the backdrop, used for grain/tints.
    Overlay,
    /// `s * d`: darkens, used for the vignette.
    Multiply,
}

#[inline]
fn blend_channel(mode: BlendMode, s: f32, d: f32) -> f32 {
    match mode {
        BlendMode::SourceOver => s,
        BlendMode::Screen => 1.0 - (1.0 - s) * (1.0 - d),
        BlendMode::Overlay => {
            if d < 0.5 {
                2.0 * s * d
            } else {
                1.0 - 2.0 * (1.0 - s) * (1.0 - d)
            }
        }
        BlendMode::Multiply => s * d,
    }
}

/// Composite one source color over an opaque destination pixel.
#[inline]
pub fn composite(px: &mut Rgba<u8>, src: [f32; 3], alpha: f32, mode: BlendMode) {
    if alpha <= 0.0 {
        return;
    }
    let a = alpha.min(1.0);
    for i in 0..3 {
        let d = px.0[i] as f32 / 255.0;
        let b = blend_channel(mode, src[i], d);
        px.0[i] = ((d + (b - d) * a) * 255.0 + 0.5).clamp(0.0, 255.0) as u8;
    }
    px.0[3] = 255;
}

/// Convenience constructor for unit-range colors.
#[inline]
pub const fn rgb(r: u8, g: u8, b: u8) -> [f32; 3] {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0]
}

/// Integer clip rectangle (half-open) intersected with the canvas bounds.
#[derive(Debug, Clone, Copy)]
pub struct ClipRect {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl ClipRect {
    pub fn full(canvas: &RgbaImage) -> Self {
        Self {
            x0: 0,
            y0: 0,
            x1: canvas.width(),
            y1: canvas.height(),
        }
    }

    pub fn from_area(area: &RectF, canvas: &RgbaImage) -> Self {
        let x0 = area.x.floor().max(0.0) as u32;
        let y0 = area.y.floor().max(0.0) as u32;
        let x1 = (area.right().ceil().max(0.0) as u32).min(canvas.width());
        let y1 = (area.bottom().ceil().max(0.0) as u32).min(canvas.height());
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1,
            y1,
        }
    }

    /// Intersect with a fractional bounding box, returning pixel ranges.
    fn window(&self, min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> (u32, u32, u32, u32) {
        let x0 = (min_x.floor().max(0.0) as u32).max(self.x0);
        let y0 = (min_y.floor().max(0.0) as u32).max(self.y0);
        let x1 = (max_x.ceil().max(0.0) as u32).min(self.x1);
        let y1 = (max_y.ceil().max(0.0) as u32).min(self.y1);
        (x0, y0, x1.max(x0), y1.max(y0))
    }
}

/// Fill an axis-aligned region with a flat color.
pub fn fill_rect(
    canvas: &mut RgbaImage,
    region: &RectF,
    color: [f32; 3],
    alpha: f32,
    mode: BlendMode,
    clip: &ClipRect,
) {
    let (x0, y0, x1, y1) = clip.window(region.x, region.y, region.right(), region.bottom());
    for y in y0..y1 {
        for x in x0..x1 {
            composite(canvas.get_pixel_mut(x, y), color, alpha, mode);
        }
    }
}

/// A color stop of a radial gradient: position in `[0, 1]`, color, opacity.
pub type GradientStop = (f32, [f32; 3], f32);

/// Fill `region` with a radial gradient centered on `(cx, cy)` running from
/// radius `r0` (first stop) to `r1` (last stop).
pub fn fill_radial_gradient(
    canvas: &mut RgbaImage,
    region: &RectF,
    cx: f32,
    cy: f32,
    r0: f32,
    r1: f32,
    stops: &[GradientStop],
    mode: BlendMode,
    clip: &ClipRect,
) {
    debug_assert!(stops.len() >= 2 && r1 > r0);
    let (x0, y0, x1, y1) = clip.window(region.x, region.y, region.right(), region.bottom());
    let span = (r1 - r0).max(f32::EPSILON);
    for y in y0..y1 {
        for x in x0..x1 {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            let t = (((dx * dx + dy * dy).sqrt() - r0) / span).clamp(0.0, 1.0);
            let (color, alpha) = sample_stops(stops, t);
            composite(canvas.get_pixel_mut(x, y), color, alpha, mode);
        }
    }
}

fn sample_stops(stops: &[GradientStop], t: f32) -> ([f32; 3], f32) {
    let mut prev = &stops[0];
    if t <= prev.0 {
        return (prev.1, prev.2);
    }
    for stop in &stops[1..] {
        if t <= stop.0 {
            let span = (stop.0 - prev.0).max(f32::EPSILON);
            let k = (t - prev.0) / span;
            let mut color = [0.0f32; 3];
            for i in 0..3 {
                color[i] = prev.1[i] + (stop.1[i] - prev.1[i]) * k;
            }
            return (color, prev.2 + (stop.2 - prev.2) * k);
        }
        prev = stop;
    }
    (prev.1, prev.2)
}

/// Fill a circle with a one-pixel anti-aliased rim.
pub fn fill_circle(
    canvas: &mut RgbaImage,
    cx: f32,
    cy: f32,
    radius: f32,
    color: [f32; 3],
    alpha: f32,
    clip: &ClipRect,
) {
    let (x0, y0, x1, y1) = clip.window(cx - radius - 1.0, cy - radius - 1.0, cx + radius + 1.0, cy + radius + 1.0);
    for y in y0..y1 {
        for x in x0..x1 {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            let cov = (radius - (dx * dx + dy * dy).sqrt() + 0.5).clamp(0.0, 1.0);
            if cov > 0.0 {
                composite(
                    canvas.get_pixel_mut(x, y),
                    color,
                    alpha * cov,
                    BlendMode::SourceOver,
                );
            }
        }
    }
}

/// Draw a near-vertical stroke from `(x_top, region.y)` to
/// `(x_bottom, region.bottom())`, `width` pixels thick.
pub fn fill_vertical_streak(
    canvas: &mut RgbaImage,
    region: &RectF,
    x_top: f32,
    x_bottom: f32,
    width: f32,
    color: [f32; 3],
    alpha: f32,
    clip: &ClipRect,
) {
    let (_, y0, _, y1) = clip.window(region.x, region.y, region.right(), region.bottom());
    if y1 <= y0 || region.h <= 0.0 {
        return;
    }
    let half = width * 0.5;
    for y in y0..y1 {
        let k = (y as f32 + 0.5 - region.y) / region.h;
        let cx = x_top + (x_bottom - x_top) * k;
        let (x0, _, x1, _) = clip.window(cx - half - 1.0, region.y, cx + half + 1.0, region.bottom());
        for x in x0..x1 {
            let cov = (half - (x as f32 + 0.5 - cx).abs() + 0.5).clamp(0.0, 1.0);
            if cov > 0.0 {
                composite(
                    canvas.get_pixel_mut(x, y),
                    color,
                    alpha * cov,
                    BlendMode::SourceOver,
                );
            }
        }
    }
}

/// Rectangle with a rotation about its center, in canvas coordinates.
#[derive(Debug, Clone, Copy)]
pub struct RotatedRect {
    pub cx: f32,
    pub cy: f32,
    pub w: f32,
    pub h: f32,
    /// Radians, clockwise.
    pub angle: f32,
}

impl RotatedRect {
    pub fn from_slot(slot: &Slot) -> Self {
        let (cx, cy) = slot.rect.center();
        Self {
            cx,
            cy,
            w: slot.rect.w,
            h: slot.rect.h,
            angle: slot.rotation_deg.to_radians(),
        }
    }

    /// Canvas point -> local coordinates relative to the unrotated center.
    #[inline]
    fn to_local(&self, x: f32, y: f32) -> (f32, f32) {
        let dx = x - self.cx;
        let dy = y - self.cy;
        let (sin, cos) = self.angle.sin_cos();
        (dx * cos + dy * sin, -dx * sin + dy * cos)
    }

    /// Signed distance to the rectangle edge (negative inside).
    #[inline]
    fn sdf(&self, lx: f32, ly: f32) -> f32 {
        let qx = lx.abs() - self.w * 0.5;
        let qy = ly.abs() - self.h * 0.5;
        let ox = qx.max(0.0);
        let oy = qy.max(0.0);
        (ox * ox + oy * oy).sqrt() + qx.max(qy).min(0.0)
    }

    /// Axis-aligned bounding box, padded by `pad` pixels.
    fn bounds(&self, pad: f32) -> (f32, f32, f32, f32) {
        let (sin, cos) = self.angle.sin_cos();
        let hx = (self.w * 0.5 * cos).abs() + (self.h * 0.5 * sin).abs() + pad;
        let hy = (self.w * 0.5 * sin).abs() + (self.h * 0.5 * cos).abs() + pad;
        (self.cx - hx, self.cy - hy, self.cx + hx, self.cy + hy)
    }
}

/// Fill a rotated rectangle with a flat color (anti-aliased edges).
pub fn fill_rotated_rect(
    canvas: &mut RgbaImage,
    rect: &RotatedRect,
    color: [f32; 3],
    alpha: f32,
    clip: &ClipRect,
) {
    let (bx0, by0, bx1, by1) = rect.bounds(1.0);
    let (x0, y0, x1, y1) = clip.window(bx0, by0, bx1, by1);
    for y in y0..y1 {
        for x in x0..x1 {
            let (lx, ly) = rect.to_local(x as f32 + 0.5, y as f32 + 0.5);
            let cov = (0.5 - rect.sdf(lx, ly)).clamp(0.0, 1.0);
            if cov > 0.0 {
                composite(
                    canvas.get_pixel_mut(x, y),
                    color,
                    alpha * cov,
                    BlendMode::SourceOver,
                );
            }
        }
    }
}

/// Stroke the outline of a rotated rectangle.
pub fn stroke_rotated_rect(
    canvas: &mut RgbaImage,
    rect: &RotatedRect,
    line_width: f32,
    color: [f32; 3],
    alpha: f32,
    clip: &ClipRect,
) {
    let half = line_width * 0.5;
    let (bx0, by0, bx1, by1) = rect.bounds(half + 1.0);
    let (x0, y0, x1, y1) = clip.window(bx0, by0, bx1, by1);
    for y in y0..y1 {
        for x in x0..x1 {
            let (lx, ly) = rect.to_local(x as f32 + 0.5, y as f32 + 0.5);
            let cov = (half - rect.sdf(lx, ly).abs() + 0.5).clamp(0.0, 1.0);
            if cov > 0.0 {
                composite(
                    canvas.get_pixel_mut(x, y),
                    color,
                    alpha * cov,
                    BlendMode::SourceOver,
                );
            }
        }
    }
}

/// Soft drop shadow under a rotated rectangle: the rectangle offset by
/// `(dx, dy)` with opacity falling off over `blur` pixels outside its edge.
pub fn shadow_rotated_rect(
    canvas: &mut RgbaImage,
    rect: &RotatedRect,
    dx: f32,
    dy: f32,
    blur: f32,
    color: [f32; 3],
    alpha: f32,
    clip: &ClipRect,
) {
    let shadow = RotatedRect {
        cx: rect.cx + dx,
        cy: rect.cy + dy,
        ..*rect
    };
    let (bx0, by0, bx1, by1) = shadow.bounds(blur + 1.0);
    let (x0, y0, x1, y1) = clip.window(bx0, by0, bx1, by1);
    for y in y0..y1 {
        for x in x0..x1 {
            let (lx, ly) = shadow.to_local(x as f32 + 0.5, y as f32 + 0.5);
            let d = shadow.sdf(lx, ly);
            let cov = if d <= 0.0 {
                1.0
            } else if d < blur {
                let t = 1.0 - d / blur;
                t * t * (3.0 - 2.0 * t)
            } else {
                0.0
            };
            if cov > 0.0 {
                composite(
                    canvas.get_pixel_mut(x, y),
                    color,
                    alpha * cov,
                    BlendMode::SourceOver,
                );
            }
        }
    }
}

/// Draw the `crop` region of `src` into `slot`, rotating as needed and
/// grading each pixel on the way.
///
/// The draw inverse-maps every destination pixel into the crop window and
/// samples bilinearly, so cropping, scaling and rotation happen in a single
/// pass with no intermediate buffer. `crop` is fractional because the source
/// may have been pre-shrunk by the stepped downscaler.
pub fn draw_photo_in_slot(
    canvas: &mut RgbaImage,
    src: &RgbaImage,
    crop: &RectF,
    slot: &Slot,
    grade: &Grade,
    clip: &ClipRect,
) {
    let rect = RotatedRect::from_slot(slot);
    let (bx0, by0, bx1, by1) = rect.bounds(1.0);
    let (x0, y0, x1, y1) = clip.window(bx0, by0, bx1, by1);
    for y in y0..y1 {
        for x in x0..x1 {
            let (lx, ly) = rect.to_local(x as f32 + 0.5, y as f32 + 0.5);
            let cov = (0.5 - rect.sdf(lx, ly)).clamp(0.0, 1.0);
            if cov <= 0.0 {
                continue;
            }
            let u = (lx / rect.w + 0.5).clamp(0.0, 1.0);
            let v = (ly / rect.h + 0.5).clamp(0.0, 1.0);
            let sample = sample_bilinear(src, crop.x + u * crop.w, crop.y + v * crop.h);
            let graded = grade.apply(sample);
            composite(canvas.get_pixel_mut(x, y), graded, cov, BlendMode::SourceOver);
        }
    }
}

/// Clamped bilinear sample, returning unit-range RGB.
#[inline]
pub fn sample_bilinear(img: &RgbaImage, fx: f32, fy: f32) -> [f32; 3] {
    let (w, h) = img.dimensions();
    let maxx = (w - 1) as f32;
    let maxy = (h - 1) as f32;
    let x = (fx - 0.5).clamp(0.0, maxx);
    let y = (fy - 0.5).clamp(0.0, maxy);
    let x0 = x.floor();
    let y0 = y.floor();
    let tx = x - x0;
    let ty = y - y0;
    let x0 = x0 as u32;
    let y0 = y0 as u32;
    let x1 = (x0 + 1).min(w - 1);
    let y1 = (y0 + 1).min(h - 1);
    let p00 = img.get_pixel(x0, y0);
    let p10 = img.get_pixel(x1, y0);
    let p01 = img.get_pixel(x0, y1);
    let p11 = img.get_pixel(x1, y1);
    let mut out = [0.0f32; 3];
    for i in 0..3 {
        let top = p00.0[i] as f32 * (1.0 - tx) + p10.0[i] as f32 * tx;
        let bot = p01.0[i] as f32 * (1.0 - tx) + p11.0[i] as f32 * tx;
        out[i] = (top * (1.0 - ty) + bot * ty) / 255.0;
    }
    out
}
