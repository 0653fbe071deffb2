//! Procedural film artifacts: grain, dust specks, light leaks, streaks and
//! scrapbook doodles.
//!
//! Every generator draws with an injected RNG so callers (and tests) control
//! reproducibility; structural bounds (speck counts, opacity bands) are fixed,
//! exact pixels are not.

use crate::compositing::{
    self, BlendMode, ClipRect, fill_circle, fill_radial_gradient, fill_vertical_streak, rgb,
};
use crate::model::RectF;
use image::RgbaImage;
use rand::Rng;

/// Side length of the tileable grain square.
const GRAIN_TILE: u32 = 512;

/// Doodle stroke color, a faded pencil gray-brown.
const DOODLE_INK: [f32; 3] = rgb(0xD1, 0xC4, 0xB9);

/// Build one tileable grain square: per-pixel gray noise in a fixed
/// brightness band around mid-gray.
pub fn grain_tile(rng: &mut impl Rng) -> RgbaImage {
    let mut tile = RgbaImage::new(GRAIN_TILE, GRAIN_TILE);
    for px in tile.pixels_mut() {
        let v = 80 + rng.gen_range(0..100u16) as u8;
        px.0 = [v, v, v, 255];
    }
    tile
}

/// Overlay-blend the repeating grain tile across the whole canvas. This is
/// deliberately not clipped to the photo area: grain over paper and photo
/// alike is what reads as one physical object.
pub fn apply_grain(canvas: &mut RgbaImage, rng: &mut impl Rng, alpha: f32) {
    if alpha <= 0.0 {
        return;
    }
    let tile = grain_tile(rng);
    let (w, h) = canvas.dimensions();
    for y in 0..h {
        for x in 0..w {
            let t = tile.get_pixel(x % GRAIN_TILE, y % GRAIN_TILE);
            let v = t.0[0] as f32 / 255.0;
            compositing::composite(
                canvas.get_pixel_mut(x, y),
                [v, v, v],
                alpha,
                BlendMode::Overlay,
            );
        }
    }
}

/// Scatter 15..30 translucent white specks over `area`, a dark counter-dot
/// next to some of them.
pub fn scatter_dust(canvas: &mut RgbaImage, area: &RectF, rng: &mut impl Rng, clip: &ClipRect) {
    let count = 15 + rng.gen_range(0..15);
    for _ in 0..count {
        let dx = area.x + rng.gen_range(0.0f32..1.0) * area.w;
        let dy = area.y + rng.gen_range(0.0f32..1.0) * area.h;
        let size = 1.0 + rng.gen_range(0.0f32..1.0) * 2.5;
        let opacity = 0.08 + rng.gen_range(0.0f32..1.0) * 0.15;

        fill_circle(canvas, dx, dy, size, [1.0, 1.0, 1.0], opacity, clip);
        if rng.gen_range(0.0f32..1.0) > 0.6 {
            fill_circle(
                canvas,
                dx + 1.0,
                dy + 1.0,
                size * 0.5,
                [0.0, 0.0, 0.0],
                opacity * 0.6,
                clip,
            );
        }
    }
}

/// Warm radial gradient anchored at a random corner of `area`, screen-blended
/// like stray light hitting the negative.
pub fn light_leak(canvas: &mut RgbaImage, area: &RectF, rng: &mut impl Rng, clip: &ClipRect) {
    let corner = rng.gen_range(0..4u8);
    let lx = if corner & 1 == 1 { area.right() } else { area.x };
    let ly = if corner & 2 == 2 { area.bottom() } else { area.y };

    let radius = area.w * (0.5 + rng.gen_range(0.0f32..1.0) * 0.5);
    let opacity = 0.08 + rng.gen_range(0.0f32..1.0) * 0.08;
    let stops = [
        (0.0, rgb(255, 80, 20), opacity),
        (0.4, rgb(255, 120, 40), opacity * 0.6),
        (1.0, rgb(255, 100, 50), 0.0),
    ];
    fill_radial_gradient(
        canvas,
        area,
        lx,
        ly,
        0.0,
        radius,
        &stops,
        BlendMode::Screen,
        clip,
    );
}

/// One or two near-vertical translucent streaks with a slight random slant.
pub fn grain_streaks(canvas: &mut RgbaImage, area: &RectF, rng: &mut impl Rng, clip: &ClipRect) {
    let count = 1 + rng.gen_range(0..2);
    let width = 4.0 + rng.gen_range(0.0f32..1.0) * 4.0;
    let alpha = 0.08 + rng.gen_range(0.0f32..1.0) * 0.07;
    for _ in 0..count {
        let sx = area.x + rng.gen_range(0.0f32..1.0) * area.w;
        let color = if rng.gen_bool(0.5) {
            [1.0, 1.0, 1.0]
        } else {
            [0.0, 0.0, 0.0]
        };
        let slant = rng.gen_range(0.0f32..1.0) * 15.0 - 7.5;
        fill_vertical_streak(canvas, area, sx, sx + slant, width, color, alpha, clip);
    }
}

/// Hand-drawn-style decorations for framed scrapbook renders: a handful of
/// hearts, stars and swirls in faint pencil ink.
pub fn draw_doodles(canvas: &mut RgbaImage, area: &RectF, rng: &mut impl Rng, clip: &ClipRect) {
    const SHAPES: usize = 8;
    const LINE_WIDTH: f32 = 3.0;
    const ALPHA: f32 = 0.4;
    const INSET: f32 = 100.0;

    for _ in 0..SHAPES {
        let sx = area.x + INSET + rng.gen_range(0.0f32..1.0) * (area.w - INSET * 2.0);
        let sy = area.y + INSET + rng.gen_range(0.0f32..1.0) * (area.h - INSET * 2.0);
        let size = 30.0 + rng.gen_range(0.0f32..1.0) * 40.0;
        let path = match rng.gen_range(0..3u8) {
            0 => heart_path(sx, sy, size),
            1 => star_path(sx, sy, size),
            _ => swirl_path(sx, sy, size),
        };
        stroke_polyline(canvas, &path, LINE_WIDTH, DOODLE_INK, ALPHA, clip);
    }
}

/// Stroke a polyline by rasterizing its coverage into a scratch mask first,
/// then compositing once; overlapping stamps would otherwise double-blend
/// where segments meet.
fn stroke_polyline(
    canvas: &mut RgbaImage,
    path: &[(f32, f32)],
    width: f32,
    color: [f32; 3],
    alpha: f32,
    clip: &ClipRect,
) {
    if path.len() < 2 {
        return;
    }
    let mut min_x = f32::MAX;
    let mut min_y = f32::MAX;
    let mut max_x = f32::MIN;
    let mut max_y = f32::MIN;
    for &(x, y) in path {
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }
    let half = width * 0.5;
    let x0 = ((min_x - half - 1.0).floor().max(clip.x0 as f32)) as u32;
    let y0 = ((min_y - half - 1.0).floor().max(clip.y0 as f32)) as u32;
    let x1 = (((max_x + half + 1.0).ceil()).min(clip.x1 as f32).max(x0 as f32)) as u32;
    let y1 = (((max_y + half + 1.0).ceil()).min(clip.y1 as f32).max(y0 as f32)) as u32;
    if x1 <= x0 || y1 <= y0 {
        return;
    }

    let mw = (x1 - x0) as usize;
    let mh = (y1 - y0) as usize;
    let mut mask = vec![0.0f32; mw * mh];
    for seg in path.windows(2) {
        stamp_segment(&mut mask, mw, mh, x0, y0, seg[0], seg[1], half);
    }

    for my in 0..mh {
        for mx in 0..mw {
            let cov = mask[my * mw + mx];
            if cov > 0.0 {
                compositing::composite(
                    canvas.get_pixel_mut(x0 + mx as u32, y0 + my as u32),
                    color,
                    alpha * cov,
                    BlendMode::SourceOver,
                );
            }
        }
    }
}

fn stamp_segment(
    mask: &mut [f32],
    mw: usize,
    mh: usize,
    ox: u32,
    oy: u32,
    a: (f32, f32),
    b: (f32, f32),
    half: f32,
) {
    // Coverage from distance to the segment, evaluated per pixel in the
    // segment's padded bounding box.
    let min_x = (a.0.min(b.0) - half - 1.0 - ox as f32).floor().max(0.0) as usize;
    let min_y = (a.1.min(b.1) - half - 1.0 - oy as f32).floor().max(0.0) as usize;
    let max_x = ((a.0.max(b.0) + half + 1.0 - ox as f32).ceil() as usize).min(mw);
    let max_y = ((a.1.max(b.1) + half + 1.0 - oy as f32).ceil() as usize).min(mh);
    let abx = b.0 - a.0;
    let aby = b.1 - a.1;
    let len2 = (abx * abx + aby * aby).max(f32::EPSILON);
    for my in min_y..max_y {
        for mx in min_x..max_x {
            let px = ox as f32 + mx as f32 + 0.5;
            let py = oy as f32 + my as f32 + 0.5;
            let t = ((px - a.0) * abx + (py - a.1) * aby) / len2;
            let t = t.clamp(0.0, 1.0);
            let dx = px - (a.0 + abx * t);
            let dy = py - (a.1 + aby * t);
            let cov = (half - (dx * dx + dy * dy).sqrt() + 0.5).clamp(0.0, 1.0);
            let cell = &mut mask[my * mw + mx];
            *cell = cell.max(cov);
        }
    }
}

fn quad_to(path: &mut Vec<(f32, f32)>, cp: (f32, f32), end: (f32, f32)) {
    const STEPS: usize = 16;
    let Some(&start) = path.last() else { return };
    for i in 1..=STEPS {
        let t = i as f32 / STEPS as f32;
        let omt = 1.0 - t;
        let x = omt * omt * start.0 + 2.0 * omt * t * cp.0 + t * t * end.0;
        let y = omt * omt * start.1 + 2.0 * omt * t * cp.1 + t * t * end.1;
        path.push((x, y));
    }
}

fn heart_path(sx: f32, sy: f32, size: f32) -> Vec<(f32, f32)> {
    let mut p = vec![(sx, sy + size / 4.0)];
    quad_to(&mut p, (sx, sy), (sx - size / 2.0, sy));
    quad_to(&mut p, (sx - size, sy), (sx - size, sy + size / 2.0));
    quad_to(&mut p, (sx - size, sy + size), (sx, sy + size * 1.5));
    quad_to(&mut p, (sx + size, sy + size), (sx + size, sy + size / 2.0));
    quad_to(&mut p, (sx + size, sy), (sx + size / 2.0, sy));
    quad_to(&mut p, (sx, sy), (sx, sy + size / 4.0));
    p
}

fn star_path(sx: f32, sy: f32, size: f32) -> Vec<(f32, f32)> {
    let mut p = Vec::with_capacity(11);
    for j in 0..5 {
        for (deg, r) in [(18.0 + j as f32 * 72.0, size), (54.0 + j as f32 * 72.0, size / 2.0)] {
            let rad = deg.to_radians();
            p.push((sx + rad.cos() * r, sy - rad.sin() * r));
        }
    }
    p.push(p[0]);
    p
}

fn swirl_path(sx: f32, sy: f32, size: f32) -> Vec<(f32, f32)> {
    const STEPS: usize = 24;
    let r = size / 2.0;
    (0..=STEPS)
        .map(|i| {
            let a = std::f32::consts::PI * 1.5 * i as f32 / STEPS as f32;
            (sx + a.cos() * r, sy + a.sin() * r)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn grain_tile_stays_in_brightness_band() {
        let mut rng = StdRng::seed_from_u64(7);
        let tile = grain_tile(&mut rng);
        for px in tile.pixels() {
            assert!(px.0[0] >= 80 && px.0[0] < 180);
            assert_eq!(px.0[0], px.0[1]);
            assert_eq!(px.0[1], px.0[2]);
            assert_eq!(px.0[3], 255);
        }
    }

    #[test]
    fn dust_touches_only_the_given_area() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut canvas = RgbaImage::from_pixel(200, 200, image::Rgba([40, 40, 40, 255]));
        let area = RectF::new(50.0, 50.0, 100.0, 100.0);
        let clip = ClipRect::from_area(&area, &canvas);
        scatter_dust(&mut canvas, &area, &mut rng, &clip);
        for (x, y, px) in canvas.enumerate_pixels() {
            if x < 50 || x >= 150 || y < 50 || y >= 150 {
                assert_eq!(px.0, [40, 40, 40, 255], "pixel outside clip changed at {x},{y}");
            }
        }
    }

    #[test]
    fn star_path_is_closed() {
        let p = star_path(10.0, 10.0, 5.0);
        assert_eq!(p.first(), p.last());
        assert_eq!(p.len(), 11);
    }
}
