use crate::model::{LayoutStyle, RectF, Slot};
use serde::{Deserialize, Serialize};

/// Collage layouts never place more than four images; extras are ignored.
pub const MAX_SLOTS: usize = 4;

/// Height of the top bar in the 3-image grid, as a fraction of the usable
/// height (after the gutter).
const GRID_THREE_TOP_FRACTION: f32 = 0.55;

/// One scrapbook slot as fractions of the usable area, plus a tilt.
/// Hand-authored; the templates overlap slightly on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrapbookSlotSpec {
    pub w: f32,
    pub h: f32,
    pub x: f32,
    pub y: f32,
    pub rotation_deg: f32,
}

const fn sspec(w: f32, h: f32, x: f32, y: f32, rotation_deg: f32) -> ScrapbookSlotSpec {
    ScrapbookSlotSpec {
        w,
        h,
        x,
        y,
        rotation_deg,
    }
}

const SCRAPBOOK_TWO: [ScrapbookSlotSpec; 2] = [
    sspec(0.62, 0.48, 0.05, 0.10, -4.0),
    sspec(0.62, 0.48, 0.32, 0.40, 6.0),
];

const SCRAPBOOK_THREE: [ScrapbookSlotSpec; 3] = [
    sspec(0.52, 0.40, 0.22, 0.05, -3.0),
    sspec(0.52, 0.40, 0.05, 0.48, 4.0),
    sspec(0.52, 0.40, 0.42, 0.52, 2.0),
];

const SCRAPBOOK_FOUR: [ScrapbookSlotSpec; 4] = [
    sspec(0.42, 0.36, 0.08, 0.10, -5.0),
    sspec(0.42, 0.36, 0.48, 0.06, 4.0),
    sspec(0.42, 0.36, 0.06, 0.52, -3.0),
    sspec(0.42, 0.36, 0.50, 0.56, 6.0),
];

/// Scrapbook template for an image count. Counts outside {2, 3, 4} fall back
/// to the two-image arrangement (a single scrapbook photo still gets a tilt);
/// five or more saturate at the four-slot template.
pub fn scrapbook_template(count: usize) -> &'static [ScrapbookSlotSpec] {
    match count {
        3 => &SCRAPBOOK_THREE,
        n if n >= 4 => &SCRAPBOOK_FOUR,
        _ => &SCRAPBOOK_TWO,
    }
}

/// Compute placement slots for `count` images within `area`.
///
/// The result is index-aligned with the input image order, deterministic,
/// and never longer than `min(count, MAX_SLOTS)`. Grid slots are
/// axis-aligned and tile the area exactly (up to rounding) with
/// `gutter_fraction * area.w` wide gutters; scrapbook slots are tilted and
/// may overlap.
pub fn slots(count: usize, style: LayoutStyle, area: &RectF, gutter_fraction: f32) -> Vec<Slot> {
    if count == 0 {
        return Vec::new();
    }
    let mut out = match style {
        LayoutStyle::Grid => grid_slots(count, area, gutter_fraction),
        LayoutStyle::Scrapbook => scrapbook_template(count)
            .iter()
            .map(|s| {
                Slot::rotated(
                    RectF::new(
                        area.x + s.x * area.w,
                        area.y + s.y * area.h,
                        s.w * area.w,
                        s.h * area.h,
                    ),
                    s.rotation_deg,
                )
            })
            .collect(),
    };
    out.truncate(count.min(MAX_SLOTS));
    out
}

fn grid_slots(count: usize, area: &RectF, gutter_fraction: f32) -> Vec<Slot> {
    let g = gutter_fraction * area.w;
    let (x, y, w, h) = (area.x, area.y, area.w, area.h);
    match count {
        1 => vec![Slot::axis_aligned(*area)],
        2 => {
            // Stacked top/bottom halves.
            let sh = (h - g) / 2.0;
            vec![
                Slot::axis_aligned(RectF::new(x, y, w, sh)),
                Slot::axis_aligned(RectF::new(x, y + sh + g, w, sh)),
            ]
        }
        3 => {
            // Wide top bar, two squares below.
            let th = (h - g) * GRID_THREE_TOP_FRACTION;
            let bh = h - th - g;
            let bw = (w - g) / 2.0;
            vec![
                Slot::axis_aligned(RectF::new(x, y, w, th)),
                Slot::axis_aligned(RectF::new(x, y + th + g, bw, bh)),
                Slot::axis_aligned(RectF::new(x + bw + g, y + th + g, bw, bh)),
            ]
        }
        _ => {
            // 2x2; callers with more than four images only get four slots.
            let sw = (w - g) / 2.0;
            let sh = (h - g) / 2.0;
            vec![
                Slot::axis_aligned(RectF::new(x, y, sw, sh)),
                Slot::axis_aligned(RectF::new(x + sw + g, y, sw, sh)),
                Slot::axis_aligned(RectF::new(x, y + sh + g, sw, sh)),
                Slot::axis_aligned(RectF::new(x + sw + g, y + sh + g, sw, sh)),
            ]
        }
    }
}
