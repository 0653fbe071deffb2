use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Axis-aligned rectangle in canvas space (pixels, fractional).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectF {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl RectF {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w * 0.5, self.y + self.h * 0.5)
    }
    pub fn right(&self) -> f32 {
        self.x + self.w
    }
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }
}

/// Crop window in source-image pixel space. Never exceeds the source bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropBox {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl CropBox {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    /// True if the box is non-empty and fully inside a `sw` x `sh` image.
    pub fn fits(&self, sw: u32, sh: u32) -> bool {
        self.w > 0
            && self.h > 0
            && self.x.checked_add(self.w).is_some_and(|r| r <= sw)
            && self.y.checked_add(self.h).is_some_and(|b| b <= sh)
    }
}

/// User-chosen pan position within the maximal crop-slide range.
///
/// `(0.5, 0.5)` centers the crop; `0.0` anchors it to the left/top of the
/// slide range and `1.0` to the right/bottom. Values are clamped to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FocalOffset {
    pub x: f32,
    pub y: f32,
}

impl FocalOffset {
    pub const CENTER: FocalOffset = FocalOffset { x: 0.5, y: 0.5 };

    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x: x.clamp(0.0, 1.0),
            y: y.clamp(0.0, 1.0),
        }
    }
}

impl Default for FocalOffset {
    fn default() -> Self {
        Self::CENTER
    }
}

/// Placement region for one image within a composite.
/// `rotation_deg` is non-zero only in scrapbook layouts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub rect: RectF,
    pub rotation_deg: f32,
}

impl Slot {
    pub fn axis_aligned(rect: RectF) -> Self {
        Self {
            rect,
            rotation_deg: 0.0,
        }
    }
    pub fn rotated(rect: RectF, rotation_deg: f32) -> Self {
        Self { rect, rotation_deg }
    }
    pub fn is_rotated(&self) -> bool {
        self.rotation_deg != 0.0
    }
}

/// Collage arrangement style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutStyle {
    /// Non-overlapping axis-aligned rectangles with gutters.
    Grid,
    /// Tilted, slightly overlapping slots with white mini-frame backings.
    Scrapbook,
}

impl FromStr for LayoutStyle {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "grid" => Ok(Self::Grid),
            "scrapbook" => Ok(Self::Scrapbook),
            _ => Err(()),
        }
    }
}

/// One source photo: a decoded image plus an optional manual pan.
///
/// `focus: None` keeps the position suggested by the saliency cropper;
/// `Some(offset)` overrides the crop origin while keeping its dimensions.
pub struct Photo {
    pub image: image::DynamicImage,
    pub focus: Option<FocalOffset>,
}

impl Photo {
    pub fn new(image: image::DynamicImage) -> Self {
        Self { image, focus: None }
    }
    pub fn with_focus(image: image::DynamicImage, focus: FocalOffset) -> Self {
        Self {
            image,
            focus: Some(focus),
        }
    }
}

/// Full description of one render. The renderer is a pure function of this
/// (modulo the saliency dependency and the injected texture RNG).
pub struct RenderSpec {
    pub photos: Vec<Photo>,
    pub caption: String,
    pub date: String,
    pub style: LayoutStyle,
    pub framed: bool,
}

/// Encoded JPEG artifact handed back to the caller. No further mutable state.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl RenderedImage {
    /// Data-URI form (`data:image/jpeg;base64,...`) for embedding.
    pub fn to_data_uri(&self) -> String {
        let b64 = base64::engine::general_purpose::STANDARD.encode(&self.bytes);
        format!("data:image/jpeg;base64,{b64}")
    }
}
