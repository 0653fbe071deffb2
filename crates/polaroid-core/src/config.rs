use crate::grade::Grade;
use crate::model::RectF;
use crate::typography::FontSet;
use serde::{Deserialize, Serialize};

/// Canvas geometry, grading constants and export quality for one renderer.
///
/// Defaults reproduce the reference look: a framed print is 2400x3400 with a
/// 160 px paper margin and a 4:5 photo area; a frameless preview is the bare
/// 2080x2600 photo area. Constants come from the latest observed revision of
/// the reference output and are kept as data so they can be tuned without
/// touching the compositors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Framed canvas size in pixels (photo area plus paper border and caption strip).
    pub framed_width: u32,
    pub framed_height: u32,
    /// Frameless canvas size in pixels (photo area only).
    pub frameless_width: u32,
    pub frameless_height: u32,
    /// Paper margin around the photo area in framed mode.
    pub frame_margin: u32,
    /// Height of the photo area as a fraction of its width (4:5 portrait).
    pub photo_aspect: f32,

    /// Grid gutter as a fraction of the usable collage width.
    pub gutter_fraction: f32,

    /// Grading applied when drawing a single photo.
    pub grade_single: Grade,
    /// Grading applied when drawing collage photos.
    pub grade_collage: Grade,

    /// Film-grain overlay strength.
    pub grain_alpha_single: f32,
    pub grain_alpha_collage: f32,

    /// JPEG quality (1..=100) per output kind.
    pub quality_frameless: u8,
    pub quality_framed_single: u8,
    pub quality_framed_collage: u8,

    /// Seed for the texture RNG. `None` draws from entropy; fixing it makes
    /// grain/dust/leak placement reproducible.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Caption and date typefaces. When absent the text overlay is skipped,
    /// mirroring how a 2D canvas silently falls back on missing fonts.
    #[serde(skip)]
    pub fonts: Option<FontSet>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            framed_width: 2400,
            framed_height: 3400,
            frameless_width: 2080,
            frameless_height: 2600,
            frame_margin: 160,
            photo_aspect: 1.25,
            gutter_fraction: 0.03,
            grade_single: Grade {
                contrast: 1.05,
                brightness: 1.05,
                saturate: 1.2,
                sepia: 0.25,
            },
            grade_collage: Grade {
                contrast: 1.05,
                brightness: 1.05,
                saturate: 1.1,
                sepia: 0.2,
            },
            grain_alpha_single: 0.25,
            grain_alpha_collage: 0.20,
            quality_frameless: 80,
            quality_framed_single: 92,
            quality_framed_collage: 90,
            seed: None,
            fonts: None,
        }
    }
}

impl RenderConfig {
    /// Canvas size for the given frame mode.
    pub fn canvas_size(&self, framed: bool) -> (u32, u32) {
        if framed {
            (self.framed_width, self.framed_height)
        } else {
            (self.frameless_width, self.frameless_height)
        }
    }

    /// Photo/collage area within the canvas: inset by the paper margin when
    /// framed, the full canvas otherwise. The area is `photo_aspect` taller
    /// than wide in framed mode, leaving the strip below for the caption.
    pub fn photo_area(&self, framed: bool) -> RectF {
        if framed {
            let m = self.frame_margin as f32;
            let w = self.framed_width as f32 - m * 2.0;
            let h = (w * self.photo_aspect).floor();
            RectF::new(m, m, w, h)
        } else {
            RectF::new(
                0.0,
                0.0,
                self.frameless_width as f32,
                self.frameless_height as f32,
            )
        }
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::RenderError;

        if self.framed_width == 0
            || self.framed_height == 0
            || self.frameless_width == 0
            || self.frameless_height == 0
        {
            return Err(RenderError::InvalidConfig(
                "canvas dimensions must be non-zero".into(),
            ));
        }
        if self.frame_margin * 2 >= self.framed_width {
            return Err(RenderError::InvalidConfig(format!(
                "frame_margin ({}) * 2 exceeds framed width ({})",
                self.frame_margin, self.framed_width
            )));
        }
        if !(self.photo_aspect.is_finite() && self.photo_aspect > 0.0) {
            return Err(RenderError::InvalidConfig(format!(
                "photo_aspect must be positive, got {}",
                self.photo_aspect
            )));
        }
        let area = self.photo_area(true);
        if area.bottom() > self.framed_height as f32 {
            return Err(RenderError::InvalidConfig(format!(
                "photo area ({}x{}) does not fit the framed canvas",
                area.w, area.h
            )));
        }
        if !(0.0..0.5).contains(&self.gutter_fraction) {
            return Err(RenderError::InvalidConfig(format!(
                "gutter_fraction must be in [0, 0.5), got {}",
                self.gutter_fraction
            )));
        }
        for (name, q) in [
            ("quality_frameless", self.quality_frameless),
            ("quality_framed_single", self.quality_framed_single),
            ("quality_framed_collage", self.quality_framed_collage),
        ] {
            if q == 0 || q > 100 {
                return Err(RenderError::InvalidConfig(format!(
                    "{name} must be in 1..=100, got {q}"
                )));
            }
        }
        for (name, a) in [
            ("grain_alpha_single", self.grain_alpha_single),
            ("grain_alpha_collage", self.grain_alpha_collage),
        ] {
            if !(0.0..=1.0).contains(&a) {
                return Err(RenderError::InvalidConfig(format!(
                    "{name} must be in [0, 1], got {a}"
                )));
            }
        }
        Ok(())
    }

    /// Create a fluent builder for `RenderConfig`.
    pub fn builder() -> RenderConfigBuilder {
        RenderConfigBuilder::new()
    }
}

/// Builder for `RenderConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct RenderConfigBuilder {
    cfg: RenderConfig,
}

impl RenderConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: RenderConfig::default(),
        }
    }
    pub fn framed_canvas(mut self, w: u32, h: u32) -> Self {
        self.cfg.framed_width = w;
        self.cfg.framed_height = h;
        self
    }
    pub fn frameless_canvas(mut self, w: u32, h: u32) -> Self {
        self.cfg.frameless_width = w;
        self.cfg.frameless_height = h;
        self
    }
    pub fn frame_margin(mut self, v: u32) -> Self {
        self.cfg.frame_margin = v;
        self
    }
    pub fn photo_aspect(mut self, v: f32) -> Self {
        self.cfg.photo_aspect = v;
        self
    }
    pub fn gutter_fraction(mut self, v: f32) -> Self {
        self.cfg.gutter_fraction = v;
        self
    }
    pub fn grade_single(mut self, v: Grade) -> Self {
        self.cfg.grade_single = v;
        self
    }
    pub fn grade_collage(mut self, v: Grade) -> Self {
        self.cfg.grade_collage = v;
        self
    }
    pub fn grain_alpha(mut self, single: f32, collage: f32) -> Self {
        self.cfg.grain_alpha_single = single;
        self.cfg.grain_alpha_collage = collage;
        self
    }
    pub fn quality(mut self, frameless: u8, framed_single: u8, framed_collage: u8) -> Self {
        self.cfg.quality_frameless = frameless;
        self.cfg.quality_framed_single = framed_single;
        self.cfg.quality_framed_collage = framed_collage;
        self
    }
    pub fn seed(mut self, v: Option<u64>) -> Self {
        self.cfg.seed = v;
        self
    }
    pub fn fonts(mut self, v: Option<FontSet>) -> Self {
        self.cfg.fonts = v;
        self
    }
    pub fn build(self) -> RenderConfig {
        self.cfg
    }
}
