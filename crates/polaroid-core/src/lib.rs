//! Core library for rendering physical-film-look "polaroid" composites.
//!
//! - Pipeline: [`render`] takes a [`RenderSpec`] (decoded photos, caption,
//!   date, layout style, frame mode) and returns an encoded JPEG.
//! - Layouts: grid templates with gutters or tilted scrapbook arrangements,
//!   at most four slots.
//! - Texture: procedural grain, dust, light leaks, streaks and doodles with
//!   an injectable seed.
//! - The saliency cropper is a trait seam; [`crop::CenterCrop`] is the
//!   deterministic default.
//!
//! Quick example:
//! ```ignore
//! use image::ImageReader;
//! use polaroid_core::prelude::*;
//! # fn main() -> anyhow::Result<()> {
//! let img = ImageReader::open("beach.jpg")?.decode()?;
//! let spec = RenderSpec {
//!     photos: vec![Photo::new(img)],
//!     caption: "Our Moments".into(),
//!     date: "Feb 14, 2025".into(),
//!     style: LayoutStyle::Grid,
//!     framed: true,
//! };
//! let out = render(&spec, &RenderConfig::default(), &CenterCrop)?;
//! std::fs::write("out.jpg", &out.bytes)?;
//! # Ok(()) }
//! ```

pub mod compositing;
pub mod config;
pub mod crop;
pub mod error;
pub mod grade;
pub mod layout;
pub mod model;
pub mod pipeline;
pub mod scale;
#[cfg(feature = "fetch")]
pub mod source;
pub mod texture;
pub mod typography;

pub use config::*;
pub use crop::{CenterCrop, SmartCrop, resolve_crop};
pub use error::*;
pub use model::*;
pub use pipeline::render;
pub use typography::FontSet;

/// Convenience prelude for common types and functions.
/// Importing `polaroid_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{RenderConfig, RenderConfigBuilder};
    pub use crate::crop::{CenterCrop, SmartCrop};
    pub use crate::grade::Grade;
    pub use crate::layout::{MAX_SLOTS, scrapbook_template, slots};
    pub use crate::model::{
        CropBox, FocalOffset, LayoutStyle, Photo, RectF, RenderSpec, RenderedImage, Slot,
    };
    pub use crate::pipeline::render;
    pub use crate::scale::stepped_downscale;
    #[cfg(feature = "fetch")]
    pub use crate::source::{ImageSource, load_all};
    pub use crate::typography::FontSet;
}
