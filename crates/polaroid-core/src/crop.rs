use crate::error::{RenderError, Result};
use crate::model::{CropBox, FocalOffset};
use image::RgbaImage;

/// Seam around the external saliency-cropping dependency.
///
/// An implementation returns the best crop box of the requested aspect ratio
/// within the image. It decides *where* the interesting content is; the box
/// dimensions are expected to be the maximal window of that aspect ratio the
/// source allows. The renderer treats it as a black box and calls it once per
/// image per render.
pub trait SmartCrop {
    fn crop(&self, image: &RgbaImage, target_w: u32, target_h: u32) -> Result<CropBox>;
}

/// Deterministic default: the maximal window of the target aspect ratio,
/// centered. Also the stub of choice for tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct CenterCrop;

impl SmartCrop for CenterCrop {
    fn crop(&self, image: &RgbaImage, target_w: u32, target_h: u32) -> Result<CropBox> {
        let (sw, sh) = image.dimensions();
        if sw == 0 || sh == 0 {
            return Err(RenderError::Crop("source image is empty".into()));
        }
        if target_w == 0 || target_h == 0 {
            return Err(RenderError::Crop(format!(
                "invalid target aspect window {target_w}x{target_h}"
            )));
        }
        let target_aspect = target_w as f64 / target_h as f64;
        let src_aspect = sw as f64 / sh as f64;
        let (cw, ch) = if src_aspect > target_aspect {
            // Source is wider: full height, trimmed width.
            let cw = ((sh as f64 * target_aspect).floor() as u32).clamp(1, sw);
            (cw, sh)
        } else {
            let ch = ((sw as f64 / target_aspect).floor() as u32).clamp(1, sh);
            (sw, ch)
        };
        Ok(CropBox::new((sw - cw) / 2, (sh - ch) / 2, cw, ch))
    }
}

/// Obtain the crop window for one image: ask the saliency dependency for the
/// box, then optionally override its origin with a manual focal offset.
///
/// The override keeps the suggested *dimensions* (they encode the maximal
/// window of the slot's aspect ratio) and recomputes the origin as
/// `(source_dim - crop_dim) * offset` per axis, clamped to the slide range.
/// An offset of 0.5 therefore lands exactly in the middle of the range, 0 at
/// the start and 1 at the end.
pub fn resolve_crop(
    cropper: &dyn SmartCrop,
    image: &RgbaImage,
    target_w: u32,
    target_h: u32,
    focus: Option<FocalOffset>,
) -> Result<CropBox> {
    let (sw, sh) = image.dimensions();
    let mut crop = cropper.crop(image, target_w, target_h)?;
    if !crop.fits(sw, sh) {
        return Err(RenderError::Crop(format!(
            "cropper returned invalid geometry {:?} for {sw}x{sh} source",
            crop
        )));
    }
    if let Some(offset) = focus {
        crop.x = slide(sw, crop.w, offset.x);
        crop.y = slide(sh, crop.h, offset.y);
    }
    Ok(crop)
}

/// Crop origin on one axis for a given pan position. Never negative, never
/// past `source_dim - crop_dim`.
fn slide(source_dim: u32, crop_dim: u32, offset: f32) -> u32 {
    let range = source_dim.saturating_sub(crop_dim);
    let pos = (range as f64 * offset.clamp(0.0, 1.0) as f64).round() as u32;
    pos.min(range)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slide_is_centered_at_half() {
        for (src, crop) in [(1000, 400), (801, 801), (4000, 1)] {
            assert_eq!(slide(src, crop, 0.5), (src - crop) / 2 + (src - crop) % 2);
        }
    }

    #[test]
    fn slide_hits_bounds_at_extremes() {
        assert_eq!(slide(1000, 400, 0.0), 0);
        assert_eq!(slide(1000, 400, 1.0), 600);
        assert_eq!(slide(1000, 400, 7.0), 600);
        assert_eq!(slide(1000, 400, -3.0), 0);
    }
}
