use image::RgbaImage;
use polaroid_core::crop::{CenterCrop, SmartCrop};
use polaroid_core::scale::stepped_downscale;
use std::borrow::Cow;

#[test]
fn within_two_x_is_a_no_op() {
    let src = RgbaImage::from_pixel(1999, 1500, image::Rgba([7, 8, 9, 255]));
    let out = stepped_downscale(&src, 1000, 800);
    assert!(matches!(out, Cow::Borrowed(_)), "expected the borrowed input back");
    assert_eq!(out.dimensions(), (1999, 1500));
}

#[test]
fn exactly_two_x_triggers_a_single_halving() {
    let src = RgbaImage::new(2000, 1600);
    let out = stepped_downscale(&src, 1000, 800);
    assert_eq!(out.dimensions(), (1000, 800));
}

#[test]
fn large_ratios_converge_into_the_target_band() {
    // 16x the target on both axes: four halvings.
    let src = RgbaImage::new(8000, 6400);
    let out = stepped_downscale(&src, 500, 400);
    let (w, h) = out.dimensions();
    assert!(w >= 500 && w < 1000, "width {w} outside [target, 2*target)");
    assert!(h >= 400 && h < 800, "height {h} outside [target, 2*target)");
}

#[test]
fn odd_dimensions_terminate() {
    let src = RgbaImage::new(4097, 3071);
    let out = stepped_downscale(&src, 100, 75);
    let (w, h) = out.dimensions();
    assert!(w < 200 && h < 150);
    assert!(w >= 100 || h >= 75);
}

#[test]
fn slot_sized_targets_shrink_a_maximal_aspect_crop() {
    // The centered crop of a matching-aspect source is the full source, so
    // targeting the crop's own dimensions could never trigger a reduction;
    // the slot draw size is the real target.
    let src = RgbaImage::new(4160, 5200);
    let crop = CenterCrop.crop(&src, 1040, 1300).unwrap();
    assert_eq!((crop.w, crop.h), (4160, 5200));
    assert!(matches!(
        stepped_downscale(&src, crop.w, crop.h),
        Cow::Borrowed(_)
    ));

    let out = stepped_downscale(&src, 1040, 1300);
    assert_eq!(out.dimensions(), (1040, 1300));
}

#[test]
fn input_is_left_untouched() {
    let src = RgbaImage::from_pixel(4000, 4000, image::Rgba([200, 100, 50, 255]));
    let before = src.clone();
    let _ = stepped_downscale(&src, 500, 500);
    assert_eq!(src, before);
}
