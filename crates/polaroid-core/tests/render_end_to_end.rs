use std::cell::Cell;

use image::{DynamicImage, Rgba, RgbaImage};
use polaroid_core::crop::{CenterCrop, SmartCrop};
use polaroid_core::model::{CropBox, LayoutStyle, Photo, RenderSpec, RenderedImage};
use polaroid_core::pipeline::render;
use polaroid_core::{RenderConfig, RenderError};

fn solid(w: u32, h: u32, rgb: [u8; 3]) -> Photo {
    let px = Rgba([rgb[0], rgb[1], rgb[2], 255]);
    Photo::new(DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, px)))
}

fn decode(out: &RenderedImage) -> RgbaImage {
    let img = image::load_from_memory(&out.bytes).expect("output should be a decodable jpeg");
    assert_eq!(img.width(), out.width);
    assert_eq!(img.height(), out.height);
    img.to_rgba8()
}

/// Mean luminance over a small patch, 0..=255.
fn patch_luma(img: &RgbaImage, x0: u32, y0: u32, x1: u32, y1: u32) -> f32 {
    let mut sum = 0.0;
    let mut n = 0u32;
    for y in y0..y1 {
        for x in x0..x1 {
            let p = img.get_pixel(x, y).0;
            sum += 0.2126 * p[0] as f32 + 0.7152 * p[1] as f32 + 0.0722 * p[2] as f32;
            n += 1;
        }
    }
    sum / n as f32
}

// Smaller canvases than the print defaults keep these renders quick while
// exercising the same code paths.
fn framed_cfg(seed: u64) -> RenderConfig {
    RenderConfig::builder()
        .framed_canvas(1200, 1700)
        .frame_margin(80)
        .seed(Some(seed))
        .build()
}

#[test]
fn framed_single_keeps_a_bright_paper_margin_around_a_dark_photo() {
    let cfg = framed_cfg(11);
    let spec = RenderSpec {
        photos: vec![solid(900, 1200, [40, 40, 90])],
        caption: "golden hour".into(),
        date: "2024-06-01".into(),
        style: LayoutStyle::Grid,
        framed: true,
    };

    let out = render(&spec, &cfg, &CenterCrop).unwrap();
    assert_eq!((out.width, out.height), (1200, 1700));

    let img = decode(&out);
    let margin = patch_luma(&img, 20, 20, 60, 60);
    let photo = patch_luma(&img, 580, 710, 620, 750);
    assert!(margin > 200.0, "paper margin too dark: {margin}");
    assert!(photo < 140.0, "photo center too bright: {photo}");
    assert!(
        margin - photo > 80.0,
        "photo rectangle not distinct from the frame ({margin} vs {photo})"
    );
}

#[test]
fn frameless_grid_separates_slots_with_a_dark_gutter() {
    let cfg = RenderConfig::builder()
        .frameless_canvas(1040, 1300)
        .seed(Some(3))
        .build();
    let spec = RenderSpec {
        photos: vec![solid(1200, 800, [220, 200, 180]), solid(1200, 800, [210, 205, 190])],
        caption: String::new(),
        date: String::new(),
        style: LayoutStyle::Grid,
        framed: false,
    };

    let out = render(&spec, &cfg, &CenterCrop).unwrap();
    assert_eq!((out.width, out.height), (1040, 1300));

    let img = decode(&out);
    // Two stacked slots with a 3% gutter: its band is centered on y = 650.
    let gutter = patch_luma(&img, 300, 648, 700, 652);
    let upper = patch_luma(&img, 480, 300, 560, 340);
    let lower = patch_luma(&img, 480, 960, 560, 1000);
    assert!(gutter < 90.0, "gutter not dark: {gutter}");
    assert!(upper > 140.0, "upper slot not bright: {upper}");
    assert!(lower > 140.0, "lower slot not bright: {lower}");
}

#[test]
fn framed_scrapbook_leaves_paper_showing_between_tilted_slots() {
    let cfg = framed_cfg(29);
    let spec = RenderSpec {
        photos: vec![
            solid(800, 600, [30, 30, 60]),
            solid(800, 600, [35, 25, 55]),
            solid(800, 600, [25, 35, 50]),
        ],
        caption: "road trip".into(),
        date: String::new(),
        style: LayoutStyle::Scrapbook,
        framed: true,
    };

    let out = render(&spec, &cfg, &CenterCrop).unwrap();
    let img = decode(&out);

    // A grid would cover the collage area corner to corner; the scrapbook
    // arrangement leaves the area's top-left corner as bare paper.
    let corner = patch_luma(&img, 84, 84, 94, 94);
    assert!(corner > 170.0, "scrapbook should leave paper at the corner: {corner}");

    // First tilted slot: the photo itself stays dark.
    let photo = patch_luma(&img, 560, 390, 600, 420);
    assert!(photo < 140.0, "slot photo too bright: {photo}");
}

/// Cropper that fails on its nth call, standing in for an image that cannot
/// be analyzed.
struct FailNth {
    calls: Cell<usize>,
    fail_at: usize,
}

impl SmartCrop for FailNth {
    fn crop(&self, image: &RgbaImage, tw: u32, th: u32) -> polaroid_core::Result<CropBox> {
        let n = self.calls.get();
        self.calls.set(n + 1);
        if n == self.fail_at {
            return Err(RenderError::Crop("simulated saliency failure".into()));
        }
        CenterCrop.crop(image, tw, th)
    }
}

#[test]
fn one_failing_image_aborts_the_whole_collage() {
    let cfg = RenderConfig::builder()
        .frameless_canvas(520, 650)
        .seed(Some(1))
        .build();
    let spec = RenderSpec {
        photos: (0..4).map(|_| solid(400, 300, [128, 128, 128])).collect(),
        caption: String::new(),
        date: String::new(),
        style: LayoutStyle::Grid,
        framed: false,
    };

    let cropper = FailNth { calls: Cell::new(0), fail_at: 2 };
    let err = render(&spec, &cfg, &cropper).unwrap_err();
    assert!(matches!(err, RenderError::Crop(_)), "got {err:?}");
}

#[test]
fn no_photos_is_an_error() {
    let spec = RenderSpec {
        photos: vec![],
        caption: String::new(),
        date: String::new(),
        style: LayoutStyle::Grid,
        framed: true,
    };
    let err = render(&spec, &RenderConfig::default(), &CenterCrop).unwrap_err();
    assert!(matches!(err, RenderError::Empty));
}

#[test]
fn an_oversized_source_renders_into_its_slot() {
    // 8x the slot on both axes: forces the stepped reduction path before
    // the draw.
    let cfg = RenderConfig::builder()
        .frameless_canvas(520, 650)
        .seed(Some(8))
        .build();
    let spec = RenderSpec {
        photos: vec![solid(4160, 5200, [210, 190, 170])],
        caption: String::new(),
        date: String::new(),
        style: LayoutStyle::Grid,
        framed: false,
    };
    let out = render(&spec, &cfg, &CenterCrop).unwrap();
    let img = decode(&out);
    let center = patch_luma(&img, 240, 300, 280, 340);
    assert!(center > 140.0, "slot not filled by the photo: {center}");
}

#[test]
fn a_fixed_seed_reproduces_the_exact_bytes() {
    let spec = RenderSpec {
        photos: vec![solid(600, 800, [90, 120, 150])],
        caption: String::new(),
        date: String::new(),
        style: LayoutStyle::Grid,
        framed: false,
    };
    let cfg = RenderConfig::builder()
        .frameless_canvas(520, 650)
        .seed(Some(42))
        .build();
    let a = render(&spec, &cfg, &CenterCrop).unwrap();
    let b = render(&spec, &cfg, &CenterCrop).unwrap();
    assert_eq!(a.bytes, b.bytes);
}
