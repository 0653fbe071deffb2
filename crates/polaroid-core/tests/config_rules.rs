use polaroid_core::{RenderConfig, RenderError};

#[test]
fn defaults_pass_validation_and_describe_the_print_sizes() {
    let cfg = RenderConfig::default();
    cfg.validate().unwrap();

    assert_eq!(cfg.canvas_size(true), (2400, 3400));
    assert_eq!(cfg.canvas_size(false), (2080, 2600));

    // Framed photo area: inset by the margin, 4:5, caption strip left below.
    let area = cfg.photo_area(true);
    assert_eq!((area.x, area.y), (160.0, 160.0));
    assert_eq!((area.w, area.h), (2080.0, 2600.0));
    assert!(area.bottom() < cfg.framed_height as f32);

    let full = cfg.photo_area(false);
    assert_eq!((full.x, full.y, full.w, full.h), (0.0, 0.0, 2080.0, 2600.0));
}

#[test]
fn bad_geometry_is_rejected() {
    let oversized_margin = RenderConfig::builder().frame_margin(1200).build();
    assert!(matches!(
        oversized_margin.validate(),
        Err(RenderError::InvalidConfig(_))
    ));

    // Tall enough area no longer fits above the caption strip.
    let too_tall = RenderConfig::builder().photo_aspect(2.0).build();
    assert!(too_tall.validate().is_err());

    let zero_canvas = RenderConfig::builder().frameless_canvas(0, 2600).build();
    assert!(zero_canvas.validate().is_err());
}

#[test]
fn bad_knobs_are_rejected() {
    assert!(RenderConfig::builder().gutter_fraction(0.5).build().validate().is_err());
    assert!(RenderConfig::builder().gutter_fraction(-0.01).build().validate().is_err());
    assert!(RenderConfig::builder().quality(0, 92, 90).build().validate().is_err());
    assert!(RenderConfig::builder().grain_alpha(1.5, 0.2).build().validate().is_err());
}

#[test]
fn config_round_trips_through_json() {
    let cfg = RenderConfig::builder()
        .framed_canvas(1200, 1700)
        .frame_margin(80)
        .gutter_fraction(0.05)
        .quality(70, 85, 84)
        .seed(Some(99))
        .build();

    let json = serde_json::to_string(&cfg).unwrap();
    let back: RenderConfig = serde_json::from_str(&json).unwrap();

    assert_eq!(back.canvas_size(true), (1200, 1700));
    assert_eq!(back.frame_margin, 80);
    assert_eq!(back.gutter_fraction, 0.05);
    assert_eq!(back.quality_frameless, 70);
    assert_eq!(back.seed, Some(99));
    // Fonts are runtime-only and never serialized.
    assert!(back.fonts.is_none());
    back.validate().unwrap();
}
