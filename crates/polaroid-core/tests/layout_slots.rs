use polaroid_core::layout::{MAX_SLOTS, scrapbook_template, slots};
use polaroid_core::model::{LayoutStyle, RectF, Slot};

const GUTTER: f32 = 0.03;
const EPS: f32 = 0.5;

fn area() -> RectF {
    RectF::new(160.0, 160.0, 2080.0, 2600.0)
}

fn overlap(a: &Slot, b: &Slot) -> bool {
    let (a, b) = (a.rect, b.rect);
    !(a.right() <= b.x + EPS
        || b.right() <= a.x + EPS
        || a.bottom() <= b.y + EPS
        || b.bottom() <= a.y + EPS)
}

#[test]
fn layout_is_deterministic() {
    for style in [LayoutStyle::Grid, LayoutStyle::Scrapbook] {
        for count in 1..=6 {
            let a = slots(count, style, &area(), GUTTER);
            let b = slots(count, style, &area(), GUTTER);
            assert_eq!(a, b, "style {style:?} count {count}");
        }
    }
}

#[test]
fn slot_count_saturates_at_four() {
    for style in [LayoutStyle::Grid, LayoutStyle::Scrapbook] {
        for count in 1..=9 {
            let got = slots(count, style, &area(), GUTTER);
            assert_eq!(got.len(), count.min(MAX_SLOTS), "style {style:?} count {count}");
        }
    }
    assert!(slots(0, LayoutStyle::Grid, &area(), GUTTER).is_empty());
}

#[test]
fn grid_slots_never_overlap() {
    for count in 1..=4 {
        let got = slots(count, LayoutStyle::Grid, &area(), GUTTER);
        for i in 0..got.len() {
            assert_eq!(got[i].rotation_deg, 0.0);
            for j in (i + 1)..got.len() {
                assert!(!overlap(&got[i], &got[j]), "count {count}: slots {i},{j} overlap");
            }
        }
    }
}

#[test]
fn grid_two_tiles_the_area_with_one_gutter() {
    let area = area();
    let g = GUTTER * area.w;
    let got = slots(2, LayoutStyle::Grid, &area, GUTTER);
    assert!((got[0].rect.w - area.w).abs() < EPS);
    assert!((got[0].rect.h + g + got[1].rect.h - area.h).abs() < EPS);
    assert!((got[1].rect.y - (got[0].rect.bottom() + g)).abs() < EPS);
    assert!((got[1].rect.bottom() - area.bottom()).abs() < EPS);
}

#[test]
fn grid_three_has_a_wide_top_bar() {
    let area = area();
    let g = GUTTER * area.w;
    let got = slots(3, LayoutStyle::Grid, &area, GUTTER);
    assert!((got[0].rect.w - area.w).abs() < EPS);
    assert!(got[0].rect.h > got[1].rect.h, "top bar should dominate");
    assert!((got[1].rect.w - got[2].rect.w).abs() < EPS);
    // Bottom row spans the full width including its gutter.
    assert!((got[1].rect.w + g + got[2].rect.w - area.w).abs() < EPS);
    assert!((got[2].rect.right() - area.right()).abs() < EPS);
    // Rows stack to the full height.
    assert!((got[0].rect.h + g + got[1].rect.h - area.h).abs() < EPS);
}

#[test]
fn grid_four_is_an_even_two_by_two() {
    let area = area();
    let g = GUTTER * area.w;
    let got = slots(4, LayoutStyle::Grid, &area, GUTTER);
    for slot in &got {
        assert!((slot.rect.w - (area.w - g) / 2.0).abs() < EPS);
        assert!((slot.rect.h - (area.h - g) / 2.0).abs() < EPS);
    }
    assert!((got[3].rect.right() - area.right()).abs() < EPS);
    assert!((got[3].rect.bottom() - area.bottom()).abs() < EPS);
}

#[test]
fn scrapbook_slots_are_tilted_and_inside_the_area() {
    let area = area();
    for count in 2..=4 {
        let got = slots(count, LayoutStyle::Scrapbook, &area, GUTTER);
        for slot in &got {
            assert_ne!(slot.rotation_deg, 0.0);
            assert!(slot.rect.x >= area.x && slot.rect.right() <= area.right() + EPS);
            assert!(slot.rect.y >= area.y && slot.rect.bottom() <= area.bottom() + EPS);
        }
    }
}

#[test]
fn scrapbook_counts_outside_the_tables_fall_back() {
    // A lone image borrows the first slot of the two-image arrangement;
    // five or more saturate at the four-slot template.
    assert_eq!(scrapbook_template(1), scrapbook_template(2));
    assert_eq!(scrapbook_template(5), scrapbook_template(4));
    let one = slots(1, LayoutStyle::Scrapbook, &area(), GUTTER);
    let two = slots(2, LayoutStyle::Scrapbook, &area(), GUTTER);
    assert_eq!(one.len(), 1);
    assert_eq!(one[0], two[0]);
}
