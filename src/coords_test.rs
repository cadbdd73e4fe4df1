#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

fn photo() -> ImageMetrics {
    ImageMetrics { natural: Size::new(863.0, 593.0), rendered: Size::new(400.0, 275.0) }
}

// --- Size ---

#[test]
fn size_degenerate_when_any_side_is_zero() {
    assert!(Size::new(0.0, 10.0).is_degenerate());
    assert!(Size::new(10.0, 0.0).is_degenerate());
    assert!(Size::new(f64::NAN, 10.0).is_degenerate());
    assert!(!Size::new(1.0, 1.0).is_degenerate());
}

#[test]
fn size_to_ratio_divides_by_bounds() {
    let s = Size::new(400.0, 275.0);
    assert!(point_approx_eq(s.to_ratio(Point::new(200.0, 137.5)), Point::new(0.5, 0.5)));
}

#[test]
fn size_from_ratio_inverts_to_ratio() {
    let s = Size::new(400.0, 275.0);
    let px = Point::new(123.0, 45.5);
    assert!(point_approx_eq(s.from_ratio(s.to_ratio(px)), px));
}

#[test]
fn size_clamp_keeps_point_inside() {
    let s = Size::new(100.0, 50.0);
    assert_eq!(s.clamp(Point::new(-5.0, 60.0)), Point::new(0.0, 50.0));
    assert_eq!(s.clamp(Point::new(30.0, 20.0)), Point::new(30.0, 20.0));
}

// --- Rect ---

#[test]
fn rect_from_corners_any_direction() {
    let forward = Rect::from_corners(Point::new(10.0, 20.0), Point::new(50.0, 80.0));
    let backward = Rect::from_corners(Point::new(50.0, 80.0), Point::new(10.0, 20.0));
    let mixed = Rect::from_corners(Point::new(50.0, 20.0), Point::new(10.0, 80.0));
    assert_eq!(forward, backward);
    assert_eq!(forward, mixed);
    assert_eq!(forward.width, 40.0);
    assert_eq!(forward.height, 60.0);
    assert_eq!(forward.top_left(), Point::new(10.0, 20.0));
}

#[test]
fn rect_contains_edges() {
    let r = Rect { x: 0.0, y: 0.0, width: 10.0, height: 10.0 };
    assert!(r.contains(Point::new(10.0, 0.0)));
    assert!(!r.contains(Point::new(10.1, 5.0)));
}

// --- ImageMetrics ---

#[test]
fn original_pixel_rounds_half_up() {
    assert_eq!(photo().original_pixel(Point::new(0.5, 0.5)), (432, 297));
}

#[test]
fn original_pixel_quarter() {
    assert_eq!(photo().original_pixel(Point::new(0.25, 0.25)), (216, 148));
}

#[test]
fn image_metrics_serializes_camel_case() {
    let json = serde_json::to_value(photo()).unwrap();
    assert_eq!(json["natural"]["width"], 863.0);
    assert_eq!(json["rendered"]["height"], 275.0);
}

// --- ZoomViewport ---

#[test]
fn half_width_selection_doubles_zoom_image() {
    let main = Size::new(800.0, 550.0);
    let sel = Rect::from_corners(Point::new(0.0, 0.0), Point::new(400.0, 200.0));
    let vp = ZoomViewport::from_selection(sel, main, 400.0, Size::new(800.0, 550.0));
    let vp = vp.expect("viewport expected");
    assert_eq!(vp.width, 800.0);
    assert_eq!(vp.height, 550.0);
}

#[test]
fn zoom_height_follows_natural_aspect_ratio() {
    let main = Size::new(400.0, 275.0);
    let sel = Rect::from_corners(Point::new(100.0, 50.0), Point::new(200.0, 120.0));
    let vp = ZoomViewport::from_selection(sel, main, 300.0, Size::new(863.0, 593.0));
    let vp = vp.expect("viewport expected");
    assert_eq!(vp.width, 1200.0);
    assert_eq!(vp.height, (1200.0_f64 * 593.0 / 863.0).round());
}

#[test]
fn zoom_offsets_shift_selection_to_origin() {
    let main = Size::new(400.0, 300.0);
    let sel = Rect::from_corners(Point::new(100.0, 75.0), Point::new(300.0, 225.0));
    let vp = ZoomViewport::from_selection(sel, main, 400.0, Size::new(400.0, 300.0));
    let vp = vp.expect("viewport expected");
    assert!(approx_eq(vp.left_ratio, 0.25));
    assert!(approx_eq(vp.top_ratio, 0.25));
    assert!(approx_eq(vp.offset_x, -200.0));
    assert!(approx_eq(vp.offset_y, -150.0));
    // The selection's top-left corner lands on the zoom surface origin.
    assert!(point_approx_eq(vp.ratio_to_zoom(Point::new(0.25, 0.25)), Point::new(0.0, 0.0)));
}

#[test]
fn zoom_round_trip() {
    let main = Size::new(400.0, 275.0);
    let sel = Rect::from_corners(Point::new(37.0, 12.0), Point::new(190.0, 140.0));
    let vp = ZoomViewport::from_selection(sel, main, 320.0, Size::new(863.0, 593.0));
    let vp = vp.expect("viewport expected");
    let ratio = Point::new(0.31, 0.42);
    assert!(point_approx_eq(vp.zoom_to_ratio(vp.ratio_to_zoom(ratio)), ratio));
}

#[test]
fn zero_width_selection_rejected() {
    let sel = Rect::from_corners(Point::new(10.0, 10.0), Point::new(10.0, 90.0));
    assert!(ZoomViewport::from_selection(sel, Size::new(400.0, 275.0), 400.0, Size::new(863.0, 593.0)).is_none());
}

#[test]
fn zero_height_selection_rejected() {
    let sel = Rect::from_corners(Point::new(10.0, 10.0), Point::new(90.0, 10.0));
    assert!(ZoomViewport::from_selection(sel, Size::new(400.0, 275.0), 400.0, Size::new(863.0, 593.0)).is_none());
}

#[test]
fn unmeasured_surfaces_rejected() {
    let sel = Rect::from_corners(Point::new(0.0, 0.0), Point::new(50.0, 50.0));
    assert!(ZoomViewport::from_selection(sel, Size::default(), 400.0, Size::new(863.0, 593.0)).is_none());
    assert!(ZoomViewport::from_selection(sel, Size::new(400.0, 275.0), 0.0, Size::new(863.0, 593.0)).is_none());
    assert!(ZoomViewport::from_selection(sel, Size::new(400.0, 275.0), 400.0, Size::default()).is_none());
}
