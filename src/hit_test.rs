use super::*;
use crate::coords::{Rect, Size};

fn stage_with_background() -> (Stage, ShapeId) {
    let mut stage = Stage::new(Size::new(200.0, 100.0));
    let bg = stage.rect(Rect { x: 0.0, y: 0.0, width: 200.0, height: 100.0 });
    stage.set_z_index(bg, -1_000);
    (stage, bg)
}

#[test]
fn empty_stage_hits_nothing() {
    let stage = Stage::new(Size::new(10.0, 10.0));
    assert!(hit_test(&stage, Point::new(5.0, 5.0), 0.0).is_none());
}

#[test]
fn background_hit_away_from_markers() {
    let (mut stage, bg) = stage_with_background();
    stage.diamond(Point::new(50.0, 50.0), 5.0);
    assert_eq!(hit_test(&stage, Point::new(150.0, 20.0), 0.0), Some(bg));
}

#[test]
fn marker_beats_background() {
    let (mut stage, _) = stage_with_background();
    let marker = stage.diamond(Point::new(50.0, 50.0), 5.0);
    assert_eq!(hit_test(&stage, Point::new(52.0, 51.0), 0.0), Some(marker));
}

#[test]
fn diamond_corners_outside_radius_miss() {
    let (mut stage, bg) = stage_with_background();
    stage.diamond(Point::new(50.0, 50.0), 5.0);
    // (54, 54) is inside the bounding square but outside the rhombus.
    assert_eq!(hit_test(&stage, Point::new(54.0, 54.0), 0.0), Some(bg));
}

#[test]
fn slop_widens_markers() {
    let (mut stage, _) = stage_with_background();
    let marker = stage.diamond(Point::new(50.0, 50.0), 5.0);
    assert_eq!(hit_test(&stage, Point::new(57.0, 50.0), 2.0), Some(marker));
}

#[test]
fn later_marker_on_top() {
    let (mut stage, _) = stage_with_background();
    stage.diamond(Point::new(50.0, 50.0), 5.0);
    let second = stage.diamond(Point::new(52.0, 50.0), 5.0);
    assert_eq!(hit_test(&stage, Point::new(51.0, 50.0), 0.0), Some(second));
}

#[test]
fn pointer_disabled_and_hidden_shapes_skipped() {
    let (mut stage, bg) = stage_with_background();
    let overlay = stage.rect(Rect { x: 0.0, y: 0.0, width: 200.0, height: 100.0 });
    stage.set_z_index(overlay, 1_000);
    stage.disable_pointer_events(overlay, true);
    let hidden = stage.diamond(Point::new(10.0, 10.0), 5.0);
    stage.set_visible(hidden, false);
    assert_eq!(hit_test(&stage, Point::new(10.0, 10.0), 0.0), Some(bg));
}

#[test]
fn paths_never_hit() {
    let mut stage = Stage::new(Size::new(10.0, 10.0));
    let path = stage.path();
    stage.move_to(path, Point::new(0.0, 0.0)).line_to(path, Point::new(10.0, 10.0));
    assert!(hit_test(&stage, Point::new(5.0, 5.0), 3.0).is_none());
}
