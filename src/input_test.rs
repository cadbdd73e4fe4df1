use super::*;

#[test]
fn mode_default_is_placement() {
    assert_eq!(InteractionMode::default(), InteractionMode::Placement);
}

#[test]
fn mode_from_placement_flag() {
    assert_eq!(InteractionMode::from_placement(true), InteractionMode::Placement);
    assert_eq!(InteractionMode::from_placement(false), InteractionMode::ZoomSelect);
}

#[test]
fn cursor_css_values() {
    assert_eq!(Cursor::Auto.as_css(), "auto");
    assert_eq!(Cursor::Crosshair.as_css(), "crosshair");
    assert_eq!(Cursor::default(), Cursor::Auto);
}

#[test]
fn input_state_default_is_idle() {
    assert!(InputState::default().is_idle());
}

#[test]
fn selecting_is_not_idle() {
    let state = InputState::SelectingZoom { anchor: Point::new(1.0, 2.0) };
    assert!(!state.is_idle());
}

#[test]
fn surface_kind_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&SurfaceKind::Zoom).unwrap(), "\"zoom\"");
}
