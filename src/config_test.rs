#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn default_matches_constants() {
    let c = MapperConfig::default();
    assert_eq!(c.marker_radius, 5.0);
    assert_eq!(c.marker_fill, "yellow");
    assert_eq!(c.contour_color, "red");
    assert_eq!(c.contour_dash, vec![5.0, 3.0]);
    assert_eq!(c.selection_color, "blue");
    assert_eq!(c.selection_dash, vec![3.0, 2.0]);
}

#[test]
fn empty_object_is_default() {
    assert_eq!(MapperConfig::from_json("{}").unwrap(), MapperConfig::default());
}

#[test]
fn partial_override() {
    let c = MapperConfig::from_json(r#"{"markerRadius": 8, "contourColor": "lime"}"#).unwrap();
    assert_eq!(c.marker_radius, 8.0);
    assert_eq!(c.contour_color, "lime");
    assert_eq!(c.marker_fill, "yellow");
}

#[test]
fn non_positive_radius_falls_back() {
    let c = MapperConfig::from_json(r#"{"markerRadius": 0}"#).unwrap();
    assert_eq!(c.marker_radius, 5.0);
    let c = MapperConfig::from_json(r#"{"markerRadius": -3}"#).unwrap();
    assert_eq!(c.marker_radius, 5.0);
}

#[test]
fn invalid_json_is_config_error() {
    let err = MapperConfig::from_json("{nope").unwrap_err();
    assert!(matches!(err, MapperError::InvalidConfig(_)));
    assert!(err.to_string().starts_with("invalid mapper options"));
}
