//! Presentation options for markers and overlays.
//!
//! Options arrive from the host page as a JSON object; every field is
//! optional and falls back to the defaults in [`crate::consts`].

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Deserialize;

use crate::consts::{CONTOUR_COLOR, CONTOUR_DASH, MARKER_FILL, MARKER_RADIUS_PX, SELECTION_COLOR, SELECTION_DASH};
use crate::error::MapperError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MapperConfig {
    /// Half-diagonal of the diamond markers, in pixels.
    pub marker_radius: f64,
    pub marker_fill: String,
    pub contour_color: String,
    pub contour_dash: Vec<f64>,
    pub selection_color: String,
    pub selection_dash: Vec<f64>,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            marker_radius: MARKER_RADIUS_PX,
            marker_fill: MARKER_FILL.to_owned(),
            contour_color: CONTOUR_COLOR.to_owned(),
            contour_dash: CONTOUR_DASH.to_vec(),
            selection_color: SELECTION_COLOR.to_owned(),
            selection_dash: SELECTION_DASH.to_vec(),
        }
    }
}

impl MapperConfig {
    /// Parse options JSON. Non-positive radii fall back to the default.
    ///
    /// # Errors
    ///
    /// Returns [`MapperError::InvalidConfig`] if `json` is not a valid options object.
    pub fn from_json(json: &str) -> Result<Self, MapperError> {
        let mut config: Self = serde_json::from_str(json)?;
        if config.marker_radius.is_nan() || config.marker_radius <= 0.0 {
            config.marker_radius = MARKER_RADIUS_PX;
        }
        Ok(config)
    }
}
