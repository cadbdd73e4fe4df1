//! Placed points and the ordered store that owns them.
//!
//! A [`MappedPoint`] stores its position only as a ratio of the main surface.
//! The original-image pixel position is derived from that ratio and refreshed
//! on every write, so the two never disagree.

#[cfg(test)]
#[path = "points_test.rs"]
mod points_test;

use serde::Serialize;

use crate::coords::{ImageMetrics, Point};

/// One placed landmark, as exported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MappedPoint {
    /// Placement order; equals the point's position in the store.
    pub index: usize,
    /// Horizontal position as a fraction of the main surface width.
    pub x_ratio: f64,
    /// Vertical position as a fraction of the main surface height.
    pub y_ratio: f64,
    /// Horizontal position in original image pixels.
    pub original_x: i64,
    /// Vertical position in original image pixels.
    pub original_y: i64,
}

impl MappedPoint {
    /// The ratio position as a point.
    #[must_use]
    pub fn ratio(&self) -> Point {
        Point::new(self.x_ratio, self.y_ratio)
    }
}

/// Ordered, append-only list of placed points.
#[derive(Debug, Clone, Default)]
pub struct PointStore {
    points: Vec<MappedPoint>,
}

impl PointStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a point at `ratio` and return it.
    pub fn push(&mut self, ratio: Point, image: &ImageMetrics) -> MappedPoint {
        let (original_x, original_y) = image.original_pixel(ratio);
        let point =
            MappedPoint { index: self.points.len(), x_ratio: ratio.x, y_ratio: ratio.y, original_x, original_y };
        self.points.push(point);
        point
    }

    /// Move the point at `index` to `ratio`, refreshing its original-pixel position.
    ///
    /// Returns the updated point, or `None` if no such point exists.
    pub fn set_ratio(&mut self, index: usize, ratio: Point, image: &ImageMetrics) -> Option<MappedPoint> {
        let point = self.points.get_mut(index)?;
        let (original_x, original_y) = image.original_pixel(ratio);
        point.x_ratio = ratio.x;
        point.y_ratio = ratio.y;
        point.original_x = original_x;
        point.original_y = original_y;
        Some(*point)
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&MappedPoint> {
        self.points.get(index)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[MappedPoint] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &MappedPoint> {
        self.points.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
