//! Coordinate spaces and the conversions between them.
//!
//! A point lives in four spaces at once:
//!
//! - **ratio**: fraction (0–1) of the main surface's width/height; the only
//!   stored representation,
//! - **main**: pixels on the main drawing surface (`ratio × bounds`),
//! - **zoom**: pixels on the zoom drawing surface (`ratio × zoom image size +
//!   offset`, see [`ZoomViewport`]),
//! - **original**: whole pixels in the natural image resolution.

#[cfg(test)]
#[path = "coords_test.rs"]
mod coords_test;

use serde::Serialize;

/// A position in any of the pixel or ratio spaces.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise difference `self - other`.
    #[must_use]
    pub fn minus(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

/// Width and height of a surface or image, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether either dimension is zero, negative or not a number.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Express a pixel position on this surface as a fraction of its bounds.
    #[must_use]
    pub fn to_ratio(&self, px: Point) -> Point {
        Point::new(px.x / self.width, px.y / self.height)
    }

    /// Pixel position on this surface for a ratio position.
    #[must_use]
    pub fn from_ratio(&self, ratio: Point) -> Point {
        Point::new(ratio.x * self.width, ratio.y * self.height)
    }

    /// Clamp a pixel position so it stays inside `[0, width] × [0, height]`.
    #[must_use]
    pub fn clamp(&self, px: Point) -> Point {
        Point::new(px.x.clamp(0.0, self.width.max(0.0)), px.y.clamp(0.0, self.height.max(0.0)))
    }
}

/// Axis-aligned rectangle in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Rectangle spanned by two opposite corners, regardless of drag direction.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        let min_x = a.x.min(b.x);
        let min_y = a.y.min(b.y);
        Self { x: min_x, y: min_y, width: a.x.max(b.x) - min_x, height: a.y.max(b.y) - min_y }
    }

    #[must_use]
    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

/// Natural and on-screen dimensions of the loaded image.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMetrics {
    /// Intrinsic pixel size of the image file.
    pub natural: Size,
    /// Size the image is rendered at in the page.
    pub rendered: Size,
}

impl ImageMetrics {
    /// Whole-pixel position in the original image for a ratio position.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn original_pixel(&self, ratio: Point) -> (i64, i64) {
        ((ratio.x * self.natural.width).round() as i64, (ratio.y * self.natural.height).round() as i64)
    }
}

/// Placement of the magnified image inside the zoom surface.
///
/// The zoom image is rendered at `width × height` and shifted by
/// `(offset_x, offset_y)` (both ≤ 0) so that the selected rectangle of the
/// main surface fills the zoom viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoomViewport {
    /// Left edge of the selection as a fraction of the main surface width.
    pub left_ratio: f64,
    /// Top edge of the selection as a fraction of the main surface height.
    pub top_ratio: f64,
    /// Rendered zoom image width in pixels.
    pub width: f64,
    /// Rendered zoom image height in pixels.
    pub height: f64,
    /// Horizontal image shift in pixels.
    pub offset_x: f64,
    /// Vertical image shift in pixels.
    pub offset_y: f64,
}

impl ZoomViewport {
    /// Derive the viewport for a selection made on the main surface.
    ///
    /// The image width is chosen so the selection's width fills the zoom
    /// wrapper; the height follows the image's natural aspect ratio. Returns
    /// `None` for zero-area selections or unmeasured surfaces.
    #[must_use]
    pub fn from_selection(selection: Rect, main: Size, wrapper_width: f64, natural: Size) -> Option<Self> {
        let area = Size::new(selection.width, selection.height);
        if main.is_degenerate() || natural.is_degenerate() || area.is_degenerate() || wrapper_width.is_nan() || wrapper_width <= 0.0 {
            return None;
        }

        let width_ratio = selection.width / main.width;
        let width = (wrapper_width / width_ratio).round();
        let height = (width * natural.height / natural.width).round();
        let top_left = main.to_ratio(selection.top_left());

        Some(Self {
            left_ratio: top_left.x,
            top_ratio: top_left.y,
            width,
            height,
            offset_x: -top_left.x * width,
            offset_y: -top_left.y * height,
        })
    }

    /// Zoom-surface pixel position for a ratio position.
    #[must_use]
    pub fn ratio_to_zoom(&self, ratio: Point) -> Point {
        Point::new(ratio.x * self.width + self.offset_x, ratio.y * self.height + self.offset_y)
    }

    /// Ratio position for a zoom-surface pixel position.
    #[must_use]
    pub fn zoom_to_ratio(&self, px: Point) -> Point {
        Point::new((px.x - self.offset_x) / self.width, (px.y - self.offset_y) / self.height)
    }
}
