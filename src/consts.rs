//! Shared numeric and style constants for the point mapper.

// ── Markers ─────────────────────────────────────────────────────

/// Half-diagonal of the diamond marker, in surface pixels.
pub const MARKER_RADIUS_PX: f64 = 5.0;

/// Extra screen-space slop around a marker when hit-testing.
pub const MARKER_HIT_SLOP_PX: f64 = 2.0;

/// Default marker fill.
pub const MARKER_FILL: &str = "yellow";

// ── Overlays ────────────────────────────────────────────────────

/// Stroke color of the dashed preview contour.
pub const CONTOUR_COLOR: &str = "red";

/// Dash pattern (on, off) of the preview contour.
pub const CONTOUR_DASH: [f64; 2] = [5.0, 3.0];

/// Stroke color of the rubber-band zoom selection.
pub const SELECTION_COLOR: &str = "blue";

/// Dash pattern (on, off) of the rubber-band zoom selection.
pub const SELECTION_DASH: [f64; 2] = [3.0, 2.0];

/// Fill of the interactivity layer. Almost transparent so it still receives pointer events.
pub const INTERACTIVITY_FILL: &str = "#fff";

/// Opacity of the interactivity layer.
pub const INTERACTIVITY_OPACITY: f64 = 0.000_01;

// ── Z-order ─────────────────────────────────────────────────────

/// Interactivity layer sits beneath everything else.
pub const Z_INTERACTIVITY: i64 = -10_000_000_000;

/// Preview contour sits beneath the markers.
pub const Z_CONTOUR: i64 = -10;

/// Markers are drawn at the default layer.
pub const Z_MARKER: i64 = 0;

/// Rubber-band selection sits above everything else.
pub const Z_SELECTION: i64 = 10_000_000_000;

/// Minimum number of points before the preview contour closes.
pub const CLOSED_CONTOUR_MIN_POINTS: usize = 3;
