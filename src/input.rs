//! Input model: interaction modes, surfaces, cursors and the gesture state machine.
//!
//! `InteractionMode` captures what a click on the main surface means.
//! `InputState` is the gesture being tracked between pointer-down and
//! pointer-up, carrying the context needed to apply each pointer-move.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::Serialize;

use crate::coords::Point;

/// What pointer input on the main surface does. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    /// Clicks add points and markers can be dragged (default).
    #[default]
    Placement,
    /// A drag selects the region shown in the zoom view.
    ZoomSelect,
}

impl InteractionMode {
    #[must_use]
    pub fn from_placement(enabled: bool) -> Self {
        if enabled { Self::Placement } else { Self::ZoomSelect }
    }
}

/// Which drawing surface an event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceKind {
    Main,
    Zoom,
}

/// Pointer cursor requested for the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Auto,
    Crosshair,
}

impl Cursor {
    /// CSS `cursor` value.
    #[must_use]
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Crosshair => "crosshair",
        }
    }
}

/// Gesture in progress.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputState {
    /// No gesture; waiting for the next pointer-down.
    #[default]
    Idle,
    /// A marker is being dragged.
    DraggingMarker {
        /// Surface the marker lives on.
        surface: SurfaceKind,
        /// Index of the point the marker represents.
        index: usize,
        /// Pointer position minus marker center at pointer-down, so the marker does not jump.
        grab_offset: Point,
        /// Whether any pointer-move has been applied yet.
        moved: bool,
    },
    /// A zoom rectangle is being rubber-banded on the main surface.
    SelectingZoom {
        /// Main-surface position where the drag started.
        anchor: Point,
    },
}

impl InputState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}
