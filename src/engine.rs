#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use log::{debug, info, warn};

use crate::config::MapperConfig;
use crate::consts::{
    CLOSED_CONTOUR_MIN_POINTS, INTERACTIVITY_FILL, INTERACTIVITY_OPACITY, MARKER_HIT_SLOP_PX, Z_CONTOUR,
    Z_INTERACTIVITY, Z_MARKER, Z_SELECTION,
};
use crate::coords::{ImageMetrics, Point, Rect, Size, ZoomViewport};
use crate::hit;
use crate::input::{Cursor, InputState, InteractionMode, SurfaceKind};
use crate::points::{MappedPoint, PointStore};
use crate::stage::{Fill, ShapeId, Stage};

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    PointAdded(MappedPoint),
    PointMoved(MappedPoint),
    MarkerDoubleClicked { surface: SurfaceKind, index: usize },
    /// A new zoom region was selected; the host swaps in a resized zoom image.
    ZoomViewportChanged(ZoomViewport),
    SetCursor(Cursor),
    RenderNeeded(SurfaceKind),
}

/// Measured sizes of the page regions the mapper draws into.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceLayout {
    /// Bounds of the main drawing surface.
    pub main: Size,
    /// Bounds of the zoom drawing surface.
    pub zoom: Size,
    /// Display width of the zoom image wrapper.
    pub zoom_wrapper_width: f64,
}

/// Main-surface stage and the shapes the mapper keeps handles to.
#[derive(Debug, Clone)]
struct MainLayer {
    stage: Stage,
    interactivity: ShapeId,
    selection: ShapeId,
    contour: ShapeId,
    /// Marker shape per point, indexed by point index.
    markers: Vec<ShapeId>,
}

/// Zoom-surface stage, created on the first zoom selection.
#[derive(Debug, Clone)]
struct ZoomLayer {
    stage: Stage,
    contour: ShapeId,
    markers: Vec<ShapeId>,
}

/// Core mapper state: every rule that doesn't depend on the DOM.
///
/// Separated from [`crate::widget::PointMapper`] so it can be tested without
/// WASM/browser dependencies. All three views (main contour, zoom contour,
/// markers on both surfaces) are recomputed from the point ratios after every
/// mutation, whichever surface it came from.
pub struct MapperCore {
    pub config: MapperConfig,
    pub mode: InteractionMode,
    pub input: InputState,
    image: Option<ImageMetrics>,
    points: PointStore,
    main: Option<MainLayer>,
    zoom: Option<ZoomLayer>,
    viewport: Option<ZoomViewport>,
    layout: SurfaceLayout,
    /// Set when a marker drag ends so the trailing DOM click does not add a point.
    /// Cleared by that click or by the next pointer-down.
    suppress_click: bool,
}

impl Default for MapperCore {
    fn default() -> Self {
        Self::new(MapperConfig::default())
    }
}

impl MapperCore {
    #[must_use]
    pub fn new(config: MapperConfig) -> Self {
        Self {
            config,
            mode: InteractionMode::default(),
            input: InputState::default(),
            image: None,
            points: PointStore::new(),
            main: None,
            zoom: None,
            viewport: None,
            layout: SurfaceLayout::default(),
            suppress_click: false,
        }
    }

    // --- Setup ---

    /// Record the loaded image and build the main-surface stage.
    ///
    /// The stage gets a near-transparent interactivity rectangle covering its
    /// bounds, a dashed selection overlay that ignores pointer events, and a
    /// dashed preview contour beneath the markers.
    pub fn on_image_loaded(&mut self, image: ImageMetrics, layout: SurfaceLayout) -> Vec<Action> {
        self.image = Some(image);
        self.layout = layout;

        let bounds = layout.main;
        let mut stage = Stage::new(bounds);

        let interactivity = stage.rect(Rect { x: 0.0, y: 0.0, width: bounds.width, height: bounds.height });
        stage.set_fill(interactivity, Fill { color: INTERACTIVITY_FILL.to_owned(), opacity: INTERACTIVITY_OPACITY });
        stage.set_z_index(interactivity, Z_INTERACTIVITY);

        let selection = stage.path();
        stage.disable_pointer_events(selection, true);
        stage.set_stroke(selection, &self.config.selection_color, &self.config.selection_dash);
        stage.set_z_index(selection, Z_SELECTION);

        let contour = stage.path();
        stage.set_stroke(contour, &self.config.contour_color, &self.config.contour_dash);
        stage.set_z_index(contour, Z_CONTOUR);

        self.main = Some(MainLayer { stage, interactivity, selection, contour, markers: Vec::new() });
        debug!("main surface ready: {}x{}", bounds.width, bounds.height);
        vec![Action::RenderNeeded(SurfaceKind::Main)]
    }

    /// Update the zoom wrapper width used by the next zoom selection.
    pub fn set_zoom_wrapper_width(&mut self, width: f64) {
        self.layout.zoom_wrapper_width = width;
    }

    /// Record a fresh measurement of the zoom drawing region.
    ///
    /// An unmeasured (zero-area) size is ignored. Once the zoom stage exists it
    /// is resized, and its markers are re-constrained to the new bounds.
    pub fn resize_zoom_surface(&mut self, size: Size) -> Vec<Action> {
        if size.is_degenerate() {
            return Vec::new();
        }
        self.layout.zoom = size;
        let Some(zoom) = self.zoom.as_mut() else {
            return Vec::new();
        };
        if zoom.stage.bounds() == size {
            return Vec::new();
        }
        zoom.stage.resize(size);
        debug!("zoom surface resized: {}x{}", size.width, size.height);
        vec![Action::RenderNeeded(SurfaceKind::Zoom)]
    }

    /// Switch between point placement and zoom selection.
    ///
    /// Points, markers and the current zoom viewport are left untouched. A
    /// rubber band in progress is abandoned.
    pub fn set_placement_mode(&mut self, enabled: bool) -> Vec<Action> {
        let mode = InteractionMode::from_placement(enabled);
        if mode == self.mode {
            return Vec::new();
        }
        self.mode = mode;

        let mut actions = Vec::new();
        if let InputState::SelectingZoom { .. } = self.input {
            self.input = InputState::Idle;
            if let Some(main) = self.main.as_mut() {
                main.stage.clear(main.selection);
            }
            actions.push(Action::SetCursor(Cursor::Auto));
            actions.push(Action::RenderNeeded(SurfaceKind::Main));
        }
        actions
    }

    // --- Queries ---

    /// The live, ordered point list.
    #[must_use]
    pub fn points(&self) -> &[MappedPoint] {
        self.points.as_slice()
    }

    #[must_use]
    pub fn image(&self) -> Option<ImageMetrics> {
        self.image
    }

    #[must_use]
    pub fn viewport(&self) -> Option<ZoomViewport> {
        self.viewport
    }

    #[must_use]
    pub fn stage(&self, surface: SurfaceKind) -> Option<&Stage> {
        match surface {
            SurfaceKind::Main => self.main.as_ref().map(|m| &m.stage),
            SurfaceKind::Zoom => self.zoom.as_ref().map(|z| &z.stage),
        }
    }

    /// Marker shape for the point at `index` on `surface`.
    #[must_use]
    pub fn marker(&self, surface: SurfaceKind, index: usize) -> Option<ShapeId> {
        match surface {
            SurfaceKind::Main => self.main.as_ref()?.markers.get(index).copied(),
            SurfaceKind::Zoom => self.zoom.as_ref()?.markers.get(index).copied(),
        }
    }

    /// Preview contour shape on `surface`.
    #[must_use]
    pub fn contour(&self, surface: SurfaceKind) -> Option<ShapeId> {
        match surface {
            SurfaceKind::Main => self.main.as_ref().map(|m| m.contour),
            SurfaceKind::Zoom => self.zoom.as_ref().map(|z| z.contour),
        }
    }

    /// Rubber-band selection overlay on the main surface.
    #[must_use]
    pub fn selection_overlay(&self) -> Option<ShapeId> {
        self.main.as_ref().map(|m| m.selection)
    }

    // --- Input events ---

    /// A click on a surface. In placement mode, a click on empty main-surface
    /// area appends a point there.
    pub fn on_click(&mut self, surface: SurfaceKind, pt: Point) -> Vec<Action> {
        if std::mem::take(&mut self.suppress_click) {
            return Vec::new();
        }
        if surface != SurfaceKind::Main || self.mode != InteractionMode::Placement {
            return Vec::new();
        }
        let Some(image) = self.image else {
            return Vec::new();
        };
        let radius = self.config.marker_radius;
        let fill = Fill::solid(&self.config.marker_fill);
        let Some(main) = self.main.as_mut() else {
            return Vec::new();
        };
        if hit::hit_test(&main.stage, pt, MARKER_HIT_SLOP_PX) != Some(main.interactivity) {
            return Vec::new();
        }

        let bounds = main.stage.bounds();
        let point = self.points.push(bounds.to_ratio(pt), &image);

        let marker = main.stage.diamond(pt, radius);
        main.stage.set_fill(marker, fill);
        main.stage.set_z_index(marker, Z_MARKER);
        main.stage.drag(marker, bounds);
        main.markers.push(marker);
        debug!("point {} placed at ({:.4}, {:.4})", point.index, point.x_ratio, point.y_ratio);

        self.refresh_main_preview();
        self.refresh_zoom_preview();
        self.refresh_zoom_markers();

        let mut actions = vec![Action::PointAdded(point), Action::RenderNeeded(SurfaceKind::Main)];
        self.push_zoom_render(&mut actions);
        actions
    }

    pub fn on_pointer_down(&mut self, surface: SurfaceKind, pt: Point) -> Vec<Action> {
        // A new press means any click owed to the previous drag never arrived.
        self.suppress_click = false;
        if !self.input.is_idle() {
            return Vec::new();
        }
        match (surface, self.mode) {
            (SurfaceKind::Main, InteractionMode::ZoomSelect) => {
                let Some(main) = self.main.as_mut() else {
                    return Vec::new();
                };
                self.input = InputState::SelectingZoom { anchor: main.stage.bounds().clamp(pt) };
                main.stage.clear(main.selection);
                main.stage.set_z_index(main.selection, Z_SELECTION);
                vec![Action::SetCursor(Cursor::Crosshair), Action::RenderNeeded(SurfaceKind::Main)]
            }
            (SurfaceKind::Main, InteractionMode::Placement) | (SurfaceKind::Zoom, _) => {
                if let Some((index, center)) = self.marker_at(surface, pt) {
                    self.input =
                        InputState::DraggingMarker { surface, index, grab_offset: pt.minus(center), moved: false };
                }
                Vec::new()
            }
        }
    }

    pub fn on_pointer_move(&mut self, surface: SurfaceKind, pt: Point) -> Vec<Action> {
        match self.input {
            InputState::DraggingMarker { surface: dragged_on, index, grab_offset, .. } if dragged_on == surface => {
                self.input = InputState::DraggingMarker { surface, index, grab_offset, moved: true };
                let target = pt.minus(grab_offset);
                match surface {
                    SurfaceKind::Main => self.drag_main_marker(index, target),
                    SurfaceKind::Zoom => self.drag_zoom_marker(index, target),
                }
            }
            InputState::SelectingZoom { anchor } if surface == SurfaceKind::Main => {
                let Some(main) = self.main.as_mut() else {
                    return Vec::new();
                };
                let sel = main.selection;
                let pt = main.stage.bounds().clamp(pt);
                main.stage
                    .clear(sel)
                    .move_to(sel, anchor)
                    .line_to(sel, Point::new(anchor.x, pt.y))
                    .line_to(sel, pt)
                    .line_to(sel, Point::new(pt.x, anchor.y))
                    .close(sel);
                vec![Action::RenderNeeded(SurfaceKind::Main)]
            }
            _ => Vec::new(),
        }
    }

    pub fn on_pointer_up(&mut self, surface: SurfaceKind, pt: Point) -> Vec<Action> {
        match self.input {
            InputState::DraggingMarker { moved, .. } => {
                self.input = InputState::Idle;
                self.suppress_click = moved;
                Vec::new()
            }
            InputState::SelectingZoom { anchor } if surface == SurfaceKind::Main => {
                self.input = InputState::Idle;
                let Some(bounds) = self.main.as_ref().map(|m| m.stage.bounds()) else {
                    return Vec::new();
                };
                self.finish_zoom_selection(Rect::from_corners(anchor, bounds.clamp(pt)))
            }
            _ => Vec::new(),
        }
    }

    /// The browser took the pointer away mid-gesture (`pointercancel`, lost capture).
    ///
    /// A marker drag ends where it was last moved to; a rubber band is discarded
    /// without changing the zoom viewport.
    pub fn on_pointer_cancel(&mut self) -> Vec<Action> {
        match std::mem::take(&mut self.input) {
            InputState::Idle | InputState::DraggingMarker { .. } => Vec::new(),
            InputState::SelectingZoom { .. } => {
                if let Some(main) = self.main.as_mut() {
                    main.stage.clear(main.selection);
                }
                debug!("zoom selection cancelled");
                vec![Action::SetCursor(Cursor::Auto), Action::RenderNeeded(SurfaceKind::Main)]
            }
        }
    }

    /// Diagnostic hook: reports which point's marker was double-clicked.
    pub fn on_double_click(&self, surface: SurfaceKind, pt: Point) -> Vec<Action> {
        match self.marker_at(surface, pt) {
            Some((index, _)) => {
                info!("marker {index} double-clicked on {surface:?} surface");
                vec![Action::MarkerDoubleClicked { surface, index }]
            }
            None => Vec::new(),
        }
    }

    // --- Gesture helpers ---

    /// Point index and marker center of the marker under `pt`.
    fn marker_at(&self, surface: SurfaceKind, pt: Point) -> Option<(usize, Point)> {
        let (stage, markers) = match surface {
            SurfaceKind::Main => self.main.as_ref().map(|m| (&m.stage, &m.markers))?,
            SurfaceKind::Zoom => self.zoom.as_ref().map(|z| (&z.stage, &z.markers))?,
        };
        let id = hit::hit_test(stage, pt, MARKER_HIT_SLOP_PX)?;
        let index = markers.iter().position(|m| *m == id)?;
        Some((index, stage.position(id)?))
    }

    fn drag_main_marker(&mut self, index: usize, target: Point) -> Vec<Action> {
        let Some(image) = self.image else {
            return Vec::new();
        };
        let Some(main) = self.main.as_mut() else {
            return Vec::new();
        };
        let Some(marker) = main.markers.get(index).copied() else {
            return Vec::new();
        };
        let Some(center) = main.stage.drag_to(marker, target) else {
            return Vec::new();
        };
        let ratio = main.stage.bounds().to_ratio(center);
        let Some(point) = self.points.set_ratio(index, ratio, &image) else {
            return Vec::new();
        };

        self.refresh_main_preview();
        self.refresh_zoom_preview();
        self.refresh_zoom_markers();

        let mut actions = vec![Action::PointMoved(point), Action::RenderNeeded(SurfaceKind::Main)];
        self.push_zoom_render(&mut actions);
        actions
    }

    fn drag_zoom_marker(&mut self, index: usize, target: Point) -> Vec<Action> {
        let (Some(image), Some(viewport)) = (self.image, self.viewport) else {
            return Vec::new();
        };
        let Some(zoom) = self.zoom.as_mut() else {
            return Vec::new();
        };
        let Some(marker) = zoom.markers.get(index).copied() else {
            return Vec::new();
        };
        let Some(center) = zoom.stage.drag_to(marker, target) else {
            return Vec::new();
        };
        let raw = viewport.zoom_to_ratio(center);
        let ratio = Point::new(raw.x.clamp(0.0, 1.0), raw.y.clamp(0.0, 1.0));
        let Some(point) = self.points.set_ratio(index, ratio, &image) else {
            return Vec::new();
        };

        self.refresh_main_preview();
        self.refresh_main_markers();
        self.refresh_zoom_preview();

        vec![
            Action::PointMoved(point),
            Action::RenderNeeded(SurfaceKind::Main),
            Action::RenderNeeded(SurfaceKind::Zoom),
        ]
    }

    fn finish_zoom_selection(&mut self, selection: Rect) -> Vec<Action> {
        let Some(main) = self.main.as_mut() else {
            return Vec::new();
        };
        main.stage.clear(main.selection);
        let mut actions = vec![Action::SetCursor(Cursor::Auto), Action::RenderNeeded(SurfaceKind::Main)];

        let natural = self.image.map(|i| i.natural).unwrap_or_default();
        let Some(viewport) =
            ZoomViewport::from_selection(selection, main.stage.bounds(), self.layout.zoom_wrapper_width, natural)
        else {
            warn!("ignoring degenerate zoom selection {}x{}", selection.width, selection.height);
            return actions;
        };

        debug!("zoom viewport: {}x{} offset ({}, {})", viewport.width, viewport.height, viewport.offset_x, viewport.offset_y);
        self.viewport = Some(viewport);
        self.ensure_zoom_layer();
        self.refresh_zoom_preview();
        self.refresh_zoom_markers();

        actions.push(Action::ZoomViewportChanged(viewport));
        actions.push(Action::RenderNeeded(SurfaceKind::Zoom));
        actions
    }

    /// Create the zoom stage on first use; later selections reuse it.
    ///
    /// Until the zoom drawing region has been measured with a real size, the
    /// stage covers the zoom wrapper: its width by the rendered image height.
    fn ensure_zoom_layer(&mut self) {
        if self.zoom.is_some() {
            return;
        }
        let bounds = if self.layout.zoom.is_degenerate() {
            let height = self.image.map_or(0.0, |i| i.rendered.height);
            Size::new(self.layout.zoom_wrapper_width, height)
        } else {
            self.layout.zoom
        };
        let mut stage = Stage::new(bounds);
        let contour = stage.path();
        stage.set_stroke(contour, &self.config.contour_color, &self.config.contour_dash);
        stage.set_z_index(contour, Z_CONTOUR);
        self.zoom = Some(ZoomLayer { stage, contour, markers: Vec::new() });
    }

    fn push_zoom_render(&self, actions: &mut Vec<Action>) {
        if self.zoom.is_some() && self.viewport.is_some() {
            actions.push(Action::RenderNeeded(SurfaceKind::Zoom));
        }
    }

    // --- Synchronized refresh ---

    /// Redraw the main contour through every point in index order.
    fn refresh_main_preview(&mut self) {
        let Some(main) = self.main.as_mut() else {
            return;
        };
        let bounds = main.stage.bounds();
        let positions: Vec<Point> = self.points.iter().map(|p| bounds.from_ratio(p.ratio())).collect();
        trace_contour(&mut main.stage, main.contour, &positions);
    }

    /// Snap every main marker back onto its point's position.
    fn refresh_main_markers(&mut self) {
        let Some(main) = self.main.as_mut() else {
            return;
        };
        let bounds = main.stage.bounds();
        for (point, marker) in self.points.iter().zip(&main.markers) {
            main.stage.set_center(*marker, bounds.from_ratio(point.ratio()));
        }
    }

    /// Redraw the zoom contour; no-op until a zoom region has been selected.
    fn refresh_zoom_preview(&mut self) {
        let (Some(zoom), Some(viewport)) = (self.zoom.as_mut(), self.viewport) else {
            return;
        };
        let positions: Vec<Point> = self.points.iter().map(|p| viewport.ratio_to_zoom(p.ratio())).collect();
        trace_contour(&mut zoom.stage, zoom.contour, &positions);
    }

    /// Reposition existing zoom markers and create the missing ones.
    fn refresh_zoom_markers(&mut self) {
        let (Some(zoom), Some(viewport)) = (self.zoom.as_mut(), self.viewport) else {
            return;
        };
        let bounds = zoom.stage.bounds();
        for point in self.points.iter() {
            let center = viewport.ratio_to_zoom(point.ratio());
            if let Some(marker) = zoom.markers.get(point.index).copied() {
                zoom.stage.set_center(marker, center);
            } else {
                let marker = zoom.stage.diamond(center, self.config.marker_radius);
                zoom.stage.set_fill(marker, Fill::solid(&self.config.marker_fill));
                zoom.stage.set_z_index(marker, Z_MARKER);
                zoom.stage.drag(marker, bounds);
                zoom.markers.push(marker);
            }
        }
    }
}

/// Rebuild a contour path through `positions`, closing it once it has enough vertices.
fn trace_contour(stage: &mut Stage, contour: ShapeId, positions: &[Point]) {
    stage.clear(contour);
    for (i, p) in positions.iter().enumerate() {
        if i == 0 {
            stage.move_to(contour, *p);
        } else {
            stage.line_to(contour, *p);
        }
    }
    if positions.len() >= CLOSED_CONTOUR_MIN_POINTS {
        stage.close(contour);
    }
}
