//! Retained-mode vector drawing surface.
//!
//! A [`Stage`] covers one drawing surface (main or zoom) and owns every shape
//! drawn on it: the interactivity layer, overlay paths and point markers.
//! Shapes are never removed, so a [`ShapeId`] stays valid for the stage's
//! lifetime. The stage knows nothing about points; callers keep their own
//! side tables from point index to shape.

#[cfg(test)]
#[path = "stage_test.rs"]
mod stage_test;

use crate::coords::{Point, Rect, Size};

/// Handle to a shape on a [`Stage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeId(usize);

/// Solid fill.
#[derive(Debug, Clone, PartialEq)]
pub struct Fill {
    pub color: String,
    pub opacity: f64,
}

impl Fill {
    #[must_use]
    pub fn solid(color: &str) -> Self {
        Self { color: color.to_owned(), opacity: 1.0 }
    }
}

/// Outline stroke with an optional dash pattern (empty = solid line).
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub color: String,
    pub dash: Vec<f64>,
}

/// One path-building instruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    Close,
}

/// Shape geometry in surface pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Rect(Rect),
    Path(Vec<PathCommand>),
    /// Rhombus with vertices `radius` away from `center` along each axis.
    Diamond { center: Point, radius: f64 },
}

/// A shape and its presentation state.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub id: ShapeId,
    pub geometry: Geometry,
    pub fill: Option<Fill>,
    pub stroke: Option<Stroke>,
    pub z_index: i64,
    pub visible: bool,
    /// Whether the shape takes part in hit-testing.
    pub pointer_events: bool,
    /// Area a draggable shape's position is constrained to; `None` = not draggable.
    pub drag_bounds: Option<Size>,
}

/// All shapes drawn on one surface.
#[derive(Debug, Clone)]
pub struct Stage {
    bounds: Size,
    shapes: Vec<Shape>,
}

impl Stage {
    #[must_use]
    pub fn new(bounds: Size) -> Self {
        Self { bounds, shapes: Vec::new() }
    }

    /// Pixel bounds of the surface.
    #[must_use]
    pub fn bounds(&self) -> Size {
        self.bounds
    }

    /// Change the surface bounds. Draggable shapes are re-constrained to the new area.
    pub fn resize(&mut self, bounds: Size) {
        self.bounds = bounds;
        for shape in &mut self.shapes {
            if shape.drag_bounds.is_some() {
                shape.drag_bounds = Some(bounds);
            }
        }
    }

    // --- Creation ---

    pub fn rect(&mut self, rect: Rect) -> ShapeId {
        self.insert(Geometry::Rect(rect))
    }

    /// Create an empty path.
    pub fn path(&mut self) -> ShapeId {
        self.insert(Geometry::Path(Vec::new()))
    }

    pub fn diamond(&mut self, center: Point, radius: f64) -> ShapeId {
        self.insert(Geometry::Diamond { center, radius })
    }

    fn insert(&mut self, geometry: Geometry) -> ShapeId {
        let id = ShapeId(self.shapes.len());
        self.shapes.push(Shape {
            id,
            geometry,
            fill: None,
            stroke: None,
            z_index: 0,
            visible: true,
            pointer_events: true,
            drag_bounds: None,
        });
        id
    }

    // --- Lookup ---

    #[must_use]
    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(id.0)
    }

    fn shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.get_mut(id.0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Shapes in draw order: ascending z-index, creation order among equals.
    #[must_use]
    pub fn sorted_shapes(&self) -> Vec<&Shape> {
        let mut shapes: Vec<&Shape> = self.shapes.iter().collect();
        shapes.sort_by_key(|s| s.z_index);
        shapes
    }

    // --- Styling ---

    pub fn set_fill(&mut self, id: ShapeId, fill: Fill) {
        if let Some(shape) = self.shape_mut(id) {
            shape.fill = Some(fill);
        }
    }

    pub fn set_stroke(&mut self, id: ShapeId, color: &str, dash: &[f64]) {
        if let Some(shape) = self.shape_mut(id) {
            shape.stroke = Some(Stroke { color: color.to_owned(), dash: dash.to_vec() });
        }
    }

    pub fn set_z_index(&mut self, id: ShapeId, z_index: i64) {
        if let Some(shape) = self.shape_mut(id) {
            shape.z_index = z_index;
        }
    }

    pub fn set_visible(&mut self, id: ShapeId, visible: bool) {
        if let Some(shape) = self.shape_mut(id) {
            shape.visible = visible;
        }
    }

    pub fn disable_pointer_events(&mut self, id: ShapeId, disabled: bool) {
        if let Some(shape) = self.shape_mut(id) {
            shape.pointer_events = !disabled;
        }
    }

    /// Make a shape draggable within `bounds`.
    pub fn drag(&mut self, id: ShapeId, bounds: Size) {
        if let Some(shape) = self.shape_mut(id) {
            shape.drag_bounds = Some(bounds);
        }
    }

    // --- Path geometry ---

    /// Remove all commands from a path.
    pub fn clear(&mut self, id: ShapeId) -> &mut Self {
        if let Some(Geometry::Path(cmds)) = self.shape_mut(id).map(|s| &mut s.geometry) {
            cmds.clear();
        }
        self
    }

    pub fn move_to(&mut self, id: ShapeId, p: Point) -> &mut Self {
        self.push_command(id, PathCommand::MoveTo(p))
    }

    pub fn line_to(&mut self, id: ShapeId, p: Point) -> &mut Self {
        self.push_command(id, PathCommand::LineTo(p))
    }

    pub fn close(&mut self, id: ShapeId) -> &mut Self {
        self.push_command(id, PathCommand::Close)
    }

    fn push_command(&mut self, id: ShapeId, cmd: PathCommand) -> &mut Self {
        if let Some(Geometry::Path(cmds)) = self.shape_mut(id).map(|s| &mut s.geometry) {
            cmds.push(cmd);
        }
        self
    }

    /// Commands of a path shape; empty for other shapes.
    #[must_use]
    pub fn commands(&self, id: ShapeId) -> &[PathCommand] {
        match self.shape(id).map(|s| &s.geometry) {
            Some(Geometry::Path(cmds)) => cmds.as_slice(),
            _ => &[],
        }
    }

    // --- Position ---

    /// Anchor position of a shape: a diamond's center or a rect's top-left corner.
    #[must_use]
    pub fn position(&self, id: ShapeId) -> Option<Point> {
        match &self.shape(id)?.geometry {
            Geometry::Diamond { center, .. } => Some(*center),
            Geometry::Rect(r) => Some(r.top_left()),
            Geometry::Path(cmds) => cmds.iter().find_map(|c| match c {
                PathCommand::MoveTo(p) | PathCommand::LineTo(p) => Some(*p),
                PathCommand::Close => None,
            }),
        }
    }

    /// Place a diamond's center, ignoring drag bounds.
    pub fn set_center(&mut self, id: ShapeId, p: Point) {
        if let Some(Geometry::Diamond { center, .. }) = self.shape_mut(id).map(|s| &mut s.geometry) {
            *center = p;
        }
    }

    /// Drag a diamond's center to `p`, clamped to its drag bounds.
    ///
    /// Returns the resulting center, or `None` if the shape is not a draggable diamond.
    pub fn drag_to(&mut self, id: ShapeId, p: Point) -> Option<Point> {
        let shape = self.shape_mut(id)?;
        let bounds = shape.drag_bounds?;
        match &mut shape.geometry {
            Geometry::Diamond { center, .. } => {
                *center = bounds.clamp(p);
                Some(*center)
            }
            _ => None,
        }
    }
}
