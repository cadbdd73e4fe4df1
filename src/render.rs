//! Rendering: draws a [`Stage`] onto a 2D canvas context.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It reads stage state and produces pixels; it never mutates mapper state.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::stage::{Geometry, PathCommand, Shape, Stage};

/// Clear the surface and draw every visible shape in z-order.
///
/// `dpr` is the device pixel ratio; stage coordinates are CSS pixels.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails.
pub fn draw(ctx: &CanvasRenderingContext2d, stage: &Stage, dpr: f64) -> Result<(), JsValue> {
    let bounds = stage.bounds();
    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, bounds.width, bounds.height);

    for shape in stage.sorted_shapes() {
        if shape.visible {
            draw_shape(ctx, shape)?;
        }
    }
    Ok(())
}

fn draw_shape(ctx: &CanvasRenderingContext2d, shape: &Shape) -> Result<(), JsValue> {
    ctx.save();
    ctx.begin_path();
    match &shape.geometry {
        Geometry::Rect(r) => ctx.rect(r.x, r.y, r.width, r.height),
        Geometry::Path(cmds) => trace_path(ctx, cmds),
        Geometry::Diamond { center, radius } => {
            ctx.move_to(center.x, center.y - radius);
            ctx.line_to(center.x + radius, center.y);
            ctx.line_to(center.x, center.y + radius);
            ctx.line_to(center.x - radius, center.y);
            ctx.close_path();
        }
    }

    if let Some(fill) = &shape.fill {
        ctx.set_global_alpha(fill.opacity);
        ctx.set_fill_style_str(&fill.color);
        ctx.fill();
        ctx.set_global_alpha(1.0);
    }

    if let Some(stroke) = &shape.stroke {
        let dash = stroke.dash.iter().map(|d| JsValue::from_f64(*d)).collect::<js_sys::Array>();
        ctx.set_line_dash(&dash)?;
        ctx.set_line_width(1.0);
        ctx.set_stroke_style_str(&stroke.color);
        ctx.stroke();
    }

    ctx.restore();
    Ok(())
}

fn trace_path(ctx: &CanvasRenderingContext2d, cmds: &[PathCommand]) {
    for cmd in cmds {
        match cmd {
            PathCommand::MoveTo(p) => ctx.move_to(p.x, p.y),
            PathCommand::LineTo(p) => ctx.line_to(p.x, p.y),
            PathCommand::Close => ctx.close_path(),
        }
    }
}
