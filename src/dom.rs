//! Browser plumbing: container lookup, image loading and element styling.
//!
//! Everything here is a thin wrapper over `web-sys`. Geometry decisions live
//! in [`crate::engine`]; this module only measures and applies them.

#[cfg(test)]
#[path = "dom_test.rs"]
mod dom_test;

use log::warn;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement, HtmlImageElement, MouseEvent};

use crate::coords::{ImageMetrics, Point, Size, ZoomViewport};
use crate::error::MapperError;
use crate::input::Cursor;

/// A page region given either by element id or as an element handle.
#[derive(Debug, Clone)]
pub enum ElementRef {
    Id(String),
    Element(HtmlElement),
}

impl ElementRef {
    /// Interpret a JS constructor argument: strings are ids, anything else must be an element.
    ///
    /// # Errors
    ///
    /// Returns [`MapperError::Js`] if the value is neither a string nor an `HTMLElement`.
    pub fn from_js(value: JsValue) -> Result<Self, MapperError> {
        if let Some(id) = value.as_string() {
            return Ok(Self::Id(id));
        }
        value
            .dyn_into::<HtmlElement>()
            .map(Self::Element)
            .map_err(|v| MapperError::Js(format!("expected element id or HTMLElement, got {v:?}")))
    }

    /// Look the element up in `document` if needed.
    ///
    /// # Errors
    ///
    /// Returns [`MapperError::ContainerNotFound`] for unknown ids.
    pub fn resolve(&self, document: &Document) -> Result<HtmlElement, MapperError> {
        match self {
            Self::Element(el) => Ok(el.clone()),
            Self::Id(id) => document
                .get_element_by_id(id)
                .and_then(|el| el.dyn_ref::<HtmlElement>().cloned())
                .ok_or_else(|| MapperError::ContainerNotFound(id.clone())),
        }
    }
}

/// The page's document.
///
/// # Errors
///
/// Returns [`MapperError::NoDocument`] outside a browser window.
pub fn document() -> Result<Document, MapperError> {
    web_sys::window().and_then(|w| w.document()).ok_or(MapperError::NoDocument)
}

/// Device pixel ratio of the window, at least 1.
#[must_use]
pub fn device_pixel_ratio() -> f64 {
    web_sys::window().map_or(1.0, |w| w.device_pixel_ratio()).max(1.0)
}

/// Append a full-width `<img>` for `url` to `container` and wait for it to load.
///
/// A failed image is detached again, so the container is left as it was.
///
/// # Errors
///
/// Returns [`MapperError::ImageLoad`] if the browser fires `error` instead of `load`.
pub async fn load_image(container: &HtmlElement, url: &str) -> Result<HtmlImageElement, MapperError> {
    let img = HtmlImageElement::new()?;
    img.style().set_property("width", "100%")?;
    container.append_child(&img)?;

    let promise = js_sys::Promise::new(&mut |resolve, reject| {
        img.set_onload(Some(&resolve));
        img.set_onerror(Some(&reject));
    });
    img.set_src(url);

    let loaded = JsFuture::from(promise).await;
    img.set_onload(None);
    img.set_onerror(None);
    match loaded {
        Ok(_) => Ok(img),
        Err(_) => {
            if let Err(err) = container.remove_child(&img) {
                warn!("failed to detach broken image: {err:?}");
            }
            Err(MapperError::ImageLoad { url: url.to_owned() })
        }
    }
}

/// Pointer position relative to the event target's padding edge, in CSS pixels.
///
/// Browsers report `offsetX`/`offsetY` as fractional values, while the typed
/// accessors truncate to whole pixels; the raw properties are read first.
#[must_use]
pub fn event_offset(event: &MouseEvent) -> Point {
    Point::new(
        fractional(event, "offsetX", event.offset_x()),
        fractional(event, "offsetY", event.offset_y()),
    )
}

fn fractional(event: &MouseEvent, property: &str, whole: i32) -> f64 {
    match js_sys::Reflect::get(event, &JsValue::from_str(property)) {
        Ok(value) => coordinate(value.as_f64(), whole),
        Err(_) => f64::from(whole),
    }
}

/// A precise coordinate when the browser supplied one, else the whole-pixel value.
fn coordinate(precise: Option<f64>, whole: i32) -> f64 {
    precise.filter(|v| v.is_finite()).unwrap_or_else(|| f64::from(whole))
}

/// Natural and rendered size of a loaded image.
#[must_use]
pub fn measure_image(img: &HtmlImageElement) -> ImageMetrics {
    ImageMetrics {
        natural: Size::new(f64::from(img.natural_width()), f64::from(img.natural_height())),
        rendered: Size::new(f64::from(img.width()), f64::from(img.height())),
    }
}

/// Inner display size of an element.
#[must_use]
pub fn element_size(el: &HtmlElement) -> Size {
    Size::new(f64::from(el.client_width()), f64::from(el.client_height()))
}

/// Set the CSS height of `el`'s parent element, if it has one.
///
/// # Errors
///
/// Returns [`MapperError::Js`] if the style update throws.
pub fn set_parent_height(el: &HtmlElement, height: f64) -> Result<(), MapperError> {
    if let Some(parent) = el.parent_element().and_then(|p| p.dyn_ref::<HtmlElement>().cloned()) {
        parent.style().set_property("height", &format!("{height}px"))?;
    }
    Ok(())
}

/// Create a canvas covering `size` CSS pixels inside `container`.
///
/// # Errors
///
/// Returns [`MapperError::Js`] if the canvas or its 2D context cannot be created.
pub fn create_canvas(
    container: &HtmlElement,
    size: Size,
    dpr: f64,
) -> Result<(HtmlCanvasElement, CanvasRenderingContext2d), MapperError> {
    let document = document()?;
    let canvas = document.create_element("canvas")?.unchecked_into::<HtmlCanvasElement>();
    resize_canvas(&canvas, size, dpr)?;
    let style = canvas.style();
    style.set_property("display", "block")?;
    style.set_property("touch-action", "none")?;
    container.append_child(&canvas)?;

    let ctx = canvas
        .get_context("2d")?
        .ok_or_else(|| MapperError::Js("2d context unavailable".to_owned()))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|obj| MapperError::from(JsValue::from(obj)))?;
    Ok((canvas, ctx))
}

/// Size a canvas's backing store for `dpr` and its CSS box to `size`.
///
/// # Errors
///
/// Returns [`MapperError::Js`] if the style update throws.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn resize_canvas(canvas: &HtmlCanvasElement, size: Size, dpr: f64) -> Result<(), MapperError> {
    canvas.set_width((size.width * dpr).round() as u32);
    canvas.set_height((size.height * dpr).round() as u32);
    let style = canvas.style();
    style.set_property("width", &format!("{}px", size.width))?;
    style.set_property("height", &format!("{}px", size.height))?;
    Ok(())
}

/// Swap the zoom wrapper's image for a copy sized and shifted to `viewport`.
///
/// Only `<img>` children are replaced, so a zoom drawing surface nested in the
/// wrapper stays attached.
///
/// # Errors
///
/// Returns [`MapperError::Js`] if DOM manipulation throws.
pub fn replace_zoom_image(wrapper: &HtmlElement, url: &str, viewport: &ZoomViewport) -> Result<(), MapperError> {
    let old = wrapper.query_selector_all(":scope > img")?;
    for i in 0..old.length() {
        if let Some(node) = old.item(i) {
            wrapper.remove_child(&node)?;
        }
    }

    let img = HtmlImageElement::new()?;
    img.set_src(url);
    let style = img.style();
    style.set_property("width", &format!("{}px", viewport.width))?;
    style.set_property("height", &format!("{}px", viewport.height))?;
    style.set_property("max-width", "none")?;
    style.set_property("margin-left", &format!("{}px", viewport.offset_x))?;
    style.set_property("margin-top", &format!("{}px", viewport.offset_y))?;
    wrapper.insert_before(&img, wrapper.first_child().as_ref())?;
    Ok(())
}

/// Apply a pointer cursor to a drawing surface element.
///
/// # Errors
///
/// Returns [`MapperError::Js`] if the style update throws.
pub fn set_cursor(el: &HtmlElement, cursor: Cursor) -> Result<(), MapperError> {
    el.style().set_property("cursor", cursor.as_css())?;
    Ok(())
}
