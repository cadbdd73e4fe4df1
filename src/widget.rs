//! JavaScript-facing `PointMapper` and its DOM event wiring.
//!
//! The widget owns the page elements and canvases and forwards every pointer
//! event to [`MapperCore`]. Whatever the core returns as [`Action`]s is applied
//! here: canvases are redrawn, cursors set, and the zoom image swapped.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

#[cfg(test)]
#[path = "widget_test.rs"]
mod widget_test;

use log::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, HtmlImageElement, MouseEvent, PointerEvent};

use crate::config::MapperConfig;
use crate::coords::{ImageMetrics, Size, ZoomViewport};
use crate::dom::{self, ElementRef};
use crate::engine::{Action, MapperCore, SurfaceLayout};
use crate::error::MapperError;
use crate::input::SurfaceKind;
use crate::render;

type Listener = Closure<dyn FnMut(MouseEvent)>;

/// DOM events the mapper listens to on each drawing surface.
#[derive(Debug, Clone, Copy)]
enum EventKind {
    Click,
    DoubleClick,
    PointerDown,
    PointerMove,
    PointerUp,
    PointerCancel,
    LostPointerCapture,
}

impl EventKind {
    const ALL: [EventKind; 7] = [
        Self::Click,
        Self::DoubleClick,
        Self::PointerDown,
        Self::PointerMove,
        Self::PointerUp,
        Self::PointerCancel,
        Self::LostPointerCapture,
    ];

    fn dom_name(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::DoubleClick => "dblclick",
            Self::PointerDown => "pointerdown",
            Self::PointerMove => "pointermove",
            Self::PointerUp => "pointerup",
            Self::PointerCancel => "pointercancel",
            Self::LostPointerCapture => "lostpointercapture",
        }
    }
}

/// Progress of the one-time image load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum LoadState {
    #[default]
    Unloaded,
    Loading,
    Loaded,
}

impl LoadState {
    /// Claim the load. Only an unloaded mapper (or one whose load failed) may start one.
    fn begin(&mut self) -> Result<(), MapperError> {
        if *self != Self::Unloaded {
            return Err(MapperError::AlreadyLoaded);
        }
        *self = Self::Loading;
        Ok(())
    }
}

/// The four page regions the mapper works with.
struct Regions {
    image: HtmlElement,
    draw: HtmlElement,
    zoom_image: HtmlElement,
    zoom_draw: HtmlElement,
}

struct Surface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    /// CSS size the canvas was last laid out at.
    size: Size,
}

struct Inner {
    core: MapperCore,
    url: String,
    load: LoadState,
    regions: Regions,
    main: Option<Surface>,
    zoom: Option<Surface>,
    dpr: f64,
    on_change: Option<js_sys::Function>,
    /// Points changed since the last change notification.
    changed: bool,
    /// Keeps event closures alive for as long as the mapper exists.
    listeners: Vec<Listener>,
    this: Weak<RefCell<Inner>>,
}

/// Interactive point placement over an image with a synchronized zoom view.
#[wasm_bindgen]
pub struct PointMapper {
    inner: Rc<RefCell<Inner>>,
}

#[wasm_bindgen]
impl PointMapper {
    /// Create a mapper for `url`. Each region is an element id or an `HTMLElement`.
    ///
    /// `options` is an optional JSON object of presentation settings
    /// (`markerRadius`, `markerFill`, `contourColor`, `contourDash`,
    /// `selectionColor`, `selectionDash`).
    ///
    /// # Errors
    ///
    /// Rejects unknown ids, non-element regions and malformed options.
    #[wasm_bindgen(constructor)]
    pub fn new(
        url: String,
        image: JsValue,
        draw: JsValue,
        zoom_image: JsValue,
        zoom_draw: JsValue,
        options: Option<String>,
    ) -> Result<PointMapper, JsValue> {
        let config = match options {
            Some(json) => MapperConfig::from_json(&json)?,
            None => MapperConfig::default(),
        };
        let document = dom::document()?;
        let regions = Regions {
            image: ElementRef::from_js(image)?.resolve(&document)?,
            draw: ElementRef::from_js(draw)?.resolve(&document)?,
            zoom_image: ElementRef::from_js(zoom_image)?.resolve(&document)?,
            zoom_draw: ElementRef::from_js(zoom_draw)?.resolve(&document)?,
        };

        let inner = Rc::new_cyclic(|this| {
            RefCell::new(Inner {
                core: MapperCore::new(config),
                url,
                load: LoadState::Unloaded,
                regions,
                main: None,
                zoom: None,
                dpr: dom::device_pixel_ratio(),
                on_change: None,
                changed: false,
                listeners: Vec::new(),
                this: this.clone(),
            })
        });
        Ok(PointMapper { inner })
    }

    /// Load the image and set up the main drawing surface.
    ///
    /// Resolves with `{natural, rendered}` image sizes, or rejects if the image fails to load.
    /// A failed load may be retried; calling `load()` again while loading or
    /// after success rejects.
    pub fn load(&self) -> js_sys::Promise {
        let inner = Rc::clone(&self.inner);
        wasm_bindgen_futures::future_to_promise(async move {
            let (container, url) = {
                let mut state = inner.borrow_mut();
                state.load.begin()?;
                (state.regions.image.clone(), state.url.clone())
            };
            let img = match dom::load_image(&container, &url).await {
                Ok(img) => img,
                Err(err) => {
                    warn!("{err}");
                    inner.borrow_mut().load = LoadState::Unloaded;
                    return Err(err.into());
                }
            };
            inner.borrow_mut().load = LoadState::Loaded;
            let metrics = inner.borrow_mut().on_image_loaded(&img)?;
            serde_json::to_string(&metrics)
                .map_err(MapperError::from)
                .and_then(|json| js_sys::JSON::parse(&json).map_err(MapperError::from))
                .map_err(JsValue::from)
        })
    }

    /// `true` for point placement, `false` for zoom-region selection.
    #[wasm_bindgen(js_name = setPlacementMode)]
    pub fn set_placement_mode(&self, enabled: bool) -> Result<(), JsValue> {
        let mut inner = self.inner.borrow_mut();
        let actions = inner.core.set_placement_mode(enabled);
        inner.apply(actions)?;
        Ok(())
    }

    /// The ordered point list as `[{index, xRatio, yRatio, originalX, originalY}]`.
    #[wasm_bindgen(js_name = getPointsData)]
    pub fn get_points_data(&self) -> Result<JsValue, JsValue> {
        Ok(self.inner.borrow().points_js()?)
    }

    /// Call `callback(points)` after every point placement or move.
    #[wasm_bindgen(js_name = onPointsChanged)]
    pub fn on_points_changed(&self, callback: js_sys::Function) {
        self.inner.borrow_mut().on_change = Some(callback);
    }
}

impl Inner {
    fn on_image_loaded(&mut self, img: &HtmlImageElement) -> Result<ImageMetrics, MapperError> {
        let metrics = dom::measure_image(img);
        dom::set_parent_height(&self.regions.image, metrics.rendered.height)?;
        dom::set_parent_height(&self.regions.zoom_image, metrics.rendered.height)?;

        let layout = SurfaceLayout {
            main: dom::element_size(&self.regions.draw),
            zoom: dom::element_size(&self.regions.zoom_draw),
            zoom_wrapper_width: dom::element_size(&self.regions.zoom_image).width,
        };
        let (canvas, ctx) = dom::create_canvas(&self.regions.draw, layout.main, self.dpr)?;
        self.listen(&canvas, SurfaceKind::Main);
        self.main = Some(Surface { canvas, ctx, size: layout.main });

        let actions = self.core.on_image_loaded(metrics, layout);
        self.apply(actions)?;
        Ok(metrics)
    }

    fn listen(&mut self, canvas: &HtmlCanvasElement, surface: SurfaceKind) {
        for kind in EventKind::ALL {
            let this = self.this.clone();
            let listener: Listener = Closure::new(move |event: MouseEvent| dispatch(&this, surface, kind, &event));
            if let Err(err) = canvas.add_event_listener_with_callback(kind.dom_name(), listener.as_ref().unchecked_ref()) {
                warn!("failed to listen for {}: {err:?}", kind.dom_name());
                continue;
            }
            self.listeners.push(listener);
        }
    }

    fn handle(&mut self, surface: SurfaceKind, kind: EventKind, event: &MouseEvent) -> Result<(), MapperError> {
        let pt = dom::event_offset(event);
        let actions = match kind {
            EventKind::Click => self.core.on_click(surface, pt),
            EventKind::DoubleClick => self.core.on_double_click(surface, pt),
            EventKind::PointerDown => {
                self.capture_pointer(surface, event);
                self.core.on_pointer_down(surface, pt)
            }
            EventKind::PointerMove => self.core.on_pointer_move(surface, pt),
            EventKind::PointerUp => {
                self.core.set_zoom_wrapper_width(dom::element_size(&self.regions.zoom_image).width);
                let mut actions = self.core.resize_zoom_surface(dom::element_size(&self.regions.zoom_draw));
                actions.extend(self.core.on_pointer_up(surface, pt));
                actions
            }
            EventKind::PointerCancel | EventKind::LostPointerCapture => self.core.on_pointer_cancel(),
        };
        self.apply(actions)
    }

    /// Keep receiving pointer events while a drag leaves the canvas.
    fn capture_pointer(&self, surface: SurfaceKind, event: &MouseEvent) {
        let (Some(target), Some(pointer)) = (self.surface(surface), event.dyn_ref::<PointerEvent>()) else {
            return;
        };
        if let Err(err) = target.canvas.set_pointer_capture(pointer.pointer_id()) {
            debug!("pointer capture unavailable: {err:?}");
        }
    }

    fn apply(&mut self, actions: Vec<Action>) -> Result<(), MapperError> {
        let mut render_main = false;
        let mut render_zoom = false;
        for action in actions {
            match action {
                Action::PointAdded(_) | Action::PointMoved(_) => self.changed = true,
                Action::MarkerDoubleClicked { .. } => {}
                Action::ZoomViewportChanged(viewport) => self.show_zoom(&viewport)?,
                Action::SetCursor(cursor) => dom::set_cursor(&self.regions.draw, cursor)?,
                Action::RenderNeeded(SurfaceKind::Main) => render_main = true,
                Action::RenderNeeded(SurfaceKind::Zoom) => render_zoom = true,
            }
        }
        if render_main {
            self.render(SurfaceKind::Main)?;
        }
        if render_zoom {
            self.render(SurfaceKind::Zoom)?;
        }
        Ok(())
    }

    /// Swap in the resized zoom image, then fit the zoom canvas to the zoom stage.
    ///
    /// The zoom region is measured after the image goes in; it may have no size
    /// before. The canvas always takes the core's zoom stage bounds.
    fn show_zoom(&mut self, viewport: &ZoomViewport) -> Result<(), MapperError> {
        dom::replace_zoom_image(&self.regions.zoom_image, &self.url, viewport)?;
        self.core.resize_zoom_surface(dom::element_size(&self.regions.zoom_draw));
        let Some(size) = self.core.stage(SurfaceKind::Zoom).map(crate::stage::Stage::bounds) else {
            return Ok(());
        };
        if let Some(surface) = self.zoom.as_mut() {
            if surface.size != size {
                dom::resize_canvas(&surface.canvas, size, self.dpr)?;
                surface.size = size;
            }
            return Ok(());
        }
        let (canvas, ctx) = dom::create_canvas(&self.regions.zoom_draw, size, self.dpr)?;
        self.listen(&canvas, SurfaceKind::Zoom);
        self.zoom = Some(Surface { canvas, ctx, size });
        Ok(())
    }

    fn surface(&self, surface: SurfaceKind) -> Option<&Surface> {
        match surface {
            SurfaceKind::Main => self.main.as_ref(),
            SurfaceKind::Zoom => self.zoom.as_ref(),
        }
    }

    fn render(&self, surface: SurfaceKind) -> Result<(), MapperError> {
        if let (Some(target), Some(stage)) = (self.surface(surface), self.core.stage(surface)) {
            render::draw(&target.ctx, stage, self.dpr)?;
        }
        Ok(())
    }

    fn points_js(&self) -> Result<JsValue, MapperError> {
        let json = serde_json::to_string(self.core.points())?;
        Ok(js_sys::JSON::parse(&json)?)
    }

    /// Change callback and its payload, if points changed since the last call.
    fn take_change(&mut self) -> Result<Option<(js_sys::Function, JsValue)>, MapperError> {
        if !std::mem::take(&mut self.changed) {
            return Ok(None);
        }
        let Some(callback) = self.on_change.clone() else {
            return Ok(None);
        };
        Ok(Some((callback, self.points_js()?)))
    }
}

fn dispatch(this: &Weak<RefCell<Inner>>, surface: SurfaceKind, kind: EventKind, event: &MouseEvent) {
    let Some(shared) = this.upgrade() else {
        return;
    };
    let change = {
        let Ok(mut inner) = shared.try_borrow_mut() else {
            warn!("{} ignored: mapper busy", kind.dom_name());
            return;
        };
        if let Err(err) = inner.handle(surface, kind, event) {
            warn!("{} handler failed: {err}", kind.dom_name());
        }
        inner.take_change()
    };

    // The callback runs with the mapper unborrowed so it may call back into it.
    match change {
        Ok(Some((callback, points))) => {
            if let Err(err) = callback.call1(&JsValue::NULL, &points) {
                warn!("points-changed callback threw: {err:?}");
            }
        }
        Ok(None) => {}
        Err(err) => warn!("points-changed payload failed: {err}"),
    }
}

/// Install the console logger and panic hook when the module is instantiated.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("logger already installed: {err}").into());
    }
}
