use crate::input::{clear_children, viewport_from_css};
use std::rc::Rc;
use warp_core::{BackendFactory, RenderBackend, RenderError, SceneFrame, Viewport};
use warp_render::{GpuContext, GpuRenderer};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

#[inline]
pub fn container_viewport(window: &web::Window, container: &web::HtmlElement) -> Viewport {
    viewport_from_css(
        container.client_width() as f64,
        container.client_height() as f64,
        window.device_pixel_ratio(),
    )
}

fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement, viewport: Viewport) {
    let (w, h) = viewport.physical_size();
    canvas.set_width(w);
    canvas.set_height(h);
}

fn js_err(what: &str, e: JsValue) -> RenderError {
    RenderError::ContextCreation(format!("{}: {:?}", what, e))
}

/// Creates a canvas inside the container and binds a renderer to it.
pub struct CanvasFactory {
    ctx: Rc<GpuContext>,
    document: web::Document,
    container: web::HtmlElement,
}

impl CanvasFactory {
    pub fn new(ctx: Rc<GpuContext>, document: web::Document, container: web::HtmlElement) -> Self {
        Self {
            ctx,
            document,
            container,
        }
    }
}

impl BackendFactory for CanvasFactory {
    type Backend = CanvasBackend;

    fn create(&mut self, viewport: Viewport) -> Result<CanvasBackend, RenderError> {
        let canvas = self
            .document
            .create_element("canvas")
            .map_err(|e| js_err("create canvas", e))?
            .dyn_into::<web::HtmlCanvasElement>()
            .map_err(|_| RenderError::ContextCreation("element is not a canvas".into()))?;
        let style = canvas.style();
        for (k, v) in [
            ("display", "block"),
            ("width", "100%"),
            ("height", "100%"),
            ("pointer-events", "none"),
        ] {
            style.set_property(k, v).map_err(|e| js_err("canvas style", e))?;
        }
        sync_canvas_backing_size(&canvas, viewport);
        let stale = clear_children(
            || self.container.first_child(),
            |child| self.container.remove_child(&child).map(drop),
        )
        .map_err(|e| js_err("clear container", e))?;
        if stale > 0 {
            log::debug!("[web] removed {} existing container children", stale);
        }
        self.container
            .append_child(&canvas)
            .map_err(|e| js_err("attach canvas", e))?;

        match GpuRenderer::new(
            self.ctx.clone(),
            wgpu::SurfaceTarget::Canvas(canvas.clone()),
            viewport,
        ) {
            Ok(renderer) => {
                log::info!("[web] canvas attached {}x{}", canvas.width(), canvas.height());
                Ok(CanvasBackend { renderer, canvas })
            }
            Err(e) => {
                canvas.remove();
                Err(e)
            }
        }
    }
}

/// Renderer plus the canvas element it draws into. Dropping it detaches the
/// canvas.
pub struct CanvasBackend {
    renderer: GpuRenderer,
    canvas: web::HtmlCanvasElement,
}

impl RenderBackend for CanvasBackend {
    fn resize(&mut self, viewport: Viewport) {
        sync_canvas_backing_size(&self.canvas, viewport);
        self.renderer.resize(viewport);
    }

    fn draw(&mut self, scene: &SceneFrame<'_>) -> Result<(), RenderError> {
        self.renderer.draw(scene)
    }
}

impl Drop for CanvasBackend {
    fn drop(&mut self) {
        self.canvas.remove();
        log::debug!("[web] canvas detached");
    }
}

/// DOM listener that unregisters itself when dropped.
pub struct EventListener {
    target: web::EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(web::Event)>,
}

impl EventListener {
    pub fn new(
        target: &web::EventTarget,
        kind: &'static str,
        handler: impl FnMut(web::Event) + 'static,
    ) -> Result<Self, JsValue> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            kind,
            closure,
        })
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
    }
}
