use warp_core::{FrameScheduler, FrameToken};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// `requestAnimationFrame` / `cancelAnimationFrame`. Owns the callback, so
/// the callback lives exactly as long as the host that owns this scheduler.
pub struct RafScheduler {
    window: web::Window,
    callback: Closure<dyn FnMut()>,
}

impl RafScheduler {
    pub fn new(window: web::Window, callback: Closure<dyn FnMut()>) -> Self {
        Self { window, callback }
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> FrameToken {
        match self
            .window
            .request_animation_frame(self.callback.as_ref().unchecked_ref())
        {
            Ok(id) => FrameToken(id as i64),
            Err(e) => {
                log::error!("[web] requestAnimationFrame failed: {:?}", e);
                FrameToken(-1)
            }
        }
    }

    fn cancel(&mut self, token: FrameToken) {
        if token.0 < 0 {
            return;
        }
        if let Err(e) = self.window.cancel_animation_frame(token.0 as i32) {
            log::warn!("[web] cancelAnimationFrame failed: {:?}", e);
        }
    }
}
