#![cfg(target_arch = "wasm32")]
mod dom;
pub mod input;
mod raf;

use dom::{container_viewport, CanvasFactory, EventListener};
use raf::RafScheduler;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use warp_core::{NetworkConfig, ParticleHost, WarpTrigger};
use warp_render::{FrameStats, GpuContext};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

type WebHost = ParticleHost<CanvasFactory, RafScheduler>;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("warp-web loaded");
    Ok(())
}

/// JS-side handle to one network's warp trigger. Safe to keep after the
/// network is unmounted: firing then just returns `false`.
#[wasm_bindgen]
pub struct WarpHandle {
    trigger: WarpTrigger,
}

#[wasm_bindgen]
impl WarpHandle {
    pub fn fire(&self) -> bool {
        self.trigger.fire()
    }
}

/// A mounted particle network.
#[wasm_bindgen]
pub struct ParticleNetwork {
    host: Option<Rc<RefCell<WebHost>>>,
    trigger: WarpTrigger,
    listeners: Vec<EventListener>,
}

#[wasm_bindgen]
impl ParticleNetwork {
    #[wasm_bindgen(js_name = warpHandle)]
    pub fn warp_handle(&self) -> WarpHandle {
        WarpHandle {
            trigger: self.trigger.clone(),
        }
    }

    #[wasm_bindgen(js_name = triggerWarp)]
    pub fn trigger_warp(&self) -> bool {
        match &self.host {
            Some(host) => match host.borrow_mut().request_warp() {
                Ok(()) => true,
                Err(e) => {
                    log::debug!("[web] warp ignored: {}", e);
                    false
                }
            },
            None => false,
        }
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.host
            .as_ref()
            .map(|h| h.borrow().is_running())
            .unwrap_or(false)
    }

    /// Stop the loop, detach listeners and the canvas, release GPU resources.
    pub fn unmount(&mut self) {
        self.listeners.clear();
        if let Some(host) = self.host.take() {
            host.borrow_mut().unmount();
        }
    }
}

impl Drop for ParticleNetwork {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Mount a network into the element with id `container_id`. The canvas is
/// created as soon as the container has a size.
#[wasm_bindgen]
pub async fn mount(container_id: String, seed: Option<f64>) -> Result<ParticleNetwork, JsValue> {
    init(&container_id, seed).await.map_err(|e| {
        log::error!("mount error: {:?}", e);
        JsValue::from(js_sys::Error::new(&format!("{:?}", e)))
    })
}

async fn init(container_id: &str, seed: Option<f64>) -> anyhow::Result<ParticleNetwork> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;
    let container = document
        .get_element_by_id(container_id)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", container_id))?
        .dyn_into::<web::HtmlElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    let ctx = Rc::new(GpuContext::new().await?);
    let seed = input::seed_or(seed, (js_sys::Math::random() * 9_007_199_254_740_991.0) as u64);

    // The rAF callback only holds a weak link; the host owns the callback
    // through its scheduler.
    let slot: Rc<RefCell<Weak<RefCell<WebHost>>>> = Rc::new(RefCell::new(Weak::new()));
    let callback = {
        let slot = slot.clone();
        let window = window.clone();
        let container = container.clone();
        let mut stats = FrameStats::default();
        Closure::wrap(Box::new(move || {
            let Some(host) = slot.borrow().upgrade() else {
                return;
            };
            let viewport = container_viewport(&window, &container);
            host.borrow_mut().frame(viewport);
            if let Some(fps) = stats.record() {
                log::debug!("[web] {:.1} fps", fps);
            }
        }) as Box<dyn FnMut()>)
    };

    let trigger = WarpTrigger::new();
    let host = ParticleHost::mount(
        NetworkConfig::default(),
        seed,
        CanvasFactory::new(ctx, document, container.clone()),
        RafScheduler::new(window.clone(), callback),
        trigger.clone(),
        container_viewport(&window, &container),
    )?;
    let host = Rc::new(RefCell::new(host));
    *slot.borrow_mut() = Rc::downgrade(&host);

    let pointer = {
        let host = Rc::downgrade(&host);
        let container = container.clone();
        EventListener::new(&window, "pointermove", move |ev: web::Event| {
            let (Some(host), Some(ev)) = (host.upgrade(), ev.dyn_ref::<web::MouseEvent>()) else {
                return;
            };
            let rect = container.get_bounding_client_rect();
            let (x, y) = input::local_pointer(
                ev.client_x() as f64,
                ev.client_y() as f64,
                rect.left(),
                rect.top(),
            );
            if let Ok(mut host) = host.try_borrow_mut() {
                host.pointer_moved(x, y);
            }
        })
        .map_err(|e| anyhow::anyhow!(format!("pointer listener: {:?}", e)))?
    };
    let resize = {
        let host = Rc::downgrade(&host);
        let window_for_size = window.clone();
        let container = container.clone();
        EventListener::new(&window, "resize", move |_ev: web::Event| {
            let Some(host) = host.upgrade() else {
                return;
            };
            let viewport = container_viewport(&window_for_size, &container);
            if let Ok(mut host) = host.try_borrow_mut() {
                host.resize(viewport);
            }
        })
        .map_err(|e| anyhow::anyhow!(format!("resize listener: {:?}", e)))?
    };

    log::info!("[web] mounted into #{} (seed {})", container_id, seed);
    Ok(ParticleNetwork {
        host: Some(host),
        trigger,
        listeners: vec![pointer, resize],
    })
}
