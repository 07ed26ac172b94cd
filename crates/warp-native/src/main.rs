mod redraw;

use redraw::{RedrawQueue, RedrawScheduler};
use std::rc::Rc;
use std::sync::Arc;
use warp_core::{BackendFactory, NetworkConfig, ParticleHost, RenderError, Viewport, WarpTrigger};
use warp_render::{FrameStats, GpuContext, GpuRenderer};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

/// Binds a renderer to the (single) desktop window.
struct WindowFactory {
    ctx: Rc<GpuContext>,
    window: Arc<Window>,
}

impl BackendFactory for WindowFactory {
    type Backend = GpuRenderer;

    fn create(&mut self, viewport: Viewport) -> Result<GpuRenderer, RenderError> {
        GpuRenderer::new(self.ctx.clone(), self.window.clone(), viewport)
    }
}

type NativeHost = ParticleHost<WindowFactory, RedrawScheduler>;

/// Window size in device pixels; pointer events arrive in the same space.
fn window_viewport(window: &Window) -> Viewport {
    let size = window.inner_size();
    Viewport::new(size.width, size.height, 1.0)
}

#[derive(Default)]
struct App {
    window: Option<Arc<Window>>,
    ctx: Option<Rc<GpuContext>>,
    host: Option<NativeHost>,
    queue: RedrawQueue,
    trigger: WarpTrigger,
    stats: FrameStats,
    mounts: u64,
}

impl App {
    fn mount(&mut self) {
        let (Some(window), Some(ctx)) = (self.window.clone(), self.ctx.clone()) else {
            return;
        };
        // drop the previous instance first so its surface is released
        self.host = None;
        self.queue = RedrawQueue::default();
        self.mounts += 1;
        let seed: u64 = rand::random();
        let viewport = window_viewport(&window);
        match ParticleHost::mount(
            NetworkConfig::default(),
            seed,
            WindowFactory {
                ctx,
                window: window.clone(),
            },
            RedrawScheduler::new(window, self.queue.clone()),
            self.trigger.clone(),
            viewport,
        ) {
            Ok(host) => {
                log::info!("[native] mount #{} (seed {})", self.mounts, seed);
                self.host = Some(host);
            }
            Err(e) => log::error!("[native] mount failed: {}", e),
        }
    }

    fn on_key(&mut self, event_loop: &ActiveEventLoop, event: KeyEvent) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        match event.physical_key {
            PhysicalKey::Code(KeyCode::KeyW | KeyCode::Space) => {
                if let Some(host) = &mut self.host {
                    if let Err(e) = host.request_warp() {
                        log::warn!("[native] warp ignored: {}", e);
                    }
                }
            }
            PhysicalKey::Code(KeyCode::KeyR) => {
                log::info!("[native] remount");
                self.mount();
            }
            PhysicalKey::Code(KeyCode::Escape) => event_loop.exit(),
            _ => {}
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let attrs = Window::default_attributes()
            .with_title("warp-field (native)")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("[native] window creation failed: {}", e);
                event_loop.exit();
                return;
            }
        };
        let ctx = match pollster::block_on(GpuContext::new()) {
            Ok(ctx) => Rc::new(ctx),
            Err(e) => {
                log::error!("[native] {}", e);
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window);
        self.ctx = Some(ctx);
        self.mount();
        log::info!("[native] W/Space: warp, R: remount, Esc: quit");
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(host) = &mut self.host {
                    host.resize(Viewport::new(size.width, size.height, 1.0));
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(host) = &mut self.host {
                    host.pointer_moved(position.x as f32, position.y as f32);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => self.on_key(event_loop, event),
            WindowEvent::RedrawRequested => {
                let (Some(window), Some(host)) = (&self.window, &mut self.host) else {
                    return;
                };
                if self.queue.grant().is_none() {
                    return;
                }
                host.frame(window_viewport(window));
                if let Some(fps) = self.stats.record() {
                    log::debug!("[native] {:.1} fps", fps);
                }
            }
            _ => {}
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);
    let mut app = App::default();
    event_loop.run_app(&mut app)?;
    if let Some(mut host) = app.host.take() {
        host.unmount();
    }
    Ok(())
}
