//! Host component and renderer-binding lifecycle.
//!
//! `Uninitialized -> Running -> Disposed`. The host owns the simulation, the
//! backend, the scheduler and its end of the warp trigger. Environments (web,
//! native) only forward frames, pointer moves and resizes into it.

use crate::config::NetworkConfig;
use crate::error::{HostError, RenderError};
use crate::scene::SceneFrame;
use crate::scheduler::{FrameScheduler, FrameToken};
use crate::simulation::Simulation;
use crate::warp::WarpTrigger;
use glam::Vec2;

/// Visible area in logical (CSS) pixels plus the backing-store ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: u32, height: u32, pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Backing-store size in device pixels, never zero.
    pub fn physical_size(&self) -> (u32, u32) {
        let r = self.pixel_ratio.max(0.0);
        (
            ((self.width as f32 * r).round() as u32).max(1),
            ((self.height as f32 * r).round() as u32).max(1),
        )
    }

    /// Pointer position (logical px, origin top-left) to NDC (+Y up).
    pub fn pointer_ndc(&self, x: f32, y: f32) -> Vec2 {
        if self.is_empty() {
            return Vec2::ZERO;
        }
        Vec2::new(
            (x / self.width as f32) * 2.0 - 1.0,
            -(y / self.height as f32) * 2.0 + 1.0,
        )
    }
}

/// A live drawing surface. Dropping it must release every GPU resource it
/// holds.
pub trait RenderBackend {
    fn resize(&mut self, viewport: Viewport);
    fn draw(&mut self, scene: &SceneFrame<'_>) -> Result<(), RenderError>;
}

/// Creates the surface once the container has a non-zero size.
pub trait BackendFactory {
    type Backend: RenderBackend;
    fn create(&mut self, viewport: Viewport) -> Result<Self::Backend, RenderError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Running,
    Disposed,
}

enum Lifecycle<B> {
    Uninitialized,
    Running(B),
    Disposed,
}

pub struct ParticleHost<F: BackendFactory, S: FrameScheduler> {
    sim: Simulation,
    factory: F,
    scheduler: S,
    trigger: WarpTrigger,
    binding: u64,
    lifecycle: Lifecycle<F::Backend>,
    viewport: Viewport,
    pending: Option<FrameToken>,
    init_retries: u32,
}

impl<F: BackendFactory, S: FrameScheduler> ParticleHost<F, S> {
    /// Build the simulation, bind `trigger`, and create the backend right
    /// away if the viewport already has a size. Otherwise creation is retried
    /// on each following frame.
    pub fn mount(
        cfg: NetworkConfig,
        seed: u64,
        factory: F,
        scheduler: S,
        trigger: WarpTrigger,
        viewport: Viewport,
    ) -> Result<Self, HostError> {
        let sim = Simulation::new(cfg, seed)?;
        let binding = trigger.bind();
        let mut host = Self {
            sim,
            factory,
            scheduler,
            trigger,
            binding,
            lifecycle: Lifecycle::Uninitialized,
            viewport,
            pending: None,
            init_retries: 0,
        };
        if let Err(e) = host.try_initialize() {
            host.unmount();
            return Err(e.into());
        }
        host.schedule();
        log::info!(
            "[host] mounted {}x{} field={} warp={} phase={:?}",
            viewport.width,
            viewport.height,
            host.sim.field().len(),
            host.sim.warp_particles().len(),
            host.phase()
        );
        Ok(host)
    }

    /// One scheduled frame: state advance, then draw, then re-request.
    pub fn frame(&mut self, viewport: Viewport) {
        self.pending = None;
        match self.phase() {
            Phase::Disposed => return,
            Phase::Uninitialized => {
                self.viewport = viewport;
                if let Err(e) = self.try_initialize() {
                    log::error!("[host] renderer init failed, effect disabled: {}", e);
                    self.unmount();
                    return;
                }
                if self.phase() == Phase::Uninitialized {
                    self.schedule();
                    return;
                }
            }
            Phase::Running => {
                if viewport != self.viewport {
                    self.resize(viewport);
                }
            }
        }

        if self.trigger.is_fired_for(self.binding) {
            self.sim.request_warp();
        }
        self.sim.tick();
        if let Lifecycle::Running(backend) = &mut self.lifecycle {
            if let Err(e) = backend.draw(&self.sim.scene()) {
                log::error!("[host] draw error: {}", e);
            }
        }
        self.schedule();
    }

    pub fn resize(&mut self, viewport: Viewport) {
        if viewport.is_empty() {
            return;
        }
        self.viewport = viewport;
        if let Lifecycle::Running(backend) = &mut self.lifecycle {
            log::debug!("[host] resize {}x{}", viewport.width, viewport.height);
            backend.resize(viewport);
        }
    }

    /// Pointer position in logical pixels relative to the viewport.
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        let ndc = self.viewport.pointer_ndc(x, y);
        self.sim.set_pointer(ndc);
    }

    /// Fire this host's own trigger. Fails once the host is disposed or
    /// another host has taken the trigger over.
    pub fn request_warp(&mut self) -> Result<(), HostError> {
        if self.phase() == Phase::Disposed {
            return Err(HostError::AlreadyDisposed);
        }
        if !self.trigger.is_bound_to(self.binding) {
            return Err(HostError::Unbound);
        }
        self.trigger.fire();
        Ok(())
    }

    /// Cancel the pending frame, release the trigger binding and drop the
    /// backend. Safe to call more than once.
    pub fn unmount(&mut self) {
        if let Lifecycle::Disposed = self.lifecycle {
            return;
        }
        if let Some(token) = self.pending.take() {
            self.scheduler.cancel(token);
        }
        self.trigger.unbind(self.binding);
        // dropping the backend releases its surface and buffers
        self.lifecycle = Lifecycle::Disposed;
        log::info!("[host] unmounted after {} frames", self.sim.frame_count());
    }

    pub fn phase(&self) -> Phase {
        match self.lifecycle {
            Lifecycle::Uninitialized => Phase::Uninitialized,
            Lifecycle::Running(_) => Phase::Running,
            Lifecycle::Disposed => Phase::Disposed,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase() == Phase::Running
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn trigger(&self) -> &WarpTrigger {
        &self.trigger
    }

    pub fn init_retries(&self) -> u32 {
        self.init_retries
    }

    fn try_initialize(&mut self) -> Result<(), RenderError> {
        if !matches!(self.lifecycle, Lifecycle::Uninitialized) {
            return Ok(());
        }
        if self.viewport.is_empty() {
            self.init_retries += 1;
            log::debug!(
                "[host] viewport {}x{} not laid out yet; retry {}",
                self.viewport.width,
                self.viewport.height,
                self.init_retries
            );
            return Ok(());
        }
        let backend = self.factory.create(self.viewport)?;
        self.lifecycle = Lifecycle::Running(backend);
        Ok(())
    }

    fn schedule(&mut self) {
        if let Some(old) = self.pending.take() {
            self.scheduler.cancel(old);
        }
        self.pending = Some(self.scheduler.request_frame());
    }
}

impl<F: BackendFactory, S: FrameScheduler> Drop for ParticleHost<F, S> {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_ndc_maps_corners() {
        let vp = Viewport::new(800, 600, 1.0);
        assert_eq!(vp.pointer_ndc(0.0, 0.0), Vec2::new(-1.0, 1.0));
        assert_eq!(vp.pointer_ndc(800.0, 600.0), Vec2::new(1.0, -1.0));
        assert_eq!(vp.pointer_ndc(400.0, 300.0), Vec2::ZERO);
    }

    #[test]
    fn physical_size_applies_ratio_and_never_hits_zero() {
        assert_eq!(Viewport::new(100, 50, 2.0).physical_size(), (200, 100));
        assert_eq!(Viewport::new(0, 0, 2.0).physical_size(), (1, 1));
    }
}
