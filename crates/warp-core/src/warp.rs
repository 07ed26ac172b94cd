use crate::config::WarpConfig;
use std::cell::Cell;
use std::rc::Rc;

#[derive(Default)]
struct Latch {
    fired: Cell<bool>,
    // 0 = unbound; otherwise the generation handed out by the last bind
    bound: Cell<u64>,
    next_generation: Cell<u64>,
}

/// Capability to start the warp transition from anywhere in the app.
///
/// Created by the caller, handed to the host at mount and kept by whoever
/// owns the "go" button. Clones share one latch. Everything runs on one
/// thread, so a plain `Cell` is enough: a fire is seen by the very next frame.
#[derive(Clone, Default)]
pub struct WarpTrigger {
    latch: Rc<Latch>,
}

impl WarpTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the transition. Returns `false` (and does nothing) when no
    /// mounted host is bound. Firing again while ramping has no further
    /// effect.
    pub fn fire(&self) -> bool {
        if self.latch.bound.get() == 0 {
            log::debug!("[warp] trigger fired with no mounted network; ignored");
            return false;
        }
        if !self.latch.fired.replace(true) {
            log::info!("[warp] triggered");
        }
        true
    }

    pub fn is_bound(&self) -> bool {
        self.latch.bound.get() != 0
    }

    pub fn is_fired(&self) -> bool {
        self.latch.fired.get()
    }

    /// Whether `generation` is still the current binding.
    pub fn is_bound_to(&self, generation: u64) -> bool {
        generation != 0 && self.latch.bound.get() == generation
    }

    /// Fired while `generation` holds the binding. A host that was rebound
    /// away never sees later fires.
    pub fn is_fired_for(&self, generation: u64) -> bool {
        self.is_bound_to(generation) && self.latch.fired.get()
    }

    /// Register a host. A fresh mount starts with the latch cleared.
    pub(crate) fn bind(&self) -> u64 {
        if self.is_bound() {
            log::warn!("[warp] trigger rebound; previous host loses it");
        }
        let generation = self.latch.next_generation.get() + 1;
        self.latch.next_generation.set(generation);
        self.latch.bound.set(generation);
        self.latch.fired.set(false);
        generation
    }

    /// Unregister, unless another host has bound since.
    pub(crate) fn unbind(&self, generation: u64) {
        if self.latch.bound.get() == generation {
            self.latch.bound.set(0);
            self.latch.fired.set(false);
        }
    }
}

impl std::fmt::Debug for WarpTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WarpTrigger")
            .field("bound", &self.is_bound())
            .field("fired", &self.is_fired())
            .finish()
    }
}

/// Warp mode as the loop sees it. Once ramping it never goes back to
/// inactive; only a remount does that.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum WarpState {
    #[default]
    Inactive,
    Ramping { speed: f32, intensity: f32 },
}

impl WarpState {
    /// Enter ramping. No-op if already ramping, so speed and intensity keep
    /// their progress.
    pub fn engage(&mut self, cfg: &WarpConfig) {
        if let WarpState::Inactive = self {
            *self = WarpState::Ramping {
                speed: cfg.speed_start,
                intensity: 0.0,
            };
        }
    }

    /// One frame of ramp. Returns the speed to integrate with this frame.
    pub fn advance(&mut self, cfg: &WarpConfig) -> Option<f32> {
        match self {
            WarpState::Inactive => None,
            WarpState::Ramping { speed, intensity } => {
                *speed = (*speed + cfg.speed_step).min(cfg.speed_max);
                *intensity = (*intensity + cfg.intensity_step).min(1.0);
                Some(*speed)
            }
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self, WarpState::Ramping { .. })
    }

    #[inline]
    pub fn intensity(&self) -> f32 {
        match self {
            WarpState::Inactive => 0.0,
            WarpState::Ramping { intensity, .. } => *intensity,
        }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        match self {
            WarpState::Inactive => 0.0,
            WarpState::Ramping { speed, .. } => *speed,
        }
    }
}
