use crate::config::NetworkConfig;
use crate::connections::ConnectionSet;
use crate::error::ConfigError;
use crate::field::{field_respawn_position, ring_position, ParticleSet, Population};
use crate::scene::{PointInstance, SceneFrame};
use crate::warp::WarpState;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// The animation loop: owns both populations and advances them one fixed
/// step per [`Simulation::tick`].
pub struct Simulation {
    cfg: NetworkConfig,
    rng: StdRng,
    field: ParticleSet,
    warp_particles: ParticleSet,
    connections: ConnectionSet,
    lines_revision: u64,
    warp: WarpState,
    time: f32,
    frame: u64,
    pointer: Vec2,
    rotation: Vec2,
    field_instances: Vec<PointInstance>,
    warp_instances: Vec<PointInstance>,
}

impl Simulation {
    pub fn new(cfg: NetworkConfig, seed: u64) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let mut rng = StdRng::seed_from_u64(seed);
        let field = ParticleSet::spawn_field(&cfg, &mut rng);
        let warp_particles = ParticleSet::spawn_warp(&cfg, &mut rng);
        Ok(Self::assemble(cfg, rng, field, warp_particles))
    }

    /// Start from explicit populations instead of random spawn.
    pub fn from_parts(
        cfg: NetworkConfig,
        field: ParticleSet,
        warp_particles: ParticleSet,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        cfg.validate()?;
        debug_assert_eq!(field.population, Population::Field);
        debug_assert_eq!(warp_particles.population, Population::Warp);
        Ok(Self::assemble(
            cfg,
            StdRng::seed_from_u64(seed),
            field,
            warp_particles,
        ))
    }

    fn assemble(
        cfg: NetworkConfig,
        rng: StdRng,
        field: ParticleSet,
        warp_particles: ParticleSet,
    ) -> Self {
        let mut sim = Self {
            cfg,
            rng,
            field,
            warp_particles,
            connections: ConnectionSet::default(),
            lines_revision: 0,
            warp: WarpState::Inactive,
            time: 0.0,
            frame: 0,
            pointer: Vec2::ZERO,
            rotation: Vec2::ZERO,
            field_instances: Vec::new(),
            warp_instances: Vec::new(),
        };
        sim.refresh_instances();
        sim
    }

    /// Pointer position in normalized device coordinates (+Y up).
    pub fn set_pointer(&mut self, ndc: Vec2) {
        self.pointer = ndc.clamp(Vec2::NEG_ONE, Vec2::ONE);
    }

    /// Enter warp mode; repeated calls keep the current ramp.
    pub fn request_warp(&mut self) {
        if !self.warp.is_active() {
            log::info!(
                "[sim] warp engaged at frame {} ({} connections live)",
                self.frame,
                self.connections.len()
            );
        }
        self.warp.engage(&self.cfg.warp);
    }

    pub fn tick(&mut self) {
        self.time += self.cfg.motion.time_step;
        self.frame += 1;

        if let Some(speed) = self.warp.advance(&self.cfg.warp) {
            self.rush(speed);
        } else {
            self.float();
            if self.frame % self.cfg.connections.cadence == 0 {
                self.connections =
                    ConnectionSet::rebuild(&self.field.positions, self.cfg.connections.distance);
                self.lines_revision += 1;
            }
            let m = &self.cfg.motion;
            self.rotation = Vec2::new(
                self.pointer.y * m.pointer_tilt + self.time.sin() * m.wobble_amplitude,
                self.pointer.x * m.pointer_tilt + self.time * m.spin_rate,
            );
        }

        self.refresh_instances();
    }

    // Idle: velocity + per-particle vertical drift, reflected off the walls.
    fn float(&mut self) {
        let m = &self.cfg.motion;
        let bounds = self.cfg.field.bounce;
        let positions = &mut self.field.positions;
        let velocities = &mut self.field.velocities;
        for (i, (p, v)) in positions.iter_mut().zip(velocities.iter_mut()).enumerate() {
            *p += *v;
            p.y += (self.time + i as f32 * m.drift_phase_per_index).sin() * m.drift_amplitude;

            for axis in 0..3 {
                let rel = p[axis] - bounds.center[axis];
                let limit = bounds.half_extent[axis];
                if rel.abs() > limit {
                    // point back inside and pin to the wall, so drift can't
                    // walk a particle out while its velocity keeps flipping
                    let side = rel.signum();
                    v[axis] = -side * v[axis].abs();
                    p[axis] = bounds.center[axis] + side * limit;
                }
            }
        }
    }

    // Warp: everything streams toward the viewer and is recycled past it.
    fn rush(&mut self, speed: f32) {
        let w = &self.cfg.warp;
        let field_dz = speed * w.field_rush;
        for i in 0..self.field.len() {
            self.field.positions[i].z += field_dz;
            if self.field.positions[i].z > w.near_z {
                self.field.positions[i] = field_respawn_position(&self.cfg, &mut self.rng);
            }
        }
        let warp_dz = speed * w.warp_rush;
        for p in self.warp_particles.positions.iter_mut() {
            p.z += warp_dz;
            if p.z > w.near_z {
                *p = ring_position(w, w.warp_respawn_depth, &mut self.rng);
            }
        }
    }

    fn refresh_instances(&mut self) {
        fill_instances(&mut self.field_instances, &self.field);
        fill_instances(&mut self.warp_instances, &self.warp_particles);
    }

    pub fn scene(&self) -> SceneFrame<'_> {
        let intensity = self.warp.intensity();
        SceneFrame {
            field: &self.field_instances,
            warp: &self.warp_instances,
            lines: self.connections.vertices(),
            lines_revision: self.lines_revision,
            rotation: self.rotation,
            warp_intensity: intensity,
            line_opacity: self.cfg.connections.opacity * (1.0 - intensity),
            line_color: self.cfg.connections.color,
        }
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.cfg
    }

    pub fn field(&self) -> &ParticleSet {
        &self.field
    }

    pub fn warp_particles(&self) -> &ParticleSet {
        &self.warp_particles
    }

    pub fn connections(&self) -> &ConnectionSet {
        &self.connections
    }

    pub fn warp_state(&self) -> WarpState {
        self.warp
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn rotation(&self) -> Vec2 {
        self.rotation
    }
}

fn fill_instances(out: &mut Vec<PointInstance>, set: &ParticleSet) {
    out.clear();
    out.extend(
        set.positions
            .iter()
            .zip(&set.sizes)
            .zip(&set.colors)
            .map(|((p, s), c)| PointInstance::new(*p, *s, *c)),
    );
}
