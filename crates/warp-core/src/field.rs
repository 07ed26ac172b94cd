//! Vector field state: the two particle populations as parallel arrays.
//!
//! Nothing here enforces bounds. The animation loop in `simulation` owns
//! reflection and recycling.

use crate::config::{Bounds, NetworkConfig, WarpConfig};
use glam::Vec3;
use rand::Rng;
use std::f32::consts::TAU;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Population {
    /// Persistent floating nodes, reflected off the bounce walls.
    Field,
    /// Streaks that only show during warp, recycled at far depth.
    Warp,
}

/// Structure-of-arrays particle storage. Lengths never change after spawn.
#[derive(Clone, Debug)]
pub struct ParticleSet {
    pub population: Population,
    pub positions: Vec<Vec3>,
    pub velocities: Vec<Vec3>,
    pub colors: Vec<[f32; 3]>,
    pub sizes: Vec<f32>,
}

impl ParticleSet {
    pub fn spawn_field<R: Rng + ?Sized>(cfg: &NetworkConfig, rng: &mut R) -> Self {
        let f = &cfg.field;
        let mut set = Self::with_capacity(Population::Field, f.count);
        for _ in 0..f.count {
            set.positions.push(point_in_box(&f.spawn, rng));
            set.velocities.push(Vec3::new(
                symmetric(rng, f.speed_xy),
                symmetric(rng, f.speed_xy),
                symmetric(rng, f.speed_z),
            ));
            set.colors.push(pick_color(&cfg.palette, rng));
            set.sizes.push(uniform_in(rng, f.size_range));
        }
        set
    }

    pub fn spawn_warp<R: Rng + ?Sized>(cfg: &NetworkConfig, rng: &mut R) -> Self {
        let w = &cfg.warp;
        let mut set = Self::with_capacity(Population::Warp, w.count);
        for _ in 0..w.count {
            set.positions.push(ring_position(w, w.initial_depth, rng));
            // warp particles move only along +Z, driven by the shared warp speed
            set.velocities.push(Vec3::ZERO);
            set.colors.push(pick_color(&cfg.palette, rng));
            set.sizes.push(uniform_in(rng, w.size_range));
        }
        set
    }

    /// Build a set at fixed positions with zero velocity. Used for synthetic
    /// layouts.
    pub fn from_positions(population: Population, positions: Vec<Vec3>) -> Self {
        let n = positions.len();
        Self {
            population,
            positions,
            velocities: vec![Vec3::ZERO; n],
            colors: vec![[1.0, 1.0, 1.0]; n],
            sizes: vec![1.0; n],
        }
    }

    fn with_capacity(population: Population, n: usize) -> Self {
        Self {
            population,
            positions: Vec::with_capacity(n),
            velocities: Vec::with_capacity(n),
            colors: Vec::with_capacity(n),
            sizes: Vec::with_capacity(n),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Far respawn point for a field particle that rushed past the viewer.
pub fn field_respawn_position<R: Rng + ?Sized>(cfg: &NetworkConfig, rng: &mut R) -> Vec3 {
    let p = point_in_box(&cfg.field.spawn, rng);
    Vec3::new(p.x, p.y, uniform_in(rng, cfg.warp.field_respawn_depth))
}

/// Random point on a ring of random radius around the view axis, at a depth
/// drawn from `depth`.
pub fn ring_position<R: Rng + ?Sized>(w: &WarpConfig, depth: (f32, f32), rng: &mut R) -> Vec3 {
    let radius = uniform_in(rng, w.ring_radius);
    let theta = rng.gen::<f32>() * TAU;
    Vec3::new(
        theta.cos() * radius,
        theta.sin() * radius,
        uniform_in(rng, depth),
    )
}

#[inline]
fn point_in_box<R: Rng + ?Sized>(b: &Bounds, rng: &mut R) -> Vec3 {
    let (lo, hi) = (b.min(), b.max());
    Vec3::new(
        uniform_in(rng, (lo.x, hi.x)),
        uniform_in(rng, (lo.y, hi.y)),
        uniform_in(rng, (lo.z, hi.z)),
    )
}

#[inline]
fn symmetric<R: Rng + ?Sized>(rng: &mut R, half: f32) -> f32 {
    (rng.gen::<f32>() - 0.5) * 2.0 * half
}

#[inline]
fn uniform_in<R: Rng + ?Sized>(rng: &mut R, (lo, hi): (f32, f32)) -> f32 {
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}

#[inline]
fn pick_color<R: Rng + ?Sized>(palette: &[[f32; 3]], rng: &mut R) -> [f32; 3] {
    if palette.is_empty() {
        return [1.0, 1.0, 1.0];
    }
    palette[rng.gen_range(0..palette.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn field_spawns_inside_spawn_box_with_palette_colors() {
        let cfg = NetworkConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        let set = ParticleSet::spawn_field(&cfg, &mut rng);
        assert_eq!(set.len(), cfg.field.count);
        assert_eq!(set.velocities.len(), set.len());
        for (p, c) in set.positions.iter().zip(&set.colors) {
            assert!(cfg.field.spawn.contains(*p), "{p:?} outside spawn box");
            assert!(cfg.palette.contains(c));
        }
        for s in &set.sizes {
            assert!(*s >= cfg.field.size_range.0 && *s < cfg.field.size_range.1);
        }
    }

    #[test]
    fn warp_spawns_on_ring_at_far_depth() {
        let cfg = NetworkConfig::default();
        let mut rng = StdRng::seed_from_u64(11);
        let set = ParticleSet::spawn_warp(&cfg, &mut rng);
        assert_eq!(set.len(), cfg.warp.count);
        let (r_lo, r_hi) = cfg.warp.ring_radius;
        let (z_lo, z_hi) = cfg.warp.initial_depth;
        for p in &set.positions {
            let r = p.truncate().length();
            assert!(r >= r_lo - 1e-3 && r <= r_hi + 1e-3, "radius {r}");
            assert!(p.z >= z_lo && p.z <= z_hi, "depth {}", p.z);
        }
    }

    #[test]
    fn same_seed_same_field() {
        let cfg = NetworkConfig::default();
        let a = ParticleSet::spawn_field(&cfg, &mut StdRng::seed_from_u64(3));
        let b = ParticleSet::spawn_field(&cfg, &mut StdRng::seed_from_u64(3));
        assert_eq!(a.positions, b.positions);
        assert_eq!(a.sizes, b.sizes);
    }
}
