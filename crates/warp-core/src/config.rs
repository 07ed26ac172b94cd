use crate::constants::*;
use crate::error::ConfigError;
use glam::Vec3;

/// Axis-aligned box described by its center and half extents.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub center: Vec3,
    pub half_extent: Vec3,
}

impl Bounds {
    pub fn new(center: Vec3, half_extent: Vec3) -> Self {
        Self {
            center,
            half_extent,
        }
    }

    /// Box of the given full size (width, height, depth) around `center`.
    pub fn from_size(center: Vec3, size: Vec3) -> Self {
        Self::new(center, size * 0.5)
    }

    pub fn min(&self) -> Vec3 {
        self.center - self.half_extent
    }

    pub fn max(&self) -> Vec3 {
        self.center + self.half_extent
    }

    #[inline]
    pub fn contains(&self, p: Vec3) -> bool {
        let d = (p - self.center).abs();
        d.x <= self.half_extent.x && d.y <= self.half_extent.y && d.z <= self.half_extent.z
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldConfig {
    pub count: usize,
    /// Where particles are placed at mount and when recycled during warp (x/y).
    pub spawn: Bounds,
    /// Walls the idle loop reflects particles off.
    pub bounce: Bounds,
    pub speed_xy: f32,
    pub speed_z: f32,
    pub size_range: (f32, f32),
}

impl Default for FieldConfig {
    fn default() -> Self {
        let center = Vec3::new(0.0, 0.0, FIELD_CENTER_Z);
        Self {
            count: FIELD_COUNT,
            spawn: Bounds::new(center, Vec3::from_array(FIELD_SPAWN_HALF_EXTENT)),
            bounce: Bounds::new(center, Vec3::from_array(FIELD_BOUNCE_HALF_EXTENT)),
            speed_xy: FIELD_SPEED_XY,
            speed_z: FIELD_SPEED_Z,
            size_range: FIELD_SIZE_RANGE,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct WarpConfig {
    pub count: usize,
    pub ring_radius: (f32, f32),
    pub initial_depth: (f32, f32),
    pub size_range: (f32, f32),
    pub speed_start: f32,
    pub speed_step: f32,
    pub speed_max: f32,
    pub intensity_step: f32,
    pub field_rush: f32,
    pub warp_rush: f32,
    pub near_z: f32,
    pub field_respawn_depth: (f32, f32),
    pub warp_respawn_depth: (f32, f32),
}

impl Default for WarpConfig {
    fn default() -> Self {
        Self {
            count: WARP_COUNT,
            ring_radius: WARP_RING_RADIUS,
            initial_depth: WARP_INITIAL_DEPTH,
            size_range: WARP_SIZE_RANGE,
            speed_start: WARP_SPEED_START,
            speed_step: WARP_SPEED_STEP,
            speed_max: WARP_SPEED_MAX,
            intensity_step: WARP_INTENSITY_STEP,
            field_rush: FIELD_RUSH_FACTOR,
            warp_rush: WARP_RUSH_FACTOR,
            near_z: NEAR_RESPAWN_Z,
            field_respawn_depth: FIELD_RESPAWN_DEPTH,
            warp_respawn_depth: WARP_RESPAWN_DEPTH,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConnectionConfig {
    pub distance: f32,
    pub cadence: u64,
    pub opacity: f32,
    pub color: [f32; 3],
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            distance: CONNECTION_DISTANCE,
            cadence: CONNECTION_CADENCE,
            opacity: LINE_OPACITY,
            color: LINE_COLOR,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MotionConfig {
    pub time_step: f32,
    pub drift_amplitude: f32,
    pub drift_phase_per_index: f32,
    pub pointer_tilt: f32,
    pub wobble_amplitude: f32,
    pub spin_rate: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            time_step: TIME_STEP,
            drift_amplitude: DRIFT_AMPLITUDE,
            drift_phase_per_index: DRIFT_PHASE_PER_INDEX,
            pointer_tilt: POINTER_TILT,
            wobble_amplitude: WOBBLE_AMPLITUDE,
            spin_rate: SPIN_RATE,
        }
    }
}

/// Everything the network needs at mount. `Default` reproduces the landing
/// page effect.
#[derive(Clone, Debug, PartialEq)]
pub struct NetworkConfig {
    pub field: FieldConfig,
    pub warp: WarpConfig,
    pub connections: ConnectionConfig,
    pub motion: MotionConfig,
    pub palette: Vec<[f32; 3]>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            field: FieldConfig::default(),
            warp: WarpConfig::default(),
            connections: ConnectionConfig::default(),
            motion: MotionConfig::default(),
            palette: PALETTE.to_vec(),
        }
    }
}

impl NetworkConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.field.count == 0 {
            return Err(ConfigError::EmptyPopulation("field"));
        }
        if self.warp.count == 0 {
            return Err(ConfigError::EmptyPopulation("warp"));
        }
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        for (name, b) in [("spawn", &self.field.spawn), ("bounce", &self.field.bounce)] {
            if b.half_extent.min_element() <= 0.0 {
                return Err(ConfigError::DegenerateBounds(name));
            }
        }
        if self.connections.cadence == 0 {
            return Err(ConfigError::InvalidValue("connections.cadence", 0.0));
        }
        let positive = [
            ("connections.distance", self.connections.distance),
            ("motion.time_step", self.motion.time_step),
            ("warp.speed_max", self.warp.speed_max),
            ("warp.speed_step", self.warp.speed_step),
            ("warp.intensity_step", self.warp.intensity_step),
        ];
        for (name, v) in positive {
            if !(v > 0.0) {
                return Err(ConfigError::InvalidValue(name, v));
            }
        }
        for (name, (lo, hi)) in [
            ("field.size_range", self.field.size_range),
            ("warp.size_range", self.warp.size_range),
            ("warp.ring_radius", self.warp.ring_radius),
            ("warp.initial_depth", self.warp.initial_depth),
            ("warp.field_respawn_depth", self.warp.field_respawn_depth),
            ("warp.warp_respawn_depth", self.warp.warp_respawn_depth),
        ] {
            if !(lo <= hi) {
                return Err(ConfigError::InvertedRange(name));
            }
        }
        Ok(())
    }

    /// Largest per-axis distance a field particle can travel in one idle tick.
    pub fn max_field_step(&self) -> Vec3 {
        Vec3::new(
            self.field.speed_xy,
            self.field.speed_xy + self.motion.drift_amplitude,
            self.field.speed_z,
        )
    }

    /// Number of frames until the warp speed first reads its cap.
    pub fn frames_to_speed_cap(&self) -> u32 {
        let span = (self.warp.speed_max - self.warp.speed_start).max(0.0);
        (span / self.warp.speed_step).ceil() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(NetworkConfig::default().validate().is_ok());
    }

    #[test]
    fn spawn_box_sits_inside_bounce_walls() {
        let f = FieldConfig::default();
        assert!(f.bounce.contains(f.spawn.min()));
        assert!(f.bounce.contains(f.spawn.max()));
    }

    #[test]
    fn rejects_empty_palette_and_zero_cadence() {
        let mut cfg = NetworkConfig::default();
        cfg.palette.clear();
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyPalette));

        let mut cfg = NetworkConfig::default();
        cfg.connections.cadence = 0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidValue("connections.cadence", _))
        ));
    }

    #[test]
    fn rejects_non_positive_speed_step() {
        for step in [0.0, -0.15] {
            let mut cfg = NetworkConfig::default();
            cfg.warp.speed_step = step;
            assert!(matches!(
                cfg.validate(),
                Err(ConfigError::InvalidValue("warp.speed_step", _))
            ));
        }
    }

    #[test]
    fn speed_cap_reached_after_77_frames_with_defaults() {
        assert_eq!(NetworkConfig::default().frames_to_speed_cap(), 77);
    }
}
