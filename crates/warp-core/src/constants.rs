// Default tuning for the particle network and warp transition.
//
// Distances are world units (camera sits at z = CAMERA_Z looking down -Z).
// Rates are per frame: the loop advances by a fixed nominal step, not by
// wall-clock delta.

// Field population
pub const FIELD_COUNT: usize = 120;
pub const FIELD_SPAWN_HALF_EXTENT: [f32; 3] = [100.0, 75.0, 40.0];
pub const FIELD_CENTER_Z: f32 = -30.0;
pub const FIELD_BOUNCE_HALF_EXTENT: [f32; 3] = [110.0, 85.0, 50.0];
pub const FIELD_SPEED_XY: f32 = 0.015; // velocity drawn from ±this on x and y
pub const FIELD_SPEED_Z: f32 = 0.01;
pub const FIELD_SIZE_RANGE: (f32, f32) = (2.0, 7.0);

// Warp population
pub const WARP_COUNT: usize = 200;
pub const WARP_RING_RADIUS: (f32, f32) = (20.0, 80.0);
pub const WARP_INITIAL_DEPTH: (f32, f32) = (-400.0, -100.0);
pub const WARP_SIZE_RANGE: (f32, f32) = (0.5, 2.5);

// Motion
pub const TIME_STEP: f32 = 0.003;
pub const DRIFT_AMPLITUDE: f32 = 0.015;
pub const DRIFT_PHASE_PER_INDEX: f32 = 0.1;

// Connections
pub const CONNECTION_DISTANCE: f32 = 25.0;
pub const CONNECTION_CADENCE: u64 = 4; // recompute every k-th frame
pub const LINE_OPACITY: f32 = 0.2;
pub const LINE_COLOR: [f32; 3] = [0.024, 0.714, 0.831]; // #06b6d4

// Warp ramp
pub const WARP_SPEED_START: f32 = 0.5;
pub const WARP_SPEED_STEP: f32 = 0.15;
pub const WARP_SPEED_MAX: f32 = 12.0;
pub const WARP_INTENSITY_STEP: f32 = 0.03;
pub const FIELD_RUSH_FACTOR: f32 = 2.0;
pub const WARP_RUSH_FACTOR: f32 = 4.0;
pub const NEAR_RESPAWN_Z: f32 = 100.0; // particles past this are recycled
pub const FIELD_RESPAWN_DEPTH: (f32, f32) = (-300.0, -200.0);
pub const WARP_RESPAWN_DEPTH: (f32, f32) = (-450.0, -300.0);

// Idle rotation
pub const POINTER_TILT: f32 = 0.05;
pub const WOBBLE_AMPLITUDE: f32 = 0.02;
pub const SPIN_RATE: f32 = 0.01;

// Camera
pub const CAMERA_Z: f32 = 100.0;
pub const CAMERA_FOV_Y_DEG: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 2000.0;

// Point sprite scaling (pixels at unit depth) per population
pub const FIELD_POINT_SCALE: f32 = 300.0;
pub const WARP_POINT_SCALE: f32 = 200.0;
pub const FIELD_WARP_SIZE_GAIN: f32 = 1.0;
pub const WARP_WARP_SIZE_GAIN: f32 = 3.0;
/// Upper bound on a sprite's on-screen width in device pixels.
pub const MAX_POINT_SIZE_PX: f32 = 256.0;

// Surface
pub const MAX_PIXEL_RATIO: f64 = 2.0;

// Palette: cyan, purple, emerald, light cyan (sRGB 0..1)
pub const PALETTE: [[f32; 3]; 4] = [
    [0.024, 0.714, 0.831],
    [0.545, 0.361, 0.965],
    [0.063, 0.725, 0.506],
    [0.133, 0.827, 0.933],
];
