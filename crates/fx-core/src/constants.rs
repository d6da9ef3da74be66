/// Lifecycle and physics tuning constants.
///
/// Time values are seconds, distances are CSS pixels unless the name says otherwise.
// Device pixel ratio cap applied to every surface
pub const MAX_DEVICE_PIXEL_RATIO: f32 = 2.0;

// Surface acquisition retry loop
pub const ACQUIRE_RETRY_ATTEMPTS: u32 = 20;
pub const ACQUIRE_RETRY_INTERVAL_SEC: f64 = 0.1;

// Consecutive draw failures tolerated before the loop stops
pub const MAX_CONSECUTIVE_DRAW_FAILURES: u32 = 8;

// Lattice bounds: cell pitch floor and element ceiling
pub const MIN_GRID_CELL: f32 = 1.0;
pub const MAX_GRID_CELLS: usize = 65_536;

// Smallest distance used as a denominator
pub const MIN_DISTANCE: f32 = 1e-3;

// Spring integration step ceiling, and the longest span one step integrates
pub const SPRING_MAX_SUBSTEP_SEC: f32 = 1.0 / 120.0;
pub const SPRING_MAX_STEP_SEC: f32 = 10.0;

// Settling thresholds
pub const SETTLE_EPSILON: f32 = 1e-3;
pub const SETTLE_VELOCITY_EPSILON: f32 = 1e-2;

// Pointer handling
pub const POINTER_MAX_SPEED: f32 = 5000.0; // css px per second
pub const POINTER_SMOOTHING_TAU_SEC: f32 = 0.08;
pub const POINTER_PRESENCE_TAU_SEC: f32 = 0.25;

// Distortion field
pub const FIELD_REFERENCE_FPS: f32 = 60.0;
pub const FIELD_MAX_POWER: f32 = 10.0;
pub const FIELD_GAIN: f32 = 100.0;
