// Browser-side drawing and wiring constants.
//
// The physics and lifecycle tuning lives in `fx_core::constants`; these only
// concern how the web layer paints and listens.

// Class name given to the canvas created inside the host element
pub const CANVAS_CLASS: &str = "fx-canvas";

// Event timestamps arrive in milliseconds
pub const MS_PER_SEC: f64 = 1000.0;

// Pointer listeners on the host. Touch-type pointer events are skipped because
// the touch listeners below already report them.
pub const POINTER_EVENTS: [&str; 4] = ["pointerdown", "pointermove", "pointerup", "pointerleave"];
pub const TOUCH_EVENTS: [&str; 4] = ["touchstart", "touchmove", "touchend", "touchcancel"];

// Canvas 2D painter
pub const FIELD_LINE_WIDTH: f64 = 1.0; // css px
pub const FIELD_LINE_ALPHA: f32 = 0.6;
pub const SLIDER_KNOB_SCALE: f64 = 2.2; // knob radius relative to track height

// WebGPU painter
pub const GPU_CLEAR_COLOR: [f64; 4] = [0.0, 0.0, 0.0, 0.0];
pub const PLASMA_UNIFORM_BYTES: u64 = 64;
pub const GPU_MAX_FRAME_LATENCY: u32 = 2;
