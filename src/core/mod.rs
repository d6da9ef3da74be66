pub use fx_core::*;

// Shaders bundled as string constants
pub static PLASMA_WGSL: &str = include_str!("../../shaders/plasma.wgsl");
