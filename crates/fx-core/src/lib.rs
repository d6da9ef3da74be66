//! Platform-agnostic core of the interactive effect components.
//!
//! Everything here is free of browser APIs so it can be driven by the wasm
//! front-end and by host-side tests alike: surface contracts, resize and
//! pointer normalisation, the frame clock, damped-physics models, the
//! disposal registry, the timeline engine and the effect strategies.

pub mod config;
pub mod constants;
pub mod damping;
pub mod disposal;
pub mod easing;
pub mod effects;
pub mod error;
pub mod field;
pub mod frame;
pub mod impulse;
pub mod lifecycle;
pub mod pointer;
pub mod render_state;
pub mod resize;
pub mod surface;
pub mod timeline;

pub use config::*;
pub use damping::*;
pub use disposal::*;
pub use easing::*;
pub use effects::{Effect, EffectKind, EffectStrategy};
pub use error::*;
pub use field::*;
pub use frame::*;
pub use impulse::*;
pub use lifecycle::*;
pub use pointer::*;
pub use render_state::*;
pub use resize::*;
pub use surface::*;
pub use timeline::*;
