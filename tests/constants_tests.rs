// Host-side tests for the web layer's constants.
// The main crate is wasm-only, so we include the pure-Rust module directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}

use constants::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn drawing_constants_are_within_reasonable_bounds() {
    assert!(FIELD_LINE_WIDTH > 0.0);
    assert!(FIELD_LINE_ALPHA > 0.0 && FIELD_LINE_ALPHA <= 1.0);
    assert!(SLIDER_KNOB_SCALE >= 1.0);
    assert!(MS_PER_SEC == 1000.0);

    // clear colour channels are normalised
    for c in GPU_CLEAR_COLOR {
        assert!((0.0..=1.0).contains(&c));
    }
    assert!(GPU_MAX_FRAME_LATENCY >= 1);
}

#[test]
fn plasma_uniform_block_is_sixteen_floats() {
    // resolution, time, hue, pointer, presence, pulse, colour, speed, scale, padding
    let floats = 2 + 1 + 1 + 2 + 1 + 1 + 4 + 1 + 1 + 2;
    assert_eq!(PLASMA_UNIFORM_BYTES, floats * 4);
    // uniform buffers are laid out in 16-byte rows
    assert_eq!(PLASMA_UNIFORM_BYTES % 16, 0);
}

#[test]
fn listener_names_are_distinct() {
    let mut names: Vec<&str> = POINTER_EVENTS.iter().chain(TOUCH_EVENTS.iter()).copied().collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), POINTER_EVENTS.len() + TOUCH_EVENTS.len());
    assert!(POINTER_EVENTS.iter().all(|n| n.starts_with("pointer")));
    assert!(TOUCH_EVENTS.iter().all(|n| n.starts_with("touch")));
    assert!(!CANVAS_CLASS.is_empty());
}
