// extensions/mod.rs
//
// Optional extension modules, decoupled from the greeting core.
// Pure math — systems opt in by importing what they need.

pub mod easing;

pub use easing::{ease, ease_vec2, lerp, lerp_vec2, Easing};
