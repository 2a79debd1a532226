//! Satscope - orbital-state engine for a satellite tracking dashboard
//!
//! Loads tracked objects (TLE pairs plus catalog metadata), filters them,
//! propagates one revolution per visible object with SGP4, and serves
//! per-frame marker states for a 3D scene.

pub mod data;
pub mod propagation;
pub mod renderer;
