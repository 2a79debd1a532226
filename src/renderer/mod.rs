//! Scene-side orbit rendering state
//!
//! Orbit records become closed curves; each frame samples them by phase
//! and resolves marker visuals. The host draws what [`Scene::frame`] returns.

mod animation;
mod curve;
mod markers;
mod scene;

pub use animation::*;
pub use curve::*;
pub use markers::*;
pub use scene::*;
