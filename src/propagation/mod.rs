//! Orbital propagation module
//!
//! SGP4 via satkit turns TLE pairs into ECI positions. On top of that sit
//! the scene-frame mapping, one-revolution sampling, the descriptive
//! parameter derivation for the info panel, and the orbit-set builder that
//! turns the visible objects into animatable closed tracks.
//!
//! # Example
//!
//! ```ignore
//! use satscope::propagation::*;
//!
//! let propagator = Sgp4Propagator::new();
//! let orbits = build_orbits(&propagator, &visible, DEFAULT_SAMPLES_PER_ORBIT);
//! let params = derive_parameters(&propagator, &visible[0].tle);
//! ```

mod elements;
mod frame;
mod orbit_set;
mod orbit_track;
mod propagator;
mod worker;

#[cfg(test)]
pub(crate) mod testing;

pub use elements::*;
pub use frame::*;
pub use orbit_set::*;
pub use orbit_track::*;
pub use propagator::*;
pub use worker::*;
