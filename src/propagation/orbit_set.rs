//! Building the orbit set for the visible objects

use serde::Serialize;

use super::{eci_to_scene, now_instant, sample_orbit_from, Propagator, ScenePoint};
use crate::data::{ObjectCategory, TrackedObject};

/// One revolution of a tracked object, ready for animation
#[derive(Debug, Clone, Serialize)]
pub struct OrbitRecord {
    pub norad_id: u32,
    pub name: String,
    pub category: ObjectCategory,
    /// Closed loop, always at least two points
    pub points: Vec<ScenePoint>,
    pub current_position: ScenePoint,
}

/// Build the orbit record for a single object.
///
/// Returns `None` when fewer than two samples propagate.
pub fn build_orbit<P: Propagator + ?Sized>(
    propagator: &P,
    object: &TrackedObject,
    start: &satkit::Instant,
    sample_count: usize,
) -> Option<OrbitRecord> {
    let points = sample_orbit_from(propagator, &object.tle, start, sample_count);
    if points.len() < 2 {
        log::debug!(
            "Dropping NORAD {} ({}): {} usable samples",
            object.norad_id,
            object.display_name(),
            points.len()
        );
        return None;
    }

    let current_position = match propagator.propagate(&object.tle, start) {
        Ok(eci) => ScenePoint {
            position: eci_to_scene(eci),
            unix_time: start.as_unixtime(),
        },
        Err(e) => {
            log::debug!("NORAD {}: no current position ({})", object.norad_id, e);
            points[0]
        }
    };

    Some(OrbitRecord {
        norad_id: object.norad_id,
        name: object.display_name(),
        category: object.category,
        points,
        current_position,
    })
}

/// Build orbit records starting now. Expensive: O(objects × samples)
/// propagations. Call when the visible set changes, never per frame.
pub fn build_orbits<'a, P, I>(propagator: &P, objects: I, sample_count: usize) -> Vec<OrbitRecord>
where
    P: Propagator + ?Sized,
    I: IntoIterator<Item = &'a TrackedObject>,
{
    build_orbits_from(propagator, objects, &now_instant(), sample_count)
}

/// Build orbit records from an explicit start instant, in input order
pub fn build_orbits_from<'a, P, I>(
    propagator: &P,
    objects: I,
    start: &satkit::Instant,
    sample_count: usize,
) -> Vec<OrbitRecord>
where
    P: Propagator + ?Sized,
    I: IntoIterator<Item = &'a TrackedObject>,
{
    let mut requested = 0usize;
    let orbits: Vec<OrbitRecord> = objects
        .into_iter()
        .inspect(|_| requested += 1)
        .filter_map(|object| build_orbit(propagator, object, start, sample_count))
        .collect();

    log::info!(
        "Built {} orbits ({} objects, {} dropped)",
        orbits.len(),
        requested,
        requested - orbits.len()
    );
    orbits
}
