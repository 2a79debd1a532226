//! Orbit track sampling over one revolution

use super::{eci_to_scene, now_instant, Propagator, ScenePoint};
use crate::data::TlePair;

/// Default number of samples per revolution
pub const DEFAULT_SAMPLES_PER_ORBIT: usize = 300;

/// Sample one full revolution starting now.
///
/// The result is a closed loop (last point adjacent to the first). Instants
/// where propagation fails are omitted, so the track may be shorter than
/// `sample_count`, or empty.
pub fn sample_orbit<P: Propagator + ?Sized>(
    propagator: &P,
    tle: &TlePair,
    sample_count: usize,
) -> Vec<ScenePoint> {
    sample_orbit_from(propagator, tle, &now_instant(), sample_count)
}

/// Sample one full revolution starting at `start`
pub fn sample_orbit_from<P: Propagator + ?Sized>(
    propagator: &P,
    tle: &TlePair,
    start: &satkit::Instant,
    sample_count: usize,
) -> Vec<ScenePoint> {
    if sample_count == 0 {
        return Vec::new();
    }

    let elements = match propagator.elements(tle) {
        Ok(elements) => elements,
        Err(e) => {
            log::debug!("Cannot sample orbit: {}", e);
            return Vec::new();
        }
    };

    // Period from mean motion: 1440 min / rev-per-day
    let period_seconds = elements.period_minutes() * 60.0;
    if !period_seconds.is_finite() || period_seconds <= 0.0 {
        log::debug!("Cannot sample orbit: degenerate period {}", period_seconds);
        return Vec::new();
    }

    let step = period_seconds / sample_count as f64;
    let instants: Vec<satkit::Instant> = (0..sample_count)
        .map(|i| *start + satkit::Duration::from_seconds(step * i as f64))
        .collect();

    let positions = propagator.propagate_many(tle, &instants);

    let points: Vec<ScenePoint> = instants
        .iter()
        .zip(positions)
        .filter_map(|(instant, position)| {
            position.map(|eci| ScenePoint {
                position: eci_to_scene(eci),
                unix_time: instant.as_unixtime(),
            })
        })
        .collect();

    if points.len() < sample_count {
        log::debug!(
            "Orbit sampling dropped {} of {} instants",
            sample_count - points.len(),
            sample_count
        );
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::propagation::testing::{
        iss_tle, mock_epoch, mock_tle, MockMode, MockPropagator,
    };
    use crate::propagation::{Sgp4Propagator, EARTH_SCENE_RADIUS};

    fn mean_step(points: &[ScenePoint]) -> f32 {
        let total: f32 = points
            .windows(2)
            .map(|w| (w[1].position - w[0].position).length())
            .sum();
        total / (points.len() - 1) as f32
    }

    #[test]
    fn test_iss_track_is_closed() {
        let tle = iss_tle();
        let epoch = Sgp4Propagator.elements(&tle).unwrap().epoch;
        let points = sample_orbit_from(&Sgp4Propagator, &tle, &epoch, 120);

        assert_eq!(points.len(), 120);

        // One revolution: the gap from last back to first is a single step
        let step = mean_step(&points);
        let first = points[0].position;
        let last = points[points.len() - 1].position;
        let closing_gap = (first - last).length();
        assert!(
            closing_gap < step * 1.5,
            "closing gap {} vs step {}",
            closing_gap,
            step
        );

        // Every sample sits above the rendered globe
        for p in &points {
            assert!(p.position.length() > EARTH_SCENE_RADIUS);
        }
    }

    #[test]
    fn test_samples_span_one_period() {
        let tle = mock_tle(16.0, MockMode::Nominal);
        let start = mock_epoch();
        let points = sample_orbit_from(&MockPropagator::new(), &tle, &start, 90);

        assert_eq!(points.len(), 90);
        let span = points[89].unix_time - points[0].unix_time;
        // 90 minute period, 90 samples: last sample is one minute short of a revolution
        assert!((span - 89.0 * 60.0).abs() < 1e-3, "span {}", span);
        assert!((points[0].unix_time - start.as_unixtime()).abs() < 1e-3);
    }

    #[test]
    fn test_failed_instants_are_omitted() {
        let start = mock_epoch();
        let propagator = MockPropagator::new();

        let decayed = sample_orbit_from(&propagator, &mock_tle(15.0, MockMode::Decayed), &start, 50);
        assert!(decayed.is_empty());

        let single =
            sample_orbit_from(&propagator, &mock_tle(15.0, MockMode::SinglePoint), &start, 50);
        assert_eq!(single.len(), 1);

        let garbage = sample_orbit_from(&propagator, &mock_tle(15.0, MockMode::Garbage), &start, 50);
        assert!(garbage.is_empty());
    }

    #[test]
    fn test_zero_samples() {
        let points = sample_orbit(&MockPropagator::new(), &mock_tle(15.0, MockMode::Nominal), 0);
        assert!(points.is_empty());
    }

    #[test]
    fn test_shape_is_independent_of_start_time() {
        let tle = mock_tle(15.0, MockMode::Nominal);
        let propagator = MockPropagator::new();
        let a = sample_orbit(&propagator, &tle, 64);
        let b = sample_orbit(&propagator, &tle, 64);

        // Phase may drift between calls, radius may not
        let ra = a[0].position.length();
        for p in a.iter().chain(b.iter()) {
            assert!((p.position.length() - ra).abs() < 1e-3);
        }
    }
}
