//! Per-frame animation of satellites along their closed tracks
//!
//! Every satellite advances at the same phase rate: `phase = (elapsed * speed) mod 1`.
//! Track shape carries the real period; traversal speed is a scene-wide knob.
//! Nothing here touches the propagator, so a frame is O(1) per orbit.

use glam::Vec3;
use serde::Serialize;

use super::ClosedCurve;
use crate::propagation::OrbitRecord;

/// Default phase-units per second
pub const DEFAULT_ANIMATION_SPEED: f64 = 0.003;

pub const PULSE_AMPLITUDE: f32 = 0.3;

/// Pulse angular rate, rad/s of wall-clock time
pub const PULSE_RATE: f64 = 3.0;

/// Visible arc width as a fraction of the sample count
pub const ARC_FRACTION: f64 = 0.08;

pub const MIN_ARC_SAMPLES: usize = 6;

/// Fractional position around the closed track, in [0, 1)
pub fn phase(elapsed_seconds: f64, speed: f64) -> f64 {
    let p = (elapsed_seconds * speed).rem_euclid(1.0);
    if p >= 1.0 || !p.is_finite() {
        0.0
    } else {
        p
    }
}

/// Marker scale; pulses only while selected
pub fn pulsate_scale(elapsed_seconds: f64, selected: bool) -> f32 {
    if selected {
        1.0 + (elapsed_seconds * PULSE_RATE).sin() as f32 * PULSE_AMPLITUDE
    } else {
        1.0
    }
}

/// Samples in the visible arc: max(6, floor(0.08 × n)), capped at n
pub fn arc_window_len(sample_count: usize) -> usize {
    let by_fraction = (ARC_FRACTION * sample_count as f64).floor() as usize;
    by_fraction.max(MIN_ARC_SAMPLES).min(sample_count)
}

/// Window of track samples centered on the marker.
/// `start + len` may wrap past the end of the track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VisibleArc {
    pub start: usize,
    pub len: usize,
    pub sample_count: usize,
}

impl VisibleArc {
    /// Window around curve parameter `t` (sample `i` sits at `t = i / n`)
    pub fn centered(t: f64, sample_count: usize) -> Self {
        if sample_count == 0 {
            return Self {
                start: 0,
                len: 0,
                sample_count,
            };
        }
        let len = arc_window_len(sample_count);
        let center = (t.rem_euclid(1.0) * sample_count as f64).round() as usize % sample_count;
        let start = (center + sample_count - len / 2) % sample_count;
        Self {
            start,
            len,
            sample_count,
        }
    }

    /// Sample indices in draw order, wrapping around the loop
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).map(move |i| (self.start + i) % self.sample_count)
    }

    /// Sample positions of `record` in draw order
    pub fn points<'a>(&'a self, record: &'a OrbitRecord) -> impl Iterator<Item = Vec3> + 'a {
        self.indices().map(move |i| record.points[i].position)
    }
}

/// An orbit record with its interpolation curve
#[derive(Debug, Clone)]
pub struct AnimatedOrbit {
    pub record: OrbitRecord,
    curve: ClosedCurve,
}

impl AnimatedOrbit {
    /// `None` for records with fewer than two points
    pub fn new(record: OrbitRecord) -> Option<Self> {
        let positions: Vec<Vec3> = record.points.iter().map(|p| p.position).collect();
        let curve = ClosedCurve::new(&positions)?;
        Some(Self { record, curve })
    }

    pub fn norad_id(&self) -> u32 {
        self.record.norad_id
    }

    pub fn curve(&self) -> &ClosedCurve {
        &self.curve
    }
}

/// What the renderer needs for one orbit in one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameState {
    pub phase: f64,
    pub position: Vec3,
    pub pulsate_scale: f32,
    /// Only present while orbit paths are shown
    pub visible_arc: Option<VisibleArc>,
}

pub fn frame_state(
    orbit: &AnimatedOrbit,
    elapsed_seconds: f64,
    speed: f64,
    selected: bool,
    show_orbit_paths: bool,
) -> FrameState {
    let phase = phase(elapsed_seconds, speed);
    // Phase is an arc-length fraction; samples are even in time
    let t = orbit.curve.param_at(phase as f32);
    let visible_arc =
        show_orbit_paths.then(|| VisibleArc::centered(t as f64, orbit.record.points.len()));

    FrameState {
        phase,
        position: orbit.curve.point(t),
        pulsate_scale: pulsate_scale(elapsed_seconds, selected),
        visible_arc,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ObjectCategory;
    use crate::propagation::ScenePoint;

    fn ring_record(n: usize) -> OrbitRecord {
        let points: Vec<ScenePoint> = (0..n)
            .map(|i| {
                let a = i as f32 / n as f32 * std::f32::consts::TAU;
                ScenePoint {
                    position: Vec3::new(6.8 * a.cos(), 0.0, 6.8 * a.sin()),
                    unix_time: i as f64,
                }
            })
            .collect();
        OrbitRecord {
            norad_id: 1,
            name: "RING".into(),
            category: ObjectCategory::Payload,
            current_position: points[0],
            points,
        }
    }

    #[test]
    fn test_zero_speed_freezes_phase() {
        for t in [0.0, 1.5, 42.0, 1e6] {
            assert_eq!(phase(t, 0.0), 0.0);
        }
    }

    #[test]
    fn test_phase_increases_with_time() {
        let speed = 0.003;
        let mut last = phase(0.0, speed);
        for i in 1..300 {
            let p = phase(i as f64, speed);
            assert!(p > last, "phase {} not above {}", p, last);
            last = p;
        }
        // Wraps modulo one
        assert!((phase(1.0 / speed + 10.0, speed) - 10.0 * speed).abs() < 1e-9);
        assert!(phase(-10.0, speed) >= 0.0);
    }

    #[test]
    fn test_pulsation_only_when_selected() {
        assert_eq!(pulsate_scale(0.7, false), 1.0);
        let s = pulsate_scale(0.5, true);
        assert!((s - (1.0 + (1.5f64).sin() as f32 * 0.3)).abs() < 1e-6);
        for i in 0..100 {
            let s = pulsate_scale(i as f64 * 0.1, true);
            assert!((0.7..=1.3).contains(&s));
        }
    }

    #[test]
    fn test_arc_window_len() {
        assert_eq!(arc_window_len(300), 24);
        assert_eq!(arc_window_len(100), 8);
        assert_eq!(arc_window_len(40), 6);
        assert_eq!(arc_window_len(4), 4);
    }

    #[test]
    fn test_visible_arc_is_centered_and_wraps() {
        let arc = VisibleArc::centered(0.0, 100);
        let indices: Vec<usize> = arc.indices().collect();
        assert_eq!(indices, vec![96, 97, 98, 99, 0, 1, 2, 3]);

        let arc = VisibleArc::centered(0.5, 100);
        assert_eq!(arc.start, 46);
        assert_eq!(arc.len, 8);
    }

    #[test]
    fn test_frame_state_follows_curve() {
        let orbit = AnimatedOrbit::new(ring_record(60)).unwrap();

        let at_start = frame_state(&orbit, 0.0, 0.01, false, true);
        assert!(at_start.position.distance(orbit.record.points[0].position) < 1e-3);
        assert_eq!(at_start.pulsate_scale, 1.0);
        assert_eq!(at_start.visible_arc.unwrap().len, 6);

        // Quarter turn
        let quarter = frame_state(&orbit, 25.0, 0.01, true, false);
        assert!((quarter.phase - 0.25).abs() < 1e-9);
        assert!(quarter.position.distance(orbit.record.points[15].position) < 0.05);
        assert!(quarter.visible_arc.is_none());
    }

    /// Time-even samples of an ellipse with eccentricity `e`
    fn eccentric_record(n: usize, e: f32) -> OrbitRecord {
        let a = 7.0_f32;
        let b = a * (1.0 - e * e).sqrt();
        let points: Vec<ScenePoint> = (0..n)
            .map(|i| {
                let mean_anomaly = i as f32 / n as f32 * std::f32::consts::TAU;
                let mut ecc_anomaly = std::f32::consts::PI;
                for _ in 0..50 {
                    ecc_anomaly -= (ecc_anomaly - e * ecc_anomaly.sin() - mean_anomaly)
                        / (1.0 - e * ecc_anomaly.cos());
                }
                ScenePoint {
                    position: Vec3::new(
                        a * (ecc_anomaly.cos() - e),
                        0.0,
                        b * ecc_anomaly.sin(),
                    ),
                    unix_time: i as f64,
                }
            })
            .collect();
        OrbitRecord {
            norad_id: 2,
            name: "ELLIPSE".into(),
            category: ObjectCategory::Debris,
            current_position: points[0],
            points,
        }
    }

    #[test]
    fn test_visible_arc_surrounds_marker_on_eccentric_track() {
        let orbit = AnimatedOrbit::new(eccentric_record(300, 0.7)).unwrap();
        let max_step = orbit
            .record
            .points
            .iter()
            .zip(orbit.record.points.iter().cycle().skip(1))
            .map(|(p, q)| p.position.distance(q.position))
            .fold(0.0_f32, f32::max);

        for k in 0..40 {
            let state = frame_state(&orbit, k as f64 / 40.0, 1.0, false, true);
            let arc = state.visible_arc.unwrap();
            let nearest = arc
                .points(&orbit.record)
                .map(|p| p.distance(state.position))
                .fold(f32::INFINITY, f32::min);
            assert!(
                nearest <= max_step,
                "marker {} away from its arc at phase {}",
                nearest,
                state.phase
            );
        }
    }

    #[test]
    fn test_frame_positions_stay_on_orbit() {
        let orbit = AnimatedOrbit::new(ring_record(30)).unwrap();
        for i in 0..50 {
            let state = frame_state(&orbit, i as f64 * 3.3, 0.01, false, false);
            assert!((state.position.length() - 6.8).abs() < 0.02);
        }
    }

    #[test]
    fn test_degenerate_record_is_rejected() {
        let mut record = ring_record(3);
        record.points.truncate(1);
        assert!(AnimatedOrbit::new(record).is_none());
    }
}
