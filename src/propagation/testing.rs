//! Test fixtures: a real ISS TLE and a deterministic circular-orbit propagator

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use glam::DVec3;

use super::{MeanElements, PropagationFailure, Propagator, MINUTES_PER_DAY, MU_EARTH_KM3_S2};
use crate::data::{ObjectCategory, TlePair, TrackedObject};

pub const ISS_LINE1: &str =
    "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927";
pub const ISS_LINE2: &str =
    "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";

/// Same elements as the ISS set, mean motion 16.0 rev/day (90 minute period)
pub const NINETY_MIN_LINE2: &str =
    "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 16.00000000563538";

/// Same elements as the ISS set, mean motion 15.55 rev/day (~409 km)
pub const LEO_410_LINE2: &str =
    "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.55000000563537";

pub fn iss_tle() -> TlePair {
    TlePair::new(ISS_LINE1, ISS_LINE2)
}

/// Epoch of every mock orbit (unix seconds)
pub const MOCK_EPOCH_UNIX: f64 = 1_700_000_000.0;

pub fn mock_epoch() -> satkit::Instant {
    satkit::Instant::from_unixtime(MOCK_EPOCH_UNIX)
}

/// How the mock propagator treats a TLE
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockMode {
    /// Propagates everywhere
    Nominal,
    /// Elements parse, every propagation fails
    Decayed,
    /// Only the epoch instant propagates
    SinglePoint,
    /// Every instant except the epoch propagates
    EpochFails,
    /// Elements do not parse
    Garbage,
}

/// Encode a mock orbit into a TLE pair
pub fn mock_tle(revs_per_day: f64, mode: MockMode) -> TlePair {
    let tag = match mode {
        MockMode::Nominal => "nominal",
        MockMode::Decayed => "decayed",
        MockMode::SinglePoint => "single",
        MockMode::EpochFails => "epoch-fails",
        MockMode::Garbage => "garbage",
    };
    TlePair::new(format!("MOCK {}", tag), format!("{}", revs_per_day))
}

pub fn mock_object(norad_id: u32, category: ObjectCategory, mode: MockMode) -> TrackedObject {
    TrackedObject {
        norad_id,
        name: format!("OBJECT {}", norad_id),
        category,
        tle: mock_tle(15.5, mode),
        source: Some("test".into()),
        created_at: String::new(),
        updated_at: String::new(),
        collision_alerts: None,
    }
}

/// Equatorial circular orbits with the radius implied by Kepler's third law
#[derive(Debug, Clone, Default)]
pub struct MockPropagator {
    calls: Arc<AtomicUsize>,
}

impl MockPropagator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of propagate calls so far, across clones
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn decode(tle: &TlePair) -> Result<(f64, MockMode), PropagationFailure> {
        let mode = match tle.line1.as_str() {
            "MOCK nominal" => MockMode::Nominal,
            "MOCK decayed" => MockMode::Decayed,
            "MOCK single" => MockMode::SinglePoint,
            "MOCK epoch-fails" => MockMode::EpochFails,
            _ => MockMode::Garbage,
        };
        let revs_per_day = tle.line2.trim().parse::<f64>().ok();
        match (mode, revs_per_day) {
            (MockMode::Garbage, _) | (_, None) => Err(PropagationFailure::Unparseable {
                message: "not a mock TLE".into(),
            }),
            (mode, Some(revs)) => Ok((revs, mode)),
        }
    }
}

impl Propagator for MockPropagator {
    fn elements(&self, tle: &TlePair) -> Result<MeanElements, PropagationFailure> {
        let (revs_per_day, _) = Self::decode(tle)?;
        Ok(MeanElements {
            inclination_rad: 0.0,
            raan_rad: 0.0,
            eccentricity: 0.0,
            arg_perigee_rad: 0.0,
            mean_anomaly_rad: 0.0,
            mean_motion_rad_min: revs_per_day * 2.0 * std::f64::consts::PI / MINUTES_PER_DAY,
            epoch: mock_epoch(),
        })
    }

    fn propagate(
        &self,
        tle: &TlePair,
        instant: &satkit::Instant,
    ) -> Result<DVec3, PropagationFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (revs_per_day, mode) = Self::decode(tle)?;
        let dt = instant.as_unixtime() - MOCK_EPOCH_UNIX;

        match mode {
            MockMode::Decayed => return Err(PropagationFailure::NoSolution),
            MockMode::SinglePoint if dt.abs() > 1e-3 => return Err(PropagationFailure::NoSolution),
            MockMode::EpochFails if dt.abs() <= 1e-3 => return Err(PropagationFailure::NoSolution),
            _ => {}
        }

        let n_rad_s = revs_per_day * 2.0 * std::f64::consts::PI / 86_400.0;
        let radius = (MU_EARTH_KM3_S2 / (n_rad_s * n_rad_s)).cbrt();
        let theta = n_rad_s * dt;
        Ok(DVec3::new(radius * theta.cos(), radius * theta.sin(), 0.0))
    }
}
