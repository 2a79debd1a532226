//! SGP4 propagation using satkit

use std::fmt;

use glam::DVec3;
use satkit::sgp4::sgp4;

use crate::data::TlePair;

/// Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Earth's gravitational parameter in km³/s²
pub const MU_EARTH_KM3_S2: f64 = 398600.4418;

pub const MINUTES_PER_DAY: f64 = 1440.0;

/// Why a propagation produced no position
#[derive(Debug, Clone, PartialEq)]
pub enum PropagationFailure {
    /// TLE text could not be parsed
    Unparseable { message: String },
    /// Elements decayed to a degenerate state at the requested instant
    NoSolution,
}

impl fmt::Display for PropagationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unparseable { message } => write!(f, "Unparseable TLE: {}", message),
            Self::NoSolution => write!(f, "No propagation solution at requested instant"),
        }
    }
}

impl std::error::Error for PropagationFailure {}

/// Mean elements as the propagator interprets them, in SGP4's native units
#[derive(Debug, Clone, Copy)]
pub struct MeanElements {
    pub inclination_rad: f64,
    pub raan_rad: f64,
    pub eccentricity: f64,
    pub arg_perigee_rad: f64,
    pub mean_anomaly_rad: f64,
    /// Mean motion in rad/min
    pub mean_motion_rad_min: f64,
    pub epoch: satkit::Instant,
}

impl MeanElements {
    pub fn revs_per_day(&self) -> f64 {
        self.mean_motion_rad_min * MINUTES_PER_DAY / (2.0 * std::f64::consts::PI)
    }

    /// Orbital period in minutes (1440 / rev-per-day)
    pub fn period_minutes(&self) -> f64 {
        MINUTES_PER_DAY / self.revs_per_day()
    }
}

/// Orbital-mechanics capability: TLE + instant -> ECI position
///
/// Implementations must be pure for a given (TLE, instant) pair.
pub trait Propagator: Send + Sync {
    /// Parsed mean elements for a TLE pair
    fn elements(&self, tle: &TlePair) -> Result<MeanElements, PropagationFailure>;

    /// Earth-centered inertial position in kilometers
    fn propagate(&self, tle: &TlePair, instant: &satkit::Instant)
        -> Result<DVec3, PropagationFailure>;

    /// Propagate to several instants; failed instants yield `None`
    fn propagate_many(&self, tle: &TlePair, instants: &[satkit::Instant]) -> Vec<Option<DVec3>> {
        instants
            .iter()
            .map(|instant| self.propagate(tle, instant).ok())
            .collect()
    }
}

/// SGP4 analytic propagator backed by satkit
#[derive(Debug, Clone, Copy, Default)]
pub struct Sgp4Propagator;

impl Sgp4Propagator {
    pub fn new() -> Self {
        Self
    }

    fn run(tle: &satkit::TLE, instant: &satkit::Instant) -> Result<DVec3, PropagationFailure> {
        let mut tle = tle.clone();
        match sgp4(&mut tle, &[*instant]) {
            Ok(result) => {
                // pos is in TEME, meters
                let pos = result.pos.column(0);
                let pos_km = DVec3::new(pos[0], pos[1], pos[2]) / 1000.0;
                if pos_km.is_finite() {
                    Ok(pos_km)
                } else {
                    Err(PropagationFailure::NoSolution)
                }
            }
            Err(_) => Err(PropagationFailure::NoSolution),
        }
    }
}

impl Propagator for Sgp4Propagator {
    fn elements(&self, tle: &TlePair) -> Result<MeanElements, PropagationFailure> {
        let tle = parse_tle(tle)?;
        Ok(MeanElements {
            inclination_rad: tle.inclination.to_radians(),
            raan_rad: tle.raan.to_radians(),
            eccentricity: tle.eccen,
            arg_perigee_rad: tle.arg_of_perigee.to_radians(),
            mean_anomaly_rad: tle.mean_anomaly.to_radians(),
            mean_motion_rad_min: tle.mean_motion * 2.0 * std::f64::consts::PI / MINUTES_PER_DAY,
            epoch: tle.epoch,
        })
    }

    fn propagate(
        &self,
        tle: &TlePair,
        instant: &satkit::Instant,
    ) -> Result<DVec3, PropagationFailure> {
        let tle = parse_tle(tle)?;
        Self::run(&tle, instant)
    }

    fn propagate_many(&self, tle: &TlePair, instants: &[satkit::Instant]) -> Vec<Option<DVec3>> {
        // Parse once, then propagate each instant separately so that one
        // decayed sample does not discard the rest.
        let tle = match parse_tle(tle) {
            Ok(tle) => tle,
            Err(_) => return vec![None; instants.len()],
        };
        instants
            .iter()
            .map(|instant| Self::run(&tle, instant).ok())
            .collect()
    }
}

/// Parse TLE data into satkit TLE
fn parse_tle(tle: &TlePair) -> Result<satkit::TLE, PropagationFailure> {
    satkit::TLE::load_2line(tle.line1.trim(), tle.line2.trim()).map_err(|e| {
        log::trace!("Failed to parse TLE: {}", e);
        PropagationFailure::Unparseable {
            message: e.to_string(),
        }
    })
}

/// Current UTC time as a satkit instant
pub fn now_instant() -> satkit::Instant {
    let now = chrono::Utc::now();
    satkit::Instant::from_unixtime(now.timestamp_millis() as f64 / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::propagation::testing::{iss_tle, ISS_LINE1};

    #[test]
    fn test_iss_elements() {
        let elements = Sgp4Propagator.elements(&iss_tle()).unwrap();

        assert!((elements.inclination_rad.to_degrees() - 51.6416).abs() < 1e-6);
        assert!((elements.eccentricity - 0.0006703).abs() < 1e-9);
        assert!((elements.revs_per_day() - 15.72125391).abs() < 1e-6);
        assert!((elements.period_minutes() - 91.597).abs() < 0.01);
    }

    #[test]
    fn test_iss_position_near_epoch() {
        let tle = iss_tle();
        let elements = Sgp4Propagator.elements(&tle).unwrap();

        let pos = Sgp4Propagator.propagate(&tle, &elements.epoch).unwrap();
        let altitude = pos.length() - EARTH_RADIUS_KM;
        // Slightly eccentric orbit around 350 km
        assert!(altitude > 300.0 && altitude < 420.0, "altitude {}", altitude);
    }

    #[test]
    fn test_unparseable_tle() {
        let tle = TlePair::new(ISS_LINE1, "garbage");
        assert!(matches!(
            Sgp4Propagator.elements(&tle),
            Err(PropagationFailure::Unparseable { .. })
        ));

        let now = now_instant();
        let results = Sgp4Propagator.propagate_many(&tle, &[now, now]);
        assert_eq!(results, vec![None, None]);
    }

    #[test]
    fn test_propagation_is_repeatable() {
        let tle = iss_tle();
        let epoch = Sgp4Propagator.elements(&tle).unwrap().epoch;
        let a = Sgp4Propagator.propagate(&tle, &epoch).unwrap();
        let b = Sgp4Propagator.propagate(&tle, &epoch).unwrap();
        assert_eq!(a, b);
    }
}
