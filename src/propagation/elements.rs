//! Descriptive orbital parameters for the info panel

use std::fmt;

use serde::Serialize;

use super::{MeanElements, PropagationFailure, Propagator, EARTH_RADIUS_KM, MU_EARTH_KM3_S2};
use crate::data::TlePair;

/// Why parameters are unavailable for a TLE pair
#[derive(Debug, Clone, PartialEq)]
pub enum ElementsError {
    /// TLE text could not be parsed
    Unparseable { message: String },
    /// Parsed, but mean motion or eccentricity is unusable
    Degenerate { mean_motion: f64, eccentricity: f64 },
}

impl fmt::Display for ElementsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unparseable { message } => write!(f, "Unparseable elements: {}", message),
            Self::Degenerate {
                mean_motion,
                eccentricity,
            } => write!(
                f,
                "Degenerate elements: mean motion {} rad/min, eccentricity {}",
                mean_motion, eccentricity
            ),
        }
    }
}

impl std::error::Error for ElementsError {}

impl From<PropagationFailure> for ElementsError {
    fn from(failure: PropagationFailure) -> Self {
        match failure {
            PropagationFailure::Unparseable { message } => Self::Unparseable { message },
            PropagationFailure::NoSolution => Self::Unparseable {
                message: "propagator returned no elements".to_string(),
            },
        }
    }
}

/// Classical orbital parameters in display units
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrbitalParameters {
    pub inclination_deg: f64,
    pub raan_deg: f64,
    pub eccentricity: f64,
    pub arg_perigee_deg: f64,
    pub mean_anomaly_deg: f64,
    /// Mean motion (rev/day)
    pub mean_motion: f64,
    pub semi_major_axis_km: f64,
    pub period_min: f64,
    /// Semi-major axis minus Earth mean radius (km)
    pub altitude_km: f64,
}

impl OrbitalParameters {
    pub fn from_elements(elements: &MeanElements) -> Result<Self, ElementsError> {
        let n_rad_min = elements.mean_motion_rad_min;
        let ecc = elements.eccentricity;
        if !n_rad_min.is_finite() || n_rad_min <= 0.0 || !(0.0..1.0).contains(&ecc) {
            return Err(ElementsError::Degenerate {
                mean_motion: n_rad_min,
                eccentricity: ecc,
            });
        }

        // Kepler's third law with n in rad/s
        let n_rad_s = n_rad_min / 60.0;
        let semi_major_axis_km = (MU_EARTH_KM3_S2 / (n_rad_s * n_rad_s)).cbrt();
        let period_min = 2.0 * std::f64::consts::PI / n_rad_s / 60.0;

        Ok(Self {
            inclination_deg: elements.inclination_rad.to_degrees(),
            raan_deg: elements.raan_rad.to_degrees(),
            eccentricity: ecc,
            arg_perigee_deg: elements.arg_perigee_rad.to_degrees(),
            mean_anomaly_deg: elements.mean_anomaly_rad.to_degrees(),
            mean_motion: elements.revs_per_day(),
            semi_major_axis_km,
            period_min,
            altitude_km: semi_major_axis_km - EARTH_RADIUS_KM,
        })
    }

    /// Values formatted with the info panel's precision
    pub fn formatted(&self) -> FormattedParameters {
        FormattedParameters {
            inclination: format!("{:.2}", self.inclination_deg),
            raan: format!("{:.2}", self.raan_deg),
            eccentricity: format!("{:.6}", self.eccentricity),
            arg_of_perigee: format!("{:.2}", self.arg_perigee_deg),
            mean_anomaly: format!("{:.2}", self.mean_anomaly_deg),
            mean_motion: format!("{:.8}", self.mean_motion),
            period: format!("{:.2}", self.period_min),
            altitude: format!("{:.2}", self.altitude_km),
        }
    }
}

/// Display strings for the info panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedParameters {
    pub inclination: String,
    pub raan: String,
    pub eccentricity: String,
    pub arg_of_perigee: String,
    pub mean_anomaly: String,
    pub mean_motion: String,
    pub period: String,
    pub altitude: String,
}

impl fmt::Display for FormattedParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Inclination:   {}°", self.inclination)?;
        writeln!(f, "Altitude:      {} km", self.altitude)?;
        writeln!(f, "Period:        {} min", self.period)?;
        writeln!(f, "Eccentricity:  {}", self.eccentricity)?;
        writeln!(f, "RAAN:          {}°", self.raan)?;
        writeln!(f, "Arg. Perigee:  {}°", self.arg_of_perigee)?;
        writeln!(f, "Mean Anomaly:  {}°", self.mean_anomaly)?;
        write!(f, "Mean Motion:   {} rev/day", self.mean_motion)
    }
}

/// Derive parameters from the propagator's own parsed elements
pub fn try_derive_parameters<P: Propagator + ?Sized>(
    propagator: &P,
    tle: &TlePair,
) -> Result<OrbitalParameters, ElementsError> {
    let elements = propagator.elements(tle)?;
    OrbitalParameters::from_elements(&elements)
}

/// Derive parameters, or `None` when unavailable
pub fn derive_parameters<P: Propagator + ?Sized>(
    propagator: &P,
    tle: &TlePair,
) -> Option<OrbitalParameters> {
    match try_derive_parameters(propagator, tle) {
        Ok(params) => Some(params),
        Err(e) => {
            log::debug!("Orbital parameters unavailable: {}", e);
            None
        }
    }
}
