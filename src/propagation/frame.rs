//! ECI to scene-frame mapping

use glam::{DVec3, Vec3};
use serde::Serialize;

use super::EARTH_RADIUS_KM;

/// Scene units per kilometer. Earth and orbits share this single factor.
pub const SCENE_UNITS_PER_KM: f64 = 0.001;

/// Rendered Earth radius in scene units
pub const EARTH_SCENE_RADIUS: f32 = (EARTH_RADIUS_KM * SCENE_UNITS_PER_KM) as f32;

/// A position in the scene frame with the instant it was propagated for
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScenePoint {
    pub position: Vec3,
    /// Source instant, unix seconds
    pub unix_time: f64,
}

/// Map an ECI vector (km) into the scene frame.
///
/// ECI uses Z-up (polar axis), the scene uses Y-up:
/// ECI X -> Scene X, ECI Z -> Scene Y, ECI Y -> Scene -Z (keeps right-handedness)
pub fn eci_to_scene(eci_km: DVec3) -> Vec3 {
    let scaled = eci_km * SCENE_UNITS_PER_KM;
    Vec3::new(scaled.x as f32, scaled.z as f32, -scaled.y as f32)
}

/// Inverse of [`eci_to_scene`]
pub fn scene_to_eci(scene: Vec3) -> DVec3 {
    let v = scene.as_dvec3() / SCENE_UNITS_PER_KM;
    DVec3::new(v.x, -v.z, v.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_remap() {
        let p = eci_to_scene(DVec3::new(1000.0, 2000.0, 3000.0));
        assert!((p - Vec3::new(1.0, 3.0, -2.0)).length() < 1e-6);
    }

    #[test]
    fn test_earth_radius_uses_same_scale() {
        let surface = eci_to_scene(DVec3::new(0.0, EARTH_RADIUS_KM, 0.0));
        assert!((surface.length() - EARTH_SCENE_RADIUS).abs() < 1e-6);

        // 400 km altitude stays 400 km above the rendered globe
        let leo = eci_to_scene(DVec3::new(EARTH_RADIUS_KM + 400.0, 0.0, 0.0));
        let altitude_km = (leo.length() - EARTH_SCENE_RADIUS) as f64 / SCENE_UNITS_PER_KM;
        assert!((altitude_km - 400.0).abs() < 0.01);
    }

    #[test]
    fn test_mapping_is_right_handed() {
        let x = eci_to_scene(DVec3::X * 1000.0);
        let y = eci_to_scene(DVec3::Y * 1000.0);
        let z = eci_to_scene(DVec3::Z * 1000.0);
        assert!((x.cross(y) - z).length() < 1e-6);
    }

    #[test]
    fn test_round_trip() {
        let eci = DVec3::new(-4200.5, 5100.25, 1200.0);
        let back = scene_to_eci(eci_to_scene(eci));
        assert!((back - eci).length() < 1e-2);
    }
}
