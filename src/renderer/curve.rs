//! Closed centripetal Catmull-Rom curve through orbit samples

use glam::Vec3;

/// Divisions used to measure arc length
const ARC_DIVISIONS: usize = 200;

/// Entries in the precomputed arc-length -> curve-parameter table
const U_TABLE_SIZE: usize = 256;

/// Closed curve with constant-time arc-length parameterized lookup
#[derive(Debug, Clone)]
pub struct ClosedCurve {
    points: Vec<Vec3>,
    /// u (fraction of arc length) -> t (curve parameter), U_TABLE_SIZE + 1 entries
    u_to_t: Vec<f32>,
    length: f32,
}

impl ClosedCurve {
    /// Build a closed curve; needs at least two points
    pub fn new(points: &[Vec3]) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }

        let mut curve = Self {
            points: points.to_vec(),
            u_to_t: Vec::new(),
            length: 0.0,
        };

        // Cumulative arc length at t = i / ARC_DIVISIONS
        let mut lengths = Vec::with_capacity(ARC_DIVISIONS + 1);
        lengths.push(0.0_f32);
        let mut last = curve.point(0.0);
        let mut sum = 0.0_f32;
        for i in 1..=ARC_DIVISIONS {
            let current = curve.point(i as f32 / ARC_DIVISIONS as f32);
            sum += current.distance(last);
            lengths.push(sum);
            last = current;
        }
        curve.length = sum;

        curve.u_to_t = (0..=U_TABLE_SIZE)
            .map(|k| u_to_t(&lengths, k as f32 / U_TABLE_SIZE as f32))
            .collect();

        Some(curve)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Total arc length in scene units
    pub fn length(&self) -> f32 {
        self.length
    }

    /// Point at curve parameter `t` in [0, 1)
    pub fn point(&self, t: f32) -> Vec3 {
        let l = self.points.len();
        let p = l as f32 * t.rem_euclid(1.0);
        let int_point = p.floor();
        let weight = p - int_point;
        let i = int_point as usize % l;

        let p0 = self.points[(i + l - 1) % l];
        let p1 = self.points[i];
        let p2 = self.points[(i + 1) % l];
        let p3 = self.points[(i + 2) % l];

        // Centripetal parameterization
        let mut dt0 = p0.distance_squared(p1).powf(0.25);
        let mut dt1 = p1.distance_squared(p2).powf(0.25);
        let mut dt2 = p2.distance_squared(p3).powf(0.25);
        if dt1 < 1e-4 {
            dt1 = 1.0;
        }
        if dt0 < 1e-4 {
            dt0 = dt1;
        }
        if dt2 < 1e-4 {
            dt2 = dt1;
        }

        let mut t1 = (p1 - p0) / dt0 - (p2 - p0) / (dt0 + dt1) + (p2 - p1) / dt1;
        let mut t2 = (p2 - p1) / dt1 - (p3 - p1) / (dt1 + dt2) + (p3 - p2) / dt2;
        t1 *= dt1;
        t2 *= dt1;

        let c0 = p1;
        let c1 = t1;
        let c2 = -3.0 * p1 + 3.0 * p2 - 2.0 * t1 - t2;
        let c3 = 2.0 * p1 - 2.0 * p2 + t1 + t2;

        let w = weight;
        c0 + c1 * w + c2 * (w * w) + c3 * (w * w * w)
    }

    /// Curve parameter `t` at fraction `u` of the total arc length, in O(1)
    pub fn param_at(&self, u: f32) -> f32 {
        let scaled = u.rem_euclid(1.0) * U_TABLE_SIZE as f32;
        let k = (scaled.floor() as usize).min(U_TABLE_SIZE - 1);
        let frac = scaled - k as f32;
        self.u_to_t[k] + (self.u_to_t[k + 1] - self.u_to_t[k]) * frac
    }

    /// Point at fraction `u` of the total arc length, in O(1)
    pub fn point_at(&self, u: f32) -> Vec3 {
        self.point(self.param_at(u))
    }
}

/// Invert the cumulative arc-length table for fraction `u`
fn u_to_t(lengths: &[f32], u: f32) -> f32 {
    let il = lengths.len();
    let total = lengths[il - 1];
    if total <= 0.0 {
        return u;
    }
    let target = u * total;

    // Largest i with lengths[i] <= target
    let i = lengths
        .partition_point(|&len| len <= target)
        .saturating_sub(1)
        .min(il - 2);

    let before = lengths[i];
    let segment = lengths[i + 1] - before;
    let fraction = if segment > 0.0 {
        ((target - before) / segment).clamp(0.0, 1.0)
    } else {
        0.0
    };
    (i as f32 + fraction) / (il - 1) as f32
}
