//! Scalar density fields: fractal terrain noise and analytic test surfaces.
#![forbid(unsafe_code)]

pub mod noise;
pub mod terrain;

pub use terrain::{TerrainConfig, TerrainField, TerrainParams, load_params_from_path};

/// A scalar field sampled at arbitrary world coordinates.
///
/// Implementations must be pure: the same coordinates always produce the
/// same value, so chunks regenerate bit-identically after eviction and
/// adjacent chunks sample a seamless surface.
pub trait DensityField: Send + Sync {
    fn sample(&self, x: f64, y: f64, z: f64) -> f64;
}

/// Sphere of the given radius centered at the origin; negative inside.
#[derive(Clone, Copy, Debug)]
pub struct Sphere {
    pub radius: f64,
}

impl Sphere {
    pub const fn new(radius: f64) -> Self {
        Self { radius }
    }
}

impl DensityField for Sphere {
    #[inline]
    fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        x * x + y * y + z * z - self.radius * self.radius
    }
}

/// Torus around the z axis, centered at the origin; negative inside the tube.
#[derive(Clone, Copy, Debug)]
pub struct Torus {
    pub major_radius: f64,
    pub minor_radius: f64,
}

impl Torus {
    pub const fn new(major_radius: f64, minor_radius: f64) -> Self {
        Self {
            major_radius,
            minor_radius,
        }
    }
}

impl DensityField for Torus {
    #[inline]
    fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        let rr = self.major_radius * self.major_radius;
        let tr = self.minor_radius * self.minor_radius;
        let q = x * x + y * y + z * z + rr - tr;
        q * q - 4.0 * rr * (x * x + y * y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_sign_convention() {
        let s = Sphere::new(5.0);
        assert!(s.sample(0.0, 0.0, 0.0) < 0.0);
        assert_eq!(s.sample(3.0, 4.0, 0.0), 0.0);
        assert!(s.sample(6.0, 0.0, 0.0) > 0.0);
    }

    #[test]
    fn torus_surface_and_hole() {
        let t = Torus::new(5.0, 2.0);
        // Outer equator point lies on the surface.
        assert_eq!(t.sample(7.0, 0.0, 0.0), 0.0);
        // Tube center ring is the most-inside locus.
        assert!(t.sample(5.0, 0.0, 0.0) < 0.0);
        // The hole in the middle is outside.
        assert!(t.sample(0.0, 0.0, 0.0) > 0.0);
    }
}
