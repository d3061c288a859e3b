//! Dot globe projection.
//!
//! Dots live on the surface of a sphere of radius `R`, translated so that its
//! near pole touches `z = 0`. Each frame the sphere is turned about the
//! vertical axis and every dot is projected through a pinhole camera at
//! distance `F`, which also scales the dot's radius.

use std::f64::consts::TAU;

use rand::Rng;

/// Globe radius as a fraction of the surface's smaller side.
pub const GLOBE_RADIUS_FACTOR: f64 = 0.7;
/// Camera distance as a fraction of the surface's smaller side.
pub const FIELD_OF_VIEW_FACTOR: f64 = 0.8;
/// Unscaled dot radius as a fraction of the surface's smaller side.
pub const DOT_RADIUS_FACTOR: f64 = 0.005;

/// Placement of one dot in spherical angles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DotSpec {
    /// Angle from the +z axis, `[0, π]`.
    pub azimuth: f64,
    /// Angle around the z axis, `[0, 2π)`.
    pub polar: f64,
}

impl DotSpec {
    pub fn new(azimuth: f64, polar: f64) -> Self {
        Self { azimuth, polar }
    }

    /// Draws a point uniformly over the sphere's surface.
    ///
    /// The azimuth comes from `acos(2u - 1)` rather than a uniform angle, which
    /// would bunch dots up around the poles.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let u: f64 = rng.gen();
        let azimuth = (2.0 * u - 1.0).acos();
        let polar = rng.gen::<f64>() * TAU;
        Self { azimuth, polar }
    }
}

pub fn generate_dots<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<DotSpec> {
    (0..count).map(|_| DotSpec::sample(rng)).collect()
}

/// Angle of the globe about its vertical axis, kept in `[0, 2π)`.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Rotation(f64);

impl Rotation {
    pub fn new(radians: f64) -> Self {
        Self(wrap_angle(radians))
    }

    /// Rotation reached after `progress` revolutions.
    pub fn from_progress(progress: f64) -> Self {
        Self::new(progress * TAU)
    }

    pub fn advance(self, delta: f64) -> Self {
        Self::new(self.0 + delta)
    }

    pub fn radians(&self) -> f64 {
        self.0
    }
}

fn wrap_angle(radians: f64) -> f64 {
    if !radians.is_finite() {
        return 0.0;
    }
    let wrapped = radians.rem_euclid(TAU);
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// A dot after rotation and projection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectedPoint {
    pub screen_x: f64,
    pub screen_y: f64,
    pub radius: f64,
    /// Rotated z, `[-2R, 0]`; more negative is further from the camera.
    pub depth: f64,
}

/// Projection constants derived from the size of the render surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlobeGeometry {
    pub width: f64,
    pub height: f64,
    pub radius: f64,
    pub field_of_view: f64,
    pub dot_radius: f64,
}

impl GlobeGeometry {
    /// `None` when either side is not a positive finite length.
    pub fn for_surface(width: f64, height: f64) -> Option<Self> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return None;
        }
        let min_dimension = width.min(height);
        Some(Self {
            width,
            height,
            radius: min_dimension * GLOBE_RADIUS_FACTOR,
            field_of_view: min_dimension * FIELD_OF_VIEW_FACTOR,
            dot_radius: min_dimension * DOT_RADIUS_FACTOR,
        })
    }

    /// Perspective scale at rotated depth `z`.
    pub fn scale_at(&self, z: f64) -> f64 {
        self.field_of_view / (self.field_of_view - z)
    }

    pub fn project(&self, dot: &DotSpec, rotation: Rotation) -> ProjectedPoint {
        let r = self.radius;
        let (sin_az, cos_az) = dot.azimuth.sin_cos();
        let (sin_pol, cos_pol) = dot.polar.sin_cos();

        let x = r * sin_az * cos_pol;
        let y = r * sin_az * sin_pol;
        let z = r * cos_az - r;

        // about the y axis, around the sphere's center at z = -R
        let (sin_t, cos_t) = rotation.radians().sin_cos();
        let rotated_x = cos_t * x + sin_t * (z + r);
        let rotated_z = -sin_t * x + cos_t * (z + r) - r;

        let scale = self.scale_at(rotated_z);
        ProjectedPoint {
            screen_x: rotated_x * scale + self.width / 2.0,
            screen_y: y * scale + self.height / 2.0,
            radius: self.dot_radius * scale,
            depth: rotated_z,
        }
    }

    pub fn project_all(&self, dots: &[DotSpec], rotation: Rotation) -> Vec<ProjectedPoint> {
        dots.iter().map(|dot| self.project(dot, rotation)).collect()
    }

    /// Smallest and largest scale any dot can get: the far and near poles.
    pub fn scale_range(&self) -> (f64, f64) {
        (self.scale_at(-2.0 * self.radius), self.scale_at(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPS: f64 = 1e-9;

    fn square(side: f64) -> GlobeGeometry {
        GlobeGeometry::for_surface(side, side).unwrap()
    }

    #[test]
    fn test_geometry_factors() {
        let g = GlobeGeometry::for_surface(400.0, 200.0).unwrap();
        assert!((g.radius - 140.0).abs() < EPS);
        assert!((g.field_of_view - 160.0).abs() < EPS);
        assert!((g.dot_radius - 1.0).abs() < EPS);
    }

    #[test]
    fn test_geometry_rejects_empty_surface() {
        assert!(GlobeGeometry::for_surface(0.0, 100.0).is_none());
        assert!(GlobeGeometry::for_surface(100.0, -1.0).is_none());
        assert!(GlobeGeometry::for_surface(f64::NAN, 100.0).is_none());
    }

    #[test]
    fn test_equator_dot_at_zero_rotation() {
        let g = square(100.0);
        let p = g.project(&DotSpec::new(FRAC_PI_2, 0.0), Rotation::new(0.0));

        // z = R cos(π/2) - R = -R, unchanged by a zero rotation
        let z = -g.radius;
        let scale = g.field_of_view / (g.field_of_view - z);
        assert!((p.depth - z).abs() < EPS);
        assert!((p.screen_x - (50.0 + g.radius * scale)).abs() < EPS);
        assert!((p.screen_y - 50.0).abs() < EPS);
        assert!((p.radius - g.dot_radius * scale).abs() < EPS);
    }

    #[test]
    fn test_near_pole_projects_to_center_at_unit_scale() {
        let g = square(100.0);
        let p = g.project(&DotSpec::new(0.0, 1.3), Rotation::new(0.0));
        assert!((p.screen_x - 50.0).abs() < EPS);
        assert!((p.screen_y - 50.0).abs() < EPS);
        assert!(p.depth.abs() < EPS);
        assert!((p.radius - g.dot_radius).abs() < EPS);
    }

    #[test]
    fn test_half_turn_moves_near_pole_to_far_pole() {
        let g = square(100.0);
        let p = g.project(&DotSpec::new(0.0, 0.0), Rotation::new(PI));
        assert!((p.depth + 2.0 * g.radius).abs() < EPS);
        let (far, _) = g.scale_range();
        assert!((p.radius - g.dot_radius * far).abs() < EPS);
    }

    #[test]
    fn test_quarter_turn_swings_equator_dot_to_near_pole() {
        let g = square(100.0);
        // +x equator point rotates to the near pole under -π/2
        let p = g.project(&DotSpec::new(FRAC_PI_2, 0.0), Rotation::new(-FRAC_PI_2));
        assert!(p.depth.abs() < 1e-6);
        assert!((p.screen_x - 50.0).abs() < 1e-6);
    }

    #[test]
    fn test_rotation_leaves_y_alone() {
        let g = square(80.0);
        let dot = DotSpec::new(1.1, 2.0);
        let a = g.project(&dot, Rotation::new(0.0));
        let b = g.project(&dot, Rotation::new(2.5));
        let ya = (a.screen_y - 40.0) / g.scale_at(a.depth);
        let yb = (b.screen_y - 40.0) / g.scale_at(b.depth);
        assert!((ya - yb).abs() < 1e-9);
    }

    #[test]
    fn test_depth_stays_within_sphere() {
        let g = square(120.0);
        let mut rng = StdRng::seed_from_u64(7);
        let dots = generate_dots(&mut rng, 500);
        for step in 0..16 {
            let rotation = Rotation::from_progress(step as f64 / 16.0);
            for p in g.project_all(&dots, rotation) {
                assert!(p.depth <= EPS && p.depth >= -2.0 * g.radius - EPS);
                assert!(p.radius > 0.0 && p.radius <= g.dot_radius + EPS);
            }
        }
    }

    #[test]
    fn test_project_all_preserves_order_and_len() {
        let g = square(64.0);
        let dots = vec![DotSpec::new(0.3, 0.1), DotSpec::new(2.0, 4.0)];
        let rotation = Rotation::new(0.4);
        let projected = g.project_all(&dots, rotation);
        assert_eq!(projected.len(), 2);
        assert_eq!(projected[1], g.project(&dots[1], rotation));
    }

    #[test]
    fn test_samples_fall_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for dot in generate_dots(&mut rng, 2000) {
            assert!((0.0..=PI).contains(&dot.azimuth));
            assert!((0.0..TAU).contains(&dot.polar));
        }
    }

    #[test]
    fn test_rotation_wraps() {
        assert!((Rotation::new(TAU + 0.5).radians() - 0.5).abs() < EPS);
        assert!((Rotation::new(-0.5).radians() - (TAU - 0.5)).abs() < EPS);
        assert!((Rotation::from_progress(1.25).radians() - FRAC_PI_2).abs() < EPS);
        assert_eq!(Rotation::new(f64::INFINITY).radians(), 0.0);
        let r = Rotation::new(TAU - 0.1).advance(0.2);
        assert!((r.radians() - 0.1).abs() < EPS);
    }
}
