//! Camera for ray generation.

use rand::RngCore;
use srt_math::{Interval, Ray, Vec3};

use crate::random::{gen_f32, random_in_unit_disk};

/// Thin-lens camera with a shutter interval.
///
/// Rays are generated from normalized image coordinates: `(0, 0)` is the
/// bottom-left corner of the frame and `(1, 1)` the top-right.
#[derive(Debug, Clone)]
pub struct Camera {
    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    // Lens settings
    vfov: f32,       // Vertical field of view in degrees
    aspect: f32,     // Width over height
    aperture: f32,   // Lens diameter, 0 for a pinhole
    focus_dist: f32, // Distance from camera to plane of perfect focus
    shutter: Interval,

    // Cached computed values (set by initialize())
    lower_left_corner: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    lens_radius: f32,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        let mut camera = Self {
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            aspect: 16.0 / 9.0,
            aperture: 0.0,
            focus_dist: 1.0,
            shutter: Interval::SHUTTER,
            lower_left_corner: Vec3::ZERO,
            horizontal: Vec3::ZERO,
            vertical: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            lens_radius: 0.0,
        };
        camera.initialize();
        camera
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self.initialize();
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f32, aperture: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.aperture = aperture;
        self.focus_dist = focus_dist;
        self.initialize();
        self
    }

    /// Set the frame's width over height.
    pub fn with_aspect_ratio(mut self, aspect: f32) -> Self {
        self.aspect = aspect;
        self.initialize();
        self
    }

    /// Set the interval ray times are drawn from.
    pub fn with_shutter(mut self, shutter: Interval) -> Self {
        self.shutter = shutter;
        self
    }

    fn initialize(&mut self) {
        self.lens_radius = self.aperture / 2.0;

        // Calculate viewport dimensions
        let theta = self.vfov.to_radians();
        let half_height = (theta / 2.0).tan();
        let half_width = self.aspect * half_height;

        // Calculate camera basis vectors
        self.w = (self.look_from - self.look_at).normalize();
        self.u = self.vup.cross(self.w).normalize();
        self.v = self.w.cross(self.u);

        self.lower_left_corner = self.look_from
            - half_width * self.focus_dist * self.u
            - half_height * self.focus_dist * self.v
            - self.focus_dist * self.w;
        self.horizontal = 2.0 * half_width * self.focus_dist * self.u;
        self.vertical = 2.0 * half_height * self.focus_dist * self.v;
    }

    /// Generate a ray through normalized image coordinates `(s, t)`.
    pub fn get_ray(&self, s: f32, t: f32, rng: &mut dyn RngCore) -> Ray {
        let offset = if self.lens_radius <= 0.0 {
            Vec3::ZERO
        } else {
            let rd = self.lens_radius * random_in_unit_disk(rng);
            self.u * rd.x + self.v * rd.y
        };

        let origin = self.look_from + offset;
        let target = self.lower_left_corner + s * self.horizontal + t * self.vertical;
        let time = self.shutter.lerp(gen_f32(rng));

        Ray::new(origin, target - origin, time)
    }

    pub fn shutter(&self) -> Interval {
        self.shutter
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_camera_basis() {
        let camera = Camera::new()
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(90.0, 0.0, 1.0);

        assert!((camera.w - Vec3::Z).length() < 0.001);
        assert!((camera.u - Vec3::X).length() < 0.001);
        assert!((camera.v - Vec3::Y).length() < 0.001);
    }

    #[test]
    fn test_camera_ray_direction() {
        let camera = Camera::new()
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(90.0, 0.0, 1.0)
            .with_aspect_ratio(1.0);

        let mut rng = StdRng::seed_from_u64(42);

        // Center ray should point straight down -Z
        let ray = camera.get_ray(0.5, 0.5, &mut rng);
        assert!((ray.direction() - -Vec3::Z).length() < 1e-5);
        assert_eq!(ray.origin(), Vec3::ZERO);

        // 90 degree fov: the corner ray leaves at 45 degrees on both axes
        let corner = camera.get_ray(1.0, 1.0, &mut rng);
        let expected = Vec3::new(1.0, 1.0, -1.0).normalize();
        assert!((corner.direction() - expected).length() < 1e-5);

        let low = camera.get_ray(0.5, 0.0, &mut rng);
        assert!(low.direction().y < 0.0);
    }

    #[test]
    fn test_camera_aperture_jitters_origin_on_lens() {
        let camera = Camera::new()
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(40.0, 2.0, 10.0);

        let mut rng = StdRng::seed_from_u64(42);
        let mut moved = false;
        for _ in 0..32 {
            let ray = camera.get_ray(0.5, 0.5, &mut rng);
            let o = ray.origin();
            assert!(o.length() < 1.0);
            assert!(o.z.abs() < 1e-6);
            moved |= o.length() > 1e-3;

            // Every lens sample converges on the focus plane.
            let t = 10.0 / -ray.direction().z;
            assert!((ray.at(t) - Vec3::new(0.0, 0.0, -10.0)).length() < 1e-3);
        }
        assert!(moved);
    }

    #[test]
    fn test_camera_ray_time_in_shutter() {
        let camera = Camera::new().with_shutter(Interval::new(0.25, 0.5));
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let time = camera.get_ray(0.3, 0.6, &mut rng).time();
            assert!((0.25..=0.5).contains(&time));
        }
    }
}
