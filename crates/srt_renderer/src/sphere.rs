//! Sphere primitives for ray tracing.

use std::f32::consts::PI;
use std::sync::Arc;

use srt_math::{Aabb, Interval, Ray, Vec3};

use crate::hittable::{HitRecord, Hittable};
use crate::Material;

/// A sphere primitive.
#[derive(Debug, Clone)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<Material>,
}

impl Sphere {
    /// Create a new sphere. The radius must be positive; scene loading
    /// rejects anything else before it gets here.
    pub fn new(center: Vec3, radius: f32, material: Arc<Material>) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        hit_sphere(self.center, self.radius, &self.material, ray, ray_t)
    }

    fn bounding_box(&self, _shutter: Interval) -> Aabb {
        sphere_box(self.center, self.radius)
    }
}

/// A sphere whose center moves linearly from `center0` at `time0` to
/// `center1` at `time1`. Rays sample it at their own time.
#[derive(Debug, Clone)]
pub struct MovingSphere {
    center0: Vec3,
    center1: Vec3,
    time: Interval,
    radius: f32,
    material: Arc<Material>,
}

impl MovingSphere {
    pub fn new(
        center0: Vec3,
        center1: Vec3,
        time: Interval,
        radius: f32,
        material: Arc<Material>,
    ) -> Self {
        Self {
            center0,
            center1,
            time,
            radius,
            material,
        }
    }

    /// Center at `time`; extrapolates outside `[time0, time1]`.
    pub fn center(&self, time: f32) -> Vec3 {
        let f = (time - self.time.min) / self.time.size();
        self.center0 + f * (self.center1 - self.center0)
    }
}

impl Hittable for MovingSphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        hit_sphere(
            self.center(ray.time()),
            self.radius,
            &self.material,
            ray,
            ray_t,
        )
    }

    fn bounding_box(&self, shutter: Interval) -> Aabb {
        let box0 = sphere_box(self.center(shutter.min), self.radius);
        let box1 = sphere_box(self.center(shutter.max), self.radius);
        Aabb::surrounding(&box0, &box1)
    }
}

fn sphere_box(center: Vec3, radius: f32) -> Aabb {
    let rvec = Vec3::splat(radius);
    Aabb::from_points(center - rvec, center + rvec)
}

/// Ray/sphere intersection shared by both sphere kinds.
///
/// Solves `a t^2 + b t + c = 0` with the cancellation-free form
/// `q = -(b + sign(b) sqrt(disc)) / 2`, roots `q / a` and `c / q`.
fn hit_sphere<'a>(
    center: Vec3,
    radius: f32,
    material: &'a Material,
    ray: &Ray,
    ray_t: Interval,
) -> Option<HitRecord<'a>> {
    let oc = ray.origin() - center;
    let a = ray.direction().length_squared();
    let b = 2.0 * oc.dot(ray.direction());
    let c = oc.length_squared() - radius * radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant <= 0.0 {
        return None;
    }

    let q = -0.5 * (b + b.signum() * discriminant.sqrt());
    let (r0, r1) = (q / a, c / q);
    let (near, far) = if r0 <= r1 { (r0, r1) } else { (r1, r0) };

    // Find the nearest root in the acceptable range
    let t = [near, far].into_iter().find(|&t| ray_t.surrounds(t))?;

    let p = ray.at(t);
    let normal = (p - center) / radius;
    let (u, v) = sphere_uv(normal);

    Some(HitRecord {
        t,
        p,
        normal,
        material,
        u,
        v,
    })
}

/// Spherical texture coordinates for a point on the unit sphere.
fn sphere_uv(p: Vec3) -> (f32, f32) {
    let phi = p.z.atan2(p.x);
    let theta = p.y.clamp(-1.0, 1.0).asin();

    let u = 1.0 - (phi + PI) / (2.0 * PI);
    let v = (theta + PI / 2.0) / PI;
    (u, v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray() -> Arc<Material> {
        Arc::new(Material::lambertian(Vec3::splat(0.5)))
    }

    #[test]
    fn test_sphere_hit_nearest_root() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, gray());
        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);

        let rec = sphere.hit(&ray, Interval::from_min(1e-4)).unwrap();
        assert!((rec.t - 4.0).abs() < 1e-5);
        assert!((rec.p - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
        assert!((rec.normal - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_sphere_hit_from_inside_uses_far_root() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, gray());
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::X);

        let rec = sphere.hit(&ray, Interval::from_min(1e-4)).unwrap();
        assert!((rec.t - 1.0).abs() < 1e-5);
        // Outward normal, same side as the ray direction.
        assert!(rec.normal.dot(ray.direction()) > 0.0);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, gray());

        // Ray pointing away from sphere
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::Y);
        assert!(sphere.hit(&ray, Interval::from_min(1e-4)).is_none());

        // Tangent ray: zero discriminant counts as a miss
        let tangent = Ray::new_simple(Vec3::new(0.5, 0.0, 0.0), -Vec3::Z);
        assert!(sphere.hit(&tangent, Interval::from_min(1e-4)).is_none());
    }

    #[test]
    fn test_sphere_respects_interval() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, gray());
        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);

        assert!(sphere.hit(&ray, Interval::new(1e-4, 3.0)).is_none());
        // Near root excluded, far root accepted.
        let rec = sphere.hit(&ray, Interval::new(4.5, 10.0)).unwrap();
        assert!((rec.t - 6.0).abs() < 1e-5);
    }

    #[test]
    fn test_sphere_uv() {
        let (u, v) = sphere_uv(Vec3::Y);
        assert!((v - 1.0).abs() < 1e-6);
        assert!((0.0..=1.0).contains(&u));

        let (u, v) = sphere_uv(-Vec3::X);
        assert!((v - 0.5).abs() < 1e-6);
        assert!(u.abs() < 1e-6 || (u - 1.0).abs() < 1e-6);

        let (u, _) = sphere_uv(Vec3::X);
        assert!((u - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_moving_sphere_follows_ray_time() {
        let sphere = MovingSphere::new(
            Vec3::ZERO,
            Vec3::new(4.0, 0.0, 0.0),
            Interval::SHUTTER,
            0.5,
            gray(),
        );

        let early = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, 0.0);
        let late = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, 1.0);
        assert!(sphere.hit(&early, Interval::from_min(1e-4)).is_some());
        assert!(sphere.hit(&late, Interval::from_min(1e-4)).is_none());

        let late_shifted = Ray::new(Vec3::new(4.0, 0.0, -5.0), Vec3::Z, 1.0);
        assert!(sphere.hit(&late_shifted, Interval::from_min(1e-4)).is_some());

        let bbox = sphere.bounding_box(Interval::SHUTTER);
        assert_eq!(bbox.min, Vec3::new(-0.5, -0.5, -0.5));
        assert_eq!(bbox.max, Vec3::new(4.5, 0.5, 0.5));
    }
}
