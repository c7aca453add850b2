//! Axis-aligned rectangles and boxes built from them.

use std::sync::Arc;

use srt_math::{Aabb, Interval, Ray, Vec3};

use crate::hittable::{HitRecord, Hittable};
use crate::Material;

/// Half-thickness given to a rectangle's bounding box along its flat axis,
/// so the box has volume for the slab test.
const RECT_PADDING: f32 = 0.0001;

/// Plane a rectangle lies in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    Xy,
    Xz,
    Yz,
}

impl Plane {
    /// `(first, second, normal)` axis indices.
    #[inline]
    pub fn axes(self) -> (usize, usize, usize) {
        match self {
            Plane::Xy => (0, 1, 2),
            Plane::Xz => (0, 2, 1),
            Plane::Yz => (1, 2, 0),
        }
    }
}

/// A rectangle spanning `a` on the plane's first axis and `b` on its second,
/// at coordinate `k` on the remaining one.
///
/// The normal is the positive unit vector of the remaining axis, negated
/// when `flip_normal` is set.
#[derive(Debug, Clone)]
pub struct AaRect {
    plane: Plane,
    a: Interval,
    b: Interval,
    k: f32,
    normal: Vec3,
    material: Arc<Material>,
}

impl AaRect {
    pub fn new(
        plane: Plane,
        a: Interval,
        b: Interval,
        k: f32,
        flip_normal: bool,
        material: Arc<Material>,
    ) -> Self {
        let (_, _, k_axis) = plane.axes();
        let mut normal = Vec3::ZERO;
        normal[k_axis] = if flip_normal { -1.0 } else { 1.0 };

        Self {
            plane,
            a,
            b,
            k,
            normal,
            material,
        }
    }

    pub fn plane(&self) -> Plane {
        self.plane
    }

    pub fn k(&self) -> f32 {
        self.k
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }
}

impl Hittable for AaRect {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let (a_axis, b_axis, k_axis) = self.plane.axes();
        let origin = ray.origin();

        // A ray parallel to the plane gives +/-inf or NaN, both rejected here.
        let t = (self.k - origin[k_axis]) * ray.inv_direction()[k_axis];
        if !ray_t.surrounds(t) {
            return None;
        }

        let p = ray.at(t);
        if !self.a.contains(p[a_axis]) || !self.b.contains(p[b_axis]) {
            return None;
        }

        Some(HitRecord {
            t,
            p,
            normal: self.normal,
            material: &self.material,
            u: (p[a_axis] - self.a.min) / self.a.size(),
            v: (p[b_axis] - self.b.min) / self.b.size(),
        })
    }

    fn bounding_box(&self, _shutter: Interval) -> Aabb {
        let (a_axis, b_axis, k_axis) = self.plane.axes();
        let mut min = Vec3::ZERO;
        let mut max = Vec3::ZERO;
        min[a_axis] = self.a.min;
        max[a_axis] = self.a.max;
        min[b_axis] = self.b.min;
        max[b_axis] = self.b.max;
        min[k_axis] = self.k - RECT_PADDING;
        max[k_axis] = self.k + RECT_PADDING;
        Aabb::new(min, max)
    }
}

/// An axis-aligned box made of six outward-facing rectangles.
#[derive(Debug, Clone)]
pub struct AaBox {
    min: Vec3,
    max: Vec3,
    sides: [AaRect; 6],
}

impl AaBox {
    pub fn new(min: Vec3, max: Vec3, material: Arc<Material>) -> Self {
        let x = Interval::new(min.x, max.x);
        let y = Interval::new(min.y, max.y);
        let z = Interval::new(min.z, max.z);
        let side = |plane, a, b, k, flip| AaRect::new(plane, a, b, k, flip, material.clone());

        let sides = [
            side(Plane::Xy, x, y, max.z, false),
            side(Plane::Xy, x, y, min.z, true),
            side(Plane::Xz, x, z, max.y, false),
            side(Plane::Xz, x, z, min.y, true),
            side(Plane::Yz, y, z, max.x, false),
            side(Plane::Yz, y, z, min.x, true),
        ];

        Self { min, max, sides }
    }

    pub fn sides(&self) -> &[AaRect; 6] {
        &self.sides
    }
}

impl Hittable for AaBox {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let mut closest = None;
        let mut closest_so_far = ray_t.max;

        for side in &self.sides {
            if let Some(rec) = side.hit(ray, ray_t.with_max(closest_so_far)) {
                closest_so_far = rec.t;
                closest = Some(rec);
            }
        }

        closest
    }

    /// The box's own corners, not the union of the padded faces.
    fn bounding_box(&self, _shutter: Interval) -> Aabb {
        Aabb::new(self.min, self.max)
    }
}
