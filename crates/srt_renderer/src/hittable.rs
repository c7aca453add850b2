//! Hittable trait and HitRecord for ray-object intersection.

use std::sync::Arc;

use srt_math::{Aabb, Interval, Ray, Vec3};

use crate::{Material, Primitive};

/// Record of a ray-object intersection.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord<'a> {
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Point of intersection
    pub p: Vec3,
    /// Geometric normal as the primitive defines it. Not flipped toward the
    /// ray: dielectrics use its orientation to tell entering from leaving.
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: &'a Material,
    /// Surface (texture) coordinates
    pub u: f32,
    pub v: f32,
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Closest intersection with parameter strictly inside `ray_t`.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>>;

    /// Box enclosing the object for every time in `shutter`.
    fn bounding_box(&self, shutter: Interval) -> Aabb;
}

/// Keep whichever of two candidate hits is closer.
#[inline]
pub fn closer<'a>(a: Option<HitRecord<'a>>, b: Option<HitRecord<'a>>) -> Option<HitRecord<'a>> {
    match (a, b) {
        (Some(a), Some(b)) => Some(if b.t < a.t { b } else { a }),
        (a, None) => a,
        (None, b) => b,
    }
}

/// A list of hittable objects, tested one after another.
///
/// This is the brute-force counterpart of [`crate::BvhNode`].
#[derive(Debug, Default)]
pub struct HittableList {
    objects: Vec<Arc<Primitive>>,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: impl Into<Primitive>) {
        self.objects.push(Arc::new(object.into()));
    }

    pub fn objects(&self) -> &[Arc<Primitive>] {
        &self.objects
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl From<Vec<Arc<Primitive>>> for HittableList {
    fn from(objects: Vec<Arc<Primitive>>) -> Self {
        Self { objects }
    }
}

impl Hittable for HittableList {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let mut closest = None;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            if let Some(rec) = object.hit(ray, ray_t.with_max(closest_so_far)) {
                closest_so_far = rec.t;
                closest = Some(rec);
            }
        }

        closest
    }

    fn bounding_box(&self, shutter: Interval) -> Aabb {
        self.objects.iter().fold(Aabb::EMPTY, |acc, object| {
            Aabb::surrounding(&acc, &object.bounding_box(shutter))
        })
    }
}
