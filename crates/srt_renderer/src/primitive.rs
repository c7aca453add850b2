//! Closed set of scene primitives.

use srt_math::{Aabb, Interval, Ray};

use crate::hittable::{HitRecord, Hittable};
use crate::{AaBox, AaRect, BvhNode, Instance, MovingSphere, Sphere};

/// Every kind of object a scene can hold. Dispatch is a `match`, so the
/// per-ray loop never goes through a vtable.
#[derive(Debug)]
pub enum Primitive {
    Sphere(Sphere),
    MovingSphere(MovingSphere),
    Rect(AaRect),
    Box(AaBox),
    Instance(Instance),
    /// A prebuilt hierarchy, typically wrapped by an instance to place a
    /// group of objects as one.
    Bvh(BvhNode),
}

impl Hittable for Primitive {
    #[inline]
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        match self {
            Primitive::Sphere(s) => s.hit(ray, ray_t),
            Primitive::MovingSphere(s) => s.hit(ray, ray_t),
            Primitive::Rect(r) => r.hit(ray, ray_t),
            Primitive::Box(b) => b.hit(ray, ray_t),
            Primitive::Instance(i) => i.hit(ray, ray_t),
            Primitive::Bvh(bvh) => bvh.hit(ray, ray_t),
        }
    }

    fn bounding_box(&self, shutter: Interval) -> Aabb {
        match self {
            Primitive::Sphere(s) => s.bounding_box(shutter),
            Primitive::MovingSphere(s) => s.bounding_box(shutter),
            Primitive::Rect(r) => r.bounding_box(shutter),
            Primitive::Box(b) => b.bounding_box(shutter),
            Primitive::Instance(i) => i.bounding_box(shutter),
            Primitive::Bvh(bvh) => bvh.bounding_box(shutter),
        }
    }
}

macro_rules! impl_from_shape {
    ($($variant:ident($shape:ty)),* $(,)?) => {
        $(
            impl From<$shape> for Primitive {
                fn from(shape: $shape) -> Self {
                    Primitive::$variant(shape)
                }
            }
        )*
    };
}

impl_from_shape!(
    Sphere(Sphere),
    MovingSphere(MovingSphere),
    Rect(AaRect),
    Box(AaBox),
    Instance(Instance),
    Bvh(BvhNode),
);
