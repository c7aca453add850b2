//! Rotated and translated instances of shared geometry.
//!
//! The wrapped primitive stays in its local space. Rays are moved into that
//! space, and hit points and normals are moved back out, so one primitive
//! (or a whole BVH) can appear in the scene under any number of transforms.

use std::sync::Arc;

use srt_math::{Aabb, Axis, Interval, Ray, Transform, Vec3};

use crate::hittable::{HitRecord, Hittable};
use crate::Primitive;

/// A primitive placed in the world through one rigid transform.
///
/// Composite placements nest instances: the innermost transform is applied
/// first.
#[derive(Debug, Clone)]
pub struct Instance {
    object: Arc<Primitive>,
    transform: Transform,
}

impl Instance {
    pub fn new(object: impl Into<Arc<Primitive>>, transform: Transform) -> Self {
        Self {
            object: object.into(),
            transform,
        }
    }

    pub fn translate(object: impl Into<Arc<Primitive>>, offset: Vec3) -> Self {
        Self::new(object, Transform::translation(offset))
    }

    /// Rotate by `degrees` about `axis`: X roll, Y pitch, Z yaw.
    pub fn rotate(object: impl Into<Arc<Primitive>>, axis: Axis, degrees: f32) -> Self {
        Self::new(object, Transform::rotation(axis, degrees))
    }

    pub fn object(&self) -> &Primitive {
        &self.object
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }
}

impl Hittable for Instance {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        // Rigid transforms keep unit directions unit, so t carries over.
        let local_ray = self.transform.ray_to_local(ray);
        let mut rec = self.object.hit(&local_ray, ray_t)?;

        rec.p = self.transform.point_to_world(rec.p);
        rec.normal = self.transform.normal_to_world(rec.normal);
        Some(rec)
    }

    fn bounding_box(&self, shutter: Interval) -> Aabb {
        self.transform
            .transform_aabb(&self.object.bounding_box(shutter))
    }
}
