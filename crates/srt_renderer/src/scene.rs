//! Assembled scenes: primitives plus the BVH over them.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use srt_math::{Aabb, Interval, Ray};

use crate::hittable::{HitRecord, Hittable};
use crate::{BvhNode, Camera, Primitive, RenderConfig, RenderError, RenderResult};

/// A scene ready to render.
///
/// Read-only once built; render workers share it by reference.
#[derive(Debug)]
pub struct Scene {
    pub name: String,
    pub width: u32,
    pub height: u32,
    objects: Vec<Arc<Primitive>>,
    bvh: BvhNode,
    shutter: Interval,
}

impl Scene {
    /// Build the BVH over `objects`. `seed` drives the BVH's split axes, so
    /// the same seed always gives the same tree.
    pub fn new(
        name: impl Into<String>,
        width: u32,
        height: u32,
        objects: Vec<Arc<Primitive>>,
        shutter: Interval,
        seed: u64,
    ) -> RenderResult<Self> {
        let name = name.into();

        if objects.is_empty() {
            return Err(RenderError::EmptyScene);
        }
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidConfig(format!(
                "image size must be positive, got {width}x{height}"
            )));
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let bvh = BvhNode::new(&objects, shutter, &mut rng);

        log::info!("Scene '{}': {} primitives", name, objects.len());
        log::debug!(
            "BVH: {} nodes, depth {}",
            bvh.node_count(),
            bvh.depth()
        );

        Ok(Self {
            name,
            width,
            height,
            objects,
            bvh,
            shutter,
        })
    }

    pub fn objects(&self) -> &[Arc<Primitive>] {
        &self.objects
    }

    pub fn bvh(&self) -> &BvhNode {
        &self.bvh
    }

    pub fn shutter(&self) -> Interval {
        self.shutter
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Get the number of top-level primitives.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Hittable for Scene {
    #[inline]
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        self.bvh.hit(ray, ray_t)
    }

    fn bounding_box(&self, _shutter: Interval) -> Aabb {
        self.bvh.bbox()
    }
}

/// Everything needed to render one image.
#[derive(Debug)]
pub struct SceneSetup {
    pub scene: Scene,
    pub camera: Camera,
    pub config: RenderConfig,
}
