//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree of bounding boxes over the scene's primitives. Each split
//! sorts along a randomly chosen axis and halves the list, so the tree shape
//! depends on the generator passed to [`BvhNode::new`].

use std::sync::Arc;

use rand::{Rng, RngCore};
use srt_math::{Aabb, Interval, Ray};

use crate::hittable::{closer, HitRecord, Hittable};
use crate::Primitive;

/// BVH node - either a branch with two children or a single primitive.
#[derive(Debug)]
pub enum BvhNode {
    /// Internal node. `bbox` surrounds both children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// One primitive with its cached bounding box.
    Leaf { object: Arc<Primitive>, bbox: Aabb },
}

impl BvhNode {
    /// Build a BVH over `objects`, bounding moving primitives over `shutter`.
    ///
    /// # Panics
    ///
    /// Panics if `objects` is empty. Scene assembly rejects empty scenes
    /// before building.
    pub fn new(objects: &[Arc<Primitive>], shutter: Interval, rng: &mut dyn RngCore) -> Self {
        assert!(!objects.is_empty(), "cannot build a BVH over zero primitives");

        let mut entries: Vec<(Aabb, Arc<Primitive>)> = objects
            .iter()
            .map(|object| (object.bounding_box(shutter), object.clone()))
            .collect();

        Self::build(&mut entries, rng)
    }

    fn leaf(entry: &(Aabb, Arc<Primitive>)) -> Self {
        BvhNode::Leaf {
            object: entry.1.clone(),
            bbox: entry.0,
        }
    }

    fn branch(left: BvhNode, right: BvhNode) -> Self {
        let bbox = Aabb::surrounding(&left.bbox(), &right.bbox());
        BvhNode::Branch {
            left: Box::new(left),
            right: Box::new(right),
            bbox,
        }
    }

    fn build(entries: &mut [(Aabb, Arc<Primitive>)], rng: &mut dyn RngCore) -> Self {
        match entries.len() {
            // Both children alias the single primitive.
            1 => Self::branch(Self::leaf(&entries[0]), Self::leaf(&entries[0])),
            2 => Self::branch(Self::leaf(&entries[0]), Self::leaf(&entries[1])),
            n => {
                let axis = rng.gen_range(0..3);
                entries.sort_by(|a, b| a.0.min[axis].total_cmp(&b.0.min[axis]));

                let (left, right) = entries.split_at_mut(n / 2);
                Self::branch(Self::build(left, rng), Self::build(right, rng))
            }
        }
    }

    /// Cached bounding box of this node.
    #[inline]
    pub fn bbox(&self) -> Aabb {
        match self {
            BvhNode::Branch { bbox, .. } | BvhNode::Leaf { bbox, .. } => *bbox,
        }
    }

    /// Number of nodes, leaves included.
    pub fn node_count(&self) -> usize {
        match self {
            BvhNode::Branch { left, right, .. } => 1 + left.node_count() + right.node_count(),
            BvhNode::Leaf { .. } => 1,
        }
    }

    /// Length of the longest root-to-leaf path, counting both ends.
    pub fn depth(&self) -> usize {
        match self {
            BvhNode::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
            BvhNode::Leaf { .. } => 1,
        }
    }
}

impl Hittable for BvhNode {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        match self {
            BvhNode::Leaf { object, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }
                object.hit(ray, ray_t)
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }

                let hit_left = left.hit(ray, ray_t);

                // Only check right up to closest hit
                let right_max = hit_left.as_ref().map_or(ray_t.max, |rec| rec.t);
                let hit_right = right.hit(ray, ray_t.with_max(right_max));

                closer(hit_left, hit_right)
            }
        }
    }

    fn bounding_box(&self, _shutter: Interval) -> Aabb {
        self.bbox()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HittableList, Material, Sphere};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use srt_math::Vec3;

    fn sphere_row(n: usize) -> Vec<Arc<Primitive>> {
        let material = Arc::new(Material::lambertian(Vec3::splat(0.5)));
        (0..n)
            .map(|i| {
                Arc::new(Primitive::from(Sphere::new(
                    Vec3::new(i as f32, 0.0, -5.0),
                    0.4,
                    material.clone(),
                )))
            })
            .collect()
    }

    #[test]
    #[should_panic(expected = "zero primitives")]
    fn test_bvh_empty_panics() {
        let mut rng = StdRng::seed_from_u64(42);
        BvhNode::new(&[], Interval::SHUTTER, &mut rng);
    }

    #[test]
    fn test_bvh_single_sphere() {
        let mut rng = StdRng::seed_from_u64(42);
        let bvh = BvhNode::new(&sphere_row(1), Interval::SHUTTER, &mut rng);

        // Both children alias the single primitive
        match &bvh {
            BvhNode::Branch { left, right, .. } => {
                let (BvhNode::Leaf { object: l, .. }, BvhNode::Leaf { object: r, .. }) =
                    (left.as_ref(), right.as_ref())
                else {
                    panic!("expected two leaves");
                };
                assert!(Arc::ptr_eq(l, r));
            }
            BvhNode::Leaf { .. } => panic!("expected a branch"),
        }

        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let rec = bvh.hit(&ray, Interval::from_min(1e-4)).unwrap();
        assert!((rec.t - 4.6).abs() < 1e-4);
    }

    #[test]
    fn test_bvh_multiple_spheres() {
        let mut rng = StdRng::seed_from_u64(42);
        let bvh = BvhNode::new(&sphere_row(10), Interval::SHUTTER, &mut rng);

        // Test ray that hits sphere at x=5
        let ray = Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        let rec = bvh.hit(&ray, Interval::from_min(1e-4)).unwrap();

        // Hit point should be near z = -4.6 (sphere at z=-5, radius 0.4)
        assert!((rec.p.z - (-4.6)).abs() < 0.01);
        assert!((rec.p.x - 5.0).abs() < 0.01);

        let miss = Ray::new(Vec3::new(5.5, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        assert!(bvh.hit(&miss, Interval::from_min(1e-4)).is_none());
    }

    #[test]
    fn test_bvh_box_surrounds_children() {
        let mut rng = StdRng::seed_from_u64(7);
        let objects = sphere_row(9);
        let bvh = BvhNode::new(&objects, Interval::SHUTTER, &mut rng);

        let expected = HittableList::from(objects).bounding_box(Interval::SHUTTER);
        assert_eq!(bvh.bbox(), expected);

        fn check(node: &BvhNode) {
            if let BvhNode::Branch { left, right, bbox } = node {
                assert_eq!(*bbox, Aabb::surrounding(&left.bbox(), &right.bbox()));
                check(left);
                check(right);
            }
        }
        check(&bvh);
    }

    #[test]
    fn test_bvh_shape_follows_seed() {
        let objects = sphere_row(32);
        let a = BvhNode::new(&objects, Interval::SHUTTER, &mut StdRng::seed_from_u64(1));
        let b = BvhNode::new(&objects, Interval::SHUTTER, &mut StdRng::seed_from_u64(1));

        assert_eq!(a.node_count(), b.node_count());
        assert_eq!(a.depth(), b.depth());
        // 32 leaves under a median split: 31 branches, depth log2(32) + 1.
        assert_eq!(a.node_count(), 63);
        assert_eq!(a.depth(), 6);
    }

    #[test]
    fn test_bvh_matches_linear_scan() {
        let mut rng = StdRng::seed_from_u64(42);
        let objects = sphere_row(16);
        let bvh = BvhNode::new(&objects, Interval::SHUTTER, &mut rng);
        let list = HittableList::from(objects);

        for i in 0..200 {
            let x = -1.0 + 18.0 * (i as f32 / 200.0);
            let ray = Ray::new_simple(Vec3::new(x, 0.1, 0.0), Vec3::new(0.3, 0.0, -1.0));

            let a = bvh.hit(&ray, Interval::from_min(1e-4)).map(|r| r.t);
            let b = list.hit(&ray, Interval::from_min(1e-4)).map(|r| r.t);
            match (a, b) {
                (Some(a), Some(b)) => assert!((a - b).abs() < 1e-5),
                (None, None) => {}
                other => panic!("BVH and list disagree for ray {i}: {other:?}"),
            }
        }
    }
}
