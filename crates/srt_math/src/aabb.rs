use crate::{Interval, Ray, Vec3};

/// Axis-Aligned Bounding Box used to prune ray tests in the BVH.
///
/// The box is closed: `[min, max]` on every axis. Zero-thickness boxes are
/// legal (planar primitives produce them before padding). An empty box has
/// `min = +inf` and `max = -inf` and is the identity for [`Aabb::surrounding`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create an AABB from its min and max corners, taken as given.
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB from two arbitrary opposite corners.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self::new(a.min(b), a.max(b))
    }

    /// Create an AABB that surrounds two other AABBs: component-wise min of
    /// the mins and max of the maxes.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self::new(box0.min.min(box1.min), box0.max.max(box1.max))
    }

    /// Method form of [`Aabb::surrounding`].
    pub fn surrounding_box(&self, other: &Aabb) -> Self {
        Self::surrounding(self, other)
    }

    /// Get the extent along a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, axis: usize) -> Interval {
        Interval::new(self.min[axis], self.max[axis])
    }

    /// Slab test: does the ray cross the box somewhere inside `ray_t`?
    ///
    /// Relies on IEEE semantics for axis-parallel rays: a zero direction
    /// component gives an infinite reciprocal, which either leaves the
    /// interval untouched (origin inside the slab) or empties it.
    #[inline]
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> bool {
        self.hit_interval(ray, ray_t).is_some()
    }

    /// Slab test returning the clipped `[entry, exit]` parameter range.
    pub fn hit_interval(&self, ray: &Ray, mut ray_t: Interval) -> Option<Interval> {
        let origin = ray.origin();
        let inv_dir = ray.inv_direction();

        for axis in 0..3 {
            let mut t0 = (self.min[axis] - origin[axis]) * inv_dir[axis];
            let mut t1 = (self.max[axis] - origin[axis]) * inv_dir[axis];
            if inv_dir[axis] < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max <= ray_t.min {
                return None;
            }
        }

        Some(ray_t)
    }

    /// Overlap test used by space-partitioning structures: per axis the
    /// signed product `(a.min - b.min) * (a.max - b.max)` must not be positive.
    pub fn collide(&self, other: &Aabb) -> bool {
        let diff = (self.min - other.min) * (self.max - other.max);
        diff.x <= 0.0 && diff.y <= 0.0 && diff.z <= 0.0
    }

    /// True when `p` lies inside or on the boundary of the box.
    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// The eight corners, bit `i` of the index selecting max on axis `i`.
    pub fn corners(&self) -> [Vec3; 8] {
        std::array::from_fn(|i| {
            Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            )
        })
    }

    /// Grow each axis thinner than `delta` to exactly `delta`, centered on
    /// the original extent.
    pub fn padded(&self, delta: f32) -> Aabb {
        let mut min = self.min;
        let mut max = self.max;
        for axis in 0..3 {
            let interval = self.axis_interval(axis);
            if interval.size() < delta {
                let grown = interval.expand(delta - interval.size());
                min[axis] = grown.min;
                max[axis] = grown.max;
            }
        }
        Aabb::new(min, max)
    }

    /// Translate (move) the AABB by an offset vector.
    pub fn translate(&self, offset: Vec3) -> Aabb {
        Aabb::new(self.min + offset, self.max + offset)
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// True for the empty box (and any box inverted on some axis).
    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    pub const EMPTY: Aabb = Aabb {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };

}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb::new(Vec3::ZERO, Vec3::ONE)
    }

    #[test]
    fn test_aabb_hit_head_on() {
        let ray = Ray::new(Vec3::new(0.5, 0.5, -5.0), Vec3::Z, 0.0);
        let range = unit_box()
            .hit_interval(&ray, Interval::from_min(0.0))
            .expect("ray through the box must hit");

        assert!(range.contains(5.0));
        assert!((range.min - 5.0).abs() < 1e-5);
        assert!((range.max - 6.0).abs() < 1e-5);
    }

    #[test]
    fn test_aabb_parallel_ray_misses() {
        let ray = Ray::new(Vec3::new(2.0, 2.0, 2.0), Vec3::X, 0.0);
        assert!(!unit_box().hit(&ray, Interval::from_min(0.0)));
    }

    #[test]
    fn test_aabb_parallel_ray_inside_slab_hits() {
        // Direction has zero y and z, origin inside those slabs.
        let ray = Ray::new(Vec3::new(-3.0, 0.5, 0.5), Vec3::X, 0.0);
        assert!(unit_box().hit(&ray, Interval::from_min(0.0)));
    }

    #[test]
    fn test_aabb_respects_ray_interval() {
        let ray = Ray::new(Vec3::new(0.5, 0.5, -5.0), Vec3::Z, 0.0);
        assert!(!unit_box().hit(&ray, Interval::new(0.0, 4.0)));

        let away = Ray::new(Vec3::new(0.5, 0.5, -5.0), -Vec3::Z, 0.0);
        assert!(!unit_box().hit(&away, Interval::from_min(0.0)));
    }

    #[test]
    fn test_aabb_surrounding_is_tight() {
        let a = Aabb::new(Vec3::new(-1.0, 2.0, 0.0), Vec3::new(1.0, 3.0, 0.5));
        let b = Aabb::new(Vec3::new(0.0, -4.0, 0.25), Vec3::new(5.0, 2.5, 0.25));
        let s = a.surrounding_box(&b);

        for corner in a.corners().iter().chain(b.corners().iter()) {
            assert!(s.contains(*corner));
        }
        // Every face of the union touches one of the inputs.
        assert_eq!(s.min, Vec3::new(-1.0, -4.0, 0.0));
        assert_eq!(s.max, Vec3::new(5.0, 3.0, 0.5));
    }

    #[test]
    fn test_aabb_empty_is_union_identity() {
        let b = unit_box();
        assert_eq!(Aabb::surrounding(&Aabb::EMPTY, &b), b);
        assert!(Aabb::EMPTY.is_empty());
        assert!(!b.is_empty());
    }

    #[test]
    fn test_aabb_collide() {
        let a = unit_box();
        let inside = Aabb::new(Vec3::splat(0.25), Vec3::splat(0.75));
        let far = Aabb::new(Vec3::splat(3.0), Vec3::splat(4.0));

        assert!(a.collide(&inside));
        assert!(inside.collide(&a));
        assert!(!a.collide(&far));
    }

    #[test]
    fn test_aabb_padded_only_grows_thin_axes() {
        let flat = Aabb::new(Vec3::new(0.0, 0.0, 2.0), Vec3::new(1.0, 1.0, 2.0));
        let padded = flat.padded(1e-3);

        assert_eq!(padded.min.x, 0.0);
        assert_eq!(padded.max.y, 1.0);
        assert!((padded.axis_interval(2).size() - 1e-3).abs() < 1e-6);
        assert!(padded.contains(Vec3::new(0.5, 0.5, 2.0)));
    }

    #[test]
    fn test_aabb_corners_and_centroid() {
        let b = Aabb::from_points(Vec3::new(2.0, 0.0, 4.0), Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(b.centroid(), Vec3::new(1.0, 1.0, 2.0));
        assert_eq!(b.corners()[0], Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(b.corners()[7], Vec3::new(2.0, 2.0, 4.0));
        assert_eq!(b.translate(Vec3::X).min, Vec3::new(1.0, 0.0, 0.0));
    }
}
