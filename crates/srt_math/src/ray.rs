use crate::Vec3;

/// A ray in 3D space with origin, unit direction, and time.
///
/// The direction is normalized on construction and its component-wise
/// reciprocal is cached for the AABB slab test. The `time` field is the
/// shutter instant the ray samples (used by moving primitives).
///
/// A zero-length direction is not guarded against: normalizing it yields NaN
/// components and every intersection test against such a ray reports a miss.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
    inv_direction: Vec3,
    time: f32,
}

impl Ray {
    /// Create a new ray. `direction` does not need to be normalized.
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3, time: f32) -> Self {
        let direction = direction.normalize();
        Self {
            origin,
            direction,
            // IEEE division: a zero component becomes +/-inf, which the slab
            // test relies on for axis-parallel rays.
            inv_direction: direction.recip(),
            time,
        }
    }

    /// Create a ray at time 0.
    #[inline]
    pub fn new_simple(origin: Vec3, direction: Vec3) -> Self {
        Self::new(origin, direction, 0.0)
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the unit direction vector of the ray.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Get the cached reciprocal of the direction.
    #[inline]
    pub fn inv_direction(&self) -> Vec3 {
        self.inv_direction
    }

    /// Get the time value of the ray.
    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::Z, 0.0)
    }
}
