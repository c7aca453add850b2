// Rigid transforms for instanced primitives.
//
// Instances move rays into the wrapped primitive's local space with the
// inverse transform and bring hit points and normals back with the forward
// one. Only translations and rotations are needed, so both are stored with
// a precomputed inverse instead of a general 4x4 matrix.

use glam::Mat3;

use crate::{Aabb, Ray, Vec3};

/// Principal axis a rotation turns about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Roll.
    X,
    /// Pitch.
    Y,
    /// Yaw.
    Z,
}

impl Axis {
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// A translation or a rotation, with its inverse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    Translation(Vec3),
    Rotation { forward: Mat3, inverse: Mat3 },
}

impl Transform {
    pub fn translation(offset: Vec3) -> Self {
        Transform::Translation(offset)
    }

    /// Rotation about a principal axis by `degrees` (right-handed).
    pub fn rotation(axis: Axis, degrees: f32) -> Self {
        let radians = degrees.to_radians();
        let forward = match axis {
            Axis::X => Mat3::from_rotation_x(radians),
            Axis::Y => Mat3::from_rotation_y(radians),
            Axis::Z => Mat3::from_rotation_z(radians),
        };
        // Orthonormal, so the transpose is the inverse.
        Transform::Rotation {
            forward,
            inverse: forward.transpose(),
        }
    }

    /// Map a world-space ray into local space. Rotations and translations
    /// preserve length, so hit distances are the same in both spaces.
    pub fn ray_to_local(&self, ray: &Ray) -> Ray {
        match self {
            Transform::Translation(offset) => {
                Ray::new(ray.origin() - *offset, ray.direction(), ray.time())
            }
            Transform::Rotation { inverse, .. } => Ray::new(
                *inverse * ray.origin(),
                *inverse * ray.direction(),
                ray.time(),
            ),
        }
    }

    pub fn point_to_world(&self, p: Vec3) -> Vec3 {
        match self {
            Transform::Translation(offset) => p + *offset,
            Transform::Rotation { forward, .. } => *forward * p,
        }
    }

    /// Normals follow rotations and ignore translations.
    pub fn normal_to_world(&self, n: Vec3) -> Vec3 {
        match self {
            Transform::Translation(_) => n,
            Transform::Rotation { forward, .. } => *forward * n,
        }
    }

    /// Re-bound a local-space box in world space by transforming its eight
    /// corners. Looser than the true bound after a rotation.
    pub fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        if aabb.is_empty() {
            return *aabb;
        }
        if let Transform::Translation(offset) = self {
            return aabb.translate(*offset);
        }

        let corners = aabb.corners();
        let first = self.point_to_world(corners[0]);
        let (min, max) = corners[1..]
            .iter()
            .map(|&corner| self.point_to_world(corner))
            .fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));

        Aabb::new(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translation_round_trip() {
        let t = Transform::translation(Vec3::new(10.0, 20.0, 30.0));
        let ray = Ray::new(Vec3::new(11.0, 22.0, 33.0), Vec3::X, 0.0);
        let local = t.ray_to_local(&ray);

        assert_eq!(local.origin(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(local.direction(), Vec3::X);
        assert_eq!(t.point_to_world(local.origin()), ray.origin());
        assert_eq!(t.normal_to_world(Vec3::Y), Vec3::Y);
    }

    #[test]
    fn test_rotation_about_z() {
        let t = Transform::rotation(Axis::Z, 90.0);
        let n = t.normal_to_world(Vec3::X);

        assert!((n - Vec3::Y).length() < 1e-5);

        let ray = Ray::new(Vec3::Y * 2.0, Vec3::Y, 0.0);
        let local = t.ray_to_local(&ray);
        assert!((local.origin() - Vec3::X * 2.0).length() < 1e-5);
        assert!((local.direction() - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_rotated_aabb_contains_rotated_corners() {
        let t = Transform::rotation(Axis::Y, 45.0);
        let local = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let world = t.transform_aabb(&local);

        for corner in local.corners() {
            let p = t.point_to_world(corner);
            assert!(world.min.cmple(p + Vec3::splat(1e-5)).all());
            assert!(world.max.cmpge(p - Vec3::splat(1e-5)).all());
        }
        // A 45 degree turn about Y widens the x extent to sqrt(2).
        assert!((world.axis_interval(0).size() - 2f32.sqrt()).abs() < 1e-4);
        assert!((world.axis_interval(1).size() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_translated_aabb() {
        let t = Transform::translation(Vec3::splat(5.0));
        let world = t.transform_aabb(&Aabb::new(Vec3::ZERO, Vec3::ONE));

        assert_eq!(world, Aabb::new(Vec3::splat(5.0), Vec3::splat(6.0)));
    }
}
