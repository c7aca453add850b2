//! Path-tracing integrator.

use rand::RngCore;
use srt_core::{Background, Color};
use srt_math::{Interval, Ray};

use crate::hittable::Hittable;

/// Closest distance a scattered ray may hit anything. Keeps a ray from
/// re-hitting the surface it just left.
pub const T_MIN: f32 = 1e-4;

/// Compute the color seen by a ray.
///
/// Follows the ray through at most `max_depth` surface interactions,
/// multiplying up the throughput as it goes. Paths end on a surface that
/// does not scatter (its emission), on escape (the background), or at the
/// bounce limit, where the remaining energy is treated as escaped.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    max_depth: u32,
    background: &Background,
    rng: &mut dyn RngCore,
) -> Color {
    let mut ray = *ray;
    let mut throughput = Color::ONE;

    for _ in 0..max_depth {
        let Some(rec) = world.hit(&ray, Interval::from_min(T_MIN)) else {
            return throughput * background.value(ray.direction());
        };

        // Get emission from material (for lights)
        let emission = rec.material.emitted(rec.u, rec.v, rec.p);

        match rec.material.scatter(&ray, &rec, rng) {
            Some(result) => {
                throughput *= emission + result.attenuation;
                ray = result.scattered;
            }
            None => return throughput * emission,
        }
    }

    throughput * background.value(ray.direction())
}
