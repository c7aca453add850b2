//! Materials describe how light interacts with surfaces.

use rand::RngCore;
use srt_core::{Color, Texture};
use srt_math::{Ray, Vec3};

use crate::hittable::HitRecord;
use crate::random::{gen_f32, random_in_unit_sphere};

/// Outcome of a scattering event.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    /// Color filter applied to light arriving along `scattered`
    pub attenuation: Color,
    pub scattered: Ray,
}

/// Surface response to an incoming ray.
///
/// Materials are immutable after construction and shared by every primitive
/// that uses them. The constructors clamp colors to be non-negative, so no
/// material attenuates or emits a negative amount.
#[derive(Debug, Clone)]
pub struct Material(MaterialKind);

#[derive(Debug, Clone)]
enum MaterialKind {
    /// Diffuse surface.
    Lambertian { albedo: Texture },
    /// Specular reflector. `fuzz` in `[0, 1]` roughens the reflection.
    Metal { albedo: Color, fuzz: f32 },
    /// Glass-like refractor with index of refraction `ior`.
    Dielectric { ior: f32, tint: Color },
    /// Emitter. Never scatters.
    DiffuseLight { emit: Texture },
}

impl Material {
    pub fn lambertian(albedo: impl Into<Texture>) -> Self {
        Material(MaterialKind::Lambertian {
            albedo: albedo.into(),
        })
    }

    /// - `albedo`: The color of the metal, negative channels clamped to 0
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn metal(albedo: Color, fuzz: f32) -> Self {
        Material(MaterialKind::Metal {
            albedo: albedo.max(Color::ZERO),
            fuzz: fuzz.clamp(0.0, 1.0),
        })
    }

    /// Clear glass. `ior`: 1.0 = air, 1.5 = glass, 2.4 = diamond
    pub fn dielectric(ior: f32) -> Self {
        Self::tinted_dielectric(ior, Color::ONE)
    }

    pub fn tinted_dielectric(ior: f32, tint: Color) -> Self {
        Material(MaterialKind::Dielectric {
            ior,
            tint: tint.max(Color::ZERO),
        })
    }

    pub fn diffuse_light(emit: impl Into<Texture>) -> Self {
        Material(MaterialKind::DiffuseLight { emit: emit.into() })
    }

    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed.
    pub fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        match &self.0 {
            MaterialKind::Lambertian { albedo } => {
                let mut direction = rec.normal + random_in_unit_sphere(rng);

                // Catch degenerate scatter direction
                if direction.length_squared() < 1e-8 {
                    direction = rec.normal;
                }

                Some(ScatterResult {
                    attenuation: albedo.value(rec.u, rec.v, rec.p),
                    scattered: Ray::new(rec.p, direction, ray_in.time()),
                })
            }

            MaterialKind::Metal { albedo, fuzz } => {
                let reflected = reflect(ray_in.direction(), rec.normal);
                let direction = reflected + *fuzz * random_in_unit_sphere(rng);

                // Perturbed rays that dip below the surface are absorbed
                if direction.dot(rec.normal) > 0.0 {
                    Some(ScatterResult {
                        attenuation: *albedo,
                        scattered: Ray::new(rec.p, direction, ray_in.time()),
                    })
                } else {
                    None
                }
            }

            MaterialKind::Dielectric { ior, tint } => {
                let unit_direction = ray_in.direction();
                let d_dot_n = unit_direction.dot(rec.normal);

                // A positive dot product means the ray is leaving the medium.
                let (outward_normal, eta, cosine) = if d_dot_n > 0.0 {
                    (-rec.normal, *ior, *ior * d_dot_n)
                } else {
                    (rec.normal, 1.0 / *ior, -d_dot_n)
                };

                let direction = match refract(unit_direction, outward_normal, eta) {
                    Some(refracted) if gen_f32(rng) >= reflectance(cosine, *ior) => refracted,
                    _ => reflect(unit_direction, rec.normal),
                };

                Some(ScatterResult {
                    attenuation: *tint,
                    scattered: Ray::new(rec.p, direction, ray_in.time()),
                })
            }

            MaterialKind::DiffuseLight { .. } => None,
        }
    }

    /// Get emitted light from this material.
    ///
    /// Only lights emit; everything else returns black.
    pub fn emitted(&self, u: f32, v: f32, p: Vec3) -> Color {
        match &self.0 {
            MaterialKind::DiffuseLight { emit } => emit.value(u, v, p),
            _ => Color::ZERO,
        }
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract unit vector `uv` through a surface with normal `n` facing the
/// incoming side. `None` on total internal reflection.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, ni_over_nt: f32) -> Option<Vec3> {
    let dt = uv.dot(n);
    let discriminant = 1.0 - ni_over_nt * ni_over_nt * (1.0 - dt * dt);
    if discriminant > 0.0 {
        Some(ni_over_nt * (uv - n * dt) - n * discriminant.sqrt())
    } else {
        None
    }
}

/// Schlick's approximation for reflectance
#[inline]
pub fn reflectance(cosine: f32, ior: f32) -> f32 {
    let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}
