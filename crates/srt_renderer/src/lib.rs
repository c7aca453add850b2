//! SRT Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer over spheres, axis-aligned rectangles and boxes,
//! with instancing, a BVH, and bucketed parallel rendering.

mod aa_rect;
mod bucket;
mod bvh;
mod camera;
mod error;
mod hittable;
mod instance;
mod integrator;
mod material;
mod output;
mod primitive;
pub mod random;
mod renderer;
mod scene;
mod scene_builder;
pub mod scenes;
mod sphere;

pub use aa_rect::{AaBox, AaRect, Plane};
pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use bvh::BvhNode;
pub use camera::Camera;
pub use error::{RenderError, RenderResult};
pub use hittable::{closer, HitRecord, Hittable, HittableList};
pub use instance::Instance;
pub use integrator::{ray_color, T_MIN};
pub use material::{reflect, reflectance, refract, Material, ScatterResult};
pub use output::{save_image, write_ppm};
pub use primitive::Primitive;
pub use renderer::{
    color_to_rgb, linear_to_gamma, pixel_seed, render, render_pixel, ImageBuffer, RenderConfig,
};
pub use scene::{Scene, SceneSetup};
pub use scene_builder::build_camera;
pub use scenes::BuiltinScene;
pub use sphere::{MovingSphere, Sphere};

/// Re-export Vec3 and common math types from srt_math
pub use srt_math::{Aabb, Axis, Interval, Ray, Transform, Vec3};
pub use srt_core::{Background, Color, Texture};
