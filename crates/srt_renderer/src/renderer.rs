//! Render driver.
//!
//! Implements Monte Carlo path tracing with:
//! - Anti-aliasing via jittered multi-sampling
//! - Square-root gamma correction
//! - Bucketed parallel rendering on the rayon pool

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use srt_core::scene::RenderSettings;
use srt_core::{Background, Color};
use srt_math::Interval;

use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::integrator::ray_color;
use crate::random::gen_f32;
use crate::{Camera, RenderError, RenderResult, Scene};

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum number of surface interactions per path
    pub max_depth: u32,
    /// Radiance of rays that leave the scene
    pub background: Background,
    /// Seeds the per-pixel generators and the BVH split axes
    pub seed: u64,
    /// Edge length of a render bucket in pixels
    pub bucket_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 100,
            max_depth: 50,
            background: Background::BLACK,
            seed: 0,
            bucket_size: DEFAULT_BUCKET_SIZE,
        }
    }
}

impl RenderConfig {
    /// Overlay the values a scene file or the command line sets explicitly.
    pub fn apply(&mut self, settings: &RenderSettings) {
        if let Some(samples) = settings.samples_per_pixel {
            self.samples_per_pixel = samples;
        }
        if let Some(depth) = settings.max_depth {
            self.max_depth = depth;
        }
        if let Some(background) = settings.background {
            self.background = background;
        }
        if let Some(seed) = settings.seed {
            self.seed = seed;
        }
        if let Some(bucket_size) = settings.bucket_size {
            self.bucket_size = bucket_size;
        }
    }

    pub fn validate(&self) -> RenderResult<()> {
        let checks = [
            ("samples_per_pixel", self.samples_per_pixel),
            ("max_depth", self.max_depth),
            ("bucket_size", self.bucket_size),
        ];
        for (name, value) in checks {
            if value == 0 {
                return Err(RenderError::InvalidConfig(format!(
                    "{name} must be greater than zero"
                )));
            }
        }
        Ok(())
    }
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to 8-bit RGB: gamma, scale by 256, clamp.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let intensity = Interval::new(0.0, 255.0);
    let channel = |c: f32| intensity.clamp(256.0 * linear_to_gamma(c)) as u8;
    [channel(color.x), channel(color.y), channel(color.z)]
}

/// Seed for the generator of pixel `(x, y)`. Depends only on the render
/// seed and the pixel, never on which worker renders it.
pub fn pixel_seed(seed: u64, x: u32, y: u32) -> u64 {
    seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ (((y as u64) << 32) | x as u64)
}

/// Render a single pixel with multi-sampling.
///
/// `(x, y)` are image coordinates with row 0 at the top. Returns the mean
/// linear color over `samples_per_pixel` jittered samples.
pub fn render_pixel(
    camera: &Camera,
    scene: &Scene,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let width = scene.width as f32;
    let height = scene.height as f32;
    // The camera's t axis points up the frame.
    let row = (scene.height - 1 - y) as f32;

    let mut pixel_color = Color::ZERO;

    for _ in 0..config.samples_per_pixel {
        let s = (x as f32 + gen_f32(rng)) / width;
        let t = (row + gen_f32(rng)) / height;
        let ray = camera.get_ray(s, t, rng);

        let sample = ray_color(&ray, scene, config.max_depth, &config.background, rng);
        pixel_color += finite_or_zero(sample);
    }

    // Average the samples
    pixel_color / config.samples_per_pixel as f32
}

/// Zero out non-finite channels. A NaN from a degenerate path would
/// otherwise poison the whole pixel.
#[inline]
fn finite_or_zero(color: Color) -> Color {
    let clean = |c: f32| if c.is_finite() { c } else { 0.0 };
    Color::new(clean(color.x), clean(color.y), clean(color.z))
}

/// 8-bit RGB image, row-major with row 0 at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[u8; 3]>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0, 0, 0]; width as usize * height as usize],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> [u8; 3] {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        let idx = self.index(x, y);
        self.pixels[idx] = rgb;
    }

    /// Copy a rendered bucket into place.
    pub fn blit(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for (i, color) in result.pixels.iter().enumerate() {
            let local_x = i as u32 % bucket.width;
            let local_y = i as u32 / bucket.width;
            self.set(bucket.x + local_x, bucket.y + local_y, color_to_rgb(*color));
        }
    }

    /// Flat RGB bytes (for encoding).
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flatten().copied().collect()
    }
}

/// Render the scene on the current rayon pool.
///
/// Buckets are the unit of parallel work; every pixel draws from its own
/// generator, so the image does not depend on the number of threads.
pub fn render(scene: &Scene, camera: &Camera, config: &RenderConfig) -> RenderResult<ImageBuffer> {
    config.validate()?;

    let buckets = generate_buckets(scene.width, scene.height, config.bucket_size);
    log::info!(
        "Rendering '{}' at {}x{}: {} spp, {} bounces, {} buckets on {} threads",
        scene.name,
        scene.width,
        scene.height,
        config.samples_per_pixel,
        config.max_depth,
        buckets.len(),
        rayon::current_num_threads()
    );
    let start = Instant::now();

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| {
            let pixels = render_bucket(bucket, camera, scene, config);
            log::trace!("Bucket {} done", bucket.index);
            BucketResult::new(*bucket, pixels)
        })
        .collect();

    let mut image = ImageBuffer::new(scene.width, scene.height);
    for result in &results {
        image.blit(result);
    }

    log::info!("Rendered in {:.2?}", start.elapsed());
    Ok(image)
}

/// Generator for pixel `(x, y)`.
pub(crate) fn pixel_rng(config: &RenderConfig, x: u32, y: u32) -> StdRng {
    StdRng::seed_from_u64(pixel_seed(config.seed, x, y))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{Material, Primitive, Sphere};
    use srt_math::{Interval, Vec3};

    fn sphere_scene(width: u32, height: u32) -> (Scene, Camera) {
        let material = Arc::new(Material::lambertian(Color::new(0.5, 0.5, 0.5)));
        let objects = vec![Arc::new(Primitive::from(Sphere::new(
            Vec3::new(0.0, 0.0, -1.0),
            0.5,
            material,
        )))];
        let scene = Scene::new("test", width, height, objects, Interval::SHUTTER, 0).unwrap();
        let camera = Camera::new()
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(90.0, 0.0, 1.0)
            .with_aspect_ratio(scene.aspect_ratio());
        (scene, camera)
    }

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert_eq!(linear_to_gamma(-1.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 0.0001);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 0.0001);
    }

    #[test]
    fn test_color_to_rgb_clamps() {
        assert_eq!(color_to_rgb(Color::ZERO), [0, 0, 0]);
        assert_eq!(color_to_rgb(Color::ONE), [255, 255, 255]);
        assert_eq!(color_to_rgb(Color::new(0.25, 4.0, -1.0)), [128, 255, 0]);
    }

    #[test]
    fn test_finite_or_zero() {
        let color = finite_or_zero(Color::new(f32::NAN, 0.5, f32::INFINITY));
        assert_eq!(color, Color::new(0.0, 0.5, 0.0));
    }

    #[test]
    fn test_pixel_seed_distinguishes_pixels() {
        assert_ne!(pixel_seed(0, 1, 0), pixel_seed(0, 0, 1));
        assert_ne!(pixel_seed(0, 3, 4), pixel_seed(1, 3, 4));
        assert_eq!(pixel_seed(5, 3, 4), pixel_seed(5, 3, 4));
    }

    #[test]
    fn test_config_validation() {
        assert!(RenderConfig::default().validate().is_ok());

        let config = RenderConfig {
            samples_per_pixel: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(RenderError::InvalidConfig(_))));
    }

    #[test]
    fn test_config_apply_overrides_only_set_fields() {
        let mut config = RenderConfig::default();
        config.apply(&RenderSettings {
            samples_per_pixel: Some(8),
            seed: Some(99),
            ..Default::default()
        });

        assert_eq!(config.samples_per_pixel, 8);
        assert_eq!(config.seed, 99);
        assert_eq!(config.max_depth, 50);
        assert_eq!(config.background, Background::BLACK);
    }

    #[test]
    fn test_render_pixel() {
        let (scene, camera) = sphere_scene(11, 11);
        let config = RenderConfig {
            samples_per_pixel: 4,
            max_depth: 5,
            background: Background::Solid(Color::new(0.5, 0.7, 1.0)),
            ..Default::default()
        };

        let mut rng = pixel_rng(&config, 5, 5);

        // Render center pixel (should hit the sphere)
        let center = render_pixel(&camera, &scene, 5, 5, &config, &mut rng);
        assert!(center.length() > 0.0);
        assert!(center.x < 0.5);

        // A corner pixel sees only the background
        let corner = render_pixel(&camera, &scene, 0, 0, &config, &mut rng);
        assert!((corner - Color::new(0.5, 0.7, 1.0)).length() < 1e-5);
    }

    #[test]
    fn test_render_fills_every_pixel() {
        let (scene, camera) = sphere_scene(20, 10);
        let config = RenderConfig {
            samples_per_pixel: 2,
            max_depth: 4,
            background: Background::Solid(Color::splat(0.25)),
            bucket_size: 8,
            ..Default::default()
        };

        let image = render(&scene, &camera, &config).unwrap();
        assert_eq!(image.pixels.len(), 200);
        // Background pixels: sqrt(0.25) * 256 = 128
        assert_eq!(image.get(0, 0), [128, 128, 128]);
        assert_eq!(image.get(19, 9), [128, 128, 128]);
        assert_ne!(image.get(10, 5), [128, 128, 128]);
        assert_eq!(image.to_rgb_bytes().len(), 600);
    }

    #[test]
    fn test_pixel_index_does_not_wrap_past_u32() {
        let image = ImageBuffer {
            width: 70_000,
            height: 70_000,
            pixels: Vec::new(),
        };
        assert_eq!(image.index(69_999, 69_999), 4_899_999_999);
        assert_eq!(image.index(5, 1), 70_005);
    }

    #[test]
    fn test_render_rejects_bad_config() {
        let (scene, camera) = sphere_scene(4, 4);
        let config = RenderConfig {
            max_depth: 0,
            ..Default::default()
        };
        assert!(matches!(
            render(&scene, &camera, &config),
            Err(RenderError::InvalidConfig(_))
        ));
    }
}
