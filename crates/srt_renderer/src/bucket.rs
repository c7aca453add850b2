//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that can be rendered
//! independently and in parallel using rayon.

use srt_core::Color;

use crate::renderer::{pixel_rng, render_pixel};
use crate::{Camera, RenderConfig, Scene};

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    /// Create a new bucket.
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Squared distance from the bucket's midpoint to `(cx, cy)`.
    fn distance_sq(&self, cx: f32, cy: f32) -> f32 {
        let dx = self.x as f32 + 0.5 * self.width as f32 - cx;
        let dy = self.y as f32 + 0.5 * self.height as f32 - cy;
        dx * dx + dy * dy
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// Tile the image and order the tiles from the center outwards.
///
/// Edge tiles are clipped to the image. Tiles at equal distance keep
/// scanline order, and `index` is each tile's position in the result.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let step = bucket_size.max(1);
    let (cx, cy) = (0.5 * width as f32, 0.5 * height as f32);

    let mut tiles: Vec<(u32, u32)> = (0..height)
        .step_by(step as usize)
        .flat_map(|y| (0..width).step_by(step as usize).map(move |x| (x, y)))
        .collect();

    let tile = |(x, y): (u32, u32)| Bucket::new(x, y, step.min(width - x), step.min(height - y), 0);
    tiles.sort_by(|&a, &b| {
        tile(a)
            .distance_sq(cx, cy)
            .total_cmp(&tile(b).distance_sq(cx, cy))
    });

    tiles
        .into_iter()
        .enumerate()
        .map(|(index, corner)| Bucket { index, ..tile(corner) })
        .collect()
}

/// Render a single bucket to a vector of linear colors.
///
/// Returns pixels in row-major order within the bucket.
pub fn render_bucket(
    bucket: &Bucket,
    camera: &Camera,
    scene: &Scene,
    config: &RenderConfig,
) -> Vec<Color> {
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let global_x = bucket.x + local_x;
            let global_y = bucket.y + local_y;
            let mut rng = pixel_rng(config, global_x, global_y);
            let color = render_pixel(camera, scene, global_x, global_y, config, &mut rng);
            pixels.push(color);
        }
    }

    pixels
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    /// The bucket that was rendered
    pub bucket: Bucket,
    /// Pixel colors in row-major order
    pub pixels: Vec<Color>,
}

impl BucketResult {
    /// Create a new bucket result.
    pub fn new(bucket: Bucket, pixels: Vec<Color>) -> Self {
        Self { bucket, pixels }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_buckets_exact_fit() {
        let buckets = generate_buckets(128, 128, 64);
        assert_eq!(buckets.len(), 4); // 2x2 grid

        // Total pixels should equal image size
        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 128 * 128);
    }

    #[test]
    fn test_generate_buckets_partial_fit() {
        let buckets = generate_buckets(100, 30, 64);
        assert_eq!(buckets.len(), 2); // 2x1 grid with partial buckets

        // Total pixels should equal image size
        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 100 * 30);
        assert!(buckets.iter().all(|b| b.x + b.width <= 100 && b.y + b.height <= 30));
    }

    #[test]
    fn test_buckets_cover_each_pixel_once() {
        let (w, h) = (37, 23);
        let mut seen = vec![0u8; (w * h) as usize];
        for b in generate_buckets(w, h, 8) {
            for y in b.y..b.y + b.height {
                for x in b.x..b.x + b.width {
                    seen[(y * w + x) as usize] += 1;
                }
            }
        }
        assert!(seen.iter().all(|&n| n == 1));
    }

    #[test]
    fn test_spiral_order() {
        let buckets = generate_buckets(192, 192, 64);
        assert_eq!(buckets.len(), 9); // 3x3 grid

        // First bucket should be the center one
        let first = &buckets[0];
        assert_eq!(first.x, 64);
        assert_eq!(first.y, 64);
        assert!(buckets.iter().enumerate().all(|(i, b)| b.index == i));
    }

    #[test]
    fn test_equidistant_buckets_keep_scanline_order() {
        // 2x2 grid: all four tiles are the same distance from the center.
        let buckets = generate_buckets(4, 4, 2);
        let corners: Vec<(u32, u32)> = buckets.iter().map(|b| (b.x, b.y)).collect();
        assert_eq!(corners, vec![(0, 0), (2, 0), (0, 2), (2, 2)]);
    }

    #[test]
    fn test_zero_bucket_size_uses_single_pixels() {
        let buckets = generate_buckets(3, 2, 0);
        assert_eq!(buckets.len(), 6);
        assert!(buckets.iter().all(|b| b.pixel_count() == 1));
    }
}
