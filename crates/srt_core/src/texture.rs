//! Textures: pure functions from surface coordinates to color.
//!
//! Materials look their albedo or emission up through [`Texture::value`].
//! Image textures are decoded once and shared through a [`TextureCache`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use srt_math::Vec3;
use thiserror::Error;

/// Linear RGB color, nominally in [0, 1] per channel.
pub type Color = Vec3;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode image {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Image {0} has no pixels")]
    EmptyImage(String),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// Surface color lookup.
///
/// Built only through [`Texture::solid`], [`Texture::checker`] and
/// [`Texture::image`], which keep every color it can return non-negative.
#[derive(Clone, Debug)]
pub struct Texture(TextureKind);

#[derive(Clone, Debug)]
enum TextureKind {
    /// Uniform color.
    Solid(Color),
    /// 3D checker pattern: the sign of `sin(sx)·sin(sy)·sin(sz)` picks a side.
    Checker {
        even: Box<Texture>,
        odd: Box<Texture>,
        scale: f32,
    },
    /// Decoded 8-bit image addressed by (u, v).
    Image(Arc<ImageTexture>),
}

impl Texture {
    /// Default frequency of the checker pattern.
    pub const DEFAULT_CHECKER_SCALE: f32 = 10.0;

    /// Solid color with negative channels clamped to zero, so no material can
    /// end up with negative attenuation or emission.
    pub fn solid(color: Color) -> Self {
        Texture(TextureKind::Solid(color.max(Color::ZERO)))
    }

    pub fn checker(even: Texture, odd: Texture, scale: f32) -> Self {
        Texture(TextureKind::Checker {
            even: Box::new(even),
            odd: Box::new(odd),
            scale,
        })
    }

    pub fn image(image: Arc<ImageTexture>) -> Self {
        Texture(TextureKind::Image(image))
    }

    /// Color at texture coordinates (u, v) and hit point `p`.
    pub fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        match &self.0 {
            TextureKind::Solid(color) => *color,
            TextureKind::Checker { even, odd, scale } => {
                let sines = (scale * p.x).sin() * (scale * p.y).sin() * (scale * p.z).sin();
                if sines > 0.0 {
                    even.value(u, v, p)
                } else {
                    odd.value(u, v, p)
                }
            }
            TextureKind::Image(image) => image.sample(u, v),
        }
    }
}

impl Default for Texture {
    fn default() -> Self {
        Texture::solid(Color::splat(0.5))
    }
}

impl From<Color> for Texture {
    fn from(color: Color) -> Self {
        Texture::solid(color)
    }
}

/// A loaded image with linear RGB pixels, row-major from the top.
#[derive(Clone, Debug)]
pub struct ImageTexture {
    pub width: u32,
    pub height: u32,
    pixels: Vec<Color>,
    /// Original file path (for debugging)
    pub path: String,
}

impl ImageTexture {
    /// Create a texture from pixel data. `pixels.len()` must be `width * height`.
    /// Negative channels are clamped to zero.
    pub fn new(width: u32, height: u32, pixels: Vec<Color>, path: impl Into<String>) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize);
        Self {
            width,
            height,
            pixels: pixels.into_iter().map(|c| c.max(Color::ZERO)).collect(),
            path: path.into(),
        }
    }

    /// Decode an image file, converting sRGB bytes to linear color.
    pub fn load(path: &Path) -> TextureResult<Self> {
        let display = path.display().to_string();
        let img = image::open(path).map_err(|source| match source {
            image::ImageError::IoError(e) => TextureError::Io(e),
            source => TextureError::Decode {
                path: display.clone(),
                source,
            },
        })?;

        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        if width == 0 || height == 0 {
            return Err(TextureError::EmptyImage(display));
        }

        let pixels = rgb
            .pixels()
            .map(|p| {
                Color::new(
                    srgb_to_linear(p[0]),
                    srgb_to_linear(p[1]),
                    srgb_to_linear(p[2]),
                )
            })
            .collect();

        Ok(Self::new(width, height, pixels, display))
    }

    /// Nearest-neighbour lookup. (0, 0) is the bottom-left of the image;
    /// out-of-range coordinates clamp to the border.
    pub fn sample(&self, u: f32, v: f32) -> Color {
        let x = (u * self.width as f32) as i64;
        let y = ((1.0 - v) * self.height as f32 - 0.0001) as i64;

        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;

        self.pixels[y * self.width as usize + x]
    }

    /// Get total size in bytes (approximate).
    pub fn size_bytes(&self) -> usize {
        self.pixels.len() * std::mem::size_of::<Color>()
    }
}

/// Cache for loaded image textures, keyed by the path as written in the scene.
pub struct TextureCache {
    textures: HashMap<String, Arc<ImageTexture>>,
    /// Base directory for resolving relative paths
    base_dir: Option<PathBuf>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self {
            textures: HashMap::new(),
            base_dir: None,
        }
    }

    /// Create a texture cache with a base directory for relative paths.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            textures: HashMap::new(),
            base_dir: Some(base_dir.into()),
        }
    }

    /// Load an image, using the cache if it was already decoded.
    pub fn load(&mut self, path: &str) -> TextureResult<Arc<ImageTexture>> {
        if let Some(texture) = self.textures.get(path) {
            return Ok(texture.clone());
        }

        let full_path = self.resolve_path(path);
        let texture = Arc::new(ImageTexture::load(&full_path)?);
        self.textures.insert(path.to_string(), texture.clone());

        log::debug!(
            "Loaded texture: {} ({}x{}, {:.1} KB)",
            path,
            texture.width,
            texture.height,
            texture.size_bytes() as f32 / 1024.0
        );

        Ok(texture)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);

        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl Default for TextureCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}
