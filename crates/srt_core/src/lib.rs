//! SRT Core - Renderer-agnostic scene description for the srt path tracer.
//!
//! This crate provides:
//!
//! - **Textures**: solid, checker and image textures (`Texture::value`)
//! - **Backgrounds**: radiance for rays that escape the scene
//! - **Scene files**: the JSON scene schema, its loader and validation
//!
//! # Example
//!
//! ```ignore
//! use srt_core::scene::load_scene_file;
//!
//! let scene = load_scene_file("scenes/cornell.json")?;
//! println!("{}: {} objects", scene.name, scene.objects.len());
//! ```

pub mod background;
pub mod scene;
pub mod texture;

// Re-export commonly used types
pub use background::Background;
pub use scene::{load_scene_file, SceneDescription, SceneFileError, SceneFileResult};
pub use texture::{Color, ImageTexture, Texture, TextureCache, TextureError, TextureResult};
