use srt_core::{SceneFileError, TextureError};
use thiserror::Error;

/// Errors raised while assembling a scene, rendering or writing the image.
///
/// Nothing on the per-ray path returns these; intersection and scattering
/// report absence through `Option`.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Scene has no primitives")]
    EmptyScene,

    #[error("Invalid render configuration: {0}")]
    InvalidConfig(String),

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    SceneFile(#[from] SceneFileError),

    #[error(transparent)]
    Texture(#[from] TextureError),
}

pub type RenderResult<T> = Result<T, RenderError>;
