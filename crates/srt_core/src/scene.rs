//! Scene file schema.
//!
//! A scene file is a JSON document describing the camera, render settings,
//! a table of named materials and a list of objects. These types only
//! describe the scene; the renderer turns them into primitives and builds
//! its acceleration structure from them.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use srt_math::{Axis, Vec3};
use thiserror::Error;

use crate::background::Background;
use crate::texture::{Color, Texture};

/// Errors raised while reading or validating a scene file.
#[derive(Error, Debug)]
pub enum SceneFileError {
    #[error("Failed to read scene file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed scene file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Object {index} references unknown material '{material}'")]
    UnknownMaterial { index: usize, material: String },

    #[error("Scene has no objects")]
    NoObjects,
}

pub type SceneFileResult<T> = Result<T, SceneFileError>;

/// Complete scene document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default = "default_name")]
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub camera: CameraDescription,
    #[serde(default)]
    pub render: RenderSettings,
    #[serde(default)]
    pub materials: BTreeMap<String, MaterialDescription>,
    pub objects: Vec<ObjectDescription>,

    /// Directory image paths are resolved against. Set by [`load_scene_file`].
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

fn default_name() -> String {
    "untitled".to_string()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraDescription {
    pub look_from: Vec3,
    pub look_at: Vec3,
    #[serde(default = "default_vup")]
    pub vup: Vec3,
    /// Vertical field of view in degrees.
    #[serde(default = "default_vfov")]
    pub vfov: f32,
    #[serde(default)]
    pub aperture: f32,
    /// Distance to the plane in perfect focus. Defaults to the distance
    /// between `look_from` and `look_at`.
    #[serde(default)]
    pub focus_dist: Option<f32>,
    #[serde(default)]
    pub time0: f32,
    #[serde(default = "default_time1")]
    pub time1: f32,
}

fn default_vup() -> Vec3 {
    Vec3::Y
}

fn default_vfov() -> f32 {
    40.0
}

fn default_time1() -> f32 {
    1.0
}

impl CameraDescription {
    /// Reject cameras whose basis or focus plane would be degenerate.
    pub fn validate(&self) -> SceneFileResult<()> {
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return Err(invalid(format!(
                "vfov must be in (0, 180) degrees, got {}",
                self.vfov
            )));
        }
        if self.aperture < 0.0 {
            return Err(invalid("aperture must not be negative".to_string()));
        }

        let view = self.look_at - self.look_from;
        if !(view.length_squared() > 0.0) {
            return Err(invalid(format!(
                "look_from and look_at must differ, both are {:?}",
                self.look_from
            )));
        }
        if !(view.cross(self.vup).length_squared() > 1e-12 * view.length_squared()) {
            return Err(invalid(format!(
                "vup {:?} must not be zero or parallel to the view direction",
                self.vup
            )));
        }

        let focus = self.focus_distance();
        if !(focus > 0.0 && focus.is_finite()) {
            return Err(invalid(format!(
                "focus_dist must be positive, got {focus}"
            )));
        }

        Ok(())
    }

    pub fn focus_distance(&self) -> f32 {
        self.focus_dist
            .unwrap_or_else(|| (self.look_from - self.look_at).length())
    }
}

/// Optional overrides of the renderer's defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub samples_per_pixel: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Background>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket_size: Option<u32>,
}

impl RenderSettings {
    /// Take every value `other` sets, keeping ours where it has none.
    pub fn overlay(&mut self, other: &RenderSettings) {
        self.samples_per_pixel = other.samples_per_pixel.or(self.samples_per_pixel);
        self.max_depth = other.max_depth.or(self.max_depth);
        self.background = other.background.or(self.background);
        self.seed = other.seed.or(self.seed);
        self.bucket_size = other.bucket_size.or(self.bucket_size);
    }
}

/// Texture as written in a scene file: `[r, g, b]`, `{"checker": {...}}`
/// or `{"image": "path"}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextureDescription {
    Solid(Color),
    Pattern(PatternDescription),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternDescription {
    Checker {
        even: Box<TextureDescription>,
        odd: Box<TextureDescription>,
        #[serde(default = "default_checker_scale")]
        scale: f32,
    },
    Image(String),
}

fn default_checker_scale() -> f32 {
    Texture::DEFAULT_CHECKER_SCALE
}

impl From<Color> for TextureDescription {
    fn from(color: Color) -> Self {
        TextureDescription::Solid(color)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialDescription {
    Lambertian {
        albedo: TextureDescription,
    },
    Metal {
        albedo: Color,
        #[serde(default)]
        fuzz: f32,
    },
    Dielectric {
        ior: f32,
        #[serde(default = "default_tint")]
        tint: Color,
    },
    DiffuseLight {
        emit: TextureDescription,
    },
}

fn default_tint() -> Color {
    Color::ONE
}

/// Plane spanned by an axis-aligned rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RectPlane {
    Xy,
    Xz,
    Yz,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeDescription {
    Sphere {
        center: Vec3,
        radius: f32,
    },
    MovingSphere {
        center0: Vec3,
        center1: Vec3,
        #[serde(default)]
        time0: f32,
        #[serde(default = "default_time1")]
        time1: f32,
        radius: f32,
    },
    /// `a0` and `a1` bound the first and second axis of `plane`, `k` is the
    /// coordinate on the remaining axis.
    Rect {
        plane: RectPlane,
        a0: [f32; 2],
        a1: [f32; 2],
        k: f32,
        #[serde(default)]
        flip_normal: bool,
    },
    Box {
        min: Vec3,
        max: Vec3,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisName {
    X,
    Y,
    Z,
}

impl From<AxisName> for Axis {
    fn from(axis: AxisName) -> Self {
        match axis {
            AxisName::X => Axis::X,
            AxisName::Y => Axis::Y,
            AxisName::Z => Axis::Z,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformDescription {
    Translate(Vec3),
    Rotate { axis: AxisName, degrees: f32 },
}

/// One object: a shape, the name of its material and the transforms applied
/// to it, innermost first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectDescription {
    #[serde(flatten)]
    pub shape: ShapeDescription,
    pub material: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transforms: Vec<TransformDescription>,
}

impl SceneDescription {
    /// Parse and validate a scene from a JSON string.
    pub fn from_json_str(json: &str) -> SceneFileResult<Self> {
        let scene: SceneDescription = serde_json::from_str(json)?;
        scene.validate()?;
        Ok(scene)
    }

    pub fn to_json_string(&self) -> SceneFileResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check everything serde cannot: dimensions, shape parameters and
    /// material references.
    pub fn validate(&self) -> SceneFileResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(invalid(format!(
                "image size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        self.camera.validate()?;

        for (name, material) in &self.materials {
            validate_material(name, material)?;
        }

        if self.objects.is_empty() {
            return Err(SceneFileError::NoObjects);
        }

        for (index, object) in self.objects.iter().enumerate() {
            if !self.materials.contains_key(&object.material) {
                return Err(SceneFileError::UnknownMaterial {
                    index,
                    material: object.material.clone(),
                });
            }
            validate_shape(index, &object.shape)?;
        }

        Ok(())
    }
}

/// Read, parse and validate a scene file. Image textures referenced by the
/// scene are resolved relative to the file's directory.
pub fn load_scene_file(path: impl AsRef<Path>) -> SceneFileResult<SceneDescription> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| SceneFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut scene = SceneDescription::from_json_str(&json)?;
    scene.base_dir = path.parent().map(Path::to_path_buf);

    log::info!(
        "Loaded scene '{}' from {} ({} materials, {} objects)",
        scene.name,
        path.display(),
        scene.materials.len(),
        scene.objects.len()
    );

    Ok(scene)
}

fn invalid(message: String) -> SceneFileError {
    SceneFileError::InvalidParameter(message)
}

fn validate_material(name: &str, material: &MaterialDescription) -> SceneFileResult<()> {
    match material {
        MaterialDescription::Dielectric { ior, .. } if !(*ior > 0.0) => Err(invalid(format!(
            "material '{name}': index of refraction must be positive, got {ior}"
        ))),
        MaterialDescription::Lambertian { albedo: texture }
        | MaterialDescription::DiffuseLight { emit: texture } => validate_texture(name, texture),
        _ => Ok(()),
    }
}

fn validate_texture(name: &str, texture: &TextureDescription) -> SceneFileResult<()> {
    match texture {
        TextureDescription::Solid(_) => Ok(()),
        TextureDescription::Pattern(PatternDescription::Checker { even, odd, .. }) => {
            validate_texture(name, even)?;
            validate_texture(name, odd)
        }
        TextureDescription::Pattern(PatternDescription::Image(path)) if path.is_empty() => Err(
            invalid(format!("material '{name}': image texture path is empty")),
        ),
        TextureDescription::Pattern(PatternDescription::Image(_)) => Ok(()),
    }
}

fn validate_shape(index: usize, shape: &ShapeDescription) -> SceneFileResult<()> {
    match shape {
        ShapeDescription::Sphere { radius, .. } | ShapeDescription::MovingSphere { radius, .. }
            if !(*radius > 0.0) =>
        {
            Err(invalid(format!(
                "object {index}: sphere radius must be positive, got {radius}"
            )))
        }
        ShapeDescription::MovingSphere { time0, time1, .. } if time1 <= time0 => Err(invalid(
            format!("object {index}: moving sphere needs time0 < time1"),
        )),
        ShapeDescription::Rect { a0, a1, .. } if a0[0] > a0[1] || a1[0] > a1[1] => Err(invalid(
            format!("object {index}: rectangle bounds must be ordered min, max"),
        )),
        ShapeDescription::Box { min, max } if min.cmpgt(*max).any() => Err(invalid(format!(
            "object {index}: box min {min} exceeds max {max}"
        ))),
        _ => Ok(()),
    }
}
