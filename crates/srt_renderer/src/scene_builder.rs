//! Turn a scene description into renderable primitives.

use std::collections::HashMap;
use std::sync::Arc;

use srt_core::scene::{
    CameraDescription, MaterialDescription, ObjectDescription, PatternDescription, RectPlane,
    SceneDescription, ShapeDescription, TextureDescription, TransformDescription,
};
use srt_core::{Texture, TextureCache};
use srt_math::{Interval, Transform};

use crate::{
    AaBox, AaRect, Camera, Instance, Material, MovingSphere, Plane, Primitive, RenderConfig,
    RenderError, RenderResult, Scene, SceneSetup, Sphere,
};

impl SceneSetup {
    /// Build the scene, camera and render configuration a description asks
    /// for. Image textures are loaded here, relative to the description's
    /// base directory.
    pub fn from_description(description: &SceneDescription) -> RenderResult<Self> {
        description.validate()?;

        let mut config = RenderConfig::default();
        config.apply(&description.render);
        config.validate()?;

        let mut textures = match &description.base_dir {
            Some(dir) => TextureCache::with_base_dir(dir),
            None => TextureCache::new(),
        };

        let materials = description
            .materials
            .iter()
            .map(|(name, material)| Ok((name.as_str(), Arc::new(build_material(material, &mut textures)?))))
            .collect::<RenderResult<HashMap<&str, Arc<Material>>>>()?;

        let objects = description
            .objects
            .iter()
            .map(|object| build_object(object, &materials))
            .collect::<RenderResult<Vec<_>>>()?;

        log::debug!(
            "Built {} materials, {} objects, {} image textures",
            materials.len(),
            objects.len(),
            textures.len()
        );

        let camera = build_camera(&description.camera, description.width, description.height);
        let scene = Scene::new(
            description.name.clone(),
            description.width,
            description.height,
            objects,
            camera.shutter(),
            config.seed,
        )?;

        Ok(SceneSetup {
            scene,
            camera,
            config,
        })
    }
}

pub fn build_camera(description: &CameraDescription, width: u32, height: u32) -> Camera {
    Camera::new()
        .with_position(description.look_from, description.look_at, description.vup)
        .with_lens(
            description.vfov,
            description.aperture,
            description.focus_distance(),
        )
        .with_aspect_ratio(width as f32 / height as f32)
        .with_shutter(Interval::new(description.time0, description.time1))
}

fn build_texture(
    description: &TextureDescription,
    textures: &mut TextureCache,
) -> RenderResult<Texture> {
    Ok(match description {
        TextureDescription::Solid(color) => Texture::solid(*color),
        TextureDescription::Pattern(PatternDescription::Checker { even, odd, scale }) => {
            Texture::checker(
                build_texture(even, textures)?,
                build_texture(odd, textures)?,
                *scale,
            )
        }
        TextureDescription::Pattern(PatternDescription::Image(path)) => {
            Texture::image(textures.load(path)?)
        }
    })
}

fn build_material(
    description: &MaterialDescription,
    textures: &mut TextureCache,
) -> RenderResult<Material> {
    Ok(match description {
        MaterialDescription::Lambertian { albedo } => {
            Material::lambertian(build_texture(albedo, textures)?)
        }
        MaterialDescription::Metal { albedo, fuzz } => Material::metal(*albedo, *fuzz),
        MaterialDescription::Dielectric { ior, tint } => Material::tinted_dielectric(*ior, *tint),
        MaterialDescription::DiffuseLight { emit } => {
            Material::diffuse_light(build_texture(emit, textures)?)
        }
    })
}

fn build_object(
    description: &ObjectDescription,
    materials: &HashMap<&str, Arc<Material>>,
) -> RenderResult<Arc<Primitive>> {
    // Validation guarantees the reference resolves.
    let material = materials
        .get(description.material.as_str())
        .cloned()
        .ok_or_else(|| {
            RenderError::InvalidConfig(format!("unknown material '{}'", description.material))
        })?;

    let shape: Primitive = match &description.shape {
        ShapeDescription::Sphere { center, radius } => Sphere::new(*center, *radius, material).into(),
        ShapeDescription::MovingSphere {
            center0,
            center1,
            time0,
            time1,
            radius,
        } => MovingSphere::new(
            *center0,
            *center1,
            Interval::new(*time0, *time1),
            *radius,
            material,
        )
        .into(),
        ShapeDescription::Rect {
            plane,
            a0,
            a1,
            k,
            flip_normal,
        } => AaRect::new(
            plane_of(*plane),
            Interval::new(a0[0], a0[1]),
            Interval::new(a1[0], a1[1]),
            *k,
            *flip_normal,
            material,
        )
        .into(),
        ShapeDescription::Box { min, max } => AaBox::new(*min, *max, material).into(),
    };

    // Innermost transform first.
    let placed = description
        .transforms
        .iter()
        .fold(shape, |object, transform| {
            let transform = match transform {
                TransformDescription::Translate(offset) => Transform::translation(*offset),
                TransformDescription::Rotate { axis, degrees } => {
                    Transform::rotation((*axis).into(), *degrees)
                }
            };
            Instance::new(object, transform).into()
        });

    Ok(Arc::new(placed))
}

fn plane_of(plane: RectPlane) -> Plane {
    match plane {
        RectPlane::Xy => Plane::Xy,
        RectPlane::Xz => Plane::Xz,
        RectPlane::Yz => Plane::Yz,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Hittable;
    use srt_core::Background;
    use srt_math::{Ray, Vec3};

    const SCENE: &str = r#"{
        "name": "builder",
        "width": 20,
        "height": 10,
        "camera": { "look_from": [0, 0, 0], "look_at": [0, 0, -1], "vfov": 90 },
        "render": { "samples_per_pixel": 3, "background": {"solid": [0.1, 0.2, 0.3]}, "seed": 11 },
        "materials": {
            "red": { "type": "lambertian", "albedo": [0.9, 0.1, 0.1] },
            "light": { "type": "diffuse_light", "emit": [5, 5, 5] }
        },
        "objects": [
            { "type": "box", "min": [-0.5, -0.5, -0.5], "max": [0.5, 0.5, 0.5], "material": "red",
              "transforms": [ {"rotate": {"axis": "y", "degrees": 45}}, {"translate": [0, 0, -3]} ] },
            { "type": "rect", "plane": "xz", "a0": [-1, 1], "a1": [-4, -2], "k": 2,
              "flip_normal": true, "material": "light" }
        ]
    }"#;

    #[test]
    fn test_build_from_description() {
        let description = SceneDescription::from_json_str(SCENE).unwrap();
        let setup = SceneSetup::from_description(&description).unwrap();

        assert_eq!(setup.scene.name, "builder");
        assert_eq!(setup.scene.len(), 2);
        assert_eq!(setup.config.samples_per_pixel, 3);
        assert_eq!(setup.config.max_depth, 50);
        assert_eq!(setup.config.seed, 11);
        assert_eq!(
            setup.config.background,
            Background::Solid(Vec3::new(0.1, 0.2, 0.3))
        );

        // The rotated box is an instance of an instance.
        match setup.scene.objects()[0].as_ref() {
            Primitive::Instance(outer) => {
                assert!(matches!(outer.object(), Primitive::Instance(_)));
            }
            other => panic!("expected instance, got {other:?}"),
        }

        // Rotated 45 degrees about Y, the box's near edge points at the
        // camera, sqrt(0.5) in front of its center. Off the edge by 0.1 the
        // face is 0.1 further back.
        let ray = Ray::new_simple(Vec3::new(0.1, 0.0, 0.0), -Vec3::Z);
        let rec = setup.scene.hit(&ray, Interval::from_min(1e-4)).unwrap();
        assert!((rec.t - (3.1 - 0.5f32.sqrt())).abs() < 1e-3);

        // The light faces down.
        let up = Ray::new_simple(Vec3::new(0.0, 0.0, -3.0), Vec3::Y);
        let rec = setup.scene.hit(&up, Interval::from_min(0.6)).unwrap();
        assert_eq!(rec.normal, -Vec3::Y);
        assert_eq!(
            rec.material.emitted(rec.u, rec.v, rec.p),
            Vec3::splat(5.0)
        );
    }

    #[test]
    fn test_missing_image_texture_fails() {
        let json = SCENE.replace(
            r#""albedo": [0.9, 0.1, 0.1]"#,
            r#""albedo": {"image": "no/such/texture.png"}"#,
        );
        let description = SceneDescription::from_json_str(&json).unwrap();
        let err = SceneSetup::from_description(&description).unwrap_err();

        assert!(matches!(err, RenderError::Texture(_)));
    }

    #[test]
    fn test_zero_samples_rejected() {
        let json = SCENE.replace(r#""samples_per_pixel": 3"#, r#""samples_per_pixel": 0"#);
        let description = SceneDescription::from_json_str(&json).unwrap();
        let err = SceneSetup::from_description(&description).unwrap_err();

        assert!(matches!(err, RenderError::InvalidConfig(_)));
    }
}
