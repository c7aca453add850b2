//! Built-in scenes.
//!
//! Each builder returns a complete [`SceneSetup`] for the requested image
//! size. `seed` drives both the scene's own random layout (where it has one)
//! and the render.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use srt_core::{Background, Color, Texture};
use srt_math::{Axis, Interval, Vec3};

use crate::{
    AaBox, AaRect, BvhNode, Camera, Instance, Material, MovingSphere, Plane, Primitive,
    RenderConfig, RenderResult, Scene, SceneSetup, Sphere,
};

/// The scenes available without a scene file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinScene {
    Basic,
    RandomSpheres,
    CornellBox,
    Instances,
}

impl BuiltinScene {
    pub const ALL: [BuiltinScene; 4] = [
        BuiltinScene::Basic,
        BuiltinScene::RandomSpheres,
        BuiltinScene::CornellBox,
        BuiltinScene::Instances,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BuiltinScene::Basic => "basic",
            BuiltinScene::RandomSpheres => "random",
            BuiltinScene::CornellBox => "cornell",
            BuiltinScene::Instances => "instances",
        }
    }

    pub fn build(self, width: u32, height: u32, seed: u64) -> RenderResult<SceneSetup> {
        match self {
            BuiltinScene::Basic => basic(width, height, seed),
            BuiltinScene::RandomSpheres => random_spheres(width, height, seed),
            BuiltinScene::CornellBox => cornell_box(width, height, seed),
            BuiltinScene::Instances => instances(width, height, seed),
        }
    }
}

impl fmt::Display for BuiltinScene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BuiltinScene {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BuiltinScene::ALL
            .into_iter()
            .find(|scene| scene.name() == s)
            .ok_or_else(|| format!("unknown builtin scene '{s}'"))
    }
}

fn shared(primitive: impl Into<Primitive>) -> Arc<Primitive> {
    Arc::new(primitive.into())
}

fn assemble(
    name: &str,
    width: u32,
    height: u32,
    objects: Vec<Arc<Primitive>>,
    camera: Camera,
    config: RenderConfig,
) -> RenderResult<SceneSetup> {
    let camera = camera.with_aspect_ratio(width as f32 / height as f32);
    let scene = Scene::new(name, width, height, objects, camera.shutter(), config.seed)?;
    Ok(SceneSetup {
        scene,
        camera,
        config,
    })
}

/// Ground plus diffuse, metal and glass spheres with a small light above
/// them, under a sky gradient.
pub fn basic(width: u32, height: u32, seed: u64) -> RenderResult<SceneSetup> {
    let ground = Arc::new(Material::lambertian(Texture::checker(
        Texture::solid(Color::new(0.2, 0.3, 0.1)),
        Texture::solid(Color::new(0.9, 0.9, 0.9)),
        Texture::DEFAULT_CHECKER_SCALE,
    )));
    let red = Arc::new(Material::lambertian(Color::new(1.0, 0.0, 0.0)));
    let gold = Arc::new(Material::metal(Color::new(0.8, 0.6, 0.2), 0.5));
    let glass = Arc::new(Material::dielectric(1.5));
    let light = Arc::new(Material::diffuse_light(Color::ONE));

    let objects = vec![
        shared(Sphere::new(Vec3::new(0.0, -100.5, -1.0), 100.0, ground)),
        shared(Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, red)),
        shared(Sphere::new(Vec3::new(1.0, 0.0, -1.0), 0.5, gold)),
        shared(Sphere::new(Vec3::new(-1.0, 0.0, -1.0), 0.5, glass)),
        shared(Sphere::new(Vec3::new(0.0, 1.5, -1.0), 0.5, light)),
    ];

    let camera = Camera::new()
        .with_position(Vec3::new(0.0, 0.5, 1.5), Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
        .with_lens(60.0, 0.0, 1.0);

    let config = RenderConfig {
        background: Background::sky(),
        seed,
        ..RenderConfig::default()
    };

    assemble("basic", width, height, objects, camera, config)
}

/// A field of small random spheres around three large ones. Some of the
/// diffuse spheres bounce during the shutter interval.
pub fn random_spheres(width: u32, height: u32, seed: u64) -> RenderResult<SceneSetup> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut objects = Vec::new();

    let ground = Arc::new(Material::lambertian(Color::splat(0.5)));
    objects.push(shared(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        ground,
    )));

    let glass = Arc::new(Material::dielectric(1.5));

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat: f32 = rng.gen();
            let center = Vec3::new(
                a as f32 + 0.9 * rng.gen::<f32>(),
                0.2,
                b as f32 + 0.9 * rng.gen::<f32>(),
            );

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            if choose_mat < 0.8 {
                let albedo = Color::new(
                    rng.gen::<f32>() * rng.gen::<f32>(),
                    rng.gen::<f32>() * rng.gen::<f32>(),
                    rng.gen::<f32>() * rng.gen::<f32>(),
                );
                let material = Arc::new(Material::lambertian(albedo));
                if rng.gen_bool(0.5) {
                    let center1 = center + Vec3::new(0.0, rng.gen_range(0.0..0.5), 0.0);
                    objects.push(shared(MovingSphere::new(
                        center,
                        center1,
                        Interval::SHUTTER,
                        0.2,
                        material,
                    )));
                } else {
                    objects.push(shared(Sphere::new(center, 0.2, material)));
                }
            } else if choose_mat < 0.95 {
                let albedo = Color::new(
                    rng.gen_range(0.5..1.0),
                    rng.gen_range(0.5..1.0),
                    rng.gen_range(0.5..1.0),
                );
                let fuzz = rng.gen_range(0.0..0.5);
                let material = Arc::new(Material::metal(albedo, fuzz));
                objects.push(shared(Sphere::new(center, 0.2, material)));
            } else {
                objects.push(shared(Sphere::new(center, 0.2, glass.clone())));
            }
        }
    }

    objects.push(shared(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, glass)));
    objects.push(shared(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Arc::new(Material::lambertian(Color::new(0.4, 0.2, 0.1))),
    )));
    objects.push(shared(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Material::metal(Color::new(0.7, 0.6, 0.5), 0.0)),
    )));

    let camera = Camera::new()
        .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.1, 10.0)
        .with_shutter(Interval::SHUTTER);

    let config = RenderConfig {
        background: Background::sky(),
        seed,
        ..RenderConfig::default()
    };

    assemble("random", width, height, objects, camera, config)
}

/// The Cornell box: five walls, a ceiling light and two turned boxes. Lit
/// only by the light, so the background is black.
pub fn cornell_box(width: u32, height: u32, seed: u64) -> RenderResult<SceneSetup> {
    let red = Arc::new(Material::lambertian(Color::new(0.65, 0.05, 0.05)));
    let white = Arc::new(Material::lambertian(Color::splat(0.73)));
    let green = Arc::new(Material::lambertian(Color::new(0.12, 0.45, 0.15)));
    let light = Arc::new(Material::diffuse_light(Color::splat(15.0)));

    let full = Interval::new(0.0, 555.0);
    let wall = |plane, k, flip, material: &Arc<Material>| {
        shared(AaRect::new(plane, full, full, k, flip, material.clone()))
    };

    let tall = AaBox::new(Vec3::ZERO, Vec3::new(165.0, 330.0, 165.0), white.clone());
    let short = AaBox::new(Vec3::ZERO, Vec3::splat(165.0), white.clone());

    let objects = vec![
        wall(Plane::Yz, 555.0, true, &green),
        wall(Plane::Yz, 0.0, false, &red),
        shared(AaRect::new(
            Plane::Xz,
            Interval::new(213.0, 343.0),
            Interval::new(227.0, 332.0),
            554.0,
            true,
            light,
        )),
        wall(Plane::Xz, 555.0, true, &white),
        wall(Plane::Xz, 0.0, false, &white),
        wall(Plane::Xy, 555.0, true, &white),
        shared(Instance::translate(
            shared(Instance::rotate(shared(tall), Axis::Y, 15.0)),
            Vec3::new(265.0, 0.0, 295.0),
        )),
        shared(Instance::translate(
            shared(Instance::rotate(shared(short), Axis::Y, -18.0)),
            Vec3::new(130.0, 0.0, 65.0),
        )),
    ];

    let camera = Camera::new()
        .with_position(
            Vec3::new(278.0, 278.0, -800.0),
            Vec3::new(278.0, 278.0, 0.0),
            Vec3::Y,
        )
        .with_lens(40.0, 0.0, 10.0);

    let config = RenderConfig {
        background: Background::BLACK,
        seed,
        ..RenderConfig::default()
    };

    assemble("cornell", width, height, objects, camera, config)
}

/// Copies of a sphere cluster and a box, placed by rotation and
/// translation instances. The cluster is a BVH of its own.
pub fn instances(width: u32, height: u32, seed: u64) -> RenderResult<SceneSetup> {
    let mut rng = StdRng::seed_from_u64(seed);

    let ground = Arc::new(Material::lambertian(Color::new(0.48, 0.83, 0.53)));
    let orange = Arc::new(Material::lambertian(Color::new(0.9, 0.45, 0.1)));
    let steel = Arc::new(Material::metal(Color::new(0.8, 0.8, 0.9), 0.1));
    let glass = Arc::new(Material::tinted_dielectric(1.5, Color::new(0.9, 0.95, 1.0)));

    let cluster: Vec<Arc<Primitive>> = (0..20)
        .map(|i| {
            let center = Vec3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(0.0..1.5),
                rng.gen_range(-1.0..1.0),
            );
            let material = match i % 3 {
                0 => orange.clone(),
                1 => steel.clone(),
                _ => glass.clone(),
            };
            shared(Sphere::new(center, 0.25, material))
        })
        .collect();
    let cluster = shared(BvhNode::new(&cluster, Interval::SHUTTER, &mut rng));

    let cube = shared(AaBox::new(Vec3::splat(-0.5), Vec3::splat(0.5), steel.clone()));

    let mut objects = vec![shared(AaRect::new(
        Plane::Xz,
        Interval::new(-20.0, 20.0),
        Interval::new(-20.0, 20.0),
        0.0,
        false,
        ground,
    ))];

    for (i, x) in [-3.0f32, 0.0, 3.0].into_iter().enumerate() {
        let turned = shared(Instance::rotate(cluster.clone(), Axis::Y, 40.0 * i as f32));
        objects.push(shared(Instance::translate(turned, Vec3::new(x, 0.0, 0.0))));

        let tipped = shared(Instance::rotate(cube.clone(), Axis::Z, 30.0 * i as f32));
        let rolled = shared(Instance::rotate(tipped, Axis::X, 45.0));
        objects.push(shared(Instance::translate(
            rolled,
            Vec3::new(x, 0.75, 3.0),
        )));
    }

    let camera = Camera::new()
        .with_position(Vec3::new(0.0, 4.0, 10.0), Vec3::new(0.0, 0.75, 0.0), Vec3::Y)
        .with_lens(40.0, 0.0, 10.0);

    let config = RenderConfig {
        background: Background::sky(),
        seed,
        ..RenderConfig::default()
    };

    assemble("instances", width, height, objects, camera, config)
}
