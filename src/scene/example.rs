/// Built-in example scenes.
use std::str::FromStr;

use rand::distributions::Uniform;
use rand::rngs::SmallRng;
use rand::{
    Rng,
    SeedableRng,
};

use super::Scene;
use crate::camera::Camera;
use crate::geom::{
    Color,
    Point3,
};
use crate::material::Material;
use crate::surfaces::Sphere;

/// Seed for the sphere layout of `one-weekend`, so that it doesn't change between runs.
const ONE_WEEKEND_LAYOUT_SEED: u64 = 0x5eed;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Example {
    Matte,
    TwoSpheres,
    Materials,
    OneWeekend,
}

#[derive(Debug, Clone)]
pub struct InvalidExample(String);

impl ::std::error::Error for InvalidExample {}

impl ::std::fmt::Display for InvalidExample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid example '{}', expected one of: matte, two-spheres, materials, one-weekend",
            self.0
        )
    }
}

impl FromStr for Example {
    type Err = InvalidExample;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "matte" => Ok(Example::Matte),
            "two-spheres" => Ok(Example::TwoSpheres),
            "materials" => Ok(Example::Materials),
            "one-weekend" => Ok(Example::OneWeekend),
            _ => Err(InvalidExample(s.to_string())),
        }
    }
}

impl Example {
    pub fn scene(&self, aspect_ratio: f64) -> anyhow::Result<(Scene, Camera)> {
        match self {
            Example::Matte => matte(aspect_ratio),
            Example::TwoSpheres => two_spheres(aspect_ratio),
            Example::Materials => materials(aspect_ratio),
            Example::OneWeekend => one_weekend(aspect_ratio),
        }
    }
}

/// Four matte spheres resting on a huge green one.
fn matte(aspect_ratio: f64) -> anyhow::Result<(Scene, Camera)> {
    let mut scene = Scene::builder();
    let grey = scene.add_material(Material::diffuse(Color::new(0.7, 0.7, 0.7)));
    let white = scene.add_material(Material::diffuse(Color::new(1.0, 1.0, 1.0)));
    let red = scene.add_material(Material::diffuse(Color::new(0.8, 0.3, 0.4)));
    let green = scene.add_material(Material::diffuse(Color::new(0.2, 0.5, 0.1)));

    scene.add(Sphere::new(Point3::new(0.7, -0.3, -0.8), 0.2, grey));
    scene.add(Sphere::new(Point3::new(-0.7, -0.3, -0.8), 0.2, white));
    scene.add(Sphere::new(Point3::new(0.0, 0.0, -1.0), 0.5, red));
    scene.add(Sphere::new(Point3::new(0.0, -100.5, -1.0), 100.0, green));

    Ok((scene.build()?, Camera::pinhole(aspect_ratio)))
}

fn two_spheres(aspect_ratio: f64) -> anyhow::Result<(Scene, Camera)> {
    let mut scene = Scene::builder();
    let red = scene.add_material(Material::diffuse(Color::new(0.8, 0.3, 0.4)));
    let green = scene.add_material(Material::diffuse(Color::new(0.2, 0.5, 0.1)));

    scene.add(Sphere::new(Point3::new(0.0, 0.0, -1.0), 0.5, red));
    scene.add(Sphere::new(Point3::new(0.0, -100.5, -1.0), 100.0, green));

    Ok((scene.build()?, Camera::pinhole(aspect_ratio)))
}

/// One sphere of each material, with a hollow glass bubble on the left.
fn materials(aspect_ratio: f64) -> anyhow::Result<(Scene, Camera)> {
    let mut scene = Scene::builder();
    let ground = scene.add_material(Material::diffuse(Color::new(0.8, 0.8, 0.0)));
    let center = scene.add_material(Material::diffuse(Color::new(0.1, 0.2, 0.5)));
    let glass = scene.add_material(Material::refractive(1.5));
    let gold = scene.add_material(Material::reflective(Color::new(0.8, 0.6, 0.2), 0.3));

    scene.add(Sphere::new(Point3::new(0.0, -100.5, -1.0), 100.0, ground));
    scene.add(Sphere::new(Point3::new(0.0, 0.0, -1.0), 0.5, center));
    scene.add(Sphere::new(Point3::new(-1.0, 0.0, -1.0), 0.5, glass));
    // Inside the glass sphere, so the ray leaves the medium again: a bubble.
    scene.add(Sphere::new(Point3::new(-1.0, 0.0, -1.0), 0.4, glass));
    scene.add(Sphere::new(Point3::new(1.0, 0.0, -1.0), 0.5, gold));

    Ok((scene.build()?, Camera::pinhole(aspect_ratio)))
}

/// A random field of small spheres as shown in the final section of Ray Tracing in One Weekend.
fn one_weekend(aspect_ratio: f64) -> anyhow::Result<(Scene, Camera)> {
    let camera = Camera::builder(20.0, aspect_ratio)
        .from(Point3::new(13., 2., 3.))
        .towards(Point3::new(0., 0., 0.))
        .focus_dist(10.)
        .aperture(0.1)
        .build();

    let mut rng = SmallRng::seed_from_u64(ONE_WEEKEND_LAYOUT_SEED);
    let mut scene = Scene::builder();

    let ground_material = scene.add_material(Material::diffuse(Color::new(0.5, 0.5, 0.5)));
    scene.add(Sphere::new(Point3::new(0., -1000., 0.), 1000., ground_material));

    // All of the small glass spheres share one material.
    let glass = scene.add_material(Material::refractive(1.5));

    for a in -11..11 {
        for b in -11..11 {
            let choose_material = rng.gen::<f64>();
            let center = Point3::new(
                a as f64 + 0.9 * rng.gen::<f64>(),
                0.2,
                b as f64 + 0.9 * rng.gen::<f64>(),
            );
            if (center - Point3::new(4.0, 0.2, 0.0)).length() > 0.9 {
                let material = if choose_material < 0.8 {
                    // diffuse
                    let albedo = rng.gen::<Color>() * rng.gen::<Color>();
                    scene.add_material(Material::diffuse(albedo))
                } else if choose_material < 0.95 {
                    // metal
                    let albedo = Color::rand_within(&mut rng, Uniform::new(0.5, 1.0));
                    let fuzz = rng.gen_range(0.0..0.5);
                    scene.add_material(Material::reflective(albedo, fuzz))
                } else {
                    glass
                };
                scene.add(Sphere::new(center, 0.2, material));
            }
        }
    }
    let material1 = scene.add_material(Material::diffuse(Color::new(0.05, 0.2, 0.6)));
    scene.add(Sphere::new(Point3::new(-4., 1., 0.), 1.0, material1));
    scene.add(Sphere::new(Point3::new(0., 1., 0.), 1.0, glass));
    let material3 = scene.add_material(Material::reflective(Color::new(0.7, 0.6, 0.5), 0.0));
    scene.add(Sphere::new(Point3::new(4., 1., 0.), 1.0, material3));

    Ok((scene.build()?, camera))
}
