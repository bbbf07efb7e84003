/// Loading scenes from YAML.
///
/// The file format is described by private serde types that are validated and then
/// converted into a `Scene`; only vectors and `Background` deserialize directly.
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use anyhow::{
    anyhow,
    Context,
};
use log::{
    debug,
    warn,
};
use serde::de::{
    self,
    Deserializer,
};
use serde::Deserialize;

use crate::camera::Camera;
use crate::geom::{
    Color,
    Point3,
    Vec3,
};
use crate::material::MaterialId;
use crate::scene::{
    Background,
    Scene,
    SceneBuilder,
};
use crate::surfaces;

/// Load a scene from the given path.
///
/// The camera will be configured with the given aspect ratio.
pub fn load_scene<P: AsRef<Path>>(path: P, aspect_ratio: f64) -> anyhow::Result<(Scene, Camera)> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("could not open scene file '{}'", path.display()))?;
    read_scene(BufReader::new(file), aspect_ratio)
        .with_context(|| format!("could not load scene file '{}'", path.display()))
}

fn read_scene<R: Read>(reader: R, aspect_ratio: f64) -> anyhow::Result<(Scene, Camera)> {
    let config = serde_yaml::from_reader::<_, Config>(reader)?;
    build(config, aspect_ratio)
}

fn build(config: Config, aspect_ratio: f64) -> anyhow::Result<(Scene, Camera)> {
    if config.scene.surfaces.is_empty() {
        return Err(anyhow!("scene is empty"));
    }

    let mut builder = Scene::builder();
    if let Some(background) = config.scene.background {
        builder.set_background(background);
    }

    let mut named = HashMap::new();
    for (name, material) in &config.scene.materials {
        let material = material
            .to_material()
            .with_context(|| format!("invalid material '{}'", name))?;
        named.insert(name.as_str(), builder.add_material(material));
    }
    debug!("loaded {} named materials", named.len());

    for (i, surface) in config.scene.surfaces.iter().enumerate() {
        match surface {
            Surface::Sphere {
                radius,
                position,
                material,
            } => {
                if !(*radius > 0.0) {
                    return Err(anyhow!(
                        "sphere {} has radius {}, expected a positive radius",
                        i,
                        radius
                    ));
                }
                let material = resolve(material, &named, &mut builder)
                    .with_context(|| format!("sphere {}", i))?;
                builder.add(surfaces::Sphere::new(*position, *radius, material));
            }
        }
    }
    let camera = config
        .camera
        .build(aspect_ratio)
        .context("invalid camera")?;
    Ok((builder.build()?, camera))
}

fn resolve(
    material: &MaterialRef,
    named: &HashMap<&str, MaterialId>,
    builder: &mut SceneBuilder,
) -> anyhow::Result<MaterialId> {
    match *material {
        MaterialRef::Named(ref name) => named
            .get(name.as_str())
            .copied()
            .ok_or_else(|| anyhow!("unknown material '{}'", name)),
        MaterialRef::Inline(ref material) => Ok(builder.add_material(material.to_material()?)),
    }
}

#[derive(Deserialize, Debug)]
struct Config {
    camera: CameraConfig,
    scene: SceneConfig,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct CameraConfig {
    fov: f64,
    from: Point3,
    towards: Point3,
    up: Option<Vec3>,
    focus_distance: Option<f64>,
    aperture: Option<f64>,
}

impl CameraConfig {
    fn build(self, aspect_ratio: f64) -> anyhow::Result<Camera> {
        let view = self.towards - self.from;
        if view.near_zero() {
            return Err(anyhow!(
                "camera looks from {} towards the same point",
                self.from
            ));
        }
        let up = self.up.unwrap_or_else(|| Vec3::new(0., 1., 0.));
        if up.cross(&view.unit()).near_zero() {
            return Err(anyhow!(
                "camera up {} must not be parallel to the view direction",
                up
            ));
        }
        let mut builder = Camera::builder(self.fov, aspect_ratio)
            .from(self.from)
            .towards(self.towards);
        builder = builder.up(up);
        if let Some(ref aperture) = self.aperture {
            builder = builder.aperture(*aperture);
        }
        if let Some(ref focus_distance) = self.focus_distance {
            builder = builder.focus_dist(*focus_distance);
        }
        Ok(builder.build())
    }
}

#[derive(Deserialize, Debug)]
struct SceneConfig {
    #[serde(default)]
    background: Option<Background>,
    #[serde(default)]
    materials: BTreeMap<String, Material>,
    surfaces: Vec<Surface>,
}

#[derive(Deserialize, Debug)]
#[serde(tag = "type", rename_all = "camelCase")]
enum Surface {
    Sphere {
        radius: f64,
        position: Point3,
        material: MaterialRef,
    },
}

/// Either the name of an entry under `materials`, or a material defined in place.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum MaterialRef {
    Named(String),
    Inline(Material),
}

#[derive(Deserialize, Debug)]
#[serde(tag = "type", rename_all = "camelCase")]
enum Material {
    Diffuse { albedo: Albedo },
    Reflective { albedo: Albedo, fuzz: f64 },
    Refractive { index: f64 },
}

impl Material {
    fn to_material(&self) -> anyhow::Result<crate::material::Material> {
        match *self {
            Material::Diffuse { ref albedo } => Ok(crate::material::Material::diffuse(albedo.0)),
            Material::Reflective { ref albedo, fuzz } => {
                if !(0.0..=1.0).contains(&fuzz) {
                    warn!("fuzz {} is outside [0, 1] and will be clamped", fuzz);
                }
                Ok(crate::material::Material::reflective(albedo.0, fuzz))
            }
            Material::Refractive { index } => {
                if !(index > 0.0) {
                    return Err(anyhow!(
                        "index of refraction must be positive, got {}",
                        index
                    ));
                }
                Ok(crate::material::Material::refractive(index))
            }
        }
    }
}

#[derive(Debug)]
struct Albedo(Color);

impl FromStr for Albedo {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix('#').unwrap_or(s);
        if s.len() != 6 {
            return Err(anyhow!("expected hex color format aabbcc, got {}", s));
        }
        let parsed = u32::from_str_radix(s, 16).context("could not parse hex color")?;
        let bytes: [u8; 4] = parsed.to_be_bytes();

        Ok(Albedo(Color::new(
            bytes[1] as f64 / 256.0,
            bytes[2] as f64 / 256.0,
            bytes[3] as f64 / 256.0,
        )))
    }
}

impl<'de> Deserialize<'de> for Albedo {
    fn deserialize<D>(deserializer: D) -> Result<Albedo, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct AlbedoVisitor(std::marker::PhantomData<Albedo>);

        impl<'de> de::Visitor<'de> for AlbedoVisitor {
            type Value = Albedo;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("string or array of floats")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Albedo::from_str(value).map_err(serde::de::Error::custom)
            }

            fn visit_seq<S>(self, visitor: S) -> Result<Self::Value, S::Error>
            where
                S: de::SeqAccess<'de>,
            {
                let inner =
                    Deserialize::deserialize(de::value::SeqAccessDeserializer::new(visitor))?;
                Ok(Albedo(inner))
            }
        }

        deserializer.deserialize_any(AlbedoVisitor(std::marker::PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::{
        Hittable,
        Ray,
        T_MIN,
    };

    const EPS: f64 = 1E-8;

    const SCENE: &str = r##"
camera:
  fov: 20
  from: [13, 2, 3]
  towards: [0, 0, 0]
  aperture: 0.1
  focusDistance: 10
scene:
  background:
    type: solid
    color: [0.1, 0.2, 0.3]
  materials:
    ground: { type: diffuse, albedo: [0.5, 0.5, 0.5] }
    glass: { type: refractive, index: 1.5 }
    steel: { type: reflective, albedo: "#808080", fuzz: 0.1 }
  surfaces:
    - { type: sphere, position: [0, -1000, 0], radius: 1000, material: ground }
    - { type: sphere, position: [0, 1, 0], radius: 1, material: glass }
    - { type: sphere, position: [4, 1, 0], radius: 1, material: steel }
    - { type: sphere, position: [-4, 1, 0], radius: 1, material: glass }
    - type: sphere
      position: [0, 1, 4]
      radius: 0.5
      material: { type: diffuse, albedo: ff0000 }
"##;

    #[test]
    fn load_full_scene() {
        let (scene, _camera) = read_scene(SCENE.as_bytes(), 1.5).unwrap();
        assert_eq!(scene.surfaces().len(), 5);
        // Three named materials plus one inline; the glass is shared, not duplicated.
        assert_eq!(scene.materials().len(), 4);
        assert_eq!(scene.surfaces()[1].material(), scene.surfaces()[3].material());

        let ray = Ray::new(Point3::new(0., 5., 4.), Vec3::new(0., -1., 0.));
        let hit = scene.hit(&ray, T_MIN, f64::INFINITY).unwrap();
        match scene.material(hit.material) {
            crate::material::Material::Diffuse { albedo } => {
                assert!(albedo.rel_eq(&Color::new(255. / 256., 0., 0.), EPS))
            }
            other => panic!("unexpected material {:?}", other),
        }

        let up = Ray::new(Point3::new(0., 5., 0.), Vec3::new(0., 1., 0.));
        assert!(scene.hit(&up, T_MIN, f64::INFINITY).is_none());
    }

    #[test]
    fn hex_albedo() {
        let albedo: Albedo = "#804000".parse().unwrap();
        assert!(albedo.0.rel_eq(&Color::new(0.5, 0.25, 0.0), EPS));
        assert!("80400".parse::<Albedo>().is_err());
        assert!("zzzzzz".parse::<Albedo>().is_err());
    }

    fn load_err(surfaces: &str, materials: &str) -> String {
        let yaml = format!(
            "camera: {{ fov: 90, from: [0, 0, 0], towards: [0, 0, -1] }}\n\
             scene:\n  materials: {}\n  surfaces: {}\n",
            materials, surfaces
        );
        format!("{:#}", read_scene(yaml.as_bytes(), 1.0).unwrap_err())
    }

    #[test]
    fn rejects_bad_scenes() {
        let err = load_err("[]", "{}");
        assert!(err.contains("scene is empty"), "{}", err);

        let err = load_err(
            "[{ type: sphere, position: [0, 0, -1], radius: 1, material: missing }]",
            "{}",
        );
        assert!(err.contains("unknown material 'missing'"), "{}", err);

        let err = load_err(
            "[{ type: sphere, position: [0, 0, -1], radius: 0, material: m }]",
            "{ m: { type: diffuse, albedo: [1, 1, 1] } }",
        );
        assert!(err.contains("positive radius"), "{}", err);

        let err = load_err(
            "[{ type: sphere, position: [0, 0, -1], radius: 1, material: m }]",
            "{ m: { type: refractive, index: -1.5 } }",
        );
        assert!(err.contains("index of refraction"), "{}", err);
    }

    fn camera_err(camera: &str) -> String {
        let yaml = format!(
            "camera: {}\n\
             scene:\n  surfaces:\n    - {{ type: sphere, position: [0, 0, -1], radius: 1, \
             material: {{ type: diffuse, albedo: [1, 1, 1] }} }}\n",
            camera
        );
        format!("{:#}", read_scene(yaml.as_bytes(), 1.0).unwrap_err())
    }

    #[test]
    fn rejects_degenerate_camera() {
        let err = camera_err("{ fov: 90, from: [1, 2, 3], towards: [1, 2, 3] }");
        assert!(err.contains("same point"), "{}", err);

        let err = camera_err("{ fov: 90, from: [0, 5, 0], towards: [0, 0, 0] }");
        assert!(err.contains("parallel"), "{}", err);

        let err = camera_err("{ fov: 90, from: [0, 0, 0], towards: [0, 0, -1], up: [0, 0, 2] }");
        assert!(err.contains("parallel"), "{}", err);

        let err = camera_err("{ fov: 90, from: [0, 0, 0], towards: [0, 0, -1], up: [0, 0, 0] }");
        assert!(err.contains("parallel"), "{}", err);
    }

    #[test]
    fn missing_file() {
        let err = load_scene("does/not/exist.yaml", 1.0).unwrap_err();
        assert!(format!("{:#}", err).contains("could not open scene file"));
    }
}
