use anyhow::anyhow;
use rand::Rng;
use serde::Deserialize;

use crate::geom::Color;
use crate::material::{
    Material,
    MaterialId,
};
use crate::surfaces::Surface;
use crate::trace::{
    Hit,
    Hittable,
    Ray,
    T_MIN,
};

pub mod example;
mod load;

pub use load::load_scene;

/// What a ray sees when it escapes the scene.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Background {
    /// Blend from `horizon` (looking straight down) to `zenith` (straight up),
    /// keyed on the vertical component of the ray direction.
    Gradient { horizon: Color, zenith: Color },
    Solid { color: Color },
}

impl Default for Background {
    fn default() -> Self {
        Background::Gradient {
            horizon: Color::new(1.0, 1.0, 1.0),
            zenith: Color::new(0.5, 0.7, 1.0),
        }
    }
}

impl Background {
    pub fn color(&self, ray: &Ray) -> Color {
        match *self {
            Background::Gradient { horizon, zenith } => {
                let unit_direction = ray.dir().unit();
                let t = 0.5 * (unit_direction.y() + 1.0);
                horizon.lerp(zenith, t)
            }
            Background::Solid { color } => color,
        }
    }
}

/// How a traced path ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathEnd {
    /// Left the scene and picked up the background.
    Escaped,
    /// A material absorbed the ray.
    Absorbed,
    /// The bounce budget ran out.
    Exhausted,
}

/// An ordered list of surfaces along with the materials they reference.
#[derive(Debug, Clone)]
pub struct Scene {
    surfaces: Vec<Surface>,
    materials: Vec<Material>,
    background: Background,
}

impl Scene {
    pub fn builder() -> SceneBuilder {
        SceneBuilder {
            surfaces: Vec::new(),
            materials: Vec::new(),
            background: Background::default(),
        }
    }

    pub fn material(&self, id: MaterialId) -> &Material {
        &self.materials[id.index()]
    }

    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }
}

pub struct SceneBuilder {
    surfaces: Vec<Surface>,
    materials: Vec<Material>,
    background: Background,
}

impl SceneBuilder {
    /// Store a material, returning a handle that any number of surfaces can share.
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId::new(self.materials.len() - 1)
    }

    pub fn add<S>(&mut self, surface: S)
    where
        S: Into<Surface>,
    {
        self.surfaces.push(surface.into());
    }

    pub fn set_background(&mut self, background: Background) {
        self.background = background;
    }

    pub fn build(self) -> anyhow::Result<Scene> {
        let materials = self.materials.len();
        if let Some(surface) = self
            .surfaces
            .iter()
            .find(|s| s.material().index() >= materials)
        {
            return Err(anyhow!(
                "surface references material {} but only {} are defined",
                surface.material().index(),
                materials
            ));
        }
        Ok(Scene {
            surfaces: self.surfaces,
            materials: self.materials,
            background: self.background,
        })
    }
}

impl Hittable for Scene {
    fn hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<Hit> {
        let mut closest_so_far = t_max;
        let mut closest_hit: Option<Hit> = None;
        for surface in &self.surfaces {
            if let Some(hit) = surface.hit(ray, t_min, closest_so_far) {
                // Equal distances keep the earlier surface.
                if closest_hit.is_none() || hit.t < closest_so_far {
                    closest_so_far = hit.t;
                    closest_hit = Some(hit);
                }
            }
        }
        closest_hit
    }
}

impl Scene {
    /// Radiance arriving along `ray`, following at most `max_depth` bounces.
    pub fn ray_color<R: Rng>(&self, ray: Ray, rng: &mut R, max_depth: usize) -> Color {
        self.trace(ray, rng, max_depth).0
    }

    /// Like `ray_color`, but also reports how the path terminated.
    pub fn trace<R: Rng>(&self, mut ray: Ray, rng: &mut R, max_depth: usize) -> (Color, PathEnd) {
        // Each bounce multiplies the final color by that surface's attenuation, so
        // rather than recursing we carry the running product forward.
        let mut throughput = Color::new(1.0, 1.0, 1.0);
        for _ in 0..max_depth {
            let hit = match self.hit(&ray, T_MIN, f64::INFINITY) {
                Some(hit) => hit,
                None => return (throughput * self.background.color(&ray), PathEnd::Escaped),
            };
            match self.material(hit.material).scatter(&ray, &hit, rng) {
                Some((attenuation, scattered)) => {
                    throughput *= attenuation;
                    ray = scattered;
                }
                None => return (Color::default(), PathEnd::Absorbed),
            }
        }
        (Color::default(), PathEnd::Exhausted)
    }
}
