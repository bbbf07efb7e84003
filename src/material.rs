use rand::Rng;

use crate::geom::{
    Color,
    Vec3,
};
use crate::trace::{
    Hit,
    Ray,
};
use crate::util::RandUtil;

/// Handle to a material stored in a scene's material table.
///
/// Many surfaces may share one id, so a material is stored exactly once no matter
/// how many spheres use it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(usize);

impl MaterialId {
    pub(crate) const fn new(index: usize) -> Self {
        MaterialId(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    /// Lambertian reflector.
    Diffuse { albedo: Color },
    /// Mirror, roughened by `fuzz` in [0, 1].
    Reflective { albedo: Color, fuzz: f64 },
    /// Clear dielectric such as glass or water.
    Refractive { index_of_refraction: f64 },
}

impl Material {
    pub fn diffuse(albedo: Color) -> Self {
        Material::Diffuse { albedo }
    }

    pub fn reflective(albedo: Color, fuzz: f64) -> Self {
        Material::Reflective {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    pub fn refractive(index_of_refraction: f64) -> Self {
        debug_assert!(index_of_refraction > 0.0);
        Material::Refractive {
            index_of_refraction,
        }
    }

    /// Decide how light arriving along `ray` continues after striking `hit`.
    ///
    /// Returns the attenuation and the scattered ray, or `None` if the ray was absorbed.
    #[inline(always)]
    pub fn scatter<R: Rng>(&self, ray: &Ray, hit: &Hit, rng: &mut R) -> Option<(Color, Ray)> {
        match *self {
            Self::Diffuse { albedo } => Some((albedo, lambertian_scatter(hit, rng))),
            Self::Reflective { albedo, fuzz } => {
                metallic_scatter(fuzz, ray, hit, rng).map(|r| (albedo, r))
            }
            Self::Refractive {
                index_of_refraction,
            } => Some((
                Color::new(1.0, 1.0, 1.0),
                dielectric_scatter(index_of_refraction, ray, hit),
            )),
        }
    }
}

#[inline(always)]
fn lambertian_scatter<R: Rng>(hit: &Hit, rng: &mut R) -> Ray {
    let mut scatter_direction = hit.normal + rng.gen_unit_vector();

    // Catch degenerate scatter direction
    if scatter_direction.near_zero() {
        scatter_direction = hit.normal;
    }

    Ray::new(hit.point, scatter_direction)
}

#[inline(always)]
fn metallic_scatter<R: Rng>(fuzz: f64, ray: &Ray, hit: &Hit, rng: &mut R) -> Option<Ray> {
    let reflected = reflect(&ray.dir().unit(), &hit.normal);
    if reflected.dot(&hit.normal) <= 0.0 {
        return None;
    }
    let dir = if fuzz > 0.0 {
        reflected + fuzz * rng.gen_in_unit_sphere()
    } else {
        reflected
    };
    Some(Ray::new(hit.point, dir))
}

/// Refract through the surface, or reflect when refraction is impossible.
///
/// There is no partial (Fresnel) reflection; below the critical angle every ray refracts.
#[inline(always)]
fn dielectric_scatter(refractive_index: f64, ray: &Ray, hit: &Hit) -> Ray {
    let refraction_ratio = if hit.front_face {
        1.0 / refractive_index
    } else {
        refractive_index
    };
    let unit_dir = ray.dir().unit();
    let cos_theta = unit_dir.negate().dot(&hit.normal).min(1.0);
    let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();
    let cannot_refract = refraction_ratio * sin_theta > 1.0;
    let scatter_dir = if cannot_refract {
        // Total internal reflection.
        reflect(&unit_dir, &hit.normal)
    } else {
        refract(&unit_dir, &hit.normal, refraction_ratio)
    };
    Ray::new(hit.point, scatter_dir)
}

/// Reflect an inbound ray v across a surface given the surface normal n.
fn reflect(v: &Vec3, n: &Vec3) -> Vec3 {
    *v - (2.0 * v.dot(n)) * *n
}

fn refract(uv: &Vec3, n: &Vec3, etai_over_etat: f64) -> Vec3 {
    let cos_theta = uv.negate().dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (*uv + cos_theta * *n);
    let r_out_parallel = -1.0 * (1.0 - r_out_perp.square_length()).abs().sqrt() * *n;

    r_out_perp + r_out_parallel
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;
    use crate::geom::Point3;

    const EPS: f64 = 1E-8;

    fn hit_at_origin(ray: &Ray, outward_normal: Vec3) -> Hit {
        // Place the hit at t = 1 so the point is origin + dir.
        Hit::new(ray, 1.0, outward_normal, MaterialId::new(0))
    }

    #[test]
    fn diffuse_always_scatters_from_hit_point() {
        let mut rng = SmallRng::seed_from_u64(1);
        let material = Material::diffuse(Color::new(0.8, 0.3, 0.4));
        let ray = Ray::new(Point3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        let hit = hit_at_origin(&ray, Vec3::new(0.0, 1.0, 0.0));

        for _ in 0..1000 {
            let (attenuation, scattered) = material
                .scatter(&ray, &hit, &mut rng)
                .expect("diffuse never absorbs");
            assert!(attenuation.rel_eq(&Color::new(0.8, 0.3, 0.4), EPS));
            assert!(scattered.origin().rel_eq(&hit.point, EPS));
            assert!(!scattered.dir().near_zero());
            // normal + a unit vector never points below the surface.
            assert!(scattered.dir().dot(&hit.normal) >= 0.0);
        }
    }

    #[test]
    fn perfect_mirror_reflects_head_on_ray_back() {
        let mut rng = SmallRng::seed_from_u64(2);
        let material = Material::reflective(Color::new(0.7, 0.6, 0.5), 0.0);
        let incoming = Vec3::new(0.0, 0.0, -1.0);
        let ray = Ray::new(Point3::new(0.0, 0.0, 1.0), incoming);
        let hit = hit_at_origin(&ray, Vec3::new(0.0, 0.0, 1.0));

        let (attenuation, scattered) = material.scatter(&ray, &hit, &mut rng).unwrap();
        assert!(attenuation.rel_eq(&Color::new(0.7, 0.6, 0.5), EPS));
        assert!(scattered.dir().rel_eq(&incoming.negate(), EPS));
    }

    #[test]
    fn mirror_reflection_below_surface_is_absorbed() {
        let mut rng = SmallRng::seed_from_u64(3);
        let material = Material::reflective(Color::new(1.0, 1.0, 1.0), 0.0);
        // A ray travelling along the normal reflects into the surface.
        let ray = Ray::new(Point3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 0.0, 1.0));
        let hit = Hit {
            point: Point3::new(0.0, 0.0, 0.0),
            normal: Vec3::new(0.0, 0.0, 1.0),
            t: 1.0,
            front_face: true,
            material: MaterialId::new(0),
        };
        assert!(material.scatter(&ray, &hit, &mut rng).is_none());

        // Grazing rays reflect exactly along the surface, which also counts as absorbed.
        let grazing = Ray::new(Point3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(material.scatter(&grazing, &hit, &mut rng).is_none());
    }

    #[test]
    fn fuzz_is_clamped() {
        match Material::reflective(Color::default(), 3.0) {
            Material::Reflective { fuzz, .. } => assert_eq!(fuzz, 1.0),
            other => panic!("unexpected material {:?}", other),
        }
    }

    #[test]
    fn glass_refracts_at_normal_incidence() {
        let mut rng = SmallRng::seed_from_u64(4);
        let material = Material::refractive(1.5);
        let incoming = Vec3::new(0.0, 0.0, -1.0);
        let ray = Ray::new(Point3::new(0.0, 0.0, 1.0), incoming);
        let hit = hit_at_origin(&ray, Vec3::new(0.0, 0.0, 1.0));
        assert!(hit.front_face);

        let (attenuation, scattered) = material.scatter(&ray, &hit, &mut rng).unwrap();
        assert!(attenuation.rel_eq(&Color::new(1.0, 1.0, 1.0), EPS));
        // Straight through, not back out.
        assert!(scattered.dir().rel_eq(&incoming, EPS));
    }

    #[test]
    fn glass_totally_reflects_past_critical_angle() {
        let mut rng = SmallRng::seed_from_u64(5);
        let material = Material::refractive(1.5);
        // Leaving the medium at 60 degrees from the normal; sin(60) * 1.5 > 1.
        let dir = Vec3::new((60f64).to_radians().sin(), 0.0, (60f64).to_radians().cos());
        let ray = Ray::new(Point3::new(0.0, 0.0, 0.0) - dir, dir);
        let hit = hit_at_origin(&ray, Vec3::new(0.0, 0.0, 1.0));
        assert!(!hit.front_face);

        let (_, scattered) = material.scatter(&ray, &hit, &mut rng).unwrap();
        let expected = Vec3::new(dir.x(), 0.0, -dir.z());
        assert!(scattered.dir().rel_eq(&expected, 1e-9));
    }

    #[test]
    fn glass_bends_toward_normal_when_entering() {
        let mut rng = SmallRng::seed_from_u64(6);
        let material = Material::refractive(1.5);
        let theta = (30f64).to_radians();
        let dir = Vec3::new(theta.sin(), 0.0, -theta.cos());
        let ray = Ray::new(Point3::new(0.0, 0.0, 0.0) - dir, dir);
        let hit = hit_at_origin(&ray, Vec3::new(0.0, 0.0, 1.0));

        let (_, scattered) = material.scatter(&ray, &hit, &mut rng).unwrap();
        let out = scattered.dir();
        // Snell: sin(theta_t) = sin(theta_i) / 1.5
        assert!((out.x() - theta.sin() / 1.5).abs() < 1e-9);
        assert!(out.z() < 0.0);
        assert!((out.length() - 1.0).abs() < 1e-9);
    }
}
