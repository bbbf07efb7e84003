use crate::geom::Point3;
use crate::material::MaterialId;
use crate::trace::{
    Hit,
    Hittable,
    Ray,
};

#[derive(Debug, Clone)]
pub struct Sphere {
    center: Point3,
    radius: f64,
    material: MaterialId,
}

impl Sphere {
    pub fn new(center: Point3, radius: f64, material: MaterialId) -> Self {
        debug_assert!(radius > 0.0, "sphere radius must be positive");
        Sphere {
            center,
            radius,
            material,
        }
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }
}

impl Hittable for Sphere {
    #[inline(always)]
    fn hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<Hit> {
        let oc = ray.origin() - self.center;
        let a = ray.dir().square_length();
        // A zero-length direction has no meaningful intersection and would
        // otherwise divide by zero below.
        if !(a > 0.0 && a.is_finite()) {
            return None;
        }
        let half_b = oc.dot(&ray.dir());
        let c = oc.square_length() - self.radius * self.radius;
        let discriminant = half_b * half_b - a * c;

        if discriminant < 0.0 {
            // Does not hit the sphere.
            return None;
        }
        let in_range = |t: f64| t_min < t && t <= t_max;

        // Find the nearest root that lies in the acceptable range.
        let sqrtd = discriminant.sqrt();
        let mut root = (-half_b - sqrtd) / a;
        if !in_range(root) {
            root = (-half_b + sqrtd) / a;
            if !in_range(root) {
                return None;
            }
        }
        let outward_normal = (ray.at(root) - self.center) / self.radius;
        Some(Hit::new(ray, root, outward_normal, self.material))
    }
}

/// Every kind of object that can be placed in a scene.
#[derive(Debug, Clone)]
pub enum Surface {
    Sphere(Sphere),
}

impl Surface {
    pub fn material(&self) -> MaterialId {
        match *self {
            Self::Sphere(ref sphere) => sphere.material(),
        }
    }
}

impl Hittable for Surface {
    fn hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<Hit> {
        match *self {
            Self::Sphere(ref sphere) => sphere.hit(ray, t_min, t_max),
        }
    }
}

impl From<Sphere> for Surface {
    fn from(sphere: Sphere) -> Self {
        Surface::Sphere(sphere)
    }
}
