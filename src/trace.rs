use crate::geom::{
    Point3,
    Vec3,
};
use crate::material::MaterialId;

/// Lower bound on accepted hits for secondary rays.
///
/// Rays leave surfaces exactly at the hit point, and floating point error would
/// otherwise let them re-hit the surface they started on ("shadow acne").
pub const T_MIN: f64 = 1e-3;

#[derive(Debug, Clone, Copy)]
pub struct Ray {
    origin: Point3,
    dir: Vec3,
}

impl Ray {
    pub fn new(origin: Point3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    pub fn origin(&self) -> Point3 {
        self.origin
    }

    pub fn dir(&self) -> Vec3 {
        self.dir
    }

    pub fn at(&self, t: f64) -> Point3 {
        self.origin + self.dir * t
    }
}

/// The result of a successful intersection query.
#[derive(Debug, Clone)]
pub struct Hit {
    pub point: Point3,
    /// Unit surface normal, always facing against the incoming ray.
    pub normal: Vec3,
    pub t: f64,
    /// Whether the ray struck the outward-facing side of the surface.
    pub front_face: bool,
    pub material: MaterialId,
}

impl Hit {
    /// Build a hit at parameter `t` along `ray`.
    ///
    /// `outward_normal` must be unit length; it is flipped when the ray arrives from
    /// the inside.
    pub fn new(ray: &Ray, t: f64, outward_normal: Vec3, material: MaterialId) -> Self {
        let point = ray.at(t);
        let front_face = ray.dir().dot(&outward_normal) < 0.0;
        let normal = if front_face {
            outward_normal
        } else {
            outward_normal.negate()
        };
        Hit {
            point,
            normal,
            t,
            front_face,
            material,
        }
    }
}

/// An object within the scene that can be hit by rays.
pub trait Hittable {
    /// Attempt to hit object with `ray`, returning the nearest hit that occurred, if any.
    ///
    /// The hit must not be returned if it occured at time t outside (t_min, t_max].
    fn hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<Hit>;
}
