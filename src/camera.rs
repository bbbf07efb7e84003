use rand::Rng;

use crate::geom::{
    Point3,
    Vec3,
};
use crate::trace::Ray;
use crate::util::RandUtil;

/// A thin-lens camera.
///
/// With a zero aperture this degenerates to a pinhole and every ray leaves from the
/// same point; wider apertures blur everything not at the focus distance.
#[derive(Debug, Clone)]
pub struct Camera {
    lower_left: Point3,
    horizontal: Vec3,
    vertical: Vec3,
    origin: Point3,
    u: Vec3,
    v: Vec3,
    lens_radius: f64,
}

#[derive(Debug, Clone)]
pub struct CameraBuilder {
    from: Point3,
    towards: Point3,
    aspect_ratio: f64,
    vfov_radians: f64,
    vup: Vec3,
    aperture: f64,
    focus_dist: f64,
}

impl Camera {
    /// Start building a camera with the given vertical field of view (in degrees).
    pub fn builder(vfov: f64, aspect_ratio: f64) -> CameraBuilder {
        CameraBuilder {
            aspect_ratio,
            vfov_radians: vfov.to_radians(),
            from: Point3::new(0., 0., 0.),
            towards: Point3::new(0., 0., -1.),
            vup: Vec3::new(0., 1., 0.),
            aperture: 0.0,
            focus_dist: 1.0,
        }
    }

    /// The fixed-lens camera: at the origin looking down -z, with a unit focal
    /// length, a viewport two units tall and no defocus blur.
    pub fn pinhole(aspect_ratio: f64) -> Camera {
        Camera::builder(90.0, aspect_ratio).build()
    }

    fn new(builder: CameraBuilder) -> Camera {
        let h = (builder.vfov_radians / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = builder.aspect_ratio * viewport_height;

        // Form an orthonormal basis for our camera system.
        let w: Vec3 = (builder.from - builder.towards).unit();
        let u = builder.vup.cross(&w).unit();
        let v = w.cross(&u);

        let focus_dist = builder.focus_dist;
        let origin = builder.from;
        let horizontal = focus_dist * viewport_width * u;
        let vertical = focus_dist * viewport_height * v;
        let lower_left = origin - horizontal / 2.0 - vertical / 2.0 - focus_dist * w;
        Camera {
            origin,
            horizontal,
            vertical,
            lower_left,
            u,
            v,
            lens_radius: builder.aperture / 2.0,
        }
    }

    /// A primary ray through the image plane at normalized coordinates (s, t).
    ///
    /// (0, 0) is the lower left corner of the image and (1, 1) the upper right.
    pub fn get_ray<R: Rng>(&self, rng: &mut R, s: f64, t: f64) -> Ray {
        let offset = if self.lens_radius > 0.0 {
            let rd = self.lens_radius * rng.gen_in_unit_disk();
            self.u * rd.x() + self.v * rd.y()
        } else {
            Vec3::default()
        };
        let origin = self.origin + offset;
        let dir = (self.lower_left + s * self.horizontal + t * self.vertical) - origin;
        Ray::new(origin, dir)
    }
}

impl CameraBuilder {
    pub fn from(self, from: Point3) -> Self {
        CameraBuilder { from, ..self }
    }

    pub fn towards(self, towards: Point3) -> Self {
        CameraBuilder { towards, ..self }
    }

    pub fn up(self, vup: Vec3) -> Self {
        CameraBuilder { vup, ..self }
    }

    pub fn aperture(self, aperture: f64) -> Self {
        CameraBuilder { aperture, ..self }
    }

    pub fn focus_dist(self, focus_dist: f64) -> Self {
        CameraBuilder { focus_dist, ..self }
    }

    pub fn build(self) -> Camera {
        Camera::new(self)
    }
}
