use log::{
    debug,
    info,
};
use rand::Rng;

use crate::camera::Camera;
use crate::geom::Color;
use crate::progress::ProgressRecorder;
use crate::scene::{
    PathEnd,
    Scene,
};

/// Fixed parameters of a single render.
#[derive(Debug, Clone, Copy)]
pub struct RenderConfig {
    pub width: usize,
    pub height: usize,
    pub samples_per_pixel: usize,
    pub max_depth: usize,
}

/// Counts of how each traced path terminated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub escaped: usize,
    pub absorbed: usize,
    pub exhausted: usize,
}

impl RenderStats {
    fn record(&mut self, end: PathEnd) {
        match end {
            PathEnd::Escaped => self.escaped += 1,
            PathEnd::Absorbed => self.absorbed += 1,
            PathEnd::Exhausted => self.exhausted += 1,
        }
    }

    pub fn paths(&self) -> usize {
        self.escaped + self.absorbed + self.exhausted
    }
}

/// A finished render: 8-bit RGB pixels, rows top to bottom, left to right.
#[derive(Debug, Clone)]
pub struct Image {
    width: usize,
    height: usize,
    pixels: Vec<[u8; 3]>,
}

impl Image {
    pub fn new(width: usize, height: usize, pixels: Vec<[u8; 3]>) -> Self {
        debug_assert_eq!(pixels.len(), width * height);
        Image {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[[u8; 3]] {
        &self.pixels
    }

    /// The pixel in column `x` of row `y`, counting rows from the top.
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        self.pixels[y * self.width + x]
    }

    pub fn as_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.iter().copied()).collect()
    }
}

/// Convert an accumulated sample sum into an output pixel.
///
/// The sum is averaged, gamma corrected with gamma 2, clamped just below one and
/// scaled to [0, 255].
pub fn to_rgb8(sum: Color, samples: usize) -> [u8; 3] {
    let scale = 1.0 / samples as f64;
    let channel = |c: f64| (256.0 * (c * scale).sqrt().clamp(0.0, 0.999)) as u8;
    [channel(sum.x()), channel(sum.y()), channel(sum.z())]
}

/// Render `scene` as seen by `camera`.
///
/// Pixels are produced in scanline order; `progress` is told about each finished row.
pub fn render<R: Rng>(
    scene: &Scene,
    camera: &Camera,
    config: &RenderConfig,
    rng: &mut R,
    progress: Option<&ProgressRecorder>,
) -> (Image, RenderStats) {
    let RenderConfig {
        width,
        height,
        samples_per_pixel,
        max_depth,
    } = *config;
    info!(
        "rendering {}x{} at {} samples per pixel, max depth {}",
        width, height, samples_per_pixel, max_depth
    );
    debug!(
        "scene has {} surfaces and {} materials",
        scene.surfaces().len(),
        scene.materials().len()
    );

    // Guard the normalization below against one-pixel images.
    let u_scale = (width.max(2) - 1) as f64;
    let v_scale = (height.max(2) - 1) as f64;

    let mut stats = RenderStats::default();
    let mut pixels = Vec::with_capacity(width * height);
    for j in (0..height).rev() {
        for i in 0..width {
            let mut sum = Color::default();
            for _ in 0..samples_per_pixel {
                let u = (i as f64 + rng.gen::<f64>()) / u_scale;
                let v = (j as f64 + rng.gen::<f64>()) / v_scale;
                let ray = camera.get_ray(rng, u, v);
                let (color, end) = scene.trace(ray, rng, max_depth);
                stats.record(end);
                sum += color;
            }
            pixels.push(to_rgb8(sum, samples_per_pixel));
        }
        if let Some(progress) = progress {
            progress.record(width);
        }
    }
    debug!(
        "paths: {} escaped, {} absorbed, {} hit the depth limit",
        stats.escaped, stats.absorbed, stats.exhausted
    );
    (Image::new(width, height, pixels), stats)
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;
    use crate::scene::example::Example;

    #[test]
    fn pixel_post_processing() {
        assert_eq!(to_rgb8(Color::new(0.0, 0.0, 0.0), 1), [0, 0, 0]);
        // Saturated channels clamp to 0.999 rather than wrapping.
        assert_eq!(to_rgb8(Color::new(4.0, 1.0, 100.0), 1), [255, 255, 255]);
        // 0.25 averaged over 4 samples is 0.0625, whose square root is 0.25.
        assert_eq!(to_rgb8(Color::new(0.25, 0.25, 0.25), 4), [64, 64, 64]);
        assert_eq!(to_rgb8(Color::new(-1.0, 0.0, 0.0), 1), [0, 0, 0]);
    }

    /// Two diffuse spheres through a pinhole, one sample, one bounce.
    fn golden_render(seed: u64) -> (Image, RenderStats) {
        let aspect_ratio = 16.0 / 9.0;
        let width = 800;
        let (scene, camera) = Example::TwoSpheres.scene(aspect_ratio).unwrap();
        let config = RenderConfig {
            width,
            height: (width as f64 / aspect_ratio) as usize,
            samples_per_pixel: 1,
            max_depth: 1,
        };
        let mut rng = SmallRng::seed_from_u64(seed);
        render(&scene, &camera, &config, &mut rng, None)
    }

    #[test]
    fn golden_two_spheres() {
        let (image, stats) = golden_render(2023);
        assert_eq!((image.width(), image.height()), (800, 450));
        assert_eq!(stats.paths(), 800 * 450);
        assert_eq!(stats.absorbed, 0);

        // The center ray hits the red sphere, and the single bounce is used up there.
        assert_eq!(image.pixel(400, 225), [0, 0, 0]);
        // The top left corner sees only sky.
        let [r, g, b] = image.pixel(0, 0);
        assert!((r as i32 - 204).abs() <= 1, "r = {}", r);
        assert!((g as i32 - 226).abs() <= 1, "g = {}", g);
        assert_eq!(b, 255);
    }

    #[test]
    fn fixed_seed_is_deterministic() {
        let aspect_ratio = 1.0;
        let (scene, camera) = Example::Materials.scene(aspect_ratio).unwrap();
        let config = RenderConfig {
            width: 16,
            height: 16,
            samples_per_pixel: 4,
            max_depth: 8,
        };
        let render_with = |seed| {
            let mut rng = SmallRng::seed_from_u64(seed);
            render(&scene, &camera, &config, &mut rng, None)
        };
        let (a, stats_a) = render_with(5);
        let (b, stats_b) = render_with(5);
        assert_eq!(a.pixels(), b.pixels());
        assert_eq!(stats_a, stats_b);
        assert_eq!(stats_a.paths(), 16 * 16 * 4);
    }

    #[test]
    fn rows_are_emitted_top_down() {
        let (scene, camera) = Example::TwoSpheres.scene(1.0).unwrap();
        let config = RenderConfig {
            width: 8,
            height: 8,
            samples_per_pixel: 1,
            max_depth: 1,
        };
        let mut rng = SmallRng::seed_from_u64(1);
        let (image, _) = render(&scene, &camera, &config, &mut rng, None);
        // Top row is sky, bottom row is the ground sphere, which is black at depth 1.
        assert_ne!(image.pixel(0, 0), [0, 0, 0]);
        assert_eq!(image.pixel(0, 7), [0, 0, 0]);
        assert_eq!(image.as_bytes().len(), 8 * 8 * 3);
    }
}
