use std::time::Instant;

use anyhow::anyhow;
use clap::{
    Parser,
    ValueEnum,
};
use log::{
    info,
    LevelFilter,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use raytracer::output;
use raytracer::progress;
use raytracer::render;
use raytracer::render::RenderConfig;
use raytracer::scene;
use raytracer::scene::example::Example;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// A simple path tracer for scenes made of spheres.
#[derive(Parser)]
#[command(name = "raytracer")]
struct TracerOpt {
    /// Number of samples to take per pixel.
    #[arg(long, short, default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..))]
    num_samples: u32,
    /// Maximum number of bounces per path.
    #[arg(long, short = 'd', default_value_t = 50)]
    max_depth: usize,
    /// Destination of the output image.
    ///
    /// Use `-` for a PPM on stdout. Otherwise the format is chosen by extension:
    /// supported formats: ppm, png
    #[arg(long, short, default_value = "-")]
    output: String,
    /// Output image width.
    #[arg(long, default_value_t = 400)]
    width: usize,
    /// Output image height.
    #[arg(long)]
    height: Option<usize>,
    /// Output image aspect ratio [default: 16/9].
    #[arg(long, conflicts_with = "height")]
    aspect_ratio: Option<f64>,
    /// Seed to use for RNG.
    ///
    /// By default the RNG will be seeded through the OS-provided entropy source.
    #[arg(long)]
    seed: Option<u64>,
    /// A scene file to load from configuration.
    #[arg(long, conflicts_with = "example")]
    scene: Option<String>,
    /// Built-in scene to render: matte, two-spheres, materials or one-weekend.
    #[arg(long, default_value = "matte")]
    example: Example,
    /// Logging verbosity.
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
    /// Don't display render progress.
    #[arg(long, short)]
    quiet: bool,
}

impl TracerOpt {
    const DEFAULT_ASPECT_RATIO: f64 = 16.0 / 9.0;

    fn height(&self) -> usize {
        if let Some(height) = self.height {
            height
        } else {
            (self.width as f64 / self.aspect_ratio()) as usize
        }
    }

    fn aspect_ratio(&self) -> f64 {
        if let Some(height) = self.height {
            self.width as f64 / height as f64
        } else if let Some(aspect_ratio) = self.aspect_ratio {
            aspect_ratio
        } else {
            TracerOpt::DEFAULT_ASPECT_RATIO
        }
    }

    fn render_config(&self) -> anyhow::Result<RenderConfig> {
        let height = self.height();
        if self.width == 0 || height == 0 {
            return Err(anyhow!(
                "image must be at least 1x1, got {}x{}",
                self.width,
                height
            ));
        }
        Ok(RenderConfig {
            width: self.width,
            height,
            samples_per_pixel: self.num_samples as usize,
            max_depth: self.max_depth,
        })
    }
}

fn main() -> anyhow::Result<()> {
    let opt = TracerOpt::parse();
    env_logger::Builder::from_default_env()
        .filter_level(opt.log_level.into())
        .init();

    let config = opt.render_config()?;
    let aspect_ratio = opt.aspect_ratio();

    let start = Instant::now();
    let (scene, camera) = if let Some(ref path) = opt.scene {
        info!("loading scene from {}", path);
        scene::load_scene(path, aspect_ratio)?
    } else {
        info!("using example scene {:?}", opt.example);
        opt.example.scene(aspect_ratio)?
    };

    let mut rng = small_rng(opt.seed);
    let progress = progress::ProgressBar::new(config.width * config.height);
    let recorder = progress.create_recorder();
    let (image, stats) = std::thread::scope(|s| {
        if !opt.quiet {
            let samples_per_pixel = config.samples_per_pixel;
            s.spawn(move || progress.run(samples_per_pixel));
        }
        let result = render::render(&scene, &camera, &config, &mut rng, Some(&recorder));
        recorder.finish();
        result
    });

    let elapsed_sec = start.elapsed().as_secs_f64();
    let rays_per_sec = (stats.paths() as f64) / elapsed_sec;
    info!("done in {elapsed_sec:.2}s ({rays_per_sec:.0} paths/s)");
    if stats.exhausted > 0 {
        info!(
            "{} of {} paths ran out of bounces",
            stats.exhausted,
            stats.paths()
        );
    }

    output::save(&image, &opt.output)
}

fn small_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(seed) => {
            info!("seeding RNG with {}", seed);
            SmallRng::seed_from_u64(seed)
        }
        None => SmallRng::from_entropy(),
    }
}
