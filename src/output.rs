use std::fs::File;
use std::io;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;

use anyhow::{
    anyhow,
    Context,
};
use log::info;

use crate::render::Image;

/// Supported encodings for a finished image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Plain-text `P3` portable pixmap.
    Ppm,
    Png,
}

impl Format {
    /// Pick a format from the extension of `path`.
    pub fn from_path(path: &Path) -> anyhow::Result<Format> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("ppm") => Ok(Format::Ppm),
            Some("png") => Ok(Format::Png),
            Some(ext) => Err(anyhow!("unsupported output format '.{}'", ext)),
            None => Err(anyhow!(
                "output '{}' has no extension; expected .ppm or .png",
                path.display()
            )),
        }
    }
}

/// Write `image` as an ASCII PPM: a `P3` header followed by one `R G B` line per pixel.
pub fn write_ppm<W: Write>(image: &Image, mut out: W) -> io::Result<()> {
    write!(out, "P3\n{} {}\n255\n", image.width(), image.height())?;
    for [r, g, b] in image.pixels() {
        writeln!(out, "{} {} {}", r, g, b)?;
    }
    out.flush()
}

pub fn write_png<W: Write>(image: &Image, out: W) -> anyhow::Result<()> {
    let width = u32::try_from(image.width()).context("image too wide for png")?;
    let height = u32::try_from(image.height()).context("image too tall for png")?;
    let mut encoder = png::Encoder::new(out, width, height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer
        .write_image_data(&image.as_bytes())
        .with_context(|| "could not write image")?;
    writer.finish()?;
    Ok(())
}

/// Save `image` to `path`, or write a PPM to stdout when `path` is `-`.
pub fn save(image: &Image, path: &str) -> anyhow::Result<()> {
    if path == "-" {
        let stdout = io::stdout();
        return write_ppm(image, BufWriter::new(stdout.lock())).context("write image to stdout");
    }
    let path = Path::new(path);
    let format = Format::from_path(path)?;
    let file = File::create(path)
        .with_context(|| format!("could not create output file '{}'", path.display()))?;
    let out = BufWriter::new(file);
    match format {
        Format::Ppm => write_ppm(image, out)?,
        Format::Png => write_png(image, out)?,
    }
    info!("wrote {}", path.display());
    Ok(())
}
