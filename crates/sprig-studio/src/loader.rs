use std::path::PathBuf;

use sprig_engine::load::{FileLoader, ImageLoader, LoadError};
use sprig_engine::pixels::{PixelBuffer, Rgba};

const GENERATED_SIZE: u32 = 250;

/// Loader serving built-in `gen:` images and falling back to files.
pub struct StudioLoader {
    files: FileLoader,
}

impl StudioLoader {
    pub fn new(assets: impl Into<PathBuf>) -> Self {
        Self {
            files: FileLoader::new(assets),
        }
    }
}

impl ImageLoader for StudioLoader {
    fn load(&self, url: &str) -> Result<PixelBuffer, LoadError> {
        match url.strip_prefix("gen:") {
            Some(name) => generate(name, GENERATED_SIZE).ok_or_else(|| LoadError::NotFound {
                url: url.to_string(),
            }),
            None => self.files.load(url),
        }
    }
}

fn generate(name: &str, size: u32) -> Option<PixelBuffer> {
    let shade: fn(u32, u32, u32) -> Rgba = match name {
        "rings" => rings,
        "checker" => checker,
        "gradient" => gradient,
        _ => return None,
    };

    let mut buf = PixelBuffer::new(size, size);
    for y in 0..size {
        for x in 0..size {
            buf.set_pixel(x, y, shade(x, y, size));
        }
    }
    Some(buf)
}

fn rings(x: u32, y: u32, size: u32) -> Rgba {
    let c = size as f64 / 2.0;
    let d = ((x as f64 - c).powi(2) + (y as f64 - c).powi(2)).sqrt();
    if d > c {
        return Rgba::TRANSPARENT;
    }
    let band = (d / 12.0) as u32 % 3;
    match band {
        0 => Rgba::opaque(230, 90, 60),
        1 => Rgba::opaque(245, 200, 80),
        _ => Rgba::opaque(40, 110, 170),
    }
}

fn checker(x: u32, y: u32, _size: u32) -> Rgba {
    if (x / 25 + y / 25) % 2 == 0 {
        Rgba::opaque(235, 235, 235)
    } else {
        Rgba::opaque(30, 30, 40)
    }
}

fn gradient(x: u32, y: u32, size: u32) -> Rgba {
    let s = size.max(2) - 1;
    Rgba::opaque((x * 255 / s) as u8, (y * 255 / s) as u8, 160)
}
