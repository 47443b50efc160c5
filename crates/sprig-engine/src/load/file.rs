use std::path::{Path, PathBuf};

use crate::pixels::PixelBuffer;

use super::{ImageLoader, LoadError};

/// Loads images from disk, resolving URLs against a root directory.
///
/// Accepted forms: `relative/path.png`, `/absolute/path.png` and
/// `file://` URLs of either.
#[derive(Debug, Clone)]
pub struct FileLoader {
    root: PathBuf,
}

impl FileLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn resolve(&self, url: &str) -> PathBuf {
        let path = Path::new(url.strip_prefix("file://").unwrap_or(url));
        if path.is_absolute() { path.to_path_buf() } else { self.root.join(path) }
    }
}

impl ImageLoader for FileLoader {
    fn load(&self, url: &str) -> Result<PixelBuffer, LoadError> {
        let path = self.resolve(url);
        log::debug!("loading {url} from {}", path.display());

        let bytes = std::fs::read(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                LoadError::NotFound { url: url.to_string() }
            } else {
                LoadError::Io { url: url.to_string(), source }
            }
        })?;

        let decoded = image::load_from_memory(&bytes)
            .map_err(|source| LoadError::Decode { url: url.to_string(), source })?;

        PixelBuffer::from_image(decoded.to_rgba8())
            .map_err(|source| LoadError::Raster { url: url.to_string(), source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixels::Rgba;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("sprig-file-loader-{tag}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn resolves_relative_and_file_urls() {
        let loader = FileLoader::new("/assets");
        assert_eq!(loader.resolve("a/b.png"), PathBuf::from("/assets/a/b.png"));
        assert_eq!(loader.resolve("file://c.png"), PathBuf::from("/assets/c.png"));
        assert_eq!(loader.resolve("file:///tmp/d.png"), PathBuf::from("/tmp/d.png"));
    }

    #[test]
    fn decodes_png_to_rgba() {
        let dir = scratch_dir("png");
        let src = PixelBuffer::filled(3, 2, Rgba::new(10, 20, 30, 255));
        src.clone().into_image().save(dir.join("shape.png")).unwrap();

        let loaded = FileLoader::new(&dir).load("shape.png").unwrap();
        assert_eq!(loaded, src);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = scratch_dir("missing");
        let err = FileLoader::new(&dir).load("nope.png").unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
        assert_eq!(err.url(), "nope.png");
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let dir = scratch_dir("garbage");
        std::fs::write(dir.join("bad.png"), b"definitely not a png").unwrap();
        let err = FileLoader::new(&dir).load("bad.png").unwrap_err();
        assert!(matches!(err, LoadError::Decode { .. }));
    }
}
