use crate::pixels::PixelBufferError;

/// Resource fetch or decode failure.
///
/// Logged by the scene; the sprite stays pending and nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {url}")]
    Io {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {url}")]
    Decode {
        url: String,
        #[source]
        source: image::ImageError,
    },

    #[error("decoded {url} is not a usable raster")]
    Raster {
        url: String,
        #[source]
        source: PixelBufferError,
    },

    #[error("resource {url} not found")]
    NotFound { url: String },

    #[error("could not start load worker for {url}")]
    Worker {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

impl LoadError {
    pub fn url(&self) -> &str {
        match self {
            LoadError::Io { url, .. }
            | LoadError::Decode { url, .. }
            | LoadError::Raster { url, .. }
            | LoadError::NotFound { url }
            | LoadError::Worker { url, .. } => url,
        }
    }

    /// Message including the underlying cause, for log lines.
    pub fn report(&self) -> String {
        use std::error::Error as _;
        match self.source() {
            Some(cause) => format!("{self}: {cause}"),
            None => self.to_string(),
        }
    }
}
