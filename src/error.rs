use std::path::PathBuf;

use thiserror::Error;

/// Library error type for gallery operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The configured project catalog violates a structural rule.
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    /// An image could not be warmed by the preloader.
    #[error("failed to preload image {}", path.display())]
    Preload {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A blocking preload probe panicked or was cancelled.
    #[error("preload task for {} did not complete", .0.display())]
    PreloadJoin(PathBuf),

    /// Underlying IO error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// YAML/serde configuration error.
    #[error(transparent)]
    Config(#[from] serde_yaml::Error),
}
