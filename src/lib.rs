pub mod config;
pub mod error;
pub mod events;
pub mod gallery;
pub mod gesture;
pub mod shadow;
pub mod timer;
pub mod tasks {
    pub mod carousel;
    pub mod gallery;
    pub mod preload;
    pub mod shadow;
}

pub use catalog_model::{Catalog, FlattenedCatalog, FlattenedEntry, ImageRef, Project};
