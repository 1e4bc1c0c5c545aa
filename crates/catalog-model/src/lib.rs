use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Result, ensure};
use serde::Deserialize;

pub use flatten::{FlattenedCatalog, FlattenedEntry};
pub use project::{Catalog, ImageRef, Project};

mod project {
    use super::*;

    /// Opaque reference to a project screenshot (path or URL).
    #[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
    #[serde(transparent)]
    pub struct ImageRef(String);

    impl ImageRef {
        pub fn new(raw: impl Into<String>) -> Self {
            Self(raw.into())
        }

        pub fn as_str(&self) -> &str {
            &self.0
        }

        /// True when the reference points at a remote resource rather than a
        /// file below the asset root.
        pub fn is_remote(&self) -> bool {
            self.0.starts_with("http://") || self.0.starts_with("https://")
        }

        /// The file a local reference names below `root`.
        pub fn resolve_against(&self, root: &Path) -> PathBuf {
            root.join(&self.0)
        }
    }

    impl fmt::Display for ImageRef {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(&self.0)
        }
    }

    impl From<&str> for ImageRef {
        fn from(value: &str) -> Self {
            Self::new(value)
        }
    }

    impl From<String> for ImageRef {
        fn from(value: String) -> Self {
            Self(value)
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
    #[serde(rename_all = "kebab-case", deny_unknown_fields)]
    pub struct Project {
        pub name: String,
        #[serde(default)]
        pub repository_link: Option<String>,
        #[serde(default)]
        pub site_link: Option<String>,
        pub images: Vec<ImageRef>,
    }

    impl Project {
        pub fn new<I, S>(name: impl Into<String>, images: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<ImageRef>,
        {
            Self {
                name: name.into(),
                repository_link: None,
                site_link: None,
                images: images.into_iter().map(Into::into).collect(),
            }
        }

        pub fn with_repository_link(mut self, link: impl Into<String>) -> Self {
            self.repository_link = Some(link.into());
            self
        }

        pub fn with_site_link(mut self, link: impl Into<String>) -> Self {
            self.site_link = Some(link.into());
            self
        }

        pub fn validate(&self, prefix: &str) -> Result<()> {
            ensure!(
                !self.name.trim().is_empty(),
                "{}.name must not be blank",
                prefix
            );
            ensure!(
                !self.images.is_empty(),
                "{} ({}) must list at least one image",
                prefix,
                self.name
            );
            for (field, value) in [
                ("repository-link", &self.repository_link),
                ("site-link", &self.site_link),
            ] {
                if let Some(link) = value {
                    ensure!(
                        !link.trim().is_empty(),
                        "{}.{} must not be blank when provided",
                        prefix,
                        field
                    );
                }
            }
            for (idx, image) in self.images.iter().enumerate() {
                ensure!(
                    !image.as_str().trim().is_empty(),
                    "{}.images[{}] must not be blank",
                    prefix,
                    idx
                );
            }
            Ok(())
        }
    }

    /// Ordered project list as written in the configuration.
    #[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
    #[serde(transparent)]
    pub struct Catalog {
        projects: Vec<Project>,
    }

    impl Catalog {
        pub fn new(projects: Vec<Project>) -> Self {
            Self { projects }
        }

        pub fn projects(&self) -> &[Project] {
            &self.projects
        }

        pub fn len(&self) -> usize {
            self.projects.len()
        }

        pub fn is_empty(&self) -> bool {
            self.projects.is_empty()
        }

        pub fn image_count(&self) -> usize {
            self.projects.iter().map(|p| p.images.len()).sum()
        }

        pub fn validate(&self) -> Result<()> {
            ensure!(
                !self.projects.is_empty(),
                "projects must include at least one entry"
            );
            let mut seen = HashSet::new();
            for (idx, project) in self.projects.iter().enumerate() {
                project.validate(&format!("projects[{idx}]"))?;
                ensure!(
                    seen.insert(project.name.as_str()),
                    "duplicate project name '{}'",
                    project.name
                );
            }
            Ok(())
        }

        /// Build the flattened (project, image) address space.
        pub fn flatten(&self) -> FlattenedCatalog {
            FlattenedCatalog::build(self.projects.clone())
        }
    }
}

mod flatten {
    use super::*;

    /// One (project, image) pair of the flattened sequence.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct FlattenedEntry {
        pub project_index: usize,
        pub project_name: Arc<str>,
        pub image: ImageRef,
    }

    /// The catalog flattened into a single cursor-addressable sequence.
    ///
    /// Built once at start-up and shared by value; cloning is cheap.
    #[derive(Debug, Clone)]
    pub struct FlattenedCatalog {
        projects: Arc<[Project]>,
        entries: Arc<[FlattenedEntry]>,
        starts: Arc<[usize]>,
    }

    impl FlattenedCatalog {
        pub(crate) fn build(projects: Vec<Project>) -> Self {
            let mut entries = Vec::with_capacity(projects.iter().map(|p| p.images.len()).sum());
            let mut starts = Vec::with_capacity(projects.len());
            for (project_index, project) in projects.iter().enumerate() {
                starts.push(entries.len());
                let name: Arc<str> = Arc::from(project.name.as_str());
                for image in &project.images {
                    entries.push(FlattenedEntry {
                        project_index,
                        project_name: name.clone(),
                        image: image.clone(),
                    });
                }
            }
            Self {
                projects: projects.into(),
                entries: entries.into(),
                starts: starts.into(),
            }
        }

        pub fn len(&self) -> usize {
            self.entries.len()
        }

        pub fn is_empty(&self) -> bool {
            self.entries.is_empty()
        }

        pub fn entries(&self) -> &[FlattenedEntry] {
            &self.entries
        }

        pub fn get(&self, index: usize) -> Option<&FlattenedEntry> {
            self.entries.get(index)
        }

        pub fn projects(&self) -> &[Project] {
            &self.projects
        }

        pub fn project_of(&self, index: usize) -> Option<&Project> {
            self.entries
                .get(index)
                .and_then(|entry| self.projects.get(entry.project_index))
        }

        /// Index of the first flattened entry belonging to `project_index`.
        pub fn project_start(&self, project_index: usize) -> Option<usize> {
            self.starts.get(project_index).copied()
        }

        /// Image references in flattened order, as handed to the carousel.
        pub fn images(&self) -> Vec<ImageRef> {
            self.entries.iter().map(|e| e.image.clone()).collect()
        }
    }
}
