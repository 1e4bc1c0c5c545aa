//! Cursor over the flattened project catalog.
//!
//! The reducer is pure: every action maps `(state, catalog)` to a new state
//! and never fails. Requests that cannot be honoured (no further project,
//! empty catalog) leave the cursor where it is.

use catalog_model::{FlattenedCatalog, FlattenedEntry, ImageRef, Project};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryAction {
    SetIndex(usize),
    NextImage,
    PreviousImage,
    NextProject,
    PreviousProject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GalleryState {
    selected_index: usize,
}

/// 1-based position with its total, for "2 / 3" style labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub number: usize,
    pub total: usize,
}

impl GalleryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn reduce(self, action: GalleryAction, catalog: &FlattenedCatalog) -> Self {
        let len = catalog.len();
        if len == 0 {
            return self;
        }
        let current = self.selected_index;
        let selected_index = match action {
            GalleryAction::SetIndex(index) => {
                debug_assert!(index < len, "index {index} out of range for {len} entries");
                index.min(len - 1)
            }
            GalleryAction::NextImage => (current + 1) % len,
            GalleryAction::PreviousImage => (current + len - 1) % len,
            GalleryAction::NextProject => next_project_start(catalog, current).unwrap_or(current),
            GalleryAction::PreviousProject => {
                previous_project_end(catalog, current).unwrap_or(current)
            }
        };
        Self { selected_index }
    }

    pub fn current_entry<'a>(&self, catalog: &'a FlattenedCatalog) -> Option<&'a FlattenedEntry> {
        catalog.get(self.selected_index)
    }

    pub fn current_project<'a>(&self, catalog: &'a FlattenedCatalog) -> Option<&'a Project> {
        catalog.project_of(self.selected_index)
    }

    pub fn current_image<'a>(&self, catalog: &'a FlattenedCatalog) -> Option<&'a ImageRef> {
        self.current_entry(catalog).map(|entry| &entry.image)
    }

    pub fn project_position(&self, catalog: &FlattenedCatalog) -> Option<Position> {
        let entry = self.current_entry(catalog)?;
        Some(Position {
            number: entry.project_index + 1,
            total: catalog.projects().len(),
        })
    }

    pub fn image_position(&self, catalog: &FlattenedCatalog) -> Option<Position> {
        let entry = self.current_entry(catalog)?;
        let start = catalog.project_start(entry.project_index)?;
        let project = catalog.projects().get(entry.project_index)?;
        Some(Position {
            number: self.selected_index - start + 1,
            total: project.images.len(),
        })
    }
}

fn next_project_start(catalog: &FlattenedCatalog, from: usize) -> Option<usize> {
    let owner = catalog.get(from)?.project_index;
    catalog
        .entries()
        .iter()
        .enumerate()
        .skip(from + 1)
        .find(|(_, entry)| entry.project_index != owner)
        .map(|(idx, _)| idx)
}

fn previous_project_end(catalog: &FlattenedCatalog, from: usize) -> Option<usize> {
    let owner = catalog.get(from)?.project_index;
    catalog.entries()[..from]
        .iter()
        .rposition(|entry| entry.project_index != owner)
}
