use serde::Serialize;

use crate::gallery::GalleryAction;

/// Platform and user input delivered to the carousel component.
#[derive(Debug, Clone, PartialEq)]
pub enum CarouselInput {
    /// The user scrolled the slide strip directly.
    Scrolled { scroll_left: f64 },
    TouchStart { x: f64 },
    TouchMove { x: f64 },
    TouchEnd,
    /// Click/tap somewhere on the slide area.
    Tap { on_button: bool, window_width: f64 },
    NextClicked,
    PreviousClicked,
    DotClicked(usize),
    /// The owner changed the externally controlled selected index.
    Select(usize),
    SetAutoplay(bool),
}

/// Emitted once per confirmed change of the visible slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexChanged(pub usize);

/// Navigation requests for the page that owns the gallery cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GalleryCommand(pub GalleryAction);

/// What the page shows for the current cursor position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct GallerySnapshot {
    pub index: usize,
    pub project: String,
    pub image: String,
    pub repository_link: Option<String>,
    pub site_link: Option<String>,
    pub project_number: usize,
    pub project_total: usize,
    pub image_number: usize,
    pub image_total: usize,
}

/// Pointer activity feeding the background shadow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShadowInput {
    PointerMoved { x: f64, y: f64 },
    PointerLeft,
    PointerEntered,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShadowPosition {
    pub x: f64,
    pub y: f64,
    pub bouncing: bool,
}
