use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Instant,
    Smooth,
}

/// Handle to the horizontally scrolling, snap-aligned slide strip.
///
/// `scroll_to` only issues the command. Implementations report where the
/// strip actually scrolled to as [`ScrollReport`]s on a channel that never
/// drops, so every programmatic scroll is eventually confirmed.
pub trait Viewport {
    fn width(&self) -> f64;
    fn scroll_left(&self) -> f64;
    fn scroll_to(&mut self, left: f64, behavior: ScrollBehavior);
}

/// A native scroll position observed by the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollReport {
    pub scroll_left: f64,
}

/// In-memory viewport that settles scroll commands immediately.
///
/// Smooth scrolls report one intermediate position a quarter of the way to
/// the target before the final one, like the first frames of a real
/// animation.
#[derive(Debug)]
pub struct SimulatedViewport {
    width: f64,
    scroll_left: f64,
    reports: UnboundedSender<ScrollReport>,
}

impl SimulatedViewport {
    /// A viewport of `width` and the receiving end of its scroll reports.
    pub fn channel(width: f64) -> (Self, UnboundedReceiver<ScrollReport>) {
        let (reports, rx) = mpsc::unbounded_channel();
        let viewport = Self {
            width,
            scroll_left: 0.0,
            reports,
        };
        (viewport, rx)
    }

    fn report(&self, scroll_left: f64) {
        if self.reports.send(ScrollReport { scroll_left }).is_ok() {
            trace!(scroll_left, "viewport scrolled");
        }
    }
}

impl Viewport for SimulatedViewport {
    fn width(&self) -> f64 {
        self.width
    }

    fn scroll_left(&self) -> f64 {
        self.scroll_left
    }

    fn scroll_to(&mut self, left: f64, behavior: ScrollBehavior) {
        let from = self.scroll_left;
        if behavior == ScrollBehavior::Smooth && (left - from).abs() > f64::EPSILON {
            self.report(from + (left - from) * 0.25);
        }
        self.scroll_left = left;
        self.report(left);
    }
}
