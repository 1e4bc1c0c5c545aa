//! Touch swipe interpretation shared by the carousel.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
    /// Finger travelled left: show the next slide.
    Next,
    /// Finger travelled right: show the previous slide.
    Previous,
}

/// Tracks the horizontal extent of a single touch gesture.
#[derive(Debug, Clone, Copy)]
pub struct SwipeTracker {
    threshold_px: f64,
    start_x: Option<f64>,
    end_x: Option<f64>,
}

impl SwipeTracker {
    pub fn new(threshold_px: f64) -> Self {
        Self {
            threshold_px,
            start_x: None,
            end_x: None,
        }
    }

    /// Start a new gesture, discarding whatever the previous one recorded.
    pub fn start(&mut self, x: f64) {
        self.end_x = None;
        self.start_x = Some(x);
    }

    pub fn track(&mut self, x: f64) {
        self.end_x = Some(x);
    }

    /// Classify the finished gesture.
    ///
    /// A gesture without any recorded move is a tap, never a swipe.
    pub fn finish(&self) -> Option<Swipe> {
        let (start, end) = (self.start_x?, self.end_x?);
        let distance = start - end;
        if distance > self.threshold_px {
            Some(Swipe::Next)
        } else if distance < -self.threshold_px {
            Some(Swipe::Previous)
        } else {
            None
        }
    }
}

/// Compact viewports get tap-to-advance; wide ones ignore taps on the slide.
pub fn tap_advances(on_button: bool, viewport_width_px: f64, breakpoint_px: f64) -> bool {
    !on_button && viewport_width_px < breakpoint_px
}
