use tracing::{debug, trace};

use super::viewport::{ScrollBehavior, Viewport};
use crate::gesture::{Swipe, SwipeTracker, tap_advances};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    UserDragging,
    /// A programmatic smooth scroll towards this slide has been issued and
    /// the viewport has not reported arriving there yet.
    AnimatingTo(usize),
}

/// Slide selection for one carousel instance.
///
/// `current` is the optimistic index shown in the controls; `confirmed` is
/// the last index observed from the viewport and announced to the owner.
pub struct CarouselSM<V> {
    len: usize,
    current: usize,
    confirmed: usize,
    phase: Phase,
    swipe: SwipeTracker,
    mobile_breakpoint_px: f64,
    viewport: V,
}

impl<V: Viewport> CarouselSM<V> {
    pub fn new(
        len: usize,
        viewport: V,
        swipe_threshold_px: f64,
        mobile_breakpoint_px: f64,
    ) -> Self {
        Self {
            len,
            current: 0,
            confirmed: 0,
            phase: Phase::Idle,
            swipe: SwipeTracker::new(swipe_threshold_px),
            mobile_breakpoint_px,
            viewport,
        }
    }

    /// Jump without animation to the initial selection.
    pub fn mount(&mut self, selected_index: usize) {
        if self.len == 0 {
            return;
        }
        let index = selected_index.min(self.len - 1);
        self.current = index;
        self.confirmed = index;
        self.phase = Phase::Idle;
        let left = self.offset_of(index);
        self.viewport.scroll_to(left, ScrollBehavior::Instant);
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn confirmed(&self) -> usize {
        self.confirmed
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    /// Reconcile a native scroll report. Returns the index to announce, if
    /// the visible slide settled somewhere new.
    pub fn on_scroll(&mut self, scroll_left: f64) -> Option<usize> {
        let width = self.viewport.width();
        if self.len == 0 || !(width > 0.0) || !scroll_left.is_finite() {
            return None;
        }
        let raw = (scroll_left / width).round();
        if raw < 0.0 || raw >= self.len as f64 {
            trace!(scroll_left, "scroll position outside slide range");
            return None;
        }
        let observed = raw as usize;

        if let Phase::AnimatingTo(target) = self.phase {
            if observed != target {
                trace!(observed, target, "absorbing intermediate scroll position");
                return None;
            }
            self.phase = Phase::Idle;
        }

        self.current = observed;
        if observed == self.confirmed {
            return None;
        }
        self.confirmed = observed;
        debug!(index = observed, "carousel index confirmed");
        Some(observed)
    }

    /// A scroll the user performed on the strip. Whatever programmatic
    /// animation was in flight has been overridden, so the observed slide is
    /// adopted instead of being absorbed.
    pub fn user_scrolled(&mut self, scroll_left: f64) -> Option<usize> {
        if let Phase::AnimatingTo(target) = self.phase {
            debug!(target, "user scroll interrupts animation");
            self.phase = Phase::Idle;
        }
        self.on_scroll(scroll_left)
    }

    pub fn go_to_next(&mut self) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let target = (self.current + 1) % self.len;
        self.scroll_towards(target);
        Some(target)
    }

    pub fn go_to_previous(&mut self) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let target = (self.current + self.len - 1) % self.len;
        self.scroll_towards(target);
        Some(target)
    }

    pub fn go_to_image(&mut self, index: usize) -> Option<usize> {
        if index >= self.len || index == self.current {
            return None;
        }
        self.scroll_towards(index);
        Some(index)
    }

    pub fn touch_start(&mut self, x: f64) {
        self.swipe.start(x);
        self.phase = Phase::UserDragging;
    }

    pub fn touch_move(&mut self, x: f64) {
        self.swipe.track(x);
    }

    /// Finish the gesture, dispatching at most one navigation.
    pub fn touch_end(&mut self) -> Option<usize> {
        if self.phase == Phase::UserDragging {
            self.phase = Phase::Idle;
        }
        match self.swipe.finish()? {
            Swipe::Next => self.go_to_next(),
            Swipe::Previous => self.go_to_previous(),
        }
    }

    pub fn tap(&mut self, on_button: bool, window_width: f64) -> Option<usize> {
        if !tap_advances(on_button, window_width, self.mobile_breakpoint_px) {
            return None;
        }
        self.go_to_next()
    }

    fn scroll_towards(&mut self, target: usize) {
        let left = self.offset_of(target);
        self.viewport.scroll_to(left, ScrollBehavior::Smooth);
        self.current = target;
        self.phase = Phase::AnimatingTo(target);
    }

    fn offset_of(&self, index: usize) -> f64 {
        index as f64 * self.viewport.width()
    }
}
