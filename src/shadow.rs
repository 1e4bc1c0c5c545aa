//! Pointer-following background shadow.
//!
//! Follows the pointer while it moves and, once the pointer has been idle,
//! drifts diagonally and bounces off the screen edges.

use crate::config::ShadowOptions;
use crate::events::ShadowPosition;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    bouncing: bool,
    width: f64,
    height: f64,
    radius: f64,
    speed: f64,
}

// Keep the whole shadow on screen; screens narrower than the shadow pin it
// to `radius`.
fn constrain(value: f64, extent: f64, radius: f64) -> f64 {
    value.min(extent - radius).max(radius)
}

impl Shadow {
    /// A resting shadow centred on the screen.
    pub fn new(width: f64, height: f64, radius: f64, speed: f64) -> Self {
        Self {
            x: width / 2.0,
            y: height / 2.0,
            vx: 0.0,
            vy: 0.0,
            bouncing: false,
            width,
            height,
            radius,
            speed,
        }
    }

    pub fn from_options(options: &ShadowOptions) -> Self {
        Self::new(
            options.screen_width_px,
            options.screen_height_px,
            options.radius_px,
            options.speed_px_per_frame,
        )
    }

    pub fn position(&self) -> ShadowPosition {
        ShadowPosition {
            x: self.x,
            y: self.y,
            bouncing: self.bouncing,
        }
    }

    pub fn is_bouncing(&self) -> bool {
        self.bouncing
    }

    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        self.x = constrain(x, self.width, self.radius);
        self.y = constrain(y, self.height, self.radius);
        self.bouncing = false;
    }

    pub fn start_bouncing(&mut self) {
        self.vx = self.speed;
        self.vy = self.speed;
        self.bouncing = true;
    }

    pub fn stop(&mut self) {
        self.bouncing = false;
    }

    /// Advance one frame. No-op unless bouncing.
    pub fn step(&mut self) {
        if !self.bouncing {
            return;
        }
        let next_x = self.x + self.vx;
        let next_y = self.y + self.vy;
        if next_x - self.radius <= 0.0 || next_x + self.radius >= self.width {
            self.vx = -self.vx;
        }
        if next_y - self.radius <= 0.0 || next_y + self.radius >= self.height {
            self.vy = -self.vy;
        }
        self.x = constrain(next_x, self.width, self.radius);
        self.y = constrain(next_y, self.height, self.radius);
    }
}
