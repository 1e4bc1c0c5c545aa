use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Result, ensure};
use catalog_model::{Catalog, FlattenedCatalog};
use serde::Deserialize;

use crate::error::Error;

/// Behaviour switches for the project carousel.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct CarouselOptions {
    /// Show previous/next arrows (only ever rendered for multi-image sets).
    pub show_navigation: bool,
    /// Show one position dot per image.
    pub show_dots: bool,
    /// Advance automatically every `autoplay-interval`.
    pub autoplay: bool,
    #[serde(with = "humantime_serde")]
    pub autoplay_interval: Duration,
    /// Warm every image once when the carousel mounts.
    pub preload: bool,
    /// Minimum horizontal travel for a touch gesture to count as a swipe.
    pub swipe_threshold_px: f64,
    /// Viewports narrower than this get tap-to-advance.
    pub mobile_breakpoint_px: f64,
    /// Width of the simulated viewport driven from the command line.
    pub viewport_width_px: f64,
}

impl CarouselOptions {
    pub const DEFAULT_AUTOPLAY_INTERVAL: Duration = Duration::from_millis(3000);
    pub const DEFAULT_SWIPE_THRESHOLD_PX: f64 = 50.0;
    pub const DEFAULT_MOBILE_BREAKPOINT_PX: f64 = 768.0;

    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.autoplay_interval.is_zero(),
            "carousel.autoplay-interval must be greater than zero"
        );
        ensure!(
            self.swipe_threshold_px.is_finite() && self.swipe_threshold_px > 0.0,
            "carousel.swipe-threshold-px must be positive"
        );
        ensure!(
            self.mobile_breakpoint_px.is_finite() && self.mobile_breakpoint_px >= 0.0,
            "carousel.mobile-breakpoint-px must be non-negative"
        );
        ensure!(
            self.viewport_width_px.is_finite() && self.viewport_width_px > 0.0,
            "carousel.viewport-width-px must be positive"
        );
        Ok(())
    }
}

impl Default for CarouselOptions {
    fn default() -> Self {
        Self {
            show_navigation: true,
            show_dots: true,
            autoplay: false,
            autoplay_interval: Self::DEFAULT_AUTOPLAY_INTERVAL,
            preload: true,
            swipe_threshold_px: Self::DEFAULT_SWIPE_THRESHOLD_PX,
            mobile_breakpoint_px: Self::DEFAULT_MOBILE_BREAKPOINT_PX,
            viewport_width_px: 1024.0,
        }
    }
}

/// Pointer-following background shadow.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct ShadowOptions {
    pub enabled: bool,
    pub radius_px: f64,
    /// Pointer idle time before the shadow starts bouncing on its own.
    #[serde(with = "humantime_serde")]
    pub inactivity_delay: Duration,
    pub speed_px_per_frame: f64,
    #[serde(with = "humantime_serde")]
    pub frame_interval: Duration,
    pub screen_width_px: f64,
    pub screen_height_px: f64,
}

impl ShadowOptions {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.radius_px.is_finite() && self.radius_px > 0.0,
            "shadow.radius-px must be positive"
        );
        ensure!(
            self.speed_px_per_frame.is_finite() && self.speed_px_per_frame >= 0.0,
            "shadow.speed-px-per-frame must be non-negative"
        );
        ensure!(
            !self.frame_interval.is_zero(),
            "shadow.frame-interval must be greater than zero"
        );
        ensure!(
            self.screen_width_px.is_finite()
                && self.screen_width_px > 0.0
                && self.screen_height_px.is_finite()
                && self.screen_height_px > 0.0,
            "shadow screen dimensions must be positive"
        );
        Ok(())
    }
}

impl Default for ShadowOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            radius_px: 400.0,
            inactivity_delay: Duration::from_millis(2000),
            speed_px_per_frame: 0.45 * 4.0,
            frame_interval: Duration::from_millis(16),
            screen_width_px: 1920.0,
            screen_height_px: 1080.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Configuration {
    /// Directory that relative image references resolve against.
    pub asset_root: PathBuf,
    /// Portfolio projects in display order.
    pub projects: Catalog,
    pub carousel: CarouselOptions,
    pub shadow: ShadowOptions,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("."),
            projects: Catalog::default(),
            carousel: CarouselOptions::default(),
            shadow: ShadowOptions::default(),
        }
    }
}

impl Configuration {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let s = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&s)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, Error> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Validate runtime invariants that cannot be expressed via serde defaults alone.
    pub fn validated(self) -> Result<Self> {
        self.projects
            .validate()
            .map_err(|err| Error::InvalidCatalog(format!("{err:#}")))?;
        self.carousel.validate()?;
        self.shadow.validate()?;
        Ok(self)
    }

    pub fn flattened(&self) -> FlattenedCatalog {
        self.projects.flatten()
    }
}
