//! # Camera Controller
//!
//! Horizontal-only follow camera for a side view.
//!
//! The target keeps the player centred: `target_x = player_x - viewport_width / 2`.
//! Each update moves `x` a fraction of the remaining distance toward the
//! target. With [`Smoothing::PerTick`] that fraction is fixed per call, so
//! the feel depends on frame rate. [`Smoothing::TimeConstant`] derives the
//! fraction from the frame delta (`1 - exp(-dt / tau)`) instead.

use serde::Serialize;

use crate::config::CameraConfig;

/// How the camera converges on its target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Smoothing {
    /// Fixed fraction per update, in `(0, 1]`.
    PerTick(f64),
    /// Exponential decay with time constant `tau_secs`.
    TimeConstant {
        /// Seconds to cover ~63% of the remaining distance.
        tau_secs: f64,
    },
}

impl Smoothing {
    /// Fraction of the remaining distance to cover for a frame of `dt` seconds.
    #[inline]
    #[must_use]
    pub fn factor(self, dt: f64) -> f64 {
        match self {
            Self::PerTick(factor) => factor,
            Self::TimeConstant { tau_secs } => 1.0 - (-dt.max(0.0) / tau_secs).exp(),
        }
    }
}

impl From<&CameraConfig> for Smoothing {
    fn from(config: &CameraConfig) -> Self {
        match config.time_constant_secs {
            Some(tau_secs) => Self::TimeConstant { tau_secs },
            None => Self::PerTick(config.smoothing),
        }
    }
}

/// Camera offset handed to renderers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct CameraOffset {
    /// World X at the left edge of the viewport.
    pub x: f64,
    /// Always zero: the world never scrolls vertically.
    pub y: f64,
}

/// Smoothed horizontal scroll position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    x: f64,
    target_x: f64,
    smoothing: Smoothing,
}

impl Camera {
    /// Frame delta assumed by [`Camera::update`] under a time constant.
    pub const NOMINAL_FRAME_SECS: f64 = 1.0 / 60.0;

    /// Creates a camera at `x` that is already on target.
    #[must_use]
    pub const fn new(x: f64, smoothing: Smoothing) -> Self {
        Self {
            x,
            target_x: x,
            smoothing,
        }
    }

    /// Creates a camera from configuration.
    #[must_use]
    pub fn from_config(config: &CameraConfig) -> Self {
        Self::new(config.start_x, Smoothing::from(config))
    }

    /// Advances one tick toward the centred target.
    pub fn update(&mut self, player_x: f64, viewport_width: f64) {
        self.update_with_delta(player_x, viewport_width, Self::NOMINAL_FRAME_SECS);
    }

    /// Advances toward the centred target for a frame of `dt` seconds.
    ///
    /// `dt` only matters for [`Smoothing::TimeConstant`].
    pub fn update_with_delta(&mut self, player_x: f64, viewport_width: f64, dt: f64) {
        self.target_x = player_x - viewport_width / 2.0;
        self.x += (self.target_x - self.x) * self.smoothing.factor(dt);
    }

    /// Jumps straight to the centred target.
    pub fn snap_to(&mut self, player_x: f64, viewport_width: f64) {
        self.target_x = player_x - viewport_width / 2.0;
        self.x = self.target_x;
    }

    /// Current scroll position.
    #[inline]
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.x
    }

    /// Position the camera is converging on.
    #[inline]
    #[must_use]
    pub const fn target_x(&self) -> f64 {
        self.target_x
    }

    /// Smoothing mode.
    #[inline]
    #[must_use]
    pub const fn smoothing(&self) -> Smoothing {
        self.smoothing
    }

    /// Offset for world-to-screen translation.
    #[inline]
    #[must_use]
    pub const fn offset(&self) -> CameraOffset {
        CameraOffset { x: self.x, y: 0.0 }
    }
}
