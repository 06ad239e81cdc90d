//! Scripted player for headless runs.

use crate::scene::{PlayerPosition, PlayerSource};

/// Runs at a constant speed, optionally turning around at a fixed distance
/// either side of where it started.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScriptedRunner {
    start_x: f64,
    x: f64,
    y: f64,
    speed: f64,
    direction: f64,
    turn_around: Option<f64>,
}

impl ScriptedRunner {
    /// Creates a runner at `(x, y)` moving right at `speed` units per second.
    #[must_use]
    pub const fn new(x: f64, y: f64, speed: f64) -> Self {
        Self {
            start_x: x,
            x,
            y,
            speed,
            direction: 1.0,
            turn_around: None,
        }
    }

    /// Reverses direction whenever the runner gets `distance` away from
    /// its start.
    #[must_use]
    pub const fn with_turn_around(mut self, distance: f64) -> Self {
        self.turn_around = Some(distance);
        self
    }

    /// True while moving right.
    #[inline]
    #[must_use]
    pub fn heading_right(&self) -> bool {
        self.direction > 0.0
    }
}

impl PlayerSource for ScriptedRunner {
    fn update(&mut self, dt: f64) {
        self.x += self.speed * self.direction * dt;

        if let Some(distance) = self.turn_around {
            let travelled = self.x - self.start_x;
            if (self.heading_right() && travelled >= distance)
                || (!self.heading_right() && travelled <= -distance)
            {
                self.direction = -self.direction;
            }
        }
    }

    fn position(&self) -> PlayerPosition {
        PlayerPosition {
            x: self.x,
            y: self.y,
        }
    }
}
