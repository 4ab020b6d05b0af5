//! Step-based destination moves.
//!
//! A [`Movement`] walks a node from where it is to where it should be over a fixed number of
//! calls to [`Movement::next`]. It is not time-based: every call advances exactly one step, so
//! the engine's logical frame counter stays the only clock.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::geom::Vec2;

/// Shape of the interpolation curve, mapping progress `t` in `[0, 1]` to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    /// Half a cosine period: slow start, slow arrival.
    #[default]
    Sinusoidal,
    EaseOutCubic,
}

impl Easing {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::Sinusoidal => (1.0 - (PI * t).cos()) / 2.0,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementOptions {
    /// Number of `next()` calls needed to reach the destination. `0` is treated as `1`.
    pub steps: usize,
    pub easing: Easing,
}

impl Default for MovementOptions {
    fn default() -> Self {
        Self {
            steps: 30,
            easing: Easing::Sinusoidal,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Movement {
    start: Vec2,
    destination: Vec2,
    easing: Easing,
    steps: usize,
    taken: usize,
}

impl Movement {
    pub fn new(start: Vec2, destination: Vec2, opts: &MovementOptions) -> Self {
        // Nothing to interpolate: arrive on the first step.
        let steps = if start == destination {
            1
        } else {
            opts.steps.max(1)
        };
        Self {
            start,
            destination,
            easing: opts.easing,
            steps,
            taken: 0,
        }
    }

    pub fn start(&self) -> Vec2 {
        self.start
    }

    pub fn destination(&self) -> Vec2 {
        self.destination
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Steps left before the destination is reached.
    pub fn remaining(&self) -> usize {
        self.steps - self.taken
    }

    pub fn is_finished(&self) -> bool {
        self.taken >= self.steps
    }

    /// Advances one step and returns the new position.
    ///
    /// Once the destination is reached it keeps being returned.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Vec2 {
        if self.taken < self.steps {
            self.taken += 1;
        }
        if self.taken == self.steps {
            return self.destination;
        }
        let t = self.taken as f64 / self.steps as f64;
        self.start + (self.destination - self.start) * self.easing.apply(t)
    }
}

/// Infinite: after arrival the destination repeats.
impl Iterator for Movement {
    type Item = Vec2;

    fn next(&mut self) -> Option<Vec2> {
        Some(Movement::next(self))
    }
}
