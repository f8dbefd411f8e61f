//! Sinusoidal perturbation of a single value over wall-clock time

use std::f64::consts::TAU;
use std::time::Duration;

use crate::transformer::WiggleConfig;

/// `base + amplitude * sin(2π * frequency * t)`, with `t` measured from the
/// first sample so the value starts where the cell was
#[derive(Debug, Clone, PartialEq)]
pub struct Wiggle {
    base: f64,
    amplitude: f64,
    frequency_hz: f64,
    started_at: Option<Duration>,
}

impl Wiggle {
    pub fn new(base: f64, config: &WiggleConfig) -> Self {
        Self {
            base,
            amplitude: config.amplitude,
            frequency_hz: config.frequency_hz,
            started_at: None,
        }
    }

    pub fn base(&self) -> f64 {
        self.base
    }

    pub fn rebase(&mut self, base: f64) {
        self.base = base;
        self.started_at = None;
    }

    pub fn value_at(&self, elapsed: Duration) -> f64 {
        self.base + self.amplitude * (TAU * self.frequency_hz * elapsed.as_secs_f64()).sin()
    }

    /// Sample at timestamp `now` (any monotonic clock)
    pub fn sample(&mut self, now: Duration) -> f64 {
        let start = *self.started_at.get_or_insert(now);
        self.value_at(now.saturating_sub(start))
    }
}
