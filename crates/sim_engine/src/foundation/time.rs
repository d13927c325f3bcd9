//! Time management utilities
//!
//! [`FixedTimestep`] banks variable frame time and releases it in fixed-size
//! steps; [`Stopwatch`] measures wall-clock spans for diagnostics.

use std::time::{Duration, Instant};

/// Default fixed step (60 Hz)
pub const DEFAULT_FIXED_TIME_STEP: f32 = 1.0 / 60.0;

/// Default cap applied to a single frame delta
pub const DEFAULT_MAX_DELTA_TIME: f32 = 0.25;

/// Accumulator that converts variable frame deltas into whole fixed steps
///
/// Each [`advance`](Self::advance) call clamps the incoming delta to
/// `max_delta`, banks it, and reports how many fixed steps are now due.
/// Leftover time stays in the accumulator for the next frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedTimestep {
    step: f32,
    max_delta: f32,
    accumulator: f32,
    simulated_time: f64,
    total_steps: u64,
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(DEFAULT_FIXED_TIME_STEP, DEFAULT_MAX_DELTA_TIME)
    }
}

impl FixedTimestep {
    /// Create an accumulator; a non-positive step falls back to the 60 Hz default
    pub fn new(step: f32, max_delta: f32) -> Self {
        let step = if step.is_finite() && step > 0.0 {
            step
        } else {
            log::warn!("Invalid fixed time step {step}, using {DEFAULT_FIXED_TIME_STEP}");
            DEFAULT_FIXED_TIME_STEP
        };
        let max_delta = if max_delta.is_finite() && max_delta > 0.0 {
            max_delta
        } else {
            f32::MAX
        };

        Self {
            step,
            max_delta,
            accumulator: 0.0,
            simulated_time: 0.0,
            total_steps: 0,
        }
    }

    /// Bank `delta_time` and return the number of fixed steps now due
    pub fn advance(&mut self, delta_time: f32) -> u32 {
        let delta = if delta_time.is_finite() && delta_time > 0.0 {
            delta_time
        } else {
            0.0
        };
        if delta > self.max_delta {
            log::debug!(
                "Frame delta {delta:.4}s clamped to {:.4}s",
                self.max_delta
            );
        }
        self.accumulator += delta.min(self.max_delta);

        let mut steps = 0;
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            self.simulated_time += f64::from(self.step);
            self.total_steps += 1;
            steps += 1;
        }
        steps
    }

    /// Size of one fixed step in seconds
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Change the step size; non-positive values are ignored
    pub fn set_step(&mut self, step: f32) {
        if step.is_finite() && step > 0.0 {
            self.step = step;
        } else {
            log::warn!("Ignoring invalid fixed time step {step}");
        }
    }

    /// Upper bound applied to a single frame delta
    pub fn max_delta(&self) -> f32 {
        self.max_delta
    }

    /// Time banked but not yet consumed by a step
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Fraction of a step currently banked (useful for render interpolation)
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.step
    }

    /// Total simulated time released as whole steps
    pub fn simulated_time(&self) -> f64 {
        self.simulated_time
    }

    /// Total number of steps released
    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    /// Drop banked time and counters
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.simulated_time = 0.0;
        self.total_steps = 0;
    }
}

/// Simple stopwatch for measuring elapsed time
pub struct Stopwatch {
    start_time: Option<Instant>,
    elapsed: Duration,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    /// Create a new stopped stopwatch
    pub fn new() -> Self {
        Self {
            start_time: None,
            elapsed: Duration::ZERO,
        }
    }

    /// Create a new stopwatch and start it immediately
    pub fn start_new() -> Self {
        let mut stopwatch = Self::new();
        stopwatch.start();
        stopwatch
    }

    /// Start the stopwatch
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Stop the stopwatch and accumulate elapsed time
    pub fn stop(&mut self) {
        if let Some(start) = self.start_time.take() {
            self.elapsed += start.elapsed();
        }
    }

    /// Get the elapsed time
    pub fn elapsed(&self) -> Duration {
        self.elapsed + self.start_time.map_or(Duration::ZERO, |start| start.elapsed())
    }

    /// Get the elapsed time in milliseconds
    pub fn elapsed_millis(&self) -> f32 {
        self.elapsed().as_secs_f32() * 1000.0
    }

    /// Check if the stopwatch is currently running
    pub fn is_running(&self) -> bool {
        self.start_time.is_some()
    }
}
