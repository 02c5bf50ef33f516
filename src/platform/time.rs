//! Frame timing
//!
//! `FrameClock` measures wall-clock time between frames; `FixedStep` turns
//! those variable frame times into a whole number of fixed simulation steps.

use std::time::Instant;

/// Seconds elapsed between successive `tick` calls
#[derive(Debug, Default)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Seconds since the previous call; the first call returns 0.0
    pub fn tick(&mut self) -> f64 {
        let now = Instant::now();
        let elapsed = self
            .last
            .map(|last| now.duration_since(last).as_secs_f64())
            .unwrap_or(0.0);
        self.last = Some(now);
        elapsed
    }
}

/// Fixed-timestep accumulator
#[derive(Debug, Clone)]
pub struct FixedStep {
    step: f64,
    max_frame_dt: f64,
    max_substeps: u32,
    accumulator: f64,
}

impl FixedStep {
    pub fn new(step: f64, max_frame_dt: f64, max_substeps: u32) -> Self {
        Self {
            step,
            max_frame_dt,
            max_substeps,
            accumulator: 0.0,
        }
    }

    #[inline]
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Feed one frame's elapsed time, returning how many steps to run
    pub fn advance(&mut self, frame_dt: f64) -> u32 {
        let frame_dt = if frame_dt > self.max_frame_dt {
            log::warn!("Frame took {frame_dt:.3}s, clamping to {:.3}s", self.max_frame_dt);
            self.max_frame_dt
        } else {
            frame_dt.max(0.0)
        };
        self.accumulator += frame_dt;

        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_substeps {
            self.accumulator -= self.step;
            steps += 1;
        }
        steps
    }

    /// Unsimulated time carried into the next frame
    pub fn remainder(&self) -> f64 {
        self.accumulator
    }
}
