//! Time management utilities

use std::time::Instant;

/// Wall-clock frame timer
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Update the timer (should be called once per frame)
    pub fn update(&mut self) {
        let now = Instant::now();
        self.delta_time = now.duration_since(self.last_frame).as_secs_f32();
        self.total_time += self.delta_time;
        self.last_frame = now;
        self.frame_count += 1;
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed time since timer creation
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Fixed-size simulation step accumulator
///
/// Real frame time is accumulated and drained in `step` sized slices. At most
/// `max_steps` slices are released per frame; whole steps left over after that are
/// dropped so a slow frame cannot snowball into ever longer frames.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f32,
    max_steps: u32,
    accumulator: f32,
    dropped_steps: u64,
}

impl FixedTimestep {
    /// Create an accumulator releasing `step` second slices, at most `max_steps` per frame
    pub fn new(step: f32, max_steps: u32) -> Self {
        Self {
            step: step.max(f32::EPSILON),
            max_steps: max_steps.max(1),
            accumulator: 0.0,
            dropped_steps: 0,
        }
    }

    /// Add a frame's elapsed time and return how many fixed steps to run
    pub fn accumulate(&mut self, frame_time: f32) -> u32 {
        if frame_time.is_finite() && frame_time > 0.0 {
            self.accumulator += frame_time;
        }

        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps {
            self.accumulator -= self.step;
            steps += 1;
        }

        if self.accumulator >= self.step {
            let backlog = (self.accumulator / self.step).floor();
            self.accumulator -= backlog * self.step;
            // Truncation is fine: backlog is a small whole number of steps
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let dropped = backlog as u64;
            self.dropped_steps += dropped;
            log::debug!("Simulation behind real time, dropped {} step(s)", dropped);
        }

        steps
    }

    /// Size of one simulation step in seconds
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Fraction of a step left in the accumulator, for render interpolation
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.step
    }

    /// Total steps discarded by the backlog guard
    pub fn dropped_steps(&self) -> u64 {
        self.dropped_steps
    }
}
