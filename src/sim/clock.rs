//! Simulation clock
//!
//! Monotonic session time in milliseconds plus the fixed frame step. Real
//! (variable) frame deltas are banked in an accumulator and paid out as whole
//! fixed frames, so every rule in the simulation advances by the same unit.

use serde::{Deserialize, Serialize};

use crate::consts::{FRAME_MS, MAX_SUBSTEPS};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clock {
    /// Session time (ms since session start)
    now_ms: f64,
    /// Frames simulated so far
    frames: u64,
    /// Real time banked but not yet simulated (ms)
    accumulator: f64,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    pub fn new() -> Self {
        Self {
            now_ms: 0.0,
            frames: 0,
            accumulator: 0.0,
        }
    }

    /// Current session time in ms
    pub fn now(&self) -> f64 {
        self.now_ms
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Advance one fixed frame, returning its delta (ms)
    pub fn advance_frame(&mut self) -> f64 {
        self.frames += 1;
        self.now_ms = self.frames as f64 * FRAME_MS;
        FRAME_MS
    }

    /// Bank a real-time delta and return how many fixed frames are now due.
    ///
    /// Negative or non-finite deltas are ignored so time never runs backward.
    /// Backlog beyond `MAX_SUBSTEPS` frames is dropped.
    pub fn accumulate(&mut self, real_dt_ms: f64) -> u32 {
        if real_dt_ms.is_finite() && real_dt_ms > 0.0 {
            self.accumulator += real_dt_ms;
        }

        let due = (self.accumulator / FRAME_MS).floor();
        if due > MAX_SUBSTEPS as f64 {
            log::warn!(
                "Dropping {} frames of backlog",
                due as u64 - MAX_SUBSTEPS as u64
            );
            self.accumulator -= MAX_SUBSTEPS as f64 * FRAME_MS;
            self.accumulator %= FRAME_MS;
            MAX_SUBSTEPS
        } else {
            self.accumulator -= due * FRAME_MS;
            due as u32
        }
    }

    /// Whole seconds since session start
    pub fn elapsed_seconds(&self) -> u64 {
        (self.now_ms / 1000.0).floor() as u64
    }
}
