//! Hinged door with eased swing
//!
//! `toggle` only flips the target; `step` eases the leaf toward it every tick
//! whether or not a toggle happened. The approach is exponential, so the
//! angle never overshoots and only converges within an epsilon.

use crate::config::DoorConfig;
use crate::smoothing::{approach, step_factor};
use serde::Serialize;

/// Open/closed state and current swing of one door
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Door {
    is_open: bool,
    current_angle: f32,
    target_angle: f32,
    open_angle: f32,
    rate: f32,
}

impl Door {
    /// A closed door at rest
    pub fn new(config: &DoorConfig) -> Self {
        Self {
            is_open: false,
            current_angle: 0.0,
            target_angle: 0.0,
            open_angle: config.open_angle,
            rate: config.rate,
        }
    }

    /// Flip open/closed and retarget the swing; returns the new `is_open`
    pub fn toggle(&mut self) -> bool {
        self.is_open = !self.is_open;
        self.target_angle = if self.is_open { self.open_angle } else { 0.0 };
        self.is_open
    }

    /// Advance the swing by `dt` seconds
    pub fn step(&mut self, dt: f32, reference_hz: f32) {
        let factor = step_factor(self.rate, dt, reference_hz);
        self.current_angle = approach(self.current_angle, self.target_angle, factor);
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn current_angle(&self) -> f32 {
        self.current_angle
    }

    pub fn target_angle(&self) -> f32 {
        self.target_angle
    }
}
