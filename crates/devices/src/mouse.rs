//! Mouse and cursor input types
//!
//! Button state, wheel direction and drag-delta accumulation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Mouse button state flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MouseButtons {
    /// Left mouse button pressed
    pub left: bool,
    /// Right mouse button pressed
    pub right: bool,
    /// Middle mouse button (scroll wheel click) pressed
    pub middle: bool,
}

impl MouseButtons {
    /// Create a new MouseButtons with all buttons released
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a button transition; returns true if the state changed
    pub fn set(&mut self, button: MouseButtonType, pressed: bool) -> bool {
        let slot = match button {
            MouseButtonType::Left => &mut self.left,
            MouseButtonType::Right => &mut self.right,
            MouseButtonType::Middle => &mut self.middle,
        };
        let changed = *slot != pressed;
        *slot = pressed;
        changed
    }

    pub fn is_pressed(&self, button: MouseButtonType) -> bool {
        match button {
            MouseButtonType::Left => self.left,
            MouseButtonType::Right => self.right,
            MouseButtonType::Middle => self.middle,
        }
    }

    /// Check if any button is pressed
    pub fn any_pressed(&self) -> bool {
        self.left || self.right || self.middle
    }

    /// Reset all buttons to released state
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Mouse button type for event handling and injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButtonType {
    /// Left mouse button (primary)
    Left,
    /// Right mouse button (secondary/context)
    Right,
    /// Middle mouse button (scroll wheel click)
    Middle,
}

/// Direction of a wheel notch; only the sign of the raw delta matters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WheelDirection {
    /// Scroll up / away from the user (negative DOM delta)
    In,
    /// Scroll down / toward the user
    Out,
}

impl WheelDirection {
    /// Classify a raw wheel delta. Negative means `In`; zero and NaN are ignored.
    pub fn from_delta(delta: f32) -> Option<Self> {
        if delta < 0.0 {
            Some(Self::In)
        } else if delta > 0.0 {
            Some(Self::Out)
        } else {
            None
        }
    }

    /// -1 for `In`, +1 for `Out`
    pub fn signum(self) -> f32 {
        match self {
            Self::In => -1.0,
            Self::Out => 1.0,
        }
    }
}

/// Accumulates pointer motion between frames
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragAccumulator {
    delta: Vec2,
}

impl DragAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a motion delta in pixels; non-finite deltas are dropped
    pub fn push(&mut self, delta: Vec2) {
        if delta.is_finite() {
            self.delta += delta;
        }
    }

    /// Peek at the pending delta
    pub fn pending(&self) -> Vec2 {
        self.delta
    }

    /// Return and clear the pending delta
    pub fn take(&mut self) -> Vec2 {
        std::mem::take(&mut self.delta)
    }
}
