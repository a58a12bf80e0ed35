//! Candle flicker as a pure function of the clock

use crate::config::CandleConfig;
use glam::Vec3;
use serde::Serialize;

/// Flame layers per candle, innermost first
pub const FLAME_LAYERS: usize = 3;

const LIGHT_FLICKER_SPEED: f64 = 10.0;
const LIGHT_FLICKER_AMPLITUDE: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlameLayer {
    pub scale_x: f32,
    pub scale_z: f32,
    pub yaw: f32,
    pub opacity: f32,
}

impl FlameLayer {
    /// Layer `index` at time `t` seconds
    pub fn at(index: usize, t: f64) -> Self {
        let freq = 3.0 + index as f64;
        let amp = 0.1 + index as f64 * 0.05;
        let phase = t * freq;
        Self {
            scale_x: (1.0 + phase.sin() * amp) as f32,
            scale_z: (1.0 + phase.cos() * amp) as f32,
            yaw: ((phase * 0.5).sin() * 0.1) as f32,
            opacity: (0.7 + phase.sin() * 0.3) as f32,
        }
    }
}

/// Render parameters for one candle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandleFlicker {
    pub position: Vec3,
    pub flames: [FlameLayer; FLAME_LAYERS],
    pub intensity: f32,
}

pub fn flicker(candle: &CandleConfig, t: f64) -> CandleFlicker {
    CandleFlicker {
        position: candle.position,
        flames: std::array::from_fn(|i| FlameLayer::at(i, t)),
        intensity: (candle.base_intensity as f64
            + (t * LIGHT_FLICKER_SPEED).sin() * LIGHT_FLICKER_AMPLITUDE) as f32,
    }
}
