//! Frame-rate independent exponential smoothing
//!
//! Rates are authored as "fraction of the remaining gap closed per reference
//! tick". For a step of `dt` seconds that becomes
//! `1 - (1 - rate)^(dt * reference_hz)`, which equals `rate` exactly when
//! `dt == 1 / reference_hz`.

/// Interpolation factor in `[0, 1]` for one step of `dt` seconds
#[inline]
pub fn step_factor(rate: f32, dt: f32, reference_hz: f32) -> f32 {
    if !(dt > 0.0) || !dt.is_finite() || !(reference_hz > 0.0) {
        return 0.0;
    }
    let keep = (1.0 - rate).clamp(0.0, 1.0);
    (1.0 - keep.powf(dt * reference_hz)).clamp(0.0, 1.0)
}

/// Move `current` toward `target` by `factor` of the gap
#[inline]
pub fn approach(current: f32, target: f32, factor: f32) -> f32 {
    current + (target - current) * factor
}
