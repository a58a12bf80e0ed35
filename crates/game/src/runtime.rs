//! Fixed-rate replay loop
//!
//! Stands in for a window's frame callback: script events are injected between
//! frames and the simulation is advanced by a constant `1 / fps` per tick.

use crate::presenter::Presenter;
use crate::script::Script;
use abbey::{AvatarPose, FrameSnapshot, InputEvent, SimulationState};
use anyhow::{ensure, Result};

/// Counters reported when a replay ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub ticks: u64,
    pub events: u64,
    /// True if `max_ticks` cut the script short
    pub truncated: bool,
}

pub struct ReplayRuntime {
    sim: SimulationState,
    dt: f32,
    max_ticks: Option<u64>,
}

impl ReplayRuntime {
    pub fn new(sim: SimulationState, fps: f32, max_ticks: Option<u64>) -> Result<Self> {
        ensure!(fps.is_finite() && fps > 0.0, "fps must be positive, got {fps}");
        Ok(Self {
            sim,
            dt: 1.0 / fps,
            max_ticks,
        })
    }

    pub fn sim(&self) -> &SimulationState {
        &self.sim
    }

    /// Play `script` through `presenter`
    pub fn run(&mut self, script: &Script, presenter: &mut dyn Presenter) -> Result<ReplayStats> {
        let mut stats = ReplayStats::default();
        let mut last: Option<FrameSnapshot> = None;

        'steps: for (index, step) in script.steps.iter().enumerate() {
            if let Some(label) = &step.label {
                tracing::info!("Step {}: {}", index + 1, label);
            }
            if let Some(place) = step.place {
                self.sim.place_avatar(AvatarPose::new(place.position, place.yaw));
            }
            for event in step.events() {
                if let InputEvent::Resized { width, height } = event {
                    presenter.resized(width, height)?;
                }
                self.sim.handle_input(&event);
            }

            for _ in 0..step.ticks {
                if self.max_ticks.is_some_and(|max| stats.ticks >= max) {
                    tracing::warn!("Stopping at the {} tick limit", stats.ticks);
                    stats.truncated = true;
                    break 'steps;
                }
                let out = self.sim.tick(self.dt);
                stats.ticks += 1;
                for event in &out.events {
                    presenter.event(out.snapshot.tick, event)?;
                    stats.events += 1;
                }
                presenter.frame(&out.snapshot)?;
                last = Some(out.snapshot);
            }
        }

        let last = last.unwrap_or_else(|| self.sim.snapshot());
        presenter.finish(&last)?;
        Ok(stats)
    }
}
