//! Third-person camera rig with follow and manual-orbit modes
//!
//! In follow mode the camera eases toward a point behind the avatar's facing.
//! Pressing the orbit button switches to manual mode at once; releasing it
//! schedules a hand-back timer, and follow mode only resumes when that timer
//! fires without a newer grab having cancelled it.
//!
//! After placement the camera is softly pulled back inside the avatar's room
//! on x/z and hard clamped on y.

use crate::config::CameraConfig;
use crate::input::PointerEvent;
use crate::motion::AvatarPose;
use crate::rooms::RoomGraph;
use crate::smoothing::{approach, step_factor};
use crate::timer::{TimerToken, Timers};
use glam::{Vec2, Vec3};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraMode {
    Follow,
    Manual,
}

/// Deferred camera events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraTimer {
    /// Return to follow mode after the orbit button was released
    HandBack,
}

/// A scheduled hand-back that has not fired yet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingRelease {
    pub token: TimerToken,
    pub deadline: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CameraState {
    pub position: Vec3,
    pub target: Vec3,
    pub mode: CameraMode,
    pub distance: f32,
    pub release: Option<PendingRelease>,
}

impl CameraState {
    /// Unit view direction, or zero if the camera sits on its target
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }
}

/// Stateless solver for `CameraState`
#[derive(Debug, Clone)]
pub struct CameraRig {
    pub config: CameraConfig,
    reference_hz: f32,
}

impl CameraRig {
    pub fn new(config: CameraConfig, reference_hz: f32) -> Self {
        Self {
            config,
            reference_hz,
        }
    }

    /// Initial state: follow mode at `start`, looking at the avatar
    pub fn initial_state(&self, start: Vec3, avatar: &AvatarPose) -> CameraState {
        CameraState {
            position: start,
            target: self.target_for(avatar),
            mode: CameraMode::Follow,
            distance: self
                .config
                .start_distance
                .clamp(self.config.min_distance, self.config.max_distance),
            release: None,
        }
    }

    fn target_for(&self, avatar: &AvatarPose) -> Vec3 {
        avatar.position + Vec3::new(0.0, self.config.target_lift, 0.0)
    }

    /// Follow-mode offset from the avatar's feet for the current distance
    fn follow_offset(&self, distance: f32, yaw: f32) -> Vec3 {
        Vec3::new(
            -distance * yaw.sin(),
            self.config.height,
            -distance * yaw.cos(),
        )
    }

    /// Apply one pointer event; returns the new mode if it changed
    pub fn handle_pointer(
        &self,
        state: &mut CameraState,
        event: PointerEvent,
        now: f64,
        timers: &mut Timers<CameraTimer>,
    ) -> Option<CameraMode> {
        match event {
            PointerEvent::Grab => {
                if let Some(pending) = state.release.take() {
                    timers.cancel(pending.token);
                }
                set_mode(state, CameraMode::Manual)
            }
            PointerEvent::Release => {
                if let Some(pending) = state.release.take() {
                    timers.cancel(pending.token);
                }
                let delay = self.config.release_delay_secs();
                let token = timers.schedule(now, delay, CameraTimer::HandBack);
                state.release = Some(PendingRelease {
                    token,
                    deadline: now + delay,
                });
                tracing::debug!("Camera hand-back scheduled for t={:.3}", now + delay);
                None
            }
            PointerEvent::Zoom(direction) => {
                state.distance = (state.distance + direction.signum() * self.config.zoom_step)
                    .clamp(self.config.min_distance, self.config.max_distance);
                tracing::trace!("Camera distance {:.2}", state.distance);
                None
            }
        }
    }

    /// Handle a fired timer; stale tokens are ignored
    pub fn on_timer(
        &self,
        state: &mut CameraState,
        token: TimerToken,
        event: CameraTimer,
    ) -> Option<CameraMode> {
        match event {
            CameraTimer::HandBack => {
                if state.release.map(|p| p.token) != Some(token) {
                    return None;
                }
                state.release = None;
                set_mode(state, CameraMode::Follow)
            }
        }
    }

    /// Orbit about the target by a drag delta in pixels (manual mode only)
    ///
    /// Horizontal drag turns about world up; vertical drag changes the polar
    /// angle, clamped to the configured band. The radius is preserved.
    pub fn orbit(&self, state: &mut CameraState, drag: Vec2) {
        if state.mode != CameraMode::Manual || drag == Vec2::ZERO {
            return;
        }
        let offset = state.position - state.target;
        let radius = offset.length();
        if !(radius > f32::EPSILON) {
            return;
        }

        let azimuth = offset.x.atan2(offset.z) - drag.x * self.config.orbit_sensitivity;
        let polar = ((offset.y / radius).clamp(-1.0, 1.0).acos()
            - drag.y * self.config.orbit_sensitivity)
            .clamp(self.config.min_polar, self.config.max_polar);

        state.position = state.target
            + radius
                * Vec3::new(
                    polar.sin() * azimuth.sin(),
                    polar.cos(),
                    polar.sin() * azimuth.cos(),
                );
    }

    /// Place the camera for this tick given the avatar's updated pose
    pub fn update(&self, state: &mut CameraState, avatar: &AvatarPose, world: &RoomGraph, dt: f32) {
        state.target = self.target_for(avatar);
        let follow = avatar.position + self.follow_offset(state.distance, avatar.facing_yaw);

        match state.mode {
            CameraMode::Follow => {
                let factor = step_factor(self.config.follow_rate, dt, self.reference_hz);
                state.position = state.position.lerp(follow, factor);
            }
            CameraMode::Manual => {
                let mut direction = (state.position - state.target).normalize_or_zero();
                if direction == Vec3::ZERO {
                    direction = (follow - state.target).normalize_or_zero();
                }
                state.position = state.target + direction * state.distance;
            }
        }

        let inside = world.room_for(avatar.position).clamp_xz(state.position);
        let pull = step_factor(self.config.wall_pull_rate, dt, self.reference_hz);
        state.position.x = approach(state.position.x, inside.x, pull);
        state.position.z = approach(state.position.z, inside.z, pull);
        state.position.y = state
            .position
            .y
            .clamp(self.config.min_height, self.config.max_height);
    }
}

fn set_mode(state: &mut CameraState, mode: CameraMode) -> Option<CameraMode> {
    if state.mode == mode {
        return None;
    }
    tracing::debug!("Camera mode {:?} -> {:?}", state.mode, mode);
    state.mode = mode;
    Some(mode)
}
