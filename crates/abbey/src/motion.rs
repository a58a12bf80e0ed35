//! Avatar motion: camera-relative walking with room and doorway clamping
//!
//! # Clamping
//!
//! After the step is applied, an avatar standing in the corridor of an open
//! aperture is only clamped vertically, which is the one way to pass between
//! rooms. Otherwise x and z are clamped to the room the avatar was in *before*
//! the step (see [`RoomGraph::room_index_for`]), so closing the door while
//! straddling the threshold pins the avatar to the room it came from.

use crate::config::MotionConfig;
use crate::door::Door;
use crate::input::MoveIntent;
use crate::rooms::RoomGraph;
use glam::Vec3;
use serde::Serialize;
use std::f32::consts::{PI, TAU};

/// Avatar position (feet) and facing
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AvatarPose {
    pub position: Vec3,
    /// Rotation about +Y; 0 faces +Z
    pub facing_yaw: f32,
}

impl AvatarPose {
    pub fn new(position: Vec3, facing_yaw: f32) -> Self {
        Self {
            position,
            facing_yaw,
        }
    }

    /// Unit vector the avatar faces, on the ground plane
    pub fn facing(&self) -> Vec3 {
        Vec3::new(self.facing_yaw.sin(), 0.0, self.facing_yaw.cos())
    }
}

/// Computes per-tick avatar poses
#[derive(Debug, Clone)]
pub struct AvatarController {
    pub config: MotionConfig,
}

impl AvatarController {
    pub fn new(config: MotionConfig) -> Self {
        Self { config }
    }

    /// Unit-length (or zero) walk direction for the held keys
    ///
    /// Forward is the camera's view direction flattened onto the ground; right
    /// is `forward × up`. If the flattened view direction degenerates (camera
    /// straight above), `fallback_forward` is used instead.
    pub fn move_direction(intent: &MoveIntent, camera_forward: Vec3, fallback_forward: Vec3) -> Vec3 {
        if !intent.translating() {
            return Vec3::ZERO;
        }

        let mut forward = Vec3::new(camera_forward.x, 0.0, camera_forward.z).normalize_or_zero();
        if forward == Vec3::ZERO {
            forward = Vec3::new(fallback_forward.x, 0.0, fallback_forward.z).normalize_or_zero();
        }
        let right = forward.cross(Vec3::Y);

        let mut direction = Vec3::ZERO;
        if intent.forward {
            direction += forward;
        }
        if intent.backward {
            direction -= forward;
        }
        if intent.left {
            direction -= right;
        }
        if intent.right {
            direction += right;
        }

        direction.normalize_or_zero()
    }

    /// Advance the avatar by `dt` seconds
    pub fn step(
        &self,
        pose: AvatarPose,
        intent: &MoveIntent,
        camera_forward: Vec3,
        world: &RoomGraph,
        doors: &[Door],
        dt: f32,
    ) -> AvatarPose {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let direction = Self::move_direction(intent, camera_forward, pose.facing());

        let mut facing_yaw = pose.facing_yaw;
        let mut position = pose.position;

        if direction != Vec3::ZERO {
            position += direction * self.config.move_speed * dt;
            facing_yaw = direction.x.atan2(direction.z);
        } else if intent.rotate_left != intent.rotate_right {
            let turn = self.config.turn_speed * dt;
            facing_yaw = wrap_angle(if intent.rotate_left {
                facing_yaw + turn
            } else {
                facing_yaw - turn
            });
        }

        let through_doorway =
            world.in_open_aperture(position, |i| doors.get(i).is_some_and(Door::is_open));
        if !through_doorway {
            position = world.room_for(pose.position).clamp_xz(position);
        }
        position.y = position.y.clamp(self.config.min_height, self.config.max_height);

        tracing::trace!(
            "Avatar at ({:.2}, {:.2}, {:.2}) yaw {:.3}",
            position.x,
            position.y,
            position.z,
            facing_yaw
        );

        AvatarPose {
            position,
            facing_yaw,
        }
    }
}

/// Wrap an angle into `(-PI, PI]`
fn wrap_angle(a: f32) -> f32 {
    let wrapped = (a + PI).rem_euclid(TAU) - PI;
    if wrapped == -PI {
        PI
    } else {
        wrapped
    }
}
