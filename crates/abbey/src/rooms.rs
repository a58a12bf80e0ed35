//! Room graph: axis-aligned room boxes joined by door-gated apertures
//!
//! Rooms are listed in ascending `min_x` order. A position belongs to the room
//! whose box contains it; outside every box it belongs to the last room whose
//! `min_x` lies strictly below its x coordinate, so for the default abbey a
//! corridor point with `x > 10` selects the altar room.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Walkable floor rectangle of one room (XZ plane)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomBounds {
    pub name: String,
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl RoomBounds {
    pub fn new(name: impl Into<String>, min_x: f32, max_x: f32, min_z: f32, max_z: f32) -> Self {
        Self {
            name: name.into(),
            min_x,
            max_x,
            min_z,
            max_z,
        }
    }

    /// Inclusive containment test on x and z; y is ignored
    pub fn contains_xz(&self, p: Vec3) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.z >= self.min_z && p.z <= self.max_z
    }

    /// Clamp x and z independently into the box; y passes through
    pub fn clamp_xz(&self, p: Vec3) -> Vec3 {
        Vec3::new(
            p.x.clamp(self.min_x, self.max_x),
            p.y,
            p.z.clamp(self.min_z, self.max_z),
        )
    }

    pub fn center(&self) -> Vec3 {
        Vec3::new(
            (self.min_x + self.max_x) * 0.5,
            0.0,
            (self.min_z + self.max_z) * 0.5,
        )
    }
}

/// A doorway through a room wall, gated by its door
///
/// The walk-through corridor is `z_min < z < z_max` and `|x - self.x| < reach`.
/// The same region doubles as the door's interaction zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aperture {
    pub name: String,
    /// Wall plane the doorway is cut into
    pub x: f32,
    pub z_min: f32,
    pub z_max: f32,
    /// Half-depth of the corridor on either side of the wall
    #[serde(default = "default_reach")]
    pub reach: f32,
    /// Hinge of the door leaf, reported to the renderer
    #[serde(default)]
    pub pivot: Vec3,
}

fn default_reach() -> f32 {
    1.0
}

impl Aperture {
    pub fn contains(&self, p: Vec3) -> bool {
        p.z > self.z_min && p.z < self.z_max && (p.x - self.x).abs() < self.reach
    }
}

/// Ordered rooms plus the apertures connecting them
#[derive(Debug, Clone, PartialEq)]
pub struct RoomGraph {
    rooms: Vec<RoomBounds>,
    apertures: Vec<Aperture>,
}

impl RoomGraph {
    /// Build a graph; `rooms` must be non-empty and sorted by `min_x`
    /// (checked by config validation)
    pub fn new(rooms: Vec<RoomBounds>, apertures: Vec<Aperture>) -> Self {
        Self { rooms, apertures }
    }

    pub fn rooms(&self) -> &[RoomBounds] {
        &self.rooms
    }

    pub fn apertures(&self) -> &[Aperture] {
        &self.apertures
    }

    /// Index of the room an entity at `x` is considered to be in
    pub fn room_index_for_x(&self, x: f32) -> usize {
        self.rooms.iter().rposition(|r| x > r.min_x).unwrap_or(0)
    }

    pub fn room_for_x(&self, x: f32) -> &RoomBounds {
        &self.rooms[self.room_index_for_x(x)]
    }

    /// Index of the room whose box contains `p`, falling back to the x rule
    /// for positions outside every box (inside a doorway corridor)
    ///
    /// An avatar clamped against the altar room's west wall sits exactly on
    /// `min_x`, where the x rule alone would hand it to the nave.
    pub fn room_index_for(&self, p: Vec3) -> usize {
        self.rooms
            .iter()
            .position(|r| r.contains_xz(p))
            .unwrap_or_else(|| self.room_index_for_x(p.x))
    }

    pub fn room_for(&self, p: Vec3) -> &RoomBounds {
        &self.rooms[self.room_index_for(p)]
    }

    /// First aperture whose corridor contains `p`
    pub fn aperture_at(&self, p: Vec3) -> Option<usize> {
        self.apertures.iter().position(|a| a.contains(p))
    }

    /// Whether `p` is inside the corridor of an aperture that `is_open` reports open
    pub fn in_open_aperture(&self, p: Vec3, is_open: impl Fn(usize) -> bool) -> bool {
        self.apertures
            .iter()
            .enumerate()
            .any(|(i, a)| a.contains(p) && is_open(i))
    }

    /// Placement rule for entities: inside exactly one room box, or inside an
    /// open aperture's corridor
    pub fn is_valid_position(&self, p: Vec3, is_open: impl Fn(usize) -> bool) -> bool {
        let rooms_containing = self.rooms.iter().filter(|r| r.contains_xz(p)).count();
        rooms_containing == 1 || self.in_open_aperture(p, is_open)
    }
}
