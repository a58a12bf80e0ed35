//! Scene and tuning configuration
//!
//! Loaded from TOML. Every section has defaults describing the two-room abbey,
//! so an empty file (or no file) yields the stock scene.

use crate::input::Action;
use crate::interaction::PanelStatus;
use crate::rooms::{Aperture, RoomBounds};
use crate::{Error, Result};
use devices::{Key, KeyMap};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_6};
use std::path::Path;

/// Root configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AbbeyConfig {
    pub scene: SceneConfig,
    pub motion: MotionConfig,
    pub camera: CameraConfig,
    pub door: DoorConfig,
    pub timing: TimingConfig,
    pub bindings: BindingsConfig,
}

impl AbbeyConfig {
    /// Read, parse and validate a TOML config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!(
            "Loaded config from {:?}: {} rooms, {} apertures, {} npcs",
            path,
            config.scene.rooms.len(),
            config.scene.apertures.len(),
            config.scene.npcs.len()
        );
        Ok(config)
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the simulation cannot run sensibly
    ///
    /// Comparisons are written so that a NaN fails them; TOML accepts `nan`
    /// and `inf` literals.
    pub fn validate(&self) -> Result<()> {
        let scene = &self.scene;
        if scene.rooms.is_empty() {
            return invalid("scene must define at least one room");
        }
        check_finite_vec("scene.spawn", scene.spawn)?;
        check_finite("scene.spawn_yaw", scene.spawn_yaw)?;
        check_finite_vec("scene.camera_start", scene.camera_start)?;
        for room in &scene.rooms {
            for value in [room.min_x, room.max_x, room.min_z, room.max_z] {
                check_finite(&format!("room '{}' bounds", room.name), value)?;
            }
            if !(room.min_x < room.max_x && room.min_z < room.max_z) {
                return invalid(format!("room '{}' has inverted bounds", room.name));
            }
        }
        if scene.rooms.windows(2).any(|w| !(w[0].min_x <= w[1].min_x)) {
            return invalid("rooms must be listed in ascending min_x order");
        }
        for aperture in &scene.apertures {
            check_finite(&format!("aperture '{}' x", aperture.name), aperture.x)?;
            check_finite_vec(&format!("aperture '{}' pivot", aperture.name), aperture.pivot)?;
            if !(aperture.z_min < aperture.z_max && aperture.reach > 0.0)
                || !aperture.z_min.is_finite()
                || !aperture.z_max.is_finite()
                || !aperture.reach.is_finite()
            {
                return invalid(format!("aperture '{}' has an empty corridor", aperture.name));
            }
        }
        for npc in &scene.npcs {
            check_finite_vec(&format!("npc '{}' position", npc.id), npc.position)?;
            if !(npc.talk_radius > 0.0 && npc.talk_radius.is_finite()) {
                return invalid(format!("npc '{}' needs a positive talk radius", npc.id));
            }
        }
        let mut ids: Vec<&str> = scene.npcs.iter().map(|n| n.id.as_str()).collect();
        ids.sort_unstable();
        if ids.windows(2).any(|w| w[0] == w[1]) {
            return invalid("npc ids must be unique");
        }
        for candle in &scene.candles {
            check_finite_vec("candle position", candle.position)?;
            check_finite("candle base_intensity", candle.base_intensity)?;
        }

        let motion = &self.motion;
        check_finite("motion.move_speed", motion.move_speed)?;
        check_finite("motion.turn_speed", motion.turn_speed)?;
        check_finite("motion.min_height", motion.min_height)?;
        check_finite("motion.max_height", motion.max_height)?;
        if !(motion.move_speed >= 0.0 && motion.turn_speed >= 0.0) {
            return invalid("motion speeds must not be negative");
        }
        if !(motion.min_height <= motion.max_height) {
            return invalid("motion height bounds are inverted");
        }

        let camera = &self.camera;
        for (name, value) in [
            ("camera.height", camera.height),
            ("camera.target_lift", camera.target_lift),
            ("camera.min_distance", camera.min_distance),
            ("camera.max_distance", camera.max_distance),
            ("camera.start_distance", camera.start_distance),
            ("camera.zoom_step", camera.zoom_step),
            ("camera.min_height", camera.min_height),
            ("camera.max_height", camera.max_height),
            ("camera.orbit_sensitivity", camera.orbit_sensitivity),
            ("camera.min_polar", camera.min_polar),
            ("camera.max_polar", camera.max_polar),
        ] {
            check_finite(name, value)?;
        }
        if !(camera.min_distance <= camera.max_distance) {
            return invalid("camera min_distance exceeds max_distance");
        }
        if !(camera.min_distance..=camera.max_distance).contains(&camera.start_distance) {
            return invalid("camera start_distance outside [min_distance, max_distance]");
        }
        if !(camera.min_height <= camera.max_height) {
            return invalid("camera height bounds are inverted");
        }
        if !(camera.min_polar <= camera.max_polar) {
            return invalid("camera polar bounds are inverted");
        }
        if !(camera.zoom_step >= 0.0 && camera.orbit_sensitivity >= 0.0) {
            return invalid("camera zoom_step and orbit_sensitivity must not be negative");
        }
        check_rate("camera.follow_rate", camera.follow_rate)?;
        check_rate("camera.wall_pull_rate", camera.wall_pull_rate)?;
        check_finite("door.open_angle", self.door.open_angle)?;
        check_rate("door.rate", self.door.rate)?;

        if !(self.timing.reference_hz > 0.0 && self.timing.reference_hz.is_finite()) {
            return invalid("timing.reference_hz must be positive");
        }

        self.bindings.key_map()?;
        Ok(())
    }
}

fn invalid<T>(message: impl Into<String>) -> Result<T> {
    Err(Error::InvalidConfig(message.into()))
}

fn check_finite(name: &str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        invalid(format!("{name} must be finite, got {value}"))
    }
}

fn check_finite_vec(name: &str, value: Vec3) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        invalid(format!("{name} must be finite, got {value}"))
    }
}

fn check_rate(name: &str, rate: f32) -> Result<()> {
    if rate > 0.0 && rate <= 1.0 {
        Ok(())
    } else {
        invalid(format!("{name} must be in (0, 1], got {rate}"))
    }
}

// ============================================================================
// Scene
// ============================================================================

/// Static scene layout: where things are, not how they look
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub spawn: Vec3,
    pub spawn_yaw: f32,
    pub camera_start: Vec3,
    pub rooms: Vec<RoomBounds>,
    pub apertures: Vec<Aperture>,
    /// Dialogue NPCs in zone priority order; the first is the quest giver
    pub npcs: Vec<NpcConfig>,
    pub candles: Vec<CandleConfig>,
    /// Panel shown before any NPC has been engaged
    pub initial_panel: PanelText,
}

impl Default for SceneConfig {
    fn default() -> Self {
        let quest = "The Bishop's Disappearance";
        Self {
            spawn: Vec3::ZERO,
            spawn_yaw: 0.0,
            camera_start: Vec3::new(0.0, 2.0, 5.0),
            rooms: vec![
                RoomBounds::new("nave", -9.5, 9.5, -9.5, 9.5),
                RoomBounds::new("altar room", 10.0, 20.0, -5.0, 5.0),
            ],
            apertures: vec![Aperture {
                name: "altar door".into(),
                x: 10.0,
                z_min: -1.0,
                z_max: 1.0,
                reach: 1.0,
                pivot: Vec3::new(10.0, 1.0, 0.0),
            }],
            npcs: vec![
                NpcConfig {
                    id: "monk".into(),
                    name: "Brother Anselm".into(),
                    position: Vec3::new(3.0, 0.0, -3.0),
                    talk_radius: 2.0,
                    prompt: PanelText::new(
                        "Talk to the monk",
                        PanelStatus::InRange,
                        "Approach the other monk to begin your investigation.",
                    ),
                    engaged: PanelText::new(
                        quest,
                        PanelStatus::InProgress,
                        "The monk tells you about strange occurrences in the abbey's crypt before the bishop's disappearance...",
                    ),
                    dialogue: vec![
                        "Thank the Lord you have come. The bishop has not been seen since the night of the storm.".into(),
                        "In the weeks before he vanished, the brothers heard chanting from the crypt long after compline, when no one should have been below.".into(),
                        "Speak with the altar keeper beyond the east door. He was the last to see the bishop at prayer.".into(),
                    ],
                },
                NpcConfig {
                    id: "altar_keeper".into(),
                    name: "Brother Marcus".into(),
                    position: Vec3::new(15.0, 0.0, -2.0),
                    talk_radius: 2.0,
                    prompt: PanelText::new(
                        "Talk to the altar keeper",
                        PanelStatus::InRange,
                        "The altar keeper might know something about the bishop's disappearance.",
                    ),
                    engaged: PanelText::new(
                        quest,
                        PanelStatus::InProgress,
                        "The altar keeper tells you about strange symbols he found in the bishop's private chapel...",
                    ),
                    dialogue: vec![
                        "Ah, you're investigating the bishop's disappearance. I've been tending to this altar for many years, and I've seen many things.".into(),
                        "The bishop often came here to pray, especially in the early hours of the morning. He was particularly interested in the ancient symbols carved into the altar's base.".into(),
                        "One night, I saw him speaking with the master mason here. They were arguing about something - something about the cathedral's true purpose. The bishop mentioned something about \"the old ways\" and \"forbidden knowledge.\"".into(),
                        "After that night, I found strange markings on the altar - symbols I've never seen before. They look ancient, possibly from before the time of Christ.".into(),
                    ],
                },
            ],
            candles: [
                (Vec3::new(-8.0, 0.0, -8.0), 5.0),
                (Vec3::new(8.0, 0.0, -8.0), 5.0),
                (Vec3::new(-8.0, 0.0, 8.0), 5.0),
                (Vec3::new(8.0, 0.0, 8.0), 5.0),
                (Vec3::new(0.0, 0.0, 0.0), 5.0),
                (Vec3::new(14.2, 0.5, -3.0), 8.0),
                (Vec3::new(15.8, 0.5, -3.0), 8.0),
            ]
            .into_iter()
            .map(|(position, base_intensity)| CandleConfig {
                position,
                base_intensity,
            })
            .collect(),
            initial_panel: PanelText::new(
                "Talk to the monk",
                PanelStatus::NotStarted,
                "Approach the other monk to begin your investigation.",
            ),
        }
    }
}

/// Text for one quest-panel state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelText {
    pub title: String,
    pub status: PanelStatus,
    pub description: String,
}

impl PanelText {
    pub fn new(title: impl Into<String>, status: PanelStatus, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            status,
            description: description.into(),
        }
    }
}

/// A dialogue-bearing NPC
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcConfig {
    pub id: String,
    /// Speaker name shown in the dialogue window
    pub name: String,
    pub position: Vec3,
    #[serde(default = "default_talk_radius")]
    pub talk_radius: f32,
    /// Panel while in range and not yet engaged
    pub prompt: PanelText,
    /// Panel once the dialogue has been triggered
    pub engaged: PanelText,
    /// Dialogue paragraphs
    pub dialogue: Vec<String>,
}

fn default_talk_radius() -> f32 {
    2.0
}

/// A decorative flickering candle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandleConfig {
    pub position: Vec3,
    #[serde(default = "default_candle_intensity")]
    pub base_intensity: f32,
}

fn default_candle_intensity() -> f32 {
    5.0
}

// ============================================================================
// Tuning
// ============================================================================

/// Avatar movement tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Walk speed in units per second
    pub move_speed: f32,
    /// Turn speed for the rotate actions in radians per second
    pub turn_speed: f32,
    pub min_height: f32,
    pub max_height: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            move_speed: 6.0,
            turn_speed: 1.8,
            min_height: 0.0,
            max_height: 4.0,
        }
    }
}

/// Third-person camera tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Height of the follow position above the avatar's feet
    pub height: f32,
    /// Look-at point height above the avatar's feet
    pub target_lift: f32,
    /// Fraction of the remaining gap closed per reference tick in follow mode
    pub follow_rate: f32,
    /// Fraction of the wall overshoot removed per reference tick
    pub wall_pull_rate: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub start_distance: f32,
    /// Distance change per wheel notch
    pub zoom_step: f32,
    pub min_height: f32,
    pub max_height: f32,
    /// Delay after right-button release before follow mode resumes
    pub release_delay_ms: u64,
    /// Orbit rotation per pixel of drag, in radians
    pub orbit_sensitivity: f32,
    /// Polar angle limits (from straight up) while orbiting
    pub min_polar: f32,
    pub max_polar: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            height: 2.0,
            target_lift: 1.0,
            follow_rate: 0.1,
            wall_pull_rate: 0.1,
            min_distance: 2.0,
            max_distance: 6.0,
            start_distance: 4.0,
            zoom_step: 0.2,
            min_height: 0.5,
            max_height: 3.5,
            release_delay_ms: 2000,
            orbit_sensitivity: 0.005,
            min_polar: FRAC_PI_6,
            max_polar: FRAC_PI_2,
        }
    }
}

impl CameraConfig {
    pub fn release_delay_secs(&self) -> f64 {
        self.release_delay_ms as f64 / 1000.0
    }
}

/// Door swing tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoorConfig {
    pub open_angle: f32,
    /// Fraction of the remaining swing covered per reference tick
    pub rate: f32,
}

impl Default for DoorConfig {
    fn default() -> Self {
        Self {
            open_angle: FRAC_PI_2,
            rate: 0.05,
        }
    }
}

/// Frame-rate reference for the per-tick rates above
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub reference_hz: f32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self { reference_hz: 60.0 }
    }
}

/// Key name to action table, e.g. `z = "forward"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BindingsConfig(pub BTreeMap<String, Action>);

impl Default for BindingsConfig {
    fn default() -> Self {
        Self(
            [
                ("z", Action::Forward),
                ("s", Action::Backward),
                ("q", Action::StrafeLeft),
                ("d", Action::StrafeRight),
                ("a", Action::RotateLeft),
                ("e", Action::Interact),
            ]
            .into_iter()
            .map(|(k, a)| (k.to_string(), a))
            .collect(),
        )
    }
}

impl BindingsConfig {
    /// Resolve key names into a binding table
    pub fn key_map(&self) -> Result<KeyMap<Action>> {
        let mut map = KeyMap::new();
        for (name, action) in &self.0 {
            let key: Key = name.parse()?;
            map.bind(key, *action);
        }
        Ok(map)
    }
}
