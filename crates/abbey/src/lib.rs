//! Abbey walk simulation core
//!
//! A single-player exploration scene: an avatar walks through a two-room abbey
//! interior, opens the door between the rooms, and triggers scripted dialogue
//! by approaching NPCs. This crate holds only the stateful controller logic;
//! rendering, the quest-panel widget and the dialogue window are collaborators
//! that consume [`FrameSnapshot`]s and [`SimEvent`]s.
//!
//! # Modules
//!
//! - [`rooms`]: Room boxes and door-gated apertures
//! - [`input`]: Raw events to held actions and pointer queues
//! - [`motion`]: Avatar walking, facing and clamping
//! - [`door`]: Door toggle and eased swing
//! - [`camera`]: Follow/manual camera rig
//! - [`interaction`]: Zones, interact key and quest panel
//! - [`candles`]: Decorative candle flicker
//! - [`timer`]: Cancellable scheduled events on the simulation clock
//! - [`state`]: `SimulationState` and the per-tick driver
//! - [`config`]: TOML scene and tuning configuration
//!
//! # Example
//!
//! ```
//! use abbey::{AbbeyConfig, InputEvent, SimulationState};
//! use devices::Key;
//!
//! let mut sim = SimulationState::new(AbbeyConfig::default()).unwrap();
//! sim.handle_input(&InputEvent::KeyDown(Key::Z));
//! let frame = sim.tick(1.0 / 60.0);
//! assert!(frame.snapshot.avatar.position.z < 0.0);
//! ```

pub mod camera;
pub mod candles;
pub mod config;
pub mod door;
pub mod error;
pub mod input;
pub mod interaction;
pub mod motion;
pub mod rooms;
pub mod smoothing;
pub mod state;
pub mod timer;

pub use camera::{CameraMode, CameraRig, CameraState};
pub use config::AbbeyConfig;
pub use door::Door;
pub use error::{Error, Result};
pub use input::{Action, InputEvent, InputState, MoveIntent};
pub use interaction::{Interaction, PanelStatus, QuestPanel, QuestStage};
pub use motion::{AvatarController, AvatarPose};
pub use rooms::{Aperture, RoomBounds, RoomGraph};
pub use state::{FrameSnapshot, SimEvent, SimulationState, TickOutput};

// Re-export glam for downstream crates
pub use glam;
