//! The simulation loop state and its per-tick driver
//!
//! `SimulationState` owns every mutable piece of the scene. The platform layer
//! feeds raw input through [`SimulationState::handle_input`] between ticks and
//! calls [`SimulationState::tick`] once per frame. Each tick runs, in order:
//!
//! 1. advance the clock
//! 2. drain pointer input (grab/release/zoom, orbit drag) and dialogue dismissals
//! 3. fire due timers
//! 4. avatar motion, using last tick's camera view direction
//! 5. door swings
//! 6. camera placement, using this tick's avatar pose
//! 7. zone and quest evaluation
//!
//! and returns an immutable [`FrameSnapshot`] for the renderer together with
//! the panel/dialogue events produced this tick.

use crate::camera::{CameraMode, CameraRig, CameraState, CameraTimer};
use crate::candles::{flicker, CandleFlicker};
use crate::config::AbbeyConfig;
use crate::door::Door;
use crate::input::{Action, InputEvent, InputState};
use crate::interaction::{Interaction, NpcQuest, QuestPanel};
use crate::motion::{AvatarController, AvatarPose};
use crate::rooms::RoomGraph;
use crate::timer::Timers;
use crate::Result;
use glam::Vec3;
use serde::Serialize;

/// Externally observable changes produced by a tick
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SimEvent {
    /// The quest panel changed; carries the full new contents
    QuestPanel(QuestPanel),
    /// Open the dialogue window
    ShowDialogue {
        npc: String,
        speaker: String,
        paragraphs: Vec<String>,
    },
    DoorToggled { door: usize, is_open: bool },
    CameraModeChanged { mode: CameraMode },
    /// An NPC's dialogue was dismissed and its quest stage completed
    QuestCompleted { npc: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CameraView {
    pub position: Vec3,
    pub target: Vec3,
    pub mode: CameraMode,
    pub distance: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoorView {
    pub pivot: Vec3,
    /// Leaf rotation about +Y at the pivot
    pub yaw: f32,
    pub is_open: bool,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub time: f64,
    pub avatar: AvatarPose,
    pub camera: CameraView,
    pub doors: Vec<DoorView>,
    pub candles: Vec<CandleFlicker>,
    pub quests: Vec<NpcQuest>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickOutput {
    pub snapshot: FrameSnapshot,
    pub events: Vec<SimEvent>,
}

/// Owns the whole scene state for one session
#[derive(Debug, Clone)]
pub struct SimulationState {
    config: AbbeyConfig,
    world: RoomGraph,
    input: InputState,
    motion: AvatarController,
    rig: CameraRig,
    avatar: AvatarPose,
    camera: CameraState,
    doors: Vec<Door>,
    interaction: Interaction,
    timers: Timers<CameraTimer>,
    clock: f64,
    ticks: u64,
}

impl SimulationState {
    /// Fresh session: spawn pose, closed doors, no dialogue shown
    pub fn new(config: AbbeyConfig) -> Result<Self> {
        config.validate()?;
        let bindings = config.bindings.key_map()?;
        let interact_key = bindings
            .keys_for(Action::Interact)
            .first()
            .map(|key| key.name().to_uppercase())
            .unwrap_or_else(|| "E".to_string());

        let scene = &config.scene;
        let world = RoomGraph::new(scene.rooms.clone(), scene.apertures.clone());
        let avatar = AvatarPose::new(scene.spawn, scene.spawn_yaw);
        let rig = CameraRig::new(config.camera.clone(), config.timing.reference_hz);
        let camera = rig.initial_state(scene.camera_start, &avatar);
        let doors = scene.apertures.iter().map(|_| Door::new(&config.door)).collect();
        let interaction = Interaction::new(scene.initial_panel.clone(), scene.npcs.len(), interact_key);

        tracing::debug!(
            "Session start: avatar at {:?}, camera at {:?}",
            avatar.position,
            camera.position
        );

        Ok(Self {
            world,
            input: InputState::new(bindings),
            motion: AvatarController::new(config.motion.clone()),
            rig,
            avatar,
            camera,
            doors,
            interaction,
            timers: Timers::new(),
            clock: 0.0,
            ticks: 0,
            config,
        })
    }

    /// Queue one raw input event for the next tick
    pub fn handle_input(&mut self, event: &InputEvent) {
        tracing::trace!("Input {:?}", event);
        self.input.apply(event);
    }

    /// Advance the simulation by `dt` seconds
    pub fn tick(&mut self, dt: f32) -> TickOutput {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.clock += f64::from(dt);
        self.ticks += 1;
        let mut events = Vec::new();

        for pointer in self.input.take_pointer_events() {
            if let Some(mode) = self
                .rig
                .handle_pointer(&mut self.camera, pointer, self.clock, &mut self.timers)
            {
                events.push(SimEvent::CameraModeChanged { mode });
            }
        }
        let drag = self.input.take_drag();
        self.rig.orbit(&mut self.camera, drag);

        for npc_id in self.input.take_dismissed() {
            let Some(index) = self.config.scene.npcs.iter().position(|n| n.id == npc_id) else {
                tracing::warn!("Dismissal for unknown npc '{}'", npc_id);
                continue;
            };
            if self.interaction.dismiss(index) {
                events.push(SimEvent::QuestCompleted { npc: npc_id });
            }
        }

        for (token, timer) in self.timers.fire_due(self.clock) {
            tracing::trace!("Timer {:?} fired at t={:.3}", token, self.clock);
            if let Some(mode) = self.rig.on_timer(&mut self.camera, token, timer) {
                events.push(SimEvent::CameraModeChanged { mode });
            }
        }

        let intent = self.input.move_intent();
        self.avatar = self.motion.step(
            self.avatar,
            &intent,
            self.camera.forward(),
            &self.world,
            &self.doors,
            dt,
        );

        let reference_hz = self.config.timing.reference_hz;
        for door in &mut self.doors {
            door.step(dt, reference_hz);
        }

        self.rig
            .update(&mut self.camera, &self.avatar, &self.world, dt);

        let outcome = self.interaction.update(
            self.avatar.position,
            self.input.interact_held(),
            &self.world,
            &mut self.doors,
            &self.config.scene.npcs,
        );
        if let Some(panel) = outcome.panel {
            events.push(SimEvent::QuestPanel(panel));
        }
        if let Some((door, is_open)) = outcome.door_toggled {
            events.push(SimEvent::DoorToggled { door, is_open });
        }
        if let Some(npc) = outcome.dialogue.and_then(|i| self.config.scene.npcs.get(i)) {
            events.push(SimEvent::ShowDialogue {
                npc: npc.id.clone(),
                speaker: npc.name.clone(),
                paragraphs: npc.dialogue.clone(),
            });
        }

        TickOutput {
            snapshot: self.snapshot(),
            events,
        }
    }

    /// Render view of the current state
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            tick: self.ticks,
            time: self.clock,
            avatar: self.avatar,
            camera: CameraView {
                position: self.camera.position,
                target: self.camera.target,
                mode: self.camera.mode,
                distance: self.camera.distance,
            },
            doors: self
                .world
                .apertures()
                .iter()
                .zip(&self.doors)
                .map(|(aperture, door)| DoorView {
                    pivot: aperture.pivot,
                    yaw: door.current_angle(),
                    is_open: door.is_open(),
                })
                .collect(),
            candles: self
                .config
                .scene
                .candles
                .iter()
                .map(|c| flicker(c, self.clock))
                .collect(),
            quests: self.interaction.quests().to_vec(),
        }
    }

    /// Teleport the avatar, e.g. to set up a scripted situation
    pub fn place_avatar(&mut self, pose: AvatarPose) {
        self.avatar = pose;
    }

    pub fn avatar(&self) -> &AvatarPose {
        &self.avatar
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn doors(&self) -> &[Door] {
        &self.doors
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn world(&self) -> &RoomGraph {
        &self.world
    }

    pub fn config(&self) -> &AbbeyConfig {
        &self.config
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Simulation clock in seconds since session start
    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
