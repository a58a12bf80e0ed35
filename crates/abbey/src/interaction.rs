//! Proximity zones, the interact key, and the quest panel
//!
//! Each tick the avatar is matched against the zones in priority order:
//!
//! 1. a door aperture: show the door panel, toggle on the interact key's
//!    rising edge only
//! 2. each NPC in list order, while within its talk radius and its dialogue
//!    has not been shown: show its prompt, and while the interact key is held
//!    engage it (this is level-triggered; the shown flag makes it one-shot)
//! 3. otherwise, revert an unanswered in-range prompt to the initial panel
//!    while the quest giver has not been engaged
//!
//! The held state of the interact key is stored at the end of every tick so
//! the door's edge detection never sees a stale value.

use crate::config::{NpcConfig, PanelText};
use crate::door::Door;
use crate::rooms::RoomGraph;
use glam::Vec3;
use serde::{Deserialize, Serialize};

const DOOR_TITLE: &str = "Door";

/// Per-NPC quest progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestStage {
    NotStarted,
    InRangeUnengaged,
    InProgress,
    Completed,
}

/// Status line of the quest panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelStatus {
    NotStarted,
    InRange,
    InProgress,
    Completed,
    DoorOpen,
    DoorClosed,
}

impl PanelStatus {
    /// Text shown on the status line; `interact_key` names the interact binding
    pub fn label(self, interact_key: &str) -> String {
        match self {
            PanelStatus::NotStarted => "Not started".into(),
            PanelStatus::InRange => format!("In range - Press {interact_key} to talk"),
            PanelStatus::InProgress => "In Progress".into(),
            PanelStatus::Completed => "Completed".into(),
            PanelStatus::DoorOpen => "Open".into(),
            PanelStatus::DoorClosed => "Closed".into(),
        }
    }

    /// Whether this status rewrites the panel's data-status attribute
    pub fn sets_data_status(self) -> bool {
        matches!(
            self,
            PanelStatus::NotStarted | PanelStatus::InProgress | PanelStatus::Completed
        )
    }

    /// data-status attribute value; `None` removes the attribute
    pub fn data_status(self) -> Option<&'static str> {
        match self {
            PanelStatus::InProgress => Some("in-progress"),
            PanelStatus::Completed => Some("completed"),
            _ => None,
        }
    }
}

/// What the quest-panel collaborator currently displays
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestPanel {
    pub title: String,
    pub status: PanelStatus,
    pub status_label: String,
    pub description: String,
    pub data_status: Option<&'static str>,
}

impl QuestPanel {
    pub fn new(text: &PanelText, interact_key: &str) -> Self {
        Self {
            title: text.title.clone(),
            status: text.status,
            status_label: text.status.label(interact_key),
            description: text.description.clone(),
            data_status: text.status.data_status(),
        }
    }

    /// Write `text` to the panel; returns false if nothing visible changed
    pub fn apply(&mut self, text: &PanelText, interact_key: &str) -> bool {
        let status_label = text.status.label(interact_key);
        let data_status = if text.status.sets_data_status() {
            text.status.data_status()
        } else {
            self.data_status
        };

        if self.title == text.title
            && self.status_label == status_label
            && self.description == text.description
            && self.data_status == data_status
        {
            return false;
        }

        self.title.clone_from(&text.title);
        self.status = text.status;
        self.status_label = status_label;
        self.description.clone_from(&text.description);
        self.data_status = data_status;
        true
    }
}

/// Tracking for one dialogue-bearing NPC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NpcQuest {
    pub stage: QuestStage,
    pub dialogue_shown: bool,
}

impl Default for NpcQuest {
    fn default() -> Self {
        Self {
            stage: QuestStage::NotStarted,
            dialogue_shown: false,
        }
    }
}

/// Which zone the avatar occupied this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Door(usize),
    Npc(usize),
    None,
}

/// Side effects of one interaction tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionOutcome {
    /// The panel after this tick, present only if it changed
    pub panel: Option<QuestPanel>,
    /// NPC index whose dialogue should be shown
    pub dialogue: Option<usize>,
    /// Door index and its new `is_open`
    pub door_toggled: Option<(usize, bool)>,
}

/// Interaction and quest state machine
#[derive(Debug, Clone)]
pub struct Interaction {
    panel: QuestPanel,
    npcs: Vec<NpcQuest>,
    initial_panel: PanelText,
    interact_key: String,
    interact_was_held: bool,
}

impl Interaction {
    pub fn new(initial_panel: PanelText, npc_count: usize, interact_key: impl Into<String>) -> Self {
        let interact_key = interact_key.into();
        Self {
            panel: QuestPanel::new(&initial_panel, &interact_key),
            npcs: vec![NpcQuest::default(); npc_count],
            initial_panel,
            interact_key,
            interact_was_held: false,
        }
    }

    pub fn panel(&self) -> &QuestPanel {
        &self.panel
    }

    pub fn quests(&self) -> &[NpcQuest] {
        &self.npcs
    }

    pub fn quest(&self, npc: usize) -> Option<&NpcQuest> {
        self.npcs.get(npc)
    }

    /// Decide the zone for `position` without side effects
    pub fn zone_at(&self, position: Vec3, world: &RoomGraph, npcs: &[NpcConfig]) -> Zone {
        if let Some(door) = world.aperture_at(position) {
            return Zone::Door(door);
        }
        npcs.iter()
            .zip(&self.npcs)
            .position(|(npc, quest)| {
                !quest.dialogue_shown && position.distance(npc.position) < npc.talk_radius
            })
            .map_or(Zone::None, Zone::Npc)
    }

    /// Run one tick of zone evaluation
    pub fn update(
        &mut self,
        position: Vec3,
        interact_held: bool,
        world: &RoomGraph,
        doors: &mut [Door],
        npcs: &[NpcConfig],
    ) -> InteractionOutcome {
        let mut outcome = InteractionOutcome::default();
        let zone = self.zone_at(position, world, npcs);
        let pressed = interact_held && !self.interact_was_held;

        for (i, quest) in self.npcs.iter_mut().enumerate() {
            if quest.stage == QuestStage::InRangeUnengaged && zone != Zone::Npc(i) {
                set_stage(quest, i, QuestStage::NotStarted);
            }
        }

        match zone {
            Zone::Door(index) => {
                if let Some(door) = doors.get_mut(index) {
                    let text = door_panel(door.is_open(), &self.interact_key);
                    if self.panel.apply(&text, &self.interact_key) {
                        outcome.panel = Some(self.panel.clone());
                    }
                    if pressed {
                        let is_open = door.toggle();
                        tracing::info!("Door {} {}", index, if is_open { "opened" } else { "closed" });
                        outcome.door_toggled = Some((index, is_open));
                    }
                }
            }
            Zone::Npc(index) => {
                if let (Some(npc), Some(quest)) = (npcs.get(index), self.npcs.get_mut(index)) {
                    let text = if interact_held {
                        quest.dialogue_shown = true;
                        set_stage(quest, index, QuestStage::InProgress);
                        tracing::info!("Dialogue with {} ({})", npc.name, npc.id);
                        outcome.dialogue = Some(index);
                        &npc.engaged
                    } else {
                        if quest.stage == QuestStage::NotStarted {
                            set_stage(quest, index, QuestStage::InRangeUnengaged);
                        }
                        &npc.prompt
                    };
                    if self.panel.apply(text, &self.interact_key) {
                        outcome.panel = Some(self.panel.clone());
                    }
                }
            }
            Zone::None => {
                let giver_waiting = self.npcs.first().is_some_and(|q| !q.dialogue_shown);
                if giver_waiting
                    && self.panel.status == PanelStatus::InRange
                    && self.panel.apply(&self.initial_panel, &self.interact_key)
                {
                    outcome.panel = Some(self.panel.clone());
                }
            }
        }

        self.interact_was_held = interact_held;
        outcome
    }

    /// The dialogue window for `npc` was dismissed
    pub fn dismiss(&mut self, npc: usize) -> bool {
        match self.npcs.get_mut(npc) {
            Some(quest) if quest.stage == QuestStage::InProgress => {
                set_stage(quest, npc, QuestStage::Completed);
                true
            }
            _ => false,
        }
    }
}

fn door_panel(is_open: bool, interact_key: &str) -> PanelText {
    PanelText::new(
        DOOR_TITLE,
        if is_open {
            PanelStatus::DoorOpen
        } else {
            PanelStatus::DoorClosed
        },
        format!(
            "Press {} to {} the door",
            interact_key,
            if is_open { "close" } else { "open" }
        ),
    )
}

fn set_stage(quest: &mut NpcQuest, index: usize, stage: QuestStage) {
    if quest.stage != stage {
        tracing::debug!("Quest {} stage {:?} -> {:?}", index, quest.stage, stage);
        quest.stage = stage;
    }
}
