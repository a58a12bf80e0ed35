//! Input state: raw device events mapped onto logical actions
//!
//! No game logic lives here. Keys become held actions through the binding
//! table; right-button transitions and wheel notches are queued in arrival
//! order for the camera rig; drag motion is accumulated while the orbit
//! button is held.

use devices::{DragAccumulator, Key, KeyMap, KeyboardState, MouseButtonType, MouseButtons, WheelDirection};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Logical player actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Forward,
    Backward,
    StrafeLeft,
    StrafeRight,
    RotateLeft,
    RotateRight,
    Interact,
}

/// Raw events delivered by the platform layer between ticks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    MouseDown(MouseButtonType),
    MouseUp(MouseButtonType),
    /// Pointer motion in pixels
    MouseMove(Vec2),
    /// Raw wheel delta; only the sign is used
    Wheel(f32),
    /// Window resize, for the renderer only
    Resized { width: u32, height: u32 },
    /// Window lost focus; every key is released
    FocusLost,
    /// The dialogue window for this NPC id was dismissed
    DialogueClosed(String),
}

/// Pointer events that drive the camera rig, in arrival order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    /// Orbit button pressed: take manual control
    Grab,
    /// Orbit button released: start the hand-back timer
    Release,
    Zoom(WheelDirection),
}

/// Which movement actions are held this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub rotate_left: bool,
    pub rotate_right: bool,
}

impl MoveIntent {
    pub fn translating(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }
}

/// Tracks held keys and pending pointer input
#[derive(Debug, Clone)]
pub struct InputState {
    keyboard: KeyboardState,
    bindings: KeyMap<Action>,
    buttons: MouseButtons,
    orbit_button: MouseButtonType,
    pointer: Vec<PointerEvent>,
    drag: DragAccumulator,
    dismissed: Vec<String>,
}

impl InputState {
    pub fn new(bindings: KeyMap<Action>) -> Self {
        Self {
            keyboard: KeyboardState::new(),
            bindings,
            buttons: MouseButtons::new(),
            orbit_button: MouseButtonType::Right,
            pointer: Vec::new(),
            drag: DragAccumulator::new(),
            dismissed: Vec::new(),
        }
    }

    /// Fold one raw event into the state
    pub fn apply(&mut self, event: &InputEvent) {
        match event {
            InputEvent::KeyDown(key) => {
                self.keyboard.press(*key);
            }
            InputEvent::KeyUp(key) => {
                self.keyboard.release(*key);
            }
            InputEvent::MouseDown(button) => {
                self.buttons.set(*button, true);
                if *button == self.orbit_button {
                    self.pointer.push(PointerEvent::Grab);
                }
            }
            InputEvent::MouseUp(button) => {
                self.buttons.set(*button, false);
                if *button == self.orbit_button {
                    self.pointer.push(PointerEvent::Release);
                }
            }
            InputEvent::MouseMove(delta) => {
                if self.buttons.is_pressed(self.orbit_button) {
                    self.drag.push(*delta);
                }
            }
            InputEvent::Wheel(delta) => {
                if let Some(direction) = WheelDirection::from_delta(*delta) {
                    self.pointer.push(PointerEvent::Zoom(direction));
                }
            }
            InputEvent::FocusLost => {
                self.keyboard.clear();
            }
            InputEvent::DialogueClosed(npc) => {
                self.dismissed.push(npc.clone());
            }
            InputEvent::Resized { .. } => {}
        }
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.bindings.is_active(&self.keyboard, action)
    }

    pub fn move_intent(&self) -> MoveIntent {
        MoveIntent {
            forward: self.is_held(Action::Forward),
            backward: self.is_held(Action::Backward),
            left: self.is_held(Action::StrafeLeft),
            right: self.is_held(Action::StrafeRight),
            rotate_left: self.is_held(Action::RotateLeft),
            rotate_right: self.is_held(Action::RotateRight),
        }
    }

    pub fn interact_held(&self) -> bool {
        self.is_held(Action::Interact)
    }

    /// Pending camera pointer events, oldest first
    pub fn take_pointer_events(&mut self) -> Vec<PointerEvent> {
        std::mem::take(&mut self.pointer)
    }

    /// Drag accumulated since the last call
    pub fn take_drag(&mut self) -> Vec2 {
        self.drag.take()
    }

    /// NPC ids whose dialogue was dismissed since the last call
    pub fn take_dismissed(&mut self) -> Vec<String> {
        std::mem::take(&mut self.dismissed)
    }

    pub fn bindings(&self) -> &KeyMap<Action> {
        &self.bindings
    }
}
