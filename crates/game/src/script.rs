//! Scripted input for headless replays
//!
//! A script is a TOML list of steps. Each step injects its input events in a
//! fixed order (placement, key releases, key presses, mouse-button presses,
//! drag, mouse-button releases, wheel, resize, dialogue dismissal) and then
//! runs `ticks` frames. A drag therefore lands while its button is held.
//!
//! ```toml
//! [[steps]]
//! label = "walk to the door"
//! press = ["z"]
//! ticks = 40
//!
//! [[steps]]
//! release = ["z"]
//! press = ["e"]
//! ```

use abbey::InputEvent;
use anyhow::{Context, Result};
use devices::{Key, MouseButtonType};
use glam::{Vec2, Vec3};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// Teleport target for the avatar
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Placement {
    pub position: Vec3,
    #[serde(default)]
    pub yaw: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Step {
    /// Shown in the log when the step starts
    pub label: Option<String>,
    pub place: Option<Placement>,
    pub press: Vec<Key>,
    pub release: Vec<Key>,
    pub mouse_down: Vec<MouseButtonType>,
    pub mouse_up: Vec<MouseButtonType>,
    /// Pointer motion in pixels
    pub drag: Option<Vec2>,
    /// Raw wheel deltas, one event each
    pub wheel: Vec<f32>,
    /// New window size `[width, height]`
    pub resize: Option<[u32; 2]>,
    /// NPC id whose dialogue window is closed
    pub dialogue_closed: Option<String>,
    /// Frames to run after injecting the events
    pub ticks: u32,
}

impl Default for Step {
    fn default() -> Self {
        Self {
            label: None,
            place: None,
            press: Vec::new(),
            release: Vec::new(),
            mouse_down: Vec::new(),
            mouse_up: Vec::new(),
            drag: None,
            wheel: Vec::new(),
            resize: None,
            dialogue_closed: None,
            ticks: 1,
        }
    }
}

impl Step {
    /// Input events for this step, in injection order
    pub fn events(&self) -> Vec<InputEvent> {
        let mut events = Vec::new();
        events.extend(self.release.iter().map(|k| InputEvent::KeyUp(*k)));
        events.extend(self.press.iter().map(|k| InputEvent::KeyDown(*k)));
        events.extend(self.mouse_down.iter().map(|b| InputEvent::MouseDown(*b)));
        events.extend(self.drag.map(InputEvent::MouseMove));
        events.extend(self.mouse_up.iter().map(|b| InputEvent::MouseUp(*b)));
        events.extend(self.wheel.iter().map(|d| InputEvent::Wheel(*d)));
        if let Some([width, height]) = self.resize {
            events.push(InputEvent::Resized { width, height });
        }
        if let Some(npc) = &self.dialogue_closed {
            events.push(InputEvent::DialogueClosed(npc.clone()));
        }
        events
    }
}

impl Script {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse input script")
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        let script = Self::from_toml_str(&text)
            .with_context(|| format!("Invalid script {}", path.display()))?;
        tracing::info!("Loaded {} script steps from {:?}", script.steps.len(), path);
        Ok(script)
    }

    /// Total frames the script asks for
    pub fn total_ticks(&self) -> u64 {
        self.steps.iter().map(|s| u64::from(s.ticks)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_steps() {
        let script = Script::from_toml_str(
            r#"
            [[steps]]
            label = "approach"
            place = { position = [3.0, 0.0, -1.5], yaw = 0.5 }
            ticks = 10

            [[steps]]
            press = ["e", "z"]
            mouse_down = ["right"]
            drag = [12.0, -3.0]
            wheel = [-1.0]
            resize = [800, 600]
            dialogue_closed = "monk"
            "#,
        )
        .unwrap();

        assert_eq!(script.steps.len(), 2);
        assert_eq!(script.total_ticks(), 11);
        let place = script.steps[0].place.unwrap();
        assert_eq!(place.position, Vec3::new(3.0, 0.0, -1.5));
        assert!(script.steps[0].events().is_empty());

        assert_eq!(
            script.steps[1].events(),
            vec![
                InputEvent::KeyDown(Key::E),
                InputEvent::KeyDown(Key::Z),
                InputEvent::MouseDown(MouseButtonType::Right),
                InputEvent::MouseMove(Vec2::new(12.0, -3.0)),
                InputEvent::Wheel(-1.0),
                InputEvent::Resized { width: 800, height: 600 },
                InputEvent::DialogueClosed("monk".into()),
            ]
        );
    }

    #[test]
    fn test_drag_lands_between_button_press_and_release() {
        let script = Script::from_toml_str(
            r#"
            [[steps]]
            mouse_down = ["right"]
            mouse_up = ["right"]
            drag = [5.0, 1.0]
            wheel = [1.0]
            "#,
        )
        .unwrap();
        assert_eq!(
            script.steps[0].events(),
            vec![
                InputEvent::MouseDown(MouseButtonType::Right),
                InputEvent::MouseMove(Vec2::new(5.0, 1.0)),
                InputEvent::MouseUp(MouseButtonType::Right),
                InputEvent::Wheel(1.0),
            ]
        );
    }

    #[test]
    fn test_rejects_unknown_fields_and_keys() {
        assert!(Script::from_toml_str("[[steps]]\npres = [\"z\"]\n").is_err());
        assert!(Script::from_toml_str("[[steps]]\npress = [\"nokey\"]\n").is_err());
    }

    #[test]
    fn test_load_missing_file_has_context() {
        let dir = tempfile::tempdir().unwrap();
        let err = Script::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("absent.toml"));
    }
}
