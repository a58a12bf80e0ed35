//! Keyboard input abstraction
//!
//! Key codes are kept platform-independent. Backends translate their native
//! codes into [`Key`]; configuration files name keys by the strings accepted
//! by [`Key::from_str`].

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A key name that does not correspond to any [`Key`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown key name: {0:?}")]
pub struct KeyParseError(pub String);

/// Platform-independent key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Key {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,

    // Navigation
    Up,
    Down,
    Left,
    Right,

    // Special
    Space,
    Enter,
    Escape,
    Tab,
    ShiftLeft,
    ShiftRight,
}

const LETTERS: [Key; 26] = [
    Key::A,
    Key::B,
    Key::C,
    Key::D,
    Key::E,
    Key::F,
    Key::G,
    Key::H,
    Key::I,
    Key::J,
    Key::K,
    Key::L,
    Key::M,
    Key::N,
    Key::O,
    Key::P,
    Key::Q,
    Key::R,
    Key::S,
    Key::T,
    Key::U,
    Key::V,
    Key::W,
    Key::X,
    Key::Y,
    Key::Z,
];

impl Key {
    /// Key for a letter character, case-insensitive
    pub fn from_letter(ch: char) -> Option<Self> {
        let lower = ch.to_ascii_lowercase();
        if lower.is_ascii_lowercase() {
            Some(LETTERS[(lower as u8 - b'a') as usize])
        } else {
            None
        }
    }

    /// Canonical lowercase name, the inverse of [`Key::from_str`]
    pub fn name(self) -> String {
        match self {
            Key::Up => "up".into(),
            Key::Down => "down".into(),
            Key::Left => "left".into(),
            Key::Right => "right".into(),
            Key::Space => "space".into(),
            Key::Enter => "enter".into(),
            Key::Escape => "escape".into(),
            Key::Tab => "tab".into(),
            Key::ShiftLeft => "shiftleft".into(),
            Key::ShiftRight => "shiftright".into(),
            letter => {
                let index = LETTERS.iter().position(|k| *k == letter).unwrap_or(0);
                ((b'a' + index as u8) as char).to_string()
            }
        }
    }
}

impl FromStr for Key {
    type Err = KeyParseError;

    /// Accepts single letters and DOM-style names (`"ArrowUp"`, `" "`) in any case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        if let (Some(ch), None) = (chars.next(), chars.next()) {
            if ch == ' ' {
                return Ok(Key::Space);
            }
            if let Some(key) = Key::from_letter(ch) {
                return Ok(key);
            }
        }

        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "arrowup" => Ok(Key::Up),
            "down" | "arrowdown" => Ok(Key::Down),
            "left" | "arrowleft" => Ok(Key::Left),
            "right" | "arrowright" => Ok(Key::Right),
            "space" | "spacebar" => Ok(Key::Space),
            "enter" | "return" => Ok(Key::Enter),
            "escape" | "esc" => Ok(Key::Escape),
            "tab" => Ok(Key::Tab),
            "shift" | "shiftleft" => Ok(Key::ShiftLeft),
            "shiftright" => Ok(Key::ShiftRight),
            _ => Err(KeyParseError(s.to_string())),
        }
    }
}

impl TryFrom<String> for Key {
    type Error = KeyParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        key.name()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Keyboard state tracker
///
/// Holds the set of keys currently down. Repeated presses of a held key
/// (OS auto-repeat) are absorbed.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    pressed: HashSet<Key>,
}

impl KeyboardState {
    /// Create a new keyboard state with no keys pressed
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press; returns true if the key was not already down
    pub fn press(&mut self, key: Key) -> bool {
        self.pressed.insert(key)
    }

    /// Record a key release; returns true if the key was down
    pub fn release(&mut self, key: Key) -> bool {
        self.pressed.remove(&key)
    }

    /// Check if a key is currently pressed
    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    /// Iterate over the currently pressed keys
    pub fn pressed_keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.pressed.iter().copied()
    }

    /// Check if any key is currently pressed
    pub fn any_pressed(&self) -> bool {
        !self.pressed.is_empty()
    }

    /// Release every key (e.g. on window focus loss)
    pub fn clear(&mut self) {
        self.pressed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_letters_any_case() {
        assert_eq!("z".parse::<Key>(), Ok(Key::Z));
        assert_eq!("Q".parse::<Key>(), Ok(Key::Q));
        assert_eq!(Key::from_letter('e'), Some(Key::E));
        assert_eq!(Key::from_letter('1'), None);
    }

    #[test]
    fn test_parse_named_keys() {
        assert_eq!("ArrowUp".parse::<Key>(), Ok(Key::Up));
        assert_eq!(" ".parse::<Key>(), Ok(Key::Space));
        assert_eq!("Esc".parse::<Key>(), Ok(Key::Escape));
        assert!("hyper".parse::<Key>().is_err());
    }

    #[test]
    fn test_name_round_trips_through_parse() {
        for key in [Key::A, Key::M, Key::Z, Key::Left, Key::ShiftRight, Key::Space] {
            assert_eq!(key.name().parse::<Key>(), Ok(key));
        }
    }

    #[test]
    fn test_keyboard_state_absorbs_repeat() {
        let mut kb = KeyboardState::new();
        assert!(kb.press(Key::Z));
        assert!(!kb.press(Key::Z));
        assert!(kb.is_pressed(Key::Z));

        assert!(kb.release(Key::Z));
        assert!(!kb.release(Key::Z));
        assert!(!kb.any_pressed());
    }
}
