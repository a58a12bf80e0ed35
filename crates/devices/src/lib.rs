//! Input device abstractions for the abbey walk
//!
//! This crate provides platform-agnostic input primitives. Window backends map
//! their native events onto these types; game code maps them onto logical
//! actions through a [`KeyMap`].
//!
//! # Modules
//!
//! - [`keyboard`]: Key codes, key-name parsing and held-key tracking
//! - [`binding`]: Key-to-action binding tables
//! - [`mouse`]: Mouse buttons, wheel direction and drag accumulation

pub mod binding;
pub mod keyboard;
pub mod mouse;

// Re-export commonly used types at crate root
pub use binding::KeyMap;
pub use keyboard::{Key, KeyParseError, KeyboardState};
pub use mouse::{DragAccumulator, MouseButtonType, MouseButtons, WheelDirection};
