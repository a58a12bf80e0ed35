//! Key-to-action binding tables

use crate::keyboard::{Key, KeyboardState};
use std::collections::HashMap;
use std::hash::Hash;

/// Maps physical keys onto logical actions
///
/// Several keys may drive the same action; an action is active while any of
/// its keys is held.
#[derive(Debug, Clone)]
pub struct KeyMap<A> {
    bindings: HashMap<Key, A>,
}

impl<A> Default for KeyMap<A> {
    fn default() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }
}

impl<A: Copy + Eq + Hash> KeyMap<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a key, replacing any previous binding of that key
    pub fn bind(&mut self, key: Key, action: A) -> Option<A> {
        self.bindings.insert(key, action)
    }

    /// Builder-style [`KeyMap::bind`]
    pub fn with(mut self, key: Key, action: A) -> Self {
        self.bind(key, action);
        self
    }

    pub fn unbind(&mut self, key: Key) -> Option<A> {
        self.bindings.remove(&key)
    }

    pub fn action_for(&self, key: Key) -> Option<A> {
        self.bindings.get(&key).copied()
    }

    /// Keys bound to `action`, sorted for stable output
    pub fn keys_for(&self, action: A) -> Vec<Key> {
        let mut keys: Vec<Key> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|(k, _)| *k)
            .collect();
        keys.sort();
        keys
    }

    /// Whether any key bound to `action` is currently held
    pub fn is_active(&self, keyboard: &KeyboardState, action: A) -> bool {
        keyboard
            .pressed_keys()
            .any(|key| self.action_for(key) == Some(action))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl<A: Copy + Eq + Hash> FromIterator<(Key, A)> for KeyMap<A> {
    fn from_iter<I: IntoIterator<Item = (Key, A)>>(iter: I) -> Self {
        Self {
            bindings: iter.into_iter().collect(),
        }
    }
}
