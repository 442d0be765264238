use std::collections::HashSet;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Identifier for a physical keyboard key.
///
/// Only the keys the viewer reacts to are modelled: letters for camera and
/// light movement, digits for technique selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    Character(char),
    Digit(u8),
}

impl KeyCode {
    pub fn from_name(name: &str) -> Option<Self> {
        if name.len() != 1 {
            return None;
        }
        let ch = name.chars().next().unwrap();
        if ch.is_ascii_alphabetic() {
            return Some(Self::Character(ch.to_ascii_uppercase()));
        }
        if ch.is_ascii_digit() {
            return Some(Self::Digit(ch as u8 - b'0'));
        }
        None
    }
}

/// Pressed/held key snapshot polled once per frame by the update step.
#[derive(Debug, Default)]
pub struct InputState {
    keys: RwLock<HashSet<KeyCode>>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_key_down(&self, key: KeyCode) {
        self.keys.write().insert(key);
    }

    pub fn set_key_up(&self, key: KeyCode) {
        self.keys.write().remove(&key);
    }

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys.read().contains(&key)
    }

    /// Returns the lowest held digit key, if any.
    ///
    /// Digit presses are discrete selections, so one winner per frame is
    /// enough even if several digits are held at once.
    pub fn held_digit(&self) -> Option<u8> {
        self.keys
            .read()
            .iter()
            .filter_map(|key| match key {
                KeyCode::Digit(digit) => Some(*digit),
                KeyCode::Character(_) => None,
            })
            .min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_letters_and_digits() {
        assert_eq!(KeyCode::from_name("w"), Some(KeyCode::Character('W')));
        assert_eq!(KeyCode::from_name("L"), Some(KeyCode::Character('L')));
        assert_eq!(KeyCode::from_name("4"), Some(KeyCode::Digit(4)));
        assert_eq!(KeyCode::from_name("F1"), None);
        assert_eq!(KeyCode::from_name(""), None);
    }

    #[test]
    fn tracks_held_keys() {
        let state = InputState::new();
        state.set_key_down(KeyCode::Character('W'));
        assert!(state.is_key_down(KeyCode::Character('W')));
        state.set_key_up(KeyCode::Character('W'));
        assert!(!state.is_key_down(KeyCode::Character('W')));
    }

    #[test]
    fn lowest_held_digit_wins() {
        let state = InputState::new();
        assert_eq!(state.held_digit(), None);
        state.set_key_down(KeyCode::Digit(5));
        state.set_key_down(KeyCode::Digit(2));
        assert_eq!(state.held_digit(), Some(2));
    }
}
