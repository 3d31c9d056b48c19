//! # Held Key Tracking
//!
//! A minimal legacy handler that only remembers which game keys are down.
//! Movement and firing themselves are the game's business.

use crate::config::KeyMap;
use crate::dispatch::LegacyHandler;
use crate::scancode::{GameKey, KeyTransition, Scancode};
use bitflags::bitflags;

bitflags! {
    /// Game keys currently held
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct HeldKeys: u8 {
        /// Left
        const LEFT = 1 << 0;
        /// Right
        const RIGHT = 1 << 1;
        /// Up
        const UP = 1 << 2;
        /// Down
        const DOWN = 1 << 3;
        /// Fire
        const FIRE = 1 << 4;
    }
}

impl HeldKeys {
    /// Flag for a single key
    pub const fn for_key(key: GameKey) -> Self {
        match key {
            GameKey::Left => Self::LEFT,
            GameKey::Right => Self::RIGHT,
            GameKey::Up => Self::UP,
            GameKey::Down => Self::DOWN,
            GameKey::Fire => Self::FIRE,
        }
    }
}

/// Legacy handler tracking held game keys
#[derive(Debug, Clone)]
pub struct KeyTracker {
    key_map: KeyMap,
    held: HeldKeys,
    transitions: u32,
}

impl KeyTracker {
    /// Create a tracker with nothing held
    pub const fn new(key_map: KeyMap) -> Self {
        Self {
            key_map,
            held: HeldKeys::empty(),
            transitions: 0,
        }
    }

    /// Keys currently held
    pub fn held(&self) -> HeldKeys {
        self.held
    }

    /// Check if a key is held
    pub fn is_held(&self, key: GameKey) -> bool {
        self.held.contains(HeldKeys::for_key(key))
    }

    /// Number of transitions applied
    pub fn transitions(&self) -> u32 {
        self.transitions
    }

    /// Apply a decoded transition
    pub fn apply(&mut self, transition: KeyTransition) {
        self.held
            .set(HeldKeys::for_key(transition.key), transition.pressed);
        self.transitions += 1;
    }
}

impl Default for KeyTracker {
    fn default() -> Self {
        Self::new(KeyMap::DEFAULT)
    }
}

impl LegacyHandler for KeyTracker {
    fn handle(&mut self, code: Scancode) {
        if let Some(transition) = self.key_map.decode(code) {
            self.apply(transition);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_and_release() {
        let mut tracker = KeyTracker::default();
        tracker.handle(Scancode::new(0x4B));
        tracker.handle(Scancode::new(0x48));
        assert_eq!(tracker.held(), HeldKeys::LEFT | HeldKeys::UP);

        tracker.handle(Scancode::new(0xCB));
        assert!(!tracker.is_held(GameKey::Left));
        assert!(tracker.is_held(GameKey::Up));
        assert_eq!(tracker.transitions(), 3);
    }

    #[test]
    fn test_ignores_other_codes() {
        let mut tracker = KeyTracker::default();
        tracker.handle(Scancode::new(0x1E));
        tracker.handle(Scancode::NONE);
        assert_eq!(tracker.held(), HeldKeys::empty());
        assert_eq!(tracker.transitions(), 0);
    }

    #[test]
    fn test_repeat_make_is_idempotent() {
        let mut tracker = KeyTracker::default();
        tracker.handle(Scancode::new(0x39));
        tracker.handle(Scancode::new(0x39));
        assert_eq!(tracker.held(), HeldKeys::FIRE);
    }
}
