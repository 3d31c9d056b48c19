//! # Input Configuration

use crate::scancode::{GameKey, KeyTransition, Scancode};
use crate::{InputError, InputResult};
use heapless::Vec;

/// Number of relevant codes (make and break for every game key)
pub const RELEVANT_CODES: usize = GameKey::ALL.len() * 2;

/// Make codes of the game keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyMap {
    /// Move left
    pub left: Scancode,
    /// Move right
    pub right: Scancode,
    /// Move up
    pub up: Scancode,
    /// Move down
    pub down: Scancode,
    /// Fire
    pub fire: Scancode,
}

impl KeyMap {
    /// Cursor keys plus space bar
    pub const DEFAULT: Self = Self {
        left: GameKey::Left.default_make(),
        right: GameKey::Right.default_make(),
        up: GameKey::Up.default_make(),
        down: GameKey::Down.default_make(),
        fire: GameKey::Fire.default_make(),
    };

    /// Make code bound to a key
    pub const fn make_code(&self, key: GameKey) -> Scancode {
        match key {
            GameKey::Left => self.left,
            GameKey::Right => self.right,
            GameKey::Up => self.up,
            GameKey::Down => self.down,
            GameKey::Fire => self.fire,
        }
    }

    /// Check that every key has a distinct, usable make code
    pub fn validate(&self) -> InputResult<()> {
        for (i, &key) in GameKey::ALL.iter().enumerate() {
            let code = self.make_code(key);
            if code.is_none() || code.is_break() {
                return Err(InputError::ReservedCode(code));
            }
            if GameKey::ALL[..i].iter().any(|&other| self.make_code(other) == code) {
                return Err(InputError::DuplicateKey(code));
            }
        }
        Ok(())
    }

    /// Decode a scancode into a game key transition
    ///
    /// Returns `None` for every code that is not the make or break code of
    /// a game key.
    pub fn decode(&self, code: Scancode) -> Option<KeyTransition> {
        let make = code.make_code();
        GameKey::ALL
            .iter()
            .copied()
            .find(|&key| self.make_code(key) == make)
            .map(|key| KeyTransition {
                key,
                pressed: !code.is_break(),
            })
    }

    /// Is this code one the game reacts to?
    #[inline]
    pub fn is_relevant(&self, code: Scancode) -> bool {
        self.decode(code).is_some()
    }

    /// All relevant codes: make codes first, then break codes
    pub fn relevant_codes(&self) -> Vec<Scancode, RELEVANT_CODES> {
        let mut codes = Vec::new();
        for key in GameKey::ALL {
            // Capacity is exactly two per key
            let _ = codes.push(self.make_code(key));
        }
        for key in GameKey::ALL {
            let _ = codes.push(self.make_code(key).to_break());
        }
        codes
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Configuration for a keyboard buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferConfig {
    /// Codes forwarded to the legacy handler
    pub key_map: KeyMap,
    /// Emit a warning each time the queue overflows
    pub log_overflow: bool,
}

impl BufferConfig {
    /// Default keys, overflow warnings on
    pub const DEFAULT: Self = Self {
        key_map: KeyMap::DEFAULT,
        log_overflow: true,
    };

    /// Create default configuration
    pub const fn new() -> Self {
        Self::DEFAULT
    }

    /// Same as default, without overflow warnings
    pub const fn quiet() -> Self {
        Self {
            log_overflow: false,
            ..Self::DEFAULT
        }
    }
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self::new()
    }
}
