//! # Scancodes
//!
//! Set 1 scancodes as delivered by the keyboard controller. The queue treats
//! them as opaque bytes; only the dispatcher cares which key they name.

use core::fmt;
use static_assertions::assert_eq_size;

/// Raw keyboard scancode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Scancode(u8);

assert_eq_size!(Scancode, u8);

impl Scancode {
    /// Reserved "no event" code, returned before anything was ever queued
    pub const NONE: Self = Self(0x00);

    /// Bit set on break (release) codes
    pub const BREAK_BIT: u8 = 0x80;

    /// Wrap a raw scancode
    #[inline]
    pub const fn new(raw: u8) -> Self {
        Self(raw)
    }

    /// Get the raw byte
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    /// Is this the sentinel code?
    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == Self::NONE.0
    }

    /// Is this a break (key release) code?
    #[inline]
    pub const fn is_break(self) -> bool {
        self.0 & Self::BREAK_BIT != 0
    }

    /// The make code for the same key
    #[inline]
    pub const fn make_code(self) -> Self {
        Self(self.0 & !Self::BREAK_BIT)
    }

    /// The break code for the same key
    #[inline]
    pub const fn to_break(self) -> Self {
        Self(self.0 | Self::BREAK_BIT)
    }
}

impl From<u8> for Scancode {
    fn from(raw: u8) -> Self {
        Self(raw)
    }
}

impl From<Scancode> for u8 {
    fn from(code: Scancode) -> Self {
        code.0
    }
}

impl fmt::Display for Scancode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X}", self.0)
    }
}

/// Keys the game reacts to
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKey {
    /// Cursor left
    Left = 0x4B,
    /// Cursor right
    Right = 0x4D,
    /// Cursor up
    Up = 0x48,
    /// Cursor down
    Down = 0x50,
    /// Fire (space bar)
    Fire = 0x39,
}

impl GameKey {
    /// All game keys, in key map order
    pub const ALL: [GameKey; 5] = [
        GameKey::Left,
        GameKey::Right,
        GameKey::Up,
        GameKey::Down,
        GameKey::Fire,
    ];

    /// Default make code of this key
    #[inline]
    pub const fn default_make(self) -> Scancode {
        Scancode(self as u8)
    }

    /// Get a human-readable name
    pub const fn name(self) -> &'static str {
        match self {
            GameKey::Left => "left",
            GameKey::Right => "right",
            GameKey::Up => "up",
            GameKey::Down => "down",
            GameKey::Fire => "fire",
        }
    }
}

/// A decoded press or release of a game key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyTransition {
    /// Which key
    pub key: GameKey,
    /// `true` for make, `false` for break
    pub pressed: bool,
}
