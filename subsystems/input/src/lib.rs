//! # keybuf Input Subsystem
//!
//! Buffers keyboard scancodes between the keyboard interrupt and a game loop
//! that only polls when it feels like it.
//!
//! ## Pieces
//! - [`queue::EventQueue`]: 16-slot circular queue plus the delivery mode flag
//! - [`dispatch::Dispatcher`]: drains the queue, forwarding only game keys
//!   to the legacy handler
//! - [`round::RoundLifecycle`]: flushes the queue when a display phase
//!   starts and switches to immediate delivery until polling resumes
//! - [`buffer::KeyboardBuffer`]: the shared object tying these together
//!   behind an interrupt-masked critical section
//! - [`entry`]: fixed `extern "C"` entry points for the original call sites
//!
//! ## Data Flow
//!
//! ```text
//! keyboard IRQ -> enqueue -> EventQueue -> drain -> legacy handler
//!                                  \-> dequeue -> game poll loop
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]

pub mod buffer;
pub mod config;
pub mod dispatch;
pub mod entry;
pub mod held;
pub mod queue;
pub mod round;
pub mod scancode;
pub mod stats;

pub use buffer::KeyboardBuffer;
pub use config::{BufferConfig, KeyMap};
pub use dispatch::{DrainReport, LegacyEntry, LegacyHandler};
pub use queue::{DeliveryMode, EventQueue};
pub use round::RoundLifecycle;
pub use scancode::{GameKey, KeyTransition, Scancode};

use core::fmt;

/// Result type for input subsystem operations
pub type InputResult<T> = Result<T, InputError>;

/// Errors from setting up the input subsystem
///
/// Queue operations themselves never fail; overflow is a counted,
/// logged degradation rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputError {
    /// The global buffer was already installed
    AlreadyInstalled,
    /// Two game keys share the same make code
    DuplicateKey(Scancode),
    /// A key map entry uses the sentinel or a break code
    ReservedCode(Scancode),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::AlreadyInstalled => f.write_str("keyboard buffer already installed"),
            InputError::DuplicateKey(code) => write!(f, "scancode {} mapped to more than one key", code),
            InputError::ReservedCode(code) => write!(f, "scancode {} cannot be used as a make code", code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = InputError::DuplicateKey(Scancode::new(0x4B));
        assert_eq!(format!("{}", err), "scancode 0x4B mapped to more than one key");
        assert_eq!(
            format!("{}", InputError::AlreadyInstalled),
            "keyboard buffer already installed"
        );
    }
}
