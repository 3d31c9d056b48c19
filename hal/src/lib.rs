//! # keybuf HAL - Hardware Abstraction Layer
//!
//! The small slice of hardware the keyboard buffer depends on:
//! - **Interrupt masking**: holding off the scancode producer for a critical section
//! - **Keyboard controller**: reading the raw scancode from the PS/2 data port
//! - **Interrupt controller**: acknowledging the keyboard IRQ
//!
//! Everything above this crate is written against [`interrupts::InterruptMask`],
//! so the buffer logic runs unchanged on bare metal and in hosted tests.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]

pub mod interrupts;

// Architecture-specific implementations
pub mod arch;

use core::fmt;

/// Result type for HAL operations
pub type HalResult<T> = Result<T, HalError>;

/// Errors that can occur in HAL operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalError {
    /// The operation is not supported on this architecture
    NotSupported,
    /// The device has no data available
    NotReady,
    /// Hardware reported an error
    HardwareError,
}

impl fmt::Display for HalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HalError::NotSupported => f.write_str("operation not supported on this architecture"),
            HalError::NotReady => f.write_str("device has no data available"),
            HalError::HardwareError => f.write_str("hardware reported an error"),
        }
    }
}
