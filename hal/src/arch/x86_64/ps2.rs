//! # PS/2 Keyboard Controller
//!
//! Raw scancode access through the 8042 data port.

use super::port::inb;
use crate::{HalError, HalResult};

/// Data port (scancode read)
const DATA_PORT: u16 = 0x60;
/// Status port
const STATUS_PORT: u16 = 0x64;
/// Status bit: output buffer full
const STATUS_OUTPUT_FULL: u8 = 0x01;

/// Read the pending scancode
///
/// Returns [`HalError::NotReady`] if the controller has nothing buffered,
/// which happens on spurious keyboard IRQs.
pub fn read_scancode() -> HalResult<u8> {
    let status = unsafe { inb(STATUS_PORT) };
    if status & STATUS_OUTPUT_FULL == 0 {
        return Err(HalError::NotReady);
    }
    Ok(unsafe { inb(DATA_PORT) })
}
