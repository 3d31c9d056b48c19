//! # Fixed Entry Points
//!
//! `extern "C"` functions standing in for the three original call sites
//! (last-scancode store, last-scancode read, round-start hook) plus the
//! one-time initialization store. They all operate on one process-lifetime
//! buffer installed with [`install`].
//!
//! Before installation the entry points behave like an empty, freshly reset
//! queue: stores are dropped and reads return the sentinel.

use crate::buffer::KeyboardBuffer;
use crate::config::BufferConfig;
use crate::dispatch::LegacyEntry;
use crate::queue::EventQueue;
use crate::round::RoundLifecycle;
use crate::scancode::Scancode;
use crate::{InputError, InputResult};
use spin::Once;

#[cfg(all(target_arch = "x86_64", target_os = "none"))]
type ArchMask = keybuf_hal::arch::x86_64::Cpu;

#[cfg(not(all(target_arch = "x86_64", target_os = "none")))]
type ArchMask = keybuf_hal::interrupts::HostMask;

/// Buffer type behind the entry points
pub type GlobalBuffer = KeyboardBuffer<ArchMask, LegacyEntry>;

/// Size of the queue's variable region
pub const VARS_SIZE: usize = core::mem::size_of::<EventQueue>();

static BUFFER: Once<GlobalBuffer> = Once::new();

/// Install the global buffer with the default configuration
pub fn install(legacy_handler: extern "C" fn(u8)) -> InputResult<&'static GlobalBuffer> {
    install_with_config(legacy_handler, BufferConfig::DEFAULT)
}

/// Install the global buffer
///
/// Can only succeed once per process.
pub fn install_with_config(
    legacy_handler: extern "C" fn(u8),
    config: BufferConfig,
) -> InputResult<&'static GlobalBuffer> {
    config.key_map.validate()?;

    let mut created = false;
    let buffer = BUFFER.call_once(|| {
        created = true;
        KeyboardBuffer::new(ArchMask::new(), LegacyEntry(legacy_handler), config)
    });
    if !created {
        return Err(InputError::AlreadyInstalled);
    }

    log::info!("keyboard buffer installed ({} bytes of queue state)", VARS_SIZE);
    Ok(buffer)
}

/// The installed buffer, if any
#[inline]
pub fn installed() -> Option<&'static GlobalBuffer> {
    BUFFER.get()
}

/// Replaces the initial `last_scancode = 0` store
#[no_mangle]
pub extern "C" fn keybuf_reset_buffer() -> u8 {
    installed()
        .map_or(Scancode::NONE, |buffer| buffer.reset())
        .as_u8()
}

/// Replaces the keyboard interrupt's `last_scancode` store
#[no_mangle]
pub extern "C" fn keybuf_put_scancode(code: u8) {
    if let Some(buffer) = installed() {
        buffer.enqueue(Scancode::new(code));
    }
}

/// Replaces every `last_scancode` read in the game loop
#[no_mangle]
pub extern "C" fn keybuf_get_scancode() -> u8 {
    installed()
        .map_or(Scancode::NONE, |buffer| buffer.dequeue())
        .as_u8()
}

/// Called just before the round number message is shown
#[no_mangle]
pub extern "C" fn keybuf_on_round_start() {
    if let Some(buffer) = installed() {
        buffer.on_phase_start();
    }
}

/// Keyboard interrupt handler (IRQ 1)
///
/// Reads the scancode from the controller, queues it, then acknowledges the
/// interrupt. In immediate mode the legacy handler runs before the EOI.
#[cfg(all(target_arch = "x86_64", target_os = "none"))]
#[no_mangle]
pub extern "C" fn keybuf_keyboard_irq() {
    use keybuf_hal::arch::x86_64::{pic, ps2};

    match ps2::read_scancode() {
        Ok(code) => keybuf_put_scancode(code),
        Err(err) => log::trace!("keyboard IRQ without data: {}", err),
    }

    pic::end_of_interrupt(pic::Irq::Keyboard);
}

/// Unmask the keyboard IRQ line
///
/// # Safety
/// The IDT entry for IRQ 1 must already point at a stub that calls
/// [`keybuf_keyboard_irq`].
#[cfg(all(target_arch = "x86_64", target_os = "none"))]
pub unsafe fn enable_keyboard_irq() {
    keybuf_hal::arch::x86_64::pic::enable_irq(keybuf_hal::arch::x86_64::pic::Irq::Keyboard);
}
