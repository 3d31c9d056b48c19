//! # CPU Control
//!
//! Interrupt flag control for x86_64.

use core::arch::asm;
use crate::interrupts::InterruptMask;

/// Interrupt flag (IF) in RFLAGS
const RFLAGS_IF: u64 = 1 << 9;

/// Disable interrupts (CLI)
///
/// # Safety
/// Disabling interrupts can cause the system to hang if not re-enabled.
#[inline]
pub unsafe fn disable_interrupts() {
    unsafe { asm!("cli", options(nomem, nostack, preserves_flags)); }
}

/// Enable interrupts (STI)
///
/// # Safety
/// Interrupts should only be enabled when the system is ready to handle them.
#[inline]
pub unsafe fn enable_interrupts() {
    unsafe { asm!("sti", options(nomem, nostack, preserves_flags)); }
}

/// Check if interrupts are enabled
#[inline]
pub fn are_interrupts_enabled() -> bool {
    let flags: u64;
    unsafe {
        asm!("pushfq; pop {}", out(reg) flags, options(nomem, preserves_flags));
    }
    (flags & RFLAGS_IF) != 0
}

/// The executing processor, as an interrupt mask
///
/// Only usable at CPL 0; `cli`/`sti` fault in user mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cpu;

impl Cpu {
    /// Create a handle to the executing processor
    pub const fn new() -> Self {
        Self
    }
}

impl InterruptMask for Cpu {
    #[inline]
    fn disable(&self) -> bool {
        let were_enabled = are_interrupts_enabled();
        if were_enabled {
            unsafe { disable_interrupts(); }
        }
        were_enabled
    }

    #[inline]
    fn restore(&self, was_enabled: bool) {
        if was_enabled {
            unsafe { enable_interrupts(); }
        }
    }

    #[inline]
    fn are_enabled(&self) -> bool {
        are_interrupts_enabled()
    }
}
