//! # Port I/O

use core::arch::asm;

/// Write a byte to an I/O port
///
/// # Safety
/// Writing to an arbitrary port can reconfigure hardware.
#[inline]
pub unsafe fn outb(port: u16, value: u8) {
    unsafe {
        asm!(
            "out dx, al",
            in("dx") port,
            in("al") value,
            options(nomem, nostack, preserves_flags)
        );
    }
}

/// Read a byte from an I/O port
///
/// # Safety
/// Reading some ports has side effects (e.g. popping a device FIFO).
#[inline]
pub unsafe fn inb(port: u16) -> u8 {
    let value: u8;
    unsafe {
        asm!(
            "in al, dx",
            in("dx") port,
            out("al") value,
            options(nomem, nostack, preserves_flags)
        );
    }
    value
}
