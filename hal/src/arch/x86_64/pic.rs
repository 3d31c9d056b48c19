//! # 8259 Programmable Interrupt Controller (PIC)
//!
//! Only acknowledgement and masking are needed here; remapping belongs to
//! whoever owns the IDT.

use super::port::{inb, outb};

/// PIC I/O ports
mod ports {
    /// Master PIC command port
    pub const MASTER_CMD: u16 = 0x20;
    /// Master PIC data port
    pub const MASTER_DATA: u16 = 0x21;
    /// Slave PIC command port
    pub const SLAVE_CMD: u16 = 0xA0;
}

/// End of Interrupt
const EOI: u8 = 0x20;

/// IRQ lines on the master PIC that this crate touches
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Irq {
    /// PIT timer
    Timer = 0,
    /// PS/2 keyboard
    Keyboard = 1,
    /// Slave PIC cascade
    Cascade = 2,
    /// RTC (first slave line)
    RtcClock = 8,
}

impl Irq {
    /// Check if this is a slave IRQ (8-15)
    pub const fn is_slave(self) -> bool {
        (self as u8) >= 8
    }
}

/// Send End of Interrupt for an IRQ
pub fn end_of_interrupt(irq: Irq) {
    unsafe {
        if irq.is_slave() {
            outb(ports::SLAVE_CMD, EOI);
        }
        outb(ports::MASTER_CMD, EOI);
    }
}

/// Unmask a master IRQ line
pub fn enable_irq(irq: Irq) {
    debug_assert!(!irq.is_slave());
    let line = irq as u8;
    unsafe {
        let mask = inb(ports::MASTER_DATA);
        outb(ports::MASTER_DATA, mask & !(1 << line));
    }
    log::debug!("IRQ{} enabled", line);
}
