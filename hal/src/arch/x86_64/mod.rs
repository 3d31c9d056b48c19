//! # x86_64 Architecture HAL Implementation
//!
//! CPU interrupt masking, port I/O, the 8259 PIC and the PS/2 keyboard
//! controller data port.

pub mod cpu;
pub mod pic;
pub mod port;
pub mod ps2;

pub use cpu::Cpu;
