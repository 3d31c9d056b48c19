//! # Architecture-Specific HAL Modules
//!
//! This module re-exports the appropriate HAL implementation
//! based on the target architecture.

#[cfg(target_arch = "x86_64")]
pub mod x86_64;

// Re-export the current architecture's HAL
#[cfg(target_arch = "x86_64")]
pub use x86_64 as current;
