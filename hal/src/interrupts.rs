//! # Interrupt Masking
//!
//! The only synchronization the keyboard buffer needs is the ability to hold
//! off the scancode producer while shared indices are updated. This module
//! defines that capability and a hosted implementation of it.

use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Ability to hold off interrupt delivery on the current processor
pub trait InterruptMask: Sync {
    /// Disable interrupt delivery
    ///
    /// Returns whether delivery was enabled before the call, to be handed
    /// back to [`InterruptMask::restore`].
    fn disable(&self) -> bool;

    /// Restore the delivery state returned by a matching [`InterruptMask::disable`]
    fn restore(&self, was_enabled: bool);

    /// Check if interrupt delivery is currently enabled
    fn are_enabled(&self) -> bool;
}

impl<M: InterruptMask + ?Sized> InterruptMask for &M {
    #[inline]
    fn disable(&self) -> bool {
        (**self).disable()
    }

    #[inline]
    fn restore(&self, was_enabled: bool) {
        (**self).restore(was_enabled)
    }

    #[inline]
    fn are_enabled(&self) -> bool {
        (**self).are_enabled()
    }
}

/// RAII guard for a masked region
///
/// Restores the previous delivery state when dropped, so nested critical
/// sections only re-enable delivery at the outermost level.
#[must_use = "interrupts are restored as soon as the guard is dropped"]
#[derive(Debug)]
pub struct MaskGuard<'a, M: InterruptMask + ?Sized> {
    mask: &'a M,
    was_enabled: bool,
}

impl<'a, M: InterruptMask + ?Sized> MaskGuard<'a, M> {
    /// Disable interrupts until the guard is dropped
    pub fn new(mask: &'a M) -> Self {
        let was_enabled = mask.disable();
        Self { mask, was_enabled }
    }
}

impl<M: InterruptMask + ?Sized> Drop for MaskGuard<'_, M> {
    fn drop(&mut self) {
        self.mask.restore(self.was_enabled);
    }
}

/// Execute with interrupts disabled
///
/// Disables interrupts, executes the closure, and restores the previous state.
#[inline]
pub fn without_interrupts<M, F, R>(mask: &M, f: F) -> R
where
    M: InterruptMask + ?Sized,
    F: FnOnce() -> R,
{
    let _guard = MaskGuard::new(mask);
    f()
}

/// Interrupt mask for hosted builds
///
/// There is no interrupt source to hold off, so this only tracks the
/// logical delivery state along with how many critical sections were
/// entered and how deeply they are currently nested.
#[derive(Debug)]
pub struct HostMask {
    enabled: AtomicBool,
    sections: AtomicUsize,
    depth: AtomicUsize,
}

impl HostMask {
    /// Create a mask with delivery enabled
    pub const fn new() -> Self {
        Self {
            enabled: AtomicBool::new(true),
            sections: AtomicUsize::new(0),
            depth: AtomicUsize::new(0),
        }
    }

    /// Total number of critical sections entered
    pub fn sections(&self) -> usize {
        self.sections.load(Ordering::Relaxed)
    }

    /// Number of critical sections currently open
    pub fn depth(&self) -> usize {
        self.depth.load(Ordering::Relaxed)
    }
}

impl Default for HostMask {
    fn default() -> Self {
        Self::new()
    }
}

impl InterruptMask for HostMask {
    fn disable(&self) -> bool {
        self.sections.fetch_add(1, Ordering::Relaxed);
        self.depth.fetch_add(1, Ordering::Relaxed);
        self.enabled.swap(false, Ordering::AcqRel)
    }

    fn restore(&self, was_enabled: bool) {
        self.depth.fetch_sub(1, Ordering::Relaxed);
        if was_enabled {
            self.enabled.store(true, Ordering::Release);
        }
    }

    fn are_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }
}
