//! # Dispatcher
//!
//! Drains pending scancodes and forwards the ones the game cares about to
//! the legacy key handler. Everything else is dropped on the floor rather
//! than kept for later.

use crate::config::KeyMap;
use crate::queue::EventQueue;
use crate::scancode::{KeyTransition, Scancode};
use core::ops::AddAssign;

/// Consumer of relevant scancodes
///
/// Receives codes in arrival order, zero or more times per drain. It must
/// not call back into the keyboard buffer.
pub trait LegacyHandler {
    /// Apply one scancode to game state
    fn handle(&mut self, code: Scancode);
}

impl<F: FnMut(Scancode)> LegacyHandler for F {
    fn handle(&mut self, code: Scancode) {
        self(code)
    }
}

/// Raw legacy key handler entry point
#[derive(Debug, Clone, Copy)]
pub struct LegacyEntry(pub extern "C" fn(u8));

impl LegacyHandler for LegacyEntry {
    #[inline]
    fn handle(&mut self, code: Scancode) {
        (self.0)(code.as_u8())
    }
}

/// What the dispatcher does with a code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Pass to the legacy handler
    Forward(KeyTransition),
    /// Drop it
    Discard,
}

/// Outcome of one drain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrainReport {
    /// Codes passed to the legacy handler
    pub forwarded: usize,
    /// Codes dropped as irrelevant
    pub discarded: usize,
}

impl DrainReport {
    /// Total events removed from the queue
    pub fn total(&self) -> usize {
        self.forwarded + self.discarded
    }
}

impl AddAssign for DrainReport {
    fn add_assign(&mut self, other: Self) {
        self.forwarded += other.forwarded;
        self.discarded += other.discarded;
    }
}

/// Relevance filter in front of the legacy handler
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher {
    key_map: KeyMap,
}

impl Dispatcher {
    /// Create a dispatcher for a key map
    pub const fn new(key_map: KeyMap) -> Self {
        Self { key_map }
    }

    /// Key map in use
    pub fn key_map(&self) -> &KeyMap {
        &self.key_map
    }

    /// Decide what to do with a code
    pub fn classify(&self, code: Scancode) -> Verdict {
        match self.key_map.decode(code) {
            Some(transition) => Verdict::Forward(transition),
            None => Verdict::Discard,
        }
    }

    /// Drain events supplied by `next` until it reports empty
    ///
    /// `next` removes one pending event per call. The handler is invoked
    /// between calls, so a caller that locks inside `next` never holds the
    /// lock across the handler.
    pub fn drain_with<N, H>(&self, mut next: N, handler: &mut H) -> DrainReport
    where
        N: FnMut() -> Option<Scancode>,
        H: LegacyHandler + ?Sized,
    {
        let mut report = DrainReport::default();
        while let Some(code) = next() {
            match self.classify(code) {
                Verdict::Forward(transition) => {
                    log::trace!(
                        "forward {} ({} {})",
                        code,
                        transition.key.name(),
                        if transition.pressed { "make" } else { "break" }
                    );
                    handler.handle(code);
                    report.forwarded += 1;
                }
                Verdict::Discard => report.discarded += 1,
            }
        }
        report
    }

    /// Drain a queue the caller owns exclusively
    pub fn drain<H>(&self, queue: &mut EventQueue, handler: &mut H) -> DrainReport
    where
        H: LegacyHandler + ?Sized,
    {
        self.drain_with(|| queue.take_next(), handler)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(KeyMap::DEFAULT)
    }
}
