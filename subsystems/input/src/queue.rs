//! # Event Queue
//!
//! Fixed 16-slot circular buffer of scancodes.
//!
//! `head` is the slot most recently written and `tail` the slot most recently
//! read, so the queue is empty when they are equal and at most
//! [`USABLE_CAPACITY`] events can be pending. A sixteenth unread event makes
//! `head` catch up with `tail`: the queue then looks empty and the older
//! unread events are lost. That lossy overflow is accepted behaviour.
//!
//! Reading an empty queue returns the last delivered code again, which is
//! what a poll loop expecting a "last scancode" variable wants.

use crate::scancode::Scancode;
use static_assertions::const_assert;

/// Number of slots
pub const CAPACITY: usize = 16;

/// Events that can be pending before overflow
pub const USABLE_CAPACITY: usize = CAPACITY - 1;

const INDEX_MASK: usize = CAPACITY - 1;

const_assert!(CAPACITY.is_power_of_two());
const_assert!(USABLE_CAPACITY == 15);

#[inline]
const fn advance(index: usize) -> usize {
    (index + 1) & INDEX_MASK
}

/// How enqueued events reach the legacy handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryMode {
    /// Stored until the consumer polls or something drains the queue
    #[default]
    Deferred,
    /// Drained synchronously on every enqueue
    Immediate,
}

/// Circular scancode queue with its delivery mode
#[derive(Debug, Clone)]
pub struct EventQueue {
    storage: [Scancode; CAPACITY],
    head: usize,
    tail: usize,
    mode: DeliveryMode,
}

impl EventQueue {
    /// Create a queue in its reset state
    pub const fn new() -> Self {
        Self {
            storage: [Scancode::NONE; CAPACITY],
            head: 0,
            tail: 0,
            mode: DeliveryMode::Deferred,
        }
    }

    /// Reset indices and mode, placing the sentinel in slot 0
    ///
    /// Returns the sentinel so callers replacing a "last scancode = 0" store
    /// get a harmless value back.
    pub fn reset(&mut self) -> Scancode {
        self.head = 0;
        self.tail = 0;
        self.mode = DeliveryMode::Deferred;
        self.storage[0] = Scancode::NONE;
        Scancode::NONE
    }

    /// Insert an event after `head`
    ///
    /// Returns `true` if this insertion overflowed the queue, i.e. `head`
    /// caught up with `tail` and every pending event became unreachable.
    pub fn push(&mut self, code: Scancode) -> bool {
        self.head = advance(self.head);
        self.storage[self.head] = code;
        self.head == self.tail
    }

    /// Consumer read
    ///
    /// Always switches the queue back to [`DeliveryMode::Deferred`]. Returns
    /// the next pending event, or repeats the last delivered one if nothing
    /// is pending.
    pub fn pop(&mut self) -> Scancode {
        self.mode = DeliveryMode::Deferred;
        if !self.is_empty() {
            self.tail = advance(self.tail);
        }
        self.storage[self.tail]
    }

    /// Advance past the next pending event without touching the mode
    pub fn take_next(&mut self) -> Option<Scancode> {
        if self.is_empty() {
            return None;
        }
        self.tail = advance(self.tail);
        Some(self.storage[self.tail])
    }

    /// Look at the next pending event
    pub fn peek_next(&self) -> Option<Scancode> {
        if self.is_empty() {
            None
        } else {
            Some(self.storage[advance(self.tail)])
        }
    }

    /// Last delivered (or reset) event
    #[inline]
    pub fn last(&self) -> Scancode {
        self.storage[self.tail]
    }

    /// Check whether nothing is pending
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// Number of pending events (0..=15)
    #[inline]
    pub fn len(&self) -> usize {
        self.head.wrapping_sub(self.tail) & INDEX_MASK
    }

    /// Current delivery mode
    #[inline]
    pub fn mode(&self) -> DeliveryMode {
        self.mode
    }

    /// Set the delivery mode
    #[inline]
    pub fn set_mode(&mut self, mode: DeliveryMode) {
        self.mode = mode;
    }

    /// Slot of the most recent insertion
    #[inline]
    pub fn head(&self) -> usize {
        self.head
    }

    /// Slot of the most recent removal
    #[inline]
    pub fn tail(&self) -> usize {
        self.tail
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}
