//! # Keyboard Buffer
//!
//! The one shared object between the keyboard interrupt and the poll loop.
//!
//! ## Synchronization
//!
//! The queue sits behind a spin mutex that is only ever taken with the
//! interrupt source masked, so the producer can never spin on a lock held by
//! the code it preempted. The legacy handler sits behind a second mutex that
//! is taken with `try_lock` and never while the queue lock is held. A drain
//! that finds the handler busy returns at once: the owner re-checks the queue
//! after releasing the handler and picks up whatever arrived meanwhile.

use crate::config::BufferConfig;
use crate::dispatch::{Dispatcher, DrainReport, LegacyHandler};
use crate::queue::{DeliveryMode, EventQueue, USABLE_CAPACITY};
use crate::scancode::Scancode;
use crate::stats::{BufferStats, StatsSnapshot};
use crate::InputResult;
use core::fmt;
use keybuf_hal::interrupts::{without_interrupts, InterruptMask};
use spin::Mutex;

/// Interrupt-safe scancode buffer feeding a legacy handler
pub struct KeyboardBuffer<M: InterruptMask, H: LegacyHandler> {
    queue: Mutex<EventQueue>,
    handler: Mutex<H>,
    dispatcher: Dispatcher,
    mask: M,
    stats: BufferStats,
    log_overflow: bool,
}

impl<M: InterruptMask, H: LegacyHandler> KeyboardBuffer<M, H> {
    /// Create a buffer in its reset state
    ///
    /// `const` so the buffer can live in a `static`. The key map is not
    /// validated here; see [`KeyboardBuffer::with_config`].
    pub const fn new(mask: M, handler: H, config: BufferConfig) -> Self {
        Self {
            queue: Mutex::new(EventQueue::new()),
            handler: Mutex::new(handler),
            dispatcher: Dispatcher::new(config.key_map),
            mask,
            stats: BufferStats::new(),
            log_overflow: config.log_overflow,
        }
    }

    /// Create a buffer after validating the key map
    pub fn with_config(mask: M, handler: H, config: BufferConfig) -> InputResult<Self> {
        config.key_map.validate()?;
        Ok(Self::new(mask, handler, config))
    }

    /// Run `f` on the queue with the producer held off
    #[inline]
    fn with_queue<R>(&self, f: impl FnOnce(&mut EventQueue) -> R) -> R {
        without_interrupts(&self.mask, || f(&mut *self.queue.lock()))
    }

    /// Reset the queue to empty, deferred, sentinel in slot 0
    ///
    /// Returns the sentinel code.
    pub fn reset(&self) -> Scancode {
        let sentinel = self.with_queue(EventQueue::reset);
        log::info!("keyboard buffer reset");
        sentinel
    }

    /// Producer side: store one raw scancode
    ///
    /// Called from the keyboard interrupt. In immediate mode the queue is
    /// drained before this returns.
    pub fn enqueue(&self, code: Scancode) {
        let (overflowed, mode) = self.with_queue(|queue| (queue.push(code), queue.mode()));
        self.stats.record_enqueue();

        if overflowed {
            self.stats.record_overflow();
            if self.log_overflow {
                log::warn!(
                    "keyboard buffer overflow at {}, {} pending events lost",
                    code,
                    USABLE_CAPACITY
                );
            }
        }

        if mode == DeliveryMode::Immediate {
            self.drain();
        }
    }

    /// Consumer side: read the next scancode
    ///
    /// Returns the last delivered code again when nothing is pending.
    /// Always leaves the buffer in deferred mode.
    pub fn dequeue(&self) -> Scancode {
        self.with_queue(EventQueue::pop)
    }

    /// Forward every pending relevant event to the legacy handler
    ///
    /// Irrelevant events are dropped. Does not change the delivery mode.
    pub fn drain(&self) -> DrainReport {
        let mut report = DrainReport::default();
        loop {
            let Some(mut handler) = self.handler.try_lock() else {
                // Another drain owns the handler and will pick these up
                break;
            };
            let pass = self
                .dispatcher
                .drain_with(|| self.with_queue(EventQueue::take_next), &mut *handler);
            drop(handler);

            self.stats.record_drain(&pass);
            report += pass;

            if self.is_empty() {
                break;
            }
        }
        report
    }

    /// Set the mode and report whether events are pending, atomically
    pub(crate) fn arm(&self, mode: DeliveryMode) -> bool {
        self.with_queue(|queue| {
            queue.set_mode(mode);
            !queue.is_empty()
        })
    }

    /// Check whether nothing is pending
    pub fn is_empty(&self) -> bool {
        self.with_queue(|queue| queue.is_empty())
    }

    /// Number of pending events
    pub fn len(&self) -> usize {
        self.with_queue(|queue| queue.len())
    }

    /// Current delivery mode
    ///
    /// Querying never changes the mode; only [`KeyboardBuffer::dequeue`]
    /// switches back to deferred.
    pub fn mode(&self) -> DeliveryMode {
        self.with_queue(|queue| queue.mode())
    }

    /// Copy of the queue state
    pub fn queue_snapshot(&self) -> EventQueue {
        self.with_queue(|queue| queue.clone())
    }

    /// Statistics counters
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Run `f` with exclusive access to the legacy handler
    ///
    /// Interrupt-side drains that arrive meanwhile leave their events
    /// queued, and they are forwarded by the next drain.
    pub fn with_handler<R>(&self, f: impl FnOnce(&mut H) -> R) -> R {
        f(&mut *self.handler.lock())
    }

    pub(crate) fn record_phase_start(&self) {
        self.stats.record_phase_start();
    }
}

impl<M: InterruptMask, H: LegacyHandler> fmt::Debug for KeyboardBuffer<M, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyboardBuffer")
            .field("queue", &self.queue)
            .field("dispatcher", &self.dispatcher)
            .field("stats", &self.stats.snapshot())
            .field("log_overflow", &self.log_overflow)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KeyMap;
    use crate::InputError;
    use keybuf_hal::interrupts::HostMask;
    use std::vec::Vec;

    #[derive(Default)]
    struct Recorder(Vec<u8>);

    impl LegacyHandler for Recorder {
        fn handle(&mut self, code: Scancode) {
            self.0.push(code.as_u8());
        }
    }

    fn buffer() -> KeyboardBuffer<HostMask, Recorder> {
        let buffer = KeyboardBuffer::new(HostMask::new(), Recorder::default(), BufferConfig::quiet());
        buffer.reset();
        buffer
    }

    fn forwarded(buffer: &KeyboardBuffer<HostMask, Recorder>) -> Vec<u8> {
        buffer.with_handler(|seen| seen.0.clone())
    }

    #[test]
    fn test_deferred_enqueue_only_stores() {
        let buffer = buffer();
        buffer.enqueue(Scancode::new(0x4B));
        buffer.enqueue(Scancode::new(0x4D));
        assert_eq!(buffer.len(), 2);
        assert!(forwarded(&buffer).is_empty());

        let report = buffer.drain();
        assert_eq!(report, DrainReport { forwarded: 2, discarded: 0 });
        assert_eq!(forwarded(&buffer), [0x4B, 0x4D]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_dequeue_independent_of_handler() {
        let buffer = buffer();
        buffer.enqueue(Scancode::new(0x48));
        assert_eq!(buffer.dequeue(), Scancode::new(0x48));
        assert_eq!(buffer.dequeue(), Scancode::new(0x48));
        assert!(forwarded(&buffer).is_empty());
        assert_eq!(buffer.drain().total(), 0);
    }

    #[test]
    fn test_immediate_forwards_before_return() {
        let buffer = buffer();
        buffer.arm(DeliveryMode::Immediate);

        buffer.enqueue(Scancode::new(0x39));
        assert_eq!(forwarded(&buffer), [0x39]);
        assert!(buffer.is_empty());

        buffer.enqueue(Scancode::new(0x1E));
        assert_eq!(forwarded(&buffer), [0x39]);
        assert!(buffer.is_empty());
        assert_eq!(buffer.mode(), DeliveryMode::Immediate);

        let stats = buffer.stats();
        assert_eq!(stats.forwarded, 1);
        assert_eq!(stats.discarded, 1);
    }

    #[test]
    fn test_dequeue_leaves_immediate_mode() {
        let buffer = buffer();
        buffer.arm(DeliveryMode::Immediate);
        assert_eq!(buffer.dequeue(), Scancode::NONE);
        assert_eq!(buffer.mode(), DeliveryMode::Deferred);

        buffer.enqueue(Scancode::new(0x4B));
        assert!(forwarded(&buffer).is_empty());
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_preempted_drain_defers_to_owner() {
        let buffer = buffer();
        buffer.arm(DeliveryMode::Immediate);

        // An interrupt arriving while the handler is owned elsewhere must
        // not spin on it; the event waits for the owner's next pass.
        buffer.with_handler(|_| {
            buffer.enqueue(Scancode::new(0x50));
        });
        assert_eq!(buffer.len(), 1);

        buffer.drain();
        assert_eq!(forwarded(&buffer), [0x50]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_overflow_counted() {
        let buffer = buffer();
        for raw in 1..=16u8 {
            buffer.enqueue(Scancode::new(raw));
        }
        assert!(buffer.is_empty());
        let stats = buffer.stats();
        assert_eq!(stats.enqueued, 16);
        assert_eq!(stats.overflows, 1);
        assert_eq!(buffer.dequeue(), Scancode::new(16));
    }

    #[test]
    fn test_queue_access_is_masked() {
        let buffer = buffer();
        let before = buffer.mask.sections();
        buffer.enqueue(Scancode::new(0x4B));
        buffer.dequeue();
        assert!(buffer.mask.sections() > before);
        assert_eq!(buffer.mask.depth(), 0);
        assert!(buffer.mask.are_enabled());
    }

    #[test]
    fn test_handler_runs_unmasked() {
        static MASK: HostMask = HostMask::new();
        let buffer = KeyboardBuffer::new(
            &MASK,
            |_: Scancode| assert!(MASK.are_enabled()),
            BufferConfig::quiet(),
        );
        buffer.enqueue(Scancode::new(0x4D));
        assert_eq!(buffer.drain().forwarded, 1);
    }

    #[test]
    fn test_with_config_validates() {
        let config = BufferConfig {
            key_map: KeyMap {
                left: Scancode::new(0x4D),
                ..KeyMap::DEFAULT
            },
            log_overflow: false,
        };
        let noop: fn(Scancode) = |_| {};
        let err = KeyboardBuffer::with_config(HostMask::new(), noop, config).unwrap_err();
        assert_eq!(err, InputError::DuplicateKey(Scancode::new(0x4D)));

        assert!(KeyboardBuffer::with_config(HostMask::new(), noop, BufferConfig::new()).is_ok());
    }

    #[test]
    fn test_debug_output() {
        let buffer = buffer();
        let text = format!("{:?}", buffer);
        assert!(text.starts_with("KeyboardBuffer"));
    }
}
