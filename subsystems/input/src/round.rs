//! # Round Lifecycle Hook
//!
//! While the round number is on screen the game stops polling. Events that
//! arrive then would sit in the queue and be replayed as a stale burst once
//! play resumes, so the display phase runs in immediate mode instead:
//!
//! | Mode      | Entered by                 | Left by          |
//! |-----------|----------------------------|------------------|
//! | Deferred  | reset, first dequeue       | phase start      |
//! | Immediate | phase start                | any dequeue      |
//!
//! There is no "phase ended" signal. The first dequeue after polling
//! resumes is what switches back to deferred mode.

use crate::buffer::KeyboardBuffer;
use crate::dispatch::{DrainReport, LegacyHandler};
use crate::queue::DeliveryMode;
use keybuf_hal::interrupts::InterruptMask;

/// Signals from the round controller
pub trait RoundLifecycle {
    /// A display phase is starting and polling stops until it ends
    ///
    /// Flushes everything pending to the legacy handler, then arms
    /// immediate delivery. Returns what the flush did.
    fn on_phase_start(&self) -> DrainReport;
}

impl<M: InterruptMask, H: LegacyHandler> RoundLifecycle for KeyboardBuffer<M, H> {
    fn on_phase_start(&self) -> DrainReport {
        let mut report = self.drain();

        // Anything that slipped in after the flush but before the mode
        // switch would otherwise wait for the next key.
        if self.arm(DeliveryMode::Immediate) {
            report += self.drain();
        }

        self.record_phase_start();
        log::debug!(
            "display phase started: flushed {} ({} forwarded), immediate delivery armed",
            report.total(),
            report.forwarded
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BufferConfig;
    use crate::held::{HeldKeys, KeyTracker};
    use crate::scancode::{GameKey, Scancode};
    use keybuf_hal::interrupts::HostMask;
    use std::vec::Vec;

    fn tracker_buffer() -> KeyboardBuffer<HostMask, KeyTracker> {
        let buffer = KeyboardBuffer::new(HostMask::new(), KeyTracker::default(), BufferConfig::quiet());
        buffer.reset();
        buffer
    }

    #[test]
    fn test_phase_start_flushes_pending() {
        let mut seen = Vec::new();
        {
            let buffer = KeyboardBuffer::new(
                HostMask::new(),
                |code: Scancode| seen.push(code.as_u8()),
                BufferConfig::quiet(),
            );
            buffer.reset();
            buffer.enqueue(Scancode::new(0x48));
            buffer.enqueue(Scancode::new(0x39));
            buffer.enqueue(Scancode::new(0xC8));

            let report = buffer.on_phase_start();
            assert_eq!(report.forwarded, 3);
            assert!(buffer.is_empty());
            assert_eq!(buffer.mode(), DeliveryMode::Immediate);
            assert_eq!(buffer.stats().phase_starts, 1);
        }
        assert_eq!(seen, [0x48, 0x39, 0xC8]);
    }

    #[test]
    fn test_phase_start_filters_flush() {
        let buffer = tracker_buffer();
        buffer.enqueue(Scancode::new(0x4D));
        buffer.enqueue(Scancode::new(0x1E));
        buffer.enqueue(Scancode::new(0x9E));

        let report = buffer.on_phase_start();
        assert_eq!(report.forwarded, 1);
        assert_eq!(report.discarded, 2);
        assert!(buffer.with_handler(|t| t.is_held(GameKey::Right)));
    }

    #[test]
    fn test_release_during_display_applies_at_once() {
        let buffer = tracker_buffer();

        // Fire held going into the round message
        buffer.enqueue(GameKey::Fire.default_make());
        buffer.on_phase_start();
        assert_eq!(buffer.with_handler(|t| t.held()), HeldKeys::FIRE);

        // Released while the game is not polling
        buffer.enqueue(GameKey::Fire.default_make().to_break());
        assert_eq!(buffer.with_handler(|t| t.held()), HeldKeys::empty());

        // A press-release pair during the phase leaves nothing stuck
        buffer.enqueue(GameKey::Left.default_make());
        buffer.enqueue(GameKey::Left.default_make().to_break());
        assert_eq!(buffer.with_handler(|t| t.held()), HeldKeys::empty());
        assert_eq!(buffer.with_handler(|t| t.transitions()), 4);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_polling_resumes_deferred() {
        let buffer = tracker_buffer();
        buffer.on_phase_start();
        assert_eq!(buffer.mode(), DeliveryMode::Immediate);

        // Queries do not end the phase
        assert!(buffer.is_empty());
        assert_eq!(buffer.len(), 0);
        assert_eq!(buffer.mode(), DeliveryMode::Immediate);

        buffer.dequeue();
        assert_eq!(buffer.mode(), DeliveryMode::Deferred);

        buffer.enqueue(GameKey::Down.default_make());
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.with_handler(|t| t.held()), HeldKeys::empty());
        assert_eq!(buffer.dequeue(), GameKey::Down.default_make());
    }

    #[test]
    fn test_phase_start_on_empty_queue() {
        let buffer = tracker_buffer();
        let report = buffer.on_phase_start();
        assert_eq!(report, DrainReport::default());
        assert_eq!(buffer.mode(), DeliveryMode::Immediate);
    }
}
