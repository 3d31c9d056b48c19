//! # Buffer Statistics

use crate::dispatch::DrainReport;
use core::sync::atomic::{AtomicU64, Ordering};

/// Counters updated from both interrupt and poll context
#[derive(Debug)]
pub struct BufferStats {
    enqueued: AtomicU64,
    forwarded: AtomicU64,
    discarded: AtomicU64,
    overflows: AtomicU64,
    phase_starts: AtomicU64,
}

/// Point-in-time copy of [`BufferStats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    /// Events inserted
    pub enqueued: u64,
    /// Events passed to the legacy handler
    pub forwarded: u64,
    /// Events drained but dropped as irrelevant
    pub discarded: u64,
    /// Insertions that made pending events unreachable
    pub overflows: u64,
    /// Display phases started
    pub phase_starts: u64,
}

impl BufferStats {
    /// Create zeroed counters
    pub const fn new() -> Self {
        Self {
            enqueued: AtomicU64::new(0),
            forwarded: AtomicU64::new(0),
            discarded: AtomicU64::new(0),
            overflows: AtomicU64::new(0),
            phase_starts: AtomicU64::new(0),
        }
    }

    pub(crate) fn record_enqueue(&self) {
        self.enqueued.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_overflow(&self) {
        self.overflows.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_drain(&self, report: &DrainReport) {
        self.forwarded.fetch_add(report.forwarded as u64, Ordering::Relaxed);
        self.discarded.fetch_add(report.discarded as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_phase_start(&self) {
        self.phase_starts.fetch_add(1, Ordering::Relaxed);
    }

    /// Copy the current counters
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            enqueued: self.enqueued.load(Ordering::Relaxed),
            forwarded: self.forwarded.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
            overflows: self.overflows.load(Ordering::Relaxed),
            phase_starts: self.phase_starts.load(Ordering::Relaxed),
        }
    }

    /// Zero all counters
    pub fn reset(&self) {
        self.enqueued.store(0, Ordering::Relaxed);
        self.forwarded.store(0, Ordering::Relaxed);
        self.discarded.store(0, Ordering::Relaxed);
        self.overflows.store(0, Ordering::Relaxed);
        self.phase_starts.store(0, Ordering::Relaxed);
    }
}

impl Default for BufferStats {
    fn default() -> Self {
        Self::new()
    }
}
