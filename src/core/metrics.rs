//! Dispatch metrics
//!
//! Counters describing what the logger did with the entries it built:
//! how many were dispatched, how many handler writes happened, how many
//! times a handler filtered an entry out, and how many writes or hooks failed.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use ploggy::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_dispatched();
/// metrics.record_emitted();
///
/// assert_eq!(metrics.entries_dispatched(), 1);
/// assert_eq!(metrics.handler_emits(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Entries built and offered to the handler list
    entries_dispatched: AtomicU64,

    /// Successful handler writes
    handler_emits: AtomicU64,

    /// Handler skips because the entry was below the handler's minimum level
    entries_filtered: AtomicU64,

    /// Handler writes that returned an error
    write_failures: AtomicU64,

    /// Hooks that panicked
    hook_failures: AtomicU64,

    /// Exit actions fired
    exit_actions: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            entries_dispatched: AtomicU64::new(0),
            handler_emits: AtomicU64::new(0),
            entries_filtered: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
            hook_failures: AtomicU64::new(0),
            exit_actions: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn entries_dispatched(&self) -> u64 {
        self.entries_dispatched.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn handler_emits(&self) -> u64 {
        self.handler_emits.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn entries_filtered(&self) -> u64 {
        self.entries_filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn hook_failures(&self) -> u64 {
        self.hook_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn exit_actions(&self) -> u64 {
        self.exit_actions.load(Ordering::Relaxed)
    }

    /// Record a dispatched entry; returns the previous count
    #[inline]
    pub fn record_dispatched(&self) -> u64 {
        self.entries_dispatched.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_emitted(&self) -> u64 {
        self.handler_emits.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.entries_filtered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_write_failure(&self) -> u64 {
        self.write_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_hook_failure(&self) -> u64 {
        self.hook_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_exit(&self) -> u64 {
        self.exit_actions.fetch_add(1, Ordering::Relaxed)
    }

    /// Failed writes as a percentage of attempted writes (0.0 - 100.0)
    pub fn failure_rate(&self) -> f64 {
        let failed = self.write_failures() as f64;
        let total = self.handler_emits() as f64 + failed;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.entries_dispatched.store(0, Ordering::Relaxed);
        self.handler_emits.store(0, Ordering::Relaxed);
        self.entries_filtered.store(0, Ordering::Relaxed);
        self.write_failures.store(0, Ordering::Relaxed);
        self.hook_failures.store(0, Ordering::Relaxed);
        self.exit_actions.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            entries_dispatched: AtomicU64::new(self.entries_dispatched()),
            handler_emits: AtomicU64::new(self.handler_emits()),
            entries_filtered: AtomicU64::new(self.entries_filtered()),
            write_failures: AtomicU64::new(self.write_failures()),
            hook_failures: AtomicU64::new(self.hook_failures()),
            exit_actions: AtomicU64::new(self.exit_actions()),
        }
    }
}
