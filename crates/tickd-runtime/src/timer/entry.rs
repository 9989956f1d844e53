//! Timer record and callback types

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use tickd_core::TimerId;

use crate::NANOS_PER_MS;

/// A timer callback: receives `(id, current interval)` and returns the
/// next interval in its own unit, zero to stop firing
///
/// Exactly one flavor per timer. Caller state rides inside the closure,
/// which is invoked on the worker thread.
pub enum TimerCallback {
    /// Millisecond-flavored, for callers thinking in `u32` milliseconds
    Millis(Box<dyn FnMut(TimerId, u32) -> u32 + Send + 'static>),

    /// Nanosecond-flavored
    Nanos(Box<dyn FnMut(TimerId, u64) -> u64 + Send + 'static>),
}

/// The cross-thread slice of a timer: everything cancellation needs
///
/// Producers hold this through the registry; the record owns another
/// reference. `canceled`, once set, stays set until the record is
/// recycled for a new registration.
pub(crate) struct TimerShared {
    pub(crate) id: TimerId,
    pub(crate) canceled: AtomicBool,
}

impl TimerShared {
    pub(crate) fn new(id: TimerId) -> Arc<Self> {
        Arc::new(TimerShared {
            id,
            canceled: AtomicBool::new(false),
        })
    }
}

/// A scheduling unit: one callback, its deadline, its state
///
/// Owned by the scheduler after publication. The box moves between the
/// pending stack, the worker's sorted queue, and the freelist, and is in
/// exactly one of them (or transiently on the worker's stack) at any
/// moment.
pub(crate) struct TimerRecord {
    pub(crate) shared: Arc<TimerShared>,
    /// `None` only on freelist husks
    callback: Option<TimerCallback>,
    pub(crate) interval_ns: u64,
    pub(crate) scheduled_ns: u64,
}

impl TimerRecord {
    pub(crate) fn new(
        shared: Arc<TimerShared>,
        callback: TimerCallback,
        interval_ns: u64,
        scheduled_ns: u64,
    ) -> Self {
        TimerRecord {
            shared,
            callback: Some(callback),
            interval_ns,
            scheduled_ns,
        }
    }

    /// Refill a freelist husk for a new registration
    pub(crate) fn reset(
        &mut self,
        shared: Arc<TimerShared>,
        callback: TimerCallback,
        interval_ns: u64,
        scheduled_ns: u64,
    ) {
        self.shared = shared;
        self.callback = Some(callback);
        self.interval_ns = interval_ns;
        self.scheduled_ns = scheduled_ns;
    }

    /// Invoke the callback in its native unit
    ///
    /// Returns the next interval in nanoseconds; zero stops the timer.
    pub(crate) fn fire(&mut self) -> u64 {
        match self.callback.as_mut() {
            Some(TimerCallback::Millis(cb)) => {
                let next_ms = cb(self.shared.id, (self.interval_ns / NANOS_PER_MS) as u32);
                u64::from(next_ms) * NANOS_PER_MS
            }
            Some(TimerCallback::Nanos(cb)) => cb(self.shared.id, self.interval_ns),
            None => 0,
        }
    }

    /// Strip the record down to a reusable husk
    ///
    /// Drops the closure immediately so caller captures are released at
    /// recycling time, not at eventual reuse.
    pub(crate) fn retire(&mut self) {
        self.callback = None;
        self.interval_ns = 0;
    }
}
