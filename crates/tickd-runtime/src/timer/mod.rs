//! Timer scheduling service
//!
//! Many producer threads schedule callbacks; one worker thread fires
//! them in deadline order.
//!
//! # Architecture
//!
//! ```text
//!  producer threads                         worker thread
//!  ────────────────                         ─────────────
//!  add_timer_{ms,ns} ──┐
//!                      ▼
//!            ┌──────────────────┐  drain   ┌───────────────────┐
//!            │ pending (intake) │ ───────► │ timers (sorted by │
//!            │ freelist         │ ◄─────── │ deadline, FIFO    │
//!            └──────────────────┘  recycle │ ties)             │
//!               one spin flag              └───────────────────┘
//!                      │                             │
//!  remove ──► registry │ sem.post ──► timed wait ────┘ fire / reschedule
//!             (mutex)  ▼
//! ```
//!
//! A record lives in exactly one of `pending`, `timers`, or `freelist`.
//! The registry maps public ids to the shared cancellation flag;
//! removing the entry is the linearization point of cancellation, and
//! the worker observes the flag at fire time.

mod entry;
mod queue;
mod registry;
mod worker;

pub use entry::TimerCallback;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use tickd_core::{tdebug, terror, TimerError, TimerId, TimerResult};

use crate::clock;
use crate::sem::Semaphore;
use crate::NANOS_PER_MS;
use entry::{TimerRecord, TimerShared};
use queue::Intake;
use registry::TimerRegistry;
use worker::{SchedulerShared, WorkerStats};

/// A timer scheduler with its own worker thread
///
/// Thread-safe: any number of threads may add and remove timers
/// concurrently. Dropping the service shuts it down, joining the worker
/// first so no callback is left mid-flight.
pub struct TimerService {
    shared: Arc<SchedulerShared>,
    registry: TimerRegistry,
    worker: Option<JoinHandle<WorkerStats>>,
}

impl TimerService {
    /// Start a service and its worker thread
    pub fn start() -> TimerResult<Self> {
        clock::init_ticks();
        let shared = Arc::new(SchedulerShared {
            intake: Intake::new(),
            sem: Semaphore::new(),
            active: AtomicBool::new(true),
        });
        let worker = worker::spawn(shared.clone()).map_err(|err| {
            terror!("failed to spawn timer worker: {}", err);
            TimerError::SpawnFailed
        })?;
        Ok(TimerService {
            shared,
            registry: TimerRegistry::new(),
            worker: Some(worker),
        })
    }

    /// Schedule a millisecond-flavored callback
    ///
    /// First fires `interval_ms` from now; the callback's return value is
    /// the next interval in milliseconds, zero to stop.
    pub fn add_timer_ms<F>(&self, interval_ms: u32, callback: F) -> TimerResult<TimerId>
    where
        F: FnMut(TimerId, u32) -> u32 + Send + 'static,
    {
        self.submit(
            u64::from(interval_ms) * NANOS_PER_MS,
            TimerCallback::Millis(Box::new(callback)),
        )
    }

    /// Schedule a nanosecond-flavored callback
    ///
    /// First fires `interval_ns` from now; the callback's return value is
    /// the next interval in nanoseconds, zero to stop.
    pub fn add_timer_ns<F>(&self, interval_ns: u64, callback: F) -> TimerResult<TimerId>
    where
        F: FnMut(TimerId, u64) -> u64 + Send + 'static,
    {
        self.submit(interval_ns, TimerCallback::Nanos(Box::new(callback)))
    }

    fn submit(&self, interval_ns: u64, callback: TimerCallback) -> TimerResult<TimerId> {
        let id = TimerId::next();
        let shared = TimerShared::new(id);
        let scheduled_ns = clock::ticks_ns().saturating_add(interval_ns);

        let record = match self.shared.intake.take_husk() {
            Some(mut husk) => {
                // A husk can still be registry-visible under its prior id
                // when a self-stopped timer was never removed by its
                // caller; reuse must not leave that id aliasing this
                // record
                let prior = husk.shared.id;
                if self.registry.forget(prior) {
                    tdebug!("dropped lingering entry for {} on record reuse", prior);
                }
                husk.reset(shared.clone(), callback, interval_ns, scheduled_ns);
                husk
            }
            None => Box::new(TimerRecord::new(
                shared.clone(),
                callback,
                interval_ns,
                scheduled_ns,
            )),
        };

        // Registry first: the id is publicly live from here. Then
        // publish and post; the intake flag's release orders the
        // record's fields before the worker's drain.
        self.registry.insert(shared);
        self.shared.intake.publish(record);
        self.shared.sem.post();
        Ok(id)
    }

    /// Cancel the timer with the given id
    ///
    /// Success guarantees no further callback invocations for this id. An
    /// invocation the worker already entered is not interrupted; the
    /// record itself is recycled at the worker's next pass.
    pub fn remove(&self, id: TimerId) -> TimerResult<()> {
        self.registry.remove(id)
    }

    /// Stop the worker and release every record
    ///
    /// Joins the worker, so a callback in flight completes first. Timers
    /// still queued are discarded silently, with no final fire.
    /// Idempotent.
    pub fn shutdown(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        self.shared.active.store(false, Ordering::Release);
        self.shared.sem.post();
        match worker.join() {
            Ok(stats) => tdebug!("timer worker stopped: {:?}", stats),
            Err(_) => terror!("timer worker panicked"),
        }
        self.registry.clear();
        let dropped = self.shared.intake.clear();
        drop(dropped);
    }
}

impl Drop for TimerService {
    fn drop(&mut self) {
        self.shutdown();
    }
}
