//! Scheduler worker thread
//!
//! A single thread owns the sorted deadline queue and is the only code
//! that fires callbacks. Producers never touch that queue; they hand
//! records over through the intake's pending list and a semaphore
//! post. Lost wakeups are impossible: any record in `pending` when the
//! worker drains it is handled regardless of whether its post was
//! consumed, so the semaphore count is only an upper bound.

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tickd_core::{tdebug, ttrace};

use super::entry::TimerRecord;
use super::queue::{insert_sorted, Intake};
use crate::clock;
use crate::sem::{Semaphore, WAIT_FOREVER};

/// State shared between producer threads and the worker
pub(crate) struct SchedulerShared {
    /// Producer-facing pending stack and freelist behind one spin flag
    pub(crate) intake: Intake,

    /// Posted once per publication; the worker's only blocking wait
    pub(crate) sem: Semaphore,

    /// False requests worker exit
    pub(crate) active: AtomicBool,
}

/// Counters accumulated by the worker, returned from join
#[derive(Debug, Clone, Default)]
pub(crate) struct WorkerStats {
    pub(crate) iterations: u64,
    pub(crate) fired: u64,
    pub(crate) recycled: u64,
    pub(crate) max_batch: usize,
}

/// Spawn the worker thread
///
/// Callbacks are user code, so the thread keeps the default stack size.
pub(crate) fn spawn(shared: Arc<SchedulerShared>) -> io::Result<JoinHandle<WorkerStats>> {
    thread::Builder::new()
        .name("tickd-timer".into())
        .spawn(move || worker_loop(shared))
}

fn worker_loop(shared: Arc<SchedulerShared>) -> WorkerStats {
    let mut stats = WorkerStats::default();
    let mut timers: VecDeque<Box<TimerRecord>> = VecDeque::new();
    let mut local_free: Vec<Box<TimerRecord>> = Vec::new();

    loop {
        stats.iterations += 1;

        // Intake: detach everything published since the last drain and
        // give recycled records back, one flag hold for both. Records
        // past the freelist cap come back as spill to drop here.
        let (batch, spill) = shared.intake.drain(&mut local_free);
        drop(spill);

        // Merge in publication order; equal deadlines land after the
        // entries already queued
        for record in batch {
            insert_sorted(&mut timers, record);
        }

        if !shared.active.load(Ordering::Acquire) {
            break;
        }

        // Fire everything due at this tick
        let tick = clock::ticks_ns();
        let mut batch_fired = 0usize;
        loop {
            match timers.front() {
                Some(head) if head.scheduled_ns <= tick => {}
                _ => break,
            }
            let Some(mut record) = timers.pop_front() else {
                break;
            };

            if record.shared.canceled.load(Ordering::Acquire) {
                record.retire();
                local_free.push(record);
                stats.recycled += 1;
                continue;
            }

            let next_interval = record.fire();
            batch_fired += 1;

            if next_interval > 0 {
                // Reschedule from the fire-site tick, not from the
                // current time, so dispatch jitter does not accumulate
                // in the deadline
                record.interval_ns = next_interval;
                record.scheduled_ns = tick.saturating_add(next_interval);
                ttrace!(
                    "timer {} rescheduled in {}ns",
                    record.shared.id,
                    next_interval
                );
                insert_sorted(&mut timers, record);
            } else {
                ttrace!("timer {} stopped", record.shared.id);
                record.shared.canceled.store(true, Ordering::Release);
                record.retire();
                local_free.push(record);
                stats.recycled += 1;
            }
        }
        stats.fired += batch_fired as u64;
        stats.max_batch = stats.max_batch.max(batch_fired);

        // Wait until the earliest remaining deadline or a publication,
        // netting out the time spent firing
        let mut wait_ns = match timers.front() {
            Some(head) => head.scheduled_ns - tick,
            None => WAIT_FOREVER,
        };
        if wait_ns != WAIT_FOREVER {
            let elapsed = clock::ticks_ns().saturating_sub(tick);
            wait_ns = wait_ns.saturating_sub(elapsed);
        }
        shared.sem.wait_timeout_ns(wait_ns);
    }

    // Records still queued are dropped here without a final fire;
    // shutdown clears the shared lists after the join
    tdebug!(
        "timer worker exiting with {} queued, stats {:?}",
        timers.len(),
        stats
    );
    stats
}
