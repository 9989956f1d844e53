//! Scheduler intake: the producer-facing queues and their lock
//!
//! Producers hand records to the worker through [`Intake`]: a pending
//! stack and a freelist behind one spin flag. Every critical section is
//! a handful of pointer moves (push, pop, or whole-list detach), so
//! waiters spin with a pause hint instead of parking; anything that may
//! allocate or drop in bulk happens outside the flag. The sorted
//! deadline queue lives on the worker's stack and is never shared.

use std::cell::UnsafeCell;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

use super::entry::TimerRecord;

/// Cap on recycled records retained for reuse; overflow is dropped
pub(crate) const FREELIST_MAX: usize = 64;

#[derive(Default)]
struct Queues {
    /// Records published since the worker's last drain, in publication
    /// order
    pending: Vec<Box<TimerRecord>>,

    /// Recycled records awaiting reuse
    freelist: Vec<Box<TimerRecord>>,
}

/// The two producer-facing list heads and the flag that serializes them
pub(crate) struct Intake {
    locked: AtomicBool,
    queues: UnsafeCell<Queues>,
}

// Safety: `locked` serializes every access to `queues`
unsafe impl Send for Intake {}
unsafe impl Sync for Intake {}

impl Intake {
    pub(crate) fn new() -> Self {
        Intake {
            locked: AtomicBool::new(false),
            queues: UnsafeCell::new(Queues::default()),
        }
    }

    /// Run one short critical section against the queues
    fn with<R>(&self, f: impl FnOnce(&mut Queues) -> R) -> R {
        while self
            .locked
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            core::hint::spin_loop();
        }
        // Safety: the flag grants exclusive access until the release below
        let result = f(unsafe { &mut *self.queues.get() });
        self.locked.store(false, Ordering::Release);
        result
    }

    /// Publish a record for the worker's next drain
    pub(crate) fn publish(&self, record: Box<TimerRecord>) {
        self.with(|q| q.pending.push(record));
    }

    /// Take a recycled record for reuse, if one is available
    pub(crate) fn take_husk(&self) -> Option<Box<TimerRecord>> {
        self.with(|q| q.freelist.pop())
    }

    /// Detach all pending records and splice `recycled` onto the
    /// freelist, one flag hold for both
    ///
    /// Returns the pending batch plus any recycled records past
    /// [`FREELIST_MAX`]; the caller drops the overflow outside the
    /// critical section.
    pub(crate) fn drain(
        &self,
        recycled: &mut Vec<Box<TimerRecord>>,
    ) -> (Vec<Box<TimerRecord>>, Vec<Box<TimerRecord>>) {
        self.with(|q| {
            let mut spill = Vec::new();
            if !recycled.is_empty() {
                let room = FREELIST_MAX.saturating_sub(q.freelist.len());
                if recycled.len() > room {
                    spill = recycled.split_off(room);
                }
                q.freelist.append(recycled);
            }
            (std::mem::take(&mut q.pending), spill)
        })
    }

    /// Detach every queued record; the caller drops them
    pub(crate) fn clear(&self) -> (Vec<Box<TimerRecord>>, Vec<Box<TimerRecord>>) {
        self.with(|q| {
            (
                std::mem::take(&mut q.pending),
                std::mem::take(&mut q.freelist),
            )
        })
    }
}

/// Insert into the worker's deadline queue, keeping it sorted by
/// non-decreasing deadline
///
/// Equal deadlines land after existing entries, so already-queued timers
/// fire FIFO.
pub(crate) fn insert_sorted(timers: &mut VecDeque<Box<TimerRecord>>, record: Box<TimerRecord>) {
    let at = timers.partition_point(|t| t.scheduled_ns <= record.scheduled_ns);
    timers.insert(at, record);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::entry::{TimerCallback, TimerShared};
    use std::sync::Arc;
    use std::thread;
    use tickd_core::TimerId;

    fn record(id: u32, scheduled_ns: u64) -> Box<TimerRecord> {
        Box::new(TimerRecord::new(
            TimerShared::new(TimerId::from_raw(id)),
            TimerCallback::Nanos(Box::new(|_, _| 0)),
            0,
            scheduled_ns,
        ))
    }

    fn ids(timers: &VecDeque<Box<TimerRecord>>) -> Vec<u32> {
        timers.iter().map(|t| t.shared.id.as_u32()).collect()
    }

    #[test]
    fn test_publish_then_drain_in_order() {
        let intake = Intake::new();
        intake.publish(record(1, 10));
        intake.publish(record(2, 20));
        intake.publish(record(3, 30));

        let (batch, spill) = intake.drain(&mut Vec::new());
        assert_eq!(
            batch.iter().map(|r| r.shared.id.as_u32()).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert!(spill.is_empty());

        // Nothing left after a drain
        let (batch, _) = intake.drain(&mut Vec::new());
        assert!(batch.is_empty());
    }

    #[test]
    fn test_recycle_and_take_husk() {
        let intake = Intake::new();
        assert!(intake.take_husk().is_none());

        let mut recycled = vec![record(7, 0)];
        intake.drain(&mut recycled);
        assert!(recycled.is_empty());

        let husk = intake.take_husk().expect("husk was recycled");
        assert_eq!(husk.shared.id.as_u32(), 7);
        assert!(intake.take_husk().is_none());
    }

    #[test]
    fn test_freelist_cap_spills_overflow() {
        let intake = Intake::new();
        let mut recycled: Vec<_> = (0..FREELIST_MAX as u32 + 10).map(|i| record(i, 0)).collect();

        let (_, spill) = intake.drain(&mut recycled);
        assert_eq!(spill.len(), 10);

        // The freelist holds exactly the cap
        let mut kept = 0;
        while intake.take_husk().is_some() {
            kept += 1;
        }
        assert_eq!(kept, FREELIST_MAX);
    }

    #[test]
    fn test_clear_detaches_everything() {
        let intake = Intake::new();
        intake.publish(record(1, 0));
        intake.drain(&mut vec![record(2, 0)]);
        intake.publish(record(3, 0));

        let (pending, freelist) = intake.clear();
        assert_eq!(pending.len(), 1);
        assert_eq!(freelist.len(), 1);
        assert!(intake.take_husk().is_none());
    }

    #[test]
    fn test_concurrent_publish() {
        let intake = Arc::new(Intake::new());
        let mut handles = vec![];

        for t in 0..4u32 {
            let intake = intake.clone();
            handles.push(thread::spawn(move || {
                for i in 0..100u32 {
                    intake.publish(record(t * 1000 + i, u64::from(i)));
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }

        let (batch, _) = intake.drain(&mut Vec::new());
        assert_eq!(batch.len(), 400);
    }

    #[test]
    fn test_insert_sorted_orders_by_deadline() {
        let mut timers = VecDeque::new();
        insert_sorted(&mut timers, record(1, 30));
        insert_sorted(&mut timers, record(2, 10));
        insert_sorted(&mut timers, record(3, 20));
        assert_eq!(ids(&timers), vec![2, 3, 1]);
    }

    #[test]
    fn test_insert_sorted_ties_are_fifo() {
        let mut timers = VecDeque::new();
        insert_sorted(&mut timers, record(1, 50));
        insert_sorted(&mut timers, record(2, 50));
        insert_sorted(&mut timers, record(3, 50));
        insert_sorted(&mut timers, record(4, 10));
        assert_eq!(ids(&timers), vec![4, 1, 2, 3]);
    }

    #[test]
    fn test_insert_sorted_front_and_back() {
        let mut timers = VecDeque::new();
        insert_sorted(&mut timers, record(1, 100));
        insert_sorted(&mut timers, record(2, 1));
        insert_sorted(&mut timers, record(3, 1_000));
        assert_eq!(ids(&timers), vec![2, 1, 3]);
    }
}
