//! # tickd - process-wide timer service
//!
//! Schedule one-shot or periodic callbacks at nanosecond-resolution
//! deadlines from any thread. A single background worker dispatches
//! callbacks in time order; a callback's return value is its next
//! interval (zero stops it). Also ships a monotonic tick clock and an
//! adaptive precise sleep.
//!
//! ## Quick Start
//!
//! ```ignore
//! use tickd::{add_timer_ms, init_timers, quit_timers, remove_timer};
//!
//! fn main() {
//!     init_timers().expect("timer service failed to start");
//!
//!     // Fires every 100ms until removed
//!     let id = add_timer_ms(100, |_, interval| {
//!         println!("tick");
//!         interval
//!     })
//!     .unwrap();
//!
//!     tickd::delay(550);
//!     remove_timer(id);
//!
//!     quit_timers();
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       User Code                             │
//! │        add_timer_ms/ns, remove_timer, delay_precise         │
//! └─────────────────────────────────────────────────────────────┘
//!                 │                             │
//!                 ▼                             ▼
//! ┌───────────────────────────────┐   ┌─────────────────────────┐
//! │  Registry (id → cancel flag)  │   │  Monotonic clock        │
//! │  Pending intake + freelist    │   │  ticks_ns / ticks_ms    │
//! └───────────────────────────────┘   └─────────────────────────┘
//!                 │
//!                 ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │   Worker Thread - sorted deadline queue, fires callbacks,   │
//! │   reschedules periodics, recycles records                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The free functions here drive one process-wide [`TimerService`]
//! gated by [`init_timers`]/[`quit_timers`]. Embedders that want their
//! own instance (several independent schedulers, or a host event loop
//! owning the lifecycle) can use [`TimerService`] directly.

use std::sync::Mutex;

// Re-export core types
pub use tickd_core::{
    get_hint, set_hint, unwatch_hint, watch_hint, HintWatchId, LogLevel, TimerError, TimerId,
    TimerResult,
};

// Re-export log macros and their level control
pub use tickd_core::tlog::set_log_level;
pub use tickd_core::{tdebug, terror, tinfo, ttrace, twarn};

// Re-export runtime surface
pub use tickd_runtime::resolution::HINT_TIMER_RESOLUTION;
pub use tickd_runtime::{
    delay, delay_ns, delay_precise, init_ticks, ticks_ms, ticks_ns, TimerService,
};

static SERVICE: Mutex<Option<TimerService>> = Mutex::new(None);

/// Start the process-wide timer service
///
/// Idempotent: a second call while the service is running is a no-op.
/// Installs the timer-resolution hint watcher and pins the tick origin.
pub fn init_timers() -> TimerResult<()> {
    let mut guard = SERVICE.lock().unwrap();
    if guard.is_some() {
        return Ok(());
    }
    let service = TimerService::start()?;
    tickd_runtime::resolution::install();
    *guard = Some(service);
    tinfo!("timer service initialized");
    Ok(())
}

/// Stop the process-wide timer service
///
/// Joins the worker (callbacks in flight complete first), discards
/// queued timers without a final fire, and revokes any timer-resolution
/// request. Idempotent; `init_timers` may be called again afterwards.
pub fn quit_timers() {
    // Take the service out before joining so a callback calling back
    // into this API observes NotInitialized instead of deadlocking
    let service = SERVICE.lock().unwrap().take();
    let Some(mut service) = service else {
        return;
    };
    service.shutdown();
    tickd_runtime::resolution::uninstall();
    tinfo!("timer service shut down");
}

/// Schedule a millisecond-flavored callback on the global service
///
/// See [`TimerService::add_timer_ms`]. Fails with
/// [`TimerError::NotInitialized`] before [`init_timers`].
pub fn add_timer_ms<F>(interval_ms: u32, callback: F) -> TimerResult<TimerId>
where
    F: FnMut(TimerId, u32) -> u32 + Send + 'static,
{
    let guard = SERVICE.lock().unwrap();
    let service = guard.as_ref().ok_or(TimerError::NotInitialized)?;
    service.add_timer_ms(interval_ms, callback)
}

/// Schedule a nanosecond-flavored callback on the global service
///
/// See [`TimerService::add_timer_ns`]. Fails with
/// [`TimerError::NotInitialized`] before [`init_timers`].
pub fn add_timer_ns<F>(interval_ns: u64, callback: F) -> TimerResult<TimerId>
where
    F: FnMut(TimerId, u64) -> u64 + Send + 'static,
{
    let guard = SERVICE.lock().unwrap();
    let service = guard.as_ref().ok_or(TimerError::NotInitialized)?;
    service.add_timer_ns(interval_ns, callback)
}

/// Cancel a timer on the global service
///
/// Returns false if the id is unknown, zero, already canceled, or the
/// service is not running. True guarantees no further callback
/// invocations for this id.
pub fn remove_timer(id: TimerId) -> bool {
    let guard = SERVICE.lock().unwrap();
    guard.as_ref().map_or(false, |s| s.remove(id).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    // The global service is process state, so everything touching it
    // lives in this one test
    #[test]
    fn test_global_lifecycle() {
        // Not initialized yet
        assert_eq!(
            add_timer_ms(10, |_, i| i).unwrap_err(),
            TimerError::NotInitialized
        );
        assert!(!remove_timer(TimerId::from_raw(1)));

        init_timers().unwrap();
        init_timers().unwrap(); // idempotent

        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let id = add_timer_ms(10, move |_, interval| {
            c.fetch_add(1, Ordering::SeqCst);
            interval
        })
        .unwrap();
        assert!(id.is_some());

        thread::sleep(Duration::from_millis(100));
        assert!(count.load(Ordering::SeqCst) >= 1);

        assert!(remove_timer(id));
        assert!(!remove_timer(id)); // already gone
        assert!(!remove_timer(TimerId::NONE));

        quit_timers();
        quit_timers(); // idempotent

        assert_eq!(
            add_timer_ns(1_000, |_, i| i).unwrap_err(),
            TimerError::NotInitialized
        );

        // The lifecycle can run again
        init_timers().unwrap();
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        add_timer_ns(5_000_000, move |_, _| {
            c.fetch_add(1, Ordering::SeqCst);
            0
        })
        .unwrap();
        thread::sleep(Duration::from_millis(80));
        assert_eq!(count.load(Ordering::SeqCst), 1);
        quit_timers();
    }

    #[test]
    fn test_clock_and_delay_reexports() {
        let a = ticks_ns();
        delay_ns(1_500_000);
        let b = ticks_ns();
        assert!(b - a >= 1_500_000);

        let ms = ticks_ms();
        assert!((ticks_ns() / 1_000_000).abs_diff(ms) <= 2);

        delay_precise(500_000);
    }
}
