//! Counting semaphore with nanosecond timed wait
//!
//! The scheduler worker's only blocking primitive. Producers `post` once
//! per publication; the worker waits with a timeout equal to the time
//! until the earliest deadline. The token count is an upper bound on
//! unconsumed publications - extra posts and spurious wakeups only cost
//! one extra pass through the worker loop.
//!
//! Platform-specific implementations use the most efficient primitive
//! available.

/// Timeout value meaning "wait until posted"
pub const WAIT_FOREVER: u64 = u64::MAX;

cfg_if::cfg_if! {
    if #[cfg(target_os = "linux")] {
        mod futex_linux;
        pub use futex_linux::FutexSemaphore as Semaphore;
    } else {
        mod fallback;
        pub use fallback::CondvarSemaphore as Semaphore;
    }
}
