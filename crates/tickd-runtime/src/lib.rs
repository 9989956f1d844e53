//! # tickd-runtime
//!
//! Platform-facing runtime for the tickd timer service.
//!
//! This crate provides:
//! - Monotonic clock built on the platform performance counter
//! - Blocking sleep primitives, including an adaptive precise delay
//! - Counting semaphore with nanosecond timed wait (futex on Linux)
//! - System timer-resolution request controller
//! - The timer scheduler: registry, worker thread, `TimerService`

pub mod clock;
pub mod delay;
pub mod resolution;
pub mod sem;
pub mod timer;

mod perf;

pub(crate) const NANOS_PER_SEC: u64 = 1_000_000_000;
pub(crate) const NANOS_PER_MS: u64 = 1_000_000;

// Re-exports
pub use clock::{init_ticks, ticks_ms, ticks_ns};
pub use delay::{delay, delay_ns, delay_precise};
pub use timer::TimerService;
