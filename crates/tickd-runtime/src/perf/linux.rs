//! Linux performance counter: CLOCK_MONOTONIC_RAW
//!
//! The raw clock is immune to NTP rate adjustment, so tick deltas stay
//! proportional to elapsed hardware time. The counter unit is one
//! nanosecond, giving a fixed frequency of 10^9 ticks per second.

use crate::NANOS_PER_SEC;

use nix::time::{clock_gettime, ClockId};

pub(crate) fn counter() -> u64 {
    let ts = clock_gettime(ClockId::CLOCK_MONOTONIC_RAW)
        .expect("CLOCK_MONOTONIC_RAW unavailable");
    ts.tv_sec() as u64 * NANOS_PER_SEC + ts.tv_nsec() as u64
}

pub(crate) fn frequency() -> u64 {
    NANOS_PER_SEC
}

/// The kernel tick is not adjustable from userspace; requests are
/// accepted and reported as not honored.
pub(crate) fn set_system_timer_resolution(_period_ms: u32) -> bool {
    false
}
