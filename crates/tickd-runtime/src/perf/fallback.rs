//! Portable performance counter anchored to `std::time::Instant`
//!
//! `Instant` is already monotonic on every supported platform; the
//! counter is its elapsed time since a process-wide anchor, in
//! nanosecond units (frequency 10^9).

use std::sync::OnceLock;
use std::time::Instant;

use crate::NANOS_PER_SEC;

pub(crate) fn counter() -> u64 {
    static START: OnceLock<Instant> = OnceLock::new();
    let start = START.get_or_init(Instant::now);
    start.elapsed().as_nanos() as u64
}

pub(crate) fn frequency() -> u64 {
    NANOS_PER_SEC
}

pub(crate) fn set_system_timer_resolution(_period_ms: u32) -> bool {
    false
}
