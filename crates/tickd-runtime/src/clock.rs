//! Monotonic clock built from the platform performance counter
//!
//! Tick values are rescaled to nanoseconds (and milliseconds) with a
//! pair of gcd-reduced rational scalers, so the conversion is a single
//! integer multiply and divide with no 64-bit overflow for any realistic
//! process uptime.

use std::sync::OnceLock;

use crate::{perf, NANOS_PER_SEC};

const MILLIS_PER_SEC: u64 = 1_000;

struct ClockScale {
    tick_start: u64,
    num_ns: u64,
    den_ns: u64,
    num_ms: u64,
    den_ms: u64,
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

fn scale() -> &'static ClockScale {
    static CLOCK: OnceLock<ClockScale> = OnceLock::new();
    CLOCK.get_or_init(|| {
        let freq = perf::frequency();
        // A frequency above 2^32-1 would let the rescaling product wrap;
        // no supported counter comes close, so treat it as fatal.
        assert!(
            freq > 0 && freq <= u32::MAX as u64,
            "performance counter frequency {freq} out of range"
        );
        ClockScale {
            // A zero origin would collide with the uninitialized state,
            // bump it by one tick.
            tick_start: perf::counter().max(1),
            num_ns: NANOS_PER_SEC / gcd(NANOS_PER_SEC, freq),
            den_ns: freq / gcd(NANOS_PER_SEC, freq),
            num_ms: MILLIS_PER_SEC / gcd(MILLIS_PER_SEC, freq),
            den_ms: freq / gcd(MILLIS_PER_SEC, freq),
        }
    })
}

/// Record the clock origin
///
/// Idempotent; `ticks_ns`/`ticks_ms` call it implicitly on first use, so
/// an explicit call only pins where "zero" lands.
pub fn init_ticks() {
    let _ = scale();
}

#[inline]
fn rescale(delta: u64, num: u64, den: u64) -> u64 {
    let product = delta.wrapping_mul(num);
    // num <= 10^9 after gcd reduction; the product must not wrap
    debug_assert!(product >= delta);
    product / den
}

/// Nanoseconds of monotonic time since `init_ticks`
#[inline]
pub fn ticks_ns() -> u64 {
    let c = scale();
    rescale(perf::counter().saturating_sub(c.tick_start), c.num_ns, c.den_ns)
}

/// Milliseconds of monotonic time since `init_ticks`
#[inline]
pub fn ticks_ms() -> u64 {
    let c = scale();
    rescale(perf::counter().saturating_sub(c.tick_start), c.num_ms, c.den_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gcd() {
        assert_eq!(gcd(1_000_000_000, 1_000_000_000), 1_000_000_000);
        assert_eq!(gcd(1_000, 1_000_000_000), 1_000);
        assert_eq!(gcd(1_000_000_000, 24_000_000), 8_000_000);
        assert_eq!(gcd(7, 13), 1);
    }

    #[test]
    fn test_rescale_identity() {
        assert_eq!(rescale(12345, 1, 1), 12345);
        assert_eq!(rescale(12345, 1, 1_000_000), 0);
        assert_eq!(rescale(3, 1_000_000_000, 1), 3_000_000_000);
    }

    #[test]
    fn test_init_idempotent() {
        init_ticks();
        let a = ticks_ns();
        init_ticks();
        let b = ticks_ns();
        assert!(b >= a);
    }

    #[test]
    fn test_ticks_monotonic() {
        let mut last = ticks_ns();
        for _ in 0..1000 {
            let now = ticks_ns();
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn test_ns_ms_consistent() {
        // Sampled back to back; allow the gap between the two reads
        let ms = ticks_ms();
        let ns = ticks_ns();
        assert!((ns / 1_000_000).abs_diff(ms) <= 2);
    }

    #[test]
    fn test_ticks_advance() {
        let a = ticks_ns();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = ticks_ns();
        assert!(b - a >= 1_000_000);
    }
}
