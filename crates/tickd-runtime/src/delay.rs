//! Blocking sleep primitives
//!
//! `delay` and `delay_ns` forward to the platform sleep, which may
//! oversleep by a small but variable amount (occasionally several
//! milliseconds). `delay_precise` paces a request through progressively
//! cheaper-per-nanosecond stages so the overshoot stays low without
//! burning a core for the whole wait.

use crate::clock;
use crate::NANOS_PER_MS;

const SHORT_SLEEP_NS: u64 = NANOS_PER_MS;

/// Block for at least `ms` milliseconds
pub fn delay(ms: u32) {
    sys_delay(u64::from(ms) * NANOS_PER_MS);
}

/// Block for at least `ns` nanoseconds
pub fn delay_ns(ns: u64) {
    sys_delay(ns);
}

cfg_if::cfg_if! {
    if #[cfg(unix)] {
        /// Best-effort blocking sleep; `sys_delay(0)` yields the CPU.
        ///
        /// A `nanosleep` loop: on EINTR the kernel reports the remaining
        /// time and the sleep resumes. Other errors are swallowed, the
        /// callers' pacing loops self-correct.
        pub(crate) fn sys_delay(ns: u64) {
            if ns == 0 {
                std::thread::yield_now();
                return;
            }
            let mut request = libc::timespec {
                tv_sec: (ns / crate::NANOS_PER_SEC) as libc::time_t,
                tv_nsec: (ns % crate::NANOS_PER_SEC) as libc::c_long,
            };
            loop {
                let mut remaining = libc::timespec { tv_sec: 0, tv_nsec: 0 };
                // Safety: both timespec pointers are valid for the call
                let rc = unsafe { libc::nanosleep(&request, &mut remaining) };
                if rc == 0 {
                    return;
                }
                if std::io::Error::last_os_error().raw_os_error() != Some(libc::EINTR) {
                    return;
                }
                request = remaining;
            }
        }
    } else {
        /// Best-effort blocking sleep; `sys_delay(0)` yields the CPU.
        pub(crate) fn sys_delay(ns: u64) {
            if ns == 0 {
                std::thread::yield_now();
                return;
            }
            std::thread::sleep(std::time::Duration::from_nanos(ns));
        }
    }
}

/// Block for at least `ns` nanoseconds with low overshoot
///
/// Stages, each cheaper per remaining nanosecond than the last:
///
/// 1. Coarse undershooting sleeps of roughly a tenth of the request,
///    shortened by the worst overshoot observed so far.
/// 2. One-millisecond sleeps while the deadline is more than one
///    observed worst-case sleep away.
/// 3. One-millisecond sleeps accepting overshoot, down to two
///    milliseconds out.
/// 4. A yield spin (`sys_delay(0)` is cheaper than pause loops on some
///    platforms).
/// 5. A busy spin to the deadline.
///
/// Overshoot tracking is loop-local: long-term overshoot is not
/// stationary, so a maximum learned in one stage is not trusted by the
/// next.
pub fn delay_precise(ns: u64) {
    let mut current = clock::ticks_ns();
    let deadline = current.saturating_add(ns);

    if ns > 2 * SHORT_SLEEP_NS {
        // Stage 1: coarse undershoot, keeping a 10ms guard band between
        // the expected wakeup and the deadline.
        let mut target_sleep = ns / 10;
        let mut max_overshoot: u64 = 0;
        while target_sleep > SHORT_SLEEP_NS {
            if target_sleep >= 10 * SHORT_SLEEP_NS
                && current + target_sleep + 10 * SHORT_SLEEP_NS < deadline
            {
                let request = target_sleep - max_overshoot;
                let before = current;
                sys_delay(request);
                current = clock::ticks_ns();
                if current >= deadline {
                    return;
                }
                let overshoot = (current - before).saturating_sub(request);
                if overshoot > max_overshoot {
                    // An overshoot bigger than the sleep itself is an
                    // outlier (preemption, suspend); start tracking over
                    max_overshoot = if overshoot > target_sleep { 0 } else { overshoot };
                }
            } else {
                target_sleep /= 10;
            }
        }

        // Stage 2: 1ms undershoot loop sized by the observed worst sleep
        let mut max_overshoot: u64 = 0;
        let mut max_sleep = SHORT_SLEEP_NS;
        while current + max_sleep < deadline {
            let before = current;
            sys_delay(SHORT_SLEEP_NS);
            current = clock::ticks_ns();
            let overshoot = (current - before).saturating_sub(SHORT_SLEEP_NS);
            if overshoot > max_overshoot {
                max_overshoot = overshoot;
            }
            max_sleep = SHORT_SLEEP_NS + max_overshoot.min(SHORT_SLEEP_NS);
        }

        // Stage 3: 1ms sleeps accepting overshoot
        while current + 2 * SHORT_SLEEP_NS < deadline {
            sys_delay(SHORT_SLEEP_NS);
            current = clock::ticks_ns();
        }
    }

    // Stage 4: yield spin
    while current + SHORT_SLEEP_NS < deadline {
        sys_delay(0);
        current = clock::ticks_ns();
    }

    // Stage 5: busy spin
    while current < deadline {
        core::hint::spin_loop();
        current = clock::ticks_ns();
    }
}
