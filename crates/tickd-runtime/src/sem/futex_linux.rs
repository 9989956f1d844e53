//! Linux futex-based counting semaphore
//!
//! The futex word holds the count of unconsumed posts. `post` increments
//! and wakes; `wait_timeout_ns` consumes a token or sleeps in
//! FUTEX_WAIT while the word is zero.

use std::sync::atomic::{AtomicU32, Ordering};

use super::WAIT_FOREVER;
use crate::NANOS_PER_SEC;

pub struct FutexSemaphore {
    /// Count of unconsumed posts; doubles as the futex word
    value: AtomicU32,

    /// Count of threads inside the futex wait, to skip the wake syscall
    /// when nobody is parked
    waiters: AtomicU32,
}

impl FutexSemaphore {
    pub fn new() -> Self {
        Self {
            value: AtomicU32::new(0),
            waiters: AtomicU32::new(0),
        }
    }

    fn try_acquire(&self) -> bool {
        let mut current = self.value.load(Ordering::Acquire);
        while current > 0 {
            match self.value.compare_exchange_weak(
                current,
                current - 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(observed) => current = observed,
            }
        }
        false
    }

    /// Post one token and wake a parked waiter if there is one
    pub fn post(&self) {
        self.value.fetch_add(1, Ordering::Release);
        if self.waiters.load(Ordering::SeqCst) > 0 {
            unsafe {
                libc::syscall(
                    libc::SYS_futex,
                    self.value.as_ptr(),
                    libc::FUTEX_WAKE | libc::FUTEX_PRIVATE_FLAG,
                    1i32,
                    std::ptr::null::<libc::timespec>(),
                    std::ptr::null::<u32>(),
                    0u32,
                );
            }
        }
    }

    /// Wait for a token with a relative timeout in nanoseconds
    ///
    /// [`WAIT_FOREVER`] blocks until a post arrives. Returns true if a
    /// token was consumed, false otherwise. A signal can surface as an
    /// early false even for the infinite timeout; callers treat that as
    /// a spurious wakeup.
    pub fn wait_timeout_ns(&self, timeout_ns: u64) -> bool {
        if self.try_acquire() {
            return true;
        }
        if timeout_ns == 0 {
            return false;
        }

        self.waiters.fetch_add(1, Ordering::SeqCst);

        let timespec = (timeout_ns != WAIT_FOREVER).then(|| libc::timespec {
            tv_sec: (timeout_ns / NANOS_PER_SEC) as libc::time_t,
            tv_nsec: (timeout_ns % NANOS_PER_SEC) as libc::c_long,
        });
        let timespec_ptr = timespec
            .as_ref()
            .map_or(std::ptr::null(), |ts| ts as *const libc::timespec);

        // FUTEX_WAIT: sleep while no token is posted. Returns with EAGAIN
        // immediately if a post slipped in between try_acquire and here,
        // which the re-acquire below picks up.
        unsafe {
            libc::syscall(
                libc::SYS_futex,
                self.value.as_ptr(),
                libc::FUTEX_WAIT | libc::FUTEX_PRIVATE_FLAG,
                0u32,
                timespec_ptr,
                std::ptr::null::<u32>(),
                0u32,
            );
        }

        self.waiters.fetch_sub(1, Ordering::SeqCst);
        self.try_acquire()
    }
}

impl Default for FutexSemaphore {
    fn default() -> Self {
        Self::new()
    }
}
