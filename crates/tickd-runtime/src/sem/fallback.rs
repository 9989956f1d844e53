//! Portable counting semaphore on Mutex + Condvar

use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

use super::WAIT_FOREVER;

pub struct CondvarSemaphore {
    count: Mutex<u64>,
    cv: Condvar,
}

impl CondvarSemaphore {
    pub fn new() -> Self {
        Self {
            count: Mutex::new(0),
            cv: Condvar::new(),
        }
    }

    /// Post one token and wake a parked waiter if there is one
    pub fn post(&self) {
        let mut count = self.count.lock().unwrap();
        *count += 1;
        self.cv.notify_one();
    }

    /// Wait for a token with a relative timeout in nanoseconds
    ///
    /// [`WAIT_FOREVER`] blocks until a post arrives. Returns true if a
    /// token was consumed, false on timeout.
    pub fn wait_timeout_ns(&self, timeout_ns: u64) -> bool {
        let mut count = self.count.lock().unwrap();
        if *count > 0 {
            *count -= 1;
            return true;
        }
        if timeout_ns == 0 {
            return false;
        }

        if timeout_ns == WAIT_FOREVER {
            while *count == 0 {
                count = self.cv.wait(count).unwrap();
            }
            *count -= 1;
            return true;
        }

        let deadline = Instant::now() + Duration::from_nanos(timeout_ns);
        while *count == 0 {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let (guard, _timed_out) = self.cv.wait_timeout(count, deadline - now).unwrap();
            count = guard;
        }
        *count -= 1;
        true
    }
}

impl Default for CondvarSemaphore {
    fn default() -> Self {
        Self::new()
    }
}
