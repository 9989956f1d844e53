//! Timer identifier type and its allocator

use core::fmt;
use core::sync::atomic::{AtomicU32, Ordering};

/// Opaque identifier for a scheduled timer
///
/// A 32-bit value handed out by [`TimerId::next`]. Zero is reserved as the
/// "no timer" sentinel and is never returned by the allocator, so a caller
/// holding a non-zero id can always pass it back for cancellation.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct TimerId(u32);

impl TimerId {
    /// Sentinel value indicating no timer
    pub const NONE: TimerId = TimerId(0);

    /// Allocate a fresh, unique, non-zero id
    ///
    /// A process-global counter. On the (theoretical) wrap past `u32::MAX`
    /// the zero value is skipped so the sentinel stays unambiguous.
    #[inline]
    pub fn next() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(1);
        loop {
            let raw = NEXT.fetch_add(1, Ordering::Relaxed);
            if raw != 0 {
                return TimerId(raw);
            }
        }
    }

    /// Create an id from a raw value
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        TimerId(raw)
    }

    /// Get the raw u32 value
    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Check if this is the NONE sentinel
    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Check if this is a valid timer id
    #[inline]
    pub const fn is_some(self) -> bool {
        self.0 != 0
    }
}

impl Default for TimerId {
    fn default() -> Self {
        TimerId::NONE
    }
}

impl fmt::Debug for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "TimerId(NONE)")
        } else {
            write!(f, "TimerId({})", self.0)
        }
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "none")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_is_unique_and_nonzero() {
        let ids: Vec<_> = (0..1000).map(|_| TimerId::next()).collect();
        let unique: std::collections::HashSet<_> = ids.iter().collect();
        assert_eq!(ids.len(), unique.len());
        assert!(ids.iter().all(|id| id.is_some()));
    }

    #[test]
    fn test_none_sentinel() {
        let none = TimerId::NONE;
        assert!(none.is_none());
        assert!(!none.is_some());
        assert_eq!(none.as_u32(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", TimerId::NONE), "none");
        assert_eq!(format!("{}", TimerId::from_raw(42)), "42");
        assert_eq!(format!("{:?}", TimerId::from_raw(42)), "TimerId(42)");
    }
}
