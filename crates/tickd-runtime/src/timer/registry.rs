//! Public id -> timer lookup
//!
//! Resolves a caller-held id to the record's shared state for
//! cancellation. An entry exists exactly while its id may be handed back
//! to a caller as live; removing the entry is the linearization point of
//! cancellation. The map mutex is held only across single map
//! operations and never while running callbacks.

use std::collections::HashMap;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};

use tickd_core::{TimerError, TimerId, TimerResult};

use super::entry::TimerShared;

pub(crate) struct TimerRegistry {
    map: Mutex<HashMap<TimerId, Arc<TimerShared>>>,
}

impl TimerRegistry {
    pub(crate) fn new() -> Self {
        TimerRegistry {
            map: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn insert(&self, shared: Arc<TimerShared>) {
        self.map.lock().unwrap().insert(shared.id, shared);
    }

    /// Cancel `id`: unlink its entry and mark the record canceled
    ///
    /// Succeeds only when the entry existed and `canceled` transitioned
    /// false to true; a record that already stopped (self-stop or a
    /// racing removal) reports `AlreadyCanceled`.
    pub(crate) fn remove(&self, id: TimerId) -> TimerResult<()> {
        if id.is_none() {
            return Err(TimerError::InvalidId);
        }
        let shared = self
            .map
            .lock()
            .unwrap()
            .remove(&id)
            .ok_or(TimerError::NotFound)?;
        if shared.canceled.swap(true, Ordering::AcqRel) {
            return Err(TimerError::AlreadyCanceled);
        }
        Ok(())
    }

    /// Drop a lingering entry during record reuse
    ///
    /// Reuse must not leave a stale id aliasing the refilled record.
    /// Returns true if an entry was dropped.
    pub(crate) fn forget(&self, id: TimerId) -> bool {
        match self.map.lock().unwrap().remove(&id) {
            Some(shared) => {
                shared.canceled.store(true, Ordering::Release);
                true
            }
            None => false,
        }
    }

    pub(crate) fn clear(&self) {
        self.map.lock().unwrap().clear();
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.map.lock().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh_entry(registry: &TimerRegistry) -> TimerId {
        let id = TimerId::next();
        registry.insert(TimerShared::new(id));
        id
    }

    #[test]
    fn test_remove_live_entry() {
        let registry = TimerRegistry::new();
        let id = fresh_entry(&registry);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.remove(id), Ok(()));
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_remove_twice_reports_not_found() {
        let registry = TimerRegistry::new();
        let id = fresh_entry(&registry);
        assert_eq!(registry.remove(id), Ok(()));
        assert_eq!(registry.remove(id), Err(TimerError::NotFound));
    }

    #[test]
    fn test_remove_zero_id_rejected() {
        let registry = TimerRegistry::new();
        fresh_entry(&registry);
        assert_eq!(registry.remove(TimerId::NONE), Err(TimerError::InvalidId));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_already_canceled() {
        let registry = TimerRegistry::new();
        let id = TimerId::next();
        let shared = TimerShared::new(id);
        shared.canceled.store(true, Ordering::Release);
        registry.insert(shared);
        assert_eq!(registry.remove(id), Err(TimerError::AlreadyCanceled));
    }

    #[test]
    fn test_forget() {
        let registry = TimerRegistry::new();
        let id = fresh_entry(&registry);
        assert!(registry.forget(id));
        assert!(!registry.forget(id));
    }
}
