//! Key/value hint registry with change-callback subscription
//!
//! Hints are named string values used for runtime configuration. A hint
//! that has never been set explicitly falls back to the environment
//! variable of the same name, so `TICKD_TIMER_RESOLUTION=2` in the
//! environment and `set_hint("TICKD_TIMER_RESOLUTION", "2")` in code are
//! equivalent.
//!
//! Watchers registered with [`watch_hint`] are invoked once at
//! registration with the current value, and again on every change.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

/// Callback invoked with (name, old value, new value)
pub type HintCallback = Arc<dyn Fn(&str, Option<&str>, Option<&str>) + Send + Sync>;

/// Handle identifying a registered hint watcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HintWatchId(u64);

impl HintWatchId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        HintWatchId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Default)]
struct HintEntry {
    /// Explicitly set value; `None` means "fall back to the environment"
    value: Option<String>,
    watchers: Vec<(HintWatchId, HintCallback)>,
}

fn registry() -> &'static Mutex<HashMap<String, HintEntry>> {
    static HINTS: OnceLock<Mutex<HashMap<String, HintEntry>>> = OnceLock::new();
    HINTS.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Get the current value of a hint
///
/// An explicitly set value wins; otherwise the environment variable of
/// the same name is consulted. Returns `None` when neither is present.
pub fn get_hint(name: &str) -> Option<String> {
    let map = registry().lock().unwrap();
    if let Some(entry) = map.get(name) {
        if let Some(value) = &entry.value {
            return Some(value.clone());
        }
    }
    drop(map);
    std::env::var(name).ok()
}

/// Set a hint to a new value
///
/// Returns true if the stored value changed. Watchers of this hint are
/// notified with the old and new values; callbacks run outside the
/// registry lock, so they may freely call back into this module.
pub fn set_hint(name: &str, value: &str) -> bool {
    let (old, watchers) = {
        let mut map = registry().lock().unwrap();
        let entry = map.entry(name.to_string()).or_default();
        if entry.value.as_deref() == Some(value) {
            return false;
        }
        let old = entry.value.replace(value.to_string());
        let watchers: Vec<HintCallback> =
            entry.watchers.iter().map(|(_, cb)| cb.clone()).collect();
        (old, watchers)
    };
    for cb in watchers {
        cb(name, old.as_deref(), Some(value));
    }
    true
}

/// Register a watcher for a hint
///
/// The callback is invoked immediately with the hint's current value
/// (old = `None`), then on every subsequent [`set_hint`] that changes it.
pub fn watch_hint<F>(name: &str, callback: F) -> HintWatchId
where
    F: Fn(&str, Option<&str>, Option<&str>) + Send + Sync + 'static,
{
    let id = HintWatchId::next();
    let cb: HintCallback = Arc::new(callback);
    {
        let mut map = registry().lock().unwrap();
        let entry = map.entry(name.to_string()).or_default();
        entry.watchers.push((id, cb.clone()));
    }
    let current = get_hint(name);
    cb(name, None, current.as_deref());
    id
}

/// Remove a previously registered watcher
///
/// Returns true if the watcher was found.
pub fn unwatch_hint(name: &str, id: HintWatchId) -> bool {
    let mut map = registry().lock().unwrap();
    match map.get_mut(name) {
        Some(entry) => {
            let before = entry.watchers.len();
            entry.watchers.retain(|(wid, _)| *wid != id);
            entry.watchers.len() != before
        }
        None => false,
    }
}
