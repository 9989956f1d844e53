//! System timer-resolution request controller
//!
//! Some platforms sleep in coarse quanta unless a finer scheduling
//! granularity is requested process-wide. The controller keeps exactly
//! one such request outstanding, sized by the `TICKD_TIMER_RESOLUTION`
//! hint (milliseconds; empty or unset means 1, zero disables). Platform
//! refusal is tolerated: the delay algorithms self-correct against
//! coarse sleeps either way.

use std::sync::{Mutex, OnceLock};

use tickd_core::{hints, tdebug};

use crate::perf;

/// Hint naming the requested timer resolution in milliseconds
pub const HINT_TIMER_RESOLUTION: &str = "TICKD_TIMER_RESOLUTION";

#[derive(Default)]
struct ResolutionState {
    requested_ms: u32,
    watch: Option<hints::HintWatchId>,
}

fn state() -> &'static Mutex<ResolutionState> {
    static STATE: OnceLock<Mutex<ResolutionState>> = OnceLock::new();
    STATE.get_or_init(|| Mutex::new(ResolutionState::default()))
}

fn parse_period(value: Option<&str>) -> u32 {
    match value {
        None => 1,
        Some(s) if s.trim().is_empty() => 1,
        Some(s) => s.trim().parse().unwrap_or(1),
    }
}

fn apply(period_ms: u32) {
    let mut st = state().lock().unwrap();
    if st.requested_ms == period_ms {
        return;
    }
    if st.requested_ms != 0 {
        // Revoke the previous request before replacing it
        perf::set_system_timer_resolution(0);
    }
    if period_ms != 0 && !perf::set_system_timer_resolution(period_ms) {
        tdebug!("timer resolution request of {}ms not honored", period_ms);
    }
    st.requested_ms = period_ms;
}

/// Install the hint watcher; the current hint value applies immediately
///
/// Called by the library lifecycle on init. Idempotent.
pub fn install() {
    {
        let st = state().lock().unwrap();
        if st.watch.is_some() {
            return;
        }
    }
    // watch_hint invokes the callback inline with the current value, so
    // the state lock must not be held across it
    let watch = hints::watch_hint(HINT_TIMER_RESOLUTION, |_, _, new| {
        apply(parse_period(new));
    });
    state().lock().unwrap().watch = Some(watch);
}

/// Remove the watcher and revoke any outstanding request
///
/// Called by the library lifecycle on quit. Idempotent.
pub fn uninstall() {
    let watch = state().lock().unwrap().watch.take();
    if let Some(watch) = watch {
        hints::unwatch_hint(HINT_TIMER_RESOLUTION, watch);
    }
    apply(0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_period_defaults() {
        assert_eq!(parse_period(None), 1);
        assert_eq!(parse_period(Some("")), 1);
        assert_eq!(parse_period(Some("  ")), 1);
        assert_eq!(parse_period(Some("garbage")), 1);
    }

    #[test]
    fn test_parse_period_values() {
        assert_eq!(parse_period(Some("0")), 0);
        assert_eq!(parse_period(Some("4")), 4);
        assert_eq!(parse_period(Some(" 15 ")), 15);
    }

    #[test]
    fn test_install_uninstall_idempotent() {
        install();
        install();
        uninstall();
        uninstall();
    }
}
