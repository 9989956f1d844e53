//! Platform performance counter and timer-resolution shims
//!
//! `counter()` is a monotonic integer tick count, `frequency()` its fixed
//! rate in ticks per second. The clock module rescales these to
//! nanoseconds; nothing else should read the counter directly.
//!
//! `set_system_timer_resolution(ms)` asks the OS for finer sleep
//! granularity. It is best-effort: platforms without such a knob accept
//! and ignore the request.

cfg_if::cfg_if! {
    if #[cfg(target_os = "linux")] {
        mod linux;
        pub(crate) use linux::{counter, frequency, set_system_timer_resolution};
    } else {
        mod fallback;
        pub(crate) use fallback::{counter, frequency, set_system_timer_resolution};
    }
}
