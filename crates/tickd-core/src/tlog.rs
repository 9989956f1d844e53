//! Kernel-style print macros for tickd
//!
//! Thread-safe debug output on stderr with a level filter configured from
//! the environment. The worker thread and lifecycle paths use these; a
//! disabled level costs one relaxed atomic load.
//!
//! # Environment Variables
//!
//! - `TICKD_LOG_LEVEL` - a digit 0-5 or a level name (`off`, `error`,
//!   `warn`, `info`, `debug`, `trace`); default `info`
//! - `TICKD_LOG_FLUSH=1` - Flush stderr after each line
//!
//! # Output Format
//!
//! `[LEVEL] [tickd:<thread-name>] message`
//!
//! # Usage
//!
//! ```ignore
//! use tickd_core::{tdebug, tinfo, twarn, terror};
//!
//! tdebug!("timer {} rescheduled in {}ns", id, interval);
//! tinfo!("timer worker started");
//! ```

use std::fmt;
use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Once;

/// Log levels (matches common conventions)
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Off = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl LogLevel {
    pub fn from_u8(v: u8) -> Self {
        match v {
            0 => LogLevel::Off,
            1 => LogLevel::Error,
            2 => LogLevel::Warn,
            3 => LogLevel::Info,
            4 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }

    /// Parse a `TICKD_LOG_LEVEL` value: a digit or a level name.
    /// Anything unrecognized falls back to `Info`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "off" => LogLevel::Off,
            "error" => LogLevel::Error,
            "warn" => LogLevel::Warn,
            "info" => LogLevel::Info,
            "debug" => LogLevel::Debug,
            "trace" => LogLevel::Trace,
            digit => match digit.parse::<u8>() {
                Ok(v) if v <= LogLevel::Trace as u8 => LogLevel::from_u8(v),
                _ => LogLevel::Info,
            },
        }
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            LogLevel::Off => "",
            LogLevel::Error => "[ERROR]",
            LogLevel::Warn => "[WARN] ",
            LogLevel::Info => "[INFO] ",
            LogLevel::Debug => "[DEBUG]",
            LogLevel::Trace => "[TRACE]",
        }
    }
}

static LOG_LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Info as u8);
static FLUSH_ENABLED: AtomicBool = AtomicBool::new(false);
static INIT: Once = Once::new();

fn ensure_init() {
    INIT.call_once(|| {
        let level = match std::env::var("TICKD_LOG_LEVEL") {
            Ok(raw) => LogLevel::parse(&raw),
            Err(_) => LogLevel::Info,
        };
        LOG_LEVEL.store(level as u8, Ordering::Relaxed);

        let flush = matches!(
            std::env::var("TICKD_LOG_FLUSH").as_deref().map(str::trim),
            Ok("1")
        );
        FLUSH_ENABLED.store(flush, Ordering::Relaxed);
    });
}

/// Override the level filter at runtime
pub fn set_log_level(level: LogLevel) {
    ensure_init();
    LOG_LEVEL.store(level as u8, Ordering::Relaxed);
}

/// Check whether a level would currently be emitted
#[inline]
pub fn enabled(level: LogLevel) -> bool {
    ensure_init();
    level as u8 <= LOG_LEVEL.load(Ordering::Relaxed)
}

/// Emit one line at the given level. Prefer the macros.
pub fn log(level: LogLevel, args: fmt::Arguments<'_>) {
    if !enabled(level) {
        return;
    }
    let thread = std::thread::current();
    let name = thread.name().unwrap_or("?").to_string();
    let stderr = std::io::stderr();
    let mut out = stderr.lock();
    let _ = writeln!(out, "{} [tickd:{}] {}", level.prefix(), name, args);
    if FLUSH_ENABLED.load(Ordering::Relaxed) {
        let _ = out.flush();
    }
}

#[macro_export]
macro_rules! terror {
    ($($arg:tt)*) => {
        $crate::tlog::log($crate::tlog::LogLevel::Error, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! twarn {
    ($($arg:tt)*) => {
        $crate::tlog::log($crate::tlog::LogLevel::Warn, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! tinfo {
    ($($arg:tt)*) => {
        $crate::tlog::log($crate::tlog::LogLevel::Info, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! tdebug {
    ($($arg:tt)*) => {
        $crate::tlog::log($crate::tlog::LogLevel::Debug, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! ttrace {
    ($($arg:tt)*) => {
        $crate::tlog::log($crate::tlog::LogLevel::Trace, format_args!($($arg)*))
    };
}
