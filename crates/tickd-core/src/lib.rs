//! # tickd-core
//!
//! Core types for the tickd timer service.
//!
//! This crate is platform-agnostic and contains no OS-specific code.
//! Everything that talks to the operating system lives in `tickd-runtime`.
//!
//! ## Modules
//!
//! - `id` - Timer identifier type and its allocator
//! - `error` - Error types
//! - `hints` - Key/value hint registry with change callbacks
//! - `tlog` - Kernel-style debug printing macros

pub mod error;
pub mod hints;
pub mod id;
pub mod tlog;

// Re-exports for convenience
pub use error::{TimerError, TimerResult};
pub use hints::{get_hint, set_hint, unwatch_hint, watch_hint, HintWatchId};
pub use id::TimerId;
pub use tlog::LogLevel;
