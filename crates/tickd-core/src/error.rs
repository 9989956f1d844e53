//! Error types for the tickd timer service

use core::fmt;

/// Result type for timer operations
pub type TimerResult<T> = Result<T, TimerError>;

/// Errors that can occur in timer operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerError {
    /// The zero sentinel id was passed where a live id is required
    InvalidId,

    /// No registry entry for the given id
    NotFound,

    /// The entry existed but was already canceled (callback self-stopped
    /// or a concurrent removal won)
    AlreadyCanceled,

    /// The timer service has not been initialized
    NotInitialized,

    /// Worker thread creation failed
    SpawnFailed,
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerError::InvalidId => write!(f, "invalid timer id"),
            TimerError::NotFound => write!(f, "timer not found"),
            TimerError::AlreadyCanceled => write!(f, "timer already canceled"),
            TimerError::NotInitialized => write!(f, "timer service not initialized"),
            TimerError::SpawnFailed => write!(f, "failed to spawn timer worker thread"),
        }
    }
}

impl std::error::Error for TimerError {}
