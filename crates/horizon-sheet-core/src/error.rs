//! Errors raised by the signal and timer plumbing.
//!
//! These only surface through the explicit `try_*` and guard APIs; the sheet
//! itself treats a stale timer or connection as already handled.

use std::fmt;

use crate::signal::ConnectionId;
use crate::timer::TimerId;

/// Any core failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    Timer(TimerError),
    Signal(SignalError),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timer(err) => write!(f, "timer: {err}"),
            Self::Signal(err) => write!(f, "signal: {err}"),
        }
    }
}

impl std::error::Error for CoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Timer(err) => Some(err),
            Self::Signal(err) => Some(err),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// The timer already fired or was stopped.
    InvalidTimerId(TimerId),
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTimerId(id) => write!(f, "no pending timer {id:?}"),
        }
    }
}

impl std::error::Error for TimerError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    /// The slot was never connected or is already disconnected.
    InvalidConnection(ConnectionId),
    /// A guard outlived the signal it was connected to.
    SignalDropped,
}

impl fmt::Display for SignalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConnection(id) => write!(f, "no connected slot {id:?}"),
            Self::SignalDropped => f.write_str("signal no longer exists"),
        }
    }
}

impl std::error::Error for SignalError {}

impl From<TimerError> for CoreError {
    fn from(err: TimerError) -> Self {
        Self::Timer(err)
    }
}

impl From<SignalError> for CoreError {
    fn from(err: SignalError) -> Self {
        Self::Signal(err)
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::KeyData;

    #[test]
    fn test_display_names_the_subsystem() {
        let timer = TimerId::from(KeyData::from_ffi(1));
        let err: CoreError = TimerError::InvalidTimerId(timer).into();
        assert!(err.to_string().starts_with("timer: no pending timer"));

        let err: CoreError = SignalError::SignalDropped.into();
        assert_eq!(err.to_string(), "signal: signal no longer exists");
        assert!(std::error::Error::source(&err).is_some());
    }
}
