//! Shared error contract for all ring variants.
//!
//! `Full`, `Empty` and `Cancelled` are ordinary backpressure signals, not
//! failures. Callers are expected to match on them and retry, drop, or
//! back off; the benchmark harness counts them instead of aborting.

use std::error::Error;
use std::fmt;

/// Errors surfaced by ring buffer operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingError {
    /// Construction was asked for a zero-slot buffer
    InvalidCapacity,
    /// The buffer is at capacity and the policy rejects new writes
    Full,
    /// The buffer has no element to read
    Empty,
    /// A blocking call was cut short by a timeout or `close()`
    Cancelled,
}

impl fmt::Display for RingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCapacity => write!(f, "capacity must be greater than zero"),
            Self::Full => write!(f, "buffer is full"),
            Self::Empty => write!(f, "buffer is empty"),
            Self::Cancelled => write!(f, "blocking operation was cancelled"),
        }
    }
}

impl Error for RingError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(RingError::Full.to_string(), "buffer is full");
        assert_eq!(RingError::Empty.to_string(), "buffer is empty");
        assert_eq!(
            RingError::InvalidCapacity.to_string(),
            "capacity must be greater than zero"
        );
        assert_eq!(
            RingError::Cancelled.to_string(),
            "blocking operation was cancelled"
        );
    }
}
