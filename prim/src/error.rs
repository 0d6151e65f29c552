//! Error types for primitive codec operations.

use std::fmt;

/// Result type for primitive codec operations.
pub type PrimResult<T> = Result<T, PrimError>;

/// Errors that can occur during fixed-width encoding/decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimError {
    /// The buffer does not hold enough bytes for the requested operation.
    EndOfBuffer {
        /// Number of bytes required.
        needed: usize,
        /// Number of bytes available.
        available: usize,
    },
}

impl fmt::Display for PrimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndOfBuffer { needed, available } => {
                write!(
                    f,
                    "needed {needed} bytes but only {available} bytes available"
                )
            }
        }
    }
}

impl std::error::Error for PrimError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_end_of_buffer() {
        let err = PrimError::EndOfBuffer {
            needed: 8,
            available: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("8 bytes"), "should mention needed bytes");
        assert!(msg.contains("3 bytes"), "should mention available bytes");
    }
}
