//! Error types for codec operations.

use std::fmt;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while reading or writing a record.
///
/// All outcomes are returned, never thrown: reads fail without exposing a
/// partial value, and write failures report how many bytes made it out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The source ended before the current field's bytes.
    ShortRead {
        /// Offset of the field that could not be read.
        offset: usize,
        /// Bytes the field required.
        needed: usize,
        /// Bytes left in the source.
        available: usize,
    },

    /// A remaining-bytes field held fewer than its minimum element count.
    RemainingUnderflow {
        field: String,
        min_elements: usize,
        available_elements: usize,
    },

    /// A checked enum field decoded to an unknown bit pattern.
    UnknownEnumValue { field: String, raw: u64 },

    /// A count field's decoded value cannot index a collection.
    ///
    /// `value` carries the offending value exactly, whether it was negative
    /// or merely too large for the address space.
    InvalidCountValue { field: String, value: i128 },

    /// The destination filled up before the current field's bytes.
    ///
    /// `written` bytes were produced before the failure; destination content
    /// beyond that point is unspecified.
    DestinationFull {
        written: usize,
        needed: usize,
        available: usize,
    },

    /// A collection's length disagrees with its declared or referenced
    /// count. This is an invariant violation in the caller's value, caught
    /// before any element is serialized.
    CountMismatch {
        field: String,
        stored: u64,
        actual: usize,
    },

    /// The value's shape does not match the record layout.
    ValueMismatch { field: String },
}

impl CodecError {
    /// Shifts buffer positions by `base`, re-framing an error from a nested
    /// record into the outer record's coordinates.
    #[must_use]
    pub(crate) fn rebase(self, base: usize) -> Self {
        match self {
            Self::ShortRead {
                offset,
                needed,
                available,
            } => Self::ShortRead {
                offset: offset + base,
                needed,
                available,
            },
            Self::DestinationFull {
                written,
                needed,
                available,
            } => Self::DestinationFull {
                written: written + base,
                needed,
                available,
            },
            other => other,
        }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShortRead {
                offset,
                needed,
                available,
            } => {
                write!(
                    f,
                    "source too short at offset {offset}: field needs {needed} bytes, {available} available"
                )
            }
            Self::RemainingUnderflow {
                field,
                min_elements,
                available_elements,
            } => {
                write!(
                    f,
                    "field `{field}` requires at least {min_elements} elements, source holds {available_elements}"
                )
            }
            Self::UnknownEnumValue { field, raw } => {
                write!(f, "field `{field}` decoded unknown enum value {raw}")
            }
            Self::InvalidCountValue { field, value } => {
                write!(f, "count field `{field}` holds unusable value {value}")
            }
            Self::DestinationFull {
                written,
                needed,
                available,
            } => {
                write!(
                    f,
                    "destination full after {written} bytes: field needs {needed} bytes, {available} available"
                )
            }
            Self::CountMismatch {
                field,
                stored,
                actual,
            } => {
                write!(
                    f,
                    "field `{field}` holds {actual} elements but its count says {stored}"
                )
            }
            Self::ValueMismatch { field } => {
                write!(f, "value shape does not match layout at `{field}`")
            }
        }
    }
}

impl std::error::Error for CodecError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_short_read() {
        let err = CodecError::ShortRead {
            offset: 4,
            needed: 8,
            available: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("offset 4"));
        assert!(msg.contains("8 bytes"));
        assert!(msg.contains('2'));
    }

    #[test]
    fn error_display_count_mismatch() {
        let err = CodecError::CountMismatch {
            field: "data".into(),
            stored: 2,
            actual: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("`data`"));
        assert!(msg.contains('2'));
        assert!(msg.contains('3'));
    }

    #[test]
    fn error_display_invalid_count_keeps_exact_value() {
        let err = CodecError::InvalidCountValue {
            field: "n".into(),
            value: i128::from(u64::MAX),
        };
        assert!(err.to_string().contains("18446744073709551615"));
        let err = CodecError::InvalidCountValue {
            field: "n".into(),
            value: -1,
        };
        assert!(err.to_string().contains("-1"));
    }

    #[test]
    fn rebase_shifts_read_offset() {
        let err = CodecError::ShortRead {
            offset: 1,
            needed: 2,
            available: 0,
        };
        assert_eq!(
            err.rebase(10),
            CodecError::ShortRead {
                offset: 11,
                needed: 2,
                available: 0
            }
        );
    }

    #[test]
    fn rebase_shifts_written_bytes() {
        let err = CodecError::DestinationFull {
            written: 3,
            needed: 4,
            available: 1,
        };
        assert_eq!(
            err.rebase(5),
            CodecError::DestinationFull {
                written: 8,
                needed: 4,
                available: 1
            }
        );
    }

    #[test]
    fn rebase_leaves_other_variants_alone() {
        let err = CodecError::UnknownEnumValue {
            field: "kind".into(),
            raw: 9,
        };
        assert_eq!(err.clone().rebase(100), err);
    }
}
