//! Schema validation and layout resolution errors.

use std::fmt;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur while resolving a record layout.
///
/// Resolution happens once per record type; any of these prevents a codec
/// from ever being produced for that record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A record declared no fields.
    EmptyRecord {
        /// Name of the offending record.
        record: String,
    },

    /// Two fields in the same record share a name.
    DuplicateFieldName { record: String, field: String },

    /// A count reference names an unknown, later, or non-integral field.
    UnresolvedCountReference {
        /// Field carrying the directive.
        field: String,
        /// Name the directive references.
        referenced: String,
    },

    /// A remaining-bytes directive is not on the final field, or appears
    /// more than once.
    InvalidRemainingPlacement { field: String },

    /// More than one directive on a field, or a directive that does not
    /// apply to the field's semantic type.
    ConflictingDirectives { field: String },

    /// A byte-length override is not a supported storage width.
    UnsupportedByteLength { field: String, length: usize },

    /// An array field has no count or remaining directive.
    MissingCountDirective { field: String },

    /// An array's element type has no statically known size.
    UnsizedArrayElement { field: String },

    /// A field's fixed size, or the record's total, overflows the address
    /// space.
    UnrepresentableSize { field: String },

    /// A record (transitively) contains a record with its own name, so its
    /// size can never be resolved.
    UnresolvableSelfReference { record: String },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyRecord { record } => {
                write!(f, "record `{record}` has no fields")
            }
            Self::DuplicateFieldName { record, field } => {
                write!(f, "record `{record}` declares field `{field}` twice")
            }
            Self::UnresolvedCountReference { field, referenced } => {
                write!(
                    f,
                    "field `{field}` references `{referenced}`, which is not an earlier integral field"
                )
            }
            Self::InvalidRemainingPlacement { field } => {
                write!(
                    f,
                    "remaining-bytes field `{field}` must be the final field and appear at most once"
                )
            }
            Self::ConflictingDirectives { field } => {
                write!(f, "field `{field}` carries conflicting layout directives")
            }
            Self::UnsupportedByteLength { field, length } => {
                write!(
                    f,
                    "field `{field}` requests unsupported byte length {length}"
                )
            }
            Self::MissingCountDirective { field } => {
                write!(f, "array field `{field}` has no count directive")
            }
            Self::UnsizedArrayElement { field } => {
                write!(
                    f,
                    "array field `{field}` has elements without a static size"
                )
            }
            Self::UnrepresentableSize { field } => {
                write!(
                    f,
                    "field `{field}` makes the record size unrepresentable"
                )
            }
            Self::UnresolvableSelfReference { record } => {
                write!(f, "record `{record}` contains itself and has no resolvable size")
            }
        }
    }
}

impl std::error::Error for SchemaError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_unresolved_reference() {
        let err = SchemaError::UnresolvedCountReference {
            field: "data".into(),
            referenced: "len".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("`data`"), "should name the field");
        assert!(msg.contains("`len`"), "should name the reference");
    }

    #[test]
    fn error_display_self_reference() {
        let err = SchemaError::UnresolvableSelfReference {
            record: "node".into(),
        };
        assert!(err.to_string().contains("`node`"));
    }

    #[test]
    fn error_display_unrepresentable_size() {
        let err = SchemaError::UnrepresentableSize {
            field: "data".into(),
        };
        assert!(err.to_string().contains("`data`"));
    }

    #[test]
    fn error_display_byte_length() {
        let err = SchemaError::UnsupportedByteLength {
            field: "flags".into(),
            length: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("`flags`"));
        assert!(msg.contains('3'));
    }
}
