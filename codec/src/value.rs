//! Decoded value model.

/// A field value in decoded form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Unsigned integer, widened to 64 bits.
    Unsigned(u64),
    /// Signed integer, sign-extended to 64 bits.
    Signed(i64),
    /// Enum backing value.
    Enum(u64),
    /// Nested record.
    Record(RecordValue),
    /// Array elements in stream order.
    Array(Vec<FieldValue>),
}

impl FieldValue {
    /// Interprets an integral value as an element count.
    ///
    /// Returns `None` for negative values and non-integral variants.
    #[must_use]
    pub fn as_count(&self) -> Option<usize> {
        match self {
            Self::Unsigned(value) => usize::try_from(*value).ok(),
            Self::Signed(value) => usize::try_from(*value).ok(),
            _ => None,
        }
    }
}

/// A decoded record: field values in schema declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordValue {
    pub fields: Vec<FieldValue>,
}

impl RecordValue {
    /// Creates a record value from fields in declaration order.
    #[must_use]
    pub fn new(fields: Vec<FieldValue>) -> Self {
        Self { fields }
    }
}

impl From<Vec<FieldValue>> for RecordValue {
    fn from(fields: Vec<FieldValue>) -> Self {
        Self { fields }
    }
}
