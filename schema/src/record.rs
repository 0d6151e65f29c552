//! Record definitions.

use std::sync::Arc;

use crate::field::FieldSpec;

/// An ordered record of named fields.
///
/// Field order is serialization order; the stream carries no field tags.
/// Construction is unchecked; invariants are enforced once by
/// [`resolve`](crate::resolve), which every codec goes through.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecordSpec {
    pub name: String,
    pub fields: Vec<FieldSpec>,
}

impl RecordSpec {
    /// Creates a record from a field list.
    #[must_use]
    pub fn new(name: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Creates a record builder.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> RecordBuilder {
        RecordBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Returns the declaration index of the named field, if present.
    #[must_use]
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }
}

/// Builder for [`RecordSpec`].
#[derive(Debug)]
pub struct RecordBuilder {
    name: String,
    fields: Vec<FieldSpec>,
}

impl RecordBuilder {
    /// Adds a field definition.
    #[must_use]
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Builds the record and wraps it for sharing.
    #[must_use]
    pub fn build(self) -> Arc<RecordSpec> {
        Arc::new(RecordSpec {
            name: self.name,
            fields: self.fields,
        })
    }
}
