//! Field type and layout directive definitions.

use std::sync::Arc;

use prim::IntWidth;

use crate::record::RecordSpec;

/// Whether an integer field carries a sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Signedness {
    /// Unsigned two's-complement storage.
    Unsigned,
    /// Signed two's-complement storage.
    Signed,
}

/// A fixed-width integer type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntType {
    /// Natural storage width.
    pub width: IntWidth,
    /// Signedness of the stored value.
    pub signedness: Signedness,
}

impl IntType {
    /// Creates an integer type from width and signedness.
    #[must_use]
    pub const fn new(width: IntWidth, signedness: Signedness) -> Self {
        Self { width, signedness }
    }

    /// Unsigned 8-bit integer.
    #[must_use]
    pub const fn u8() -> Self {
        Self::new(IntWidth::W8, Signedness::Unsigned)
    }

    /// Unsigned 16-bit integer.
    #[must_use]
    pub const fn u16() -> Self {
        Self::new(IntWidth::W16, Signedness::Unsigned)
    }

    /// Unsigned 32-bit integer.
    #[must_use]
    pub const fn u32() -> Self {
        Self::new(IntWidth::W32, Signedness::Unsigned)
    }

    /// Unsigned 64-bit integer.
    #[must_use]
    pub const fn u64() -> Self {
        Self::new(IntWidth::W64, Signedness::Unsigned)
    }

    /// Signed 8-bit integer.
    #[must_use]
    pub const fn i8() -> Self {
        Self::new(IntWidth::W8, Signedness::Signed)
    }

    /// Signed 16-bit integer.
    #[must_use]
    pub const fn i16() -> Self {
        Self::new(IntWidth::W16, Signedness::Signed)
    }

    /// Signed 32-bit integer.
    #[must_use]
    pub const fn i32() -> Self {
        Self::new(IntWidth::W32, Signedness::Signed)
    }

    /// Signed 64-bit integer.
    #[must_use]
    pub const fn i64() -> Self {
        Self::new(IntWidth::W64, Signedness::Signed)
    }
}

/// Accepted bit patterns for an enum field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EnumVariants {
    /// Any bit pattern passes through unchecked.
    Open,
    /// Only the listed backing values decode successfully.
    Known(Vec<u64>),
}

/// An enum backed by a fixed-width unsigned integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnumType {
    /// Width of the backing integer.
    pub backing: IntWidth,
    /// Accepted variants.
    pub variants: EnumVariants,
}

impl EnumType {
    /// Creates an open enum: unknown bit patterns are passed through.
    #[must_use]
    pub const fn open(backing: IntWidth) -> Self {
        Self {
            backing,
            variants: EnumVariants::Open,
        }
    }

    /// Creates a checked enum: only `variants` decode successfully.
    #[must_use]
    pub const fn known(backing: IntWidth, variants: Vec<u64>) -> Self {
        Self {
            backing,
            variants: EnumVariants::Known(variants),
        }
    }

    /// Returns `true` if `raw` is an accepted bit pattern.
    #[must_use]
    pub fn accepts(&self, raw: u64) -> bool {
        match &self.variants {
            EnumVariants::Open => true,
            EnumVariants::Known(values) => values.contains(&raw),
        }
    }
}

/// The element type of an array field.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ElementType {
    /// Fixed-width integer elements.
    Int(IntType),
    /// Enum elements at their backing width.
    Enum(EnumType),
    /// Nested record elements (must resolve to a static size).
    Record(Arc<RecordSpec>),
}

/// The semantic type of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SemanticType {
    /// A fixed-width integer.
    Int(IntType),
    /// An enum at its backing integer width.
    Enum(EnumType),
    /// A nested record, serialized inline.
    Record(Arc<RecordSpec>),
    /// An ordered sequence of elements; the count comes from a layout
    /// directive, never from the stream itself.
    Array(ElementType),
}

/// Where an array field's element count comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CountSource {
    /// A fixed element count.
    Constant(usize),
    /// The decoded value of an earlier integral field.
    FieldRef(String),
}

/// A per-field layout directive.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LayoutDirective {
    /// Overrides the natural storage width of an integer or enum field.
    ByteLength(usize),
    /// Gives an array field its element count.
    Count(CountSource),
    /// Marks an array field as consuming all bytes left in the source.
    Remaining {
        /// Minimum number of elements that must be present on read.
        min_elements: usize,
    },
}

/// Field definition within a record.
///
/// Directives accumulate through the builder methods; the resolver rejects
/// fields carrying more than one.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldSpec {
    pub name: String,
    pub ty: SemanticType,
    pub directives: Vec<LayoutDirective>,
}

impl FieldSpec {
    /// Creates a field with no layout directives.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: SemanticType) -> Self {
        Self {
            name: name.into(),
            ty,
            directives: Vec::new(),
        }
    }

    /// Overrides the stored width of an integer or enum field.
    #[must_use]
    pub fn byte_length(mut self, length: usize) -> Self {
        self.directives.push(LayoutDirective::ByteLength(length));
        self
    }

    /// Sets a constant element count for an array field.
    #[must_use]
    pub fn count(mut self, count: usize) -> Self {
        self.directives
            .push(LayoutDirective::Count(CountSource::Constant(count)));
        self
    }

    /// Takes the element count from an earlier integral field.
    #[must_use]
    pub fn count_field(mut self, name: impl Into<String>) -> Self {
        self.directives
            .push(LayoutDirective::Count(CountSource::FieldRef(name.into())));
        self
    }

    /// Consumes all remaining source bytes, requiring at least
    /// `min_elements` complete elements.
    #[must_use]
    pub fn remaining(mut self, min_elements: usize) -> Self {
        self.directives
            .push(LayoutDirective::Remaining { min_elements });
        self
    }

    /// Returns `true` if the field's semantic type is integral.
    #[must_use]
    pub const fn is_integral(&self) -> bool {
        matches!(self.ty, SemanticType::Int(_))
    }
}
