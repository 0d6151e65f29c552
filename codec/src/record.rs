//! Record codec synthesis.
//!
//! A [`RecordCodec`] binds one resolved layout to the four record
//! operations: `byte_count`, `try_read_le`/`try_read_be` and
//! `write_le`/`write_be`. Codecs are stateless and reentrant; every call
//! touches only its own buffer slice and local state.

use std::sync::Arc;

use prim::{ByteOrder, IntWidth, PrimError};
use schema::{
    resolve, CountShape, ElementKind, ElementShape, FieldShape, RecordSpec, ResolvedField,
    ResolvedLayout, SchemaResult, Signedness,
};

use crate::error::{CodecError, CodecResult};
use crate::value::{FieldValue, RecordValue};

/// A successful read: the assembled value and the bytes it consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub value: RecordValue,
    pub bytes_read: usize,
}

/// Bidirectional codec for one record layout.
#[derive(Debug, Clone)]
pub struct RecordCodec {
    layout: Arc<ResolvedLayout>,
}

impl RecordCodec {
    /// Creates a codec from an already-resolved layout.
    #[must_use]
    pub const fn new(layout: Arc<ResolvedLayout>) -> Self {
        Self { layout }
    }

    /// Resolves `spec` and creates its codec in one step.
    pub fn from_spec(spec: &RecordSpec) -> SchemaResult<Self> {
        Ok(Self::new(resolve(spec)?))
    }

    /// The resolved layout this codec serves.
    #[must_use]
    pub const fn layout(&self) -> &Arc<ResolvedLayout> {
        &self.layout
    }

    /// Encoded size of the record if it is the same for every value.
    #[must_use]
    pub fn static_size(&self) -> Option<usize> {
        self.layout.static_size
    }

    /// Number of bytes `value` occupies once serialized.
    ///
    /// Defined for values whose shape matches the layout; mismatches are
    /// reported by the write operations, not here.
    #[must_use]
    pub fn byte_count(&self, value: &RecordValue) -> usize {
        byte_count(&self.layout, value)
    }

    /// Decodes a record from the front of `source`, little-endian.
    pub fn try_read_le(&self, source: &[u8]) -> CodecResult<Decoded> {
        read_record(&self.layout, source, ByteOrder::Little)
    }

    /// Decodes a record from the front of `source`, big-endian.
    pub fn try_read_be(&self, source: &[u8]) -> CodecResult<Decoded> {
        read_record(&self.layout, source, ByteOrder::Big)
    }

    /// Encodes `value` into the front of `destination`, little-endian.
    ///
    /// Returns the bytes written. On [`CodecError::DestinationFull`] the
    /// error carries the bytes written before capacity ran out; destination
    /// content beyond that point is unspecified.
    pub fn write_le(&self, value: &RecordValue, destination: &mut [u8]) -> CodecResult<usize> {
        write_record(&self.layout, value, destination, ByteOrder::Little)
    }

    /// Encodes `value` into the front of `destination`, big-endian.
    pub fn write_be(&self, value: &RecordValue, destination: &mut [u8]) -> CodecResult<usize> {
        write_record(&self.layout, value, destination, ByteOrder::Big)
    }
}

fn byte_count(layout: &ResolvedLayout, value: &RecordValue) -> usize {
    layout
        .fields
        .iter()
        .zip(&value.fields)
        .map(|(field, fv)| match (&field.shape, fv) {
            (FieldShape::Int { stored, .. } | FieldShape::Enum { stored, .. }, _) => stored.bytes(),
            (FieldShape::Record(nested), FieldValue::Record(inner)) => byte_count(nested, inner),
            (FieldShape::Record(nested), _) => nested.static_size.unwrap_or(0),
            (FieldShape::Array { element, .. }, FieldValue::Array(items)) => {
                element.size * items.len()
            }
            (FieldShape::Array { .. }, _) => 0,
        })
        .sum()
}

fn read_record(layout: &ResolvedLayout, src: &[u8], order: ByteOrder) -> CodecResult<Decoded> {
    let mut offset = 0usize;
    let mut fields = Vec::with_capacity(layout.fields.len());

    for field in &layout.fields {
        let value = match &field.shape {
            FieldShape::Int { ty, stored } => {
                let value = read_int(src, offset, *stored, ty.signedness, order)?;
                offset += stored.bytes();
                value
            }
            FieldShape::Enum { ty, stored } => {
                let raw = read_unsigned_at(src, offset, *stored, order)?;
                if !ty.accepts(raw) {
                    return Err(CodecError::UnknownEnumValue {
                        field: field.name.clone(),
                        raw,
                    });
                }
                offset += stored.bytes();
                FieldValue::Enum(raw)
            }
            FieldShape::Record(nested) => {
                let inner =
                    read_record(nested, &src[offset..], order).map_err(|e| e.rebase(offset))?;
                offset += inner.bytes_read;
                FieldValue::Record(inner.value)
            }
            FieldShape::Array { element, count } => {
                let count = element_count(field, count, &fields, src.len(), offset, element.size)?;
                // Compare in element units so a hostile count cannot overflow
                // the byte arithmetic.
                let available = src.len() - offset;
                if count > available / element.size {
                    return Err(CodecError::ShortRead {
                        offset,
                        needed: count.saturating_mul(element.size),
                        available,
                    });
                }
                let size = count * element.size;
                let items = read_elements(field, element, count, &src[offset..offset + size], order)
                    .map_err(|e| e.rebase(offset))?;
                offset += size;
                FieldValue::Array(items)
            }
        };
        fields.push(value);
    }

    Ok(Decoded {
        value: RecordValue::new(fields),
        bytes_read: offset,
    })
}

/// Determines an array field's element count from its resolved count shape.
fn element_count(
    field: &ResolvedField,
    count: &CountShape,
    decoded: &[FieldValue],
    src_len: usize,
    offset: usize,
    element_size: usize,
) -> CodecResult<usize> {
    match count {
        CountShape::Constant(count) => Ok(*count),
        CountShape::FieldIndex(index) => {
            decoded[*index]
                .as_count()
                .ok_or_else(|| CodecError::InvalidCountValue {
                    field: field.name.clone(),
                    value: count_payload(&decoded[*index]),
                })
        }
        CountShape::Remaining { min_elements } => {
            let available = (src_len - offset) / element_size;
            if available < *min_elements {
                return Err(CodecError::RemainingUnderflow {
                    field: field.name.clone(),
                    min_elements: *min_elements,
                    available_elements: available,
                });
            }
            Ok(available)
        }
    }
}

/// The exact value behind an unusable count, for error reporting.
fn count_payload(value: &FieldValue) -> i128 {
    match value {
        FieldValue::Unsigned(v) => i128::from(*v),
        FieldValue::Signed(v) => i128::from(*v),
        _ => 0,
    }
}

/// Decodes `count` elements from a slice sized exactly for them.
fn read_elements(
    field: &ResolvedField,
    element: &ElementShape,
    count: usize,
    src: &[u8],
    order: ByteOrder,
) -> CodecResult<Vec<FieldValue>> {
    let mut items = Vec::with_capacity(count);
    for i in 0..count {
        let start = i * element.size;
        let value = match &element.kind {
            ElementKind::Int(ty) => read_int(src, start, ty.width, ty.signedness, order)?,
            ElementKind::Enum(ty) => {
                let raw = read_unsigned_at(src, start, ty.backing, order)?;
                if !ty.accepts(raw) {
                    return Err(CodecError::UnknownEnumValue {
                        field: field.name.clone(),
                        raw,
                    });
                }
                FieldValue::Enum(raw)
            }
            ElementKind::Record(nested) => {
                let inner = read_record(nested, &src[start..start + element.size], order)
                    .map_err(|e| e.rebase(start))?;
                FieldValue::Record(inner.value)
            }
        };
        items.push(value);
    }
    Ok(items)
}

fn read_int(
    src: &[u8],
    offset: usize,
    stored: IntWidth,
    signedness: Signedness,
    order: ByteOrder,
) -> CodecResult<FieldValue> {
    match signedness {
        Signedness::Unsigned => Ok(FieldValue::Unsigned(read_unsigned_at(
            src, offset, stored, order,
        )?)),
        Signedness::Signed => {
            let raw = read_unsigned_at(src, offset, stored, order)?;
            Ok(FieldValue::Signed(prim::sign_extend(raw, stored)))
        }
    }
}

fn read_unsigned_at(src: &[u8], offset: usize, width: IntWidth, order: ByteOrder) -> CodecResult<u64> {
    prim::read_unsigned(&src[offset..], width, order).map_err(
        |PrimError::EndOfBuffer { needed, available }| CodecError::ShortRead {
            offset,
            needed,
            available,
        },
    )
}

fn write_record(
    layout: &ResolvedLayout,
    value: &RecordValue,
    dst: &mut [u8],
    order: ByteOrder,
) -> CodecResult<usize> {
    if value.fields.len() != layout.fields.len() {
        return Err(CodecError::ValueMismatch {
            field: layout.name.clone(),
        });
    }

    let mut written = 0usize;
    for (field, fv) in layout.fields.iter().zip(&value.fields) {
        match (&field.shape, fv) {
            (
                FieldShape::Int {
                    ty:
                        schema::IntType {
                            signedness: Signedness::Unsigned,
                            ..
                        },
                    stored,
                },
                FieldValue::Unsigned(v),
            )
            | (FieldShape::Enum { stored, .. }, FieldValue::Enum(v)) => {
                write_unsigned_at(*v, *stored, order, dst, written)?;
                written += stored.bytes();
            }
            (
                FieldShape::Int {
                    ty:
                        schema::IntType {
                            signedness: Signedness::Signed,
                            ..
                        },
                    stored,
                },
                FieldValue::Signed(v),
            ) => {
                write_unsigned_at(*v as u64, *stored, order, dst, written)?;
                written += stored.bytes();
            }
            (FieldShape::Record(nested), FieldValue::Record(inner)) => {
                let n = write_record(nested, inner, &mut dst[written..], order)
                    .map_err(|e| e.rebase(written))?;
                written += n;
            }
            (FieldShape::Array { element, count }, FieldValue::Array(items)) => {
                check_write_count(field, count, value, items.len())?;
                written = write_elements(field, element, items, dst, written, order)?;
            }
            _ => {
                return Err(CodecError::ValueMismatch {
                    field: field.name.clone(),
                });
            }
        }
    }
    Ok(written)
}

/// On write, the collection length must agree with its declared or
/// referenced count; a mismatch fails before any element is serialized.
fn check_write_count(
    field: &ResolvedField,
    count: &CountShape,
    value: &RecordValue,
    actual: usize,
) -> CodecResult<()> {
    let stored = match count {
        CountShape::Constant(count) => *count,
        CountShape::FieldIndex(index) => value.fields[*index].as_count().ok_or_else(|| {
            CodecError::InvalidCountValue {
                field: field.name.clone(),
                value: count_payload(&value.fields[*index]),
            }
        })?,
        CountShape::Remaining { .. } => return Ok(()),
    };
    if stored != actual {
        return Err(CodecError::CountMismatch {
            field: field.name.clone(),
            stored: stored as u64,
            actual,
        });
    }
    Ok(())
}

fn write_elements(
    field: &ResolvedField,
    element: &ElementShape,
    items: &[FieldValue],
    dst: &mut [u8],
    mut written: usize,
    order: ByteOrder,
) -> CodecResult<usize> {
    for item in items {
        match (&element.kind, item) {
            (
                ElementKind::Int(schema::IntType {
                    signedness: Signedness::Unsigned,
                    width,
                }),
                FieldValue::Unsigned(v),
            ) => {
                write_unsigned_at(*v, *width, order, dst, written)?;
                written += width.bytes();
            }
            (
                ElementKind::Int(schema::IntType {
                    signedness: Signedness::Signed,
                    width,
                }),
                FieldValue::Signed(v),
            ) => {
                write_unsigned_at(*v as u64, *width, order, dst, written)?;
                written += width.bytes();
            }
            (ElementKind::Enum(ty), FieldValue::Enum(v)) => {
                write_unsigned_at(*v, ty.backing, order, dst, written)?;
                written += ty.backing.bytes();
            }
            (ElementKind::Record(nested), FieldValue::Record(inner)) => {
                let n = write_record(nested, inner, &mut dst[written..], order)
                    .map_err(|e| e.rebase(written))?;
                written += n;
            }
            _ => {
                return Err(CodecError::ValueMismatch {
                    field: field.name.clone(),
                });
            }
        }
    }
    Ok(written)
}

fn write_unsigned_at(
    value: u64,
    width: IntWidth,
    order: ByteOrder,
    dst: &mut [u8],
    written: usize,
) -> CodecResult<()> {
    prim::write_unsigned(value, width, order, &mut dst[written..]).map_err(
        |PrimError::EndOfBuffer { needed, available }| CodecError::DestinationFull {
            written,
            needed,
            available,
        },
    )
}
