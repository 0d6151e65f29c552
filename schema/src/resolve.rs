//! Layout resolution.
//!
//! [`resolve`] walks a [`RecordSpec`] in declaration order, validates every
//! layout directive against the fields declared before it, and computes each
//! field's size policy plus the record's static-size verdict. A resolved
//! layout is immutable and is the only input the codec layer accepts.

use std::sync::Arc;

use prim::IntWidth;

use crate::error::{SchemaError, SchemaResult};
use crate::field::{
    CountSource, ElementType, EnumType, FieldSpec, IntType, LayoutDirective, SemanticType,
};
use crate::hash::record_hash;
use crate::record::RecordSpec;

/// A record layout with every field's size policy computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLayout {
    /// Record name, unchanged from the spec.
    pub name: String,
    /// Resolved fields in declaration order.
    pub fields: Vec<ResolvedField>,
    /// Total encoded size, present only if every field is fixed-size.
    pub static_size: Option<usize>,
    /// Record identity, used as the registry key.
    pub hash: u64,
}

/// A single resolved field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedField {
    pub name: String,
    pub shape: FieldShape,
    pub size: SizePolicy,
}

/// How a field's bytes are interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldShape {
    /// Integer stored at `stored` bytes (may differ from the natural width
    /// after a byte-length override).
    Int { ty: IntType, stored: IntWidth },
    /// Enum stored at `stored` bytes.
    Enum { ty: EnumType, stored: IntWidth },
    /// Nested record, serialized inline.
    Record(Arc<ResolvedLayout>),
    /// Sequence of identically sized elements.
    Array {
        element: ElementShape,
        count: CountShape,
    },
}

/// A resolved array element: kind plus its fixed encoded size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementShape {
    pub kind: ElementKind,
    pub size: usize,
}

/// The kind of an array element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    Int(IntType),
    Enum(EnumType),
    Record(Arc<ResolvedLayout>),
}

/// Where an array's element count comes from, after resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountShape {
    /// Fixed count; never present in the stream.
    Constant(usize),
    /// Count is the decoded value of the field at this declaration index.
    FieldIndex(usize),
    /// Count is however many complete elements the rest of the source holds.
    Remaining { min_elements: usize },
}

/// How many bytes a field occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizePolicy {
    /// Known at resolution time.
    Fixed(usize),
    /// `element_size` times the decoded value of an earlier field.
    CountedBy {
        field_index: usize,
        element_size: usize,
    },
    /// Everything left in the source, in whole elements.
    Remaining {
        element_size: usize,
        min_elements: usize,
    },
    /// Discovered by recursing into a dynamically sized nested record.
    Delegated,
}

/// Resolves a record spec into an immutable layout.
pub fn resolve(spec: &RecordSpec) -> SchemaResult<Arc<ResolvedLayout>> {
    let mut stack = Vec::new();
    resolve_nested(spec, &mut stack)
}

fn resolve_nested(spec: &RecordSpec, stack: &mut Vec<String>) -> SchemaResult<Arc<ResolvedLayout>> {
    if stack.iter().any(|name| name == &spec.name) {
        return Err(SchemaError::UnresolvableSelfReference {
            record: spec.name.clone(),
        });
    }
    stack.push(spec.name.clone());
    let result = resolve_fields(spec, stack);
    stack.pop();
    result
}

fn resolve_fields(spec: &RecordSpec, stack: &mut Vec<String>) -> SchemaResult<Arc<ResolvedLayout>> {
    if spec.fields.is_empty() {
        return Err(SchemaError::EmptyRecord {
            record: spec.name.clone(),
        });
    }

    // (name, is integral) for every field declared so far.
    let mut seen: Vec<(&str, bool)> = Vec::with_capacity(spec.fields.len());
    let mut fields = Vec::with_capacity(spec.fields.len());

    for (index, field) in spec.fields.iter().enumerate() {
        if seen.iter().any(|(name, _)| *name == field.name) {
            return Err(SchemaError::DuplicateFieldName {
                record: spec.name.clone(),
                field: field.name.clone(),
            });
        }

        let is_last = index + 1 == spec.fields.len();
        let resolved = resolve_field(field, &seen, is_last, stack)?;
        fields.push(resolved);
        seen.push((field.name.as_str(), field.is_integral()));
    }

    let mut static_size = Some(0usize);
    for field in &fields {
        static_size = match (static_size, field.size) {
            (Some(total), SizePolicy::Fixed(size)) => match total.checked_add(size) {
                Some(sum) => Some(sum),
                None => {
                    return Err(SchemaError::UnrepresentableSize {
                        field: field.name.clone(),
                    })
                }
            },
            _ => None,
        };
    }

    Ok(Arc::new(ResolvedLayout {
        name: spec.name.clone(),
        fields,
        static_size,
        hash: record_hash(spec),
    }))
}

fn resolve_field(
    field: &FieldSpec,
    seen: &[(&str, bool)],
    is_last: bool,
    stack: &mut Vec<String>,
) -> SchemaResult<ResolvedField> {
    if field.directives.len() > 1 {
        return Err(SchemaError::ConflictingDirectives {
            field: field.name.clone(),
        });
    }
    let directive = field.directives.first();

    let (shape, size) = match (&field.ty, directive) {
        (SemanticType::Int(ty), directive @ (None | Some(LayoutDirective::ByteLength(_)))) => {
            let stored = stored_width(&field.name, ty.width, directive)?;
            (
                FieldShape::Int { ty: *ty, stored },
                SizePolicy::Fixed(stored.bytes()),
            )
        }
        (SemanticType::Enum(ty), directive @ (None | Some(LayoutDirective::ByteLength(_)))) => {
            let stored = stored_width(&field.name, ty.backing, directive)?;
            (
                FieldShape::Enum {
                    ty: ty.clone(),
                    stored,
                },
                SizePolicy::Fixed(stored.bytes()),
            )
        }
        (SemanticType::Record(nested), None) => {
            let layout = resolve_nested(nested, stack)?;
            let size = match layout.static_size {
                Some(size) => SizePolicy::Fixed(size),
                None => SizePolicy::Delegated,
            };
            (FieldShape::Record(layout), size)
        }
        (SemanticType::Array(element), Some(LayoutDirective::Count(source))) => {
            let element = resolve_element(&field.name, element, stack)?;
            let element_size = element.size;
            match source {
                CountSource::Constant(count) => {
                    let size = count.checked_mul(element_size).ok_or_else(|| {
                        SchemaError::UnrepresentableSize {
                            field: field.name.clone(),
                        }
                    })?;
                    (
                        FieldShape::Array {
                            element,
                            count: CountShape::Constant(*count),
                        },
                        SizePolicy::Fixed(size),
                    )
                }
                CountSource::FieldRef(referenced) => {
                    let field_index = seen
                        .iter()
                        .position(|(name, integral)| name == referenced && *integral)
                        .ok_or_else(|| SchemaError::UnresolvedCountReference {
                            field: field.name.clone(),
                            referenced: referenced.clone(),
                        })?;
                    (
                        FieldShape::Array {
                            element,
                            count: CountShape::FieldIndex(field_index),
                        },
                        SizePolicy::CountedBy {
                            field_index,
                            element_size,
                        },
                    )
                }
            }
        }
        (SemanticType::Array(element), Some(LayoutDirective::Remaining { min_elements })) => {
            if !is_last {
                return Err(SchemaError::InvalidRemainingPlacement {
                    field: field.name.clone(),
                });
            }
            let element = resolve_element(&field.name, element, stack)?;
            let element_size = element.size;
            (
                FieldShape::Array {
                    element,
                    count: CountShape::Remaining {
                        min_elements: *min_elements,
                    },
                },
                SizePolicy::Remaining {
                    element_size,
                    min_elements: *min_elements,
                },
            )
        }
        (SemanticType::Array(_), None) => {
            return Err(SchemaError::MissingCountDirective {
                field: field.name.clone(),
            });
        }
        // Remaining on a non-array is a placement problem, not a type clash.
        (SemanticType::Int(_) | SemanticType::Enum(_) | SemanticType::Record(_), Some(LayoutDirective::Remaining { .. })) => {
            return Err(SchemaError::InvalidRemainingPlacement {
                field: field.name.clone(),
            });
        }
        _ => {
            return Err(SchemaError::ConflictingDirectives {
                field: field.name.clone(),
            });
        }
    };

    Ok(ResolvedField {
        name: field.name.clone(),
        shape,
        size,
    })
}

fn stored_width(
    field: &str,
    natural: IntWidth,
    directive: Option<&LayoutDirective>,
) -> SchemaResult<IntWidth> {
    match directive {
        None => Ok(natural),
        Some(LayoutDirective::ByteLength(length)) => {
            IntWidth::from_bytes(*length).ok_or(SchemaError::UnsupportedByteLength {
                field: field.to_owned(),
                length: *length,
            })
        }
        // Matched away by the caller.
        Some(_) => Err(SchemaError::ConflictingDirectives {
            field: field.to_owned(),
        }),
    }
}

fn resolve_element(
    field: &str,
    element: &ElementType,
    stack: &mut Vec<String>,
) -> SchemaResult<ElementShape> {
    match element {
        ElementType::Int(ty) => Ok(ElementShape {
            size: ty.width.bytes(),
            kind: ElementKind::Int(*ty),
        }),
        ElementType::Enum(ty) => Ok(ElementShape {
            size: ty.backing.bytes(),
            kind: ElementKind::Enum(ty.clone()),
        }),
        ElementType::Record(nested) => {
            let layout = resolve_nested(nested, stack)?;
            // Zero-size elements would make remaining-bytes counting
            // ill-defined, so they are rejected along with dynamic ones.
            let size = match layout.static_size {
                Some(size) if size > 0 => size,
                _ => {
                    return Err(SchemaError::UnsizedArrayElement {
                        field: field.to_owned(),
                    })
                }
            };
            Ok(ElementShape {
                size,
                kind: ElementKind::Record(layout),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{EnumType, FieldSpec, IntType, SemanticType};

    fn u8_field(name: &str) -> FieldSpec {
        FieldSpec::new(name, SemanticType::Int(IntType::u8()))
    }

    fn u8_array(name: &str) -> FieldSpec {
        FieldSpec::new(name, SemanticType::Array(ElementType::Int(IntType::u8())))
    }

    #[test]
    fn fixed_fields_sum_to_static_size() {
        let spec = RecordSpec::builder("header")
            .field(u8_field("version"))
            .field(FieldSpec::new("length", SemanticType::Int(IntType::u32())))
            .field(FieldSpec::new(
                "kind",
                SemanticType::Enum(EnumType::open(IntWidth::W16)),
            ))
            .build();
        let layout = resolve(&spec).unwrap();
        assert_eq!(layout.static_size, Some(7));
        assert_eq!(layout.fields[1].size, SizePolicy::Fixed(4));
    }

    #[test]
    fn byte_length_overrides_natural_width() {
        let spec = RecordSpec::builder("r")
            .field(FieldSpec::new("wide", SemanticType::Int(IntType::u64())).byte_length(2))
            .build();
        let layout = resolve(&spec).unwrap();
        assert_eq!(layout.static_size, Some(2));
        assert!(matches!(
            layout.fields[0].shape,
            FieldShape::Int {
                stored: IntWidth::W16,
                ..
            }
        ));
    }

    #[test]
    fn unsupported_byte_length_rejected() {
        let spec = RecordSpec::builder("r")
            .field(u8_field("x").byte_length(3))
            .build();
        let err = resolve(&spec).unwrap_err();
        assert!(matches!(err, SchemaError::UnsupportedByteLength { length: 3, .. }));
    }

    #[test]
    fn byte_length_on_array_rejected() {
        let spec = RecordSpec::builder("r")
            .field(u8_array("data").byte_length(4))
            .build();
        let err = resolve(&spec).unwrap_err();
        assert!(matches!(err, SchemaError::ConflictingDirectives { .. }));
    }

    #[test]
    fn count_reference_resolves_to_field_index() {
        let spec = RecordSpec::builder("r")
            .field(u8_field("pad"))
            .field(u8_field("count"))
            .field(u8_array("data").count_field("count"))
            .build();
        let layout = resolve(&spec).unwrap();
        assert_eq!(layout.static_size, None);
        assert_eq!(
            layout.fields[2].size,
            SizePolicy::CountedBy {
                field_index: 1,
                element_size: 1
            }
        );
    }

    #[test]
    fn forward_count_reference_rejected() {
        let spec = RecordSpec::builder("r")
            .field(u8_array("data").count_field("count"))
            .field(u8_field("count"))
            .build();
        let err = resolve(&spec).unwrap_err();
        assert!(matches!(err, SchemaError::UnresolvedCountReference { .. }));
    }

    #[test]
    fn self_count_reference_rejected() {
        let spec = RecordSpec::builder("r")
            .field(u8_array("data").count_field("data"))
            .build();
        let err = resolve(&spec).unwrap_err();
        assert!(matches!(err, SchemaError::UnresolvedCountReference { .. }));
    }

    #[test]
    fn non_integral_count_reference_rejected() {
        let spec = RecordSpec::builder("r")
            .field(FieldSpec::new(
                "kind",
                SemanticType::Enum(EnumType::open(IntWidth::W8)),
            ))
            .field(u8_array("data").count_field("kind"))
            .build();
        let err = resolve(&spec).unwrap_err();
        assert!(matches!(err, SchemaError::UnresolvedCountReference { .. }));
    }

    #[test]
    fn remaining_must_be_last() {
        let spec = RecordSpec::builder("r")
            .field(u8_array("tail").remaining(0))
            .field(u8_field("after"))
            .build();
        let err = resolve(&spec).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidRemainingPlacement { .. }));
    }

    #[test]
    fn remaining_on_last_field_allowed() {
        let spec = RecordSpec::builder("r")
            .field(u8_field("head"))
            .field(u8_array("tail").remaining(1))
            .build();
        let layout = resolve(&spec).unwrap();
        assert_eq!(layout.static_size, None);
        assert_eq!(
            layout.fields[1].size,
            SizePolicy::Remaining {
                element_size: 1,
                min_elements: 1
            }
        );
    }

    #[test]
    fn remaining_on_scalar_rejected() {
        let spec = RecordSpec::builder("r")
            .field(u8_field("x").remaining(0))
            .build();
        let err = resolve(&spec).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidRemainingPlacement { .. }));
    }

    #[test]
    fn two_directives_on_one_field_rejected() {
        let spec = RecordSpec::builder("r")
            .field(u8_array("data").count(2).remaining(0))
            .build();
        let err = resolve(&spec).unwrap_err();
        assert!(matches!(err, SchemaError::ConflictingDirectives { .. }));
    }

    #[test]
    fn oversized_constant_count_rejected() {
        let spec = RecordSpec::builder("r")
            .field(
                FieldSpec::new("data", SemanticType::Array(ElementType::Int(IntType::u16())))
                    .count(usize::MAX),
            )
            .build();
        let err = resolve(&spec).unwrap_err();
        assert!(matches!(err, SchemaError::UnrepresentableSize { .. }));
    }

    #[test]
    fn static_size_sum_overflow_rejected() {
        let spec = RecordSpec::builder("r")
            .field(
                FieldSpec::new("a", SemanticType::Array(ElementType::Int(IntType::u8())))
                    .count(usize::MAX),
            )
            .field(
                FieldSpec::new("b", SemanticType::Array(ElementType::Int(IntType::u8())))
                    .count(usize::MAX),
            )
            .build();
        let err = resolve(&spec).unwrap_err();
        assert!(matches!(err, SchemaError::UnrepresentableSize { .. }));
    }

    #[test]
    fn array_without_count_rejected() {
        let spec = RecordSpec::builder("r").field(u8_array("data")).build();
        let err = resolve(&spec).unwrap_err();
        assert!(matches!(err, SchemaError::MissingCountDirective { .. }));
    }

    #[test]
    fn empty_record_rejected() {
        let spec = RecordSpec::builder("empty").build();
        let err = resolve(&spec).unwrap_err();
        assert!(matches!(err, SchemaError::EmptyRecord { .. }));
    }

    #[test]
    fn duplicate_field_names_rejected() {
        let spec = RecordSpec::builder("r")
            .field(u8_field("x"))
            .field(u8_field("x"))
            .build();
        let err = resolve(&spec).unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateFieldName { .. }));
    }

    #[test]
    fn nested_static_record_contributes_fixed_size() {
        let inner = RecordSpec::builder("point")
            .field(FieldSpec::new("x", SemanticType::Int(IntType::i16())))
            .field(FieldSpec::new("y", SemanticType::Int(IntType::i16())))
            .build();
        let spec = RecordSpec::builder("line")
            .field(FieldSpec::new("a", SemanticType::Record(inner.clone())))
            .field(FieldSpec::new("b", SemanticType::Record(inner)))
            .build();
        let layout = resolve(&spec).unwrap();
        assert_eq!(layout.static_size, Some(8));
    }

    #[test]
    fn nested_dynamic_record_delegates() {
        let inner = RecordSpec::builder("blob")
            .field(u8_field("len"))
            .field(u8_array("data").count_field("len"))
            .build();
        let spec = RecordSpec::builder("outer")
            .field(FieldSpec::new("payload", SemanticType::Record(inner)))
            .build();
        let layout = resolve(&spec).unwrap();
        assert_eq!(layout.static_size, None);
        assert_eq!(layout.fields[0].size, SizePolicy::Delegated);
    }

    #[test]
    fn self_referential_record_rejected() {
        // Two specs with the same name, one nested in the other: the name
        // stack treats this as a record containing itself.
        let inner = RecordSpec::builder("node").field(u8_field("value")).build();
        let spec = RecordSpec::builder("node")
            .field(u8_field("value"))
            .field(FieldSpec::new("next", SemanticType::Record(inner)))
            .build();
        let err = resolve(&spec).unwrap_err();
        assert!(matches!(err, SchemaError::UnresolvableSelfReference { .. }));
    }

    #[test]
    fn transitive_self_reference_rejected() {
        let leaf = RecordSpec::builder("a").field(u8_field("v")).build();
        let mid = RecordSpec::builder("b")
            .field(FieldSpec::new("inner", SemanticType::Record(leaf)))
            .build();
        // Outer is also named "a"; the cycle surfaces two levels down.
        let spec = RecordSpec::builder("a")
            .field(FieldSpec::new("child", SemanticType::Record(mid)))
            .build();
        let err = resolve(&spec).unwrap_err();
        assert!(matches!(err, SchemaError::UnresolvableSelfReference { .. }));
    }

    #[test]
    fn array_of_dynamic_records_rejected() {
        let inner = RecordSpec::builder("blob")
            .field(u8_field("len"))
            .field(u8_array("data").count_field("len"))
            .build();
        let spec = RecordSpec::builder("r")
            .field(
                FieldSpec::new("items", SemanticType::Array(ElementType::Record(inner))).count(2),
            )
            .build();
        let err = resolve(&spec).unwrap_err();
        assert!(matches!(err, SchemaError::UnsizedArrayElement { .. }));
    }

    #[test]
    fn array_of_static_records_is_fixed() {
        let inner = RecordSpec::builder("pair")
            .field(u8_field("a"))
            .field(u8_field("b"))
            .build();
        let spec = RecordSpec::builder("r")
            .field(
                FieldSpec::new("items", SemanticType::Array(ElementType::Record(inner))).count(3),
            )
            .build();
        let layout = resolve(&spec).unwrap();
        assert_eq!(layout.static_size, Some(6));
    }

    #[test]
    fn layouts_for_identical_specs_share_a_hash() {
        let build = || {
            RecordSpec::builder("r")
                .field(u8_field("count"))
                .field(u8_array("data").count_field("count"))
                .build()
        };
        let a = resolve(&build()).unwrap();
        let b = resolve(&build()).unwrap();
        assert_eq!(a.hash, b.hash);
    }
}
