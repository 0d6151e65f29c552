//! Deterministic record identity hashing.

use blake3::Hasher;

use crate::field::{
    CountSource, ElementType, EnumType, EnumVariants, IntType, LayoutDirective, SemanticType,
    Signedness,
};
use crate::record::RecordSpec;

/// Computes a deterministic identity hash for a record spec.
///
/// The hash covers the record name and the full canonical encoding of every
/// field (type, directives, nested records), so two specs hash equal exactly
/// when they describe the same layout. It keys the process-wide codec
/// registry.
#[must_use]
pub fn record_hash(spec: &RecordSpec) -> u64 {
    let mut hasher = Hasher::new();
    write_record(&mut hasher, spec);
    let hash = hasher.finalize();
    let bytes = hash.as_bytes();
    u64::from_le_bytes(bytes[0..8].try_into().unwrap())
}

fn write_record(hasher: &mut Hasher, spec: &RecordSpec) {
    write_str(hasher, &spec.name);
    write_u32(hasher, spec.fields.len() as u32);

    for field in &spec.fields {
        write_str(hasher, &field.name);
        write_type(hasher, &field.ty);
        write_u32(hasher, field.directives.len() as u32);
        for directive in &field.directives {
            write_directive(hasher, directive);
        }
    }
}

fn write_type(hasher: &mut Hasher, ty: &SemanticType) {
    match ty {
        SemanticType::Int(ty) => {
            write_u8(hasher, 0);
            write_int_type(hasher, *ty);
        }
        SemanticType::Enum(ty) => {
            write_u8(hasher, 1);
            write_enum_type(hasher, ty);
        }
        SemanticType::Record(nested) => {
            write_u8(hasher, 2);
            write_record(hasher, nested);
        }
        SemanticType::Array(element) => {
            write_u8(hasher, 3);
            write_element(hasher, element);
        }
    }
}

fn write_element(hasher: &mut Hasher, element: &ElementType) {
    match element {
        ElementType::Int(ty) => {
            write_u8(hasher, 0);
            write_int_type(hasher, *ty);
        }
        ElementType::Enum(ty) => {
            write_u8(hasher, 1);
            write_enum_type(hasher, ty);
        }
        ElementType::Record(nested) => {
            write_u8(hasher, 2);
            write_record(hasher, nested);
        }
    }
}

fn write_int_type(hasher: &mut Hasher, ty: IntType) {
    write_u8(hasher, ty.width.bytes() as u8);
    write_u8(hasher, match ty.signedness {
        Signedness::Unsigned => 0,
        Signedness::Signed => 1,
    });
}

fn write_enum_type(hasher: &mut Hasher, ty: &EnumType) {
    write_u8(hasher, ty.backing.bytes() as u8);
    match &ty.variants {
        EnumVariants::Open => write_u8(hasher, 0),
        EnumVariants::Known(values) => {
            write_u8(hasher, 1);
            write_u32(hasher, values.len() as u32);
            for value in values {
                write_u64(hasher, *value);
            }
        }
    }
}

fn write_directive(hasher: &mut Hasher, directive: &LayoutDirective) {
    match directive {
        LayoutDirective::ByteLength(length) => {
            write_u8(hasher, 0);
            write_u64(hasher, *length as u64);
        }
        LayoutDirective::Count(CountSource::Constant(count)) => {
            write_u8(hasher, 1);
            write_u64(hasher, *count as u64);
        }
        LayoutDirective::Count(CountSource::FieldRef(name)) => {
            write_u8(hasher, 2);
            write_str(hasher, name);
        }
        LayoutDirective::Remaining { min_elements } => {
            write_u8(hasher, 3);
            write_u64(hasher, *min_elements as u64);
        }
    }
}

fn write_str(hasher: &mut Hasher, value: &str) {
    write_u32(hasher, value.len() as u32);
    hasher.update(value.as_bytes());
}

fn write_u8(hasher: &mut Hasher, value: u8) {
    hasher.update(&[value]);
}

fn write_u32(hasher: &mut Hasher, value: u32) {
    hasher.update(&value.to_le_bytes());
}

fn write_u64(hasher: &mut Hasher, value: u64) {
    hasher.update(&value.to_le_bytes());
}
