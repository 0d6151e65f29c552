//! Record schema model and layout resolution for the bindec codec.
//!
//! This crate defines how binary records are described and validated:
//! - Field model: fixed-width integers, enums, nested records, arrays
//! - Layout directives: byte-length overrides, element counts (constant or
//!   referencing an earlier field), consume-remaining-bytes
//! - Layout resolution: per-field size policies and the static-size verdict
//! - Deterministic record identity hashing
//!
//! # Design Principles
//!
//! - **Runtime-first** - Schemas are built by an external front-end at
//!   runtime; no reflection on arbitrary Rust types.
//! - **Resolve once** - Every invariant is checked in a single resolution
//!   pass; resolved layouts are immutable.
//! - **Deterministic hashing** - Record hash is stable given the same
//!   definition.

mod error;
mod field;
mod hash;
mod record;
mod resolve;

pub use error::{SchemaError, SchemaResult};
pub use field::{
    CountSource, ElementType, EnumType, EnumVariants, FieldSpec, IntType, LayoutDirective,
    SemanticType, Signedness,
};
pub use hash::record_hash;
pub use record::{RecordBuilder, RecordSpec};
pub use resolve::{
    resolve, CountShape, ElementKind, ElementShape, FieldShape, ResolvedField, ResolvedLayout,
    SizePolicy,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_exports() {
        let spec = RecordSpec::builder("ping")
            .field(FieldSpec::new("seq", SemanticType::Int(IntType::u32())))
            .build();
        let layout = resolve(&spec).unwrap();
        assert_eq!(layout.static_size, Some(4));
        assert_eq!(layout.hash, record_hash(&spec));
    }

    #[test]
    fn resolution_error_surfaces_through_api() {
        let spec = RecordSpec::builder("empty").build();
        let err: SchemaError = resolve(&spec).unwrap_err();
        assert!(matches!(err, SchemaError::EmptyRecord { .. }));
    }
}
