#![no_main]

use codec::RecordCodec;
use libfuzzer_sys::fuzz_target;
use prim::IntWidth;
use schema::{ElementType, EnumType, FieldSpec, IntType, RecordSpec, SemanticType};

fn fuzz_spec() -> std::sync::Arc<RecordSpec> {
    let inner = RecordSpec::builder("inner")
        .field(FieldSpec::new("a", SemanticType::Int(IntType::u16())))
        .field(FieldSpec::new("b", SemanticType::Int(IntType::i8())))
        .build();
    RecordSpec::builder("fuzzed")
        .field(FieldSpec::new("count", SemanticType::Int(IntType::u8())))
        .field(FieldSpec::new(
            "kind",
            SemanticType::Enum(EnumType::known(IntWidth::W8, vec![0, 1, 2, 3])),
        ))
        .field(FieldSpec::new("nested", SemanticType::Record(inner)))
        .field(
            FieldSpec::new("data", SemanticType::Array(ElementType::Int(IntType::u32())))
                .count_field("count"),
        )
        .field(
            FieldSpec::new("tail", SemanticType::Array(ElementType::Int(IntType::u16())))
                .remaining(0),
        )
        .build()
}

fuzz_target!(|data: &[u8]| {
    let codec = RecordCodec::from_spec(&fuzz_spec()).unwrap();

    // Reads must never panic, whatever the input bytes.
    if let Ok(decoded) = codec.try_read_le(data) {
        // A decoded value must write back into a buffer of its own size.
        let size = codec.byte_count(&decoded.value);
        assert_eq!(size, decoded.bytes_read);
        let mut buf = vec![0u8; size];
        codec.write_le(&decoded.value, &mut buf).unwrap();
        assert_eq!(&buf[..], &data[..size]);
    }
    let _ = codec.try_read_be(data);
});
