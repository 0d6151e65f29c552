use prim::{
    read_signed, read_slice, read_unsigned, write_signed, write_slice, write_unsigned, ByteOrder,
    IntWidth,
};
use proptest::prelude::*;

fn width_strategy() -> impl Strategy<Value = IntWidth> {
    prop_oneof![
        Just(IntWidth::W8),
        Just(IntWidth::W16),
        Just(IntWidth::W32),
        Just(IntWidth::W64),
    ]
}

fn order_strategy() -> impl Strategy<Value = ByteOrder> {
    prop_oneof![Just(ByteOrder::Little), Just(ByteOrder::Big)]
}

fn mask(value: u64, width: IntWidth) -> u64 {
    match width {
        IntWidth::W64 => value,
        _ => value & ((1u64 << width.bits()) - 1),
    }
}

proptest! {
    #[test]
    fn prop_unsigned_roundtrip(value in any::<u64>(), width in width_strategy(), order in order_strategy()) {
        let mut buf = [0u8; 8];
        write_unsigned(value, width, order, &mut buf).unwrap();
        let decoded = read_unsigned(&buf, width, order).unwrap();
        prop_assert_eq!(decoded, mask(value, width));
    }

    #[test]
    fn prop_signed_roundtrip_within_width(value in any::<i16>(), order in order_strategy()) {
        let mut buf = [0u8; 2];
        write_signed(i64::from(value), IntWidth::W16, order, &mut buf).unwrap();
        prop_assert_eq!(
            read_signed(&buf, IntWidth::W16, order).unwrap(),
            i64::from(value)
        );
    }

    #[test]
    fn prop_orders_are_mutual_reversals(value in any::<u64>(), width in width_strategy()) {
        let mut le = [0u8; 8];
        let mut be = [0u8; 8];
        write_unsigned(value, width, ByteOrder::Little, &mut le).unwrap();
        write_unsigned(value, width, ByteOrder::Big, &mut be).unwrap();
        let n = width.bytes();
        let mut reversed: Vec<u8> = be[..n].to_vec();
        reversed.reverse();
        prop_assert_eq!(&le[..n], reversed.as_slice());
    }

    #[test]
    fn prop_bulk_roundtrip_u16(values in prop::collection::vec(any::<u16>(), 0..64), order in order_strategy()) {
        let mut buf = vec![0u8; values.len() * 2];
        let written = write_slice(&values, usize::MAX, order, &mut buf);
        prop_assert_eq!(written, values.len());
        let decoded: Vec<u16> = read_slice(&buf, order);
        prop_assert_eq!(decoded, values);
    }

    #[test]
    fn prop_bulk_read_never_keeps_partial_element(bytes in prop::collection::vec(any::<u8>(), 0..65), order in order_strategy()) {
        let decoded: Vec<u32> = read_slice(&bytes, order);
        prop_assert_eq!(decoded.len(), bytes.len() / 4);
    }

    #[test]
    fn prop_bulk_write_is_bounded(
        values in prop::collection::vec(any::<u32>(), 0..32),
        max_len in 0usize..40,
        capacity in 0usize..128,
        order in order_strategy(),
    ) {
        let mut buf = vec![0u8; capacity];
        let written = write_slice(&values, max_len, order, &mut buf);
        prop_assert_eq!(written, values.len().min(max_len).min(capacity / 4));
    }
}
