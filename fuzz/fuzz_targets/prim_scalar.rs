#![no_main]

use libfuzzer_sys::fuzz_target;
use prim::{read_signed, read_slice, read_unsigned, ByteOrder, IntWidth};

fuzz_target!(|data: &[u8]| {
    for width in [IntWidth::W8, IntWidth::W16, IntWidth::W32, IntWidth::W64] {
        for order in [ByteOrder::Little, ByteOrder::Big] {
            let _ = read_unsigned(data, width, order);
            let _ = read_signed(data, width, order);
        }
    }
    let _: Vec<u16> = read_slice(data, ByteOrder::Little);
    let _: Vec<u64> = read_slice(data, ByteOrder::Big);
});
