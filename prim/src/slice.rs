//! Bulk sequence codecs for fixed-width integers.
//!
//! Bulk operations truncate instead of failing: reads decode as many
//! complete elements as the source holds, and writes are bounded by both a
//! caller-supplied element limit and the destination capacity.

use crate::order::ByteOrder;

/// A fixed-width integer that can cross the wire in either byte order.
pub trait WireInt: Copy {
    /// Encoded width in bytes.
    const WIDTH: usize;

    /// Decodes one value from the front of `bytes`.
    ///
    /// # Panics
    ///
    /// Panics if `bytes.len() < Self::WIDTH`; callers are expected to have
    /// bounds-checked already.
    fn from_wire(bytes: &[u8], order: ByteOrder) -> Self;

    /// Encodes this value into the front of `out`.
    ///
    /// # Panics
    ///
    /// Panics if `out.len() < Self::WIDTH`.
    fn to_wire(self, order: ByteOrder, out: &mut [u8]);
}

macro_rules! impl_wire_int {
    ($($ty:ty),* $(,)?) => {$(
        impl WireInt for $ty {
            const WIDTH: usize = std::mem::size_of::<$ty>();

            fn from_wire(bytes: &[u8], order: ByteOrder) -> Self {
                let bytes: [u8; std::mem::size_of::<$ty>()] =
                    bytes[..Self::WIDTH].try_into().unwrap();
                match order {
                    ByteOrder::Little => Self::from_le_bytes(bytes),
                    ByteOrder::Big => Self::from_be_bytes(bytes),
                }
            }

            fn to_wire(self, order: ByteOrder, out: &mut [u8]) {
                let bytes = match order {
                    ByteOrder::Little => self.to_le_bytes(),
                    ByteOrder::Big => self.to_be_bytes(),
                };
                out[..Self::WIDTH].copy_from_slice(&bytes);
            }
        }
    )*};
}

impl_wire_int!(u8, i8, u16, i16, u32, i32, u64, i64);

/// Decodes as many complete elements as fit in `src`.
///
/// A partial trailing element is never retained; bytes consumed are
/// `result.len() * T::WIDTH`.
#[must_use]
pub fn read_slice<T: WireInt>(src: &[u8], order: ByteOrder) -> Vec<T> {
    let mut out = Vec::new();
    read_slice_into(src, order, &mut out);
    out
}

/// Decodes as many complete elements as fit in `src`, appending to `out`.
///
/// Returns the number of elements appended.
pub fn read_slice_into<T: WireInt>(src: &[u8], order: ByteOrder, out: &mut Vec<T>) -> usize {
    let count = src.len() / T::WIDTH;
    out.reserve(count);
    for i in 0..count {
        out.push(T::from_wire(&src[i * T::WIDTH..], order));
    }
    count
}

/// Writes at most `max_len` elements from `values` into `dst`.
///
/// The number of elements written is
/// `min(values.len(), max_len, dst.len() / T::WIDTH)` and is returned.
/// Destination bytes beyond the written elements are left untouched.
pub fn write_slice<T: WireInt>(values: &[T], max_len: usize, order: ByteOrder, dst: &mut [u8]) -> usize {
    let count = values.len().min(max_len).min(dst.len() / T::WIDTH);
    for (i, value) in values[..count].iter().enumerate() {
        value.to_wire(order, &mut dst[i * T::WIDTH..]);
    }
    count
}
