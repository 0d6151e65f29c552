//! Scalar fixed-width integer codecs.
//!
//! All operations are bounds-checked and return [`PrimError::EndOfBuffer`]
//! rather than panicking on short buffers.

use crate::error::{PrimError, PrimResult};
use crate::order::ByteOrder;

/// Supported storage widths for fixed-width integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IntWidth {
    /// One byte.
    W8,
    /// Two bytes.
    W16,
    /// Four bytes.
    W32,
    /// Eight bytes.
    W64,
}

impl IntWidth {
    /// Returns the width in bytes.
    #[must_use]
    pub const fn bytes(self) -> usize {
        match self {
            Self::W8 => 1,
            Self::W16 => 2,
            Self::W32 => 4,
            Self::W64 => 8,
        }
    }

    /// Returns the width in bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.bytes() as u32 * 8
    }

    /// Maps a byte length to a width, if supported.
    #[must_use]
    pub const fn from_bytes(bytes: usize) -> Option<Self> {
        match bytes {
            1 => Some(Self::W8),
            2 => Some(Self::W16),
            4 => Some(Self::W32),
            8 => Some(Self::W64),
            _ => None,
        }
    }
}

fn ensure(len: usize, needed: usize) -> PrimResult<()> {
    if len < needed {
        return Err(PrimError::EndOfBuffer {
            needed,
            available: len,
        });
    }
    Ok(())
}

/// Reads an unsigned integer of the given width from the front of `src`.
pub fn read_unsigned(src: &[u8], width: IntWidth, order: ByteOrder) -> PrimResult<u64> {
    ensure(src.len(), width.bytes())?;
    let value = match (width, order) {
        (IntWidth::W8, _) => u64::from(src[0]),
        (IntWidth::W16, ByteOrder::Little) => u64::from(u16::from_le_bytes([src[0], src[1]])),
        (IntWidth::W16, ByteOrder::Big) => u64::from(u16::from_be_bytes([src[0], src[1]])),
        (IntWidth::W32, ByteOrder::Little) => {
            u64::from(u32::from_le_bytes([src[0], src[1], src[2], src[3]]))
        }
        (IntWidth::W32, ByteOrder::Big) => {
            u64::from(u32::from_be_bytes([src[0], src[1], src[2], src[3]]))
        }
        (IntWidth::W64, ByteOrder::Little) => u64::from_le_bytes([
            src[0], src[1], src[2], src[3], src[4], src[5], src[6], src[7],
        ]),
        (IntWidth::W64, ByteOrder::Big) => u64::from_be_bytes([
            src[0], src[1], src[2], src[3], src[4], src[5], src[6], src[7],
        ]),
    };
    Ok(value)
}

/// Reads a signed integer of the given width, sign-extending to 64 bits.
pub fn read_signed(src: &[u8], width: IntWidth, order: ByteOrder) -> PrimResult<i64> {
    let raw = read_unsigned(src, width, order)?;
    Ok(sign_extend(raw, width))
}

/// Writes the low `width` bytes of `value` to the front of `dst`.
///
/// Bytes of `value` above the storage width are discarded.
pub fn write_unsigned(value: u64, width: IntWidth, order: ByteOrder, dst: &mut [u8]) -> PrimResult<()> {
    ensure(dst.len(), width.bytes())?;
    match (width, order) {
        (IntWidth::W8, _) => dst[0] = value as u8,
        (IntWidth::W16, ByteOrder::Little) => {
            dst[..2].copy_from_slice(&(value as u16).to_le_bytes());
        }
        (IntWidth::W16, ByteOrder::Big) => {
            dst[..2].copy_from_slice(&(value as u16).to_be_bytes());
        }
        (IntWidth::W32, ByteOrder::Little) => {
            dst[..4].copy_from_slice(&(value as u32).to_le_bytes());
        }
        (IntWidth::W32, ByteOrder::Big) => {
            dst[..4].copy_from_slice(&(value as u32).to_be_bytes());
        }
        (IntWidth::W64, ByteOrder::Little) => {
            dst[..8].copy_from_slice(&value.to_le_bytes());
        }
        (IntWidth::W64, ByteOrder::Big) => {
            dst[..8].copy_from_slice(&value.to_be_bytes());
        }
    }
    Ok(())
}

/// Writes the low `width` bytes of a signed `value` to the front of `dst`.
///
/// Two's-complement truncation: the value is reduced modulo 2^bits, so a
/// subsequent [`read_signed`] at the same width recovers any value that fits
/// in the storage width.
pub fn write_signed(value: i64, width: IntWidth, order: ByteOrder, dst: &mut [u8]) -> PrimResult<()> {
    write_unsigned(value as u64, width, order, dst)
}

/// Sign-extends a `width`-byte two's-complement pattern to 64 bits.
#[must_use]
pub const fn sign_extend(raw: u64, width: IntWidth) -> i64 {
    let shift = 64 - width.bits();
    ((raw << shift) as i64) >> shift
}
