//! Fixed-width integer primitives for the bindec codec.
//!
//! This crate provides scalar and bulk codecs for fixed-width integers in
//! either byte order. It is the lowest layer of the workspace: record
//! layouts and codecs are built on top of it.
//!
//! # Design Principles
//!
//! - **No unsafe code** - Safety is paramount.
//! - **Bounded operations** - Scalar reads/writes are bounds-checked; bulk
//!   operations truncate to whole elements instead of failing.
//! - **No domain knowledge** - This crate knows nothing about records,
//!   fields, or layouts.
//! - **Explicit errors** - Scalar failures return structured errors, never
//!   panic.
//!
//! # Example
//!
//! ```
//! use prim::{read_unsigned, write_unsigned, ByteOrder, IntWidth};
//!
//! let mut buf = [0u8; 2];
//! write_unsigned(0x0201, IntWidth::W16, ByteOrder::Little, &mut buf).unwrap();
//! assert_eq!(buf, [0x01, 0x02]);
//! assert_eq!(
//!     read_unsigned(&buf, IntWidth::W16, ByteOrder::Big).unwrap(),
//!     0x0102
//! );
//! ```

mod error;
mod int;
mod order;
mod slice;

pub use error::{PrimError, PrimResult};
pub use int::{
    read_signed, read_unsigned, sign_extend, write_signed, write_unsigned, IntWidth,
};
pub use order::ByteOrder;
pub use slice::{read_slice, read_slice_into, write_slice, WireInt};
