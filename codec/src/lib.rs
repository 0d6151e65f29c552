//! Record codec synthesis for the bindec codec.
//!
//! This is the main codec crate: it turns resolved record layouts from the
//! schema crate into runnable codecs over raw byte slices, in both byte
//! orders.
//!
//! # Features
//!
//! - `byte_count` / `try_read_le` / `try_read_be` / `write_le` / `write_be`
//!   per record type
//! - Count-by-earlier-field and consume-remaining array handling
//! - Nested record composition
//! - A process-wide codec registry keyed by record identity
//!
//! # Design Principles
//!
//! - **Correctness first** - All invariants are documented and tested.
//! - **No exceptions** - Every runtime outcome is a returned result; reads
//!   never expose partial values.
//! - **Stateless codecs** - Safe to share and call concurrently on disjoint
//!   buffers.

mod error;
mod record;
mod registry;
mod value;

pub use error::{CodecError, CodecResult};
pub use record::{Decoded, RecordCodec};
pub use registry::CodecRegistry;
pub use value::{FieldValue, RecordValue};
