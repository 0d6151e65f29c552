//! Process-wide codec registry.
//!
//! Codecs are cached by record identity hash so each record type is resolved
//! at most once per process. The global registry is initialized lazily and
//! is read-mostly afterward; fresh registries can be created for test
//! isolation.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use schema::{record_hash, resolve, RecordSpec, SchemaResult};

use crate::record::RecordCodec;

static GLOBAL: OnceLock<CodecRegistry> = OnceLock::new();

/// A read-mostly map from record identity to its codec.
#[derive(Debug, Default)]
pub struct CodecRegistry {
    codecs: RwLock<HashMap<u64, Arc<RecordCodec>>>,
}

impl CodecRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    #[must_use]
    pub fn global() -> &'static Self {
        GLOBAL.get_or_init(Self::new)
    }

    /// Returns the cached codec for `spec`, resolving and inserting it on
    /// first access.
    ///
    /// Concurrent first accesses may resolve in parallel, but exactly one
    /// codec instance wins and is returned to every caller.
    pub fn codec_for(&self, spec: &RecordSpec) -> SchemaResult<Arc<RecordCodec>> {
        let hash = record_hash(spec);
        if let Some(codec) = self.get(hash) {
            return Ok(codec);
        }

        // Resolve outside the write lock; losers of the insert race drop
        // their layout and take the winner's codec.
        let layout = resolve(spec)?;
        let mut codecs = self
            .codecs
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let codec = codecs
            .entry(hash)
            .or_insert_with(|| Arc::new(RecordCodec::new(layout)))
            .clone();
        Ok(codec)
    }

    /// Looks up a codec by record identity hash.
    #[must_use]
    pub fn get(&self, hash: u64) -> Option<Arc<RecordCodec>> {
        self.codecs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&hash)
            .cloned()
    }

    /// Number of cached codecs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.codecs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if no codec has been cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
