use rustc_hash::FxHashSet;
use std::sync::Arc;

/// Deduplicates the strings of one feed
///
/// Equal values share a single `Arc<str>` allocation. An interner is meant to live for one
/// feed decode: call [Interner::reset] or drop it before the next feed, otherwise every
/// feed's identifiers accumulate in it.
#[derive(Debug, Default)]
pub struct Interner {
    strings: FxHashSet<Arc<str>>,
}

impl Interner {
    /// Creates an empty interner
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical copy of `value`
    ///
    /// The first occurrence is copied into a new allocation, so the caller may reuse the
    /// buffer `value` points into.
    pub fn intern(&mut self, value: &str) -> Arc<str> {
        if let Some(existing) = self.strings.get(value) {
            return Arc::clone(existing);
        }
        let owned: Arc<str> = Arc::from(value);
        self.strings.insert(Arc::clone(&owned));
        owned
    }

    /// Number of distinct strings
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// True if nothing has been interned since creation or the last reset
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Forgets every string and releases the table
    ///
    /// Records decoded before the reset keep their strings alive on their own.
    pub fn reset(&mut self) {
        self.strings = FxHashSet::default();
    }
}
