//! Canonical group key construction.
//!
//! Items whose extracted per-criterion values are identical, position by
//! position, receive the same key and end up in the same stack. Keys are built
//! in hot grouping loops, so the builders here reuse a scratch buffer instead
//! of allocating an intermediate string per call.
//!
//! Values are joined verbatim: a value that itself contains [`KEY_SEPARATOR`]
//! can collide with a longer tuple (`["a|b"]` and `["a", "b"]` both produce
//! `"a|b"`). Existing stacking configurations depend on this exact key format.

/// Separator inserted between consecutive values.
pub const KEY_SEPARATOR: char = '|';

/// Join `values` into a group key, using `scratch` as the working buffer.
///
/// `scratch` is cleared first, so any stale content is discarded. After the
/// call it holds the same text as the returned key.
pub fn build_key<S: AsRef<str>>(values: &[S], scratch: &mut String) -> String {
    write_key(values, scratch);
    scratch.clone()
}

/// Allocating form of [`build_key`]; produces identical output.
pub fn join_key<S: AsRef<str>>(values: &[S]) -> String {
    let mut key = String::new();
    write_key(values, &mut key);
    key
}

fn write_key<S: AsRef<str>>(values: &[S], buf: &mut String) {
    buf.clear();
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            buf.push(KEY_SEPARATOR);
        }
        buf.push_str(value.as_ref());
    }
}

/// Key builder owning one worker's scratch buffer.
///
/// A `KeyBuilder` belongs to a single worker for its lifetime and is not shared
/// between threads; see [`crate::grouping`] for the parallel path.
#[derive(Debug, Default, Clone)]
pub struct KeyBuilder {
    scratch: String,
}

impl KeyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            scratch: String::with_capacity(capacity),
        }
    }

    /// Build an owned key.
    pub fn build<S: AsRef<str>>(&mut self, values: &[S]) -> String {
        build_key(values, &mut self.scratch)
    }

    /// Build a key borrowed from the internal buffer, valid until the next call.
    pub fn build_ref<S: AsRef<str>>(&mut self, values: &[S]) -> &str {
        write_key(values, &mut self.scratch);
        &self.scratch
    }

    /// Current scratch capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.scratch.capacity()
    }
}
