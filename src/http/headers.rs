//! Ordered header collection
//!
//! Entries keep insertion order and duplicate keys are retained. Lookups
//! compare keys ASCII case-insensitively.

use bytes::Bytes;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet {
    entries: Vec<(Bytes, Bytes)>,
}

impl HeaderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a header. Existing entries with the same key are kept.
    pub fn add(&mut self, key: impl Into<Bytes>, value: impl Into<Bytes>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Appends a header whose value is the decimal rendering of `value`.
    pub fn add_int(&mut self, key: impl Into<Bytes>, value: i64) {
        self.add(key, value.to_string());
    }

    /// Returns the value of the first header named `key`.
    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.get_all(key).next()
    }

    /// Returns the first value for `key` if it is valid UTF-8.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| std::str::from_utf8(v).ok())
    }

    /// Returns every value stored under `key`, in insertion order.
    pub fn get_all<'a>(&'a self, key: &str) -> impl Iterator<Item = &'a [u8]> {
        self.entries
            .iter()
            .filter(move |(k, _)| k.eq_ignore_ascii_case(key.as_bytes()))
            .map(|(_, v)| v.as_ref())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &[u8])> {
        self.entries.iter().map(|(k, v)| (k.as_ref(), v.as_ref()))
    }
}
