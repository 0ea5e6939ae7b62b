//! Ordered header container with case-insensitive names
//!
//! The ordering is not cosmetic: the SigV4 canonical headers and the
//! `SignedHeaders` list are produced by iterating this map, so the signer
//! depends on case-insensitive ascending iteration.

use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Header name that compares and orders case-insensitively while keeping
/// the spelling it was inserted with.
#[derive(Debug, Clone)]
pub struct HeaderName(String);

impl HeaderName {
    fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for HeaderName {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for HeaderName {}

impl PartialOrd for HeaderName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeaderName {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = self.0.bytes().map(|b| b.to_ascii_lowercase());
        let rhs = other.0.bytes().map(|b| b.to_ascii_lowercase());
        lhs.cmp(rhs)
    }
}

/// Ordered mapping from case-insensitive header name to value.
///
/// Inserting under a name that already exists (in any casing) overwrites
/// the value and keeps the first-seen spelling of the name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Headers {
    map: BTreeMap<HeaderName, String>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a header value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = HeaderName::new(name);
        let value = value.into();
        // BTreeMap::insert keeps the existing key on overwrite, which is
        // exactly the first-spelling-wins behavior we want.
        self.map.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.map.get(&HeaderName::new(name)).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(&HeaderName::new(name))
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.map.remove(&HeaderName::new(name))
    }

    /// Iterate `(name, value)` pairs in case-insensitive ascending name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
