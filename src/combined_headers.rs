//! `CombinedHeaders`: a single-value-per-name view over a `HeaderMap`
//! that joins repeated additions with `", "` the way RFC 7230 §3.2.2
//! permits for most header fields (never `Set-Cookie`).

use crate::byte_string::ByteString;
use crate::error::Result;
use crate::header_map::{AcceptAnyName, CaseInsensitiveAsciiHashing, HeaderMap, NameHashingStrategy, NameValidator};

const SEPARATOR: &str = ", ";

pub struct CombinedHeaders<H = CaseInsensitiveAsciiHashing, N = AcceptAnyName> {
    inner: HeaderMap<ByteString, H, N>,
}

impl CombinedHeaders<CaseInsensitiveAsciiHashing, AcceptAnyName> {
    pub fn new() -> Self {
        CombinedHeaders {
            inner: HeaderMap::new(),
        }
    }
}

impl Default for CombinedHeaders<CaseInsensitiveAsciiHashing, AcceptAnyName> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: NameHashingStrategy, N: NameValidator> CombinedHeaders<H, N> {
    pub fn with_strategy(hasher: H, validator: N) -> Self {
        CombinedHeaders {
            inner: HeaderMap::with_strategy(16, hasher, validator),
        }
    }

    /// Appends `value`, joining onto any prior value for `name` with
    /// `, `. A fresh name gets a single, un-joined entry.
    pub fn add(&mut self, name: ByteString, value: ByteString) -> Result<()> {
        match self.inner.get(&name) {
            Some(existing) => {
                let joined = format!("{}{}{}", existing.to_native_string(), SEPARATOR, value.to_native_string());
                self.inner.set(name, ByteString::from(joined))
            }
            None => self.inner.add(name, value),
        }
    }

    pub fn set(&mut self, name: ByteString, value: ByteString) -> Result<()> {
        self.inner.set(name, value)
    }

    /// The single, possibly comma-joined value for `name`.
    pub fn get(&self, name: &ByteString) -> Option<&ByteString> {
        self.inner.get(name)
    }

    /// Splits the combined value back into its OWS-trimmed parts; a name
    /// never added returns an empty vec.
    pub fn get_all(&self, name: &ByteString) -> Vec<ByteString> {
        match self.inner.get(name) {
            Some(v) => v
                .to_native_string()
                .split(',')
                .map(|part| ByteString::from(part.trim()))
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn remove(&mut self, name: &ByteString) -> bool {
        self.inner.remove(name)
    }

    pub fn contains_name(&self, name: &ByteString) -> bool {
        self.inner.contains_name(name)
    }

    pub fn names(&self) -> Vec<ByteString> {
        self.inner.names()
    }

    pub fn size(&self) -> usize {
        self.inner.size()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> ByteString {
        ByteString::from(s)
    }

    #[test]
    fn repeated_add_joins_with_comma_space() {
        let mut h = CombinedHeaders::new();
        h.add(name("Accept"), name("text/html")).unwrap();
        h.add(name("Accept"), name("application/json")).unwrap();
        assert_eq!(h.get(&name("Accept")), Some(&name("text/html, application/json")));
    }

    #[test]
    fn get_all_splits_and_trims_ows() {
        let mut h = CombinedHeaders::new();
        h.add(name("Accept"), name("text/html")).unwrap();
        h.add(name("Accept"), name(" application/json ")).unwrap();
        assert_eq!(
            h.get_all(&name("Accept")),
            vec![name("text/html"), name("application/json")]
        );
    }

    #[test]
    fn set_replaces_rather_than_joins() {
        let mut h = CombinedHeaders::new();
        h.add(name("Accept"), name("text/html")).unwrap();
        h.set(name("Accept"), name("application/json")).unwrap();
        assert_eq!(h.get(&name("Accept")), Some(&name("application/json")));
    }

    #[test]
    fn absent_name_has_no_parts() {
        let h = CombinedHeaders::new();
        assert!(h.get_all(&name("Accept")).is_empty());
    }
}
