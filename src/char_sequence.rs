//! A read-only view abstracting over a native `String`, a `ByteString`, or
//! a `GrowableAsciiBuffer` still being appended to.
//!
//! The teacher's `CharSequence` equivalent is `ICharSequence`-style trait
//! dispatch; here it is a small closed enum of concrete variants.

use crate::byte_string::ByteString;
use crate::error::{HttpWireError, Result};

#[derive(Debug, Clone)]
pub enum CharSequence {
    Bytes(ByteString),
    Native(String),
    /// A header line still being accumulated; views straight over the
    /// buffer's current contents without requiring it to be frozen into
    /// a `ByteString` first.
    Buffer(GrowableAsciiBuffer),
}

impl CharSequence {
    pub fn len(&self) -> usize {
        match self {
            CharSequence::Bytes(b) => b.len(),
            CharSequence::Native(s) => s.chars().count(),
            CharSequence::Buffer(buf) => buf.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Indexed read of a 16-bit code unit.
    pub fn char_at(&self, index: usize) -> Result<u16> {
        match self {
            CharSequence::Bytes(b) => b.char_at(index),
            CharSequence::Native(s) => s
                .encode_utf16()
                .nth(index)
                .ok_or_else(|| HttpWireError::index_out_of_range(format!("index {} out of range", index))),
            CharSequence::Buffer(buf) => buf
                .as_bytes()
                .get(index)
                .map(|&b| b as u16)
                .ok_or_else(|| HttpWireError::index_out_of_range(format!("index {} out of range", index))),
        }
    }

    pub fn sub_sequence(&self, start: usize, end: usize) -> Result<CharSequence> {
        if start > end || end > self.len() {
            return Err(HttpWireError::index_out_of_range(format!(
                "sub_sequence({}, {}) out of range for length {}",
                start,
                end,
                self.len()
            )));
        }
        match self {
            CharSequence::Bytes(b) => Ok(CharSequence::Bytes(b.substring(start, end)?)),
            CharSequence::Native(s) => {
                let units: Vec<u16> = s.encode_utf16().skip(start).take(end - start).collect();
                Ok(CharSequence::Native(String::from_utf16_lossy(&units)))
            }
            CharSequence::Buffer(buf) => Ok(CharSequence::Bytes(ByteString::copy_from_slice(
                &buf.as_bytes()[start..end],
            ))),
        }
    }

    pub fn index_of(&self, needle: u16) -> Option<usize> {
        (0..self.len()).find(|&i| self.char_at(i).ok() == Some(needle))
    }

    pub fn region_matches(&self, offset: usize, other: &CharSequence, other_offset: usize, len: usize, ignore_case: bool) -> bool {
        if offset + len > self.len() || other_offset + len > other.len() {
            return false;
        }
        for i in 0..len {
            let a = self.char_at(offset + i).unwrap_or(0);
            let b = other.char_at(other_offset + i).unwrap_or(0);
            let matches = if ignore_case {
                ascii_fold(a) == ascii_fold(b)
            } else {
                a == b
            };
            if !matches {
                return false;
            }
        }
        true
    }

    pub fn sequence_equals(&self, other: &CharSequence, ignore_case: bool) -> bool {
        self.len() == other.len() && self.region_matches(0, other, 0, self.len(), ignore_case)
    }

    pub fn to_string_value(&self) -> String {
        match self {
            CharSequence::Bytes(b) => b.to_native_string().to_owned(),
            CharSequence::Native(s) => s.clone(),
            CharSequence::Buffer(buf) => String::from_utf8_lossy(buf.as_bytes()).into_owned(),
        }
    }

    /// Hash that distinguishes case-sensitive and case-insensitive modes.
    pub fn hash(&self, ignore_case: bool) -> i32 {
        let mut h: i32 = 0;
        for i in 0..self.len() {
            let c = self.char_at(i).unwrap_or(0);
            let c = if ignore_case { ascii_fold(c) } else { c };
            h = h.wrapping_mul(31).wrapping_add(c as i32);
        }
        h
    }
}

fn ascii_fold(c: u16) -> u16 {
    if (b'A' as u16..=b'Z' as u16).contains(&c) {
        c + 32
    } else {
        c
    }
}

impl From<ByteString> for CharSequence {
    fn from(b: ByteString) -> Self {
        CharSequence::Bytes(b)
    }
}

impl From<String> for CharSequence {
    fn from(s: String) -> Self {
        CharSequence::Native(s)
    }
}

impl From<&str> for CharSequence {
    fn from(s: &str) -> Self {
        CharSequence::Native(s.to_owned())
    }
}

impl From<GrowableAsciiBuffer> for CharSequence {
    fn from(buf: GrowableAsciiBuffer) -> Self {
        CharSequence::Buffer(buf)
    }
}

/// Amortized-append ASCII accumulation buffer for header-line assembly.
#[derive(Debug, Clone)]
pub struct GrowableAsciiBuffer {
    data: Vec<u8>,
}

impl GrowableAsciiBuffer {
    pub fn new() -> Self {
        GrowableAsciiBuffer { data: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        GrowableAsciiBuffer {
            data: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    fn grow_for(&mut self, additional: usize) {
        let needed = self.data.len() + additional;
        if needed > self.data.capacity() {
            let mut new_cap = self.data.capacity().max(16);
            while new_cap < needed {
                new_cap *= 2;
            }
            self.data.reserve(new_cap - self.data.len());
        }
    }

    pub fn push_char(&mut self, c: u8) {
        self.grow_for(1);
        self.data.push(c);
    }

    pub fn push_sequence(&mut self, other: &[u8]) {
        self.grow_for(other.len());
        self.data.extend_from_slice(other);
    }

    /// Clears contents but keeps the allocated capacity.
    pub fn reset(&mut self) {
        self.data.clear();
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_byte_string(self) -> ByteString {
        ByteString::copy_from_slice(&self.data)
    }
}

impl Default for GrowableAsciiBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_matches_ignores_case_across_variants() {
        let a: CharSequence = ByteString::from("Content-Type").into();
        let b: CharSequence = "content-type".into();
        assert!(a.sequence_equals(&b, true));
        assert!(!a.sequence_equals(&b, false));
    }

    #[test]
    fn growable_buffer_doubles_and_resets() {
        let mut buf = GrowableAsciiBuffer::with_capacity(4);
        buf.push_sequence(b"hello world, this grows past four bytes");
        assert!(buf.capacity() >= buf.len());
        buf.reset();
        assert_eq!(buf.len(), 0);
        assert!(buf.capacity() > 0);
    }

    #[test]
    fn sub_sequence_out_of_range_errors() {
        let s: CharSequence = "abc".into();
        assert!(s.sub_sequence(0, 10).is_err());
    }

    #[test]
    fn buffer_variant_viewable_while_still_accumulating() {
        let mut buf = GrowableAsciiBuffer::new();
        buf.push_sequence(b"Content-Type");
        let view: CharSequence = buf.clone().into();
        let other: CharSequence = "content-type".into();
        assert_eq!(view.len(), 12);
        assert!(view.sequence_equals(&other, true));
        assert!(!view.sequence_equals(&other, false));

        buf.push_sequence(b": text/plain");
        let grown: CharSequence = buf.into();
        assert_eq!(grown.sub_sequence(0, 12).unwrap().to_string_value(), "Content-Type");
    }
}
