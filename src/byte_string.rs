//! An 8-bit-clean, immutable byte string with a case-insensitive hash.
//!
//! Mirrors the role `parsing::ascii::AsciiString` / `parsing::opaque::OpaqueString`
//! mirrors a `Bytes`-backed wrapper that is cheap to
//! sub-view and cheap to share across entries in a `HeaderMap`. Unlike
//! those two, `ByteString` is ASCII-extended (any byte 0-255 is legal) and
//! carries its hash precomputed at construction time.

use std::cell::OnceCell;
use std::convert::TryFrom;
use std::fmt;
use std::hash::{Hash, Hasher};

use bytes::Bytes;

use crate::error::{HttpWireError, Result};

const HASH_SEED: u32 = 0xC2B2AE35;
const HASH_C1: u32 = 0x1B873593;
const HASH_C2: u32 = 0x1B873593;

fn sanitize_u8(b: u8) -> u32 {
    (b & 0x1F) as u32
}

fn sanitize_u16(v: u16) -> u32 {
    (v & 0x1F1F) as u32
}

fn sanitize_u32(v: u32) -> u32 {
    v & 0x1F1F1F1F
}

fn u16_le(bytes: &[u8], at: usize) -> u16 {
    (bytes[at] as u16) | ((bytes[at + 1] as u16) << 8)
}

fn u32_le(bytes: &[u8], at: usize) -> u32 {
    (bytes[at] as u32)
        | ((bytes[at + 1] as u32) << 8)
        | ((bytes[at + 2] as u32) << 16)
        | ((bytes[at + 3] as u32) << 24)
}

fn u64_le(bytes: &[u8], at: usize) -> u64 {
    (u32_le(bytes, at) as u64) | ((u32_le(bytes, at + 4) as u64) << 32)
}

/// Case-insensitive ASCII hash, folding case before mixing so two
/// differently-cased names hash identically.
pub fn hash_code_ascii(bytes: &[u8]) -> i32 {
    let len = bytes.len();
    let remaining = len & 7;
    let mut hash = HASH_SEED;

    let mut i = 0;
    while i + 8 <= len - remaining {
        let lane = u64_le(bytes, i);
        let lo = sanitize_u32((lane & 0x1F1F1F1F) as u32);
        let hi = sanitize_u32(((lane & 0x1F1F1F1F00000000) >> 32) as u32);
        hash = hash
            .wrapping_mul(HASH_C1)
            .wrapping_add(lo.wrapping_mul(HASH_C2))
            .wrapping_add(hi);
        i += 8;
    }

    let start = len - remaining;
    hash = match remaining {
        0 => hash,
        1 => hash.wrapping_mul(HASH_C1).wrapping_add(sanitize_u8(bytes[start])),
        2 => hash
            .wrapping_mul(HASH_C1)
            .wrapping_add(sanitize_u16(u16_le(bytes, start))),
        3 => {
            let h = hash
                .wrapping_mul(HASH_C1)
                .wrapping_add(sanitize_u8(bytes[start]));
            h.wrapping_mul(HASH_C2)
                .wrapping_add(sanitize_u16(u16_le(bytes, start + 1)))
        }
        4 => hash
            .wrapping_mul(HASH_C1)
            .wrapping_add(sanitize_u32(u32_le(bytes, start))),
        5 => {
            let h = hash
                .wrapping_mul(HASH_C1)
                .wrapping_add(sanitize_u8(bytes[start]));
            h.wrapping_mul(HASH_C2)
                .wrapping_add(sanitize_u32(u32_le(bytes, start + 1)))
        }
        6 => {
            let h = hash
                .wrapping_mul(HASH_C1)
                .wrapping_add(sanitize_u16(u16_le(bytes, start)));
            h.wrapping_mul(HASH_C2)
                .wrapping_add(sanitize_u32(u32_le(bytes, start + 2)))
        }
        7 => {
            let h = hash
                .wrapping_mul(HASH_C1)
                .wrapping_add(sanitize_u8(bytes[start]));
            let h = h
                .wrapping_mul(HASH_C2)
                .wrapping_add(sanitize_u16(u16_le(bytes, start + 1)));
            h.wrapping_mul(HASH_C1)
                .wrapping_add(sanitize_u32(u32_le(bytes, start + 3)))
        }
        _ => unreachable!(),
    };

    hash as i32
}

/// Immutable 8-bit-clean byte string with a precomputed case-insensitive hash.
#[derive(Clone)]
pub struct ByteString {
    data: Bytes,
    hash: i32,
    native: OnceCell<String>,
}

impl ByteString {
    pub fn from_static(s: &'static str) -> Self {
        Self::from_bytes(Bytes::from_static(s.as_bytes()))
    }

    /// Builds from raw bytes, copying them into an owned buffer.
    pub fn copy_from_slice(data: &[u8]) -> Self {
        Self::from_bytes(Bytes::copy_from_slice(data))
    }

    /// Builds from a `Bytes` without copying; `Bytes` already gives
    /// zero-copy sharing out of the box.
    pub fn from_bytes(data: Bytes) -> Self {
        let hash = hash_code_ascii(&data);
        ByteString {
            data,
            hash,
            native: OnceCell::new(),
        }
    }

    /// Builds from UTF-16 code units, folding anything above 255 to `'?'`
    /// per the lossy-fold rule above.
    pub fn from_code_units(units: &[u16]) -> Self {
        let bytes: Vec<u8> = units
            .iter()
            .map(|&u| if u > 255 { b'?' } else { u as u8 })
            .collect();
        Self::from_bytes(Bytes::from(bytes))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn hash(&self) -> i32 {
        self.hash
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn byte_at(&self, index: usize) -> Result<u8> {
        self.data.get(index).copied().ok_or_else(|| {
            HttpWireError::index_out_of_range(format!(
                "index {} out of range for length {}",
                index,
                self.len()
            ))
        })
    }

    /// Byte widened to a 16-bit code unit.
    pub fn char_at(&self, index: usize) -> Result<u16> {
        self.byte_at(index).map(|b| b as u16)
    }

    /// Zero-copy sub-view sharing the same underlying storage.
    pub fn substring(&self, start: usize, end: usize) -> Result<ByteString> {
        if start > end || end > self.len() {
            return Err(HttpWireError::index_out_of_range(format!(
                "substring({}, {}) out of range for length {}",
                start,
                end,
                self.len()
            )));
        }
        Ok(ByteString::from_bytes(self.data.slice(start..end)))
    }

    /// Deep copy of the current sub-view into fresh storage.
    pub fn to_owned_copy(&self) -> ByteString {
        ByteString::copy_from_slice(&self.data)
    }

    pub fn trim(&self) -> ByteString {
        let bytes = &self.data[..];
        let mut start = 0;
        let mut end = bytes.len();
        while start < end && bytes[start] <= b' ' {
            start += 1;
        }
        while end > start && bytes[end - 1] <= b' ' {
            end -= 1;
        }
        ByteString::from_bytes(self.data.slice(start..end))
    }

    pub fn to_upper(&self) -> ByteString {
        ByteString::copy_from_slice(
            &self
                .data
                .iter()
                .map(|b| b.to_ascii_uppercase())
                .collect::<Vec<u8>>(),
        )
    }

    pub fn to_lower(&self) -> ByteString {
        ByteString::copy_from_slice(
            &self
                .data
                .iter()
                .map(|b| b.to_ascii_lowercase())
                .collect::<Vec<u8>>(),
        )
    }

    pub fn contains(&self, needle: &[u8]) -> bool {
        self.index_of_bytes(needle).is_some()
    }

    pub fn index_of(&self, byte: u8) -> Option<usize> {
        self.data.iter().position(|&b| b == byte)
    }

    pub fn index_of_bytes(&self, needle: &[u8]) -> Option<usize> {
        if needle.is_empty() {
            return Some(0);
        }
        self.data
            .windows(needle.len())
            .position(|window| window == needle)
    }

    /// Byte-range comparison, optionally case-insensitive.
    pub fn region_matches(
        &self,
        self_offset: usize,
        other: &[u8],
        other_offset: usize,
        len: usize,
        ignore_case: bool,
    ) -> bool {
        if self_offset + len > self.len() || other_offset + len > other.len() {
            return false;
        }
        let a = &self.data[self_offset..self_offset + len];
        let b = &other[other_offset..other_offset + len];
        if ignore_case {
            a.eq_ignore_ascii_case(b)
        } else {
            a == b
        }
    }

    pub fn eq_ignore_case(&self, other: &ByteString) -> bool {
        self.data.eq_ignore_ascii_case(&other.data)
    }

    /// Visits each byte; the visitor returns `false` to stop early.
    pub fn for_each_byte<F: FnMut(u8) -> bool>(&self, mut visitor: F) {
        for &b in self.data.iter() {
            if !visitor(b) {
                break;
            }
        }
    }

    pub fn as_str(&self) -> std::result::Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.data)
    }

    /// Lazily-populated native `String` shadow.
    pub fn to_native_string(&self) -> &str {
        self.native.get_or_init(|| {
            String::from_utf8_lossy(&self.data).into_owned()
        })
    }

    fn digit_value(b: u8, radix: u32) -> Option<u32> {
        let v = (b as char).to_digit(radix)?;
        Some(v)
    }

    /// Strict integer parse over `self[start..end]` in the given radix.
    pub fn parse_long(&self, start: usize, end: usize, radix: u32) -> Result<i64> {
        if !(2..=36).contains(&radix) {
            return Err(HttpWireError::parse_error(format!(
                "radix {} out of range [2, 36]",
                radix
            )));
        }
        if start >= end || end > self.len() {
            return Err(HttpWireError::parse_error("empty numeric input"));
        }

        let bytes = &self.data[start..end];
        let (negative, digits) = match bytes[0] {
            b'-' => (true, &bytes[1..]),
            _ => (false, bytes),
        };
        if digits.is_empty() {
            return Err(HttpWireError::parse_error("empty numeric input"));
        }

        let mut acc: i64 = 0;
        for &b in digits {
            let d = Self::digit_value(b, radix)
                .ok_or_else(|| HttpWireError::parse_error(format!("non-digit byte {:#x}", b)))?
                as i64;
            acc = acc
                .checked_mul(radix as i64)
                .and_then(|v| v.checked_sub(d))
                .ok_or_else(|| HttpWireError::parse_error("numeric overflow"))?;
        }

        if negative {
            Ok(acc)
        } else {
            acc.checked_neg()
                .ok_or_else(|| HttpWireError::parse_error("numeric overflow"))
        }
    }

    pub fn parse_int(&self, start: usize, end: usize, radix: u32) -> Result<i32> {
        let v = self.parse_long(start, end, radix)?;
        i32::try_from(v).map_err(|_| HttpWireError::parse_error("numeric overflow"))
    }

    pub fn parse_short(&self, start: usize, end: usize, radix: u32) -> Result<i16> {
        let v = self.parse_long(start, end, radix)?;
        i16::try_from(v).map_err(|_| HttpWireError::parse_error("numeric overflow"))
    }

    pub fn parse_float(&self) -> Result<f32> {
        self.as_str()
            .ok()
            .and_then(|s| s.trim().parse::<f32>().ok())
            .ok_or_else(|| HttpWireError::parse_error("invalid float"))
    }

    pub fn parse_double(&self) -> Result<f64> {
        self.as_str()
            .ok()
            .and_then(|s| s.trim().parse::<f64>().ok())
            .ok_or_else(|| HttpWireError::parse_error("invalid double"))
    }

    /// First byte non-zero is `true`, matching `ValueConverter`'s boolean
    /// reverse-conversion contract.
    pub fn parse_boolean(&self) -> Result<bool> {
        self.byte_at(0).map(|b| b != 0)
    }
}

impl PartialEq for ByteString {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}
impl Eq for ByteString {}

impl Hash for ByteString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_i32(self.hash);
    }
}

impl fmt::Debug for ByteString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ByteString({:?})", self.to_native_string())
    }
}

impl From<&str> for ByteString {
    fn from(s: &str) -> Self {
        ByteString::copy_from_slice(s.as_bytes())
    }
}

impl From<String> for ByteString {
    fn from(s: String) -> Self {
        ByteString::from_bytes(Bytes::from(s.into_bytes()))
    }
}

impl AsRef<[u8]> for ByteString {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_case_insensitive() {
        let lower = ByteString::from("content-type");
        let upper = ByteString::from("CONTENT-TYPE");
        let mixed = ByteString::from("Content-Type");
        assert_eq!(lower.hash(), upper.hash());
        assert_eq!(lower.hash(), mixed.hash());
    }

    #[test]
    fn hash_matches_upper_lower_of_self() {
        let s = ByteString::from("Set-Cookie");
        assert_eq!(s.hash(), s.to_upper().hash());
        assert_eq!(s.hash(), s.to_lower().hash());
    }

    /// Pins the 8-byte-lane mixing for inputs longer than one lane; a
    /// swapped lo/hi term here silently breaks every name/value at least
    /// 8 bytes long (e.g. "Content-Type").
    #[test]
    fn hash_pinned_for_multi_lane_input() {
        assert_eq!(hash_code_ascii(b"Content-Type"), -1306477845);
        assert_eq!(hash_code_ascii(b"Content-Length"), -840574361);
    }

    #[test]
    fn substring_is_zero_copy_and_correct() {
        let s = ByteString::from("hello world");
        let sub = s.substring(6, 11).unwrap();
        assert_eq!(sub.as_bytes(), b"world");
    }

    #[test]
    fn substring_out_of_range_errors() {
        let s = ByteString::from("abc");
        assert!(s.substring(0, 10).is_err());
        assert!(s.substring(2, 1).is_err());
    }

    #[test]
    fn trim_strips_controls_and_spaces() {
        let s = ByteString::from("  \t hi \r\n ");
        assert_eq!(s.trim().as_bytes(), b"hi");
    }

    #[test]
    fn parse_long_handles_sign_and_radix() {
        let s = ByteString::from("-ff");
        assert_eq!(s.parse_long(0, 3, 16).unwrap(), -255);
        let s = ByteString::from("123");
        assert_eq!(s.parse_long(0, 3, 10).unwrap(), 123);
    }

    #[test]
    fn parse_long_rejects_empty_non_digit_bad_radix_overflow() {
        let s = ByteString::from("");
        assert!(s.parse_long(0, 0, 10).is_err());
        let s = ByteString::from("12a");
        assert!(s.parse_long(0, 3, 10).is_err());
        let s = ByteString::from("10");
        assert!(s.parse_long(0, 2, 1).is_err());
        let s = ByteString::from("99999999999999999999");
        assert!(s.parse_long(0, s.len(), 10).is_err());
    }

    #[test]
    fn for_each_byte_stops_early() {
        let s = ByteString::from("abcdef");
        let mut seen = Vec::new();
        s.for_each_byte(|b| {
            seen.push(b);
            b != b'c'
        });
        assert_eq!(seen, b"abc");
    }

    #[test]
    fn region_matches_case_insensitive() {
        let a = ByteString::from("Keep-Alive");
        assert!(a.region_matches(0, b"keep-alive", 0, 10, true));
        assert!(!a.region_matches(0, b"keep-alive", 0, 10, false));
    }

    #[test]
    fn char_above_255_folds_to_question_mark() {
        let units = [b'a' as u16, 0x1234, b'b' as u16];
        let s = ByteString::from_code_units(&units);
        assert_eq!(s.as_bytes(), b"a?b");
    }
}
