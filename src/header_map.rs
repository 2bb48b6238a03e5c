//! A multi-value, order-preserving, hash-bucketed header map

//!
//! Entries live in a `Vec`-backed arena owned by the map; the hash
//! buckets and the insertion-order ring both link entries by arena index
//! rather than by pointer, so the map never holds a back-pointer into
//! its own arena.

use crate::byte_string::ByteString;
use crate::error::{HttpWireError, Result};
use crate::value_converter::{ByteStringValueConverter, ValueConverter};

const NIL: usize = usize::MAX;
const MIN_BUCKETS: usize = 2;
const MAX_BUCKETS: usize = 128;
const DEFAULT_BUCKETS_HINT: usize = 16;

/// Injected name hashing + equality strategy.
pub trait NameHashingStrategy {
    fn hash(&self, name: &ByteString) -> i32;
    fn eq(&self, a: &ByteString, b: &ByteString) -> bool;
    /// Used for the fast-path reference-identity check in `add(other_map)`.
    fn identity_tag(&self) -> &'static str;
}

/// Case-insensitive header-name comparison. `ByteString::hash` already
/// folds ASCII case already, so the same hash serves both strategies.
#[derive(Debug, Default, Clone, Copy)]
pub struct CaseInsensitiveAsciiHashing;

impl NameHashingStrategy for CaseInsensitiveAsciiHashing {
    fn hash(&self, name: &ByteString) -> i32 {
        name.hash()
    }
    fn eq(&self, a: &ByteString, b: &ByteString) -> bool {
        a.eq_ignore_case(b)
    }
    fn identity_tag(&self) -> &'static str {
        "case-insensitive-ascii"
    }
}

/// Case-sensitive name comparison (cookie names, `CombinedHeaders`' own
/// bookkeeping, etc).
#[derive(Debug, Default, Clone, Copy)]
pub struct CaseSensitiveHashing;

impl NameHashingStrategy for CaseSensitiveHashing {
    fn hash(&self, name: &ByteString) -> i32 {
        name.hash()
    }
    fn eq(&self, a: &ByteString, b: &ByteString) -> bool {
        a == b
    }
    fn identity_tag(&self) -> &'static str {
        "case-sensitive"
    }
}

/// Injected name validator. The default accepts
/// anything; callers needing RFC 7230 `token` enforcement can supply
/// `HttpTokenNameValidator`.
pub trait NameValidator {
    fn validate(&self, name: &ByteString) -> Result<()>;
    /// Used by `add_map`'s fast path to decide whether `other`'s entries
    /// were already checked against an equivalent validator.
    fn identity_tag(&self) -> &'static str;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AcceptAnyName;

impl NameValidator for AcceptAnyName {
    fn validate(&self, _name: &ByteString) -> Result<()> {
        Ok(())
    }
    fn identity_tag(&self) -> &'static str {
        "accept-any-name"
    }
}

/// Enforces the RFC 7230 `token` production on header names.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpTokenNameValidator;

impl NameValidator for HttpTokenNameValidator {
    fn identity_tag(&self) -> &'static str {
        "http-token-name"
    }

    fn validate(&self, name: &ByteString) -> Result<()> {
        if name.is_empty() {
            return Err(HttpWireError::invalid_argument("header name must not be empty"));
        }
        let mut ok = true;
        name.for_each_byte(|b| {
            if !is_token_byte(b) {
                ok = false;
                return false;
            }
            true
        });
        if ok {
            Ok(())
        } else {
            Err(HttpWireError::invalid_argument(format!(
                "header name contains an invalid character: {:?}",
                name
            )))
        }
    }
}

fn is_token_byte(b: u8) -> bool {
    matches!(b,
        b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.'
        | b'^' | b'_' | b'`' | b'|' | b'~'
    ) || b.is_ascii_alphanumeric()
}

struct Entry<V> {
    hash: i32,
    name: ByteString,
    value: V,
    next_in_bucket: usize,
    prev_in_order: usize,
    next_in_order: usize,
}

/// Multi-value, order-preserving, hash-bucketed map keyed by `ByteString`.
///
/// `H` and `N` are zero-sized strategy types in the common case
/// (monomorphized away) while still modeling the injected hasher and
/// validator as first-class, swappable strategies.
pub struct HeaderMap<V, H = CaseInsensitiveAsciiHashing, N = AcceptAnyName> {
    buckets: Vec<usize>,
    mask: usize,
    entries: Vec<Option<Entry<V>>>,
    free: Vec<usize>,
    head_next: usize,
    head_prev: usize,
    size: usize,
    hasher: H,
    validator: N,
}

fn bucket_count_for_hint(hint: usize) -> usize {
    let clamped = hint.clamp(MIN_BUCKETS, MAX_BUCKETS);
    clamped.next_power_of_two().min(MAX_BUCKETS)
}

impl<V> HeaderMap<V, CaseInsensitiveAsciiHashing, AcceptAnyName> {
    pub fn new() -> Self {
        Self::with_capacity_hint(DEFAULT_BUCKETS_HINT)
    }

    pub fn with_capacity_hint(hint: usize) -> Self {
        Self::with_strategy(hint, CaseInsensitiveAsciiHashing, AcceptAnyName)
    }
}

impl<V> Default for HeaderMap<V, CaseInsensitiveAsciiHashing, AcceptAnyName> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, H: NameHashingStrategy, N: NameValidator> HeaderMap<V, H, N> {
    pub fn with_strategy(hint: usize, hasher: H, validator: N) -> Self {
        let buckets_len = bucket_count_for_hint(hint);
        HeaderMap {
            buckets: vec![NIL; buckets_len],
            mask: buckets_len - 1,
            entries: Vec::new(),
            free: Vec::new(),
            head_next: NIL,
            head_prev: NIL,
            size: 0,
            hasher,
            validator,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    fn bucket_index(&self, hash: i32) -> usize {
        (hash as u32 as usize) & self.mask
    }

    fn alloc_entry(&mut self, entry: Entry<V>) -> usize {
        if let Some(idx) = self.free.pop() {
            self.entries[idx] = Some(entry);
            idx
        } else {
            self.entries.push(Some(entry));
            self.entries.len() - 1
        }
    }

    fn entry(&self, idx: usize) -> &Entry<V> {
        self.entries[idx].as_ref().expect("dangling arena index")
    }

    fn entry_mut(&mut self, idx: usize) -> &mut Entry<V> {
        self.entries[idx].as_mut().expect("dangling arena index")
    }

    fn link_order_tail(&mut self, idx: usize) {
        let prev = self.head_prev;
        self.entry_mut(idx).prev_in_order = prev;
        self.entry_mut(idx).next_in_order = NIL;
        if prev == NIL {
            self.head_next = idx;
        } else {
            self.entry_mut(prev).next_in_order = idx;
        }
        self.head_prev = idx;
    }

    fn unlink_order(&mut self, idx: usize) {
        let prev = self.entry(idx).prev_in_order;
        let next = self.entry(idx).next_in_order;
        if prev == NIL {
            self.head_next = next;
        } else {
            self.entry_mut(prev).next_in_order = next;
        }
        if next == NIL {
            self.head_prev = prev;
        } else {
            self.entry_mut(next).prev_in_order = prev;
        }
    }

    /// Inserts one (name, value). O(1).
    pub fn add(&mut self, name: ByteString, value: V) -> Result<()> {
        self.validator.validate(&name)?;
        let hash = self.hasher.hash(&name);
        self.insert_with_hash(name, value, hash);
        Ok(())
    }

    /// Links a new entry under a precomputed hash, skipping validation and
    /// re-hashing. Used by `add` (hash freshly computed) and by `add_map`'s
    /// fast path (hash copied from an entry already hashed under an
    /// equivalent strategy).
    fn insert_with_hash(&mut self, name: ByteString, value: V, hash: i32) {
        let bucket = self.bucket_index(hash);
        let next_in_bucket = self.buckets[bucket];
        let idx = self.alloc_entry(Entry {
            hash,
            name,
            value,
            next_in_bucket,
            prev_in_order: NIL,
            next_in_order: NIL,
        });
        self.buckets[bucket] = idx;
        self.link_order_tail(idx);
        self.size += 1;
    }

    pub fn add_all_values(&mut self, name: &ByteString, values: impl IntoIterator<Item = V>) -> Result<()> {
        self.validator.validate(name)?;
        for v in values {
            self.add(name.clone(), v)?;
        }
        Ok(())
    }

    /// Merges every entry from `other`, preserving its insertion order.
    /// Rejects merging a map into itself with `IllegalState`. The
    /// borrow checker already forbids calling this with `other` aliasing
    /// `self` through safe code; the check exists for callers reaching
    /// both through shared-mutability wrappers (e.g. `Rc<RefCell<_>>`).
    ///
    /// When `self` and `other` share an equivalent hasher and validator
    /// (by `identity_tag()`), `other`'s entries were already validated
    /// and hashed under a strategy this map accepts as its own, so each
    /// entry is copied in directly, reusing its cached hash and skipping
    /// both `validate` and `hash` for every entry.
    pub fn add_map(&mut self, other: &HeaderMap<V, H, N>) -> Result<()>
    where
        V: Clone,
    {
        if std::ptr::eq(self, other) {
            return Err(HttpWireError::illegal_state("cannot add a HeaderMap to itself"));
        }
        if self.hasher.identity_tag() == other.hasher.identity_tag()
            && self.validator.identity_tag() == other.validator.identity_tag()
        {
            for (name, value, hash) in other.iter_with_hash() {
                self.insert_with_hash(name.clone(), value.clone(), hash);
            }
        } else {
            for (name, value) in other.iter() {
                self.add(name.clone(), value.clone())?;
            }
        }
        Ok(())
    }

    fn remove_matching(&mut self, name: &ByteString) -> Vec<V> {
        let hash = self.hasher.hash(name);
        let bucket = self.bucket_index(hash);

        let mut removed = Vec::new();
        let mut prev_in_bucket = NIL;
        let mut cur = self.buckets[bucket];

        while cur != NIL {
            let next = self.entry(cur).next_in_bucket;
            let matches = self.entry(cur).hash == hash && self.hasher.eq(&self.entry(cur).name, name);
            if matches {
                if prev_in_bucket == NIL {
                    self.buckets[bucket] = next;
                } else {
                    self.entry_mut(prev_in_bucket).next_in_bucket = next;
                }
                self.unlink_order(cur);
                let entry = self.entries[cur].take().expect("dangling arena index");
                self.free.push(cur);
                self.size -= 1;
                removed.push(entry.value);
            } else {
                prev_in_bucket = cur;
            }
            cur = next;
        }
        removed
    }

    /// Removes every value stored under `name`; returns whether any were
    /// present.
    pub fn remove(&mut self, name: &ByteString) -> bool {
        !self.remove_matching(name).is_empty()
    }

    /// Removes every value stored under `name` and returns the most
    /// recently added one, matching `get`'s "last wins" contract.
    pub fn get_and_remove(&mut self, name: &ByteString) -> Option<V> {
        self.remove_matching(name).into_iter().next()
    }

    /// Most recently added value for `name` (bucket-chain order is LIFO).
    pub fn get(&self, name: &ByteString) -> Option<&V> {
        let hash = self.hasher.hash(name);
        let bucket = self.bucket_index(hash);
        let mut cur = self.buckets[bucket];
        while cur != NIL {
            let e = self.entry(cur);
            if e.hash == hash && self.hasher.eq(&e.name, name) {
                return Some(&e.value);
            }
            cur = e.next_in_bucket;
        }
        None
    }

    /// All values for `name`, in insertion order (the bucket chain is
    /// LIFO, so hits are collected then reversed).
    pub fn get_all(&self, name: &ByteString) -> Vec<&V> {
        let hash = self.hasher.hash(name);
        let bucket = self.bucket_index(hash);
        let mut hits = Vec::new();
        let mut cur = self.buckets[bucket];
        while cur != NIL {
            let e = self.entry(cur);
            if e.hash == hash && self.hasher.eq(&e.name, name) {
                hits.push(&e.value);
            }
            cur = e.next_in_bucket;
        }
        hits.reverse();
        hits
    }

    pub fn contains_name(&self, name: &ByteString) -> bool {
        self.get(name).is_some()
    }

    pub fn contains(&self, name: &ByteString, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.get_all(name).into_iter().any(|v| v == value)
    }

    pub fn contains_with<F: Fn(&V, &V) -> bool>(&self, name: &ByteString, value: &V, eq: F) -> bool {
        self.get_all(name).into_iter().any(|v| eq(v, value))
    }

    /// Removes all existing values for `name`, then inserts exactly one.
    pub fn set(&mut self, name: ByteString, value: V) -> Result<()> {
        self.remove_matching(&name);
        self.add(name, value)
    }

    /// Removes all existing values for `name`, then inserts each of
    /// `values` in order. Stops (without error) at the first absent
    /// element in an `Option`-typed iterator.
    pub fn set_many(&mut self, name: ByteString, values: impl IntoIterator<Item = Option<V>>) -> Result<()> {
        self.remove_matching(&name);
        for v in values {
            match v {
                Some(v) => self.add(name.clone(), v)?,
                None => break,
            }
        }
        Ok(())
    }

    /// Clears self then copies every entry from `other`.
    pub fn set_from(&mut self, other: &HeaderMap<V, H, N>) -> Result<()>
    where
        V: Clone,
    {
        self.clear();
        self.add_map(other)
    }

    /// Removes only the names present in `other`, then copies `other`'s
    /// entries in; names present only in `self` survive untouched.
    pub fn set_all(&mut self, other: &HeaderMap<V, H, N>) -> Result<()>
    where
        V: Clone,
    {
        for name in other.names() {
            self.remove_matching(&name);
        }
        self.add_map(other)
    }

    pub fn clear(&mut self) {
        self.buckets.iter_mut().for_each(|b| *b = NIL);
        self.entries.clear();
        self.free.clear();
        self.head_next = NIL;
        self.head_prev = NIL;
        self.size = 0;
    }

    /// Unique header names, in first-insertion order.
    pub fn names(&self) -> Vec<ByteString> {
        let mut seen: Vec<ByteString> = Vec::new();
        let mut cur = self.head_next;
        while cur != NIL {
            let e = self.entry(cur);
            if !seen.iter().any(|n| self.hasher.eq(n, &e.name)) {
                seen.push(e.name.clone());
            }
            cur = e.next_in_order;
        }
        seen
    }

    /// All (name, value) pairs in exact insertion order.
    pub fn iter(&self) -> HeaderMapIter<'_, V> {
        HeaderMapIter {
            entries: &self.entries,
            cur: self.head_next,
        }
    }

    /// Like `iter`, but also yields each entry's already-computed hash.
    /// Used by `add_map`'s fast path to avoid re-hashing entries that
    /// were already hashed under an equivalent strategy.
    fn iter_with_hash(&self) -> HeaderMapIterWithHash<'_, V> {
        HeaderMapIterWithHash {
            entries: &self.entries,
            cur: self.head_next,
        }
    }

    #[cfg(debug_assertions)]
    pub fn check_invariants(&self) -> Result<()> {
        if self.buckets.len() < MIN_BUCKETS || self.buckets.len() > MAX_BUCKETS || !self.buckets.len().is_power_of_two() {
            return Err(HttpWireError::illegal_state("bucket count invariant violated"));
        }
        let mut count = 0;
        let mut cur = self.head_next;
        let mut prev = NIL;
        while cur != NIL {
            let e = self.entry(cur);
            if e.prev_in_order != prev {
                return Err(HttpWireError::illegal_state("order ring invariant violated"));
            }
            prev = cur;
            cur = e.next_in_order;
            count += 1;
        }
        if prev != self.head_prev {
            return Err(HttpWireError::illegal_state("order ring tail invariant violated"));
        }
        if count != self.size {
            return Err(HttpWireError::illegal_state("size invariant violated"));
        }
        for (i, &head) in self.buckets.iter().enumerate() {
            let mut cur = head;
            while cur != NIL {
                let e = self.entry(cur);
                if (e.hash as u32 as usize) & self.mask != i {
                    return Err(HttpWireError::illegal_state("bucket placement invariant violated"));
                }
                cur = e.next_in_bucket;
            }
        }
        Ok(())
    }
}

pub struct HeaderMapIter<'a, V> {
    entries: &'a [Option<Entry<V>>],
    cur: usize,
}

impl<'a, V> Iterator for HeaderMapIter<'a, V> {
    type Item = (&'a ByteString, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cur == NIL {
            return None;
        }
        let e = self.entries[self.cur].as_ref().expect("dangling arena index");
        self.cur = e.next_in_order;
        Some((&e.name, &e.value))
    }
}

struct HeaderMapIterWithHash<'a, V> {
    entries: &'a [Option<Entry<V>>],
    cur: usize,
}

impl<'a, V> Iterator for HeaderMapIterWithHash<'a, V> {
    type Item = (&'a ByteString, &'a V, i32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cur == NIL {
            return None;
        }
        let e = self.entries[self.cur].as_ref().expect("dangling arena index");
        self.cur = e.next_in_order;
        Some((&e.name, &e.value, e.hash))
    }
}

impl<V: PartialEq, H: NameHashingStrategy, N: NameValidator> PartialEq for HeaderMap<V, H, N> {
    fn eq(&self, other: &Self) -> bool {
        if self.size != other.size {
            return false;
        }
        let names = self.names();
        if names.len() != other.names().len() {
            return false;
        }
        names.iter().all(|name| self.get_all(name) == other.get_all(name))
    }
}

/// Combines this map's hash: seed `0xC2B2AE35`, names folded
/// with `31 * h + name_hash`, each value (in `get_all` order)  folded
/// with `31 * h + value_hash`.
pub fn header_map_hash<V, H: NameHashingStrategy, N: NameValidator>(
    map: &HeaderMap<V, H, N>,
    value_hash: impl Fn(&V) -> i32,
) -> i32 {
    let mut h: i32 = 0xC2B2AE35u32 as i32;
    for name in map.names() {
        h = h.wrapping_mul(31).wrapping_add(map.hasher.hash(&name));
        for value in map.get_all(&name) {
            h = h.wrapping_mul(31).wrapping_add(value_hash(value));
        }
    }
    h
}

// Typed convenience wrappers over `ValueConverter`.
impl<H: NameHashingStrategy, N: NameValidator> HeaderMap<ByteString, H, N> {
    pub fn add_int(&mut self, name: ByteString, value: i32) -> Result<()> {
        self.add(name, ByteStringValueConverter.convert_int(value))
    }

    pub fn get_int(&self, name: &ByteString) -> Result<Option<i32>> {
        self.get(name).map(|v| ByteStringValueConverter.convert_to_int(v)).transpose()
    }

    pub fn get_int_and_remove(&mut self, name: &ByteString) -> Result<Option<i32>> {
        self.get_and_remove(name).map(|v| ByteStringValueConverter.convert_to_int(&v)).transpose()
    }

    pub fn contains_int(&self, name: &ByteString, value: i32) -> bool {
        self.get_all(name)
            .into_iter()
            .any(|v| ByteStringValueConverter.convert_to_int(v) == Ok(value))
    }

    pub fn add_long(&mut self, name: ByteString, value: i64) -> Result<()> {
        self.add(name, ByteStringValueConverter.convert_long(value))
    }

    pub fn get_long(&self, name: &ByteString) -> Result<Option<i64>> {
        self.get(name).map(|v| ByteStringValueConverter.convert_to_long(v)).transpose()
    }

    pub fn get_long_and_remove(&mut self, name: &ByteString) -> Result<Option<i64>> {
        self.get_and_remove(name).map(|v| ByteStringValueConverter.convert_to_long(&v)).transpose()
    }

    pub fn contains_long(&self, name: &ByteString, value: i64) -> bool {
        self.get_all(name)
            .into_iter()
            .any(|v| ByteStringValueConverter.convert_to_long(v) == Ok(value))
    }

    pub fn add_bool(&mut self, name: ByteString, value: bool) -> Result<()> {
        self.add(name, ByteStringValueConverter.convert_bool(value))
    }

    pub fn get_bool(&self, name: &ByteString) -> Result<Option<bool>> {
        self.get(name).map(|v| ByteStringValueConverter.convert_to_bool(v)).transpose()
    }

    pub fn get_bool_and_remove(&mut self, name: &ByteString) -> Result<Option<bool>> {
        self.get_and_remove(name).map(|v| ByteStringValueConverter.convert_to_bool(&v)).transpose()
    }

    pub fn contains_bool(&self, name: &ByteString, value: bool) -> bool {
        self.get_all(name)
            .into_iter()
            .any(|v| ByteStringValueConverter.convert_to_bool(v) == Ok(value))
    }

    pub fn add_time_millis(&mut self, name: ByteString, millis: i64) -> Result<()> {
        self.add(name, ByteStringValueConverter.convert_time_millis(millis))
    }

    pub fn get_time_millis(&self, name: &ByteString) -> Result<Option<i64>> {
        self.get(name).map(|v| ByteStringValueConverter.convert_to_time_millis(v)).transpose()
    }

    pub fn get_time_millis_and_remove(&mut self, name: &ByteString) -> Result<Option<i64>> {
        self.get_and_remove(name)
            .map(|v| ByteStringValueConverter.convert_to_time_millis(&v))
            .transpose()
    }

    pub fn contains_time_millis(&self, name: &ByteString, millis: i64) -> bool {
        self.get_all(name)
            .into_iter()
            .any(|v| ByteStringValueConverter.convert_to_time_millis(v) == Ok(millis))
    }

    pub fn add_byte(&mut self, name: ByteString, value: u8) -> Result<()> {
        self.add(name, ByteStringValueConverter.convert_byte(value))
    }

    pub fn get_byte(&self, name: &ByteString) -> Result<Option<u8>> {
        self.get(name).map(|v| ByteStringValueConverter.convert_to_byte(v)).transpose()
    }

    pub fn get_byte_and_remove(&mut self, name: &ByteString) -> Result<Option<u8>> {
        self.get_and_remove(name).map(|v| ByteStringValueConverter.convert_to_byte(&v)).transpose()
    }

    pub fn contains_byte(&self, name: &ByteString, value: u8) -> bool {
        self.get_all(name)
            .into_iter()
            .any(|v| ByteStringValueConverter.convert_to_byte(v) == Ok(value))
    }

    pub fn add_char(&mut self, name: ByteString, value: u16) -> Result<()> {
        self.add(name, ByteStringValueConverter.convert_char(value))
    }

    pub fn get_char(&self, name: &ByteString) -> Result<Option<u16>> {
        self.get(name).map(|v| ByteStringValueConverter.convert_to_char(v)).transpose()
    }

    pub fn get_char_and_remove(&mut self, name: &ByteString) -> Result<Option<u16>> {
        self.get_and_remove(name).map(|v| ByteStringValueConverter.convert_to_char(&v)).transpose()
    }

    pub fn contains_char(&self, name: &ByteString, value: u16) -> bool {
        self.get_all(name)
            .into_iter()
            .any(|v| ByteStringValueConverter.convert_to_char(v) == Ok(value))
    }

    pub fn add_short(&mut self, name: ByteString, value: i16) -> Result<()> {
        self.add(name, ByteStringValueConverter.convert_short(value))
    }

    pub fn get_short(&self, name: &ByteString) -> Result<Option<i16>> {
        self.get(name).map(|v| ByteStringValueConverter.convert_to_short(v)).transpose()
    }

    pub fn get_short_and_remove(&mut self, name: &ByteString) -> Result<Option<i16>> {
        self.get_and_remove(name).map(|v| ByteStringValueConverter.convert_to_short(&v)).transpose()
    }

    pub fn contains_short(&self, name: &ByteString, value: i16) -> bool {
        self.get_all(name)
            .into_iter()
            .any(|v| ByteStringValueConverter.convert_to_short(v) == Ok(value))
    }

    pub fn add_float(&mut self, name: ByteString, value: f32) -> Result<()> {
        self.add(name, ByteStringValueConverter.convert_float(value))
    }

    pub fn get_float(&self, name: &ByteString) -> Result<Option<f32>> {
        self.get(name).map(|v| ByteStringValueConverter.convert_to_float(v)).transpose()
    }

    pub fn get_float_and_remove(&mut self, name: &ByteString) -> Result<Option<f32>> {
        self.get_and_remove(name).map(|v| ByteStringValueConverter.convert_to_float(&v)).transpose()
    }

    pub fn contains_float(&self, name: &ByteString, value: f32) -> bool {
        self.get_all(name)
            .into_iter()
            .any(|v| ByteStringValueConverter.convert_to_float(v) == Ok(value))
    }

    pub fn add_double(&mut self, name: ByteString, value: f64) -> Result<()> {
        self.add(name, ByteStringValueConverter.convert_double(value))
    }

    pub fn get_double(&self, name: &ByteString) -> Result<Option<f64>> {
        self.get(name).map(|v| ByteStringValueConverter.convert_to_double(v)).transpose()
    }

    pub fn get_double_and_remove(&mut self, name: &ByteString) -> Result<Option<f64>> {
        self.get_and_remove(name).map(|v| ByteStringValueConverter.convert_to_double(&v)).transpose()
    }

    pub fn contains_double(&self, name: &ByteString, value: f64) -> bool {
        self.get_all(name)
            .into_iter()
            .any(|v| ByteStringValueConverter.convert_to_double(v) == Ok(value))
    }
}
