//! KeyedTable: structural layer shared by both access modes.
//!
//! Entries live in generational slot storage; each bucket is a chain of
//! slot keys. Bucket placement uses the hash code cached in the entry, so
//! a rehash only moves slot keys between chains and never touches the
//! entries themselves or calls back into the hasher.

use crate::config::TableConfig;
use crate::error::TableError;
use crate::hash_code::HashCode;
use crate::strategy::{KeyEq, KeyHasher};
use core::fmt;
use slotmap::{DefaultKey, SlotMap};
use std::collections::VecDeque;

type Bucket = VecDeque<DefaultKey>;

/// What an entry stores next to its key.
pub(crate) trait Payload {
    type Value;

    /// Number of values held; never zero for a linked entry.
    fn len(&self) -> usize;

    fn iter(&self) -> impl Iterator<Item = &Self::Value>;
}

/// Unique-mode payload.
#[derive(Debug)]
pub(crate) struct Single<V>(pub(crate) V);

impl<V> Payload for Single<V> {
    type Value = V;

    fn len(&self) -> usize {
        1
    }

    fn iter(&self) -> impl Iterator<Item = &V> {
        core::iter::once(&self.0)
    }
}

/// Index-mode payload, most recent value first.
#[derive(Debug)]
pub(crate) struct Many<V>(pub(crate) VecDeque<V>);

impl<V> Many<V> {
    pub(crate) fn one(value: V) -> Self {
        let mut values = VecDeque::with_capacity(1);
        values.push_front(value);
        Many(values)
    }
}

impl<V> Payload for Many<V> {
    type Value = V;

    fn len(&self) -> usize {
        self.0.len()
    }

    fn iter(&self) -> impl Iterator<Item = &V> {
        self.0.iter()
    }
}

#[derive(Debug)]
struct Entry<K, P> {
    key: K,
    hash: HashCode,
    payload: P,
}

/// Outcome of looking a key up in its bucket.
pub(crate) enum Probe {
    Occupied(DefaultKey),
    Vacant(Vacant),
}

/// Where a missing key would be linked. Only valid until the next mutation.
pub(crate) struct Vacant {
    hash: HashCode,
    bucket: usize,
}

pub(crate) struct KeyedTable<K, P, H, E> {
    hasher: H,
    eq: E,
    config: TableConfig,
    slots: SlotMap<DefaultKey, Entry<K, P>>,
    buckets: Vec<Bucket>,
    values: usize,
    rehashes: usize,
}

impl<K, P, H, E> KeyedTable<K, P, H, E>
where
    P: Payload,
    H: KeyHasher<K>,
    E: KeyEq<K>,
{
    pub(crate) fn with_parts(config: TableConfig, hasher: H, eq: E) -> Self {
        Self {
            hasher,
            eq,
            config,
            slots: SlotMap::with_key(),
            buckets: empty_buckets(config.initial_buckets()),
            values: 0,
            rehashes: 0,
        }
    }

    pub(crate) fn config(&self) -> &TableConfig {
        &self.config
    }

    pub(crate) fn key_count(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn value_count(&self) -> usize {
        self.values
    }

    pub(crate) fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub(crate) fn bucket_size(&self, i: usize) -> Result<usize, TableError> {
        self.buckets
            .get(i)
            .map(Bucket::len)
            .ok_or(TableError::IndexOutOfRange {
                index: i,
                bucket_count: self.buckets.len(),
            })
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub(crate) fn load_factor(&self) -> f64 {
        self.key_count() as f64 / self.bucket_count() as f64
    }

    #[cfg(test)]
    pub(crate) fn rehash_count(&self) -> usize {
        self.rehashes
    }

    /// Drop every entry; the bucket count is kept.
    pub(crate) fn clear(&mut self) {
        if self.is_empty() {
            return;
        }
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.slots.clear();
        self.values = 0;
        log::trace!("cleared table, {} buckets kept", self.buckets.len());
    }

    #[inline]
    fn bucket_of(&self, hash: &HashCode) -> usize {
        hash.reduce(self.buckets.len())
    }

    /// Position of `key` within bucket `b`, if present.
    fn position(&self, b: usize, key: &K) -> Option<usize> {
        self.buckets[b]
            .iter()
            .position(|&slot| self.eq.equivalent(&self.slots[slot].key, key))
    }

    pub(crate) fn probe(&self, key: &K) -> Probe {
        let hash = self.hasher.hash_code(key);
        let bucket = self.bucket_of(&hash);
        match self.position(bucket, key) {
            Some(pos) => Probe::Occupied(self.buckets[bucket][pos]),
            None => Probe::Vacant(Vacant { hash, bucket }),
        }
    }

    pub(crate) fn contains(&self, key: &K) -> bool {
        matches!(self.probe(key), Probe::Occupied(_))
    }

    pub(crate) fn payload(&self, key: &K) -> Option<&P> {
        match self.probe(key) {
            Probe::Occupied(slot) => Some(&self.slots[slot].payload),
            Probe::Vacant(_) => None,
        }
    }

    pub(crate) fn payload_mut(&mut self, key: &K) -> Option<&mut P> {
        match self.probe(key) {
            Probe::Occupied(slot) => Some(&mut self.slots[slot].payload),
            Probe::Vacant(_) => None,
        }
    }

    /// Link a new entry at the front of its bucket, then restore the load
    /// factor invariant.
    pub(crate) fn link(&mut self, at: Vacant, key: K, payload: P) {
        debug_assert!(payload.len() > 0, "entries never hold zero values");
        self.values += payload.len();
        let slot = self.slots.insert(Entry {
            key,
            hash: at.hash,
            payload,
        });
        self.buckets[at.bucket].push_front(slot);
        self.grow_if_needed();
    }

    /// Change the payload of an occupied slot, keeping the value count in
    /// step. The key count is untouched, so no growth can follow.
    pub(crate) fn modify<R>(&mut self, slot: DefaultKey, f: impl FnOnce(&mut P) -> R) -> R {
        let payload = &mut self.slots[slot].payload;
        let before = payload.len();
        let out = f(payload);
        let after = payload.len();
        debug_assert!(after > 0, "entries never hold zero values");
        self.values = self.values - before + after;
        out
    }

    /// Unlink the entry for `key` and hand back its key and payload.
    pub(crate) fn unlink(&mut self, key: &K) -> Option<(K, P)> {
        let hash = self.hasher.hash_code(key);
        let b = self.bucket_of(&hash);
        let pos = self.position(b, key)?;
        let slot = self.buckets[b].remove(pos)?;
        let entry = self.slots.remove(slot)?;
        self.values -= entry.payload.len();
        Some((entry.key, entry.payload))
    }

    fn grow_if_needed(&mut self) {
        while self.load_factor() >= self.config.max_load_factor() {
            self.rehash();
        }
    }

    /// Relocate every slot key into a bucket array `rehashing_factor` times
    /// larger, using the cached hash codes.
    fn rehash(&mut self) {
        let old = self.buckets.len();
        let target = old * self.config.rehashing_factor();
        let mut fresh = empty_buckets(target);
        for slot in self.buckets.drain(..).flatten() {
            let b = self.slots[slot].hash.reduce(target);
            fresh[b].push_back(slot);
        }
        self.buckets = fresh;
        self.rehashes += 1;
        log::debug!(
            "rehash #{}: {} keys from {} to {} buckets",
            self.rehashes,
            self.slots.len(),
            old,
            target
        );
    }
}

impl<K, P, H, E> KeyedTable<K, P, H, E>
where
    P: Payload,
{
    pub(crate) fn display_with<'a, FK, FV>(
        &'a self,
        fmt_key: FK,
        fmt_value: FV,
    ) -> Render<'a, K, P, H, E, FK, FV>
    where
        FK: Fn(&mut fmt::Formatter<'_>, &K) -> fmt::Result,
        FV: Fn(&mut fmt::Formatter<'_>, &P::Value) -> fmt::Result,
    {
        Render {
            table: self,
            fmt_key,
            fmt_value,
        }
    }
}

fn empty_buckets(n: usize) -> Vec<Bucket> {
    (0..n).map(|_| Bucket::new()).collect()
}

/// One line per bucket: `[i] ==> [key:(v1,v2)] ==> [...]`.
pub(crate) struct Render<'a, K, P, H, E, FK, FV> {
    table: &'a KeyedTable<K, P, H, E>,
    fmt_key: FK,
    fmt_value: FV,
}

impl<K, P, H, E, FK, FV> fmt::Display for Render<'_, K, P, H, E, FK, FV>
where
    P: Payload,
    FK: Fn(&mut fmt::Formatter<'_>, &K) -> fmt::Result,
    FV: Fn(&mut fmt::Formatter<'_>, &P::Value) -> fmt::Result,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, bucket) in self.table.buckets.iter().enumerate() {
            write!(f, "[{}]", i)?;
            for &slot in bucket {
                let entry = &self.table.slots[slot];
                f.write_str(" ==> [")?;
                (self.fmt_key)(f, &entry.key)?;
                f.write_str(":(")?;
                for (n, v) in entry.payload.iter().enumerate() {
                    if n > 0 {
                        f.write_str(",")?;
                    }
                    (self.fmt_value)(f, v)?;
                }
                f.write_str(")]")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::NaturalEq;

    fn identity_hash(k: &u64) -> HashCode {
        HashCode::from(*k)
    }

    type T = KeyedTable<u64, Single<&'static str>, fn(&u64) -> HashCode, NaturalEq>;

    fn table(buckets: usize, lf: f64, factor: usize) -> T {
        let config = TableConfig::builder()
            .with_initial_buckets(buckets)
            .with_max_load_factor(lf)
            .with_rehashing_factor(factor)
            .build()
            .unwrap();
        KeyedTable::with_parts(config, identity_hash as fn(&u64) -> HashCode, NaturalEq)
    }

    fn put(t: &mut T, k: u64, v: &'static str) {
        match t.probe(&k) {
            Probe::Vacant(at) => t.link(at, k, Single(v)),
            Probe::Occupied(_) => panic!("unexpected duplicate {}", k),
        }
    }

    /// Invariant: new entries are prepended to their chain.
    #[test]
    fn chains_prepend() {
        let mut t = table(4, 10.0, 2);
        put(&mut t, 1, "a");
        put(&mut t, 5, "b");
        put(&mut t, 9, "c");
        assert_eq!(t.bucket_size(1), Ok(3));
        let order: Vec<u64> = t.buckets[1].iter().map(|&s| t.slots[s].key).collect();
        assert_eq!(order, vec![9, 5, 1]);
    }

    /// Invariant: a rehash keeps the relative order of keys that stay
    /// together and moves entries instead of recreating them.
    #[test]
    fn rehash_relocates_slots_in_order() {
        let mut t = table(2, 2.0, 2);
        put(&mut t, 0, "a");
        put(&mut t, 4, "b");
        put(&mut t, 2, "c");
        let before: Vec<DefaultKey> = t.buckets[0].iter().copied().collect();
        assert_eq!(t.bucket_count(), 2);

        // Fourth key makes 4/2 == 2.0 and triggers growth to 4 buckets.
        put(&mut t, 1, "d");
        assert_eq!(t.bucket_count(), 4);
        assert_eq!(t.rehash_count(), 1);

        // 2 moves to bucket 2; 4 and 0 stay in bucket 0 in the same order.
        let zero: Vec<DefaultKey> = t.buckets[0].iter().copied().collect();
        assert_eq!(zero, vec![before[1], before[2]]);
        assert_eq!(t.buckets[2].iter().copied().collect::<Vec<_>>(), vec![before[0]]);
        assert_eq!(t.slots[before[0]].key, 2);
    }

    /// Invariant: growth repeats until the load factor is below the maximum.
    #[test]
    fn tiny_load_factor_grows_repeatedly() {
        let mut t = table(1, 0.1, 2);
        put(&mut t, 7, "x");
        assert!(t.load_factor() < 0.1);
        assert_eq!(t.bucket_count(), 16);
        assert_eq!(t.rehash_count(), 4);
    }

    #[test]
    fn unlink_updates_counts() {
        let mut t = table(8, 0.9, 2);
        put(&mut t, 3, "three");
        put(&mut t, 11, "eleven");
        assert_eq!(t.value_count(), 2);

        let (k, p) = t.unlink(&3).unwrap();
        assert_eq!((k, p.0), (3, "three"));
        assert_eq!(t.key_count(), 1);
        assert_eq!(t.value_count(), 1);
        assert!(t.unlink(&3).is_none());
        assert!(t.contains(&11));
    }

    #[test]
    fn bucket_size_out_of_range() {
        let t = table(3, 0.75, 2);
        assert_eq!(t.bucket_size(2), Ok(0));
        assert_eq!(
            t.bucket_size(3),
            Err(TableError::IndexOutOfRange {
                index: 3,
                bucket_count: 3
            })
        );
    }

    #[test]
    fn render_lists_buckets() {
        let mut t = table(3, 10.0, 2);
        put(&mut t, 1, "a");
        put(&mut t, 4, "b");
        let s = t
            .display_with(|f, k| write!(f, "{}", k), |f, v| f.write_str(v))
            .to_string();
        assert_eq!(s, "[0]\n[1] ==> [4:(b)] ==> [1:(a)]\n[2]\n");
    }
}
