//! UniqueTable: one value per key.

use crate::config::TableConfig;
use crate::error::TableError;
use crate::keyed_table::{KeyedTable, Probe, Single};
use crate::strategy::{KeyEq, KeyHasher, NaturalEq, StdHash};
use core::fmt;
use core::hash::Hash;

/// A chained hash table mapping each key to exactly one value.
///
/// `set` rejects keys that are already present; `update` replaces values in
/// place. The bucket array grows by the configured rehashing factor whenever
/// an insertion brings `key_count / bucket_count` up to the maximum load
/// factor.
///
/// ```
/// use keyed_table::{TableError, UniqueTable};
///
/// let mut t = UniqueTable::new();
/// t.set("guarana", 2.4).unwrap();
/// assert_eq!(t.set("guarana", 9.9), Err(TableError::DuplicateKey));
/// assert_eq!(t.get(&"guarana"), Ok(&2.4));
/// assert!(t.update(&"guarana", 3.0));
/// assert!(t.remove(&"guarana"));
/// assert!(!t.find(&"guarana"));
/// ```
pub struct UniqueTable<K, V, H = StdHash, E = NaturalEq> {
    table: KeyedTable<K, Single<V>, H, E>,
}

impl<K, V> UniqueTable<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_config(TableConfig::default())
    }

    pub fn with_config(config: TableConfig) -> Self {
        Self::with_parts(config, StdHash::default(), NaturalEq)
    }
}

impl<K, V> Default for UniqueTable<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, H> UniqueTable<K, V, H>
where
    K: PartialEq,
    H: KeyHasher<K>,
{
    /// Default configuration, natural equality, caller-supplied hasher.
    pub fn with_hasher(hasher: H) -> Self {
        Self::with_parts(TableConfig::default(), hasher, NaturalEq)
    }
}

impl<K, V, H, E> UniqueTable<K, V, H, E>
where
    H: KeyHasher<K>,
    E: KeyEq<K>,
{
    pub fn with_parts(config: TableConfig, hasher: H, eq: E) -> Self {
        Self {
            table: KeyedTable::with_parts(config, hasher, eq),
        }
    }

    /// Insert `key -> value`; fails with `DuplicateKey` and leaves the table
    /// untouched if an equal key is present.
    pub fn set(&mut self, key: K, value: V) -> Result<(), TableError> {
        match self.table.probe(&key) {
            Probe::Occupied(_) => Err(TableError::DuplicateKey),
            Probe::Vacant(at) => {
                self.table.link(at, key, Single(value));
                Ok(())
            }
        }
    }

    pub fn get(&self, key: &K) -> Result<&V, TableError> {
        self.table
            .payload(key)
            .map(|p| &p.0)
            .ok_or(TableError::KeyNotFound)
    }

    pub fn get_mut(&mut self, key: &K) -> Result<&mut V, TableError> {
        self.table
            .payload_mut(key)
            .map(|p| &mut p.0)
            .ok_or(TableError::KeyNotFound)
    }

    /// Replace the value for `key`. Returns `false` if the key is absent.
    pub fn update(&mut self, key: &K, value: V) -> bool {
        match self.table.payload_mut(key) {
            Some(p) => {
                p.0 = value;
                true
            }
            None => false,
        }
    }

    /// Remove `key`. Returns `false` if it was absent.
    pub fn remove(&mut self, key: &K) -> bool {
        self.table.unlink(key).is_some()
    }

    pub fn find(&self, key: &K) -> bool {
        self.table.contains(key)
    }

    /// Number of stored values; equals `key_count` in this mode.
    pub fn len(&self) -> usize {
        self.table.value_count()
    }

    pub fn key_count(&self) -> usize {
        self.table.key_count()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn bucket_count(&self) -> usize {
        self.table.bucket_count()
    }

    /// Entries chained in bucket `i`.
    pub fn bucket_size(&self, i: usize) -> Result<usize, TableError> {
        self.table.bucket_size(i)
    }

    pub fn load_factor(&self) -> f64 {
        self.table.load_factor()
    }

    pub fn config(&self) -> &TableConfig {
        self.table.config()
    }

    /// Drop all entries, keeping the current bucket count.
    pub fn clear(&mut self) {
        self.table.clear()
    }

    #[cfg(test)]
    pub(crate) fn rehash_count(&self) -> usize {
        self.table.rehash_count()
    }
}

impl<K, V, H, E> UniqueTable<K, V, H, E> {
    /// Render one line per bucket with caller-supplied key and value
    /// formatting, e.g. `[3] ==> [k:(v)] ==> [j:(w)]`.
    pub fn display_with<'a, FK, FV>(&'a self, fmt_key: FK, fmt_value: FV) -> impl fmt::Display + 'a
    where
        FK: Fn(&mut fmt::Formatter<'_>, &K) -> fmt::Result + 'a,
        FV: Fn(&mut fmt::Formatter<'_>, &V) -> fmt::Result + 'a,
    {
        self.table.display_with(fmt_key, fmt_value)
    }
}

impl<K, V, H, E> fmt::Display for UniqueTable<K, V, H, E>
where
    K: fmt::Display,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.display_with(|f, k| k.fmt(f), |f, v| v.fmt(f)).fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash_code::HashCode;

    fn five_half() -> TableConfig {
        TableConfig::builder()
            .with_initial_buckets(5)
            .with_max_load_factor(0.5)
            .build()
            .unwrap()
    }

    /// Invariant: the third key in a 5-bucket, 0.5 table triggers exactly one
    /// rehash to 10 buckets and every value survives it.
    #[test]
    fn third_insert_doubles_five_buckets() {
        let mut t: UniqueTable<&str, i32> = UniqueTable::with_config(five_half());
        t.set("a", 1).unwrap();
        t.set("b", 2).unwrap();
        assert_eq!(t.bucket_count(), 5);
        assert_eq!(t.load_factor(), 0.4);

        t.set("c", 3).unwrap();
        assert_eq!(t.bucket_count(), 10);
        assert_eq!(t.rehash_count(), 1);
        assert_eq!(t.get(&"a"), Ok(&1));
        assert_eq!(t.get(&"b"), Ok(&2));
        assert_eq!(t.get(&"c"), Ok(&3));
    }

    /// Invariant: the hasher runs once per operation and never during a
    /// rehash, which reuses cached codes.
    #[test]
    fn rehash_does_not_call_hasher() {
        use std::cell::Cell;
        let calls = Cell::new(0usize);
        let hasher = |k: &u64| {
            calls.set(calls.get() + 1);
            HashCode::from(*k)
        };
        let mut t: UniqueTable<u64, u64, _> = UniqueTable::with_parts(five_half(), hasher, NaturalEq);
        for k in 0..20 {
            t.set(k, k * 10).unwrap();
        }
        assert!(t.rehash_count() >= 2);
        assert_eq!(calls.get(), 20);
    }

    #[test]
    fn get_mut_changes_value_in_place() {
        let mut t = UniqueTable::new();
        t.set("k".to_string(), 10).unwrap();
        *t.get_mut(&"k".to_string()).unwrap() += 5;
        assert_eq!(t.get(&"k".to_string()), Ok(&15));
        assert_eq!(
            t.get_mut(&"missing".to_string()),
            Err(TableError::KeyNotFound)
        );
    }

    /// Invariant: equality is the injected predicate, not `PartialEq`.
    #[test]
    fn custom_equality_merges_keys() {
        let hasher = |k: &String| HashCode::from(k.to_lowercase().len() as u64);
        let eq = |a: &String, b: &String| a.eq_ignore_ascii_case(b);
        let mut t = UniqueTable::with_parts(TableConfig::default(), hasher, eq);
        t.set("Juan".to_string(), 1).unwrap();
        assert_eq!(t.set("JUAN".to_string(), 2), Err(TableError::DuplicateKey));
        assert_eq!(t.get(&"juan".to_string()), Ok(&1));
        assert_eq!(t.key_count(), 1);
    }

    #[test]
    fn display_renders_every_bucket() {
        let hasher = |k: &u64| HashCode::from(*k);
        let mut t: UniqueTable<u64, &str, _> = UniqueTable::with_hasher(hasher);
        t.set(3, "three").unwrap();
        t.set(14, "fourteen").unwrap();
        let out = t.to_string();
        assert_eq!(out.lines().count(), t.bucket_count());
        assert_eq!(
            out.lines().nth(3),
            Some("[3] ==> [14:(fourteen)] ==> [3:(three)]")
        );
    }
}
