//! IndexTable: many values per key, keyed by an extractor.

use crate::config::TableConfig;
use crate::error::TableError;
use crate::keyed_table::{KeyedTable, Many, Probe};
use crate::strategy::{Identity, KeyEq, KeyExtractor, KeyHasher, NaturalEq, StdHash};
use core::fmt;
use core::hash::Hash;
use core::iter::FusedIterator;
use std::collections::vec_deque;

/// A chained hash table grouping values under a key derived from each value.
///
/// Inserting never fails: values whose extracted keys are equal accumulate
/// under one entry, most recent first. The load factor counts distinct
/// keys, so piling values onto an existing key never grows the table.
///
/// ```
/// use keyed_table::IndexTable;
///
/// let mut by_sender = IndexTable::new(|tx: &(String, u32)| tx.0.clone());
/// by_sender.insert(("samanta".to_string(), 24));
/// by_sender.insert(("samanta".to_string(), 7));
/// by_sender.insert(("anderson".to_string(), 3));
///
/// let amounts: Vec<u32> = by_sender.search(&"samanta".to_string()).map(|tx| tx.1).collect();
/// assert_eq!(amounts, [7, 24]);
/// assert_eq!(by_sender.key_count(), 2);
/// assert_eq!(by_sender.len(), 3);
/// ```
pub struct IndexTable<K, V, X, H = StdHash, E = NaturalEq> {
    table: KeyedTable<K, Many<V>, H, E>,
    extractor: X,
}

impl<K, V, X> IndexTable<K, V, X>
where
    K: Eq + Hash,
    X: KeyExtractor<V, K>,
{
    pub fn new(extractor: X) -> Self {
        Self::with_config(TableConfig::default(), extractor)
    }

    pub fn with_config(config: TableConfig, extractor: X) -> Self {
        Self::with_parts(config, extractor, StdHash::default(), NaturalEq)
    }
}

/// A multiset: every value is its own key.
impl<V> Default for IndexTable<V, V, Identity>
where
    V: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self::new(Identity)
    }
}

impl<K, V, X, H> IndexTable<K, V, X, H>
where
    K: PartialEq,
    X: KeyExtractor<V, K>,
    H: KeyHasher<K>,
{
    /// Default configuration, natural equality, caller-supplied hasher.
    pub fn with_hasher(extractor: X, hasher: H) -> Self {
        Self::with_parts(TableConfig::default(), extractor, hasher, NaturalEq)
    }
}

impl<K, V, X, H, E> IndexTable<K, V, X, H, E>
where
    X: KeyExtractor<V, K>,
    H: KeyHasher<K>,
    E: KeyEq<K>,
{
    pub fn with_parts(config: TableConfig, extractor: X, hasher: H, eq: E) -> Self {
        Self {
            table: KeyedTable::with_parts(config, hasher, eq),
            extractor,
        }
    }

    /// File `value` under its extracted key.
    pub fn insert(&mut self, value: V) {
        let key = self.extractor.extract(&value);
        match self.table.probe(&key) {
            Probe::Occupied(slot) => self.table.modify(slot, |values| values.0.push_front(value)),
            Probe::Vacant(at) => self.table.link(at, key, Many::one(value)),
        }
    }

    /// Every value filed under `key`, most recent first. Empty when the key
    /// is absent.
    pub fn search(&self, key: &K) -> Search<'_, V> {
        Search {
            inner: self.table.payload(key).map(|values| values.0.iter()),
        }
    }

    /// Remove `key` together with all of its values. Returns `false` if the
    /// key was absent.
    pub fn remove(&mut self, key: &K) -> bool {
        self.table.unlink(key).is_some()
    }

    pub fn find(&self, key: &K) -> bool {
        self.table.contains(key)
    }

    /// Number of stored values across all keys.
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

    /// Entries (distinct keys) chained in bucket `i`.
    pub fn bucket_size(&self, i: usize) -> Result<usize, TableError> {
        self.table.bucket_size(i)
    }

    pub fn load_factor(&self) -> f64 {
        self.table.load_factor()
    }

    pub fn config(&self) -> &TableConfig {
        self.table.config()
    }

    pub fn clear(&mut self) {
        self.table.clear()
    }

    #[cfg(test)]
    pub(crate) fn rehash_count(&self) -> usize {
        self.table.rehash_count()
    }
}

impl<K, V, X, H, E> IndexTable<K, V, X, H, E> {
    /// Render one line per bucket, e.g. `[0] ==> [k:(v2,v1)]`.
    pub fn display_with<'a, FK, FV>(&'a self, fmt_key: FK, fmt_value: FV) -> impl fmt::Display + 'a
    where
        FK: Fn(&mut fmt::Formatter<'_>, &K) -> fmt::Result + 'a,
        FV: Fn(&mut fmt::Formatter<'_>, &V) -> fmt::Result + 'a,
    {
        self.table.display_with(fmt_key, fmt_value)
    }
}

impl<K, V, X, H, E> fmt::Display for IndexTable<K, V, X, H, E>
where
    K: fmt::Display,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.display_with(|f, k| k.fmt(f), |f, v| v.fmt(f)).fmt(f)
    }
}

/// Values filed under one key, most recent first.
#[derive(Clone)]
pub struct Search<'a, V> {
    inner: Option<vec_deque::Iter<'a, V>>,
}

impl<'a, V> Iterator for Search<'a, V> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.as_mut()?.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.inner.as_ref().map_or(0, ExactSizeIterator::len);
        (n, Some(n))
    }
}

impl<V> ExactSizeIterator for Search<'_, V> {}

impl<V> FusedIterator for Search<'_, V> {}
