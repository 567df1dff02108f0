//! Collaborator strategies bound into a table at construction.
//!
//! Each seam is a small trait with a blanket implementation for closures,
//! plus a default implementation for the common case.

use crate::hash_code::HashCode;
use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::DefaultHashBuilder;

/// Maps a key to its wide hash code.
///
/// Must be deterministic, and keys judged equal by the table's [`KeyEq`]
/// must produce equal codes.
pub trait KeyHasher<K: ?Sized> {
    fn hash_code(&self, key: &K) -> HashCode;
}

impl<K: ?Sized, F> KeyHasher<K> for F
where
    F: Fn(&K) -> HashCode,
{
    #[inline]
    fn hash_code(&self, key: &K) -> HashCode {
        self(key)
    }
}

/// Decides whether two keys denote the same entry.
pub trait KeyEq<K: ?Sized> {
    fn equivalent(&self, a: &K, b: &K) -> bool;
}

impl<K: ?Sized, F> KeyEq<K> for F
where
    F: Fn(&K, &K) -> bool,
{
    #[inline]
    fn equivalent(&self, a: &K, b: &K) -> bool {
        self(a, b)
    }
}

/// Derives the key under which an index-mode value is stored.
pub trait KeyExtractor<V: ?Sized, K> {
    fn extract(&self, value: &V) -> K;
}

impl<V: ?Sized, K, F> KeyExtractor<V, K> for F
where
    F: Fn(&V) -> K,
{
    #[inline]
    fn extract(&self, value: &V) -> K {
        self(value)
    }
}

/// Hashes keys through `core::hash::Hash` and a `BuildHasher`.
///
/// The 64-bit result occupies the low limb of the [`HashCode`].
#[derive(Clone, Debug, Default)]
pub struct StdHash<S = DefaultHashBuilder>(S);

impl<S> StdHash<S> {
    pub fn new(builder: S) -> Self {
        StdHash(builder)
    }
}

impl<K, S> KeyHasher<K> for StdHash<S>
where
    K: ?Sized + Hash,
    S: BuildHasher,
{
    #[inline]
    fn hash_code(&self, key: &K) -> HashCode {
        HashCode::from(self.0.hash_one(key))
    }
}

/// Equality through `PartialEq`.
#[derive(Copy, Clone, Debug, Default)]
pub struct NaturalEq;

impl<K: ?Sized + PartialEq> KeyEq<K> for NaturalEq {
    #[inline]
    fn equivalent(&self, a: &K, b: &K) -> bool {
        a == b
    }
}

/// Uses a clone of the value as its own key.
#[derive(Copy, Clone, Debug, Default)]
pub struct Identity;

impl<V: Clone> KeyExtractor<V, V> for Identity {
    #[inline]
    fn extract(&self, value: &V) -> V {
        value.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_implement_every_seam() {
        let hasher = |k: &u64| HashCode::from(*k * 2);
        let eq = |a: &u64, b: &u64| a % 10 == b % 10;
        let extract = |v: &(u64, String)| v.0;

        assert_eq!(hasher.hash_code(&21), HashCode::from(42u64));
        assert!(eq.equivalent(&3, &13));
        assert!(!eq.equivalent(&3, &4));
        assert_eq!(extract.extract(&(7, "seven".to_string())), 7);
    }

    /// Invariant: the default hasher is deterministic for a given builder.
    #[test]
    fn std_hash_is_stable_per_builder() {
        let h: StdHash = StdHash::default();
        let a = h.hash_code("alpha");
        assert_eq!(a, h.hash_code("alpha"));
        assert_eq!(a.limbs()[..3], [0, 0, 0]);
    }

    #[test]
    fn natural_eq_and_identity() {
        assert!(NaturalEq.equivalent("x", "x"));
        assert!(!NaturalEq.equivalent("x", "y"));
        assert_eq!(Identity.extract(&"key".to_string()), "key");
    }
}
