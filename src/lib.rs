//! keyed-table: a single-threaded, separate-chaining hash table with a
//! unique-key mode and a multi-value index mode.
//!
//! Internal Design:
//!
//! Summary
//! - Layers:
//!   - KeyedTable<K, P, H, E>: structural layer. Owns the bucket array,
//!     the entry storage, the counters and the rehashing policy. Generic
//!     over the payload `P` stored next to each key.
//!   - UniqueTable<K, V, H, E>: one value per key (`set`/`get`/`update`).
//!   - IndexTable<K, V, X, H, E>: values grouped under a key extracted from
//!     each value (`insert`/`search`).
//!
//! Storage
//! - Entries live in a generational `SlotMap`; each bucket is a chain of
//!   slot keys. New entries go to the front of their chain.
//! - Each entry caches its 256-bit `HashCode`. Rehashing relocates slot
//!   keys by the cached code and never calls the hasher again; entries are
//!   moved, never rebuilt.
//!
//! Growth
//! - `load_factor = key_count / bucket_count`. Whenever an insertion leaves
//!   it at or above `max_load_factor`, the bucket array is multiplied by the
//!   rehashing factor until it is below again. The table never shrinks;
//!   `clear()` keeps the current bucket count.
//!
//! Strategies
//! - Hashing, key equality and key extraction are bound at construction
//!   through `KeyHasher`, `KeyEq` and `KeyExtractor`. Closures implement
//!   all three. `StdHash` adapts `core::hash::Hash`; `Sha256Digest`
//!   (feature `sha256`) gives process-independent placement.
//!
//! Errors
//! - `get`/`get_mut` fail with `KeyNotFound`, `set` with `DuplicateKey`,
//!   `bucket_size` with `IndexOutOfRange`. Every other lookup reports
//!   absence through its return value.
//!
//! Notes and non-goals
//! - Single-threaded; no interior mutability, so `&mut self` on every
//!   mutating call keeps callers from holding references across a rehash.
//! - No persistence, no shrinking, no eviction.

mod config;
#[cfg(feature = "sha256")]
mod digest;
mod error;
mod hash_code;
mod index_table;
mod keyed_table;
mod strategy;
mod table_proptest;
mod unique_table;

// Public surface
pub use config::{
    TableConfig, TableConfigBuilder, DEFAULT_BUCKETS, DEFAULT_MAX_LOAD_FACTOR,
    MAX_REHASHING_FACTOR, MIN_REHASHING_FACTOR,
};
#[cfg(feature = "sha256")]
pub use digest::Sha256Digest;
pub use error::{ConfigError, TableError};
pub use hash_code::HashCode;
pub use index_table::{IndexTable, Search};
pub use strategy::{Identity, KeyEq, KeyExtractor, KeyHasher, NaturalEq, StdHash};
pub use unique_table::UniqueTable;
