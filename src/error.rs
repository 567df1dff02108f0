use thiserror::Error;

/// Failures reported by table operations.
///
/// Absence is an error only for the strict accessors; `find`, `search`,
/// `update` and `remove` report it through their return value instead.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableError {
    #[error("key not found")]
    KeyNotFound,
    #[error("key already exists")]
    DuplicateKey,
    #[error("bucket index {index} out of range for {bucket_count} buckets")]
    IndexOutOfRange { index: usize, bucket_count: usize },
}

/// Rejected table configuration.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("initial bucket count must be positive")]
    ZeroBuckets,
    #[error("max load factor must be positive and finite, got {0}")]
    InvalidLoadFactor(f64),
    #[error("rehashing factor {factor} outside of [{min}, {max}]")]
    RehashingFactorOutOfRange {
        factor: usize,
        min: usize,
        max: usize,
    },
}
