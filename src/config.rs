//! Construction-time table configuration.

use crate::error::ConfigError;

pub const DEFAULT_BUCKETS: usize = 11;
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.75;
pub const MIN_REHASHING_FACTOR: usize = 2;
pub const MAX_REHASHING_FACTOR: usize = 5;

/// Validated sizing parameters for a table.
///
/// Only obtainable through [`TableConfigBuilder::build`] (or, with the
/// `serde` feature, deserialization, which goes through the same checks),
/// so a table built from it never has to re-validate.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawTableConfig", into = "RawTableConfig")
)]
pub struct TableConfig {
    initial_buckets: usize,
    max_load_factor: f64,
    rehashing_factor: usize,
}

impl TableConfig {
    pub fn builder() -> TableConfigBuilder {
        TableConfigBuilder::default()
    }

    /// Bucket count allocated at construction.
    pub fn initial_buckets(&self) -> usize {
        self.initial_buckets
    }

    /// Threshold of `key_count / bucket_count` that triggers a rehash.
    pub fn max_load_factor(&self) -> f64 {
        self.max_load_factor
    }

    /// Multiplier applied to the bucket count on each rehash.
    pub fn rehashing_factor(&self) -> usize {
        self.rehashing_factor
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_buckets: DEFAULT_BUCKETS,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
            rehashing_factor: MIN_REHASHING_FACTOR,
        }
    }
}

#[derive(Clone, Debug)]
pub struct TableConfigBuilder {
    initial_buckets: usize,
    max_load_factor: f64,
    rehashing_factor: usize,
}

impl Default for TableConfigBuilder {
    fn default() -> Self {
        let d = TableConfig::default();
        Self {
            initial_buckets: d.initial_buckets,
            max_load_factor: d.max_load_factor,
            rehashing_factor: d.rehashing_factor,
        }
    }
}

impl TableConfigBuilder {
    pub fn with_initial_buckets(mut self, buckets: usize) -> Self {
        self.initial_buckets = buckets;
        self
    }

    pub fn with_max_load_factor(mut self, lf: f64) -> Self {
        self.max_load_factor = lf;
        self
    }

    pub fn with_rehashing_factor(mut self, factor: usize) -> Self {
        self.rehashing_factor = factor;
        self
    }

    pub fn build(self) -> Result<TableConfig, ConfigError> {
        if self.initial_buckets == 0 {
            return Err(ConfigError::ZeroBuckets);
        }
        if !(self.max_load_factor.is_finite() && self.max_load_factor > 0.0) {
            return Err(ConfigError::InvalidLoadFactor(self.max_load_factor));
        }
        if !(MIN_REHASHING_FACTOR..=MAX_REHASHING_FACTOR).contains(&self.rehashing_factor) {
            return Err(ConfigError::RehashingFactorOutOfRange {
                factor: self.rehashing_factor,
                min: MIN_REHASHING_FACTOR,
                max: MAX_REHASHING_FACTOR,
            });
        }
        Ok(TableConfig {
            initial_buckets: self.initial_buckets,
            max_load_factor: self.max_load_factor,
            rehashing_factor: self.rehashing_factor,
        })
    }
}

// Wire shape for the serde feature; omitted fields take the defaults.
#[cfg(feature = "serde")]
#[derive(Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
struct RawTableConfig {
    initial_buckets: usize,
    max_load_factor: f64,
    rehashing_factor: usize,
}

#[cfg(feature = "serde")]
impl Default for RawTableConfig {
    fn default() -> Self {
        TableConfig::default().into()
    }
}

#[cfg(feature = "serde")]
impl From<TableConfig> for RawTableConfig {
    fn from(c: TableConfig) -> Self {
        Self {
            initial_buckets: c.initial_buckets,
            max_load_factor: c.max_load_factor,
            rehashing_factor: c.rehashing_factor,
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<RawTableConfig> for TableConfig {
    type Error = ConfigError;

    fn try_from(raw: RawTableConfig) -> Result<Self, Self::Error> {
        TableConfig::builder()
            .with_initial_buckets(raw.initial_buckets)
            .with_max_load_factor(raw.max_load_factor)
            .with_rehashing_factor(raw.rehashing_factor)
            .build()
    }
}
