//! Metric values and the records that hold them.
//!
//! A parse pass produces two kinds of record:
//! 1. **Global metrics:** whole-run scalars such as the simulated execution time.
//! 2. **Entity metrics:** one record per monitored core, indexed from zero.
//!
//! Records are plain name → value maps. Lookups used by the renderer never
//! fail; a missing key reads as zero.

use std::collections::BTreeMap;
use std::ops::Index;

use serde::{Deserialize, Serialize};

/// Numeric type a counter is parsed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    /// Floating-point value (ratios, seconds).
    #[default]
    Float,
    /// Signed integer count (cycles, instructions); gem5 counters are `int64_t`.
    #[serde(alias = "int", alias = "integer")]
    Count,
}

impl MetricKind {
    /// Parses a value token as this kind.
    ///
    /// Returns `None` when the token is not a valid number of the kind.
    /// Floats accept the usual decimal and exponent forms plus `nan` and
    /// `inf`, which gem5 emits for ratios over zero cycles.
    pub fn parse(self, token: &str) -> Option<MetricValue> {
        match self {
            Self::Float => token.parse::<f64>().ok().map(MetricValue::Float),
            Self::Count => token.parse::<i64>().ok().map(MetricValue::Count),
        }
    }
}

/// A single parsed counter value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    /// Floating-point measurement.
    Float(f64),
    /// Integer count.
    Count(i64),
}

impl MetricValue {
    /// The value widened to `f64`.
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Float(v) => v,
            Self::Count(v) => v as f64,
        }
    }

    /// The value as a count; floats truncate toward zero, saturate at the
    /// `i64` bounds, and NaN reads as 0.
    pub fn as_i64(self) -> i64 {
        match self {
            Self::Float(v) => v as i64,
            Self::Count(v) => v,
        }
    }
}

/// Mapping from metric name to value for one scope (the run, or one entity).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MetricRecord {
    values: BTreeMap<String, MetricValue>,
}

impl MetricRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key`, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: MetricValue) -> Option<MetricValue> {
        self.values.insert(key.into(), value)
    }

    /// Returns the stored value for `key`, if any.
    pub fn get(&self, key: &str) -> Option<MetricValue> {
        self.values.get(key).copied()
    }

    /// Returns the value for `key` as a float, or `0.0` when absent.
    pub fn float_or_zero(&self, key: &str) -> f64 {
        self.get(key).map_or(0.0, MetricValue::as_f64)
    }

    /// Returns the value for `key` as a count, or `0` when absent.
    pub fn count_or_zero(&self, key: &str) -> i64 {
        self.get(key).map_or(0, MetricValue::as_i64)
    }

    /// Number of metrics present.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no metric has been recorded.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates metrics in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, MetricValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Whole-run metrics.
pub type GlobalMetrics = MetricRecord;

/// Per-entity metrics, one record per index in `[0, len)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EntityMetrics {
    records: Vec<MetricRecord>,
}

impl EntityMetrics {
    /// Creates `count` empty records.
    pub fn with_entities(count: usize) -> Self {
        Self {
            records: vec![MetricRecord::new(); count],
        }
    }

    /// Number of entity records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when there are no entities.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record for entity `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&MetricRecord> {
        self.records.get(index)
    }

    /// Mutable record for entity `index`, if in range.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut MetricRecord> {
        self.records.get_mut(index)
    }

    /// Iterates `(index, record)` pairs in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &MetricRecord)> {
        self.records.iter().enumerate()
    }
}

impl Index<usize> for EntityMetrics {
    type Output = MetricRecord;

    fn index(&self, index: usize) -> &Self::Output {
        &self.records[index]
    }
}

impl From<Vec<MetricRecord>> for EntityMetrics {
    fn from(records: Vec<MetricRecord>) -> Self {
        Self { records }
    }
}
