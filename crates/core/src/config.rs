//! Configuration for counter extraction.
//!
//! This module defines which counters the parser recognizes. It provides:
//! 1. **Defaults:** The gem5 counter names and the stats file location used when nothing is overridden.
//! 2. **Definitions:** `(pattern, key, kind)` entries tested in order against each line.
//! 3. **Loading:** JSON deserialization with per-field defaults, and validation.
//!
//! Use `ParserConfig::default()` for gem5 `stats.txt` files, or load overrides
//! with [`ParserConfig::from_json_file`].

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{ReportError, Result};
use crate::metrics::MetricKind;

/// Default configuration constants.
///
/// These values reproduce the counters gem5 writes for an O3/Minor CPU with
/// the `commitStats0` group enabled.
mod defaults {
    use crate::metrics::MetricKind;

    /// Stats file written by gem5 in its default output directory.
    pub const STATS_PATH: &str = "m5out/stats.txt";

    /// Prefix of every per-core counter, followed by the core index and a dot.
    pub const NAMESPACE: &str = "system.cpu";

    /// Lines starting with this marker are skipped.
    pub const COMMENT_MARKER: &str = "#";

    /// Largest core count accepted; bounds the up-front pattern and record tables.
    pub const MAX_ENTITIES: usize = 65_536;

    /// Whole-run counters: `(pattern, key, kind)`.
    ///
    /// `simSeconds` is the current gem5 name, `sim_seconds` the pre-v21 one.
    pub const GLOBAL: &[(&str, &str, MetricKind)] = &[
        ("simSeconds", "execution_time", MetricKind::Float),
        ("sim_seconds", "execution_time", MetricKind::Float),
    ];

    /// Per-core counters: `(suffix, key, kind)`, in match priority order.
    ///
    /// Trailing spaces are part of the pattern: `numInsts ` does not match
    /// `numInstsNotNOP`, nor `SimdFloatMult ` `SimdFloatMultAcc`.
    pub const ENTITY: &[(&str, &str, MetricKind)] = &[
        ("cpi", "CPI", MetricKind::Float),
        ("commitStats0.numInsts ", "commit_insts", MetricKind::Count),
        ("numCycles", "num_cycles", MetricKind::Count),
        ("ipc", "IPC", MetricKind::Float),
        (
            "commitStats0.committedInstType::SimdFloatAdd",
            "SIMD_float_add",
            MetricKind::Count,
        ),
        (
            "commitStats0.committedInstType::SimdFloatCvt",
            "SIMD_float_convert",
            MetricKind::Count,
        ),
        (
            "commitStats0.committedInstType::SimdFloatMult ",
            "SIMD_float_multiply",
            MetricKind::Count,
        ),
    ];
}

/// Default stats file path (`m5out/stats.txt`).
pub const DEFAULT_STATS_PATH: &str = defaults::STATS_PATH;

/// Upper bound on the entity count accepted by [`parse_entity_count`] and
/// [`crate::CounterParser::new`].
pub const MAX_ENTITY_COUNT: usize = defaults::MAX_ENTITIES;

/// One recognized counter.
///
/// For global definitions `pattern` is the full text searched for; for entity
/// definitions it is the suffix appended to `"<namespace><index>."`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MetricDefinition {
    /// Text that must be contained in a line for it to match.
    pub pattern: String,
    /// Logical metric name the value is stored under.
    pub key: String,
    /// Numeric type of the value token.
    #[serde(default)]
    pub kind: MetricKind,
}

impl MetricDefinition {
    /// Creates a definition.
    pub fn new(pattern: impl Into<String>, key: impl Into<String>, kind: MetricKind) -> Self {
        Self {
            pattern: pattern.into(),
            key: key.into(),
            kind,
        }
    }

    fn from_table(table: &[(&str, &str, MetricKind)]) -> Vec<Self> {
        table
            .iter()
            .map(|&(pattern, key, kind)| Self::new(pattern, key, kind))
            .collect()
    }
}

/// Parser configuration: which lines to skip and which counters to extract.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ParserConfig {
    /// Per-entity prefix, e.g. `system.cpu` for `system.cpu0.ipc`.
    #[serde(default = "ParserConfig::default_namespace")]
    pub namespace: String,

    /// Lines starting with this marker are ignored.
    #[serde(default = "ParserConfig::default_comment_marker")]
    pub comment_marker: String,

    /// Whole-run counters, tested in order; the first match wins.
    #[serde(default = "ParserConfig::default_global")]
    pub global: Vec<MetricDefinition>,

    /// Per-entity counters, tested in order for each entity; the first match wins.
    #[serde(default = "ParserConfig::default_entity")]
    pub entity: Vec<MetricDefinition>,
}

impl ParserConfig {
    fn default_namespace() -> String {
        defaults::NAMESPACE.to_string()
    }

    fn default_comment_marker() -> String {
        defaults::COMMENT_MARKER.to_string()
    }

    fn default_global() -> Vec<MetricDefinition> {
        MetricDefinition::from_table(defaults::GLOBAL)
    }

    fn default_entity() -> Vec<MetricDefinition> {
        MetricDefinition::from_table(defaults::ENTITY)
    }

    /// Deserializes and validates a configuration from JSON text.
    ///
    /// Missing fields take their defaults, so `{}` yields the default config.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::InvalidArgument`] if the JSON is malformed or
    /// the resulting configuration fails [`ParserConfig::validate`].
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ReportError::invalid(format!("invalid metrics config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, deserializes, and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::InvalidArgument`] if the file cannot be read or
    /// its contents are rejected by [`ParserConfig::from_json_str`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            ReportError::invalid(format!(
                "cannot read metrics config {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json_str(&text)
    }

    /// Checks that every pattern can discriminate between lines.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::InvalidArgument`] for an empty namespace,
    /// comment marker, key, or pattern. An empty pattern would be contained
    /// in every line.
    pub fn validate(&self) -> Result<()> {
        if self.namespace.is_empty() {
            return Err(ReportError::invalid("metrics config: namespace is empty"));
        }
        if self.comment_marker.is_empty() {
            return Err(ReportError::invalid(
                "metrics config: comment marker is empty",
            ));
        }
        for (scope, defs) in [("global", &self.global), ("entity", &self.entity)] {
            for (i, def) in defs.iter().enumerate() {
                if def.key.is_empty() {
                    return Err(ReportError::invalid(format!(
                        "metrics config: {scope} definition {i} has an empty key"
                    )));
                }
                if def.pattern.is_empty() {
                    return Err(ReportError::invalid(format!(
                        "metrics config: {scope} definition `{}` has an empty pattern",
                        def.key
                    )));
                }
            }
        }
        Ok(())
    }

    /// Full pattern for entity `index` and an entity definition.
    ///
    /// # Arguments
    ///
    /// * `index` - Zero-based entity index.
    /// * `def` - Entity definition whose `pattern` is the suffix.
    pub fn entity_pattern(&self, index: usize, def: &MetricDefinition) -> String {
        format!("{}{index}.{}", self.namespace, def.pattern)
    }
}

impl Default for ParserConfig {
    /// Creates the gem5 `stats.txt` configuration.
    fn default() -> Self {
        Self {
            namespace: Self::default_namespace(),
            comment_marker: Self::default_comment_marker(),
            global: Self::default_global(),
            entity: Self::default_entity(),
        }
    }
}

/// Parses and validates the entity count given on the command line.
///
/// Surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns [`ReportError::InvalidArgument`] when `raw` is not an integer, is
/// less than one, or exceeds [`MAX_ENTITY_COUNT`].
pub fn parse_entity_count(raw: &str) -> Result<usize> {
    let value: i64 = raw.trim().parse().map_err(|_| {
        ReportError::invalid(format!("invalid number of CPUs: {raw:?} is not an integer"))
    })?;
    if value < 1 {
        return Err(ReportError::invalid("Number of CPUs must be at least 1."));
    }
    match usize::try_from(value) {
        Ok(count) if count <= MAX_ENTITY_COUNT => Ok(count),
        _ => Err(ReportError::invalid(format!(
            "Number of CPUs must be at most {MAX_ENTITY_COUNT}."
        ))),
    }
}
