//! gem5 statistics extraction library.
//!
//! This crate reads the flat `stats.txt` counter dump a gem5 simulation writes
//! and summarizes it per core:
//! 1. **Config:** Which counters are recognized, and under which logical names.
//! 2. **Parser:** A single substring-matching pass producing global and per-core records.
//! 3. **Metrics:** The record types, with zero-defaulting lookups.
//! 4. **Report:** Text and JSON rendering of the records.
//!
//! ```no_run
//! let (global, cores) = m5stats_core::parse("m5out/stats.txt", 2)?;
//! print!("{}", m5stats_core::render(&global, &cores));
//! # Ok::<(), m5stats_core::ReportError>(())
//! ```

/// Counter definitions, defaults, and entity-count validation.
pub mod config;
/// Error taxonomy and result alias.
pub mod error;
/// Metric values and records.
pub mod metrics;
/// Line-oriented counter parser.
pub mod parser;
/// Text and JSON report rendering.
pub mod report;

/// Parser configuration; use `ParserConfig::default()` for gem5 output.
pub use crate::config::{MAX_ENTITY_COUNT, MetricDefinition, ParserConfig, parse_entity_count};
/// Failure type shared by every operation.
pub use crate::error::{ReportError, Result};
/// Record types produced by the parser.
pub use crate::metrics::{EntityMetrics, GlobalMetrics, MetricKind, MetricRecord, MetricValue};
/// Parser entry points.
pub use crate::parser::{CounterParser, ParsedStats, parse};
/// Renderer entry points.
pub use crate::report::{FieldFormat, ReportField, ReportLayout, render, render_json, render_with};
