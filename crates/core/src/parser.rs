//! Counter parser for gem5-style `stats.txt` files.
//!
//! The parser makes a single pass over a line-oriented source. For each line it:
//! 1. **Skips** comments and blank lines.
//! 2. **Matches globals:** the first global definition contained in the line wins.
//! 3. **Matches entities:** for every entity index, the first entity pattern
//!    (`"<namespace><index>." + suffix`) contained in the line wins.
//! 4. **Stores** the second whitespace-separated token, parsed as the matched
//!    definition's kind, overwriting any earlier value for the same key.
//!
//! Matching is substring containment, not an exact or anchored comparison. A
//! pattern without a trailing delimiter (`numCycles`) also matches longer
//! counter names sharing its prefix (`numCyclesExtra`).

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::config::{MAX_ENTITY_COUNT, MetricDefinition, ParserConfig};
use crate::error::{ReportError, Result};
use crate::metrics::{EntityMetrics, GlobalMetrics, MetricRecord};

/// Output of a parse pass: whole-run metrics and one record per entity.
pub type ParsedStats = (GlobalMetrics, EntityMetrics);

/// Parses the stats file at `path` with the default gem5 configuration.
///
/// # Errors
///
/// See [`CounterParser::parse_file`].
pub fn parse(path: impl AsRef<Path>, entity_count: usize) -> Result<ParsedStats> {
    let config = ParserConfig::default();
    CounterParser::new(&config, entity_count)?.parse_file(path)
}

/// Single-pass counter extractor bound to a configuration and entity count.
///
/// Entity patterns are expanded once at construction, so a parser can be
/// reused across several sources with the same layout.
#[derive(Debug)]
pub struct CounterParser<'c> {
    config: &'c ParserConfig,
    /// `patterns[i]` holds the expanded entity patterns for entity `i`, in priority order.
    patterns: Vec<Vec<(String, &'c MetricDefinition)>>,
}

impl<'c> CounterParser<'c> {
    /// Creates a parser for `entity_count` entities.
    ///
    /// # Arguments
    ///
    /// * `config` - Recognized counters and namespace.
    /// * `entity_count` - Number of entities; records `0..entity_count` are always produced.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::InvalidArgument`] if `entity_count` is zero or
    /// above [`MAX_ENTITY_COUNT`], or the configuration fails validation.
    pub fn new(config: &'c ParserConfig, entity_count: usize) -> Result<Self> {
        if entity_count == 0 {
            return Err(ReportError::invalid("Number of CPUs must be at least 1."));
        }
        if entity_count > MAX_ENTITY_COUNT {
            return Err(ReportError::invalid(format!(
                "Number of CPUs must be at most {MAX_ENTITY_COUNT}."
            )));
        }
        config.validate()?;

        let patterns: Vec<Vec<(String, &MetricDefinition)>> = (0..entity_count)
            .map(|index| {
                config
                    .entity
                    .iter()
                    .map(|def| (config.entity_pattern(index, def), def))
                    .collect()
            })
            .collect();

        Ok(Self { config, patterns })
    }

    /// Number of entity records this parser produces.
    pub fn entity_count(&self) -> usize {
        self.patterns.len()
    }

    /// Opens and parses a stats file.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::SourceNotFound`] if the file cannot be opened or
    /// read, and [`ReportError::MalformedMetricValue`] if a recognized line
    /// carries an unparseable value.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<ParsedStats> {
        let path = path.as_ref();
        let origin = path.display().to_string();
        let file = File::open(path).map_err(|source| ReportError::SourceNotFound {
            origin: origin.clone(),
            source,
        })?;
        self.parse_reader(BufReader::new(file), &origin)
    }

    /// Parses any line-oriented source.
    ///
    /// # Arguments
    ///
    /// * `reader` - Source of stats lines.
    /// * `origin` - Name used in error messages (a path, or e.g. `"<memory>"`).
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::SourceNotFound`] if reading fails part-way, and
    /// [`ReportError::MalformedMetricValue`] for an unparseable recognized value.
    pub fn parse_reader<R: BufRead>(&self, reader: R, origin: &str) -> Result<ParsedStats> {
        let mut global = GlobalMetrics::new();
        let mut entities = EntityMetrics::with_entities(self.entity_count());
        let mut lines_read = 0usize;
        let mut matches = 0usize;

        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| ReportError::SourceNotFound {
                origin: origin.to_string(),
                source,
            })?;
            let line_no = idx + 1;
            lines_read = line_no;

            if line.starts_with(&self.config.comment_marker) || line.trim().is_empty() {
                continue;
            }

            let globals = self.config.global.iter().map(|d| (d.pattern.as_str(), d));
            if let Some(def) = first_match(&line, globals) {
                store(&mut global, "global", def, &line, line_no)?;
                matches += 1;
            }

            // Every entity pattern starts with the namespace.
            if !line.contains(self.config.namespace.as_str()) {
                continue;
            }
            for (index, patterns) in self.patterns.iter().enumerate() {
                let candidates = patterns.iter().map(|(p, d)| (p.as_str(), *d));
                let Some(def) = first_match(&line, candidates) else {
                    continue;
                };
                if let Some(record) = entities.get_mut(index) {
                    store(record, &format!("entity {index}"), def, &line, line_no)?;
                    matches += 1;
                }
            }
        }

        tracing::info!(
            origin,
            lines = lines_read,
            matches,
            entities = entities.len(),
            "parsed stats source"
        );
        Ok((global, entities))
    }
}

/// Returns the first definition whose pattern is contained in `line`.
fn first_match<'d>(
    line: &str,
    mut candidates: impl Iterator<Item = (&'d str, &'d MetricDefinition)>,
) -> Option<&'d MetricDefinition> {
    candidates
        .find(|(pattern, _)| line.contains(pattern))
        .map(|(_, def)| def)
}

/// Parses the value token of a matched line and writes it into `record`.
fn store(
    record: &mut MetricRecord,
    scope: &str,
    def: &MetricDefinition,
    line: &str,
    line_no: usize,
) -> Result<()> {
    let token = line.split_whitespace().nth(1).unwrap_or_default();
    let value = def
        .kind
        .parse(token)
        .ok_or_else(|| ReportError::MalformedMetricValue {
            line: line_no,
            key: def.key.clone(),
            value: token.to_string(),
        })?;

    tracing::debug!(scope, key = %def.key, ?value, line = line_no, "recognized metric");
    if let Some(previous) = record.insert(def.key.as_str(), value) {
        tracing::debug!(
            scope,
            key = %def.key,
            ?previous,
            ?value,
            line = line_no,
            "metric overwritten by a later line"
        );
    }
    Ok(())
}
