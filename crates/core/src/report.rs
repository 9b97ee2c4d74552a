//! Report rendering.
//!
//! Turns parsed metric records into text. It provides:
//! 1. **Layout:** `ReportLayout` lists the reported fields with their labels, units, and formats.
//! 2. **Text:** `render` / `render_with` produce the human-readable summary.
//! 3. **JSON:** `render_json` exports the same values for scripting.
//!
//! Rendering never fails on missing data: an absent float reads as `0.0` and an
//! absent count as `0`.

use serde_json::{Map, Value, json};

use crate::metrics::{EntityMetrics, GlobalMetrics, MetricRecord};

/// How a field's value is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFormat {
    /// Plain integer count.
    Count,
    /// Fixed-point float with the given number of decimals.
    Fixed(usize),
}

/// One labeled line of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportField {
    /// Metric key looked up in the record.
    pub key: String,
    /// Text printed before the value.
    pub label: String,
    /// Text printed after the value; omitted when empty.
    pub unit: String,
    /// Value format.
    pub format: FieldFormat,
}

impl ReportField {
    /// Creates a field.
    pub fn new(key: &str, label: &str, unit: &str, format: FieldFormat) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            unit: unit.to_string(),
            format,
        }
    }

    /// Formats this field's value from `record`, defaulting to zero.
    pub fn value_text(&self, record: &MetricRecord) -> String {
        match self.format {
            FieldFormat::Count => record.count_or_zero(&self.key).to_string(),
            FieldFormat::Fixed(precision) => fixed(record.float_or_zero(&self.key), precision),
        }
    }

    fn value_json(&self, record: &MetricRecord) -> Value {
        match self.format {
            FieldFormat::Count => json!(record.count_or_zero(&self.key)),
            FieldFormat::Fixed(_) => json!(record.float_or_zero(&self.key)),
        }
    }

    fn line(&self, record: &MetricRecord) -> String {
        let value = self.value_text(record);
        if self.unit.is_empty() {
            format!("{}: {value}", self.label)
        } else {
            format!("{}: {value} {}", self.label, self.unit)
        }
    }
}

/// Ordered description of the whole report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLayout {
    /// Whole-run fields, printed first.
    pub global: Vec<ReportField>,
    /// Name prefix for entities; entity `i` is shown as `"{entity_label}{i}"`.
    pub entity_label: String,
    /// Per-entity fields, printed in order under each entity header.
    pub entity: Vec<ReportField>,
}

impl ReportLayout {
    /// Display name for entity `index`.
    pub fn entity_name(&self, index: usize) -> String {
        format!("{}{index}", self.entity_label)
    }
}

impl Default for ReportLayout {
    /// The per-core summary: execution time, then cycles, instructions,
    /// IPC, CPI, and the SIMD float instruction mix for each core.
    fn default() -> Self {
        Self {
            global: vec![ReportField::new(
                "execution_time",
                "Total execution time",
                "",
                FieldFormat::Fixed(5),
            )],
            entity_label: "CPU".to_string(),
            entity: vec![
                ReportField::new("num_cycles", "Total Cycles", "per thread", FieldFormat::Count),
                ReportField::new(
                    "commit_insts",
                    "Total Committed Instructions",
                    "per thread",
                    FieldFormat::Count,
                ),
                ReportField::new(
                    "IPC",
                    "Instruction Throughput (IPC)",
                    "Instructions/Cycle",
                    FieldFormat::Fixed(5),
                ),
                ReportField::new(
                    "CPI",
                    "Average Instruction Latency (CPI)",
                    "Cycles/Instruction",
                    FieldFormat::Fixed(2),
                ),
                ReportField::new("SIMD_float_add", "SIMD Float Add", "Counts", FieldFormat::Count),
                ReportField::new(
                    "SIMD_float_convert",
                    "SIMD Float Convert",
                    "Counts",
                    FieldFormat::Count,
                ),
                ReportField::new(
                    "SIMD_float_multiply",
                    "SIMD Float Multiply",
                    "Counts",
                    FieldFormat::Count,
                ),
            ],
        }
    }
}

/// Renders the default per-core summary.
pub fn render(global: &GlobalMetrics, entities: &EntityMetrics) -> String {
    render_with(&ReportLayout::default(), global, entities)
}

/// Renders a text report using `layout`.
///
/// Global fields come first, one per line. Each entity then gets a blank
/// line, a `Metrics for <name>:` header, and its fields indented by two spaces.
///
/// # Arguments
///
/// * `layout` - Fields and labels to print.
/// * `global` - Whole-run metrics.
/// * `entities` - Per-entity metrics, printed in ascending index order.
pub fn render_with(layout: &ReportLayout, global: &GlobalMetrics, entities: &EntityMetrics) -> String {
    let mut out = String::new();
    for field in &layout.global {
        out.push_str(&field.line(global));
        out.push('\n');
    }
    for (index, record) in entities.iter() {
        out.push('\n');
        out.push_str(&format!("Metrics for {}:\n", layout.entity_name(index)));
        for field in &layout.entity {
            out.push_str("  ");
            out.push_str(&field.line(record));
            out.push('\n');
        }
    }
    out
}

/// Renders the report as pretty-printed JSON.
///
/// Every layout field appears with its zero default when absent; metrics the
/// parser recorded outside the layout are included as parsed.
///
/// ```text
/// {"global": {...}, "entities": [{"index": 0, "name": "CPU0", "metrics": {...}}]}
/// ```
pub fn render_json(layout: &ReportLayout, global: &GlobalMetrics, entities: &EntityMetrics) -> String {
    let entities: Vec<Value> = entities
        .iter()
        .map(|(index, record)| {
            json!({
                "index": index,
                "name": layout.entity_name(index),
                "metrics": metrics_json(&layout.entity, record),
            })
        })
        .collect();
    let report = json!({
        "global": metrics_json(&layout.global, global),
        "entities": entities,
    });
    format!("{report:#}\n")
}

fn metrics_json(fields: &[ReportField], record: &MetricRecord) -> Value {
    let mut map = Map::new();
    for (key, value) in record.iter() {
        let _ = map.insert(key.to_string(), json!(value));
    }
    for field in fields {
        let _ = map
            .entry(field.key.clone())
            .or_insert_with(|| field.value_json(record));
    }
    Value::Object(map)
}

/// Fixed-point formatting with `nan` / `inf` / `-inf` for non-finite values.
fn fixed(value: f64, precision: usize) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value == f64::INFINITY {
        "inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        format!("{value:.precision$}")
    }
}
