//! # Configuration Tests
//!
//! Default definitions, JSON deserialization with per-field defaults,
//! validation, and entity-count parsing.

use m5stats_core::config::DEFAULT_STATS_PATH;
use m5stats_core::{MetricDefinition, MetricKind, ParserConfig, ReportError, parse_entity_count};
use rstest::rstest;

use crate::common::stats_file;

#[test]
fn test_default_stats_path() {
    assert_eq!(DEFAULT_STATS_PATH, "m5out/stats.txt");
}

#[test]
fn test_default_config() {
    let config = ParserConfig::default();
    assert_eq!(config.namespace, "system.cpu");
    assert_eq!(config.comment_marker, "#");
    assert_eq!(
        config.global,
        vec![
            MetricDefinition::new("simSeconds", "execution_time", MetricKind::Float),
            MetricDefinition::new("sim_seconds", "execution_time", MetricKind::Float),
        ]
    );
    assert!(config.validate().is_ok());
}

#[test]
fn test_default_entity_priority_order() {
    let config = ParserConfig::default();
    let keys: Vec<&str> = config.entity.iter().map(|d| d.key.as_str()).collect();
    assert_eq!(
        keys,
        [
            "CPI",
            "commit_insts",
            "num_cycles",
            "IPC",
            "SIMD_float_add",
            "SIMD_float_convert",
            "SIMD_float_multiply",
        ]
    );
}

#[test]
fn test_trailing_spaces_are_part_of_patterns() {
    let config = ParserConfig::default();
    let pattern = |key: &str| {
        config
            .entity
            .iter()
            .find(|d| d.key == key)
            .map(|d| d.pattern.clone())
            .unwrap()
    };
    assert_eq!(pattern("commit_insts"), "commitStats0.numInsts ");
    assert_eq!(
        pattern("SIMD_float_multiply"),
        "commitStats0.committedInstType::SimdFloatMult "
    );
    assert_eq!(pattern("num_cycles"), "numCycles");
}

#[test]
fn test_entity_pattern_expansion() {
    let config = ParserConfig::default();
    let def = MetricDefinition::new("ipc", "IPC", MetricKind::Float);
    assert_eq!(config.entity_pattern(0, &def), "system.cpu0.ipc");
    assert_eq!(config.entity_pattern(12, &def), "system.cpu12.ipc");
}

#[test]
fn test_json_empty_object_is_default() {
    let config = ParserConfig::from_json_str("{}").unwrap();
    assert_eq!(config, ParserConfig::default());
}

#[test]
fn test_json_partial_override_keeps_other_defaults() {
    let config = ParserConfig::from_json_str(
        r#"{
            "namespace": "board.processor.cores",
            "entity": [
                {"pattern": "core.ipc", "key": "IPC"},
                {"pattern": "core.numCycles", "key": "num_cycles", "kind": "count"},
                {"pattern": "core.committedInsts", "key": "commit_insts", "kind": "integer"}
            ]
        }"#,
    )
    .unwrap();
    assert_eq!(config.namespace, "board.processor.cores");
    assert_eq!(config.global, ParserConfig::default().global);
    assert_eq!(config.entity.len(), 3);
    assert_eq!(config.entity[0].kind, MetricKind::Float);
    assert_eq!(config.entity[1].kind, MetricKind::Count);
    assert_eq!(config.entity[2].kind, MetricKind::Count);
}

#[rstest]
#[case::not_json("namespace = 'x'")]
#[case::wrong_kind(r#"{"entity": [{"pattern": "ipc", "key": "IPC", "kind": "complex"}]}"#)]
#[case::empty_namespace(r#"{"namespace": ""}"#)]
#[case::empty_pattern(r#"{"global": [{"pattern": "", "key": "t"}]}"#)]
#[case::empty_key(r#"{"entity": [{"pattern": "ipc", "key": ""}]}"#)]
#[case::empty_comment_marker(r##"{"comment_marker": ""}"##)]
fn test_json_rejected(#[case] json: &str) {
    let err = ParserConfig::from_json_str(json).unwrap_err();
    assert!(matches!(err, ReportError::InvalidArgument(_)), "{err:?}");
}

#[test]
fn test_empty_definition_lists_are_allowed() {
    let config = ParserConfig::from_json_str(r#"{"global": [], "entity": []}"#).unwrap();
    assert!(config.global.is_empty());
    assert!(config.entity.is_empty());
}

#[test]
fn test_json_file_loads() {
    let file = stats_file(r#"{"namespace": "system.switch_cpus"}"#);
    let config = ParserConfig::from_json_file(file.path()).unwrap();
    assert_eq!(config.namespace, "system.switch_cpus");
}

#[test]
fn test_missing_json_file_is_invalid_argument() {
    let dir = tempfile::tempdir().unwrap();
    let err = ParserConfig::from_json_file(dir.path().join("metrics.json")).unwrap_err();
    assert!(matches!(err, ReportError::InvalidArgument(ref m) if m.contains("metrics.json")));
}

#[rstest]
#[case("1", 1)]
#[case("4", 4)]
#[case(" 8\n", 8)]
#[case("+2", 2)]
#[case("65536", 65_536)]
fn test_entity_count_accepted(#[case] raw: &str, #[case] expected: usize) {
    assert_eq!(parse_entity_count(raw).unwrap(), expected);
}

#[rstest]
#[case("0")]
#[case("-1")]
#[case("")]
#[case("two")]
#[case("1.0")]
#[case("99999999999999999999999")]
#[case("1000000000000")]
#[case("65537")]
fn test_entity_count_rejected(#[case] raw: &str) {
    let err = parse_entity_count(raw).unwrap_err();
    assert!(matches!(err, ReportError::InvalidArgument(_)), "{err:?}");
}

#[test]
fn test_entity_count_below_one_message() {
    let err = parse_entity_count("0").unwrap_err();
    assert_eq!(err.to_string(), "Number of CPUs must be at least 1.");
}

#[test]
fn test_entity_count_above_maximum_message() {
    let err = parse_entity_count("1000000000000").unwrap_err();
    assert_eq!(err.to_string(), "Number of CPUs must be at most 65536.");
}
