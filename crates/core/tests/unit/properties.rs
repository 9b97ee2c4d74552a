//! # Parser and Renderer Properties
//!
//! Randomized checks over generated stats files: record counts, determinism,
//! last-write-wins, and the shape of the rendered report.

use m5stats_core::{MetricValue, render};
use proptest::prelude::*;

use crate::common::parse_str;

const SUFFIXES: &[(&str, &str)] = &[
    ("cpi", "CPI"),
    ("commitStats0.numInsts ", "commit_insts"),
    ("numCycles", "num_cycles"),
    ("ipc", "IPC"),
    ("commitStats0.committedInstType::SimdFloatAdd", "SIMD_float_add"),
    ("commitStats0.committedInstType::SimdFloatCvt", "SIMD_float_convert"),
    ("commitStats0.committedInstType::SimdFloatMult ", "SIMD_float_multiply"),
];

/// One well-formed stats line: a known counter, a comment, a blank, or noise.
fn stats_line() -> impl Strategy<Value = String> {
    prop_oneof![
        (0usize..24, 0usize..SUFFIXES.len(), any::<u32>()).prop_map(|(cpu, s, v)| {
            let suffix = SUFFIXES[s].0.trim_end();
            format!("system.cpu{cpu}.{suffix}    {v}    # generated")
        }),
        any::<u32>().prop_map(|v| format!("simSeconds {v}")),
        "[a-zA-Z ]{0,20}".prop_map(|c| format!("# {c}")),
        Just(String::new()),
        Just("system.l2.overallMisses::total 17".to_string()),
    ]
}

fn stats_text() -> impl Strategy<Value = String> {
    prop::collection::vec(stats_line(), 0..64).prop_map(|lines| lines.join("\n"))
}

proptest! {
    #[test]
    fn parse_yields_exactly_n_records(text in stats_text(), n in 1usize..32) {
        let (_, cores) = parse_str(&text, n).unwrap();
        prop_assert_eq!(cores.len(), n);
    }

    #[test]
    fn parse_is_deterministic(text in stats_text(), n in 1usize..32) {
        let first = parse_str(&text, n).unwrap();
        let second = parse_str(&text, n).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn last_write_wins(
        cpu in 0usize..8,
        s in 0usize..SUFFIXES.len(),
        first in any::<u32>(),
        last in any::<u32>(),
    ) {
        let (suffix, key) = SUFFIXES[s];
        let suffix = suffix.trim_end();
        let text = format!(
            "system.cpu{cpu}.{suffix} {first}\nsystem.cpu{cpu}.{suffix} {last}\n"
        );
        let (_, cores) = parse_str(&text, 8).unwrap();
        let expected = if key == "CPI" || key == "IPC" {
            MetricValue::Float(f64::from(last))
        } else {
            MetricValue::Count(i64::from(last))
        };
        prop_assert_eq!(cores[cpu].get(key), Some(expected));
        prop_assert_eq!(cores[cpu].len(), 1);
    }

    #[test]
    fn report_has_one_section_per_entity(text in stats_text(), n in 1usize..16) {
        let (global, cores) = parse_str(&text, n).unwrap();
        let out = render(&global, &cores);
        prop_assert_eq!(out.lines().count(), 1 + n * 9);
        prop_assert_eq!(out.matches("Metrics for CPU").count(), n);
    }
}
