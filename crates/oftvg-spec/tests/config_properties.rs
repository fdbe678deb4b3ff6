//! Property tests for the generator config format.

use oftvg_spec::{parse_config, ParameterSet};
use proptest::prelude::*;

fn key_strategy() -> impl Strategy<Value = String> {
    "[A-Z][A-Z0-9_]{0,15}"
}

// Any printable text without line breaks, including '=' and spaces.
fn value_strategy() -> impl Strategy<Value = String> {
    "[ -~]{0,40}"
}

proptest! {
    #[test]
    fn config_round_trips(entries in prop::collection::vec((key_strategy(), value_strategy()), 0..12)) {
        let params: ParameterSet = entries.into_iter().collect();
        let parsed = parse_config(&params.to_config_string()).unwrap();
        prop_assert_eq!(parsed, params);
    }

    #[test]
    fn every_line_is_a_crlf_directive(entries in prop::collection::vec((key_strategy(), value_strategy()), 1..12)) {
        let params: ParameterSet = entries.into_iter().collect();
        let rendered = params.to_config_string();

        prop_assert!(rendered.ends_with("\r\n"));
        let lines: Vec<&str> = rendered.trim_end_matches("\r\n").split("\r\n").collect();
        prop_assert_eq!(lines.len(), params.len());
        for (line, (key, value)) in lines.iter().zip(params.iter()) {
            prop_assert_eq!(*line, format!("SET {}={}", key, value));
        }
    }

    #[test]
    fn rendering_is_deterministic(entries in prop::collection::vec((key_strategy(), value_strategy()), 0..12)) {
        let a: ParameterSet = entries.clone().into_iter().collect();
        let b: ParameterSet = entries.into_iter().collect();
        prop_assert_eq!(a.to_config_string(), b.to_config_string());
    }
}
