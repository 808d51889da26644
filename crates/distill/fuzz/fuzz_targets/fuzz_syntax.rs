//! Fuzz target for the graph and ruleset reader.
//!
//! This fuzzer tests that the reader:
//! 1. Never panics on malformed input
//! 2. Only produces well-formed statements
//! 3. Only produces rules that evaluate without error on a small graph

#![no_main]

use libfuzzer_sys::fuzz_target;
use distill::syntax::parse_graph;
use distill::{InferenceEngine, RuleEngine, Ruleset};

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 16_384 {
        return;
    }

    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(graph) = parse_graph("fuzz", source) {
        assert!(graph.iter().all(|s| s.is_well_formed()));
    }

    if let Ok(ruleset) = Ruleset::parse("fuzz", source) {
        let graph = parse_graph("fuzz", "<urn:a> <urn:p> <urn:b> .").unwrap();
        let _ = RuleEngine::new().evaluate(&ruleset, &graph);
    }
});
