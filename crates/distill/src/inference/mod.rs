//! Rule-based inference: rulesets and the engines that evaluate them.

mod engine;
mod mock;
mod rule;

pub use engine::{EvaluationBudget, InferenceEngine, RuleEngine};
pub use mock::MockEngine;
pub use rule::{PatternTerm, Rule, Ruleset, TriplePattern};
