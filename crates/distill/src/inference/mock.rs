//! Mock inference engine for testing.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{DistillError, Result};
use crate::model::Graph;

use super::engine::InferenceEngine;
use super::rule::Ruleset;

#[derive(Debug, Clone)]
enum Behavior {
    Extend(Graph),
    Fail(String),
    DropInput,
}

/// Inference engine that returns predictable results without evaluating
/// rules.
#[derive(Debug)]
pub struct MockEngine {
    behavior: Behavior,
    calls: AtomicUsize,
}

impl MockEngine {
    /// Returns the input unchanged.
    pub fn identity() -> Self {
        Self::returning(Graph::new())
    }

    /// Returns the input plus `additions`.
    pub fn returning(additions: Graph) -> Self {
        Self::with_behavior(Behavior::Extend(additions))
    }

    /// Always fails with [`DistillError::Inference`].
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::Fail(message.into()))
    }

    /// Breaks the monotonicity contract by returning an empty graph.
    pub fn non_monotonic() -> Self {
        Self::with_behavior(Behavior::DropInput)
    }

    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `evaluate` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::identity()
    }
}

impl InferenceEngine for MockEngine {
    fn evaluate(&self, _ruleset: &Ruleset, graph: &Graph) -> Result<Graph> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            Behavior::Extend(additions) => Ok(graph.union(additions)),
            Behavior::Fail(message) => Err(DistillError::Inference(message.clone())),
            Behavior::DropInput => Ok(Graph::new()),
        }
    }
}
