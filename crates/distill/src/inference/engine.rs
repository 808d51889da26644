//! Forward-chaining rule evaluation to a bounded fixpoint.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DistillError, Result};
use crate::model::{Graph, Statement, Term};

use super::rule::{PatternTerm, Rule, Ruleset, TriplePattern};

/// Computes the deductive closure of a graph under a ruleset.
///
/// Implementations must be monotonic (every input statement is in the
/// output), deterministic for a given ruleset and input, and must terminate,
/// reporting an error rather than running unbounded.
pub trait InferenceEngine: Send + Sync {
    fn evaluate(&self, ruleset: &Ruleset, graph: &Graph) -> Result<Graph>;
}

/// Limits applied to a single evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationBudget {
    /// Max rule application rounds before giving up.
    pub max_iterations: usize,
    /// Max statements in the closure (input included).
    pub max_statements: usize,
    /// Max wall-clock time in milliseconds.
    pub max_duration_ms: u64,
}

impl Default for EvaluationBudget {
    fn default() -> Self {
        Self {
            max_iterations: 1_000,
            max_statements: 10_000_000,
            max_duration_ms: 30_000,
        }
    }
}

impl EvaluationBudget {
    pub fn new(max_iterations: usize, max_statements: usize, max_duration: Duration) -> Self {
        Self {
            max_iterations,
            max_statements,
            max_duration_ms: max_duration.as_millis().try_into().unwrap_or(u64::MAX),
        }
    }

    /// No practical limit (for tests or small inputs).
    pub fn unlimited() -> Self {
        Self {
            max_iterations: usize::MAX,
            max_statements: usize::MAX,
            max_duration_ms: u64::MAX,
        }
    }

    pub fn max_duration(&self) -> Duration {
        Duration::from_millis(self.max_duration_ms)
    }
}

/// Semi-naive forward chaining over Horn rules.
///
/// Rule patterns match statements in any graph; derived statements are
/// placed in the default graph.
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    budget: EvaluationBudget,
    cancelled: Option<Arc<AtomicBool>>,
}

impl RuleEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_budget(budget: EvaluationBudget) -> Self {
        Self {
            budget,
            cancelled: None,
        }
    }

    /// Stop evaluation with [`DistillError::Cancelled`] once `flag` is set.
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancelled = Some(flag);
        self
    }

    pub fn budget(&self) -> &EvaluationBudget {
        &self.budget
    }

    fn check_cancelled(&self) -> Result<()> {
        match &self.cancelled {
            Some(flag) if flag.load(Ordering::Relaxed) => Err(DistillError::Cancelled),
            _ => Ok(()),
        }
    }

    /// Statement and time limits hold at any point; the iteration limit is
    /// only checked once a round has finished.
    fn check_budget(
        &self,
        start: Instant,
        iterations: usize,
        statements: usize,
        round_finished: bool,
    ) -> Result<()> {
        let exceeded = if statements > self.budget.max_statements {
            Some("max_statements")
        } else if round_finished && iterations >= self.budget.max_iterations {
            Some("max_iterations")
        } else if start.elapsed() > self.budget.max_duration() {
            Some("max_duration")
        } else {
            None
        };

        match exceeded {
            Some(limit) => Err(DistillError::BudgetExceeded {
                limit: limit.to_string(),
                iterations,
                statements,
            }),
            None => Ok(()),
        }
    }

    /// One round: every binding that uses at least one statement of `delta`.
    fn derive_round(
        &self,
        ruleset: &Ruleset,
        closure: &Graph,
        delta: &[Statement],
        start: Instant,
        iterations: usize,
    ) -> Result<Graph> {
        let full = PredicateIndex::new(closure.iter());
        let recent = PredicateIndex::new(delta.iter());
        let first_round = iterations == 0;
        let mut round = Round {
            engine: self,
            closure,
            full: &full,
            recent: &recent,
            derived: Graph::new(),
            start,
            iterations,
            steps: 0,
        };

        for rule in ruleset.iter() {
            self.check_cancelled()?;

            if rule.body().is_empty() {
                if first_round {
                    fire(rule, &Bindings::new(), closure, &mut round.derived);
                }
                continue;
            }

            // In the first round delta is the whole input, one pivot suffices.
            let pivots = if first_round { 1 } else { rule.body().len() };
            for pivot in 0..pivots {
                round.check()?;
                let order: Vec<usize> = std::iter::once(pivot)
                    .chain((0..rule.body().len()).filter(|&i| i != pivot))
                    .collect();
                round.join(rule, &order, pivot, &Bindings::new())?;
            }
        }

        Ok(round.derived)
    }
}

impl InferenceEngine for RuleEngine {
    fn evaluate(&self, ruleset: &Ruleset, graph: &Graph) -> Result<Graph> {
        let start = Instant::now();
        let mut closure = graph.clone();
        let mut delta: Vec<Statement> = graph.iter().cloned().collect();
        let mut iterations = 0;

        loop {
            self.check_cancelled()?;
            let derived = self.derive_round(ruleset, &closure, &delta, start, iterations)?;
            iterations += 1;

            debug!(
                ruleset = ruleset.name(),
                iteration = iterations,
                derived = derived.len(),
                "rule evaluation round"
            );

            if derived.is_empty() {
                break;
            }

            closure.extend(derived.iter().cloned());
            delta = derived.into_iter().collect();
            self.check_budget(start, iterations, closure.len(), true)?;
        }

        debug!(
            ruleset = ruleset.name(),
            iterations,
            input = graph.len(),
            closure = closure.len(),
            "fixpoint reached"
        );

        Ok(closure)
    }
}

type Bindings = HashMap<Arc<str>, Term>;

/// Statements grouped by predicate for pattern lookups.
struct PredicateIndex<'a> {
    all: Vec<&'a Statement>,
    by_predicate: HashMap<&'a Term, Vec<&'a Statement>>,
}

impl<'a> PredicateIndex<'a> {
    fn new(statements: impl Iterator<Item = &'a Statement>) -> Self {
        let mut all = Vec::new();
        let mut by_predicate: HashMap<&'a Term, Vec<&'a Statement>> = HashMap::new();
        for stmt in statements {
            all.push(stmt);
            by_predicate.entry(&stmt.predicate).or_default().push(stmt);
        }
        Self { all, by_predicate }
    }

    fn candidates(&self, pattern: &TriplePattern, bindings: &Bindings) -> &[&'a Statement] {
        let predicate = match &pattern.predicate {
            PatternTerm::Const(term) => Some(term),
            PatternTerm::Var(name) => bindings.get(name),
        };
        match predicate {
            Some(term) => self.by_predicate.get(term).map(Vec::as_slice).unwrap_or(&[]),
            None => &self.all,
        }
    }
}

/// Join work between two budget checks.
const CHECK_INTERVAL: usize = 1024;

/// State of one round. Bindings are enumerated depth-first and fired as
/// soon as they are complete, so limits are enforced while the round runs.
struct Round<'r, 'a> {
    engine: &'r RuleEngine,
    closure: &'a Graph,
    full: &'r PredicateIndex<'a>,
    recent: &'r PredicateIndex<'a>,
    derived: Graph,
    start: Instant,
    iterations: usize,
    steps: usize,
}

impl<'r, 'a> Round<'r, 'a> {
    fn check(&self) -> Result<()> {
        self.engine.check_cancelled()?;
        self.engine.check_budget(
            self.start,
            self.iterations,
            self.closure.len() + self.derived.len(),
            false,
        )
    }

    fn tick(&mut self) -> Result<()> {
        self.steps += 1;
        if self.steps % CHECK_INTERVAL == 0 {
            self.check()?;
        }
        Ok(())
    }

    /// Extend `row` with the patterns of `order`, matching the pivot pattern
    /// against `recent` and the others against `full`.
    fn join(&mut self, rule: &Rule, order: &[usize], pivot: usize, row: &Bindings) -> Result<()> {
        let Some((&index, rest)) = order.split_first() else {
            fire(rule, row, self.closure, &mut self.derived);
            return self.tick();
        };

        let pattern = &rule.body()[index];
        let source: &'r PredicateIndex<'a> = if index == pivot { self.recent } else { self.full };
        for stmt in source.candidates(pattern, row) {
            self.tick()?;
            if let Some(extended) = unify(pattern, stmt, row) {
                self.join(rule, rest, pivot, &extended)?;
            }
        }
        Ok(())
    }
}

fn unify(pattern: &TriplePattern, stmt: &Statement, row: &Bindings) -> Option<Bindings> {
    let mut bindings = row.clone();
    for (pattern_term, term) in [
        (&pattern.subject, &stmt.subject),
        (&pattern.predicate, &stmt.predicate),
        (&pattern.object, &stmt.object),
    ] {
        match pattern_term {
            PatternTerm::Const(constant) => {
                if constant != term {
                    return None;
                }
            }
            PatternTerm::Var(name) => match bindings.get(name) {
                Some(bound) if bound != term => return None,
                Some(_) => {}
                None => {
                    bindings.insert(name.clone(), term.clone());
                }
            },
        }
    }
    Some(bindings)
}

fn resolve(term: &PatternTerm, bindings: &Bindings) -> Option<Term> {
    match term {
        PatternTerm::Const(constant) => Some(constant.clone()),
        PatternTerm::Var(name) => bindings.get(name).cloned(),
    }
}

/// Instantiate a head pattern. Returns `None` when a variable bound to a
/// literal lands in subject or predicate position.
fn instantiate(pattern: &TriplePattern, bindings: &Bindings) -> Option<Statement> {
    let stmt = Statement::new(
        resolve(&pattern.subject, bindings)?,
        resolve(&pattern.predicate, bindings)?,
        resolve(&pattern.object, bindings)?,
    );
    stmt.is_well_formed().then_some(stmt)
}

fn fire(rule: &Rule, bindings: &Bindings, closure: &Graph, derived: &mut Graph) {
    for pattern in rule.head() {
        if let Some(stmt) = instantiate(pattern, bindings) {
            if !closure.contains(&stmt) {
                derived.insert(stmt);
            }
        }
    }
}
