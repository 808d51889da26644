//! Rule-based distillation over a shared mapping graph.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::config::DistillerConfig;
use crate::document::Document;
use crate::error::{DistillError, Result};
use crate::inference::{InferenceEngine, RuleEngine, Ruleset};
use crate::model::Graph;
use crate::resources;

use super::{DistillOptions, DistillReport, Distiller};

/// Distiller that overlays mapping axioms on the document graph, computes
/// the closure under a ruleset and keeps the statements that are neither
/// mapping axioms nor already in the document.
///
/// The ruleset and mapping graph are immutable and shared, so one instance
/// can serve concurrent calls over different documents.
#[derive(Clone)]
pub struct RuleDistiller {
    ruleset: Arc<Ruleset>,
    mappings: Arc<Graph>,
    engine: Arc<dyn InferenceEngine>,
}

impl RuleDistiller {
    /// Create a distiller. `None` selects the bundled ruleset or mappings.
    pub fn new(ruleset: Option<Arc<Ruleset>>, mappings: Option<Arc<Graph>>) -> Result<Self> {
        let ruleset = match ruleset {
            Some(ruleset) => ruleset,
            None => Ruleset::bundled()?,
        };
        let mappings = match mappings {
            Some(mappings) => mappings,
            None => resources::default_mappings()?,
        };

        debug!(
            ruleset = ruleset.name(),
            rules = ruleset.len(),
            mappings = mappings.len(),
            "created rule distiller"
        );

        Ok(Self {
            ruleset,
            mappings,
            engine: Arc::new(RuleEngine::new()),
        })
    }

    /// Create a distiller from configuration, loading any resource paths it
    /// names.
    pub fn from_config(config: &DistillerConfig) -> Result<Self> {
        let ruleset = Ruleset::resolve(config.ruleset.as_deref())?;
        let mappings = resources::resolve_mappings(config.mappings.as_deref())?;

        Ok(Self::new(Some(ruleset), Some(mappings))?
            .with_engine(Arc::new(RuleEngine::with_budget(config.budget.clone()))))
    }

    /// Use a different inference engine.
    pub fn with_engine(mut self, engine: Arc<dyn InferenceEngine>) -> Self {
        self.engine = engine;
        self
    }

    pub fn ruleset(&self) -> &Arc<Ruleset> {
        &self.ruleset
    }

    pub fn mappings(&self) -> &Arc<Graph> {
        &self.mappings
    }

    /// Statements inferred from `graph` that are in neither `graph` nor the
    /// mapping graph. Does not modify anything.
    pub fn compute_delta(&self, graph: &Graph) -> Result<Graph> {
        // W = M ∪ D
        let working = self.mappings.union(graph);

        let closure = self.engine.evaluate(&self.ruleset, &working)?;

        if !working.is_subset(&closure) {
            let missing = working.difference(&closure).len();
            return Err(DistillError::Inference(format!(
                "engine dropped {} input statements",
                missing
            )));
        }

        Ok(closure
            .into_iter()
            .filter(|stmt| !self.mappings.contains(stmt) && !graph.contains(stmt))
            .collect())
    }
}

impl Distiller for RuleDistiller {
    fn distill(&self, document: &mut Document, options: &DistillOptions) -> Result<DistillReport> {
        let start = Instant::now();
        let num_kem = document.graph().len();
        let num_mapping = self.mappings.len();

        let delta = self.compute_delta(document.graph())?;
        let num_distilled = delta.len();

        if options.delta_only {
            *document.graph_mut() = delta;
        } else {
            document.graph_mut().extend(delta);
        }

        let elapsed_ms = start.elapsed().as_millis().try_into().unwrap_or(u64::MAX);
        let report = DistillReport::new(num_kem, num_mapping, num_distilled, elapsed_ms);

        info!(
            document = document.id().unwrap_or("-"),
            num_kem,
            num_mapping,
            num_distilled,
            elapsed_ms,
            "distilled statements"
        );

        Ok(report)
    }
}

impl fmt::Debug for RuleDistiller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleDistiller")
            .field("ruleset", &self.ruleset.name())
            .field("rules", &self.ruleset.len())
            .field("mappings", &self.mappings.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::MockEngine;
    use crate::model::{Statement, Term};

    fn typed(subject: &str, class: &str) -> Statement {
        Statement::typed(Term::iri(subject), Term::iri(class))
    }

    fn subclass(sub: &str, sup: &str) -> Statement {
        Statement::new(
            Term::iri(sub),
            Term::iri("http://www.w3.org/2000/01/rdf-schema#subClassOf"),
            Term::iri(sup),
        )
    }

    fn rdfs_distiller(mappings: Graph) -> RuleDistiller {
        let ruleset = Ruleset::parse(
            "test.rules",
            "rule subclass where { ?c rdfs:subClassOf ?d . ?x a ?c } insert { ?x a ?d } .",
        )
        .unwrap();
        RuleDistiller::new(Some(Arc::new(ruleset)), Some(Arc::new(mappings))).unwrap()
    }

    #[test]
    fn test_delta_excludes_mappings_and_document() {
        let mappings: Graph = vec![subclass("ex:Person", "ex:Agent")].into_iter().collect();
        let distiller = rdfs_distiller(mappings);

        let mut doc = Document::from_graph(vec![typed("ex:e1", "ex:Person")].into_iter().collect());
        let report = distiller.distill(&mut doc, &DistillOptions::default()).unwrap();

        assert_eq!(report.num_kem, 1);
        assert_eq!(report.num_mapping, 1);
        assert_eq!(report.num_distilled, 1);
        assert!(doc.graph().contains(&typed("ex:e1", "ex:Agent")));
        assert!(!doc.graph().contains(&subclass("ex:Person", "ex:Agent")));
    }

    #[test]
    fn test_delta_only_replaces_graph() {
        let mappings: Graph = vec![subclass("ex:Person", "ex:Agent")].into_iter().collect();
        let distiller = rdfs_distiller(mappings);

        let mut doc = Document::from_graph(vec![typed("ex:e1", "ex:Person")].into_iter().collect());
        distiller.distill(&mut doc, &DistillOptions::delta_only()).unwrap();

        assert_eq!(doc.graph().len(), 1);
        assert!(doc.graph().contains(&typed("ex:e1", "ex:Agent")));
    }

    #[test]
    fn test_failing_engine_leaves_document_untouched() {
        let distiller = rdfs_distiller(Graph::new())
            .with_engine(Arc::new(MockEngine::failing("rule evaluation exploded")));
        let mut doc = Document::from_graph(vec![typed("ex:e1", "ex:Person")].into_iter().collect());
        let before = doc.clone();

        let err = distiller.distill(&mut doc, &DistillOptions::default()).unwrap_err();
        assert!(err.is_inference_failure());
        assert_eq!(doc, before);
    }

    #[test]
    fn test_non_monotonic_engine_is_rejected() {
        let distiller =
            rdfs_distiller(Graph::new()).with_engine(Arc::new(MockEngine::non_monotonic()));
        let mut doc = Document::from_graph(vec![typed("ex:e1", "ex:Person")].into_iter().collect());
        let before = doc.clone();

        let err = distiller.distill(&mut doc, &DistillOptions::default()).unwrap_err();
        assert!(matches!(err, DistillError::Inference(_)));
        assert_eq!(doc, before);
    }

    #[test]
    fn test_compute_delta_with_mock_additions() {
        let extra: Graph = vec![typed("ex:e1", "ex:Thing")].into_iter().collect();
        let engine = Arc::new(MockEngine::returning(extra.clone()));
        let distiller = rdfs_distiller(Graph::new()).with_engine(engine.clone());

        let graph: Graph = vec![typed("ex:e1", "ex:Person")].into_iter().collect();
        assert_eq!(distiller.compute_delta(&graph).unwrap(), extra);
        assert_eq!(engine.calls(), 1);
    }

    #[test]
    fn test_debug_hides_engine() {
        let distiller = rdfs_distiller(Graph::new());
        let debug = format!("{:?}", distiller);
        assert!(debug.contains("test.rules"));
    }
}
