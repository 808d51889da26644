//! Running several distillers as one stage.

use std::time::Instant;

use tracing::debug;

use crate::document::Document;
use crate::error::Result;

use super::{DistillOptions, DistillReport, Distiller};

/// Distillers applied in order to a working copy of the document.
///
/// The document is only updated when every stage succeeds.
#[derive(Default)]
pub struct DistillerChain {
    stages: Vec<Box<dyn Distiller>>,
}

impl DistillerChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stage(mut self, stage: impl Distiller + 'static) -> Self {
        self.push(stage);
        self
    }

    pub fn push(&mut self, stage: impl Distiller + 'static) {
        self.stages.push(Box::new(stage));
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl Distiller for DistillerChain {
    fn distill(&self, document: &mut Document, options: &DistillOptions) -> Result<DistillReport> {
        let start = Instant::now();
        let num_kem = document.graph().len();
        let mut num_mapping = 0;
        let mut num_distilled = 0;

        // Stages always accumulate; delta_only applies to the chain as a whole.
        let stage_options = DistillOptions { delta_only: false };
        let mut working = document.clone();

        for (index, stage) in self.stages.iter().enumerate() {
            let report = stage.distill(&mut working, &stage_options)?;
            debug!(
                stage = index,
                num_distilled = report.num_distilled,
                "chain stage finished"
            );
            num_mapping += report.num_mapping;
            num_distilled += report.num_distilled;
        }

        if options.delta_only {
            let delta = working.delta_since(document.graph());
            *working.graph_mut() = delta;
        }
        *document = working;

        let elapsed_ms = start.elapsed().as_millis().try_into().unwrap_or(u64::MAX);
        Ok(DistillReport::new(num_kem, num_mapping, num_distilled, elapsed_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::distill::RuleDistiller;
    use crate::inference::{MockEngine, Ruleset};
    use crate::model::{Graph, Statement, Term};

    fn mock_stage(class: &str) -> RuleDistiller {
        let additions: Graph = vec![Statement::typed(Term::iri("ex:e1"), Term::iri(class))]
            .into_iter()
            .collect();
        RuleDistiller::new(Some(Arc::new(Ruleset::default())), Some(Arc::new(Graph::new())))
            .unwrap()
            .with_engine(Arc::new(MockEngine::returning(additions)))
    }

    fn failing_stage() -> RuleDistiller {
        RuleDistiller::new(Some(Arc::new(Ruleset::default())), Some(Arc::new(Graph::new())))
            .unwrap()
            .with_engine(Arc::new(MockEngine::failing("stage failed")))
    }

    #[test]
    fn test_chain_accumulates_stages() {
        let chain = DistillerChain::new()
            .with_stage(mock_stage("ex:A"))
            .with_stage(mock_stage("ex:B"));
        let mut doc = Document::new();

        let report = chain.distill(&mut doc, &DistillOptions::default()).unwrap();
        assert_eq!(report.num_kem, 0);
        assert_eq!(report.num_distilled, 2);
        assert_eq!(doc.graph().len(), 2);
    }

    #[test]
    fn test_chain_failure_is_atomic() {
        let chain = DistillerChain::new()
            .with_stage(mock_stage("ex:A"))
            .with_stage(failing_stage());
        let mut doc = Document::new();

        assert!(chain.distill(&mut doc, &DistillOptions::default()).is_err());
        assert!(doc.graph().is_empty());
    }

    #[test]
    fn test_chain_delta_only() {
        let chain = DistillerChain::new().with_stage(mock_stage("ex:A"));
        let mut doc = Document::from_graph(
            vec![Statement::typed(Term::iri("ex:e1"), Term::iri("ex:Z"))]
                .into_iter()
                .collect(),
        );

        chain.distill(&mut doc, &DistillOptions::delta_only()).unwrap();
        assert_eq!(doc.graph().len(), 1);
        assert!(
            doc.graph()
                .contains(&Statement::typed(Term::iri("ex:e1"), Term::iri("ex:A")))
        );
    }

    #[test]
    fn test_empty_chain_is_a_no_op() {
        let chain = DistillerChain::new();
        let mut doc = Document::with_text("http://example.org/d", "text");
        let before = doc.clone();

        let report = chain.distill(&mut doc, &DistillOptions::default()).unwrap();
        assert_eq!(report.num_distilled, 0);
        assert_eq!(doc, before);
    }
}
