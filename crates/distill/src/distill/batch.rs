//! Distilling many documents with per-document error isolation.

use tracing::{info, warn};

use crate::document::Document;
use crate::error::DistillError;

use super::{DistillOptions, DistillReport, Distiller};

/// Outcome of [`distill_batch`], keyed by document index.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub reports: Vec<(usize, DistillReport)>,
    pub failures: Vec<(usize, DistillError)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Statements distilled across all successful documents.
    pub fn total_distilled(&self) -> usize {
        self.reports.iter().map(|(_, r)| r.num_distilled).sum()
    }
}

/// Distill each document in turn. A failing document is left untouched and
/// recorded; the remaining documents are still processed.
pub fn distill_batch<D>(
    distiller: &D,
    documents: &mut [Document],
    options: &DistillOptions,
) -> BatchReport
where
    D: Distiller + ?Sized,
{
    let mut batch = BatchReport::default();

    for (index, document) in documents.iter_mut().enumerate() {
        match distiller.distill(document, options) {
            Ok(report) => batch.reports.push((index, report)),
            Err(e) => {
                warn!(
                    index,
                    document = document.id().unwrap_or("-"),
                    error = %e,
                    "distillation failed"
                );
                batch.failures.push((index, e));
            }
        }
    }

    info!(
        documents = documents.len(),
        succeeded = batch.reports.len(),
        failed = batch.failures.len(),
        num_distilled = batch.total_distilled(),
        "batch distillation finished"
    );

    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::model::{Statement, Term};

    /// Fails on documents without statements.
    struct RejectEmpty;

    impl Distiller for RejectEmpty {
        fn distill(
            &self,
            document: &mut Document,
            _options: &DistillOptions,
        ) -> Result<DistillReport> {
            if document.graph().is_empty() {
                return Err(DistillError::Inference("empty document".to_string()));
            }
            let num_kem = document.graph().len();
            document
                .graph_mut()
                .insert(Statement::typed(Term::iri("ex:seen"), Term::iri("ex:Marker")));
            Ok(DistillReport::new(num_kem, 0, 1, 0))
        }
    }

    #[test]
    fn test_batch_isolates_failures() {
        let mut documents = vec![
            Document::with_text("http://example.org/a", "a"),
            Document::new(),
            Document::with_text("http://example.org/c", "c"),
        ];

        let batch = distill_batch(&RejectEmpty, &mut documents, &DistillOptions::default());

        assert!(!batch.is_success());
        assert_eq!(batch.reports.iter().map(|(i, _)| *i).collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(batch.failures.len(), 1);
        assert_eq!(batch.failures[0].0, 1);
        assert_eq!(batch.total_distilled(), 2);
        assert!(documents[1].graph().is_empty());
        assert_eq!(documents[0].graph().len(), 5);
    }
}
