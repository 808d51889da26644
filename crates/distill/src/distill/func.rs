//! Distillers backed by a plain graph transformation.

use std::fmt;
use std::time::Instant;

use tracing::debug;

use crate::document::Document;
use crate::error::Result;
use crate::model::Graph;

use super::{DistillOptions, DistillReport, Distiller};

/// Adapts a function from the document graph to a result graph.
///
/// By default the result is merged into the document. A replacing
/// distiller makes the result the new document graph instead. Either way
/// the document is untouched when the function fails.
pub struct FnDistiller<F> {
    transform: F,
    replace: bool,
}

impl<F> FnDistiller<F>
where
    F: Fn(&Graph) -> Result<Graph> + Send + Sync,
{
    pub fn new(transform: F) -> Self {
        Self {
            transform,
            replace: false,
        }
    }

    pub fn replacing(transform: F) -> Self {
        Self {
            transform,
            replace: true,
        }
    }

    pub fn is_replacing(&self) -> bool {
        self.replace
    }
}

impl<F> Distiller for FnDistiller<F>
where
    F: Fn(&Graph) -> Result<Graph> + Send + Sync,
{
    fn distill(&self, document: &mut Document, options: &DistillOptions) -> Result<DistillReport> {
        let start = Instant::now();
        let num_kem = document.graph().len();

        let output = (self.transform)(document.graph())?;
        let delta = output.difference(document.graph());
        let num_distilled = delta.len();

        if options.delta_only {
            *document.graph_mut() = delta;
        } else if self.replace {
            *document.graph_mut() = output;
        } else {
            document.graph_mut().extend(delta);
        }

        debug!(
            document = document.id().unwrap_or("-"),
            replace = self.replace,
            num_kem,
            num_distilled,
            "applied graph transformation"
        );

        let elapsed_ms = start.elapsed().as_millis().try_into().unwrap_or(u64::MAX);
        Ok(DistillReport::new(num_kem, 0, num_distilled, elapsed_ms))
    }
}

impl<F> fmt::Debug for FnDistiller<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnDistiller")
            .field("replace", &self.replace)
            .finish_non_exhaustive()
    }
}
