//! Distillation: augmenting a document graph with inferred statements.
//!
//! A [`Distiller`] takes a document, works out the statements that follow
//! from it (together with whatever background knowledge the distiller
//! carries) and adds the new ones to the document.
//!
//! # Example
//!
//! ```no_run
//! use distill::{Distiller, DistillOptions, Document, RuleDistiller, TextAnnotation};
//!
//! let distiller = RuleDistiller::new(None, None).unwrap();
//! let mut doc = Document::from_annotation(TextAnnotation::new("Barack Obama visited Rome."));
//!
//! let report = distiller.distill(&mut doc, &DistillOptions::default()).unwrap();
//! println!("{} statements distilled", report.num_distilled);
//! ```

mod batch;
mod chain;
mod func;
mod rule;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use batch::{BatchReport, distill_batch};
pub use chain::DistillerChain;
pub use func::FnDistiller;
pub use rule::RuleDistiller;

use crate::document::Document;
use crate::error::Result;

/// A stage that augments a document graph in place.
///
/// On error the document must be left exactly as it was.
pub trait Distiller: Send + Sync {
    fn distill(&self, document: &mut Document, options: &DistillOptions) -> Result<DistillReport>;
}

/// Per-call distillation options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistillOptions {
    /// Replace the document graph with only the distilled statements.
    pub delta_only: bool,
}

impl DistillOptions {
    pub fn delta_only() -> Self {
        Self { delta_only: true }
    }
}

/// Summary of one distillation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistillReport {
    /// Statements in the document graph before distillation.
    pub num_kem: usize,
    /// Statements in the mapping graph.
    pub num_mapping: usize,
    /// New statements added to the document.
    pub num_distilled: usize,
    /// Wall-clock time spent.
    pub elapsed_ms: u64,
    /// When the distillation finished.
    pub distilled_at: DateTime<Utc>,
}

impl DistillReport {
    pub(crate) fn new(
        num_kem: usize,
        num_mapping: usize,
        num_distilled: usize,
        elapsed_ms: u64,
    ) -> Self {
        Self {
            num_kem,
            num_mapping,
            num_distilled,
            elapsed_ms,
            distilled_at: Utc::now(),
        }
    }
}
