//! Distill: knowledge distillation over RDF-style document graphs.
//!
//! Text is turned into a content-addressed graph, then augmented with the
//! statements that follow from it under a ruleset and a set of reusable
//! ontology mappings.
//!
//! # Core Principles
//!
//! - **Content-addressed**: equal text always materializes to the same graph
//! - **All or nothing**: a failed distillation leaves the document untouched
//! - **Shared background**: rulesets and mappings are immutable and shared
//!
//! # Example
//!
//! ```no_run
//! use distill::{Distiller, DistillOptions, Document, RuleDistiller, TextAnnotation};
//!
//! let distiller = RuleDistiller::new(None, None).unwrap();
//! let mut doc = Document::from_annotation(TextAnnotation::new("Rome is a city."));
//!
//! let report = distiller.distill(&mut doc, &DistillOptions::default()).unwrap();
//! println!("Distilled: {}", report.num_distilled);
//! ```

pub mod annotation;
pub mod config;
pub mod distill;
pub mod document;
pub mod error;
pub mod inference;
pub mod model;
pub mod resources;
pub mod syntax;

pub use annotation::{Annotation, AnnotationKind, Format, FormatRegistry, TextAnnotation};
pub use config::DistillerConfig;
pub use distill::{
    BatchReport, DistillOptions, DistillReport, Distiller, DistillerChain, FnDistiller,
    RuleDistiller, distill_batch,
};
pub use document::Document;
pub use error::{DistillError, Result};
pub use inference::{EvaluationBudget, InferenceEngine, RuleEngine, Ruleset};
pub use model::{Graph, Literal, Statement, Term};
pub use resources::{default_mappings, load_graph};
