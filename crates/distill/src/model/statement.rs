//! Statements: subject-predicate-object facts with an optional graph.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::term::Term;
use super::vocab;

/// An immutable fact. Equality covers all four components.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Statement {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph: Option<Term>,
}

impl Statement {
    /// Create a statement in the default graph.
    pub fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Self {
            subject,
            predicate,
            object,
            graph: None,
        }
    }

    /// Shorthand for `subject rdf:type class`.
    pub fn typed(subject: Term, class: Term) -> Self {
        Self::new(subject, Term::iri(vocab::RDF_TYPE), class)
    }

    /// Place the statement in a named graph.
    pub fn with_graph(mut self, graph: Term) -> Self {
        self.graph = Some(graph);
        self
    }

    /// Subject is an IRI or blank, predicate an IRI, graph (if any) not a literal.
    pub fn is_well_formed(&self) -> bool {
        self.subject.is_resource()
            && self.predicate.is_iri()
            && self.graph.as_ref().is_none_or(Term::is_resource)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)?;
        if let Some(graph) = &self.graph {
            write!(f, " {}", graph)?;
        }
        f.write_str(" .")
    }
}
