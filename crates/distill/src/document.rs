//! The mutable document that distillation stages work on.

use crate::annotation::Annotation;
use crate::model::vocab;
use crate::model::{Graph, Literal, Statement, Term};

/// A document graph together with the annotations it was built from.
///
/// Stages mutate the graph in place. A document is owned by one caller at a
/// time; share it across threads by moving or cloning it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    id: Option<String>,
    graph: Graph,
    annotations: Vec<Annotation>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_graph(graph: Graph) -> Self {
        Self {
            graph,
            ..Self::default()
        }
    }

    /// A document whose graph is the annotation's materialization.
    pub fn from_annotation(annotation: impl Into<Annotation>) -> Self {
        let annotation = annotation.into();
        Self {
            id: None,
            graph: annotation.materialize(),
            annotations: vec![annotation],
        }
    }

    /// A document describing the resource `iri` with the given text, using
    /// `<iri#ctx>` as its NIF context.
    pub fn with_text(iri: &str, text: &str) -> Self {
        let resource = Term::iri(iri);
        let context = Term::iri(format!("{}#ctx", iri));

        let graph = [
            Statement::typed(resource.clone(), Term::iri(vocab::KS_RESOURCE)),
            Statement::new(
                context.clone(),
                Term::iri(vocab::NIF_SOURCE_URL),
                resource,
            ),
            Statement::typed(context.clone(), Term::iri(vocab::NIF_CONTEXT)),
            Statement::new(
                context,
                Term::iri(vocab::NIF_IS_STRING),
                Term::Literal(Literal::string(text)),
            ),
        ]
        .into_iter()
        .collect();

        Self {
            id: Some(iri.to_string()),
            graph,
            annotations: Vec::new(),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    pub fn into_graph(self) -> Graph {
        self.graph
    }

    /// The resource the document's NIF context points at.
    pub fn iri(&self) -> Option<&Term> {
        self.graph
            .unique_object(None, &Term::iri(vocab::NIF_SOURCE_URL))
    }

    /// The document text recorded on its NIF context.
    pub fn text(&self) -> Option<&str> {
        self.graph
            .unique_object(None, &Term::iri(vocab::NIF_IS_STRING))
            .and_then(Term::as_literal)
            .map(Literal::lexical)
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn add_annotation(&mut self, annotation: impl Into<Annotation>) {
        self.annotations.push(annotation.into());
    }

    /// Drop everything except the statements identifying the resource and
    /// its text. Annotations are dropped too.
    pub fn clear(&mut self) {
        let source_url = Term::iri(vocab::NIF_SOURCE_URL);
        let link = self
            .graph
            .matching(None, Some(&source_url), None)
            .next()
            .map(|stmt| (stmt.subject.clone(), stmt.object.clone()));

        self.graph = match link {
            Some((context, resource)) => self
                .graph
                .iter()
                .filter(|stmt| is_seed(stmt, &context, &resource))
                .cloned()
                .collect(),
            None => Graph::new(),
        };
        self.annotations.clear();
    }

    /// A copy of the current graph, for use with [`Document::delta_since`].
    pub fn snapshot(&self) -> Graph {
        self.graph.clone()
    }

    /// Statements added since `snapshot` was taken.
    pub fn delta_since(&self, snapshot: &Graph) -> Graph {
        self.graph.difference(snapshot)
    }
}

/// Whether `stmt` is one of the statements naming a document's context,
/// resource and text.
fn is_seed(stmt: &Statement, context: &Term, resource: &Term) -> bool {
    let rdf_type = Term::iri(vocab::RDF_TYPE);

    if &stmt.subject == context {
        stmt.predicate == Term::iri(vocab::NIF_SOURCE_URL)
            || stmt.predicate == Term::iri(vocab::NIF_IS_STRING)
            || (stmt.predicate == rdf_type && stmt.object == Term::iri(vocab::NIF_CONTEXT))
    } else if &stmt.subject == resource {
        stmt.predicate == rdf_type
            && (stmt.object == Term::iri(vocab::KS_RESOURCE)
                || stmt.object == Term::iri(vocab::KEMT_TEXT_RESOURCE))
    } else {
        false
    }
}
