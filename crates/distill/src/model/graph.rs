//! Deduplicated, insertion-ordered statement collections.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use super::statement::Statement;
use super::term::Term;

/// A set of statements.
///
/// Structurally-equal statements collapse into one entry. Iteration follows
/// insertion order so output is deterministic; equality ignores order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Graph {
    statements: IndexSet<Statement>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            statements: IndexSet::with_capacity(capacity),
        }
    }

    /// Add a statement. Returns `false` if it was already present.
    pub fn insert(&mut self, statement: Statement) -> bool {
        self.statements.insert(statement)
    }

    pub fn contains(&self, statement: &Statement) -> bool {
        self.statements.contains(statement)
    }

    /// Remove a statement, keeping the order of the remaining ones.
    pub fn remove(&mut self, statement: &Statement) -> bool {
        self.statements.shift_remove(statement)
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn clear(&mut self) {
        self.statements.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Statement> {
        self.statements.iter()
    }

    /// Statements of `self` followed by those of `other` not already present.
    pub fn union(&self, other: &Graph) -> Graph {
        let mut result = Graph::with_capacity(self.len() + other.len());
        result.extend(self.iter().cloned());
        result.extend(other.iter().cloned());
        result
    }

    /// Statements of `self` that are not in `other`.
    pub fn difference(&self, other: &Graph) -> Graph {
        self.iter()
            .filter(|stmt| !other.contains(stmt))
            .cloned()
            .collect()
    }

    pub fn is_subset(&self, other: &Graph) -> bool {
        self.len() <= other.len() && self.iter().all(|stmt| other.contains(stmt))
    }

    /// Statements matching the given components; `None` matches anything.
    pub fn matching<'a>(
        &'a self,
        subject: Option<&'a Term>,
        predicate: Option<&'a Term>,
        object: Option<&'a Term>,
    ) -> impl Iterator<Item = &'a Statement> + 'a {
        self.iter().filter(move |stmt| {
            subject.is_none_or(|s| &stmt.subject == s)
                && predicate.is_none_or(|p| &stmt.predicate == p)
                && object.is_none_or(|o| &stmt.object == o)
        })
    }

    /// The single object of `subject predicate ?`, if exactly one exists.
    pub fn unique_object(&self, subject: Option<&Term>, predicate: &Term) -> Option<&Term> {
        let mut objects = self
            .statements
            .iter()
            .filter(|stmt| {
                &stmt.predicate == predicate && subject.is_none_or(|s| &stmt.subject == s)
            })
            .map(|stmt| &stmt.object);
        let first = objects.next()?;
        match objects.next() {
            Some(_) => None,
            None => Some(first),
        }
    }

    /// Render the graph as N-Triples (N-Quads for named-graph statements).
    pub fn to_ntriples(&self) -> String {
        let mut out = String::new();
        for stmt in self.iter() {
            out.push_str(&stmt.to_string());
            out.push('\n');
        }
        out
    }
}

impl FromIterator<Statement> for Graph {
    fn from_iter<I: IntoIterator<Item = Statement>>(iter: I) -> Self {
        Self {
            statements: iter.into_iter().collect(),
        }
    }
}

impl Extend<Statement> for Graph {
    fn extend<I: IntoIterator<Item = Statement>>(&mut self, iter: I) {
        self.statements.extend(iter);
    }
}

impl IntoIterator for Graph {
    type Item = Statement;
    type IntoIter = indexmap::set::IntoIter<Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.into_iter()
    }
}

impl<'a> IntoIterator for &'a Graph {
    type Item = &'a Statement;
    type IntoIter = indexmap::set::Iter<'a, Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.iter()
    }
}
