//! Rules and rulesets consumed by inference engines.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::error::{DistillError, Result};
use crate::model::Term;
use crate::resources;
use crate::syntax;

/// A term in a rule pattern: a variable or a constant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PatternTerm {
    /// Variable binding (e.g., `?person`), stored without the `?`.
    Var(Arc<str>),
    Const(Term),
}

impl PatternTerm {
    pub fn var(name: &str) -> Self {
        PatternTerm::Var(Arc::from(name))
    }

    pub fn var_name(&self) -> Option<&str> {
        match self {
            PatternTerm::Var(name) => Some(name),
            PatternTerm::Const(_) => None,
        }
    }
}

impl From<Term> for PatternTerm {
    fn from(term: Term) -> Self {
        PatternTerm::Const(term)
    }
}

/// A single triple pattern in a rule's body or head.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TriplePattern {
    pub subject: PatternTerm,
    pub predicate: PatternTerm,
    pub object: PatternTerm,
}

impl TriplePattern {
    pub fn new(
        subject: impl Into<PatternTerm>,
        predicate: impl Into<PatternTerm>,
        object: impl Into<PatternTerm>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    /// Names of the variables used by this pattern.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        [&self.subject, &self.predicate, &self.object]
            .into_iter()
            .filter_map(PatternTerm::var_name)
    }

    fn check_positions(&self, rule: &str) -> Result<()> {
        let invalid = |message: &str| DistillError::InvalidRule {
            rule: rule.to_string(),
            message: message.to_string(),
        };
        if let PatternTerm::Const(term) = &self.subject {
            if term.is_literal() {
                return Err(invalid("literal in subject position"));
            }
        }
        if let PatternTerm::Const(term) = &self.predicate {
            if !term.is_iri() {
                return Err(invalid("predicate must be an IRI or a variable"));
            }
        }
        Ok(())
    }
}

/// A Horn rule: when every body pattern matches, the head patterns are
/// instantiated with the resulting bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    name: String,
    body: Vec<TriplePattern>,
    head: Vec<TriplePattern>,
}

impl Rule {
    /// Create a rule, rejecting rules that could derive unbound or
    /// ill-formed statements.
    ///
    /// A rule with an empty body is a ground axiom and may not use variables.
    pub fn new(
        name: impl Into<String>,
        body: Vec<TriplePattern>,
        head: Vec<TriplePattern>,
    ) -> Result<Self> {
        let name = name.into();

        if head.is_empty() {
            return Err(DistillError::InvalidRule {
                rule: name,
                message: "empty insert clause".to_string(),
            });
        }

        for pattern in body.iter().chain(head.iter()) {
            pattern.check_positions(&name)?;
        }

        let bound: HashSet<&str> = body.iter().flat_map(TriplePattern::variables).collect();
        if let Some(unbound) = head
            .iter()
            .flat_map(TriplePattern::variables)
            .find(|var| !bound.contains(var))
        {
            return Err(DistillError::InvalidRule {
                message: format!(
                    "variable ?{} in insert clause is not bound by the where clause",
                    unbound
                ),
                rule: name,
            });
        }

        Ok(Self { name, body, head })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn body(&self) -> &[TriplePattern] {
        &self.body
    }

    pub fn head(&self) -> &[TriplePattern] {
        &self.head
    }
}

/// An immutable, ordered collection of rules.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Ruleset {
    name: String,
    rules: Vec<Rule>,
}

static BUNDLED: OnceCell<Arc<Ruleset>> = OnceCell::new();

impl Ruleset {
    pub fn new(name: impl Into<String>, rules: Vec<Rule>) -> Self {
        Self {
            name: name.into(),
            rules,
        }
    }

    /// Parse a ruleset resource.
    pub fn parse(name: impl Into<String>, source: &str) -> Result<Self> {
        let name = name.into();
        let rules = syntax::parse_rules(&name, source)?;
        Ok(Self { name, rules })
    }

    /// Load a ruleset from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| DistillError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(path.display().to_string(), &source)
    }

    /// The ruleset bundled with the library, parsed once per process.
    pub fn bundled() -> Result<Arc<Ruleset>> {
        BUNDLED
            .get_or_try_init(|| {
                Ruleset::parse(resources::DEFAULT_RULES_NAME, resources::DEFAULT_RULES)
                    .map(Arc::new)
            })
            .cloned()
    }

    /// Load the ruleset at `path`, or the bundled one when no path is given.
    pub fn resolve(path: Option<&Path>) -> Result<Arc<Ruleset>> {
        match path {
            Some(path) => Self::load(path).map(Arc::new),
            None => Self::bundled(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Append the rules of another ruleset.
    pub fn extend(&mut self, other: Ruleset) {
        self.rules.extend(other.rules);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::vocab;

    fn type_pattern(subject: PatternTerm, class: PatternTerm) -> TriplePattern {
        TriplePattern::new(subject, Term::iri(vocab::RDF_TYPE), class)
    }

    #[test]
    fn test_rule_variables() {
        let pattern = type_pattern(PatternTerm::var("x"), PatternTerm::var("c"));
        let vars: Vec<_> = pattern.variables().collect();
        assert_eq!(vars, vec!["x", "c"]);
    }

    #[test]
    fn test_rule_requires_bound_head_variables() {
        let body = vec![type_pattern(PatternTerm::var("x"), Term::iri("Person").into())];
        let head = vec![type_pattern(PatternTerm::var("y"), Term::iri("Agent").into())];
        let err = Rule::new("r", body, head).unwrap_err();
        assert!(matches!(err, DistillError::InvalidRule { .. }));
    }

    #[test]
    fn test_rule_rejects_literal_subject_and_blank_predicate() {
        let literal_subject = vec![type_pattern(Term::literal("x").into(), Term::iri("C").into())];
        assert!(Rule::new("r", Vec::new(), literal_subject).is_err());

        let blank_predicate = vec![TriplePattern::new(
            Term::iri("s"),
            Term::blank("p"),
            Term::iri("o"),
        )];
        assert!(Rule::new("r", Vec::new(), blank_predicate).is_err());
    }

    #[test]
    fn test_rule_rejects_empty_head() {
        let body = vec![type_pattern(PatternTerm::var("x"), Term::iri("C").into())];
        assert!(Rule::new("r", body, Vec::new()).is_err());
    }

    #[test]
    fn test_ground_axiom() {
        let head = vec![type_pattern(Term::iri("a").into(), Term::iri("C").into())];
        let rule = Rule::new("axiom", Vec::new(), head).unwrap();
        assert!(rule.body().is_empty());
    }

    #[test]
    fn test_bundled_ruleset_parses() {
        let ruleset = Ruleset::bundled().unwrap();
        assert!(!ruleset.is_empty());
        assert_eq!(ruleset.name(), resources::DEFAULT_RULES_NAME);
        // Same instance on every call.
        assert!(Arc::ptr_eq(&ruleset, &Ruleset::bundled().unwrap()));
    }

    #[test]
    fn test_extend() {
        let mut left =
            Ruleset::parse("l", "rule a where { ?x a <C> } insert { ?x a <D> } .").unwrap();
        let right = Ruleset::parse("r", "rule b where { ?x a <D> } insert { ?x a <E> } .").unwrap();
        left.extend(right);
        let names: Vec<_> = left.iter().map(Rule::name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
