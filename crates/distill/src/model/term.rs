//! RDF terms: IRIs, blank identifiers and typed literals.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::vocab;

/// A node or value in a statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Term {
    /// Globally-scoped identifier.
    Iri(Arc<str>),
    /// Locally-scoped identifier, written `_:label`.
    Blank(Arc<str>),
    /// Typed (optionally language-tagged) value.
    Literal(Literal),
}

impl Term {
    /// Create an IRI term.
    pub fn iri(iri: impl AsRef<str>) -> Self {
        Term::Iri(Arc::from(iri.as_ref()))
    }

    /// Create a blank identifier term.
    pub fn blank(label: impl AsRef<str>) -> Self {
        Term::Blank(Arc::from(label.as_ref()))
    }

    /// Create a plain `xsd:string` literal.
    pub fn literal(lexical: impl AsRef<str>) -> Self {
        Term::Literal(Literal::string(lexical))
    }

    /// Create a literal with an explicit datatype.
    pub fn typed_literal(lexical: impl AsRef<str>, datatype: impl AsRef<str>) -> Self {
        Term::Literal(Literal::typed(lexical, datatype))
    }

    /// Whether the term may appear as a statement subject.
    pub fn is_resource(&self) -> bool {
        matches!(self, Term::Iri(_) | Term::Blank(_))
    }

    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal(_))
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(literal) => Some(literal),
            _ => None,
        }
    }

    /// The string value of the term: IRI, blank label or lexical form.
    pub fn value(&self) -> &str {
        match self {
            Term::Iri(iri) => iri,
            Term::Blank(label) => label,
            Term::Literal(literal) => literal.lexical(),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{}>", iri),
            Term::Blank(label) => write!(f, "_:{}", label),
            Term::Literal(literal) => literal.fmt(f),
        }
    }
}

/// A literal value with its datatype and optional language tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Literal {
    lexical: Arc<str>,
    datatype: Arc<str>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    language: Option<Arc<str>>,
}

impl Literal {
    /// A plain string literal (`xsd:string`).
    pub fn string(lexical: impl AsRef<str>) -> Self {
        Self::typed(lexical, vocab::XSD_STRING)
    }

    pub fn typed(lexical: impl AsRef<str>, datatype: impl AsRef<str>) -> Self {
        Self {
            lexical: Arc::from(lexical.as_ref()),
            datatype: Arc::from(datatype.as_ref()),
            language: None,
        }
    }

    /// A language-tagged string. Tags are normalized to lowercase.
    pub fn lang(lexical: impl AsRef<str>, language: impl AsRef<str>) -> Self {
        Self {
            lexical: Arc::from(lexical.as_ref()),
            datatype: Arc::from(vocab::RDF_LANG_STRING),
            language: Some(Arc::from(language.as_ref().to_ascii_lowercase())),
        }
    }

    pub fn lexical(&self) -> &str {
        &self.lexical
    }

    pub fn datatype(&self) -> &str {
        &self.datatype
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;
        for c in self.lexical.chars() {
            match c {
                '"' => f.write_str("\\\"")?,
                '\\' => f.write_str("\\\\")?,
                '\n' => f.write_str("\\n")?,
                '\r' => f.write_str("\\r")?,
                '\t' => f.write_str("\\t")?,
                c => write!(f, "{}", c)?,
            }
        }
        f.write_str("\"")?;
        if let Some(language) = &self.language {
            write!(f, "@{}", language)
        } else if &*self.datatype != vocab::XSD_STRING {
            write!(f, "^^<{}>", self.datatype)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_ntriples() {
        assert_eq!(Term::iri("http://ex.org/a").to_string(), "<http://ex.org/a>");
        assert_eq!(Term::blank("b0").to_string(), "_:b0");
        assert_eq!(Term::literal("hi").to_string(), "\"hi\"");
        assert_eq!(
            Term::typed_literal("42", "http://www.w3.org/2001/XMLSchema#integer").to_string(),
            "\"42\"^^<http://www.w3.org/2001/XMLSchema#integer>"
        );
        assert_eq!(Term::Literal(Literal::lang("ciao", "IT")).to_string(), "\"ciao\"@it");
    }

    #[test]
    fn test_literal_escapes() {
        let term = Term::literal("say \"hi\"\n\\");
        assert_eq!(term.to_string(), "\"say \\\"hi\\\"\\n\\\\\"");
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(Term::iri("x"), Term::iri("x"));
        assert_ne!(Term::iri("x"), Term::blank("x"));
        assert_ne!(Term::literal("x"), Term::typed_literal("x", "http://ex.org/dt"));
    }

    #[test]
    fn test_resource_kinds() {
        assert!(Term::iri("x").is_resource());
        assert!(Term::blank("x").is_resource());
        assert!(!Term::literal("x").is_resource());
        assert_eq!(Term::literal("x").value(), "x");
    }
}
