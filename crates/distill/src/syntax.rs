//! Reader for graph and ruleset resources.
//!
//! Both resource kinds share one token grammar, a small subset of Turtle:
//!
//! ```text
//! # comment
//! @prefix ex: <http://example.org/> .
//!
//! ex:alice a ex:Person .
//! ex:alice ex:name "Alice"@en <http://example.org/graph> .
//!
//! rule subclass where { ?x a ?c . ?c rdfs:subClassOf ?d } insert { ?x a ?d } .
//! ```
//!
//! Graph resources hold one statement per `.`-terminated line of three or
//! four terms; ruleset resources hold `rule` blocks whose patterns may use
//! `?variables`. The `rdf`, `rdfs`, `owl`, `xsd`, `nif`, `ks` and `kemt`
//! prefixes are predeclared.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{DistillError, Result};
use crate::inference::{PatternTerm, Rule, TriplePattern};
use crate::model::{Graph, Literal, Statement, Term, vocab};

// Patterns are constant, so compilation cannot fail at runtime.
static PREFIXED_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z][\w\-]*)?:([\w\-.%]*)$").unwrap());
static LANGUAGE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]+(-[A-Za-z0-9]+)*$").unwrap());
static INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+-]?\d+$").unwrap());

const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";

/// Parse a graph resource.
pub fn parse_graph(resource: &str, source: &str) -> Result<Graph> {
    let mut parser = Parser::new(resource, source)?;
    let mut graph = Graph::new();

    while let Some(token) = parser.peek() {
        if *token == Token::PrefixDirective {
            parser.parse_prefix()?;
            continue;
        }

        let line = parser.line();
        let mut terms = Vec::with_capacity(4);
        while parser.peek() != Some(&Token::Dot) {
            if parser.peek().is_none() {
                return Err(parser.error("statement is missing the terminating '.'"));
            }
            match parser.parse_term()? {
                PatternTerm::Const(term) => terms.push(term),
                PatternTerm::Var(name) => {
                    return Err(
                        parser.error(format!("variable ?{} is not allowed in a graph", name))
                    );
                }
            }
        }
        parser.advance();

        let statement = match terms.as_slice() {
            [s, p, o] => Statement::new(s.clone(), p.clone(), o.clone()),
            [s, p, o, g] => Statement::new(s.clone(), p.clone(), o.clone()).with_graph(g.clone()),
            _ => {
                return Err(DistillError::Syntax {
                    resource: resource.to_string(),
                    line,
                    message: "a statement needs three or four terms".to_string(),
                });
            }
        };
        if !statement.is_well_formed() {
            return Err(DistillError::Syntax {
                resource: resource.to_string(),
                line,
                message: format!("ill-formed statement {}", statement),
            });
        }
        graph.insert(statement);
    }

    Ok(graph)
}

/// Parse a ruleset resource into validated rules.
pub(crate) fn parse_rules(resource: &str, source: &str) -> Result<Vec<Rule>> {
    let mut parser = Parser::new(resource, source)?;
    let mut rules = Vec::new();

    while let Some(token) = parser.peek() {
        match token {
            Token::PrefixDirective => parser.parse_prefix()?,
            Token::Word(word) if word == "rule" => {
                parser.advance();
                let name = parser.parse_rule_name()?;
                parser.expect_word("where")?;
                let body = parser.parse_pattern_block()?;
                parser.expect_word("insert")?;
                let head = parser.parse_pattern_block()?;
                parser.expect(&Token::Dot, "'.' after rule")?;
                rules.push(Rule::new(name, body, head)?);
            }
            other => {
                let message = format!("expected 'rule' or '@prefix', found {}", other.describe());
                return Err(parser.error(message));
            }
        }
    }

    Ok(rules)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Iri(String),
    PrefixedName(String, String),
    Blank(String),
    Literal {
        lexical: String,
        language: Option<String>,
    },
    DatatypeMarker,
    Var(String),
    Word(String),
    PrefixDirective,
    Dot,
    OpenBrace,
    CloseBrace,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Iri(iri) => format!("<{}>", iri),
            Token::PrefixedName(prefix, local) => format!("{}:{}", prefix, local),
            Token::Blank(label) => format!("_:{}", label),
            Token::Literal { lexical, .. } => format!("\"{}\"", lexical),
            Token::DatatypeMarker => "'^^'".to_string(),
            Token::Var(name) => format!("?{}", name),
            Token::Word(word) => format!("'{}'", word),
            Token::PrefixDirective => "'@prefix'".to_string(),
            Token::Dot => "'.'".to_string(),
            Token::OpenBrace => "'{'".to_string(),
            Token::CloseBrace => "'}'".to_string(),
        }
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':' | '%')
}

struct Lexer<'a> {
    resource: &'a str,
    chars: Vec<char>,
    pos: usize,
    line: usize,
}

impl<'a> Lexer<'a> {
    fn new(resource: &'a str, source: &str) -> Self {
        Self {
            resource,
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
        }
    }

    fn error(&self, message: impl Into<String>) -> DistillError {
        DistillError::Syntax {
            resource: self.resource.to_string(),
            line: self.line,
            message: message.into(),
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn read_name(&mut self) -> String {
        let start = self.pos;
        while self.peek_char().is_some_and(is_name_char) {
            self.pos += 1;
        }
        // A trailing '.' terminates the statement rather than the name.
        while self.pos > start && self.chars[self.pos - 1] == '.' {
            self.pos -= 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn tokenize(mut self) -> Result<Vec<(Token, usize)>> {
        let mut tokens = Vec::new();

        while let Some(c) = self.peek_char() {
            let line = self.line;
            match c {
                c if c.is_whitespace() => {
                    self.bump();
                }
                '#' => {
                    while self.peek_char().is_some_and(|c| c != '\n') {
                        self.bump();
                    }
                }
                '<' => {
                    self.bump();
                    let mut iri = String::new();
                    loop {
                        match self.bump() {
                            Some('>') => break,
                            Some(c) if c.is_whitespace() => {
                                return Err(self.error("whitespace inside IRI"));
                            }
                            Some(c) => iri.push(c),
                            None => return Err(self.error("unterminated IRI")),
                        }
                    }
                    tokens.push((Token::Iri(iri), line));
                }
                '"' => {
                    self.bump();
                    let lexical = self.read_string()?;
                    let mut language = None;
                    if self.peek_char() == Some('@') {
                        self.bump();
                        let tag = self.read_name();
                        if !LANGUAGE_TAG.is_match(&tag) {
                            return Err(self.error(format!("invalid language tag '{}'", tag)));
                        }
                        language = Some(tag);
                    }
                    tokens.push((Token::Literal { lexical, language }, line));
                }
                '^' => {
                    self.bump();
                    if self.bump() != Some('^') {
                        return Err(self.error("expected '^^'"));
                    }
                    tokens.push((Token::DatatypeMarker, line));
                }
                '?' => {
                    self.bump();
                    let name = self.read_name();
                    if name.is_empty() || name.contains(':') {
                        return Err(self.error(format!("invalid variable name '?{}'", name)));
                    }
                    tokens.push((Token::Var(name), line));
                }
                '@' => {
                    self.bump();
                    let word = self.read_name();
                    if word != "prefix" {
                        return Err(self.error(format!("unknown directive '@{}'", word)));
                    }
                    tokens.push((Token::PrefixDirective, line));
                }
                '.' => {
                    self.bump();
                    tokens.push((Token::Dot, line));
                }
                '{' => {
                    self.bump();
                    tokens.push((Token::OpenBrace, line));
                }
                '}' => {
                    self.bump();
                    tokens.push((Token::CloseBrace, line));
                }
                _ => {
                    let name = self.read_name();
                    if name.is_empty() {
                        return Err(self.error(format!("unexpected character '{}'", c)));
                    }
                    if let Some(label) = name.strip_prefix("_:") {
                        if label.is_empty() {
                            return Err(self.error("empty blank node label"));
                        }
                        tokens.push((Token::Blank(label.to_string()), line));
                    } else if name.contains(':') {
                        let caps = PREFIXED_NAME
                            .captures(&name)
                            .ok_or_else(|| {
                                self.error(format!("invalid prefixed name '{}'", name))
                            })?;
                        let prefix = caps.get(1).map_or("", |m| m.as_str()).to_string();
                        let local = caps.get(2).map_or("", |m| m.as_str()).to_string();
                        tokens.push((Token::PrefixedName(prefix, local), line));
                    } else {
                        tokens.push((Token::Word(name), line));
                    }
                }
            }
        }

        Ok(tokens)
    }

    fn read_string(&mut self) -> Result<String> {
        let mut value = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(value),
                Some('\\') => match self.bump() {
                    Some('"') => value.push('"'),
                    Some('\\') => value.push('\\'),
                    Some('n') => value.push('\n'),
                    Some('r') => value.push('\r'),
                    Some('t') => value.push('\t'),
                    Some(other) => {
                        return Err(self.error(format!("unsupported escape '\\{}'", other)));
                    }
                    None => return Err(self.error("unterminated literal")),
                },
                Some(c) => value.push(c),
                None => return Err(self.error("unterminated literal")),
            }
        }
    }
}

struct Parser<'a> {
    resource: &'a str,
    tokens: Vec<(Token, usize)>,
    pos: usize,
    prefixes: HashMap<String, String>,
}

impl<'a> Parser<'a> {
    fn new(resource: &'a str, source: &str) -> Result<Self> {
        let tokens = Lexer::new(resource, source).tokenize()?;
        let prefixes = vocab::BUILTIN_PREFIXES
            .iter()
            .map(|(prefix, ns)| (prefix.to_string(), ns.to_string()))
            .collect();
        Ok(Self {
            resource,
            tokens,
            pos: 0,
            prefixes,
        })
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(token, _)| token)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(token, _)| token.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(1, |(_, line)| *line)
    }

    fn error(&self, message: impl Into<String>) -> DistillError {
        DistillError::Syntax {
            resource: self.resource.to_string(),
            line: self.line(),
            message: message.into(),
        }
    }

    fn expect(&mut self, expected: &Token, what: &str) -> Result<()> {
        match self.peek() {
            Some(token) if token == expected => {
                self.advance();
                Ok(())
            }
            Some(token) => {
                let message = format!("expected {}, found {}", what, token.describe());
                Err(self.error(message))
            }
            None => Err(self.error(format!("expected {}, found end of input", what))),
        }
    }

    fn expect_word(&mut self, word: &str) -> Result<()> {
        self.expect(&Token::Word(word.to_string()), &format!("'{}'", word))
    }

    fn parse_prefix(&mut self) -> Result<()> {
        self.expect(&Token::PrefixDirective, "'@prefix'")?;
        let prefix = match self.advance() {
            Some(Token::PrefixedName(prefix, local)) if local.is_empty() => prefix,
            _ => return Err(self.error("expected a prefix declaration such as 'ex:'")),
        };
        let namespace = match self.advance() {
            Some(Token::Iri(iri)) => iri,
            _ => return Err(self.error("expected a namespace IRI")),
        };
        self.expect(&Token::Dot, "'.' after prefix declaration")?;
        self.prefixes.insert(prefix, namespace);
        Ok(())
    }

    fn expand(&self, prefix: &str, local: &str) -> Result<String> {
        self.prefixes
            .get(prefix)
            .map(|ns| format!("{}{}", ns, local))
            .ok_or_else(|| self.error(format!("undeclared prefix '{}:'", prefix)))
    }

    fn parse_term(&mut self) -> Result<PatternTerm> {
        let token = self
            .advance()
            .ok_or_else(|| self.error("expected a term, found end of input"))?;

        let term = match token {
            Token::Iri(iri) => Term::iri(iri),
            Token::PrefixedName(prefix, local) => Term::iri(self.expand(&prefix, &local)?),
            Token::Blank(label) => Term::blank(label),
            Token::Var(name) => return Ok(PatternTerm::var(&name)),
            Token::Literal { lexical, language } => {
                if let Some(language) = language {
                    Term::Literal(Literal::lang(lexical, language))
                } else if self.peek() == Some(&Token::DatatypeMarker) {
                    self.advance();
                    let datatype = match self.advance() {
                        Some(Token::Iri(iri)) => iri,
                        Some(Token::PrefixedName(prefix, local)) => self.expand(&prefix, &local)?,
                        _ => return Err(self.error("expected a datatype IRI after '^^'")),
                    };
                    Term::typed_literal(lexical, datatype)
                } else {
                    Term::literal(lexical)
                }
            }
            Token::Word(word) if word == "a" => Term::iri(vocab::RDF_TYPE),
            Token::Word(word) if word == "true" || word == "false" => {
                Term::typed_literal(word, XSD_BOOLEAN)
            }
            Token::Word(word) if INTEGER.is_match(&word) => Term::typed_literal(word, XSD_INTEGER),
            other => {
                return Err(self.error(format!("expected a term, found {}", other.describe())));
            }
        };

        Ok(PatternTerm::Const(term))
    }

    fn parse_rule_name(&mut self) -> Result<String> {
        match self.advance() {
            Some(Token::Word(name)) => Ok(name),
            Some(Token::PrefixedName(prefix, local)) => self.expand(&prefix, &local),
            Some(Token::Iri(iri)) => Ok(iri),
            _ => Err(self.error("expected a rule name")),
        }
    }

    fn parse_pattern_block(&mut self) -> Result<Vec<TriplePattern>> {
        self.expect(&Token::OpenBrace, "'{'")?;
        let mut patterns = Vec::new();

        loop {
            match self.peek() {
                Some(Token::CloseBrace) => {
                    self.advance();
                    return Ok(patterns);
                }
                Some(Token::Dot) => {
                    self.advance();
                }
                Some(_) => {
                    let subject = self.parse_term()?;
                    let predicate = self.parse_term()?;
                    let object = self.parse_term()?;
                    patterns.push(TriplePattern::new(subject, predicate, object));
                }
                None => return Err(self.error("unterminated pattern block")),
            }
        }
    }
}
