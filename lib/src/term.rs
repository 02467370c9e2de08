//! RDF terms: IRIs, literals and pattern variables.
//!
//! [`Term`] is the full tagged union used when writing patterns. Stored triples
//! and query results only ever hold a [`Node`], the ground subset of `Term`
//! (an IRI or a literal), so a variable can never reach the store.

use crate::consts::XSD_INTEGER;
use crate::errors::ValidationError;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// An absolute identifier. Never empty, never contains whitespace, control
/// characters, or any of `<`, `>` and `"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Iri(String);

impl Iri {
    pub fn new(iri: impl Into<String>) -> Result<Self, ValidationError> {
        let iri = iri.into();
        if iri.is_empty() {
            return Err(ValidationError::EmptyIri);
        }
        if let Some(reason) = iri.chars().find_map(invalid_iri_char) {
            return Err(ValidationError::InvalidIri { iri, reason });
        }
        Ok(Self(iri))
    }

    /// Skips validation; for vocabulary constants and IRIs derived from
    /// already valid ones.
    pub(crate) fn new_unchecked(iri: impl Into<String>) -> Self {
        Self(iri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

fn invalid_iri_char(c: char) -> Option<&'static str> {
    if c.is_whitespace() {
        Some("contains whitespace")
    } else if c.is_control() {
        Some("contains a control character")
    } else if matches!(c, '<' | '>' | '"') {
        Some("contains one of '<', '>' or '\"'")
    } else {
        None
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

impl Serialize for Iri {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl AsRef<str> for Iri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Iri {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Iri::new(value)
    }
}

impl TryFrom<String> for Iri {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Iri::new(value)
    }
}

/// A lexical value with an optional datatype IRI.
///
/// The lexical form is not checked against the datatype here; see
/// [`crate::doctor::IntegerLiterals`] for an explicit check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    value: String,
    datatype: Option<Iri>,
}

impl Literal {
    /// A literal without a datatype.
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: None,
        }
    }

    pub fn typed(value: impl Into<String>, datatype: Iri) -> Self {
        Self {
            value: value.into(),
            datatype: Some(datatype),
        }
    }

    /// `"n"^^xsd:integer`
    pub fn integer(n: i64) -> Self {
        Self {
            value: n.to_string(),
            datatype: Some(Iri::new_unchecked(XSD_INTEGER)),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn datatype(&self) -> Option<&Iri> {
        self.datatype.as_ref()
    }

    /// Pattern-side comparison: the values must be equal, and the datatypes
    /// too when this literal names one.
    pub fn matches(&self, stored: &Literal) -> bool {
        if self.value != stored.value {
            return false;
        }
        match &self.datatype {
            Some(dt) => stored.datatype.as_ref() == Some(dt),
            None => true,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;
        for c in self.value.chars() {
            match c {
                '\\' => f.write_str("\\\\")?,
                '"' => f.write_str("\\\"")?,
                '\n' => f.write_str("\\n")?,
                '\r' => f.write_str("\\r")?,
                '\t' => f.write_str("\\t")?,
                c => write!(f, "{}", c)?,
            }
        }
        f.write_str("\"")?;
        if let Some(dt) = &self.datatype {
            write!(f, "^^{}", dt)?;
        }
        Ok(())
    }
}

/// A named placeholder, valid only inside a [`crate::triple::TriplePattern`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable(String);

impl Variable {
    /// Names are ASCII alphanumerics and `_`. A single leading `?` is accepted
    /// and dropped, so `Variable::new("?s")` and `Variable::new("s")` are equal.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        let bare = name.strip_prefix('?').unwrap_or(&name);
        if bare.is_empty() {
            return Err(ValidationError::InvalidPattern("empty variable name".into()));
        }
        if !bare.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(ValidationError::InvalidVariable(name));
        }
        Ok(Self(bare.to_string()))
    }

    /// Skips validation; `name` must already be a bare, valid name.
    pub(crate) fn new_unchecked(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.0)
    }
}

/// A ground term: what stored triples and query bindings hold.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Node {
    Iri(Iri),
    Literal(Literal),
}

impl Node {
    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Node::Iri(iri) => Some(iri),
            Node::Literal(_) => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Node::Literal(lit) => Some(lit),
            Node::Iri(_) => None,
        }
    }

    /// The IRI string or the literal's lexical value.
    pub fn value(&self) -> &str {
        match self {
            Node::Iri(iri) => iri.as_str(),
            Node::Literal(lit) => lit.value(),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Iri(iri) => write!(f, "{}", iri),
            Node::Literal(lit) => write!(f, "{}", lit),
        }
    }
}

impl From<Iri> for Node {
    fn from(iri: Iri) -> Self {
        Node::Iri(iri)
    }
}

impl From<Literal> for Node {
    fn from(lit: Literal) -> Self {
        Node::Literal(lit)
    }
}

// Serialized the way SPARQL JSON results encode RDF terms.
impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Node::Iri(iri) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "uri")?;
                map.serialize_entry("value", iri.as_str())?;
                map.end()
            }
            Node::Literal(lit) => {
                let len = if lit.datatype.is_some() { 3 } else { 2 };
                let mut map = serializer.serialize_map(Some(len))?;
                map.serialize_entry("type", "literal")?;
                map.serialize_entry("value", lit.value())?;
                if let Some(dt) = &lit.datatype {
                    map.serialize_entry("datatype", dt.as_str())?;
                }
                map.end()
            }
        }
    }
}

/// An RDF node or a pattern variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    Iri(Iri),
    Literal(Literal),
    Variable(Variable),
}

impl Term {
    pub fn iri(iri: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Term::Iri(Iri::new(iri)?))
    }

    pub fn var(name: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Term::Variable(Variable::new(name)?))
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }

    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            Term::Variable(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "{}", iri),
            Term::Literal(lit) => write!(f, "{}", lit),
            Term::Variable(var) => write!(f, "{}", var),
        }
    }
}

impl From<Iri> for Term {
    fn from(iri: Iri) -> Self {
        Term::Iri(iri)
    }
}

impl From<Literal> for Term {
    fn from(lit: Literal) -> Self {
        Term::Literal(lit)
    }
}

impl From<Variable> for Term {
    fn from(var: Variable) -> Self {
        Term::Variable(var)
    }
}

impl From<Node> for Term {
    fn from(node: Node) -> Self {
        match node {
            Node::Iri(iri) => Term::Iri(iri),
            Node::Literal(lit) => Term::Literal(lit),
        }
    }
}

impl TryFrom<Term> for Node {
    type Error = ValidationError;

    fn try_from(term: Term) -> Result<Self, Self::Error> {
        match term {
            Term::Iri(iri) => Ok(Node::Iri(iri)),
            Term::Literal(lit) => Ok(Node::Literal(lit)),
            Term::Variable(var) => Err(ValidationError::UnexpectedVariable(var.0)),
        }
    }
}
