//! Error types surfaced by the store, the query engine and the codec.

use thiserror::Error;

/// A term, triple or pattern was rejected at construction time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("IRI must not be empty")]
    EmptyIri,

    #[error("invalid IRI {iri:?}: {reason}")]
    InvalidIri { iri: String, reason: &'static str },

    #[error("invalid variable name {0:?}")]
    InvalidVariable(String),

    #[error("invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("a literal cannot be used as a subject")]
    LiteralInSubject,

    #[error("a literal cannot be used as a predicate")]
    LiteralInPredicate,

    #[error("variable ?{0} is only allowed in patterns")]
    UnexpectedVariable(String),
}

/// Malformed input to [`crate::codec::deserialize`] or [`crate::codec::parse_pattern`].
///
/// `line` is 1-based.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("parse error on line {line}: {reason}")]
pub struct ParseError {
    pub line: usize,
    pub reason: String,
}

impl ParseError {
    pub fn new(line: usize, reason: impl Into<String>) -> Self {
        Self {
            line,
            reason: reason.into(),
        }
    }
}

/// A query was rejected before evaluation started.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("query has no patterns")]
    EmptyQuery,

    #[error("unknown variable ?{0}")]
    UnknownVariable(String),
}

/// Crate-wide error for operations that touch files or external formats.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors raised while translating to or from other RDF syntaxes.
    #[error("RDF interop error: {0}")]
    Rdf(String),
}

pub type Result<T> = std::result::Result<T, Error>;
