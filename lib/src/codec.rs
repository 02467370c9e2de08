//! The line-oriented text format.
//!
//! One triple per line, fields separated by a space:
//!
//! ```text
//! <http://domain/myproject#Bob> <http://domain/myproject#hasAge> "33"^^<http://www.w3.org/2001/XMLSchema#integer>
//! ```
//!
//! IRIs are written in angle brackets, literals in double quotes with `\\`,
//! `\"`, `\n`, `\r` and `\t` escaped and an optional `^^<datatype>`. Blank
//! lines and lines starting with `#` are ignored when reading. Output is in
//! insertion order, so serializing the same store twice gives the same text.
//!
//! The same lexer backs [`parse_pattern`] and [`parse_term`], which also
//! accept `?variables` and `prefix:local` names for command line input.

use crate::errors::{Error, ParseError};
use crate::namespace::Namespaces;
use crate::store::TripleStore;
use crate::term::{Iri, Literal, Term, Variable};
use crate::triple::{Triple, TriplePattern};
use log::debug;
use std::fmt::Write as _;
use std::io::{BufRead, Write};

/// Renders every triple of `store`, one per line, in insertion order.
pub fn serialize(store: &TripleStore) -> String {
    let mut out = String::new();
    for triple in store {
        // writing to a String cannot fail
        let _ = writeln!(out, "{}", triple);
    }
    out
}

/// Streaming form of [`serialize`].
pub fn write_to<W: Write>(store: &TripleStore, mut writer: W) -> std::io::Result<()> {
    for triple in store {
        writeln!(writer, "{}", triple)?;
    }
    writer.flush()
}

/// Parses text produced by [`serialize`]. Fails on the first malformed line
/// and returns no partial store.
pub fn deserialize(text: &str) -> Result<TripleStore, ParseError> {
    let mut store = TripleStore::new();
    for (idx, line) in text.lines().enumerate() {
        if let Some(triple) = parse_triple_line(line).map_err(|r| ParseError::new(idx + 1, r))? {
            store.insert(triple);
        }
    }
    debug!("Deserialized {} triples", store.len());
    Ok(store)
}

/// Streaming form of [`deserialize`].
pub fn read_from<R: BufRead>(reader: R) -> Result<TripleStore, Error> {
    let mut store = TripleStore::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if let Some(triple) = parse_triple_line(&line).map_err(|r| ParseError::new(idx + 1, r))? {
            store.insert(triple);
        }
    }
    debug!("Read {} triples", store.len());
    Ok(store)
}

/// Reads a single pattern such as `?s rdf:type <http://example.org/C>`.
pub fn parse_pattern(text: &str, namespaces: &Namespaces) -> Result<TriplePattern, ParseError> {
    let pattern = || -> Result<TriplePattern, String> {
        let [s, p, o] = three_terms(text, Some(namespaces))?;
        TriplePattern::new(s, p, o).map_err(|e| e.to_string())
    };
    pattern().map_err(|reason| ParseError::new(1, reason))
}

/// Reads a single term: `<iri>`, `prefix:local`, a bare local name (against
/// the base), `"literal"` with an optional `^^datatype`, or `?var`.
pub fn parse_term(text: &str, namespaces: &Namespaces) -> Result<Term, ParseError> {
    let term = || -> Result<Term, String> {
        let mut tokens = tokenize(text)?;
        match (tokens.pop(), tokens.is_empty()) {
            (Some(token), true) => to_term(token, Some(namespaces)),
            (None, _) => Err("expected a term".to_string()),
            (Some(_), false) => Err(format!("expected one term, found {}", tokens.len() + 1)),
        }
    };
    term().map_err(|reason| ParseError::new(1, reason))
}

fn parse_triple_line(line: &str) -> Result<Option<Triple>, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    let [s, p, o] = three_terms(trimmed, None)?;
    Triple::from_terms(s, p, o)
        .map(Some)
        .map_err(|e| e.to_string())
}

fn three_terms(text: &str, namespaces: Option<&Namespaces>) -> Result<[Term; 3], String> {
    let tokens = tokenize(text)?;
    let count = tokens.len();
    let terms = tokens
        .into_iter()
        .map(|t| to_term(t, namespaces))
        .collect::<Result<Vec<_>, _>>()?;
    <[Term; 3]>::try_from(terms).map_err(|_| format!("expected 3 terms, found {}", count))
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Name {
    /// `<...>`
    Bracketed(String),
    /// `prefix:local` or `local`
    Bare(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Name(Name),
    Literal { value: String, datatype: Option<Name> },
    Variable(String),
}

fn resolve(name: Name, namespaces: Option<&Namespaces>) -> Result<Iri, String> {
    match (name, namespaces) {
        (Name::Bracketed(iri), _) => Iri::new(iri).map_err(|e| e.to_string()),
        (Name::Bare(name), Some(ns)) => ns.expand(&name).map_err(|e| e.to_string()),
        (Name::Bare(name), None) => Err(format!("expected '<' or '\"', found {:?}", name)),
    }
}

fn to_term(token: Token, namespaces: Option<&Namespaces>) -> Result<Term, String> {
    match token {
        Token::Name(name) => resolve(name, namespaces).map(Term::Iri),
        Token::Literal {
            value,
            datatype: None,
        } => Ok(Term::Literal(Literal::plain(value))),
        Token::Literal {
            value,
            datatype: Some(dt),
        } => Ok(Term::Literal(Literal::typed(value, resolve(dt, namespaces)?))),
        Token::Variable(name) => Variable::new(name)
            .map(Term::Variable)
            .map_err(|e| e.to_string()),
    }
}

fn tokenize(text: &str) -> Result<Vec<Token>, String> {
    let mut lexer = Lexer { rest: text };
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
    }
    Ok(tokens)
}

struct Lexer<'a> {
    rest: &'a str,
}

impl<'a> Lexer<'a> {
    fn next_token(&mut self) -> Result<Option<Token>, String> {
        self.rest = self.rest.trim_start();
        let token = match self.rest.chars().next() {
            None => return Ok(None),
            Some('<') => Token::Name(self.bracketed()?),
            Some('"') => self.literal()?,
            Some('?') => Token::Variable(self.bare().to_string()),
            Some(_) => Token::Name(Name::Bare(self.bare().to_string())),
        };
        if let Some(c) = self.rest.chars().next() {
            if !c.is_whitespace() {
                return Err(format!("unexpected {:?} after term", c));
            }
        }
        Ok(Some(token))
    }

    fn bracketed(&mut self) -> Result<Name, String> {
        let body = &self.rest[1..];
        match body.find('>') {
            Some(end) => {
                self.rest = &body[end + 1..];
                Ok(Name::Bracketed(body[..end].to_string()))
            }
            None => Err("unterminated IRI, missing '>'".to_string()),
        }
    }

    fn bare(&mut self) -> &'a str {
        let end = self
            .rest
            .find(char::is_whitespace)
            .unwrap_or(self.rest.len());
        let (word, rest) = self.rest.split_at(end);
        self.rest = rest;
        word
    }

    fn literal(&mut self) -> Result<Token, String> {
        let body = &self.rest[1..];
        let mut value = String::new();
        let mut chars = body.char_indices();
        let end = loop {
            match chars.next() {
                None => return Err("unterminated literal, missing closing '\"'".to_string()),
                Some((i, '"')) => break i,
                Some((_, '\\')) => match chars.next() {
                    Some((_, '\\')) => value.push('\\'),
                    Some((_, '"')) => value.push('"'),
                    Some((_, 'n')) => value.push('\n'),
                    Some((_, 'r')) => value.push('\r'),
                    Some((_, 't')) => value.push('\t'),
                    Some((_, c)) => return Err(format!("bad escape sequence '\\{}'", c)),
                    None => return Err("unterminated escape sequence".to_string()),
                },
                Some((_, c)) => value.push(c),
            }
        };
        self.rest = &body[end + 1..];
        let datatype = match self.rest.strip_prefix("^^") {
            None => None,
            Some(after) => {
                self.rest = after;
                match self.rest.chars().next() {
                    Some('<') => Some(self.bracketed()?),
                    Some(c) if !c.is_whitespace() => Some(Name::Bare(self.bare().to_string())),
                    _ => return Err("missing datatype after '^^'".to_string()),
                }
            }
        };
        Ok(Token::Literal { value, datatype })
    }
}
