//! Explicit validation passes over a store.
//! Checks only report problems; nothing here modifies the store, and nothing
//! here runs implicitly on insert.

use crate::consts::*;
use crate::errors::Result;
use crate::query::QueryEngine;
use crate::store::TripleStore;
use crate::term::{Iri, Node, Term, Variable};
use crate::triple::TriplePattern;
use log::{debug, info};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Problem {
    pub check: String,
    /// The resource the problem is about, when there is one.
    pub subject: Option<Iri>,
    pub message: String,
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subject {
            Some(subject) => write!(f, "[{}] {}: {}", self.check, subject, self.message),
            None => write!(f, "[{}] {}", self.check, self.message),
        }
    }
}

pub trait StoreCheck {
    fn name(&self) -> &str;
    fn check(&mut self, store: &TripleStore, problems: &mut Vec<Problem>) -> Result<()>;
}

pub struct Doctor {
    checks: Vec<Box<dyn StoreCheck>>,
}

impl Default for Doctor {
    fn default() -> Self {
        Self::new()
    }
}

impl Doctor {
    pub fn new() -> Self {
        Self { checks: Vec::new() }
    }

    pub fn with_default_checks() -> Self {
        let mut doctor = Self::new();
        doctor.add_check(Box::new(MaxCardinality {}));
        doctor.add_check(Box::new(IntegerLiterals {}));
        doctor
    }

    pub fn add_check(&mut self, check: Box<dyn StoreCheck>) {
        self.checks.push(check);
    }

    pub fn run(&mut self, store: &TripleStore) -> Result<Vec<Problem>> {
        let mut problems = Vec::new();
        for check in &mut self.checks {
            let before = problems.len();
            check.check(store, &mut problems)?;
            info!(
                "Check '{}' found {} problem(s)",
                check.name(),
                problems.len() - before
            );
        }
        Ok(problems)
    }
}

/// Instances of a class restricted with `owl:maxCardinality n` on a property
/// may have at most `n` distinct values for it. Only direct `rdf:type`
/// statements make something an instance.
pub struct MaxCardinality {}

impl MaxCardinality {
    fn restriction_patterns() -> Result<Vec<TriplePattern>> {
        let var = |name: &str| Term::Variable(Variable::new_unchecked(name));
        let iri = |s: &str| Term::Iri(Iri::new_unchecked(s));
        Ok(vec![
            TriplePattern::new(var("r"), iri(TYPE), iri(RESTRICTION))?,
            TriplePattern::new(var("r"), iri(ON_PROPERTY), var("p"))?,
            TriplePattern::new(var("r"), iri(MAX_CARDINALITY), var("n"))?,
            TriplePattern::new(var("c"), iri(SUB_CLASS_OF), var("r"))?,
        ])
    }

    fn report(&self, subject: Option<Iri>, message: String) -> Problem {
        Problem {
            check: self.name().to_string(),
            subject,
            message,
        }
    }
}

impl StoreCheck for MaxCardinality {
    fn name(&self) -> &str {
        "Max Cardinality"
    }

    fn check(&mut self, store: &TripleStore, problems: &mut Vec<Problem>) -> Result<()> {
        let engine = QueryEngine::new(store);
        let restrictions = engine.select(&Self::restriction_patterns()?, None)?;
        debug!("Found {} max-cardinality restriction(s)", restrictions.len());

        for row in restrictions {
            let (Some(Node::Iri(restriction)), Some(Node::Iri(class))) = (row.get("r"), row.get("c"))
            else {
                continue;
            };
            let Some(Node::Iri(property)) = row.get("p") else {
                problems.push(self.report(
                    Some(restriction.clone()),
                    "owl:onProperty is not an IRI".to_string(),
                ));
                continue;
            };
            let max = match row.get("n").map(|n| n.value().parse::<usize>()) {
                Some(Ok(max)) => max,
                _ => {
                    problems.push(self.report(
                        Some(restriction.clone()),
                        "owl:maxCardinality is not a non-negative integer".to_string(),
                    ));
                    continue;
                }
            };

            for typed in store.matches(&TriplePattern::referencing(class)) {
                if typed.predicate().as_str() != TYPE {
                    continue;
                }
                let instance = typed.subject();
                let count = store
                    .matches(&TriplePattern::about(instance))
                    .filter(|t| t.predicate() == property)
                    .count();
                if count > max {
                    problems.push(self.report(
                        Some(instance.clone()),
                        format!(
                            "has {} values for {} but {} allows at most {} ({})",
                            count, property, class, max, restriction
                        ),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Literals typed `xsd:integer` (or `xsd:nonNegativeInteger`) must have an
/// integer lexical form.
pub struct IntegerLiterals {}

impl StoreCheck for IntegerLiterals {
    fn name(&self) -> &str {
        "Integer Literals"
    }

    fn check(&mut self, store: &TripleStore, problems: &mut Vec<Problem>) -> Result<()> {
        for triple in store {
            let Some(lit) = triple.object().as_literal() else {
                continue;
            };
            let signed = match lit.datatype().map(Iri::as_str) {
                Some(XSD_INTEGER) => true,
                Some(XSD_NON_NEGATIVE_INTEGER) => false,
                _ => continue,
            };
            if !is_integer_lexical(lit.value(), signed) {
                problems.push(Problem {
                    check: self.name().to_string(),
                    subject: Some(triple.subject().clone()),
                    message: format!(
                        "{} is not a valid lexical form for its datatype (predicate {})",
                        lit,
                        triple.predicate()
                    ),
                });
            }
        }
        Ok(())
    }
}

fn is_integer_lexical(value: &str, signed: bool) -> bool {
    let digits = match value.strip_prefix('-') {
        Some(rest) if signed => rest,
        Some(_) => return false,
        None => value.strip_prefix('+').unwrap_or(value),
    };
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
