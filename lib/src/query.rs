//! Conjunctive pattern queries over a [`TripleStore`].
//!
//! A query is an ordered list of [`TriplePattern`]s sharing variables. The
//! engine evaluates it by backtracking: the first pattern is matched against
//! the store, each candidate triple extends the current [`Binding`], and the
//! remaining patterns are matched with the already-bound variables
//! substituted in. Candidates come from the store in insertion order, so the
//! order of solutions is reproducible for a given store and query.

use crate::errors::QueryError;
use crate::options::DescribeMode;
use crate::store::TripleStore;
use crate::term::{Iri, Node, Term, Variable};
use crate::triple::{Triple, TriplePattern};
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::ControlFlow;

/// Variable name (without the `?`) to value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Binding(BTreeMap<String, Node>);

impl Binding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.0.get(name.strip_prefix('?').unwrap_or(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns the previous value bound to `name`, if any.
    pub fn insert(&mut self, name: impl Into<String>, value: Node) -> Option<Node> {
        self.0.insert(name.into(), value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Keeps only the listed variables.
    pub fn project(&self, vars: &[Variable]) -> Binding {
        Binding(
            vars.iter()
                .filter_map(|v| self.0.get_key_value(v.name()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    // Binds each variable of `pattern` to the matching position of `triple`,
    // failing when a variable is already bound to something else.
    fn extend(&self, pattern: &TriplePattern, triple: &Triple) -> Option<Binding> {
        let mut out = self.clone();
        let positions = [
            (pattern.subject(), Node::Iri(triple.subject().clone())),
            (pattern.predicate(), Node::Iri(triple.predicate().clone())),
            (pattern.object(), triple.object().clone()),
        ];
        for (term, value) in positions {
            if let Term::Variable(var) = term {
                match out.0.get(var.name()) {
                    Some(existing) if existing != &value => return None,
                    Some(_) => {}
                    None => {
                        out.0.insert(var.name().to_string(), value);
                    }
                }
            }
        }
        Some(out)
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, value) in &self.0 {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "?{} = {}", name, value)?;
            first = false;
        }
        Ok(())
    }
}

/// Read-only query evaluation over a borrowed store.
#[derive(Debug, Clone, Copy)]
pub struct QueryEngine<'a> {
    store: &'a TripleStore,
}

impl<'a> QueryEngine<'a> {
    pub fn new(store: &'a TripleStore) -> Self {
        Self { store }
    }

    /// True iff at least one binding satisfies every pattern. Stops at the
    /// first one found.
    pub fn ask(&self, patterns: &[TriplePattern]) -> Result<bool, QueryError> {
        self.validate(patterns)?;
        let mut found = false;
        let _ = self.search(patterns, &Binding::new(), &mut |_| {
            found = true;
            ControlFlow::Break(())
        });
        Ok(found)
    }

    /// All bindings satisfying every pattern, in search order, capped at
    /// `limit` when given.
    pub fn select(
        &self,
        patterns: &[TriplePattern],
        limit: Option<usize>,
    ) -> Result<Vec<Binding>, QueryError> {
        self.validate(patterns)?;
        Ok(self.collect_bindings(patterns, limit))
    }

    /// Like [`QueryEngine::select`], keeping only `vars` in each binding.
    /// Every projected variable must occur in some pattern.
    pub fn select_vars(
        &self,
        patterns: &[TriplePattern],
        vars: &[Variable],
        limit: Option<usize>,
    ) -> Result<Vec<Binding>, QueryError> {
        self.validate(patterns)?;
        for var in vars {
            if !patterns.iter().flat_map(|p| p.variables()).any(|v| v == var) {
                return Err(QueryError::UnknownVariable(var.name().to_string()));
            }
        }
        Ok(self
            .collect_bindings(patterns, limit)
            .iter()
            .map(|b| b.project(vars))
            .collect())
    }

    /// A new store holding exactly the triples whose subject is `iri`.
    /// Empty when `iri` is never used as a subject.
    pub fn describe(&self, iri: &Iri) -> TripleStore {
        self.describe_with(iri, DescribeMode::Subject)
    }

    pub fn describe_with(&self, iri: &Iri, mode: DescribeMode) -> TripleStore {
        let mut described: TripleStore = self
            .store
            .matches(&TriplePattern::about(iri))
            .cloned()
            .collect();
        if mode.includes_inbound() {
            described.extend(self.store.matches(&TriplePattern::referencing(iri)).cloned());
        }
        debug!("Described {} with {} triples", iri, described.len());
        described
    }

    fn validate(&self, patterns: &[TriplePattern]) -> Result<(), QueryError> {
        if patterns.is_empty() {
            return Err(QueryError::EmptyQuery);
        }
        debug!(
            "Evaluating {} pattern(s); first pattern uses {:?}",
            patterns.len(),
            self.store.access_path(&patterns[0])
        );
        Ok(())
    }

    fn collect_bindings(&self, patterns: &[TriplePattern], limit: Option<usize>) -> Vec<Binding> {
        let mut out = Vec::new();
        if limit == Some(0) {
            return out;
        }
        let _ = self.search(patterns, &Binding::new(), &mut |binding| {
            out.push(binding);
            match limit {
                Some(n) if out.len() >= n => ControlFlow::Break(()),
                _ => ControlFlow::Continue(()),
            }
        });
        out
    }

    fn search(
        &self,
        patterns: &[TriplePattern],
        binding: &Binding,
        emit: &mut dyn FnMut(Binding) -> ControlFlow<()>,
    ) -> ControlFlow<()> {
        let Some((first, rest)) = patterns.split_first() else {
            return emit(binding.clone());
        };
        let pattern = first.substitute(binding);
        for triple in self.store.matches(&pattern) {
            if let Some(extended) = binding.extend(&pattern, triple) {
                if self.search(rest, &extended, emit).is_break() {
                    return ControlFlow::Break(());
                }
            }
        }
        ControlFlow::Continue(())
    }
}
