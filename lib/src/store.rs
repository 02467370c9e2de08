//! In-memory, append-only triple store.
//!
//! Triples are kept once each, in insertion order, with three posting lists
//! (by subject, by predicate and by object) pointing back into that order.
//! Pattern lookups pick the posting list of the first bound position and
//! only fall back to a full scan when nothing is bound.

use crate::triple::{exact_object, Triple, TriplePattern};
use crate::term::{Iri, Node, Term};
use indexmap::IndexSet;
use log::debug;
use std::collections::HashMap;
use std::iter::FusedIterator;
use std::ops::Range;
use std::slice;

/// Which access path [`TripleStore::matches`] uses for a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPath {
    Subject,
    Predicate,
    Object,
    FullScan,
}

#[derive(Debug, Clone, Default)]
pub struct TripleStore {
    triples: IndexSet<Triple>,
    by_subject: HashMap<Iri, Vec<usize>>,
    by_predicate: HashMap<Iri, Vec<usize>>,
    by_object: HashMap<Node, Vec<usize>>,
}

impl TripleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `triple` to the store and its indexes. Returns `false`, and
    /// changes nothing, when an identical triple is already stored.
    pub fn insert(&mut self, triple: Triple) -> bool {
        if self.triples.contains(&triple) {
            return false;
        }
        let pos = self.triples.len();
        self.by_subject
            .entry(triple.subject().clone())
            .or_default()
            .push(pos);
        self.by_predicate
            .entry(triple.predicate().clone())
            .or_default()
            .push(pos);
        self.by_object
            .entry(triple.object().clone())
            .or_default()
            .push(pos);
        self.triples.insert(triple);
        true
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Every stored triple, in insertion order.
    pub fn all(&self) -> indexmap::set::Iter<'_, Triple> {
        self.triples.iter()
    }

    /// Stored triples matching `pattern`, in insertion order.
    ///
    /// The returned iterator is lazy and `Clone`, so a search can be
    /// restarted from the beginning without touching the store again.
    pub fn matches(&self, pattern: &TriplePattern) -> Matches<'_> {
        let source = match self.access_path(pattern) {
            AccessPath::FullScan => Source::Scan(0..self.triples.len()),
            AccessPath::Subject => self.postings(match pattern.subject() {
                Term::Iri(iri) => self.by_subject.get(iri),
                _ => None,
            }),
            AccessPath::Predicate => self.postings(match pattern.predicate() {
                Term::Iri(iri) => self.by_predicate.get(iri),
                _ => None,
            }),
            AccessPath::Object => self.postings(
                exact_object(pattern.object()).and_then(|key| self.by_object.get(&key)),
            ),
        };
        Matches {
            store: self,
            pattern: pattern.clone(),
            source,
        }
    }

    /// The index chosen for `pattern`: subject if bound, else predicate,
    /// else an exactly keyed object, else a full scan.
    pub fn access_path(&self, pattern: &TriplePattern) -> AccessPath {
        if matches!(pattern.subject(), Term::Iri(_)) {
            AccessPath::Subject
        } else if matches!(pattern.predicate(), Term::Iri(_)) {
            AccessPath::Predicate
        } else if exact_object(pattern.object()).is_some() {
            AccessPath::Object
        } else {
            AccessPath::FullScan
        }
    }

    fn postings<'a>(&'a self, list: Option<&'a Vec<usize>>) -> Source<'a> {
        match list {
            Some(list) => Source::Postings(list.iter()),
            None => Source::Empty,
        }
    }
}

impl Extend<Triple> for TripleStore {
    fn extend<I: IntoIterator<Item = Triple>>(&mut self, iter: I) {
        let before = self.len();
        for triple in iter {
            self.insert(triple);
        }
        debug!("Added {} new triples to store", self.len() - before);
    }
}

impl FromIterator<Triple> for TripleStore {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        let mut store = TripleStore::new();
        store.extend(iter);
        store
    }
}

impl<'a> IntoIterator for &'a TripleStore {
    type Item = &'a Triple;
    type IntoIter = indexmap::set::Iter<'a, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.all()
    }
}

/// Two stores are equal when they hold the same triples, regardless of order.
impl PartialEq for TripleStore {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.all().all(|t| other.contains(t))
    }
}

impl Eq for TripleStore {}

#[derive(Debug, Clone)]
enum Source<'a> {
    Scan(Range<usize>),
    Postings(slice::Iter<'a, usize>),
    Empty,
}

/// Lazy iterator returned by [`TripleStore::matches`].
#[derive(Debug, Clone)]
pub struct Matches<'a> {
    store: &'a TripleStore,
    pattern: TriplePattern,
    source: Source<'a>,
}

impl<'a> Iterator for Matches<'a> {
    type Item = &'a Triple;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let pos = match &mut self.source {
                Source::Scan(range) => range.next()?,
                Source::Postings(iter) => *iter.next()?,
                Source::Empty => return None,
            };
            let triple = self.store.triples.get_index(pos)?;
            if self.pattern.matches(triple) {
                return Some(triple);
            }
        }
    }
}

impl FusedIterator for Matches<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Literal;

    fn iri(s: &str) -> Iri {
        Iri::new(format!("http://domain/myproject#{}", s)).unwrap()
    }

    fn bob_store() -> TripleStore {
        let mut store = TripleStore::new();
        store.insert(Triple::new(
            iri("Bob"),
            iri("hasOccupation"),
            iri("SoftwareEngineer"),
        ));
        store.insert(Triple::new(iri("Bob"), iri("hasAge"), Literal::integer(33)));
        store.insert(Triple::new(iri("Alice"), iri("hasAge"), Literal::integer(41)));
        store
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut store = bob_store();
        let again = Triple::new(iri("Bob"), iri("hasAge"), Literal::integer(33));
        assert!(!store.insert(again.clone()));
        assert_eq!(store.len(), 3);
        assert!(store.contains(&again));
        let order: Vec<_> = store.all().map(|t| t.subject().clone()).collect();
        assert_eq!(order, vec![iri("Bob"), iri("Bob"), iri("Alice")]);
    }

    #[test]
    fn test_access_paths() {
        let store = bob_store();
        let var = || Term::var("x").unwrap();
        let by_s = TriplePattern::new(iri("Bob"), var(), var()).unwrap();
        let by_p = TriplePattern::new(var(), iri("hasAge"), var()).unwrap();
        let by_o = TriplePattern::new(var(), var(), Literal::integer(41)).unwrap();
        let plain = TriplePattern::new(var(), var(), Literal::plain("41")).unwrap();
        assert_eq!(store.access_path(&by_s), AccessPath::Subject);
        assert_eq!(store.access_path(&by_p), AccessPath::Predicate);
        assert_eq!(store.access_path(&by_o), AccessPath::Object);
        assert_eq!(store.access_path(&plain), AccessPath::FullScan);
        assert_eq!(store.access_path(&TriplePattern::any()), AccessPath::FullScan);
    }

    #[test]
    fn test_matches_in_insertion_order() {
        let store = bob_store();
        let pattern =
            TriplePattern::new(Term::var("s").unwrap(), iri("hasAge"), Term::var("o").unwrap())
                .unwrap();
        let subjects: Vec<_> = store.matches(&pattern).map(|t| t.subject().clone()).collect();
        assert_eq!(subjects, vec![iri("Bob"), iri("Alice")]);

        let plain = TriplePattern::new(
            Term::var("s").unwrap(),
            Term::var("p").unwrap(),
            Literal::plain("41"),
        )
        .unwrap();
        assert_eq!(store.matches(&plain).count(), 1);

        let missing = TriplePattern::new(iri("Carol"), Term::var("p").unwrap(), Term::var("o").unwrap())
            .unwrap();
        assert_eq!(store.matches(&missing).count(), 0);
    }

    #[test]
    fn test_matches_is_restartable() {
        let store = bob_store();
        let it = store.matches(&TriplePattern::any());
        let first: Vec<_> = it.clone().collect();
        let second: Vec<_> = it.collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn test_match_agrees_with_full_scan() {
        let store = bob_store();
        let var = |name: &str| Term::var(name).unwrap();
        for triple in store.all() {
            let patterns = [
                TriplePattern::new(Term::from(triple.subject().clone()), var("p"), var("o")),
                TriplePattern::new(var("s"), Term::from(triple.predicate().clone()), var("o")),
                TriplePattern::new(var("s"), var("p"), Term::from(triple.object().clone())),
                TriplePattern::new(
                    Term::from(triple.subject().clone()),
                    Term::from(triple.predicate().clone()),
                    Term::from(triple.object().clone()),
                ),
            ];
            for pattern in patterns {
                let pattern = pattern.unwrap();
                let indexed: Vec<_> = store.matches(&pattern).collect();
                let scanned: Vec<_> = store.all().filter(|t| pattern.matches(t)).collect();
                assert!(!indexed.is_empty());
                assert_eq!(indexed, scanned);
            }
        }
    }

    #[test]
    fn test_store_equality_ignores_order() {
        let a = bob_store();
        let b: TripleStore = a.all().rev().cloned().collect();
        assert_eq!(a, b);
    }
}
