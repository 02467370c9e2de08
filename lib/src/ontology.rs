//! Helpers that write OWL/RDFS modelling statements as plain triples.
//!
//! Nothing here reasons over what it writes: a restriction added with
//! [`Ontology::add_max_cardinality_restriction`] is just four triples until
//! [`crate::doctor::MaxCardinality`] is run over the store.

use crate::consts::{
    CLASS, MAX_CARDINALITY, ON_PROPERTY, PROPERTY, RESTRICTION, RESTRICTION_IRI_PREFIX,
    SUB_CLASS_OF, TYPE, XSD_NON_NEGATIVE_INTEGER,
};
use crate::store::TripleStore;
use crate::term::{Iri, Literal, Node};
use crate::triple::{Triple, TriplePattern};
use log::debug;

pub struct Ontology<'a> {
    store: &'a mut TripleStore,
}

impl<'a> Ontology<'a> {
    pub fn new(store: &'a mut TripleStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &TripleStore {
        self.store
    }

    /// `class rdf:type owl:Class`
    pub fn create_class(&mut self, class: &Iri) -> &mut Self {
        self.add(class.clone(), Iri::new_unchecked(TYPE), Iri::new_unchecked(CLASS));
        self
    }

    /// `child rdfs:subClassOf parent`
    pub fn add_subclass(&mut self, parent: &Iri, child: &Iri) -> &mut Self {
        self.add(child.clone(), Iri::new_unchecked(SUB_CLASS_OF), parent.clone());
        self
    }

    /// `property rdf:type rdf:Property`
    pub fn create_property(&mut self, property: &Iri) -> &mut Self {
        self.add(
            property.clone(),
            Iri::new_unchecked(TYPE),
            Iri::new_unchecked(PROPERTY),
        );
        self
    }

    pub fn add_property(
        &mut self,
        subject: &Iri,
        property: &Iri,
        object: impl Into<Node>,
    ) -> &mut Self {
        self.add(subject.clone(), property.clone(), object);
        self
    }

    /// Records that instances of `class` have at most `max` values for
    /// `property`. The restriction gets a freshly minted IRI, which is
    /// returned.
    pub fn add_max_cardinality_restriction(
        &mut self,
        class: &Iri,
        property: &Iri,
        max: u64,
    ) -> Iri {
        let restriction = self.mint_restriction_iri();
        self.add(
            restriction.clone(),
            Iri::new_unchecked(TYPE),
            Iri::new_unchecked(RESTRICTION),
        );
        self.add(
            restriction.clone(),
            Iri::new_unchecked(ON_PROPERTY),
            property.clone(),
        );
        self.add(
            restriction.clone(),
            Iri::new_unchecked(MAX_CARDINALITY),
            Literal::typed(max.to_string(), Iri::new_unchecked(XSD_NON_NEGATIVE_INTEGER)),
        );
        self.add_subclass(&restriction, class);
        debug!(
            "Restricted {} to at most {} values of {} via {}",
            class, max, property, restriction
        );
        restriction
    }

    /// Direct `rdfs:subClassOf` children of `parent`, in insertion order.
    pub fn subclasses(&self, parent: &Iri) -> Vec<Iri> {
        self.store
            .matches(&TriplePattern::referencing(parent))
            .filter(|t| t.predicate().as_str() == SUB_CLASS_OF)
            .map(|t| t.subject().clone())
            .collect()
    }

    fn add(&mut self, subject: Iri, predicate: Iri, object: impl Into<Node>) {
        self.store.insert(Triple::new(subject, predicate, object));
    }

    // Restriction IRIs are numbered from 1; skip any number already in use
    // as a subject so that reopening a saved store never reuses one.
    fn mint_restriction_iri(&self) -> Iri {
        let mut k = 1usize;
        loop {
            let candidate = Iri::new_unchecked(format!("{}{}", RESTRICTION_IRI_PREFIX, k));
            if self
                .store
                .matches(&TriplePattern::about(&candidate))
                .next()
                .is_none()
            {
                return candidate;
            }
            k += 1;
        }
    }
}
