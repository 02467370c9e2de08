//! Triples and triple patterns.

use crate::errors::ValidationError;
use crate::query::Binding;
use crate::term::{Iri, Node, Term, Variable};
use std::fmt;

/// A stored statement. Subject and predicate are always IRIs and the object
/// is an IRI or a literal; variables cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Triple {
    subject: Iri,
    predicate: Iri,
    object: Node,
}

impl Triple {
    pub fn new(subject: Iri, predicate: Iri, object: impl Into<Node>) -> Self {
        Self {
            subject,
            predicate,
            object: object.into(),
        }
    }

    /// Builds a triple from general terms, rejecting variables anywhere and
    /// literals in the subject or predicate position.
    pub fn from_terms(subject: Term, predicate: Term, object: Term) -> Result<Self, ValidationError> {
        let subject = match subject {
            Term::Iri(iri) => iri,
            Term::Literal(_) => return Err(ValidationError::LiteralInSubject),
            Term::Variable(v) => return Err(ValidationError::UnexpectedVariable(v.name().into())),
        };
        let predicate = match predicate {
            Term::Iri(iri) => iri,
            Term::Literal(_) => return Err(ValidationError::LiteralInPredicate),
            Term::Variable(v) => return Err(ValidationError::UnexpectedVariable(v.name().into())),
        };
        Ok(Self {
            subject,
            predicate,
            object: Node::try_from(object)?,
        })
    }

    pub fn subject(&self) -> &Iri {
        &self.subject
    }

    pub fn predicate(&self) -> &Iri {
        &self.predicate
    }

    pub fn object(&self) -> &Node {
        &self.object
    }

    pub fn into_parts(self) -> (Iri, Iri, Node) {
        (self.subject, self.predicate, self.object)
    }
}

/// The line form used by [`crate::codec`]: `<s> <p> <o>` or `<s> <p> "lit"^^<dt>`.
impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)
    }
}

/// A triple whose positions may be variables. Only used as query input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TriplePattern {
    subject: Term,
    predicate: Term,
    object: Term,
}

impl TriplePattern {
    pub fn new(
        subject: impl Into<Term>,
        predicate: impl Into<Term>,
        object: impl Into<Term>,
    ) -> Result<Self, ValidationError> {
        let subject = subject.into();
        let predicate = predicate.into();
        if matches!(subject, Term::Literal(_)) {
            return Err(ValidationError::InvalidPattern(
                "literal in subject position".to_string(),
            ));
        }
        if matches!(predicate, Term::Literal(_)) {
            return Err(ValidationError::InvalidPattern(
                "literal in predicate position".to_string(),
            ));
        }
        Ok(Self {
            subject,
            predicate,
            object: object.into(),
        })
    }

    /// `(?s, ?p, ?o)`
    pub fn any() -> Self {
        Self {
            subject: Term::Variable(Variable::new_unchecked("s")),
            predicate: Term::Variable(Variable::new_unchecked("p")),
            object: Term::Variable(Variable::new_unchecked("o")),
        }
    }

    /// `(<iri>, ?p, ?o)`
    pub fn about(iri: &Iri) -> Self {
        Self {
            subject: Term::Iri(iri.clone()),
            predicate: Term::Variable(Variable::new_unchecked("p")),
            object: Term::Variable(Variable::new_unchecked("o")),
        }
    }

    /// `(?s, ?p, <iri>)`
    pub fn referencing(iri: &Iri) -> Self {
        Self {
            subject: Term::Variable(Variable::new_unchecked("s")),
            predicate: Term::Variable(Variable::new_unchecked("p")),
            object: Term::Iri(iri.clone()),
        }
    }

    pub fn subject(&self) -> &Term {
        &self.subject
    }

    pub fn predicate(&self) -> &Term {
        &self.predicate
    }

    pub fn object(&self) -> &Term {
        &self.object
    }

    /// True iff every bound position equals the corresponding position of
    /// `triple`. Variables match anything.
    pub fn matches(&self, triple: &Triple) -> bool {
        iri_position_matches(&self.subject, triple.subject())
            && iri_position_matches(&self.predicate, triple.predicate())
            && object_matches(&self.object, triple.object())
    }

    /// Variables in subject, predicate, object order. A variable used twice is
    /// yielded twice.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        [&self.subject, &self.predicate, &self.object]
            .into_iter()
            .filter_map(Term::as_variable)
    }

    pub fn is_ground(&self) -> bool {
        self.variables().next().is_none()
    }

    /// Replaces every variable bound in `binding` with its value.
    pub fn substitute(&self, binding: &Binding) -> TriplePattern {
        let resolve = |term: &Term| match term {
            Term::Variable(v) => binding
                .get(v.name())
                .cloned()
                .map(Term::from)
                .unwrap_or_else(|| term.clone()),
            other => other.clone(),
        };
        TriplePattern {
            subject: resolve(&self.subject),
            predicate: resolve(&self.predicate),
            object: resolve(&self.object),
        }
    }
}

fn iri_position_matches(pattern: &Term, stored: &Iri) -> bool {
    match pattern {
        Term::Variable(_) => true,
        Term::Iri(iri) => iri == stored,
        Term::Literal(_) => false,
    }
}

fn object_matches(pattern: &Term, stored: &Node) -> bool {
    match (pattern, stored) {
        (Term::Variable(_), _) => true,
        (Term::Iri(iri), Node::Iri(stored)) => iri == stored,
        (Term::Literal(lit), Node::Literal(stored)) => lit.matches(stored),
        _ => false,
    }
}

impl From<&Triple> for TriplePattern {
    fn from(triple: &Triple) -> Self {
        Self {
            subject: Term::Iri(triple.subject.clone()),
            predicate: Term::Iri(triple.predicate.clone()),
            object: triple.object.clone().into(),
        }
    }
}

impl From<Triple> for TriplePattern {
    fn from(triple: Triple) -> Self {
        let (s, p, o) = triple.into_parts();
        Self {
            subject: Term::Iri(s),
            predicate: Term::Iri(p),
            object: o.into(),
        }
    }
}

impl fmt::Display for TriplePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)
    }
}

/// The stored-object key used by the object index: `None` for literals
/// without a datatype in a pattern, since those match several stored keys.
pub(crate) fn exact_object(term: &Term) -> Option<Node> {
    match term {
        Term::Iri(iri) => Some(Node::Iri(iri.clone())),
        Term::Literal(lit) if lit.datatype().is_some() => Some(Node::Literal(lit.clone())),
        Term::Literal(_) | Term::Variable(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Literal;

    fn iri(s: &str) -> Iri {
        Iri::new(s).unwrap()
    }

    #[test]
    fn test_from_terms_rejects_variables_and_literal_subjects() {
        let lit = Term::Literal(Literal::plain("x"));
        let err = Triple::from_terms(lit.clone(), Term::iri("http://p").unwrap(), lit.clone());
        assert_eq!(err.unwrap_err(), ValidationError::LiteralInSubject);
        let err = Triple::from_terms(
            Term::iri("http://s").unwrap(),
            Term::iri("http://p").unwrap(),
            Term::var("o").unwrap(),
        );
        assert_eq!(
            err.unwrap_err(),
            ValidationError::UnexpectedVariable("o".into())
        );
    }

    #[test]
    fn test_pattern_variables_are_always_named() {
        assert!(matches!(
            Term::var(""),
            Err(ValidationError::InvalidPattern(_))
        ));
        assert!(matches!(
            Term::var("a b"),
            Err(ValidationError::InvalidVariable(_))
        ));
        let s = Iri::new("http://s").unwrap();
        for pattern in [
            TriplePattern::any(),
            TriplePattern::about(&s),
            TriplePattern::referencing(&s),
        ] {
            for v in pattern.variables() {
                assert_eq!(Variable::new(v.to_string()).unwrap(), *v);
            }
        }
    }

    #[test]
    fn test_pattern_rejects_literal_predicate() {
        let err = TriplePattern::new(
            Term::var("s").unwrap(),
            Literal::plain("p"),
            Term::var("o").unwrap(),
        );
        assert!(matches!(err, Err(ValidationError::InvalidPattern(_))));
    }

    #[test]
    fn test_pattern_matches_bound_fields() {
        let t = Triple::new(iri("http://s"), iri("http://p"), Literal::integer(33));
        assert!(TriplePattern::any().matches(&t));
        let p = TriplePattern::new(iri("http://s"), Term::var("p").unwrap(), Literal::plain("33"))
            .unwrap();
        assert!(p.matches(&t));
        let p = TriplePattern::new(iri("http://other"), Term::var("p").unwrap(), Term::var("o").unwrap())
            .unwrap();
        assert!(!p.matches(&t));
        assert!(TriplePattern::from(&t).matches(&t));
        assert!(TriplePattern::from(&t).is_ground());
    }

    #[test]
    fn test_substitute_binds_known_variables() {
        let mut binding = Binding::new();
        binding.insert("s", Node::Iri(iri("http://s")));
        let p = TriplePattern::any().substitute(&binding);
        assert_eq!(p.subject(), &Term::Iri(iri("http://s")));
        assert!(p.predicate().is_variable());
        assert_eq!(p.variables().count(), 2);
    }
}
