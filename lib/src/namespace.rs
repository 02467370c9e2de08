//! IRI construction by plain string concatenation.
//!
//! There is no prefix resolution logic beyond appending a local name to a
//! namespace string; `Namespaces` just remembers which string goes with
//! which prefix.

use crate::consts::WELL_KNOWN_PREFIXES;
use crate::errors::ValidationError;
use crate::term::Iri;
use std::collections::BTreeMap;

/// A base IRI that local names are appended to.
///
/// ```
/// use tristore::Namespace;
/// let ns = Namespace::new("http://domain/myproject#").unwrap();
/// assert_eq!(ns.iri("Bob").unwrap().as_str(), "http://domain/myproject#Bob");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace(Iri);

impl Namespace {
    pub fn new(base: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self(Iri::new(base)?))
    }

    pub fn iri(&self, local: &str) -> Result<Iri, ValidationError> {
        Iri::new(format!("{}{}", self.0.as_str(), local))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Prefix map used to expand `prefix:local` names, with an optional base
/// for bare local names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Namespaces {
    prefixes: BTreeMap<String, Namespace>,
    base: Option<Namespace>,
}

impl Namespaces {
    /// An empty map: only `<...>` IRIs can be resolved.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with the `rdf`, `rdfs`, `owl` and `xsd` prefixes.
    pub fn with_well_known() -> Self {
        let mut ns = Self::new();
        for (prefix, iri) in WELL_KNOWN_PREFIXES {
            ns.prefixes
                .insert(prefix.to_string(), Namespace(Iri::new_unchecked(iri)));
        }
        ns
    }

    pub fn insert(
        &mut self,
        prefix: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Result<(), ValidationError> {
        self.prefixes
            .insert(prefix.into(), Namespace::new(namespace)?);
        Ok(())
    }

    pub fn set_base(&mut self, base: impl Into<String>) -> Result<(), ValidationError> {
        self.base = Some(Namespace::new(base)?);
        Ok(())
    }

    pub fn base(&self) -> Option<&Namespace> {
        self.base.as_ref()
    }

    pub fn get(&self, prefix: &str) -> Option<&Namespace> {
        self.prefixes.get(prefix)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Namespace)> {
        self.prefixes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Resolves `prefix:local` against a known prefix, and a bare `local`
    /// against the base. Anything else with a `:` is taken as an absolute
    /// IRI as written.
    pub fn expand(&self, name: &str) -> Result<Iri, ValidationError> {
        match name.split_once(':') {
            Some((prefix, local)) => match self.prefixes.get(prefix) {
                Some(ns) => ns.iri(local),
                None => Iri::new(name),
            },
            None => match &self.base {
                Some(base) => base.iri(name),
                None => Err(ValidationError::InvalidIri {
                    iri: name.to_string(),
                    reason: "not a prefixed name and no base is set",
                }),
            },
        }
    }

    /// The shortest `prefix:local` spelling of `iri`, if a prefix applies.
    pub fn compact(&self, iri: &Iri) -> Option<String> {
        self.prefixes
            .iter()
            .filter_map(|(prefix, ns)| {
                iri.as_str()
                    .strip_prefix(ns.as_str())
                    .map(|local| format!("{}:{}", prefix, local))
            })
            .min_by_key(|s| s.len())
    }
}
