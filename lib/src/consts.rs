//! IRIs for the handful of RDF, RDFS, OWL and XSD terms the ontology helpers
//! and the validation checks rely on.

// rdf
pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const PROPERTY: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#Property";
// rdfs
pub const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const SUB_CLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
// owl
pub const OWL_NS: &str = "http://www.w3.org/2002/07/owl#";
pub const CLASS: &str = "http://www.w3.org/2002/07/owl#Class";
pub const RESTRICTION: &str = "http://www.w3.org/2002/07/owl#Restriction";
pub const ON_PROPERTY: &str = "http://www.w3.org/2002/07/owl#onProperty";
pub const MAX_CARDINALITY: &str = "http://www.w3.org/2002/07/owl#maxCardinality";
// xsd
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";
pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
pub const XSD_NON_NEGATIVE_INTEGER: &str =
    "http://www.w3.org/2001/XMLSchema#nonNegativeInteger";

/// Prefixes every [`crate::namespace::Namespaces`] starts with.
pub const WELL_KNOWN_PREFIXES: [(&str, &str); 4] = [
    ("rdf", RDF_NS),
    ("rdfs", RDFS_NS),
    ("owl", OWL_NS),
    ("xsd", XSD_NS),
];

/// Scheme used when minting IRIs for restrictions, which the store cannot
/// hold as blank nodes.
pub const RESTRICTION_IRI_PREFIX: &str = "urn:tristore:restriction:";
