//! A small in-memory RDF triple store.
//!
//! Triples go into a [`TripleStore`], are queried with conjunctive
//! [`TriplePattern`]s through a [`QueryEngine`] (`ask`, `select`,
//! `describe`), and are persisted with the line format in [`codec`].
//!
//! ```
//! use tristore::{Literal, Namespace, QueryEngine, Triple, TriplePattern, TripleStore};
//!
//! let ns = Namespace::new("http://domain/myproject#").unwrap();
//! let mut store = TripleStore::new();
//! store.insert(Triple::new(ns.iri("Bob").unwrap(), ns.iri("hasAge").unwrap(), Literal::integer(33)));
//!
//! let engine = QueryEngine::new(&store);
//! assert!(engine.ask(&[TriplePattern::any()]).unwrap());
//! assert_eq!(engine.describe(&ns.iri("Bob").unwrap()).len(), 1);
//! ```

extern crate derive_builder;

pub mod codec;
pub mod config;
pub mod consts;
pub mod doctor;
pub mod errors;
pub mod io;
pub mod namespace;
pub mod ontology;
pub mod options;
pub mod query;
pub mod store;
pub mod term;
pub mod triple;

pub use errors::{Error, ParseError, QueryError, Result, ValidationError};
pub use namespace::{Namespace, Namespaces};
pub use ontology::Ontology;
pub use options::{DescribeMode, Overwrite};
pub use query::{Binding, QueryEngine};
pub use store::TripleStore;
pub use term::{Iri, Literal, Node, Term, Variable};
pub use triple::{Triple, TriplePattern};

/// Initializes logging for the tristore library.
///
/// If the `TRISTORE_LOG` environment variable is set, `RUST_LOG` is set to
/// its value, so `TRISTORE_LOG` takes precedence over `RUST_LOG`. The logger
/// itself (e.g. `env_logger::init()`) must be initialized after this call.
pub fn init_logging() {
    if let Ok(log_level) = std::env::var("TRISTORE_LOG") {
        std::env::set_var("RUST_LOG", log_level);
    }
}
