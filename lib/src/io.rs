//! Reading and writing stores on disk.
//!
//! The line format from [`crate::codec`] is always available. With the
//! `oxigraph` feature, stores can also be converted to and from oxigraph
//! graphs, which is how Turtle, N-Triples and RDF/XML files are imported
//! and exported.

use crate::codec;
use crate::errors::Result;
use crate::store::TripleStore;
use log::{debug, info};
use std::fs;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions [`find_rdf_files`] picks up.
pub const RDF_EXTENSIONS: [&str; 6] = ["ttl", "n3", "nt", "xml", "rdf", "owl"];

pub fn read_store(path: &Path) -> Result<TripleStore> {
    debug!("Reading store from {}", path.display());
    let file = fs::File::open(path)?;
    let store = codec::read_from(BufReader::new(file))?;
    info!("Loaded {} triples from {}", store.len(), path.display());
    Ok(store)
}

/// Writes `store` in the line format. The file is written next to `path`
/// first and then renamed over it, so readers never see a partial store.
pub fn write_store(store: &TripleStore, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = staging_path(path);
    {
        let file = fs::File::create(&tmp_path)?;
        codec::write_to(store, BufWriter::new(file))?;
    }
    fs::rename(&tmp_path, path)?;
    info!("Wrote {} triples to {}", store.len(), path.display());
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Files under `root` (or `root` itself) whose extension is one of
/// [`RDF_EXTENSIONS`], sorted by path.
pub fn find_rdf_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| RDF_EXTENSIONS.contains(&ext))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    files
}

#[cfg(feature = "oxigraph")]
pub use self::rdf::*;

#[cfg(feature = "oxigraph")]
mod rdf {
    use super::staging_path;
    use crate::errors::{Error, Result};
    use crate::store::TripleStore;
    use crate::term::{Iri, Literal, Node};
    use crate::triple::Triple;
    use log::{debug, info, warn};
    use oxigraph::io::{RdfFormat, RdfParser, RdfSerializer};
    use oxigraph::model::vocab::xsd;
    use oxigraph::model::{
        BlankNode, Graph, Literal as OxLiteral, NamedNode, NamedOrBlankNode, NamedOrBlankNodeRef,
        Term as OxTerm, TermRef, Triple as OxTriple, TripleRef,
    };
    use std::fs;
    use std::io::BufReader;
    use std::path::Path;

    const BLANK_NODE_PREFIX: &str = "_:";

    fn rdf_err(e: impl std::fmt::Display) -> Error {
        Error::Rdf(e.to_string())
    }

    /// Turtle for `.ttl`/`.n3`, N-Triples for `.nt`, RDF/XML for
    /// `.xml`/`.rdf`/`.owl`; anything else is read as Turtle.
    pub fn rdf_format_for_path(path: &Path) -> RdfFormat {
        let ext = path.extension().and_then(|ext| ext.to_str());
        ext.and_then(|ext| match ext {
            "ttl" | "n3" => Some(RdfFormat::Turtle),
            "nt" => Some(RdfFormat::NTriples),
            "xml" | "rdf" | "owl" => Some(RdfFormat::RdfXml),
            _ => None,
        })
        .unwrap_or(RdfFormat::Turtle)
    }

    pub fn rdf_format_from_name(name: &str) -> Result<RdfFormat> {
        match name.to_ascii_lowercase().as_str() {
            "turtle" | "ttl" => Ok(RdfFormat::Turtle),
            "ntriples" | "nt" => Ok(RdfFormat::NTriples),
            "rdfxml" | "xml" => Ok(RdfFormat::RdfXml),
            other => Err(Error::Rdf(format!(
                "Unsupported format '{}'. Use one of: turtle, ntriples, rdfxml",
                other
            ))),
        }
    }

    pub fn read_rdf_file(path: &Path) -> Result<TripleStore> {
        read_rdf_file_as(path, rdf_format_for_path(path))
    }

    pub fn read_rdf_file_as(path: &Path, format: RdfFormat) -> Result<TripleStore> {
        debug!("Reading {} as {:?}", path.display(), format);
        let file = fs::File::open(path)?;
        let parser = RdfParser::from_format(format).for_reader(BufReader::new(file));
        let mut store = TripleStore::new();
        for quad in parser {
            let quad = quad.map_err(rdf_err)?;
            let triple = OxTriple::new(quad.subject, quad.predicate, quad.object);
            store.insert(from_oxigraph_triple(triple.as_ref())?);
        }
        info!("Imported {} triples from {}", store.len(), path.display());
        Ok(store)
    }

    pub fn write_rdf_file(store: &TripleStore, path: &Path, format: RdfFormat) -> Result<()> {
        let graph = to_oxigraph_graph(store)?;
        let tmp_path = staging_path(path);
        {
            let mut file = fs::File::create(&tmp_path)?;
            let mut serializer = RdfSerializer::from_format(format).for_writer(&mut file);
            for t in graph.iter() {
                serializer.serialize_triple(t)?;
            }
            serializer.finish()?;
        }
        fs::rename(&tmp_path, path)?;
        info!(
            "Exported {} triples to {} as {:?}",
            graph.len(),
            path.display(),
            format
        );
        Ok(())
    }

    /// IRIs of the form `_:label` become blank nodes.
    pub fn to_oxigraph_graph(store: &TripleStore) -> Result<Graph> {
        let mut graph = Graph::new();
        for triple in store {
            graph.insert(&to_oxigraph_triple(triple)?);
        }
        Ok(graph)
    }

    /// Blank nodes become `_:label` IRIs. Language tags are dropped.
    pub fn from_oxigraph_graph(graph: &Graph) -> Result<TripleStore> {
        let mut store = TripleStore::new();
        for t in graph.iter() {
            store.insert(from_oxigraph_triple(t)?);
        }
        Ok(store)
    }

    fn resource(iri: &Iri) -> Result<NamedOrBlankNode> {
        match iri.as_str().strip_prefix(BLANK_NODE_PREFIX) {
            Some(label) => BlankNode::new(label).map(Into::into).map_err(rdf_err),
            None => NamedNode::new(iri.as_str())
                .map(Into::into)
                .map_err(rdf_err),
        }
    }

    pub fn to_oxigraph_triple(triple: &Triple) -> Result<OxTriple> {
        let subject = resource(triple.subject())?;
        let predicate = NamedNode::new(triple.predicate().as_str()).map_err(rdf_err)?;
        let object: OxTerm = match triple.object() {
            Node::Iri(iri) => resource(iri)?.into(),
            Node::Literal(lit) => match lit.datatype() {
                None => OxLiteral::new_simple_literal(lit.value()).into(),
                Some(dt) => {
                    let dt = NamedNode::new(dt.as_str()).map_err(rdf_err)?;
                    OxLiteral::new_typed_literal(lit.value(), dt).into()
                }
            },
        };
        Ok(OxTriple::new(subject, predicate, object))
    }

    fn resource_iri(node: NamedOrBlankNodeRef<'_>) -> Result<Iri> {
        let iri = match node {
            NamedOrBlankNodeRef::NamedNode(n) => Iri::new(n.as_str())?,
            NamedOrBlankNodeRef::BlankNode(b) => Iri::new(format!("{}{}", BLANK_NODE_PREFIX, b.as_str()))?,
        };
        Ok(iri)
    }

    pub fn from_oxigraph_triple(t: TripleRef<'_>) -> Result<Triple> {
        let subject = resource_iri(t.subject)?;
        let predicate = Iri::new(t.predicate.as_str())?;
        let object = match t.object {
            TermRef::NamedNode(n) => Node::Iri(Iri::new(n.as_str())?),
            TermRef::BlankNode(b) => Node::Iri(Iri::new(format!("{}{}", BLANK_NODE_PREFIX, b.as_str()))?),
            TermRef::Literal(l) => {
                if let Some(lang) = l.language() {
                    warn!("Dropping language tag @{} from \"{}\"", lang, l.value());
                    Node::Literal(Literal::plain(l.value()))
                } else if l.datatype() == xsd::STRING {
                    Node::Literal(Literal::plain(l.value()))
                } else {
                    Node::Literal(Literal::typed(l.value(), Iri::new(l.datatype().as_str())?))
                }
            }
            _ => return Err(Error::Rdf(format!("unsupported object term {}", t.object))),
        };
        Ok(Triple::new(subject, predicate, object))
    }
}
