#![cfg(feature = "oxigraph")]

use std::fs;
use tempfile::tempdir;
use tristore::io::{
    from_oxigraph_graph, read_rdf_file, to_oxigraph_graph, write_rdf_file, write_store,
    read_store,
};
use tristore::{Iri, Literal, Node, QueryEngine, Triple, TripleStore};

const TURTLE: &str = r#"
@prefix dc: <http://purl.org/dc/elements/1.1/> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .

<http://www.xml.com/pub/a/2004/09/01/hack-congress.html>
    dc:title "Hacking Congress"@en ;
    dc:creator _:author ;
    dc:date "2004-09-01"^^xsd:date .

_:author dc:name "Someone" .
"#;

const RDF_XML: &str = r#"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:dc="http://purl.org/dc/elements/1.1/">
  <rdf:Description rdf:about="http://www.xml.com/pub/a/2004/09/01/hack-congress.html">
    <dc:subject>Python</dc:subject>
  </rdf:Description>
</rdf:RDF>
"#;

#[test]
fn test_read_turtle_maps_blank_nodes_and_drops_language() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sample.ttl");
    fs::write(&path, TURTLE).unwrap();
    let store = read_rdf_file(&path).unwrap();
    assert_eq!(store.len(), 4);

    let article = Iri::new("http://www.xml.com/pub/a/2004/09/01/hack-congress.html").unwrap();
    let described = QueryEngine::new(&store).describe(&article);
    assert_eq!(described.len(), 3);
    let title = Iri::new("http://purl.org/dc/elements/1.1/title").unwrap();
    assert!(store.contains(&Triple::new(
        article.clone(),
        title,
        Literal::plain("Hacking Congress")
    )));
    let creator = described
        .all()
        .find(|t| t.predicate().as_str().ends_with("creator"))
        .unwrap();
    assert!(creator.object().value().starts_with("_:"));
}

#[test]
fn test_read_rdf_xml() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rdfdata.rdf");
    fs::write(&path, RDF_XML).unwrap();
    let store = read_rdf_file(&path).unwrap();
    assert_eq!(store.len(), 1);
    let t = store.all().next().unwrap();
    assert_eq!(t.object(), &Node::Literal(Literal::plain("Python")));
}

#[test]
fn test_graph_conversion_round_trip() {
    let mut store = TripleStore::new();
    let s = Iri::new("http://domain/myproject#Bob").unwrap();
    store.insert(Triple::new(
        s.clone(),
        Iri::new("http://domain/myproject#hasAge").unwrap(),
        Literal::integer(33),
    ));
    store.insert(Triple::new(
        s,
        Iri::new("http://domain/myproject#knows").unwrap(),
        Iri::new("_:friend").unwrap(),
    ));
    let graph = to_oxigraph_graph(&store).unwrap();
    assert_eq!(graph.len(), 2);
    assert_eq!(from_oxigraph_graph(&graph).unwrap(), store);
}

#[test]
fn test_export_then_import() {
    let dir = tempdir().unwrap();
    let mut store = TripleStore::new();
    store.insert(Triple::new(
        Iri::new("http://example#Mammal").unwrap(),
        Iri::new("http://www.w3.org/2000/01/rdf-schema#subClassOf").unwrap(),
        Iri::new("http://example#Animal").unwrap(),
    ));
    let ttl = dir.path().join("out.ttl");
    write_rdf_file(&store, &ttl, oxigraph::io::RdfFormat::Turtle).unwrap();
    let imported = read_rdf_file(&ttl).unwrap();
    assert_eq!(imported, store);

    let native = dir.path().join("store.triples");
    write_store(&imported, &native).unwrap();
    assert_eq!(read_store(&native).unwrap(), store);
}
