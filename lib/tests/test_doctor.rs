use tristore::consts::TYPE;
use tristore::doctor::{Doctor, MaxCardinality, StoreCheck};
use tristore::{Iri, Literal, Namespace, Ontology, Triple, TripleStore};

fn ex() -> Namespace {
    Namespace::new("http://example#").unwrap()
}

/// The animal ontology with a restriction of at most 2 eyes for mammals.
fn animal_store() -> TripleStore {
    let ns = ex();
    let iri = |local: &str| ns.iri(local).unwrap();
    let mut store = TripleStore::new();
    let mut onto = Ontology::new(&mut store);
    for class in ["Animal", "Mammal", "Fish", "Eye"] {
        onto.create_class(&iri(class));
    }
    onto.add_subclass(&iri("Animal"), &iri("Mammal"))
        .add_subclass(&iri("Animal"), &iri("Fish"))
        .create_property(&iri("hasEyes"))
        .add_property(&iri("Animal"), &iri("hasEyes"), iri("Eye"));
    onto.add_max_cardinality_restriction(&iri("Mammal"), &iri("hasEyes"), 2);
    store
}

fn give_eyes(store: &mut TripleStore, who: &str, class: &str, eyes: usize) {
    let ns = ex();
    let subject = ns.iri(who).unwrap();
    store.insert(Triple::new(
        subject.clone(),
        Iri::new(TYPE).unwrap(),
        ns.iri(class).unwrap(),
    ));
    for i in 0..eyes {
        store.insert(Triple::new(
            subject.clone(),
            ns.iri("hasEyes").unwrap(),
            ns.iri(&format!("{}Eye{}", who, i)).unwrap(),
        ));
    }
}

#[test]
fn test_restriction_is_not_enforced_on_insert() {
    let mut store = animal_store();
    let before = store.len();
    give_eyes(&mut store, "Cat", "Mammal", 3);
    assert_eq!(store.len(), before + 4);
}

#[test]
fn test_max_cardinality_reports_violations() {
    let mut store = animal_store();
    give_eyes(&mut store, "Cat", "Mammal", 2);
    give_eyes(&mut store, "Argus", "Mammal", 3);
    // not a mammal, so unrestricted
    give_eyes(&mut store, "Spider", "Animal", 8);

    let mut problems = Vec::new();
    let mut check = MaxCardinality {};
    check.check(&store, &mut problems).unwrap();
    assert_eq!(problems.len(), 1, "{:?}", problems);
    assert_eq!(problems[0].subject, Some(ex().iri("Argus").unwrap()));
    assert!(problems[0].message.contains("has 3 values"));
}

#[test]
fn test_doctor_runs_default_checks() {
    let mut store = animal_store();
    give_eyes(&mut store, "Argus", "Mammal", 3);
    store.insert(Triple::new(
        ex().iri("Argus").unwrap(),
        ex().iri("age").unwrap(),
        Literal::typed("very old", Iri::new("http://www.w3.org/2001/XMLSchema#integer").unwrap()),
    ));
    let problems = Doctor::with_default_checks().run(&store).unwrap();
    assert_eq!(problems.len(), 2);
    assert_eq!(problems[0].check, "Max Cardinality");
    assert_eq!(problems[1].check, "Integer Literals");

    let clean = animal_store();
    assert!(Doctor::with_default_checks().run(&clean).unwrap().is_empty());
}
