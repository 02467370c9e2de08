use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn tristore(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tristore"))
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .env_remove("TRISTORE_LOG")
        .args(args)
        .output()
        .expect("run tristore")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn assert_ok(out: &Output) {
    assert!(
        out.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
}

fn init_project() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let out = tristore(dir.path(), &["init", "--base", "http://domain/myproject#"]);
    assert_ok(&out);
    dir
}

fn store_path(dir: &TempDir) -> PathBuf {
    dir.path().join("store.triples")
}

#[test]
fn init_writes_config_and_store() {
    let dir = init_project();
    assert!(dir.path().join("tristore.json").exists());
    assert!(store_path(&dir).exists());
    let again = tristore(dir.path(), &["init"]);
    assert!(!again.status.success(), "init must not overwrite silently");
    assert_ok(&tristore(dir.path(), &["init", "--overwrite"]));
}

#[test]
fn insert_ask_select_describe() {
    let dir = init_project();
    assert_ok(&tristore(dir.path(), &["insert", "Bob", "hasOccupation", "SoftwareEngineer"]));
    assert_ok(&tristore(dir.path(), &["insert", "Bob", "hasAge", "\"33\"^^xsd:integer"]));
    let dup = tristore(dir.path(), &["insert", "Bob", "hasAge", "\"33\"^^xsd:integer"]);
    assert_ok(&dup);
    assert!(stdout(&dup).contains("already present"));

    let text = fs::read_to_string(store_path(&dir)).unwrap();
    assert_eq!(text.lines().count(), 2);

    let ask = tristore(dir.path(), &["ask", "?s ?p ?o"]);
    assert_ok(&ask);
    assert_eq!(stdout(&ask).trim(), "ASK Result: true");

    let select = tristore(dir.path(), &["select", "?subject ?predicate ?object", "--limit", "10"]);
    assert_ok(&select);
    assert!(stdout(&select).starts_with("Amount of rows found: 2"));

    let json = tristore(
        dir.path(),
        &["select", "?s hasAge ?age", "--vars", "?age", "--json"],
    );
    assert_ok(&json);
    let rows: serde_json::Value = serde_json::from_str(&stdout(&json)).unwrap();
    assert_eq!(rows[0]["age"]["value"], "33");
    assert!(rows[0].get("s").is_none());

    let describe = tristore(dir.path(), &["describe", "Bob"]);
    assert_ok(&describe);
    assert_eq!(stdout(&describe), text);
}

#[test]
fn unknown_projected_variable_fails() {
    let dir = init_project();
    assert_ok(&tristore(dir.path(), &["insert", "Bob", "hasAge", "\"33\"^^xsd:integer"]));
    let out = tristore(dir.path(), &["select", "?s ?p ?o", "--vars", "?missing"]);
    assert!(!out.status.success());
}

#[test]
fn corrupt_store_reports_line() {
    let dir = init_project();
    fs::write(store_path(&dir), "<http://s> <http://p> <http://o>\n<http://s> \"p\" <http://o>\n").unwrap();
    let out = tristore(dir.path(), &["dump"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("line 2"));
}

#[test]
fn check_fails_in_strict_mode() {
    let dir = init_project();
    assert_ok(&tristore(dir.path(), &["insert", "Bob", "hasAge", "\"old\"^^xsd:integer"]));
    let lenient = tristore(dir.path(), &["check"]);
    assert_ok(&lenient);
    assert!(stdout(&lenient).contains("[Integer Literals]"));

    let config = dir.path().join("tristore.json");
    let mut json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&config).unwrap()).unwrap();
    json["strict"] = serde_json::Value::Bool(true);
    fs::write(&config, serde_json::to_string_pretty(&json).unwrap()).unwrap();
    let strict = tristore(dir.path(), &["check"]);
    assert!(!strict.status.success());
}

#[test]
fn import_and_export_turtle() {
    let dir = init_project();
    let data = dir.path().join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(
        data.join("animals.ttl"),
        "@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .\n\
         <http://example#Mammal> rdfs:subClassOf <http://example#Animal> .\n\
         <http://example#Fish> rdfs:subClassOf <http://example#Animal> .\n",
    )
    .unwrap();
    let out = tristore(dir.path(), &["import", "data"]);
    assert_ok(&out);
    assert!(stdout(&out).contains("Imported 2 new triples from 1 file(s)"));

    let ask = tristore(dir.path(), &["ask", "?c rdfs:subClassOf <http://example#Animal>"]);
    assert_eq!(stdout(&ask).trim(), "ASK Result: true");

    let export = tristore(dir.path(), &["export", "--format", "ntriples"]);
    assert_ok(&export);
    assert_eq!(stdout(&export).lines().count(), 2);
}

#[test]
fn data_flag_overrides_config() {
    let dir = tempfile::tempdir().unwrap();
    let out = tristore(
        dir.path(),
        &["--data", "other.triples", "insert", "<http://s>", "<http://p>", "\"v\""],
    );
    assert_ok(&out);
    assert!(dir.path().join("other.triples").exists());
    assert!(!dir.path().join("store.triples").exists());
}

#[test]
fn version_prints_name() {
    let dir = tempfile::tempdir().unwrap();
    let out = tristore(dir.path(), &["version"]);
    assert_ok(&out);
    assert!(stdout(&out).starts_with("tristore "));
}
