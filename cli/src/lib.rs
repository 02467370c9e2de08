use anyhow::{anyhow, Context, Error, Result};
use clap::{Parser, Subcommand};
use log::info;
use oxigraph::io::{RdfFormat, RdfSerializer};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tristore::codec::{parse_pattern, parse_term, serialize};
use tristore::config::{Config, DEFAULT_CONFIG_FILE};
use tristore::doctor::Doctor;
use tristore::io::{
    find_rdf_files, rdf_format_for_path, rdf_format_from_name, read_rdf_file_as, read_store,
    to_oxigraph_graph, write_rdf_file, write_store,
};
use tristore::{
    DescribeMode, Namespaces, Overwrite, QueryEngine, Term, Triple, TriplePattern, TripleStore,
    Variable,
};

#[derive(Debug, Parser)]
#[command(name = "tristore")]
#[command(about = "In-memory RDF triple store with pattern queries")]
#[command(arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Configuration file, defaults to ./tristore.json when it exists
    #[clap(long, short, global = true)]
    config: Option<PathBuf>,
    /// Store file to operate on, overrides `data` from the configuration
    #[clap(long, global = true)]
    data: Option<PathBuf>,
    /// Verbose mode - sets the RUST_LOG level to info, defaults to warning level
    #[clap(long, short, action, default_value = "false", global = true)]
    verbose: bool,
    /// Debug mode - sets the RUST_LOG level to debug, defaults to warning level
    #[clap(long, action, default_value = "false", global = true)]
    debug: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Write a default configuration file and an empty store
    Init {
        /// Overwrite the configuration file if it already exists
        #[clap(long, default_value = "false")]
        overwrite: bool,
        /// Base IRI for bare local names
        #[clap(long)]
        base: Option<String>,
    },
    /// Add one triple to the store. Terms are `<iri>`, `prefix:local`, a bare
    /// local name (with a base configured) or `"literal"^^datatype`
    Insert {
        subject: String,
        predicate: String,
        object: String,
    },
    /// Print every stored triple
    Dump,
    /// Print whether any binding satisfies all patterns
    Ask {
        /// Patterns such as '?s rdf:type owl:Class'
        #[clap(required = true)]
        patterns: Vec<String>,
    },
    /// Print the bindings that satisfy all patterns
    Select {
        /// Patterns such as '?s rdf:type owl:Class'
        #[clap(required = true)]
        patterns: Vec<String>,
        /// Maximum number of rows
        #[clap(long)]
        limit: Option<usize>,
        /// Variables to keep, comma separated (e.g. ?s,?o)
        #[clap(long, value_delimiter = ',')]
        vars: Vec<String>,
        /// Output JSON instead of text
        #[clap(long, action, default_value = "false")]
        json: bool,
    },
    /// Print the triples about a resource in the store format
    Describe {
        iri: String,
        /// Also include triples that use the resource as their object
        #[clap(long, action, default_value = "false")]
        inbound: bool,
    },
    /// Run the validation checks over the store
    Check {
        /// Output JSON instead of text
        #[clap(long, action, default_value = "false")]
        json: bool,
    },
    /// Add triples from Turtle, N-Triples or RDF/XML files or directories
    Import {
        #[clap(required = true)]
        paths: Vec<PathBuf>,
        /// Input format (turtle, ntriples, rdfxml); guessed from the extension by default
        #[clap(long)]
        format: Option<String>,
    },
    /// Write the store as Turtle, N-Triples or RDF/XML
    Export {
        /// Output file; stdout if omitted
        output: Option<PathBuf>,
        /// Output format (turtle, ntriples, rdfxml); guessed from the extension by default
        #[clap(long)]
        format: Option<String>,
    },
    /// Print the effective configuration
    Config,
    /// Prints the version of the tristore binary
    Version,
}

pub fn run() -> Result<()> {
    tristore::init_logging();
    let cmd = Cli::parse();
    execute(cmd)
}

pub fn run_from_args<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    tristore::init_logging();
    let cmd = Cli::try_parse_from(args).map_err(Error::from)?;
    execute(cmd)
}

fn execute(cmd: Cli) -> Result<()> {
    // The RUST_LOG env var is set by `init_logging` if TRISTORE_LOG is present.
    // CLI flags for verbosity take precedence. If nothing is set, we default to "warn".
    if cmd.debug {
        std::env::set_var("RUST_LOG", "debug");
    } else if cmd.verbose {
        std::env::set_var("RUST_LOG", "info");
    } else if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "warn");
    }
    let _ = env_logger::try_init();

    let config_path = cmd
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    if let Commands::Init { overwrite, base } = &cmd.command {
        let mut builder = Config::builder();
        if let Some(base) = base {
            builder.base(base.clone());
        }
        if let Some(data) = &cmd.data {
            builder.data(data.clone());
        }
        let config = builder.build()?;
        config.namespaces()?;
        config.save_to_file(&config_path, Overwrite::from(*overwrite))?;
        if !config.data.exists() {
            write_store(&TripleStore::new(), &config.data)?;
        }
        println!(
            "Initialized {} with store {}",
            config_path.display(),
            config.data.display()
        );
        return Ok(());
    }

    let mut config = if cmd.config.is_some() || config_path.exists() {
        Config::from_file(&config_path)?
    } else {
        Config::default()
    };
    if let Some(data) = &cmd.data {
        config.data = data.clone();
    }
    if cmd.verbose || cmd.debug {
        config.print();
    }
    let namespaces = config.namespaces()?;

    match cmd.command {
        Commands::Init { .. } => {
            // handled before the configuration is loaded
        }
        Commands::Insert {
            subject,
            predicate,
            object,
        } => {
            let triple = Triple::from_terms(
                parse_term(&subject, &namespaces)?,
                parse_term(&predicate, &namespaces)?,
                parse_term(&object, &namespaces)?,
            )?;
            let mut store = load_store(&config.data)?;
            if store.insert(triple) {
                write_store(&store, &config.data)?;
                println!("Added 1 triple ({} total)", store.len());
            } else {
                println!("Triple already present ({} total)", store.len());
            }
        }
        Commands::Dump => {
            let store = load_store(&config.data)?;
            for t in &store {
                println!("[{}, {}, {}]", t.subject(), t.predicate(), t.object());
            }
        }
        Commands::Ask { patterns } => {
            let store = load_store(&config.data)?;
            let patterns = parse_patterns(&patterns, &namespaces)?;
            let found = QueryEngine::new(&store).ask(&patterns)?;
            println!("ASK Result: {}", found);
        }
        Commands::Select {
            patterns,
            limit,
            vars,
            json,
        } => {
            let store = load_store(&config.data)?;
            let patterns = parse_patterns(&patterns, &namespaces)?;
            let limit = limit.or(config.default_limit);
            let engine = QueryEngine::new(&store);
            let rows = if vars.is_empty() {
                engine.select(&patterns, limit)?
            } else {
                let vars = vars
                    .iter()
                    .map(|v| Variable::new(v.trim()))
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                engine.select_vars(&patterns, &vars, limit)?
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                println!("Amount of rows found: {}", rows.len());
                for row in &rows {
                    println!("{}", row);
                }
            }
        }
        Commands::Describe { iri, inbound } => {
            let store = load_store(&config.data)?;
            let iri = match parse_term(&iri, &namespaces)? {
                Term::Iri(iri) => iri,
                other => return Err(anyhow!("Expected an IRI to describe, got {}", other)),
            };
            let mode = if inbound {
                DescribeMode::SubjectOrObject
            } else {
                config.describe_mode
            };
            let described = QueryEngine::new(&store).describe_with(&iri, mode);
            print!("{}", serialize(&described));
        }
        Commands::Check { json } => {
            let store = load_store(&config.data)?;
            let problems = Doctor::with_default_checks().run(&store)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&problems)?);
            } else if problems.is_empty() {
                println!("No problems found");
            } else {
                for problem in &problems {
                    println!("{}", problem);
                }
            }
            if config.strict && !problems.is_empty() {
                return Err(anyhow!("{} problem(s) found", problems.len()));
            }
        }
        Commands::Import { paths, format } => {
            let forced = format.as_deref().map(rdf_format_from_name).transpose()?;
            let mut store = load_store(&config.data)?;
            let before = store.len();
            let mut files = Vec::new();
            for path in &paths {
                if path.is_dir() {
                    files.extend(find_rdf_files(path));
                } else {
                    files.push(path.clone());
                }
            }
            for file in &files {
                let format = forced.unwrap_or_else(|| rdf_format_for_path(file));
                let imported = read_rdf_file_as(file, format)
                    .with_context(|| format!("Failed to import {}", file.display()))?;
                store.extend(imported.all().cloned());
            }
            write_store(&store, &config.data)?;
            println!(
                "Imported {} new triples from {} file(s)",
                store.len() - before,
                files.len()
            );
        }
        Commands::Export { output, format } => {
            let store = load_store(&config.data)?;
            let format = match (format.as_deref(), &output) {
                (Some(name), _) => rdf_format_from_name(name)?,
                (None, Some(path)) => rdf_format_for_path(path),
                (None, None) => RdfFormat::Turtle,
            };
            if let Some(path) = output {
                write_rdf_file(&store, &path, format)?;
                info!("Exported {} triples to {}", store.len(), path.display());
            } else {
                let graph = to_oxigraph_graph(&store)?;
                let stdout = std::io::stdout();
                let mut handle = stdout.lock();
                let mut serializer = RdfSerializer::from_format(format).for_writer(&mut handle);
                for t in graph.iter() {
                    serializer.serialize_triple(t)?;
                }
                serializer.finish()?;
            }
        }
        Commands::Config => {
            println!("Config file: {}", config_path.display());
            config.print();
        }
        Commands::Version => {
            println!("tristore {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn load_store(path: &Path) -> Result<TripleStore> {
    if !path.exists() {
        info!("{} does not exist yet; starting from an empty store", path.display());
        return Ok(TripleStore::new());
    }
    read_store(path).with_context(|| format!("Failed to read store {}", path.display()))
}

fn parse_patterns(patterns: &[String], namespaces: &Namespaces) -> Result<Vec<TriplePattern>> {
    patterns
        .iter()
        .map(|p| {
            parse_pattern(p, namespaces).with_context(|| format!("Invalid pattern '{}'", p))
        })
        .collect()
}
