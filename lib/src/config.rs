//! Defines the `tristore.json` configuration read by the command line tool.

use crate::namespace::Namespaces;
use crate::options::{DescribeMode, Overwrite};
use anyhow::{anyhow, Context, Result};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "tristore.json";
pub const DEFAULT_DATA_FILE: &str = "store.triples";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Builder)]
#[builder(default, setter(into))]
#[serde(default)]
pub struct Config {
    /// Store file in the line format.
    pub data: PathBuf,
    /// Base IRI that bare local names (`Bob`) are appended to.
    #[builder(setter(into, strip_option))]
    pub base: Option<String>,
    /// `prefix -> namespace`, on top of rdf, rdfs, owl and xsd.
    pub prefixes: BTreeMap<String, String>,
    // cap for `select` when none is given
    #[builder(setter(into, strip_option))]
    pub default_limit: Option<usize>,
    pub describe_mode: DescribeMode,
    // make `check` fail when it finds problems
    pub strict: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: PathBuf::from(DEFAULT_DATA_FILE),
            base: None,
            prefixes: BTreeMap::new(),
            default_limit: None,
            describe_mode: DescribeMode::default(),
            strict: false,
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    pub fn from_file(file: &Path) -> Result<Self> {
        let reader = BufReader::new(
            std::fs::File::open(file)
                .with_context(|| format!("Failed to open config file {}", file.display()))?,
        );
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file {}", file.display()))?;
        // surface bad prefixes now rather than on first use
        config.namespaces()?;
        Ok(config)
    }

    pub fn save_to_file(&self, file: &Path, overwrite: Overwrite) -> Result<()> {
        if file.exists() && !overwrite.as_bool() {
            return Err(anyhow!(
                "{} already exists; pass --overwrite to replace it",
                file.display()
            ));
        }
        let config_str = serde_json::to_string_pretty(&self)?;
        let mut file = std::fs::File::create(file)?;
        file.write_all(config_str.as_bytes())?;
        Ok(())
    }

    /// The well-known prefixes plus `prefixes` and `base` from this config.
    pub fn namespaces(&self) -> Result<Namespaces> {
        let mut ns = Namespaces::with_well_known();
        for (prefix, namespace) in &self.prefixes {
            ns.insert(prefix.as_str(), namespace.as_str())
                .with_context(|| format!("Invalid namespace for prefix '{}'", prefix))?;
        }
        if let Some(base) = &self.base {
            ns.set_base(base.as_str())
                .with_context(|| format!("Invalid base IRI '{}'", base))?;
        }
        Ok(ns)
    }

    /// Prints out the current Config in a clear and readable way for command line output.
    pub fn print(&self) {
        println!("Configuration:");
        println!("  Data: {}", self.data.display());
        println!("  Base: {}", self.base.as_deref().unwrap_or("(none)"));
        if !self.prefixes.is_empty() {
            println!("  Prefixes:");
            for (prefix, namespace) in &self.prefixes {
                println!("    - {}: {}", prefix, namespace);
            }
        }
        match self.default_limit {
            Some(limit) => println!("  Default Limit: {}", limit),
            None => println!("  Default Limit: (none)"),
        }
        println!("  Describe Mode: {:?}", self.describe_mode);
        println!("  Strict: {}", self.strict);
    }
}
