//! Command-line options.
//!
//! The parser lives in the library so the corpus runner can feed case `args:`
//! lines through exactly the same definitions as the binary.

use std::path::PathBuf;

use clap::Parser;

/// Every flag is optional: with none, tfgraph reads stdin and writes stdout.
#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "tfgraph",
    about = "tfgraph: boil `terraform graph` output down to the modules that matter",
    version
)]
pub struct Cli {
    /// Read the graph from this file instead of stdin
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Write the simplified graph to this file instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Use the entities declared in this TOML file instead of the built-in registry
    #[arg(long = "registry", value_name = "FILE")]
    pub registry: Option<PathBuf>,

    /// Print the active registry as TOML and exit
    #[arg(long = "print-registry", default_value_t = false)]
    pub print_registry: bool,
}

impl Cli {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(mut self, input: impl Into<PathBuf>) -> Self {
        self.input = Some(input.into());
        self
    }

    pub fn with_registry(mut self, registry: impl Into<PathBuf>) -> Self {
        self.registry = Some(registry.into());
        self
    }

    pub fn with_print_registry(mut self, print_registry: bool) -> Self {
        self.print_registry = print_registry;
        self
    }
}
