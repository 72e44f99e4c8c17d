//! tfgraph command-line interface.

pub mod input;
pub mod options;
pub mod output;
pub mod pipeline;
pub mod profile;

use tfgraph_core::Result;

pub use options::Cli;
pub use output::write_output;
pub use pipeline::{load_registry, process_input};
pub use profile::profile_phase;

/// Main entry point: produce the text tfgraph should emit for `opts`.
///
/// This is the simplified document, or the active registry as TOML when
/// `--print-registry` is set. Writing it out is left to the caller.
pub fn run_main(opts: &Cli) -> Result<String> {
    let registry = load_registry(opts.registry.as_deref())?;

    if opts.print_registry {
        return registry.to_toml_string();
    }

    let text = input::read_input(opts.input.as_deref())?;
    Ok(process_input(&registry, &text))
}
