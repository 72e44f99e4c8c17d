use std::time::Instant;

use clap::Parser;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[cfg(target_env = "msvc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use tfgraph::{Cli, run_main, write_output};
use tfgraph_core::Result;

/// Run tfgraph. Failures are reported on stderr; the exit status stays 0.
pub fn run(args: Cli) -> Result<()> {
    let total_start = Instant::now();

    // Logs go to stderr, and only when RUST_LOG is set.
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    let result = run_main(&args).and_then(|text| write_output(args.output.as_deref(), &text));
    if let Err(e) = result {
        eprintln!("Error: {e}");
        tracing::error!(error = %e, "execution failed");
    }

    let total_secs = total_start.elapsed().as_secs_f64();
    tracing::info!(total_secs, "complete");
    Ok(())
}

pub fn main() -> Result<()> {
    let args = Cli::parse();
    run(args)
}
