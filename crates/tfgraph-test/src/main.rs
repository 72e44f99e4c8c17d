use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use tfgraph_test::{CaseStatus, Corpus, RunnerConfig, run_cases};

#[derive(Parser, Debug)]
#[command(name = "tfgraph-test", about = "Corpus runner for tfgraph", version)]
struct Cli {
    /// Root directory containing `.tfgraph` corpus files
    #[arg(long, value_name = "DIR", default_value = "tests/corpus")]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the corpus expectations
    Run {
        /// Only run cases whose id contains this substring
        #[arg(long)]
        filter: Option<String>,
        /// Update expectation sections with current output (bless)
        #[arg(long)]
        update: bool,
        /// Keep each case's scratch directory for inspection
        #[arg(long = "keep-temps")]
        keep_temps: bool,
    },
    /// List available cases (optionally filtering by substring)
    List {
        #[arg(long)]
        filter: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Run {
            filter,
            update,
            keep_temps,
        } => run_command(
            cli.root,
            RunnerConfig {
                filter,
                update,
                keep_temps,
            },
        ),
        Command::List { filter } => list_command(cli.root, filter),
    }
}

fn run_command(root: PathBuf, config: RunnerConfig) -> Result<()> {
    let update = config.update;
    let mut corpus = Corpus::load(&root)?;
    let outcomes = run_cases(&mut corpus, config)?;

    let mut passed = 0usize;
    let mut updated = 0usize;
    let mut failed = 0usize;
    let mut skipped = 0usize;

    for outcome in &outcomes {
        match outcome.status {
            CaseStatus::Passed => {
                passed += 1;
                println!("[PASS] {}", outcome.id);
            }
            CaseStatus::Updated => {
                updated += 1;
                println!("[UPD ] {}", outcome.id);
            }
            CaseStatus::Failed => {
                failed += 1;
                println!("[FAIL] {}", outcome.id);
                if let Some(message) = &outcome.message {
                    for line in message.lines() {
                        println!("        {line}");
                    }
                }
            }
            CaseStatus::NoExpectations => {
                skipped += 1;
                println!("[SKIP] {} (no expectations)", outcome.id);
            }
        }
    }

    if update {
        corpus.write_updates()?;
    }

    println!("\nSummary: {passed} passed, {updated} updated, {failed} failed, {skipped} skipped");

    if failed > 0 {
        anyhow::bail!("{failed} case(s) failed");
    }
    Ok(())
}

fn list_command(root: PathBuf, filter: Option<String>) -> Result<()> {
    let corpus = Corpus::load(&root)?;
    let mut count = 0usize;
    for file in corpus.files() {
        for case in file.cases() {
            let id = case.id();
            if filter.as_ref().is_some_and(|term| !id.contains(term.as_str())) {
                continue;
            }
            count += 1;
            println!("{id}");
        }
    }
    if count == 0 {
        anyhow::bail!(
            "no tfgraph-test cases found{}",
            filter
                .as_ref()
                .map(|term| format!(" matching '{term}'"))
                .unwrap_or_default()
        );
    }
    Ok(())
}
