//! Executes corpus cases through the same code paths as the `tfgraph` binary.
//!
//! Each case gets a scratch directory holding its declared files. The case
//! `args:` line is parsed with the binary's own option parser; relative paths
//! resolve against the scratch directory. Without `--input`, the file
//! `input.dot` is the input when the case declares one, otherwise the input is
//! empty.
//!
//! Expectation kinds:
//! - `dot`: the full simplified document
//! - `edges`: only the discovered edge lines, sorted
//! - `registry`: the active registry as TOML
//! - `error`: the error the run produced, with the scratch path shown as `$TMP`

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use similar::{ChangeTag, TextDiff};
use tempfile::TempDir;

use tfgraph::{Cli, load_registry, process_input};
use tfgraph_core::scan_edges;
use tfgraph_dot::render_edges;

use crate::corpus::{Corpus, CorpusCase, CorpusFile};

/// Input file used when a case does not pass `--input`.
pub const DEFAULT_INPUT: &str = "input.dot";

const EXPECTATION_KINDS: [&str; 4] = ["dot", "edges", "registry", "error"];

#[derive(Debug, Clone, Default)]
pub struct RunnerConfig {
    pub filter: Option<String>,
    pub update: bool,
    /// Leave scratch directories on disk for inspection.
    pub keep_temps: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseStatus {
    Passed,
    Failed,
    Updated,
    NoExpectations,
}

#[derive(Debug, Clone)]
pub struct CaseOutcome {
    pub id: String,
    pub status: CaseStatus,
    pub message: Option<String>,
}

/// What a case run produced, keyed by expectation kind.
#[derive(Debug, Default)]
struct CaseRun {
    dot: Option<String>,
    edges: Option<String>,
    registry: Option<String>,
    error: Option<String>,
}

impl CaseRun {
    fn actual(&self, kind: &str) -> Option<&str> {
        match kind {
            "dot" => self.dot.as_deref(),
            "edges" => self.edges.as_deref(),
            "registry" => self.registry.as_deref(),
            "error" => self.error.as_deref(),
            _ => None,
        }
    }
}

pub fn run_cases(corpus: &mut Corpus, config: RunnerConfig) -> Result<Vec<CaseOutcome>> {
    let mut outcomes = Vec::new();
    let mut matched = 0usize;

    for file in corpus.files_mut() {
        outcomes.extend(run_cases_in_file(file, &config, &mut matched)?);
    }

    if matched == 0 {
        return Err(anyhow!(
            "no tfgraph-test cases matched filter {:?}",
            config.filter
        ));
    }

    Ok(outcomes)
}

fn run_cases_in_file(
    file: &mut CorpusFile,
    config: &RunnerConfig,
    matched: &mut usize,
) -> Result<Vec<CaseOutcome>> {
    let mut outcomes = Vec::new();
    let mut dirty = false;

    for case in file.cases.iter_mut() {
        let id = case.id();
        if let Some(term) = &config.filter {
            if !id.contains(term.as_str()) {
                continue;
            }
        }
        *matched += 1;

        let outcome = run_case(case, config)
            .with_context(|| format!("case {id} could not be executed"))?;
        if outcome.status == CaseStatus::Updated {
            dirty = true;
        }
        outcomes.push(outcome);
    }

    if dirty {
        file.mark_dirty();
    }
    Ok(outcomes)
}

fn run_case(case: &mut CorpusCase, config: &RunnerConfig) -> Result<CaseOutcome> {
    let id = case.id();
    if case.expectations.is_empty() {
        return Ok(CaseOutcome {
            id,
            status: CaseStatus::NoExpectations,
            message: None,
        });
    }
    for expect in &case.expectations {
        if !EXPECTATION_KINDS.contains(&expect.kind.as_str()) {
            return Err(anyhow!("unknown expectation kind '{}'", expect.kind));
        }
    }

    let temp = TempDir::new().context("failed to create scratch directory")?;
    materialize_files(temp.path(), case)?;
    let run = execute(temp.path(), case)?;
    let tmp_path = temp.path().to_string_lossy().to_string();

    let mut failures = Vec::new();
    let mut updated = false;
    let kinds: Vec<String> = case.expectations.iter().map(|e| e.kind.clone()).collect();
    for kind in kinds {
        let expected = normalize(case.expectation(&kind).unwrap_or_default(), None);
        let actual = run
            .actual(&kind)
            .map(|text| normalize(text, Some(&tmp_path)))
            .unwrap_or_else(|| "<none>".to_string());

        if expected == actual {
            continue;
        }
        if config.update {
            let mut value = actual;
            if !value.is_empty() {
                value.push('\n');
            }
            case.set_expectation(&kind, value);
            updated = true;
        } else {
            failures.push(format_expectation_diff(&kind, &expected, &actual));
        }
    }

    if config.keep_temps {
        let kept = temp.keep();
        eprintln!("[KEEP] {id} -> {}", kept.display());
    }

    let (status, message) = if !failures.is_empty() {
        (CaseStatus::Failed, Some(failures.join("\n")))
    } else if updated {
        (CaseStatus::Updated, None)
    } else {
        (CaseStatus::Passed, None)
    };
    Ok(CaseOutcome {
        id,
        status,
        message,
    })
}

fn materialize_files(root: &Path, case: &CorpusCase) -> Result<()> {
    for file in &case.files {
        let path = root.join(&file.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&path, &file.contents)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(())
}

/// Run one case, recording the outputs of every expectation kind that applies.
fn execute(root: &Path, case: &CorpusCase) -> Result<CaseRun> {
    let argv = std::iter::once("tfgraph".to_string()).chain(case.args.iter().cloned());
    let mut cli = Cli::try_parse_from(argv)
        .map_err(|err| anyhow!("invalid args {:?}: {err}", case.args))?;

    let rooted = |path: PathBuf| root.join(path);
    cli.registry = cli.registry.map(rooted);
    cli.output = cli.output.map(rooted);
    cli.input = match cli.input.take() {
        Some(path) => Some(rooted(path)),
        None if case.file(DEFAULT_INPUT).is_some() => Some(root.join(DEFAULT_INPUT)),
        None => None,
    };

    let mut run = CaseRun::default();
    let registry = match load_registry(cli.registry.as_deref()) {
        Ok(registry) => registry,
        Err(err) => {
            run.error = Some(err.to_string());
            return Ok(run);
        }
    };
    match registry.to_toml_string() {
        Ok(text) => run.registry = Some(text),
        Err(err) => run.error = Some(err.to_string()),
    }
    if cli.print_registry {
        return Ok(run);
    }

    // Never fall back to the runner's own stdin.
    let text = match &cli.input {
        Some(path) => match tfgraph::input::read_input(Some(path.as_path())) {
            Ok(text) => text,
            Err(err) => {
                run.error = Some(err.to_string());
                return Ok(run);
            }
        },
        None => String::new(),
    };

    let edges = scan_edges(&registry, &text);
    run.edges = Some(render_edges(&edges).join("\n"));
    let document = process_input(&registry, &text);

    if let Some(output) = &cli.output {
        if let Err(err) = tfgraph::write_output(Some(output.as_path()), &document) {
            run.error = Some(err.to_string());
        }
    }
    run.dot = Some(document);
    Ok(run)
}

fn format_expectation_diff(kind: &str, expected: &str, actual: &str) -> String {
    let diff = TextDiff::from_lines(expected, actual);
    let mut buf = String::new();
    let _ = writeln!(buf, "Expectation '{kind}' mismatch:");
    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => "-",
            ChangeTag::Insert => "+",
            ChangeTag::Equal => " ",
        };
        let _ = write!(buf, "{sign}{change}");
        if change.missing_newline() {
            buf.push('\n');
        }
    }
    buf
}

/// Canonical form for comparison: LF line endings, no trailing newlines, and
/// the scratch directory replaced by `$TMP`.
fn normalize(text: &str, temp_dir_path: Option<&str>) -> String {
    let canonical = text.replace("\r\n", "\n").trim_end_matches('\n').to_string();
    match temp_dir_path {
        Some(tmp) => canonical.replace(tmp, "$TMP"),
        None => canonical,
    }
}
