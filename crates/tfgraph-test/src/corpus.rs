//! `.tfgraph` corpus files.
//!
//! A corpus file holds one or more cases:
//!
//! ```text
//! $// comments attach to the next case
//! ===============================================================================
//! vpc to security group
//! ===============================================================================
//!
//! args: --registry registry.toml
//!
//! --- file: input.dot ---
//! module.vpc -> module.alb_security_group
//!
//! --- expect:edges ---
//!     "VPC" -> "ALB Security Group"
//! ```
//!
//! `=== name ===` on one line is accepted as a short header.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use shell_words::{join, split};
use walkdir::WalkDir;

const CASE_BANNER: &str =
    "===============================================================================";

const CORPUS_EXTENSION: &str = "tfgraph";

fn slugify_case_name(raw: &str) -> String {
    let mut slug = String::new();
    let mut pending_dash = false;

    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(ch.to_ascii_lowercase());
            pending_dash = false;
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        "case".to_string()
    } else {
        slug
    }
}

/// All corpus files found under a root directory (e.g. `tests/corpus`).
pub struct Corpus {
    files: Vec<CorpusFile>,
}

impl Corpus {
    pub fn load(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        if !root.exists() {
            bail!("corpus root {} does not exist", root.display());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(root)
            .into_iter()
            .filter_map(|res| res.ok())
            .filter(|entry| entry.file_type().is_file())
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(CORPUS_EXTENSION) {
                continue;
            }

            let rel = path.strip_prefix(root).unwrap_or(path);
            let suite = rel.with_extension("").to_string_lossy().replace('\\', "/");
            let content = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let cases = parse_corpus_file(&suite, path, &content)?;
            files.push(CorpusFile {
                path: path.to_path_buf(),
                suite,
                cases,
                dirty: false,
            });
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(Self { files })
    }

    pub fn files(&self) -> &[CorpusFile] {
        &self.files
    }

    pub fn files_mut(&mut self) -> &mut [CorpusFile] {
        &mut self.files
    }

    /// Rewrite every file whose expectations were blessed.
    pub fn write_updates(&mut self) -> Result<()> {
        for file in &mut self.files {
            if file.dirty {
                fs::write(&file.path, file.render())
                    .with_context(|| format!("failed to update {}", file.path.display()))?;
                file.dirty = false;
            }
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct CorpusFile {
    pub path: PathBuf,
    pub suite: String,
    pub cases: Vec<CorpusCase>,
    pub(crate) dirty: bool,
}

impl CorpusFile {
    pub fn cases(&self) -> &[CorpusCase] {
        &self.cases
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn render(&self) -> String {
        let rendered: Vec<String> = self
            .cases
            .iter()
            .map(|case| case.render().trim_end_matches('\n').to_string())
            .collect();
        let mut buf = rendered.join("\n\n\n");
        buf.push('\n');
        buf
    }
}

#[derive(Debug, Clone)]
pub struct CorpusCase {
    pub suite: String,
    pub name: String,
    pub args: Vec<String>,
    pub files: Vec<TestFile>,
    pub expectations: Vec<CorpusCaseExpectation>,
    /// `$//` lines preceding the case header.
    pub comments: Vec<String>,
}

impl CorpusCase {
    fn new(suite: &str, name: String, comments: Vec<String>) -> Self {
        Self {
            suite: suite.to_string(),
            name,
            args: Vec::new(),
            files: Vec::new(),
            expectations: Vec::new(),
            comments,
        }
    }

    pub fn id(&self) -> String {
        format!("{}::{}", self.suite, self.name)
    }

    pub fn file(&self, path: &str) -> Option<&TestFile> {
        self.files.iter().find(|file| file.path == path)
    }

    pub fn expectation(&self, kind: &str) -> Option<&str> {
        self.expectations
            .iter()
            .find(|entry| entry.kind == kind)
            .map(|entry| entry.value.as_str())
    }

    pub fn set_expectation(&mut self, kind: &str, value: String) {
        match self.expectations.iter_mut().find(|entry| entry.kind == kind) {
            Some(entry) => entry.value = value,
            None => self.expectations.push(CorpusCaseExpectation {
                kind: kind.to_string(),
                value,
            }),
        }
    }

    pub fn render(&self) -> String {
        let mut buf = String::new();
        for comment in &self.comments {
            buf.push_str(comment);
            buf.push('\n');
        }
        buf.push_str(CASE_BANNER);
        buf.push('\n');
        buf.push_str(&self.name);
        buf.push('\n');
        buf.push_str(CASE_BANNER);
        buf.push_str("\n\n");
        if !self.args.is_empty() {
            buf.push_str(&format!("args: {}\n\n", join(&self.args)));
        }

        for file in &self.files {
            push_section(&mut buf, &format!("file: {}", file.path), &file.contents);
        }
        for expect in &self.expectations {
            push_section(&mut buf, &format!("expect:{}", expect.kind), &expect.value);
        }
        buf
    }
}

fn push_section(buf: &mut String, header: &str, body: &str) {
    buf.push_str(&format!("--- {header} ---\n"));
    buf.push_str(body);
    if !body.is_empty() && !body.ends_with('\n') {
        buf.push('\n');
    }
    buf.push('\n');
}

#[derive(Debug, Clone)]
pub struct TestFile {
    pub path: String,
    pub contents: String,
}

#[derive(Debug, Clone)]
pub struct CorpusCaseExpectation {
    pub kind: String,
    pub value: String,
}

#[derive(Debug, Clone)]
enum SectionHeader {
    File { path: String },
    Expect { kind: String },
}

/// Where the parser is relative to a banner header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BannerState {
    Outside,
    AwaitingName,
    AwaitingClose,
}

struct Parser<'a> {
    suite: &'a str,
    path: &'a Path,
    cases: Vec<CorpusCase>,
    current: Option<CorpusCase>,
    section: Option<SectionHeader>,
    section_lines: Vec<String>,
    comments: Vec<String>,
}

impl<'a> Parser<'a> {
    fn start_case(&mut self, name: String) -> Result<()> {
        self.finish_section()?;
        if let Some(case) = self.current.take() {
            self.cases.push(case);
        }
        let comments = std::mem::take(&mut self.comments);
        self.current = Some(CorpusCase::new(self.suite, name, comments));
        Ok(())
    }

    fn finish_section(&mut self) -> Result<()> {
        let Some(section) = self.section.take() else {
            self.section_lines.clear();
            return Ok(());
        };
        let case = self
            .current
            .as_mut()
            .ok_or_else(|| anyhow!("section declared before any case header"))?;

        while self.section_lines.last().is_some_and(|line| line.trim().is_empty()) {
            self.section_lines.pop();
        }
        let mut content = self.section_lines.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        self.section_lines.clear();

        match section {
            SectionHeader::File { path } => case.files.push(TestFile {
                path,
                contents: content,
            }),
            SectionHeader::Expect { kind } => case.expectations.push(CorpusCaseExpectation {
                kind,
                value: content,
            }),
        }
        Ok(())
    }

    fn metadata(&mut self, line: &str) -> Result<()> {
        let path = self.path.display();
        let case = self
            .current
            .as_mut()
            .ok_or_else(|| anyhow!("content encountered before case header in {path}"))?;

        match line.split_once(':') {
            Some(("args", value)) => {
                case.args = split(value.trim())
                    .map_err(|err| anyhow!("invalid args in {path}: {err}"))?;
                Ok(())
            }
            Some((other, _)) => bail!(
                "unsupported metadata '{}' in {path} case {}",
                other.trim(),
                case.name
            ),
            None => bail!("unexpected line '{line}' in {path} (within case {})", case.name),
        }
    }
}

fn parse_corpus_file(suite: &str, path: &Path, content: &str) -> Result<Vec<CorpusCase>> {
    let mut parser = Parser {
        suite,
        path,
        cases: Vec::new(),
        current: None,
        section: None,
        section_lines: Vec::new(),
        comments: Vec::new(),
    };
    let mut banner = BannerState::Outside;

    for raw_line in content.lines() {
        let line = raw_line.trim_end_matches('\r');
        let trimmed = line.trim();

        if trimmed.starts_with("$//") {
            parser.comments.push(line.to_string());
            continue;
        }

        match banner {
            BannerState::AwaitingName => {
                if !trimmed.is_empty() {
                    parser.start_case(slugify_case_name(trimmed))?;
                    banner = BannerState::AwaitingClose;
                }
                continue;
            }
            BannerState::AwaitingClose => {
                if trimmed.is_empty() {
                    continue;
                }
                if !is_banner_line(line) {
                    bail!(
                        "expected closing banner after case '{}' in {}",
                        parser.current.as_ref().map_or("unknown", |c| c.name.as_str()),
                        path.display()
                    );
                }
                banner = BannerState::Outside;
                continue;
            }
            BannerState::Outside => {}
        }

        if is_banner_line(line) {
            banner = BannerState::AwaitingName;
            continue;
        }

        if let Some(name) = parse_case_header(line) {
            parser.start_case(name)?;
            continue;
        }

        if let Some(section) = parse_section_header(line) {
            parser.finish_section()?;
            parser.section = Some(section);
            continue;
        }

        if parser.section.is_some() {
            parser.section_lines.push(line.to_string());
            continue;
        }

        if !trimmed.is_empty() {
            parser.metadata(trimmed)?;
        }
    }

    if banner != BannerState::Outside {
        bail!(
            "unterminated banner in {} (missing case name or closing separator)",
            path.display()
        );
    }
    parser.finish_section()?;
    if let Some(case) = parser.current.take() {
        parser.cases.push(case);
    }

    if parser.cases.is_empty() {
        bail!("corpus file {} does not contain any cases", path.display());
    }
    Ok(parser.cases)
}

fn parse_case_header(line: &str) -> Option<String> {
    if line.starts_with("===") && line.ends_with("===") {
        let name = line.trim_matches('=').trim();
        if !name.is_empty() {
            return Some(slugify_case_name(name));
        }
    }
    None
}

fn is_banner_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= 5 && trimmed.chars().all(|ch| ch == '=')
}

fn parse_section_header(line: &str) -> Option<SectionHeader> {
    if !line.starts_with("---") || !line.ends_with("---") || line.len() < 6 {
        return None;
    }

    let inner = line.trim_matches('-').trim();
    if let Some(rest) = inner.strip_prefix("file:") {
        return Some(SectionHeader::File {
            path: rest.trim().to_string(),
        });
    }
    if let Some(rest) = inner.strip_prefix("expect:") {
        return Some(SectionHeader::Expect {
            kind: rest.trim().to_string(),
        });
    }
    None
}
