use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

mod config;
mod entries;
mod index;
mod logging;
mod matcher;
mod output;
mod parser;
mod scanner;

pub use config::Config;
pub use scanner::collect_corpus;

use logging::init_logging;
use matcher::{index_usages, scan_usages};
use output::{build_report, print_human_report};

const DEFAULT_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx"];

const PATH_SAFE_CLASS: &str = r"[./A-Za-z0-9_\-@]";

static PATH_SAFE_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("^{PATH_SAFE_CLASS}*$")).unwrap());

#[derive(Parser, Debug)]
#[command(name = "strayfiles", version)]
#[command(about = "List JS/TS source files that no other file in the project references")]
struct Cli {
    /// Directory to scan
    #[arg(env = "STRAYFILES_ROOT")]
    root: PathBuf,

    /// Directory import paths are written relative to (defaults to ROOT)
    #[arg(long)]
    source_root: Option<PathBuf>,

    /// Recognised extensions (repeatable or comma-separated); replaces the defaults
    #[arg(long = "ext", value_delimiter = ',')]
    extensions: Vec<String>,

    /// Extra file names that are always treated as used, e.g. --implicit template.tsx
    #[arg(long = "implicit", value_delimiter = ',')]
    implicit_files: Vec<String>,

    /// Do not treat the built-in framework file names as used
    #[arg(long)]
    no_default_implicit: bool,

    /// Directory names to skip while walking (repeatable or comma-separated)
    #[arg(long = "exclude-dir", value_delimiter = ',')]
    exclude_dirs: Vec<String>,

    /// How the project is searched for references
    #[arg(long, value_enum, default_value_t = MatchStrategy::Index)]
    strategy: MatchStrategy,

    /// Emit JSON output
    #[arg(long)]
    json: bool,

    /// Exit with status 1 when unused files are found
    #[arg(long)]
    fail_on_unused: bool,

    /// Log every reference decision
    #[arg(short, long)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

/// How candidates are matched against the rest of the corpus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// Read every file once and answer each candidate from a literal suffix index
    #[default]
    Index,
    /// Re-read every other file for each candidate
    Scan,
}

/// Which identity key a reference was recognised through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyKind {
    Name,
    Path,
}

/// A file discovered under the root whose extension is recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    path: PathBuf,
    file_name: String,
    extension: String,
    name_key: String,
    path_key: String,
}

impl SourceFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// File name without its extension, e.g. `button` for `components/ui/button.tsx`.
    pub fn name_key(&self) -> &str {
        &self.name_key
    }

    /// Path relative to the source root without extension, e.g. `components/ui/button`.
    pub fn path_key(&self) -> &str {
        &self.path_key
    }
}

/// Every recognised file under the root, plus the indices of those that may be reported.
#[derive(Debug, Default)]
pub struct Corpus {
    files: Vec<SourceFile>,
    candidates: Vec<usize>,
}

impl Corpus {
    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn candidates(&self) -> impl Iterator<Item = &SourceFile> + '_ {
        self.candidates.iter().map(|&idx| &self.files[idx])
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub file: PathBuf,
    pub via: KeyKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Usage {
    pub file: PathBuf,
    /// First corpus file, in discovery order, that references this one.
    pub referenced_by: Option<Reference>,
}

impl Usage {
    pub fn is_used(&self) -> bool {
        self.referenced_by.is_some()
    }
}

#[derive(Debug)]
pub struct Analysis {
    pub corpus: Corpus,
    /// One entry per candidate, in discovery order.
    pub usages: Vec<Usage>,
}

impl Analysis {
    pub fn unused(&self) -> impl Iterator<Item = &Path> + '_ {
        self.usages
            .iter()
            .filter(|usage| !usage.is_used())
            .map(|usage| usage.file.as_path())
    }
}

#[derive(Debug, Serialize)]
struct Report {
    root: String,
    source_root: String,
    strategy: MatchStrategy,
    summary: ReportSummary,
    unused_files: Vec<String>,
    used_files: Vec<UsedFile>,
}

#[derive(Debug, Serialize)]
struct ReportSummary {
    corpus_files: usize,
    checked_files: usize,
    implicit_entry_points: usize,
    unused_files_count: usize,
}

#[derive(Debug, Serialize)]
struct UsedFile {
    file: String,
    referenced_by: String,
    via: KeyKind,
}

pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let config = Config::from_cli(&cli)?;
    let analysis = analyze(&config)?;
    let report = build_report(&config, &analysis);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_human_report(&report);
    }

    if cli.fail_on_unused && !report.unused_files.is_empty() {
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}

/// Collects the corpus under `config.root` and decides, for every candidate, whether
/// another corpus file references it.
///
/// Unreadable directories and files are logged and skipped; they never fail the run.
pub fn analyze(config: &Config) -> Result<Analysis> {
    let corpus = collect_corpus(config);
    info!(
        corpus_files = corpus.len(),
        candidates = corpus.candidate_count(),
        strategy = ?config.strategy,
        "collected corpus"
    );

    let usages = match config.strategy {
        MatchStrategy::Index => index_usages(&corpus)?,
        MatchStrategy::Scan => scan_usages(&corpus)?,
    };

    let unused = usages.iter().filter(|usage| !usage.is_used()).count();
    info!(unused, "reference search finished");

    Ok(Analysis { corpus, usages })
}
