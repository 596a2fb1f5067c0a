//! Repo-local architectural lint for the diary core's hexagonal boundaries.
//!
//! `fishing-diary` keeps its rules in `domain` (with the port traits) and
//! talks to devices, disk and the network only through `outbound` adapters.
//! Process wiring lives in `config` and `telemetry`. This lint:
//!
//! - forbids `domain` code from depending on `outbound`, `config` or
//!   `telemetry`, or on infrastructure crates such as `reqwest`
//! - forbids `outbound` adapters from depending on `config` or `telemetry`,
//!   or on process-level crates such as `clap`
//!
//! Run it with `cargo run -p architecture-lint`.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use syn::visit::Visit;
use thiserror::Error;

/// Library name of the linted crate, as it appears in absolute paths.
const CRATE_NAME: &str = "fishing_diary";

/// Top-level modules of the linted crate.
const CRATE_MODULES: [&str; 4] = ["config", "domain", "outbound", "telemetry"];

/// A single boundary violation discovered by the linter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File path relative to `diary/src`.
    pub file: PathBuf,
    /// Human-readable description of the violated rule.
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.file.display(), self.message)
    }
}

/// Failure modes returned by the architecture lint.
#[derive(Debug, Error)]
pub enum ArchitectureLintError {
    /// Filesystem traversal or reading failed.
    #[error("I/O error while linting architecture: {0}")]
    Io(#[from] io::Error),
    /// The file is outside a linted layer or is not valid Rust.
    #[error("cannot lint {}: {message}", .file.display())]
    Parse { file: PathBuf, message: String },
    /// One or more boundary violations were found.
    #[error("architecture boundary violations:{}", render_violations(.0))]
    Violations(Vec<Violation>),
}

fn render_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|violation| format!("\n- {violation}"))
        .collect()
}

/// A Rust source file to be linted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSource {
    /// Path relative to `diary/src`.
    pub file: PathBuf,
    pub contents: String,
}

/// What one layer may not reach.
struct LayerRule {
    name: &'static str,
    forbidden_modules: &'static [&'static str],
    forbidden_crates: &'static [&'static str],
}

const DOMAIN_RULE: LayerRule = LayerRule {
    name: "domain",
    forbidden_modules: &["config", "outbound", "telemetry"],
    forbidden_crates: &[
        "camino",
        "cap_std",
        "clap",
        "kv_store",
        "ortho_config",
        "reqwest",
        "tracing_subscriber",
        "url",
    ],
};

const OUTBOUND_RULE: LayerRule = LayerRule {
    name: "outbound",
    forbidden_modules: &["config", "telemetry"],
    forbidden_crates: &["clap", "ortho_config", "tracing_subscriber"],
};

const RULES: [&LayerRule; 2] = [&DOMAIN_RULE, &OUTBOUND_RULE];

impl LayerRule {
    /// Rule for the layer owning `relative_path`, taken from its first
    /// component.
    fn for_path(relative_path: &Path) -> Option<&'static Self> {
        let first = relative_path.components().next()?.as_os_str().to_str()?;
        RULES.into_iter().find(|rule| rule.name == first)
    }

    fn check(&self, root: &PathRoot) -> Option<String> {
        match root {
            PathRoot::Internal(module) if self.forbidden_modules.contains(&module.as_str()) => {
                Some(format!("{} module must not depend on crate::{module}", self.name))
            }
            PathRoot::External(krate) if self.forbidden_crates.contains(&krate.as_str()) => Some(
                format!("{} module must not depend on external crate `{krate}`", self.name),
            ),
            _ => None,
        }
    }
}

/// Lint the diary crate sources on disk.
///
/// `crate_dir` must be the `diary/` directory at the repository root.
pub fn lint_crate_sources(crate_dir: &Path) -> Result<(), ArchitectureLintError> {
    let src_dir = crate_dir.join("src");
    let mut sources = Vec::new();
    for rule in RULES {
        let layer_dir = src_dir.join(rule.name);
        if layer_dir.is_dir() {
            read_sources(&src_dir, &layer_dir, &mut sources)?;
        }
    }
    lint_sources(&sources)
}

/// Lint the provided Rust sources. Intended for unit and behaviour tests.
pub fn lint_sources(sources: &[LintSource]) -> Result<(), ArchitectureLintError> {
    let mut violations = Vec::new();
    for source in sources {
        let rule = LayerRule::for_path(&source.file).ok_or_else(|| ArchitectureLintError::Parse {
            file: source.file.clone(),
            message: "file is not under a linted layer".to_owned(),
        })?;
        let parsed =
            syn::parse_file(&source.contents).map_err(|err| ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: err.to_string(),
            })?;

        let mut collector = PathCollector::default();
        collector.visit_file(&parsed);
        let messages: BTreeSet<String> = collector
            .roots
            .iter()
            .filter_map(|root| rule.check(root))
            .collect();
        violations.extend(messages.into_iter().map(|message| Violation {
            file: source.file.clone(),
            message,
        }));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ArchitectureLintError::Violations(violations))
    }
}

/// Where a path points: a top-level module of the linted crate or another
/// crate.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum PathRoot {
    Internal(String),
    External(String),
}

impl PathRoot {
    /// Classify a path by its leading segments. Relative paths that do not
    /// name a top-level module (e.g. `super::ports`) yield `None`.
    fn classify(segments: &[String]) -> Option<Self> {
        let first = segments.first()?.as_str();
        match first {
            "crate" | "self" | "super" => segments
                .iter()
                .find(|segment| !matches!(segment.as_str(), "crate" | "self" | "super"))
                .filter(|segment| CRATE_MODULES.contains(&segment.as_str()))
                .map(|segment| Self::Internal(segment.clone())),
            CRATE_NAME => segments.get(1).map(|segment| Self::Internal(segment.clone())),
            module if CRATE_MODULES.contains(&module) => Some(Self::Internal(module.to_owned())),
            krate => Some(Self::External(krate.to_owned())),
        }
    }
}

/// Records the root of every path and `use` tree in a file.
#[derive(Default)]
struct PathCollector {
    roots: BTreeSet<PathRoot>,
}

impl PathCollector {
    fn record(&mut self, segments: &[String]) {
        if let Some(root) = PathRoot::classify(segments) {
            self.roots.insert(root);
        }
    }

    fn record_use_tree(&mut self, tree: &syn::UseTree, prefix: &mut Vec<String>) {
        match tree {
            syn::UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                self.record_use_tree(&path.tree, prefix);
                prefix.pop();
            }
            syn::UseTree::Name(syn::UseName { ident })
            | syn::UseTree::Rename(syn::UseRename { ident, .. }) => {
                prefix.push(ident.to_string());
                self.record(prefix);
                prefix.pop();
            }
            syn::UseTree::Glob(_) => self.record(prefix),
            syn::UseTree::Group(group) => {
                for item in &group.items {
                    self.record_use_tree(item, prefix);
                }
            }
        }
    }
}

impl<'ast> Visit<'ast> for PathCollector {
    fn visit_path(&mut self, node: &'ast syn::Path) {
        let segments: Vec<String> = node
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect();
        self.record(&segments);
        syn::visit::visit_path(self, node);
    }

    fn visit_item_use(&mut self, node: &'ast syn::ItemUse) {
        self.record_use_tree(&node.tree, &mut Vec::new());
    }
}

fn read_sources(
    src_root: &Path,
    dir: &Path,
    sources: &mut Vec<LintSource>,
) -> Result<(), ArchitectureLintError> {
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        for entry in fs::read_dir(&current)? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else if path.extension().is_some_and(|ext| ext == "rs") {
                let file = path
                    .strip_prefix(src_root)
                    .map_err(|err| ArchitectureLintError::Parse {
                        file: path.clone(),
                        message: err.to_string(),
                    })?
                    .to_path_buf();
                let contents = fs::read_to_string(&path)?;
                sources.push(LintSource { file, contents });
            }
        }
    }
    Ok(())
}
