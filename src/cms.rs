//! Build-time checks for the CMS admin panel and the content it edits.

use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::content::collections;

pub const ADMIN_INDEX: &str = "index.html";
pub const ADMIN_CONFIG: &str = "config.yml";

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    pub detail: String,
}

impl CheckResult {
    fn pass(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            detail: detail.into(),
        }
    }

    fn fail(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            detail: detail.into(),
        }
    }
}

#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CmsReport {
    pub checks: Vec<CheckResult>,
}

impl CmsReport {
    pub fn is_ok(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.checks.iter().filter(|c| !c.passed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKey {
    /// 1-based line of the repeated key.
    pub line: usize,
    pub key: String,
}

struct Scope {
    indent: usize,
    keys: HashSet<String>,
}

/// Finds keys repeated within the same mapping of a YAML document.
///
/// Line based: indentation decides nesting, each list item opens a fresh
/// mapping, and block scalar bodies (`|`, `>`) are skipped. Flow collections
/// and multi-document streams are not understood.
pub fn find_duplicate_keys(yaml: &str) -> Vec<DuplicateKey> {
    let mut duplicates = Vec::new();
    let mut scopes: Vec<Scope> = Vec::new();
    let mut block_scalar_indent: Option<usize> = None;

    for (idx, raw) in yaml.lines().enumerate() {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed == "---" {
            continue;
        }
        let indent = raw.len() - raw.trim_start_matches(' ').len();

        if let Some(parent) = block_scalar_indent {
            if indent > parent {
                continue;
            }
            block_scalar_indent = None;
        }

        scopes.retain(|s| s.indent <= indent);

        let (column, rest) = if trimmed == "-" || trimmed.starts_with("- ") {
            let after_dash = &trimmed[1..];
            let content = after_dash.trim_start();
            let column = indent + 1 + (after_dash.len() - content.len());
            scopes.push(Scope {
                indent: column,
                keys: HashSet::new(),
            });
            (column, content)
        } else {
            if scopes.last().is_none_or(|s| s.indent != indent) {
                scopes.push(Scope {
                    indent,
                    keys: HashSet::new(),
                });
            }
            (indent, trimmed)
        };

        let Some((key, value)) = split_key(rest) else {
            continue;
        };
        if value.starts_with('|') || value.starts_with('>') {
            block_scalar_indent = Some(column);
        }
        if let Some(scope) = scopes.last_mut() {
            if !scope.keys.insert(key.clone()) {
                duplicates.push(DuplicateKey { line: idx + 1, key });
            }
        }
    }

    duplicates
}

/// `key: value` or `key:` → (key, value). Quotes around the key are dropped.
fn split_key(line: &str) -> Option<(String, &str)> {
    let pos = line
        .char_indices()
        .find(|&(i, c)| c == ':' && line[i + 1..].chars().next().is_none_or(char::is_whitespace))
        .map(|(i, _)| i)?;
    let key = line[..pos].trim().trim_matches(|c: char| c == '"' || c == '\'');
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), line[pos + 1..].trim()))
}

pub fn check_required_files(admin_dir: &Path, content_dir: &Path) -> Vec<CheckResult> {
    let mut required: Vec<PathBuf> = vec![admin_dir.join(ADMIN_INDEX), admin_dir.join(ADMIN_CONFIG)];
    required.extend(collections::ALL.iter().map(|f| content_dir.join(f)));

    required
        .into_iter()
        .map(|path| {
            let name = format!("exists: {}", path.display());
            if path.is_file() {
                CheckResult::pass(name, "found")
            } else {
                CheckResult::fail(name, "missing")
            }
        })
        .collect()
}

/// Every `*.json` file directly under `content_dir` must parse.
pub fn check_json_files(content_dir: &Path) -> Vec<CheckResult> {
    let entries = match std::fs::read_dir(content_dir) {
        Ok(entries) => entries,
        Err(e) => {
            return vec![CheckResult::fail(
                format!("read: {}", content_dir.display()),
                e.to_string(),
            )];
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();

    files
        .into_iter()
        .map(|path| {
            let name = format!("json: {}", path.display());
            let parsed = std::fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|raw| {
                    serde_json::from_str::<serde_json::Value>(&raw).map_err(|e| e.to_string())
                });
            match parsed {
                Ok(_) => CheckResult::pass(name, "valid JSON"),
                Err(e) => CheckResult::fail(name, e),
            }
        })
        .collect()
}

pub fn check_config_keys(admin_dir: &Path) -> CheckResult {
    let path = admin_dir.join(ADMIN_CONFIG);
    let name = format!("keys: {}", path.display());
    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) => return CheckResult::fail(name, e.to_string()),
    };

    let duplicates = find_duplicate_keys(&raw);
    if duplicates.is_empty() {
        CheckResult::pass(name, "no duplicate keys")
    } else {
        let detail = duplicates
            .iter()
            .map(|d| format!("line {}: duplicate key {:?}", d.line, d.key))
            .collect::<Vec<_>>()
            .join("; ");
        CheckResult::fail(name, detail)
    }
}

pub fn validate(admin_dir: &Path, content_dir: &Path) -> CmsReport {
    let mut checks = check_required_files(admin_dir, content_dir);
    checks.extend(check_json_files(content_dir));
    checks.push(check_config_keys(admin_dir));

    let report = CmsReport { checks };
    for failure in report.failures() {
        log::warn!("CMS check failed [{}]: {}", failure.name, failure.detail);
    }
    report
}
