use std::fmt;
use std::fs;
use std::io::{ErrorKind, Write};
use std::ops::Range;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::domain::assignment::{splice_value, AssignmentPattern};
use crate::error::{Result, VersionSyncError};

/// Which of the two version-bearing documents a record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// `pyproject.toml`, authoritative for the version
    Config,
    /// The package's `__init__.py`
    Module,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Config => write!(f, "config document"),
            DocumentKind::Module => write!(f, "module document"),
        }
    }
}

/// A document on disk holding one version assignment.
///
/// Read once per run; [`VersionRecord::apply`] rewrites the whole file with
/// only the version value changed.
#[derive(Debug, Clone)]
pub struct VersionRecord {
    pub path: PathBuf,
    pub kind: DocumentKind,
    pub raw_text: String,
    pub version: String,
    value_range: Range<usize>,
}

impl VersionRecord {
    /// Read `path` and extract its version.
    ///
    /// # Returns
    /// * `Err(MissingFile)` - If the path does not exist
    /// * `Err(PatternNotFound)` - If no assignment for the pattern's key is present
    pub fn read(
        path: impl AsRef<Path>,
        kind: DocumentKind,
        pattern: &AssignmentPattern,
    ) -> Result<Self> {
        let path = path.as_ref();
        let raw_text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(VersionSyncError::missing_file(path))
            }
            Err(e) => return Err(e.into()),
        };

        let record = Self::parse(path, kind, raw_text, pattern)?;
        debug!(path = %record.path.display(), kind = %kind, version = %record.version, "read version record");
        Ok(record)
    }

    /// Extract the version from already loaded text.
    ///
    /// A config document is parsed as TOML first and its `project.<key>` or
    /// `tool.poetry.<key>` value located inside that table's text. Only when
    /// neither key is present (or the text is not TOML) is the first textual
    /// assignment used.
    pub fn parse(
        path: impl AsRef<Path>,
        kind: DocumentKind,
        raw_text: String,
        pattern: &AssignmentPattern,
    ) -> Result<Self> {
        let path = path.as_ref();

        let structured = match kind {
            DocumentKind::Config => structured_version(&raw_text, pattern.key()),
            DocumentKind::Module => None,
        };

        let assignment = match &structured {
            Some((table, version)) => table_body(&raw_text, table).and_then(|span| {
                pattern.find_value_in(&raw_text, span, version)
            }),
            None => pattern.find_first(&raw_text),
        }
        .ok_or_else(|| VersionSyncError::pattern_not_found(path, pattern.key()))?;

        let version = assignment.value.to_string();
        let value_range = assignment.value_range.clone();

        Ok(VersionRecord {
            path: path.to_path_buf(),
            kind,
            raw_text,
            version,
            value_range,
        })
    }

    /// The document text with its version replaced by `new_version`
    pub fn render(&self, new_version: &str) -> String {
        splice_value(&self.raw_text, self.value_range.clone(), new_version)
    }

    /// Rewrite the document with `new_version`.
    ///
    /// # Returns
    /// * `Ok(true)` - The file was rewritten
    /// * `Ok(false)` - The file already holds `new_version`; nothing was written
    pub fn apply(&self, new_version: &str) -> Result<bool> {
        if new_version == self.version {
            debug!(path = %self.path.display(), version = new_version, "version unchanged, not writing");
            return Ok(false);
        }

        write_whole_file(&self.path, &self.render(new_version))?;
        info!(path = %self.path.display(), from = %self.version, to = new_version, "rewrote version");
        Ok(true)
    }
}

/// Tables searched for the version, in order of preference
const VERSION_TABLES: [&str; 2] = ["project", "tool.poetry"];

/// Look the version key up in the `[project]` and `[tool.poetry]` tables.
///
/// Returns the dotted table name alongside the value.
fn structured_version(text: &str, key: &str) -> Option<(&'static str, String)> {
    let document = match toml::from_str::<toml::Table>(text) {
        Ok(document) => document,
        Err(e) => {
            debug!(error = %e, "config document is not valid TOML, using text pattern");
            return None;
        }
    };

    VERSION_TABLES.iter().find_map(|&name| {
        let table = name
            .split('.')
            .try_fold(&document, |table, part| table.get(part)?.as_table())?;
        let version = table.get(key)?.as_str()?;
        Some((name, version.to_string()))
    })
}

/// Byte range between the `[name]` header and the next table header
fn table_body(text: &str, name: &str) -> Option<Range<usize>> {
    let mut body_start = None;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();

        if let Some(header) = table_header(line) {
            if let Some(start) = body_start {
                return Some(start..line_start);
            }
            if header == name {
                body_start = Some(offset);
            }
        }
    }

    body_start.map(|start| start..text.len())
}

/// Dotted name of a `[table]` or `[[array]]` header line
fn table_header(line: &str) -> Option<String> {
    let line = line.trim_start_matches('\u{feff}').trim();
    let inner = line.strip_prefix('[')?;
    let inner = inner.strip_prefix('[').unwrap_or(inner);
    let end = inner.find(']')?;

    let rest = inner[end..].trim_start_matches(']').trim_start();
    if !rest.is_empty() && !rest.starts_with('#') {
        return None;
    }

    let name = inner[..end]
        .split('.')
        .map(|part| part.trim().trim_matches(|c: char| c == '"' || c == '\''))
        .collect::<Vec<_>>()
        .join(".");
    Some(name)
}

/// Replace `path` in one step: write a sibling temp file, then rename it over the target.
///
/// Symlinks are resolved first so the link survives and its target is rewritten.
fn write_whole_file(path: &Path, contents: &str) -> Result<()> {
    let target = fs::canonicalize(path)?;
    let dir = target.parent().unwrap_or_else(|| Path::new("."));

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.as_file().sync_all()?;

    let permissions = fs::metadata(&target)?.permissions();
    fs::set_permissions(tmp.path(), permissions)?;

    tmp.persist(&target).map_err(|e| e.error)?;
    Ok(())
}
