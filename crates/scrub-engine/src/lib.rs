//! Sanitization engine for scrub
//!
//! This crate provides:
//! - Format-specific walkers (markup, structured data, relational, line-oriented)
//! - Extension dispatch and the per-tree driver
//! - Report finalization
//!
//! The engine owns no persistent state: a [`Sanitizer`] is constructed
//! per run from an injected [`Registry`] and discarded after
//! [`Sanitizer::finish`] returns the report.

mod database;
mod markup;
mod structured;
mod text;

pub mod error;

pub use error::{Error, Result};

use std::path::{Path, PathBuf};

use scrub_core::{Catalog, FileEntry, KeywordMatcher, Registry, Report, RunStats, TextRedactor};
use time::OffsetDateTime;
use tracing::{debug, error, info};
use walkdir::WalkDir;

/// How a file is processed, decided by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Database,
    Markup,
    Structured,
    Text,
}

const DATABASE_EXTENSIONS: &[&str] = &["db"];
const MARKUP_EXTENSIONS: &[&str] = &["xml"];
const STRUCTURED_EXTENSIONS: &[&str] = &["json", "yml", "yaml"];
const TEXT_EXTENSIONS: &[&str] = &["conf", "cfg", "ini", "properties"];

/// Dispatch group for a path, or `None` for files that are copied
/// verbatim and never processed.
pub fn kind_of(path: &Path) -> Option<FileKind> {
    let ext = path.extension().and_then(|e| e.to_str())?.to_lowercase();
    let ext = ext.as_str();
    if DATABASE_EXTENSIONS.contains(&ext) {
        Some(FileKind::Database)
    } else if MARKUP_EXTENSIONS.contains(&ext) {
        Some(FileKind::Markup)
    } else if STRUCTURED_EXTENSIONS.contains(&ext) {
        Some(FileKind::Structured)
    } else if TEXT_EXTENSIONS.contains(&ext) {
        Some(FileKind::Text)
    } else {
        None
    }
}

/// One sanitization run over a staged copy of a configuration tree.
pub struct Sanitizer {
    registry: Registry,
    redactor: TextRedactor,
    keys: KeywordMatcher,
    columns: KeywordMatcher,
    stats: RunStats,
    app_name: String,
    source: PathBuf,
    output: PathBuf,
}

impl Sanitizer {
    /// Create a run. Fails fast if the source directory does not exist
    /// (the only fatal precondition); creates the output directory.
    pub fn new(registry: Registry, source: &Path, output: &Path, app_name: &str) -> Result<Self> {
        if !source.is_dir() {
            return Err(Error::SourceMissing(source.to_path_buf()));
        }
        std::fs::create_dir_all(output)?;

        let redactor = TextRedactor::new(&registry);
        let keys = KeywordMatcher::new(&registry.key_keywords);
        let columns = KeywordMatcher::new(&registry.column_keywords);

        Ok(Self {
            registry,
            redactor,
            keys,
            columns,
            stats: RunStats::default(),
            app_name: app_name.to_lowercase(),
            source: source.to_path_buf(),
            output: output.to_path_buf(),
        })
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Sanitize one file, dispatching on its extension. Files outside
    /// the dispatch table are left as copied.
    pub fn sanitize_path(&mut self, path: &Path) -> Result<()> {
        match kind_of(path) {
            Some(FileKind::Database) => {
                info!(path = %path.display(), "sanitizing database");
                let count = database::sanitize_database(path, &self.columns)?;
                self.stats.record_redactions(count);
                self.stats.record_database();
            }
            Some(FileKind::Markup) => {
                debug!(path = %path.display(), "sanitizing markup file");
                let count = markup::sanitize_file(path, &self.redactor)?;
                self.stats.record_redactions(count);
                self.stats.record_file();
            }
            Some(FileKind::Structured) => {
                debug!(path = %path.display(), "sanitizing structured file");
                let is_json = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("json"));
                let count = if is_json {
                    structured::sanitize_json_file(path, &self.redactor, &self.keys)?
                } else {
                    structured::sanitize_yaml_file(path, &self.redactor, &self.keys)?
                };
                self.stats.record_redactions(count);
                self.stats.record_file();
            }
            Some(FileKind::Text) => {
                debug!(path = %path.display(), "sanitizing config file");
                let count = text::sanitize_file(path, &self.redactor)?;
                self.stats.record_redactions(count);
                self.stats.record_file();
            }
            None => {}
        }
        Ok(())
    }

    /// Process the whole staged tree: databases first, then markup,
    /// structured data and line-oriented files. A failure in one unit
    /// of work is logged with its path and does not stop the run.
    pub fn sanitize_tree(&mut self) {
        let mut groups: [Vec<PathBuf>; 4] = Default::default();
        for entry in WalkDir::new(&self.output).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    error!(error = %err, "failed to enumerate output entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(kind) = kind_of(entry.path()) {
                groups[kind as usize].push(entry.into_path());
            }
        }

        for path in groups.iter().flatten() {
            if let Err(err) = self.sanitize_path(path) {
                error!(path = %path.display(), error = %err, "failed to sanitize, leaving file as copied");
            }
        }
    }

    /// Build the run report, persist it at the well-known path inside
    /// the output directory and return it.
    pub fn finish(self) -> Result<Report> {
        let files = self.list_output_files()?;
        let report = Report {
            app_name: self.app_name.clone(),
            run_id: uuid::Uuid::new_v4().to_string(),
            timestamp: OffsetDateTime::now_utc(),
            source_directory: self.source.display().to_string(),
            output_directory: self.output.display().to_string(),
            statistics: self.stats.clone(),
            files,
            catalog: Catalog::from_registry(&self.registry),
        };
        report.write_to(&self.output)?;
        info!(stats = ?report.statistics, "sanitization finished");
        Ok(report)
    }

    fn list_output_files(&self) -> Result<Vec<FileEntry>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.output).sort_by_file_name() {
            let entry = entry.map_err(std::io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let metadata = entry.metadata().map_err(std::io::Error::from)?;
            let relative = entry
                .path()
                .strip_prefix(&self.output)
                .unwrap_or_else(|_| entry.path());
            files.push(FileEntry {
                path: relative.display().to_string(),
                size_bytes: metadata.len(),
                file_type: FileEntry::file_type_of(entry.path()),
            });
        }
        Ok(files)
    }
}
