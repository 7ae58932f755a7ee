//! The durable per-run artifact.

use std::path::Path;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::patterns::Registry;
use crate::stats::RunStats;
use crate::Result;

/// File name of the report artifact inside the output directory.
pub const REPORT_FILE: &str = "sanitization-report.json";

/// Immutable snapshot of one sanitization run.
///
/// Built once after all files were processed and never mutated;
/// persisted as pretty-printed JSON at [`REPORT_FILE`] so sanitized
/// trees are auditable and diffable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub app_name: String,
    pub run_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub source_directory: String,
    pub output_directory: String,
    pub statistics: RunStats,
    pub files: Vec<FileEntry>,
    pub catalog: Catalog,
}

/// One output file, with size and inferred type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: String,
    pub size_bytes: u64,
    pub file_type: String,
}

impl FileEntry {
    /// Type tag for a path: the extension with its leading dot, or
    /// `no_extension`.
    pub fn file_type_of(path: &Path) -> String {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => format!(".{ext}"),
            None => "no_extension".to_string(),
        }
    }
}

/// The static catalog recorded for auditability: which categories and
/// column substrings this run recognized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub description: String,
    pub categories: Vec<String>,
    pub database_columns: Vec<String>,
}

impl Catalog {
    pub fn from_registry(registry: &Registry) -> Self {
        Self {
            description: "Patterns used to identify and sanitize sensitive data".to_string(),
            categories: registry.category_names(),
            database_columns: registry.column_keywords.clone(),
        }
    }
}

impl Report {
    /// Persist the report inside `dir` at the well-known path.
    pub fn write_to(&self, dir: &Path) -> Result<std::path::PathBuf> {
        let path = dir.join(REPORT_FILE);
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> Report {
        Report {
            app_name: "sonarr".to_string(),
            run_id: uuid::Uuid::new_v4().to_string(),
            timestamp: OffsetDateTime::UNIX_EPOCH,
            source_directory: "/cfg/sonarr".to_string(),
            output_directory: "/out/sonarr".to_string(),
            statistics: RunStats::default(),
            files: vec![FileEntry {
                path: "config.xml".to_string(),
                size_bytes: 42,
                file_type: ".xml".to_string(),
            }],
            catalog: Catalog::from_registry(&Registry::builtin()),
        }
    }

    #[test]
    fn test_report_round_trip() {
        let report = sample_report();
        let json = serde_json::to_string_pretty(&report).unwrap();
        let parsed: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.app_name, "sonarr");
        assert_eq!(parsed.files.len(), 1);
        assert_eq!(parsed.catalog.categories.len(), 6);
        assert_eq!(parsed.timestamp, OffsetDateTime::UNIX_EPOCH);
    }

    #[test]
    fn test_file_type_inference() {
        assert_eq!(FileEntry::file_type_of(Path::new("a/config.xml")), ".xml");
        assert_eq!(FileEntry::file_type_of(Path::new("a/nzbdrone.db")), ".db");
        assert_eq!(
            FileEntry::file_type_of(Path::new("a/credentials")),
            "no_extension"
        );
    }

    #[test]
    fn test_write_to_creates_artifact() {
        let dir = std::env::temp_dir().join(format!("scrub-test-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();

        let path = sample_report().write_to(&dir).unwrap();
        assert_eq!(path.file_name().unwrap(), REPORT_FILE);
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"app_name\": \"sonarr\""));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
