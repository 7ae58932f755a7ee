//! Core domain models and logic for scrub
//!
//! This crate contains:
//! - The sensitive-data catalog (categories, keyword tables, placeholders)
//! - The shared text-redaction primitive
//! - Run statistics and the sanitization report

pub mod error;
pub mod patterns;
pub mod redactor;
pub mod report;
pub mod stats;

pub use error::{Error, Result};
pub use patterns::{CategorySpec, KeywordMatcher, Registry};
pub use redactor::TextRedactor;
pub use report::{Catalog, FileEntry, Report, REPORT_FILE};
pub use stats::RunStats;
