use std::path::{Path, PathBuf};

use scrub_core::{CategorySpec, Registry};
use serde::{Deserialize, Serialize};

/// Optional overrides for the built-in sensitive-data catalog.
///
/// Every table falls back to the built-in catalog, so a config file
/// only needs the parts it changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_categories")]
    pub categories: Vec<CategorySpec>,

    #[serde(default = "default_key_keywords")]
    pub sensitive_keys: Vec<String>,

    #[serde(default = "default_column_keywords")]
    pub sensitive_columns: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            sensitive_keys: default_key_keywords(),
            sensitive_columns: default_column_keywords(),
        }
    }
}

fn default_categories() -> Vec<CategorySpec> {
    Registry::builtin().categories
}

fn default_key_keywords() -> Vec<String> {
    Registry::builtin().key_keywords
}

fn default_column_keywords() -> Vec<String> {
    Registry::builtin().column_keywords
}

impl Config {
    /// Load config from an explicit path, the default location, or
    /// fall back to the built-in catalog.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = path {
            let content = std::fs::read_to_string(path)?;
            return Ok(toml::from_str(&content)?);
        }

        let path = Self::config_path();
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Config::default())
        }
    }

    /// Get config file path
    pub fn config_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("com", "scrub", "scrub") {
            dirs.config_dir().join("scrub.toml")
        } else {
            PathBuf::from("~/.scrub/scrub.toml")
        }
    }

    /// The catalog injected into the engine.
    pub fn registry(&self) -> Registry {
        Registry {
            categories: self.categories.clone(),
            key_keywords: self.sensitive_keys.clone(),
            column_keywords: self.sensitive_columns.clone(),
        }
    }
}
