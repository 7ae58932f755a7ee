//! The built-in sensitive-data catalog.
//!
//! Everything here is plain data: category names with their label
//! lexemes, the keyword table for structured-data keys, and the
//! substring table for relational column names. The engine receives a
//! [`Registry`] at construction; nothing in this module is process-wide
//! state.

use serde::{Deserialize, Serialize};

/// One sensitive-data category: a name plus the ordered label lexemes
/// that identify it in `label: value` / `label=value` text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySpec {
    pub name: String,
    pub labels: Vec<String>,
}

impl CategorySpec {
    pub fn new(name: &str, labels: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
        }
    }

    /// Placeholder substituted for values this category matches:
    /// the category name upper-cased with the trailing plural `S` stripped,
    /// e.g. `api_keys` -> `PLACEHOLDER_API_KEY`.
    pub fn placeholder(&self) -> String {
        format!(
            "PLACEHOLDER_{}",
            self.name.to_uppercase().trim_end_matches('S')
        )
    }
}

/// Placeholder for key-based wholesale redaction in structured data.
pub fn key_placeholder(key: &str) -> String {
    format!("PLACEHOLDER_{}", key.to_uppercase())
}

/// Placeholder for relational column redaction.
pub fn column_placeholder(column: &str) -> String {
    format!("PLACEHOLDER_{}", column.to_uppercase())
}

/// Immutable sensitive-data configuration injected into the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registry {
    /// Pattern categories, in reporting order.
    pub categories: Vec<CategorySpec>,
    /// Keywords that flag a structured-data key as sensitive.
    pub key_keywords: Vec<String>,
    /// Substrings that flag a relational column as sensitive.
    pub column_keywords: Vec<String>,
}

impl Registry {
    /// The built-in catalog.
    ///
    /// Compound lexemes (`rpc-password`, `access_token`, ...) precede
    /// their roots so a match starting at the compound key captures the
    /// whole label into the preserved prefix.
    pub fn builtin() -> Self {
        Self {
            categories: vec![
                CategorySpec::new("api_keys", &["x-api-key", "api_key", "api-key", "apikey"]),
                CategorySpec::new(
                    "passwords",
                    &["rpc-password", "controlpassword", "password"],
                ),
                CategorySpec::new(
                    "usernames",
                    &["rpc-username", "controlusername", "username"],
                ),
                CategorySpec::new("secrets", &["client_secret", "secret"]),
                CategorySpec::new("tokens", &["access_token", "refresh_token", "token"]),
                CategorySpec::new("auth", &["authorization", "auth"]),
            ],
            key_keywords: [
                "api",
                "key",
                "password",
                "secret",
                "token",
                "auth",
                "username",
                "user",
                "pass",
                "credential",
            ]
            .iter()
            .map(|k| k.to_string())
            .collect(),
            column_keywords: [
                "apikey", "password", "secret", "token", "auth", "username", "user", "pass",
                "key",
            ]
            .iter()
            .map(|k| k.to_string())
            .collect(),
        }
    }

    pub fn category_names(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.name.clone()).collect()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Case-insensitive substring matcher over a fixed keyword set.
///
/// Used both as the key-sensitivity classifier for structured data and
/// as the sensitive-column heuristic for relational files. Matching on
/// bare substrings is deliberately broad: a column literally named
/// `SortKey` matches `key` and is redacted.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    keywords: Vec<String>,
}

impl KeywordMatcher {
    pub fn new(keywords: &[String]) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    /// True iff the lower-cased name contains any keyword.
    pub fn matches(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.keywords.iter().any(|k| name.contains(k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_placeholders() {
        let registry = Registry::builtin();
        let placeholders: Vec<String> =
            registry.categories.iter().map(|c| c.placeholder()).collect();
        assert_eq!(
            placeholders,
            vec![
                "PLACEHOLDER_API_KEY",
                "PLACEHOLDER_PASSWORD",
                "PLACEHOLDER_USERNAME",
                "PLACEHOLDER_SECRET",
                "PLACEHOLDER_TOKEN",
                "PLACEHOLDER_AUTH",
            ]
        );
    }

    #[test]
    fn test_key_placeholder_uppercases() {
        assert_eq!(key_placeholder("username"), "PLACEHOLDER_USERNAME");
        assert_eq!(key_placeholder("ApiKey"), "PLACEHOLDER_APIKEY");
    }

    #[test]
    fn test_key_classifier() {
        let registry = Registry::builtin();
        let keys = KeywordMatcher::new(&registry.key_keywords);

        assert!(keys.matches("username"));
        assert!(keys.matches("ApiKey"));
        assert!(keys.matches("client_credentials"));
        assert!(!keys.matches("note"));
        assert!(!keys.matches("hostname"));
    }

    #[test]
    fn test_column_heuristic_is_substring_based() {
        let registry = Registry::builtin();
        let columns = KeywordMatcher::new(&registry.column_keywords);

        assert!(columns.matches("Password"));
        assert!(columns.matches("ApiKey"));
        // Documented breadth: any column name containing "key" or "user"
        // is flagged, including ones that are not secrets.
        assert!(columns.matches("SortKey"));
        assert!(columns.matches("UserAgent"));
        assert!(!columns.matches("Title"));
    }

    #[test]
    fn test_registry_serialization_round_trip() {
        let registry = Registry::builtin();
        let json = serde_json::to_string(&registry).unwrap();
        let parsed: Registry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.category_names(), registry.category_names());
        assert_eq!(parsed.column_keywords, registry.column_keywords);
    }
}
