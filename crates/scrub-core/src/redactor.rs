//! The shared text-redaction primitive.
//!
//! Every walker funnels leaf values through [`TextRedactor::redact`].
//! One compiled scanner finds `(label, separator, value)` spans in a
//! single pass over the input; the matched label is classified against
//! the category table and only the value span is replaced. A single
//! pass means a category can never re-match text rewritten by another
//! one, and category order matters only for attribution.

use regex::{Captures, Regex};

use crate::patterns::Registry;

pub struct TextRedactor {
    scanner: Option<Regex>,
    categories: Vec<CompiledCategory>,
}

struct CompiledCategory {
    matcher: Regex,
    placeholder: String,
}

impl TextRedactor {
    /// Compile a redactor from the registry's label lexemes.
    ///
    /// Lexemes that fail to compile are skipped; a registry with no
    /// usable lexemes yields the identity redactor. Compilation
    /// problems never surface past this constructor.
    pub fn new(registry: &Registry) -> Self {
        let mut categories = Vec::new();
        let mut lexemes: Vec<String> = Vec::new();

        for spec in &registry.categories {
            let valid: Vec<&str> = spec
                .labels
                .iter()
                .map(String::as_str)
                .filter(|l| !l.is_empty() && Regex::new(l).is_ok())
                .collect();
            if valid.is_empty() {
                continue;
            }
            let matcher = match Regex::new(&format!("(?i)^(?:{})$", valid.join("|"))) {
                Ok(re) => re,
                Err(_) => continue,
            };
            categories.push(CompiledCategory {
                matcher,
                placeholder: spec.placeholder(),
            });
            lexemes.extend(valid.iter().map(|l| l.to_string()));
        }

        // Label (optionally quoted), `:` or `=` separator, optional
        // opening quote, then the value span up to the next delimiter.
        let scanner = if lexemes.is_empty() {
            None
        } else {
            Regex::new(&format!(
                r#"(?i)("?((?:{}))"?\s*[:=]\s*["']?)([^"'<>\r\n]+)"#,
                lexemes.join("|")
            ))
            .ok()
        };

        Self { scanner, categories }
    }

    /// Redact all recognizable `label: value` spans in `text`.
    ///
    /// Returns the redacted text and the number of substitutions that
    /// actually changed a value. The preserved prefix (label, quotes,
    /// separator) is re-emitted verbatim; a value that already equals
    /// its placeholder is rewritten identically and not counted, so
    /// repeated runs report zero. Statistics are the caller's job.
    pub fn redact(&self, text: &str) -> (String, u64) {
        let Some(scanner) = &self.scanner else {
            return (text.to_string(), 0);
        };
        if text.is_empty() {
            return (String::new(), 0);
        }

        let mut count = 0u64;
        let out = scanner.replace_all(text, |caps: &Captures| {
            let prefix = &caps[1];
            let label = &caps[2];
            let value = &caps[3];
            match self.placeholder_for(label) {
                Some(placeholder) => {
                    if value != placeholder {
                        count += 1;
                    }
                    format!("{prefix}{placeholder}")
                }
                None => format!("{prefix}{value}"),
            }
        });
        (out.into_owned(), count)
    }

    /// First category (registry order) whose lexemes cover the label.
    fn placeholder_for(&self, label: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.matcher.is_match(label))
            .map(|c| c.placeholder.as_str())
    }
}
