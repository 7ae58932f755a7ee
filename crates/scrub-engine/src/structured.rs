//! Structured-data walkers (JSON and YAML).
//!
//! Pure transforms: the walkers return a new value that is structurally
//! isomorphic to the input (same container types, key sets, ordering
//! and sequence lengths) with only string leaves changed. A key that
//! looks sensitive overrides its (non-empty string) value wholesale
//! with `PLACEHOLDER_<KEY>`, independently of the pattern pass.

use std::path::Path;

use scrub_core::{patterns, KeywordMatcher, TextRedactor};
use serde_json::Value as JsonValue;
use serde_yaml::value::TaggedValue;
use serde_yaml::Value as YamlValue;
use tracing::warn;

use crate::{text, Result};

pub(crate) fn sanitize_json_file(
    path: &Path,
    redactor: &TextRedactor,
    keys: &KeywordMatcher,
) -> Result<u64> {
    let (content, encoding) = text::read_text(path)?;
    let value: JsonValue = match serde_json::from_str(&content) {
        Ok(value) => value,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "could not parse JSON, redacting as text");
            return text::sanitize_file(path, redactor);
        }
    };

    let mut count = 0;
    let sanitized = sanitize_json_value(&value, redactor, keys, &mut count);
    if count > 0 {
        text::write_text(path, &serde_json::to_string_pretty(&sanitized)?, encoding)?;
    }
    Ok(count)
}

pub(crate) fn sanitize_yaml_file(
    path: &Path,
    redactor: &TextRedactor,
    keys: &KeywordMatcher,
) -> Result<u64> {
    let (content, encoding) = text::read_text(path)?;
    let value: YamlValue = match serde_yaml::from_str(&content) {
        Ok(value) => value,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "could not parse YAML, redacting as text");
            return text::sanitize_file(path, redactor);
        }
    };

    let mut count = 0;
    let sanitized = sanitize_yaml_value(&value, redactor, keys, &mut count);
    if count > 0 {
        text::write_text(path, &serde_yaml::to_string(&sanitized)?, encoding)?;
    }
    Ok(count)
}

pub(crate) fn sanitize_json_value(
    value: &JsonValue,
    redactor: &TextRedactor,
    keys: &KeywordMatcher,
    count: &mut u64,
) -> JsonValue {
    match value {
        JsonValue::Object(map) => {
            let mut out = serde_json::Map::new();
            for (key, val) in map {
                let mut sanitized = sanitize_json_value(val, redactor, keys, count);
                // The override looks at the pre-recursion value: only a
                // key whose value was a non-empty string is replaced.
                if keys.matches(key) {
                    if let JsonValue::String(s) = val {
                        if !s.is_empty() {
                            let placeholder = patterns::key_placeholder(key);
                            if sanitized.as_str() != Some(placeholder.as_str()) {
                                *count += 1;
                            }
                            sanitized = JsonValue::String(placeholder);
                        }
                    }
                }
                out.insert(key.clone(), sanitized);
            }
            JsonValue::Object(out)
        }
        JsonValue::Array(items) => JsonValue::Array(
            items
                .iter()
                .map(|item| sanitize_json_value(item, redactor, keys, count))
                .collect(),
        ),
        JsonValue::String(s) => {
            let (redacted, n) = redactor.redact(s);
            *count += n;
            JsonValue::String(redacted)
        }
        other => other.clone(),
    }
}

pub(crate) fn sanitize_yaml_value(
    value: &YamlValue,
    redactor: &TextRedactor,
    keys: &KeywordMatcher,
    count: &mut u64,
) -> YamlValue {
    match value {
        YamlValue::Mapping(map) => {
            let mut out = serde_yaml::Mapping::new();
            for (key, val) in map {
                let mut sanitized = sanitize_yaml_value(val, redactor, keys, count);
                if let YamlValue::String(key_name) = key {
                    if keys.matches(key_name) {
                        if let YamlValue::String(s) = val {
                            if !s.is_empty() {
                                let placeholder = patterns::key_placeholder(key_name);
                                if sanitized.as_str() != Some(placeholder.as_str()) {
                                    *count += 1;
                                }
                                sanitized = YamlValue::String(placeholder);
                            }
                        }
                    }
                }
                out.insert(key.clone(), sanitized);
            }
            YamlValue::Mapping(out)
        }
        YamlValue::Sequence(items) => YamlValue::Sequence(
            items
                .iter()
                .map(|item| sanitize_yaml_value(item, redactor, keys, count))
                .collect(),
        ),
        YamlValue::String(s) => {
            let (redacted, n) = redactor.redact(s);
            *count += n;
            YamlValue::String(redacted)
        }
        YamlValue::Tagged(tagged) => YamlValue::Tagged(Box::new(TaggedValue {
            tag: tagged.tag.clone(),
            value: sanitize_yaml_value(&tagged.value, redactor, keys, count),
        })),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrub_core::Registry;
    use serde_json::json;

    fn walk_json(value: JsonValue) -> (JsonValue, u64) {
        let registry = Registry::builtin();
        let redactor = TextRedactor::new(&registry);
        let keys = KeywordMatcher::new(&registry.key_keywords);
        let mut count = 0;
        let out = sanitize_json_value(&value, &redactor, &keys, &mut count);
        (out, count)
    }

    #[test]
    fn test_sensitive_key_overridden() {
        let (out, count) = walk_json(json!({"username": "admin", "note": "hello"}));
        assert_eq!(
            out,
            json!({"username": "PLACEHOLDER_USERNAME", "note": "hello"})
        );
        assert_eq!(count, 1);
    }

    #[test]
    fn test_nested_containers_preserved() {
        let (out, count) = walk_json(json!({
            "server": {"host": "localhost", "apiKey": "deadbeef"},
            "ports": [8080, 8443],
            "tls": true,
            "proxy": null
        }));
        assert_eq!(
            out,
            json!({
                "server": {"host": "localhost", "apiKey": "PLACEHOLDER_APIKEY"},
                "ports": [8080, 8443],
                "tls": true,
                "proxy": null
            })
        );
        assert_eq!(count, 1);
    }

    #[test]
    fn test_override_only_applies_to_string_values() {
        // `token` maps to an object, so there is nothing to override;
        // recursion still reaches the inner pair.
        let (out, count) = walk_json(json!({"token": {"expires": 3600, "note": "keep"}}));
        assert_eq!(out, json!({"token": {"expires": 3600, "note": "keep"}}));
        assert_eq!(count, 0);
    }

    #[test]
    fn test_empty_string_value_not_overridden() {
        let (out, count) = walk_json(json!({"password": ""}));
        assert_eq!(out, json!({"password": ""}));
        assert_eq!(count, 0);
    }

    #[test]
    fn test_scalar_pattern_pass_inside_array() {
        let (out, count) = walk_json(json!(["password=s3cr3t", "plain"]));
        assert_eq!(out, json!(["password=PLACEHOLDER_PASSWORD", "plain"]));
        assert_eq!(count, 1);
    }

    #[test]
    fn test_second_pass_counts_nothing() {
        let (first, _) = walk_json(json!({"username": "admin", "apikey": "abc"}));
        let (second, count) = walk_json(first.clone());
        assert_eq!(second, first);
        assert_eq!(count, 0);
    }

    #[test]
    fn test_key_order_preserved() {
        let (out, _) = walk_json(json!({"zeta": "1", "alpha": "2", "password": "x"}));
        let keys: Vec<&str> = out.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "password"]);
    }

    #[test]
    fn test_yaml_mapping_and_sequence() {
        let registry = Registry::builtin();
        let redactor = TextRedactor::new(&registry);
        let keys = KeywordMatcher::new(&registry.key_keywords);

        let value: YamlValue =
            serde_yaml::from_str("username: admin\nservers:\n  - host: a\n  - host: b\n").unwrap();
        let mut count = 0;
        let out = sanitize_yaml_value(&value, &redactor, &keys, &mut count);

        assert_eq!(count, 1);
        assert_eq!(
            out["username"],
            YamlValue::String("PLACEHOLDER_USERNAME".to_string())
        );
        assert_eq!(out["servers"].as_sequence().unwrap().len(), 2);
    }

    #[test]
    fn test_yaml_non_string_keys_pass_through() {
        let registry = Registry::builtin();
        let redactor = TextRedactor::new(&registry);
        let keys = KeywordMatcher::new(&registry.key_keywords);

        let value: YamlValue = serde_yaml::from_str("1: one\ntrue: yes\n").unwrap();
        let mut count = 0;
        let out = sanitize_yaml_value(&value, &redactor, &keys, &mut count);
        assert_eq!(out, value);
        assert_eq!(count, 0);
    }
}
