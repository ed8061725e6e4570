//! Localised string resolution.
//!
//! Strings may carry positional arguments written `{%1}`, `{%2}`, ... which
//! `resolve_args` fills in. The default `Translations` store is a YAML map of
//! language -> key -> string:
//!
//! ```yaml
//! en:
//!   objective.catch: "Catch a Pokémon"
//!   objective.catch.plural: "Catch {%1} Pokémon"
//! ```

use crate::error::HookError;
use std::collections::HashMap;

/// Localised string lookup
pub trait Localizer: Send + Sync {
    /// Resolve a key in the given language
    fn resolve(&self, language: &str, key: &str) -> String;

    /// Resolve a key and substitute positional `{%N}` arguments (1-based)
    fn resolve_args(&self, language: &str, key: &str, args: &[String]) -> String {
        fill_args(&self.resolve(language, key), args)
    }
}

/// Substitute `{%N}` placeholders in one left-to-right pass.
///
/// Inserted arguments are never scanned again. Placeholders without a
/// matching argument are left as written.
fn fill_args(text: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("{%") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let digits = after.bytes().take_while(u8::is_ascii_digit).count();
        let arg = if digits > 0 && after[digits..].starts_with('}') {
            after[..digits]
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| args.get(i))
        } else {
            None
        };
        match arg {
            Some(arg) => {
                out.push_str(arg);
                rest = &after[digits + 1..];
            }
            None => {
                out.push_str("{%");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

const DEFAULT_FALLBACK_LANGUAGE: &str = "en";

/// In-memory string tables keyed by language
#[derive(Debug, Clone)]
pub struct Translations {
    fallback: String,
    strings: HashMap<String, HashMap<String, String>>,
}

impl Default for Translations {
    fn default() -> Self {
        Self {
            fallback: DEFAULT_FALLBACK_LANGUAGE.to_string(),
            strings: HashMap::new(),
        }
    }
}

impl Translations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load string tables from a YAML file
    pub fn load(path: &str) -> Result<Self, HookError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| HookError::ConfigError(format!("Failed to read translations: {}", e)))?;
        Self::from_yaml(&content)
    }

    /// Parse string tables from YAML content
    pub fn from_yaml(yaml: &str) -> Result<Self, HookError> {
        let strings: HashMap<String, HashMap<String, String>> = serde_yaml::from_str(yaml)
            .map_err(|e| HookError::ConfigError(format!("Failed to parse translations: {}", e)))?;
        Ok(Self {
            strings,
            ..Self::default()
        })
    }

    /// Set the language consulted when a key is missing
    pub fn with_fallback(mut self, language: impl Into<String>) -> Self {
        self.fallback = language.into();
        self
    }

    /// Add or replace a single string
    pub fn insert(&mut self, language: &str, key: impl Into<String>, value: impl Into<String>) {
        self.strings
            .entry(language.to_string())
            .or_default()
            .insert(key.into(), value.into());
    }

    /// Merge another set of tables into this one; `other` wins on conflicts
    pub fn merge(&mut self, other: Translations) {
        for (language, table) in other.strings {
            self.strings.entry(language).or_default().extend(table);
        }
    }

    /// Look a key up without falling back to the key itself
    pub fn lookup(&self, language: &str, key: &str) -> Option<&str> {
        self.strings
            .get(language)
            .and_then(|table| table.get(key))
            .or_else(|| self.strings.get(&self.fallback).and_then(|table| table.get(key)))
            .map(String::as_str)
    }
}

impl Localizer for Translations {
    fn resolve(&self, language: &str, key: &str) -> String {
        match self.lookup(language, key) {
            Some(text) => text.to_string(),
            None => {
                tracing::debug!(language, key, "missing translation");
                key.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> Translations {
        Translations::from_yaml(
            r#"
en:
  greeting: "Hello"
  objective.catch.plural: "Catch {%1} Pokémon"
  pair: "{%1} and {%2}"
nb:
  greeting: "Hei"
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_resolve_with_fallback() {
        let t = tables();
        assert_eq!(t.resolve("nb", "greeting"), "Hei");
        assert_eq!(t.resolve("nb", "pair"), "{%1} and {%2}");
        assert_eq!(t.resolve("de", "greeting"), "Hello");
        assert_eq!(t.resolve("en", "no.such.key"), "no.such.key");
    }

    #[test]
    fn test_resolve_args() {
        let t = tables();
        let args = vec!["5".to_string()];
        assert_eq!(t.resolve_args("en", "objective.catch.plural", &args), "Catch 5 Pokémon");

        let args = vec!["a".to_string(), "b".to_string()];
        assert_eq!(t.resolve_args("en", "pair", &args), "a and b");
    }

    #[test]
    fn test_arguments_are_not_rescanned() {
        let t = tables();
        let args = vec!["{%2}".to_string(), "x".to_string()];
        assert_eq!(t.resolve_args("en", "pair", &args), "{%2} and x");

        let args = vec!["{%1}".to_string()];
        assert_eq!(t.resolve_args("en", "objective.catch.plural", &args), "Catch {%1} Pokémon");
    }

    #[test]
    fn test_unmatched_placeholders_kept() {
        let args = vec!["a".to_string()];
        assert_eq!(fill_args("{%1}/{%2}/{%0}/{%x}/{%", &args), "a/{%2}/{%0}/{%x}/{%");
        assert_eq!(fill_args("100%{%1}", &args), "100%a");
    }

    #[test]
    fn test_merge_overrides() {
        let mut t = tables();
        let mut extra = Translations::new();
        extra.insert("en", "greeting", "Howdy");
        t.merge(extra);
        assert_eq!(t.resolve("en", "greeting"), "Howdy");
    }
}
