//! Research catalog loading and representation.
//!
//! The catalog file declares:
//! - Parameters, each a scalar or a list, optionally with a label key
//! - Objective and reward types in display order, with their parameters
//! - Common objectives used for fuzzy free-text matching

use fieldhook_core::{
    HookError, Localizer, ParamValue, ResearchDescriptor, ResearchKind, ResearchParams,
};
use serde::Deserialize;
use std::collections::HashMap;

const BUILTIN_CATALOG: &str = include_str!("../catalog/research.yaml");
const BUILTIN_STRINGS: &str = include_str!("../lang/en.yaml");

/// Top-level catalog file structure
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogFile {
    pub version: String,
    #[serde(default)]
    pub parameters: HashMap<String, ParamSpec>,
    #[serde(default)]
    pub objectives: Vec<CatalogEntry>,
    #[serde(default)]
    pub rewards: Vec<CatalogEntry>,
    #[serde(default)]
    pub common_objectives: Vec<ResearchDescriptor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    Scalar,
    List,
}

/// Shape of a named parameter
#[derive(Debug, Clone, Deserialize)]
pub struct ParamSpec {
    pub kind: ParamKind,
    /// Translation key pattern for values, `{}` standing for the value
    #[serde(default)]
    pub label: Option<String>,
}

/// An objective or reward type
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    pub r#type: String,
    #[serde(default)]
    pub params: Vec<String>,
}

/// Validated catalog ready for lookups
#[derive(Debug, Clone)]
pub struct ResearchCatalog {
    pub version: String,
    parameters: HashMap<String, ParamSpec>,
    objectives: Vec<CatalogEntry>,
    rewards: Vec<CatalogEntry>,
    common_objectives: Vec<ResearchDescriptor>,
}

impl ResearchCatalog {
    /// Load a catalog from a YAML file
    pub fn load(path: &str) -> Result<Self, HookError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| HookError::CatalogError(format!("Failed to read catalog file: {}", e)))?;
        Self::from_yaml(&content)
    }

    /// Parse and validate a catalog from YAML content
    pub fn from_yaml(yaml: &str) -> Result<Self, HookError> {
        let file: CatalogFile = serde_yaml::from_str(yaml)
            .map_err(|e| HookError::CatalogError(format!("Failed to parse catalog YAML: {}", e)))?;

        for entry in file.objectives.iter().chain(file.rewards.iter()) {
            if let Some(missing) = entry.params.iter().find(|p| !file.parameters.contains_key(*p)) {
                return Err(HookError::CatalogError(format!(
                    "type '{}' uses undeclared parameter '{}'",
                    entry.r#type, missing
                )));
            }
        }

        let catalog = ResearchCatalog {
            version: file.version,
            parameters: file.parameters,
            objectives: file.objectives,
            rewards: file.rewards,
            common_objectives: file.common_objectives,
        };

        for common in &catalog.common_objectives {
            if !catalog.is_valid(ResearchKind::Objective, &common.r#type, &common.params) {
                return Err(HookError::CatalogError(format!(
                    "common objective '{}' does not fit its type",
                    common.r#type
                )));
            }
        }

        Ok(catalog)
    }

    /// The catalog bundled with the crate
    pub fn builtin() -> Result<Self, HookError> {
        Self::from_yaml(BUILTIN_CATALOG)
    }

    /// All types of one kind in display order
    pub fn entries(&self, kind: ResearchKind) -> &[CatalogEntry] {
        match kind {
            ResearchKind::Objective => &self.objectives,
            ResearchKind::Reward => &self.rewards,
        }
    }

    pub fn entry(&self, kind: ResearchKind, research_type: &str) -> Option<&CatalogEntry> {
        self.entries(kind).iter().find(|e| e.r#type == research_type)
    }

    pub fn parameter(&self, name: &str) -> Option<&ParamSpec> {
        self.parameters.get(name)
    }

    pub fn common_objectives(&self) -> &[ResearchDescriptor] {
        &self.common_objectives
    }

    /// Whether `research_type` exists and `params` carries every parameter
    /// the type declares, each with the declared arity
    pub fn is_valid(&self, kind: ResearchKind, research_type: &str, params: &ResearchParams) -> bool {
        let Some(entry) = self.entry(kind, research_type) else {
            return false;
        };

        entry.params.iter().all(|name| {
            match (self.parameters.get(name), params.get(name)) {
                (Some(spec), Some(value)) => match spec.kind {
                    ParamKind::Scalar => !value.is_list(),
                    ParamKind::List => value.is_list() && value.count() > 0,
                },
                _ => false,
            }
        })
    }

    /// Localised human-readable description of a descriptor.
    ///
    /// The plural form (`<kind>.<type>.plural`) is used when forced or when
    /// the `quantity` parameter is present and not 1. Positional arguments
    /// are the parameters in the order the type declares them.
    pub fn describe(
        &self,
        kind: ResearchKind,
        descriptor: &ResearchDescriptor,
        force_plural: bool,
        localizer: &dyn Localizer,
        language: &str,
    ) -> String {
        let plural = force_plural
            || descriptor
                .param("quantity")
                .map(|q| q.to_string() != "1")
                .unwrap_or(false);

        let key = if plural {
            format!("{}.{}.plural", kind, descriptor.r#type)
        } else {
            format!("{}.{}", kind, descriptor.r#type)
        };

        let args: Vec<String> = match self.entry(kind, &descriptor.r#type) {
            Some(entry) => entry
                .params
                .iter()
                .map(|name| self.render_param(name, descriptor.param(name), localizer, language))
                .collect(),
            None => Vec::new(),
        };

        localizer.resolve_args(language, &key, &args)
    }

    fn render_param(
        &self,
        name: &str,
        value: Option<&ParamValue>,
        localizer: &dyn Localizer,
        language: &str,
    ) -> String {
        let Some(value) = value else {
            return String::new();
        };
        let label = self.parameters.get(name).and_then(|spec| spec.label.as_deref());

        let rendered: Vec<String> = value
            .values()
            .iter()
            .map(|v| {
                let raw = v.to_string();
                match label {
                    Some(pattern) => {
                        let key = pattern.replace("{}", &raw);
                        let text = localizer.resolve(language, &key);
                        // Unknown labels show the raw value
                        if text == key {
                            raw
                        } else {
                            text
                        }
                    }
                    None => raw,
                }
            })
            .collect();

        rendered.join(", ")
    }
}

/// String tables for the bundled catalog
pub fn builtin_translations() -> Result<fieldhook_core::Translations, HookError> {
    fieldhook_core::Translations::from_yaml(BUILTIN_STRINGS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldhook_core::Translations;

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = ResearchCatalog::builtin().unwrap();
        assert!(catalog.entry(ResearchKind::Objective, "catch").is_some());
        assert!(catalog.entry(ResearchKind::Reward, "encounter").is_some());
        assert!(!catalog.common_objectives().is_empty());
    }

    #[test]
    fn test_undeclared_parameter_rejected() {
        let yaml = r#"
version: "1"
objectives:
  - type: catch
    params: [quantity]
"#;
        assert!(ResearchCatalog::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_extra_entry_keys_are_ignored() {
        let yaml = r#"
version: "1"
parameters:
  quantity:
    kind: scalar
objectives:
  - type: catch
    params: [quantity]
    categories: [catch]
"#;
        let catalog = ResearchCatalog::from_yaml(yaml).unwrap();
        let entry = catalog.entry(ResearchKind::Objective, "catch").unwrap();
        assert_eq!(entry.params, vec!["quantity"]);
    }

    #[test]
    fn test_is_valid_checks_arity() {
        let catalog = ResearchCatalog::builtin().unwrap();
        let good = ResearchDescriptor::new("catch_type")
            .with_param("quantity", 5)
            .with_param("type", ParamValue::list(["fire", "water"]));
        assert!(catalog.is_valid(ResearchKind::Objective, &good.r#type, &good.params));

        let scalar_for_list = ResearchDescriptor::new("catch_type")
            .with_param("quantity", 5)
            .with_param("type", "fire");
        assert!(!catalog.is_valid(ResearchKind::Objective, "catch_type", &scalar_for_list.params));

        let missing = ResearchDescriptor::new("catch");
        assert!(!catalog.is_valid(ResearchKind::Objective, "catch", &missing.params));
        assert!(!catalog.is_valid(ResearchKind::Objective, "no_such_type", &good.params));
        assert!(!catalog.is_valid(ResearchKind::Reward, "catch", &good.params));
    }

    #[test]
    fn test_describe_singular_and_plural() {
        let catalog = ResearchCatalog::builtin().unwrap();
        let strings = builtin_translations().unwrap();

        let one = ResearchDescriptor::new("catch").with_param("quantity", 1);
        let many = ResearchDescriptor::new("catch").with_param("quantity", 10);
        assert_eq!(
            catalog.describe(ResearchKind::Objective, &one, false, &strings, "en"),
            "Catch a Pokémon"
        );
        assert_eq!(
            catalog.describe(ResearchKind::Objective, &many, false, &strings, "en"),
            "Catch 10 Pokémon"
        );
        assert_eq!(
            catalog.describe(ResearchKind::Objective, &one, true, &strings, "en"),
            "Catch 1 Pokémon"
        );
    }

    #[test]
    fn test_describe_localises_list_labels() {
        let catalog = ResearchCatalog::builtin().unwrap();
        let strings = builtin_translations().unwrap();

        let encounter = ResearchDescriptor::new("encounter").with_param("species", ParamValue::list([25, 9999]));
        assert_eq!(
            catalog.describe(ResearchKind::Reward, &encounter, false, &strings, "en"),
            "Pikachu, 9999 encounter"
        );
    }

    #[test]
    fn test_describe_unknown_type_returns_key() {
        let catalog = ResearchCatalog::builtin().unwrap();
        let strings = Translations::new();
        let unknown = ResearchDescriptor::new("mystery");
        assert_eq!(
            catalog.describe(ResearchKind::Reward, &unknown, false, &strings, "en"),
            "reward.mystery"
        );
    }
}
