//! Research matching.
//!
//! Decides whether a reported objective or reward satisfies a filter
//! requirement, and turns submitted research (structured or free text) into
//! a concrete descriptor.

use crate::catalog::ResearchCatalog;
use crate::fuzzy;
use fieldhook_core::{
    Localizer, ParamValue, ResearchDescriptor, ResearchKind, ResearchParams, ScalarValue,
};
use serde::{Deserialize, Deserializer};
use std::sync::Arc;

/// Algorithm used when a free-text submission names none
pub const DEFAULT_MATCH_ALGORITHM: i64 = 2;

/// Research as submitted by a client
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResearchInput {
    #[serde(default)]
    pub r#type: Option<String>,
    #[serde(default)]
    pub params: Option<ResearchParams>,
    /// Free-text description to match against the catalog
    #[serde(default, rename = "match")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient_algorithm")]
    pub match_algo: Option<i64>,
}

/// Clients send the algorithm as a number or a numeric string
fn lenient_algorithm<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Algorithm {
        Int(i64),
        Float(f64),
        Text(String),
    }

    Ok(Option::<Algorithm>::deserialize(deserializer)?.map(|algo| match algo {
        Algorithm::Int(n) => n,
        Algorithm::Float(f) => f as i64,
        Algorithm::Text(s) => leading_int(&s),
    }))
}

/// Leading optionally signed integer; 0 when there is none
fn leading_int(text: &str) -> i64 {
    let s = text.trim_start();
    let sign_len = usize::from(s.starts_with(['+', '-']));
    let digits = s[sign_len..].bytes().take_while(u8::is_ascii_digit).count();
    s[..sign_len + digits].parse().unwrap_or(0)
}

impl ResearchInput {
    pub fn structured(descriptor: ResearchDescriptor) -> Self {
        Self {
            r#type: Some(descriptor.r#type),
            params: Some(descriptor.params),
            ..Self::default()
        }
    }

    pub fn free_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn with_algorithm(mut self, algorithm: i64) -> Self {
        self.match_algo = Some(algorithm);
        self
    }
}

/// Outcome of resolving submitted research
#[derive(Debug, Clone, PartialEq)]
pub enum Determination {
    Matched(ResearchDescriptor),
    /// Not enough information to resolve
    NotDetermined,
    /// Matching ran but produced nothing
    NoCandidates,
    /// The requested algorithm does not exist for this kind
    NotImplemented,
}

/// Full-catalog free-text search
pub trait CatalogSearch: Send + Sync {
    fn search(&self, kind: ResearchKind, text: &str) -> Option<ResearchDescriptor>;
}

/// Searches every catalog type whose only parameter is a quantity.
///
/// The quantity is the first number in the text, defaulting to 1. Types
/// needing other parameters (species, Pokémon types) cannot be recovered
/// from free text and are skipped.
pub struct FuzzyCatalogSearch {
    catalog: Arc<ResearchCatalog>,
    localizer: Arc<dyn Localizer>,
    language: String,
}

impl FuzzyCatalogSearch {
    pub fn new(catalog: Arc<ResearchCatalog>, localizer: Arc<dyn Localizer>, language: impl Into<String>) -> Self {
        Self {
            catalog,
            localizer,
            language: language.into(),
        }
    }
}

impl CatalogSearch for FuzzyCatalogSearch {
    fn search(&self, kind: ResearchKind, text: &str) -> Option<ResearchDescriptor> {
        let quantity = fuzzy::first_number(text).unwrap_or(1);

        let candidates = self.catalog.entries(kind).iter().filter_map(|entry| {
            let descriptor = match entry.params.as_slice() {
                [] => ResearchDescriptor::new(entry.r#type.as_str()),
                [only] if only == "quantity" => {
                    ResearchDescriptor::new(entry.r#type.as_str()).with_param("quantity", quantity)
                }
                _ => return None,
            };
            if entry.r#type == "unknown" {
                return None;
            }
            let texts = describe_forms(&self.catalog, kind, &descriptor, self.localizer.as_ref(), &self.language);
            Some((texts, descriptor))
        });

        fuzzy::best_match(text, candidates)
    }
}

/// Singular and plural descriptions of a descriptor
fn describe_forms(
    catalog: &ResearchCatalog,
    kind: ResearchKind,
    descriptor: &ResearchDescriptor,
    localizer: &dyn Localizer,
    language: &str,
) -> Vec<String> {
    vec![
        catalog.describe(kind, descriptor, false, localizer, language),
        catalog.describe(kind, descriptor, true, localizer, language),
    ]
}

/// Validates, compares and resolves research descriptors
pub struct ResearchMatcher {
    catalog: Arc<ResearchCatalog>,
    localizer: Arc<dyn Localizer>,
    search: Arc<dyn CatalogSearch>,
    language: String,
}

impl ResearchMatcher {
    /// Matcher using the fuzzy catalog search
    pub fn new(catalog: Arc<ResearchCatalog>, localizer: Arc<dyn Localizer>, language: impl Into<String>) -> Self {
        let language = language.into();
        let search = Arc::new(FuzzyCatalogSearch::new(catalog.clone(), localizer.clone(), language.clone()));
        Self {
            catalog,
            localizer,
            search,
            language,
        }
    }

    /// Replace the full-catalog search
    pub fn with_search(mut self, search: Arc<dyn CatalogSearch>) -> Self {
        self.search = search;
        self
    }

    pub fn is_valid(&self, kind: ResearchKind, research_type: &str, params: &ResearchParams) -> bool {
        self.catalog.is_valid(kind, research_type, params)
    }

    /// Resolve submitted research into a descriptor.
    ///
    /// Structured input is returned unchanged. Free text is only honoured
    /// for non-interactive reporters.
    pub fn determine(&self, kind: ResearchKind, input: &ResearchInput, interactive: bool) -> Determination {
        if let (Some(research_type), Some(params)) = (&input.r#type, &input.params) {
            return Determination::Matched(ResearchDescriptor {
                r#type: research_type.clone(),
                params: params.clone(),
            });
        }

        if interactive {
            return Determination::NotDetermined;
        }

        let Some(text) = input.text.as_deref() else {
            return Determination::NotDetermined;
        };

        let algorithm = input.match_algo.unwrap_or(DEFAULT_MATCH_ALGORITHM);
        let found = match (kind, algorithm) {
            (ResearchKind::Objective, 1) => self.match_common_objective(text),
            (_, 2) => self.search.search(kind, text),
            _ => {
                tracing::debug!(%kind, algorithm, "unsupported match algorithm");
                return Determination::NotImplemented;
            }
        };

        match found {
            Some(descriptor) => {
                tracing::debug!(%kind, research_type = %descriptor.r#type, "free-text research matched");
                Determination::Matched(descriptor)
            }
            None => Determination::NoCandidates,
        }
    }

    /// Closest common objective to a free-text description
    pub fn match_common_objective(&self, text: &str) -> Option<ResearchDescriptor> {
        let candidates = self.catalog.common_objectives().iter().map(|descriptor| {
            let texts = describe_forms(
                &self.catalog,
                ResearchKind::Objective,
                descriptor,
                self.localizer.as_ref(),
                &self.language,
            );
            (texts, descriptor)
        });

        fuzzy::best_match(text, candidates).cloned()
    }
}

/// Whether a reported descriptor satisfies a filter requirement.
///
/// Types must be equal. Every parameter of the requirement must be present
/// in the candidate: a scalar requirement needs the same single value, a
/// list requirement needs every candidate value to be one of its values.
/// Parameters absent from the requirement are unconstrained.
pub fn matches(
    candidate_type: &str,
    candidate_params: &ResearchParams,
    required_type: &str,
    required_params: &ResearchParams,
) -> bool {
    if candidate_type != required_type {
        return false;
    }

    required_params.iter().all(|(name, required)| match candidate_params.get(name) {
        Some(candidate) => satisfies(candidate, required),
        None => false,
    })
}

/// `matches` over whole descriptors
pub fn matches_descriptor(candidate: &ResearchDescriptor, required: &ResearchDescriptor) -> bool {
    matches(&candidate.r#type, &candidate.params, &required.r#type, &required.params)
}

fn satisfies(candidate: &ParamValue, required: &ParamValue) -> bool {
    let values = candidate.values();
    match required {
        ParamValue::Scalar(expected) => values.len() == 1 && same(&values[0], expected),
        ParamValue::List(allowed) => {
            !values.is_empty() && values.iter().all(|v| allowed.iter().any(|a| same(v, a)))
        }
    }
}

/// Values compare by their text form, so `5` and `"5"` are equal
fn same(a: &ScalarValue, b: &ScalarValue) -> bool {
    a.to_string() == b.to_string()
}
