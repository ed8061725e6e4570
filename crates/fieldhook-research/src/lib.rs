//! Research catalog and matching.
//!
//! This crate knows which objectives and rewards exist, what parameters
//! they take, how they are described to people, and how a reported
//! research task is compared with a webhook's filter requirements.
//!
//! # Example
//!
//! ```ignore
//! use fieldhook_research::{ResearchCatalog, ResearchMatcher, ResearchInput, Determination};
//!
//! let catalog = Arc::new(ResearchCatalog::builtin()?);
//! let strings = Arc::new(builtin_translations()?);
//! let matcher = ResearchMatcher::new(catalog, strings, "en");
//!
//! match matcher.determine(ResearchKind::Objective, &ResearchInput::free_text("Catch 5 Pokémon"), false) {
//!     Determination::Matched(objective) => println!("{}", objective.r#type),
//!     other => println!("unresolved: {:?}", other),
//! }
//! ```

pub mod catalog;
pub mod fuzzy;
pub mod matcher;

pub use catalog::{builtin_translations, CatalogEntry, ParamKind, ParamSpec, ResearchCatalog};
pub use matcher::{
    matches, matches_descriptor, CatalogSearch, Determination, FuzzyCatalogSearch, ResearchInput,
    ResearchMatcher, DEFAULT_MATCH_ALGORITHM,
};
