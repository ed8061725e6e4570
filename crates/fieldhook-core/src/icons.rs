//! Icon theme URL lookup.
//!
//! Icon sets are addressed by name; each icon exists in a light and a dark
//! variant, and as a vector (SVG) or raster (PNG) file.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconFormat {
    Vector,
    Raster,
}

impl IconFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "vector" => Some(IconFormat::Vector),
            "raster" => Some(IconFormat::Raster),
            _ => None,
        }
    }

    fn extension(&self) -> &'static str {
        match self {
            IconFormat::Vector => "svg",
            IconFormat::Raster => "png",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconVariant {
    Light,
    Dark,
}

impl IconVariant {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "light" => Some(IconVariant::Light),
            "dark" => Some(IconVariant::Dark),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IconVariant::Light => "light",
            IconVariant::Dark => "dark",
        }
    }
}

/// Resolves icon URLs within named icon sets
pub trait IconResolver: Send + Sync {
    /// URL of a research icon (objective or reward type)
    fn icon_url(&self, set: &str, icon: &str, variant: IconVariant, format: IconFormat) -> String;

    /// URL of a species icon
    fn species_url(&self, set: &str, species: &str, variant: IconVariant, format: IconFormat) -> String;
}

/// URL patterns with `{set}`, `{variant}`, `{icon}` and `{ext}` placeholders
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IconPatterns {
    #[serde(default = "default_icon_pattern")]
    pub icons: String,
    #[serde(default = "default_species_pattern")]
    pub species: String,
}

fn default_icon_pattern() -> String {
    "themes/icons/{set}/{variant}/{icon}.{ext}".to_string()
}

fn default_species_pattern() -> String {
    "themes/species/{set}/{variant}/{icon}.{ext}".to_string()
}

impl Default for IconPatterns {
    fn default() -> Self {
        Self {
            icons: default_icon_pattern(),
            species: default_species_pattern(),
        }
    }
}

/// Builds icon URLs from patterns; relative patterns are resolved against the
/// site's base URL
#[derive(Debug, Clone)]
pub struct PatternIconResolver {
    base_url: String,
    patterns: IconPatterns,
}

impl PatternIconResolver {
    pub fn new(base_url: impl Into<String>, patterns: IconPatterns) -> Self {
        Self {
            base_url: base_url.into(),
            patterns,
        }
    }

    fn expand(&self, pattern: &str, set: &str, icon: &str, variant: IconVariant, format: IconFormat) -> String {
        let path = pattern
            .replace("{set}", set)
            .replace("{variant}", variant.as_str())
            .replace("{icon}", icon)
            .replace("{ext}", format.extension());

        if path.starts_with("http://") || path.starts_with("https://") {
            path
        } else {
            format!(
                "{}/{}",
                self.base_url.trim_end_matches('/'),
                path.trim_start_matches('/')
            )
        }
    }
}

impl IconResolver for PatternIconResolver {
    fn icon_url(&self, set: &str, icon: &str, variant: IconVariant, format: IconFormat) -> String {
        self.expand(&self.patterns.icons, set, icon, variant, format)
    }

    fn species_url(&self, set: &str, species: &str, variant: IconVariant, format: IconFormat) -> String {
        self.expand(&self.patterns.species, set, species, variant, format)
    }
}
