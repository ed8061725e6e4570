//! Navigation provider links for the NAVURL token
use fieldhook_core::Coordinates;
use serde::Deserialize;
use std::collections::HashMap;

const DEFAULT_PROVIDER: &str = "google";

/// URL templates keyed by provider name. Templates may contain `{%LAT%}`,
/// `{%LON%}` and `{%NAME%}`.
#[derive(Debug, Clone, Deserialize)]
pub struct NavigationProviders {
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Extra or overriding providers
    #[serde(default)]
    pub providers: HashMap<String, String>,
}

fn default_provider() -> String {
    DEFAULT_PROVIDER.to_string()
}

fn builtin_providers() -> HashMap<String, String> {
    [
        ("google", "https://www.google.com/maps/dir/?api=1&destination={%LAT%},{%LON%}"),
        ("bing", "https://www.bing.com/maps?rtp=~pos.{%LAT%}_{%LON%}_{%NAME%}"),
        ("waze", "https://waze.com/ul?ll={%LAT%},{%LON%}"),
        ("apple", "http://maps.apple.com/?daddr={%LAT%},{%LON%}"),
        ("here", "https://share.here.com/r/{%LAT%},{%LON%}"),
        ("yandex", "https://yandex.ru/maps?rtext=~{%LAT%},{%LON%}"),
    ]
    .into_iter()
    .map(|(name, url)| (name.to_string(), url.to_string()))
    .collect()
}

impl Default for NavigationProviders {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            providers: HashMap::new(),
        }
    }
}

impl NavigationProviders {
    /// Merge configured providers over the built-in table
    pub fn resolved(mut self) -> Self {
        let mut providers = builtin_providers();
        providers.extend(self.providers);
        self.providers = providers;
        self
    }

    pub fn with_default(mut self, provider: impl Into<String>) -> Self {
        self.default_provider = provider.into();
        self
    }

    /// Directions link to a location, or `None` for an unknown provider
    pub fn url(&self, provider: Option<&str>, location: &Coordinates, name: &str) -> Option<String> {
        let provider = provider.unwrap_or(self.default_provider.as_str());
        let template = self.providers.get(provider)?;

        Some(
            template
                .replace("{%LAT%}", &urlencoding::encode(&location.latitude.to_string()))
                .replace("{%LON%}", &urlencoding::encode(&location.longitude.to_string()))
                .replace("{%NAME%}", &urlencoding::encode(name)),
        )
    }
}
