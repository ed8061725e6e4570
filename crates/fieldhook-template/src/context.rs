//! Rendering context.
//!
//! `RenderEnv` holds the long-lived collaborators shared by every render.
//! `ResolutionContext` adds one update event plus the per-target display
//! choices (language, icon sets), so nothing a render depends on is ambient
//! state and targets can be rendered independently.

use crate::navigation::NavigationProviders;
use chrono::DateTime;
use chrono_tz::Tz;
use fieldhook_core::{IconResolver, Localizer, ResearchDescriptor, ResearchEvent, ResearchKind};
use fieldhook_research::ResearchCatalog;
use std::sync::Arc;

/// Process-wide rendering collaborators
#[derive(Clone)]
pub struct RenderEnv {
    pub localizer: Arc<dyn Localizer>,
    pub icons: Arc<dyn IconResolver>,
    pub catalog: Arc<ResearchCatalog>,
    pub navigation: NavigationProviders,
    /// Base external URL of the site, returned by SITEURL
    pub site_url: String,
    /// Zone TIME renders in
    pub timezone: Tz,
}

impl RenderEnv {
    pub fn new(
        localizer: Arc<dyn Localizer>,
        icons: Arc<dyn IconResolver>,
        catalog: Arc<ResearchCatalog>,
    ) -> Self {
        Self {
            localizer,
            icons,
            catalog,
            navigation: NavigationProviders::default().resolved(),
            site_url: String::new(),
            timezone: Tz::UTC,
        }
    }

    pub fn with_navigation(mut self, navigation: NavigationProviders) -> Self {
        self.navigation = navigation.resolved();
        self
    }

    pub fn with_site_url(mut self, site_url: impl Into<String>) -> Self {
        self.site_url = site_url.into();
        self
    }

    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }
}

/// Everything one render reads. Never mutated while rendering.
#[derive(Clone)]
pub struct ResolutionContext<'a> {
    pub env: &'a RenderEnv,
    pub event: &'a ResearchEvent,
    pub language: String,
    pub icon_set: String,
    pub species_set: String,
    /// Show the species icon instead of the generic encounter icon
    pub show_species: bool,
}

impl<'a> ResolutionContext<'a> {
    pub fn new(env: &'a RenderEnv, event: &'a ResearchEvent) -> Self {
        Self {
            env,
            event,
            language: "en".to_string(),
            icon_set: "default".to_string(),
            species_set: "default".to_string(),
            show_species: true,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_icon_set(mut self, icon_set: impl Into<String>) -> Self {
        self.icon_set = icon_set.into();
        self
    }

    pub fn with_species_set(mut self, species_set: impl Into<String>) -> Self {
        self.species_set = species_set.into();
        self
    }

    pub fn with_show_species(mut self, show_species: bool) -> Self {
        self.show_species = show_species;
        self
    }

    /// The reported objective or reward
    pub fn descriptor(&self, kind: ResearchKind) -> &ResearchDescriptor {
        match kind {
            ResearchKind::Objective => &self.event.poi.objective,
            ResearchKind::Reward => &self.event.poi.reward,
        }
    }

    /// Localised description of the reported objective or reward
    pub fn describe(&self, kind: ResearchKind) -> String {
        self.env.catalog.describe(
            kind,
            self.descriptor(kind),
            false,
            self.env.localizer.as_ref(),
            &self.language,
        )
    }

    /// Report time in the configured zone
    pub fn local_time(&self) -> DateTime<Tz> {
        self.event.reported_at.with_timezone(&self.env.timezone)
    }
}
