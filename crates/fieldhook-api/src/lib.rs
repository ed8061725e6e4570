//! FieldHook API /v1: research reports in, webhook notifications out
pub mod config;
pub mod handlers;
pub mod metrics;
pub mod middleware;

pub use config::ServiceConfig;
pub use handlers::ApiError;
pub use metrics::Metrics;

use axum::{
    routing::{get, post},
    Router,
};
use fieldhook_core::{
    AesGcmCredentials, CredentialStore, HookError, PatternIconResolver, PlaintextCredentials, StaticGeofences,
    TargetSource, YamlTargetSource,
};
use fieldhook_dispatch::Dispatcher;
use fieldhook_research::{builtin_translations, ResearchCatalog, ResearchMatcher};
use fieldhook_template::RenderEnv;
use std::sync::Arc;

/// Shared state behind every handler
pub struct AppState {
    pub matcher: ResearchMatcher,
    pub dispatcher: Dispatcher,
    pub targets: Arc<dyn TargetSource>,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(matcher: ResearchMatcher, dispatcher: Dispatcher, targets: Arc<dyn TargetSource>) -> Result<Self, HookError> {
        let metrics = Metrics::new().map_err(|e| HookError::ConfigError(format!("metrics registry: {}", e)))?;
        Ok(Self {
            matcher,
            dispatcher,
            targets,
            metrics,
        })
    }

    /// Wire the catalog, strings, icons, geofences and credentials from config
    pub fn from_config(config: &ServiceConfig) -> Result<Self, HookError> {
        let catalog = match &config.catalog_path {
            Some(path) => ResearchCatalog::load(&path.to_string_lossy())?,
            None => ResearchCatalog::builtin()?,
        };
        let catalog = Arc::new(catalog);

        let mut strings = builtin_translations()?;
        if let Some(path) = &config.translations_path {
            strings.merge(fieldhook_core::Translations::load(&path.to_string_lossy())?);
        }
        let strings = Arc::new(strings);

        let credentials: Arc<dyn CredentialStore> = match &config.credentials.key {
            Some(key) => Arc::new(AesGcmCredentials::new(key)?),
            None => Arc::new(PlaintextCredentials),
        };

        let env = RenderEnv::new(
            strings.clone(),
            Arc::new(PatternIconResolver::new(config.site_url.clone(), config.icons.clone())),
            catalog.clone(),
        )
        .with_navigation(config.navigation.clone())
        .with_site_url(config.site_url.clone())
        .with_timezone(config.timezone()?);

        let dispatcher = Dispatcher::new(
            Arc::new(env),
            Arc::new(StaticGeofences::from_config(&config.geofences)),
            credentials,
            config.dispatch_config(),
        );
        let matcher = ResearchMatcher::new(catalog, strings, config.default_language.clone());
        let targets = Arc::new(YamlTargetSource::new(config.targets_path.clone()));

        Self::new(matcher, dispatcher, targets)
    }
}

pub fn create_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/research", post(handlers::report_research))
        .route("/v1/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .layer(middleware::trace())
        .layer(middleware::cors())
        .with_state(state)
}

pub async fn run(config: ServiceConfig) -> anyhow::Result<()> {
    let state = Arc::new(AppState::from_config(&config)?);
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;

    tracing::info!("FieldHook API listening on {}", config.listen_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
