//! Webhook target storage.
//!
//! Targets are read fresh for every update so that edits made by an
//! administrator take effect on the next report without a restart.

use crate::data_model::WebhookTarget;
use crate::error::HookError;
use serde::Deserialize;
use std::path::PathBuf;

/// Source of the currently configured webhook targets
pub trait TargetSource: Send + Sync {
    fn load_targets(&self) -> Result<Vec<WebhookTarget>, HookError>;
}

/// Top-level targets file structure
#[derive(Debug, Deserialize)]
struct TargetsFile {
    #[serde(default)]
    webhooks: Vec<WebhookTarget>,
}

/// Targets read from a YAML file on every call
#[derive(Debug, Clone)]
pub struct YamlTargetSource {
    path: PathBuf,
}

impl YamlTargetSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Parse targets from YAML content
    pub fn parse(yaml: &str) -> Result<Vec<WebhookTarget>, HookError> {
        let file: TargetsFile = serde_yaml::from_str(yaml)
            .map_err(|e| HookError::TargetError(format!("Failed to parse targets YAML: {}", e)))?;
        Ok(file.webhooks)
    }
}

impl TargetSource for YamlTargetSource {
    fn load_targets(&self) -> Result<Vec<WebhookTarget>, HookError> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no targets file; nothing to notify");
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| HookError::TargetError(format!("Failed to read targets file: {}", e)))?;
        Self::parse(&content)
    }
}

/// A fixed list of targets
#[derive(Debug, Clone, Default)]
pub struct StaticTargets(pub Vec<WebhookTarget>);

impl TargetSource for StaticTargets {
    fn load_targets(&self) -> Result<Vec<WebhookTarget>, HookError> {
        Ok(self.0.clone())
    }
}
