//! Unified error model
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HookError {
    #[error("CONFIG/{0}")]
    ConfigError(String),

    #[error("CATALOG/{0}")]
    CatalogError(String),

    #[error("CREDENTIAL/{0}")]
    CredentialError(String),

    #[error("TARGET/{0}")]
    TargetError(String),
}
