//! Delivery errors
use thiserror::Error;

/// Why one target could not be notified
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("INVALID_TARGET/{0}")]
    InvalidTarget(String),

    #[error("CREDENTIAL/{0}")]
    Credential(String),

    #[error("TRANSPORT/{0}")]
    Transport(String),

    #[error("STATUS/{0}")]
    Status(u16),
}

impl From<reqwest::Error> for DispatchError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => DispatchError::Status(status.as_u16()),
            // The request URL can carry a bot token
            None => DispatchError::Transport(err.without_url().to_string()),
        }
    }
}
