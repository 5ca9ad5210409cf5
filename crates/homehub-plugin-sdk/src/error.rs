use thiserror::Error;

/// Errors raised by plugin code while being constructed or refreshed.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("failed to construct plugin: {0}")]
    Construction(String),
    #[error("invalid entry reference: {0}")]
    InvalidEntry(String),
    #[error("invalid plugin data: {0}")]
    Data(String),
    #[error("refresh failed: {0}")]
    Refresh(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
