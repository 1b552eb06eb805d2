use thiserror::Error;

/// Core error type shared across Fixturist crates.
#[derive(Debug, Error)]
pub enum Error {
    /// A value cannot be used as a map key.
    #[error("invalid map key: {0}")]
    InvalidMapKey(String),
    /// A caller value could not be converted into the value model.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results returned by Fixturist crates.
pub type Result<T> = std::result::Result<T, Error>;
