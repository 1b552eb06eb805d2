use serde::{Deserialize, Serialize};

/// Options for a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Seed for the run's random source. A fresh one is drawn when unset.
    pub seed: Option<u64>,
    /// Turn panics raised by field handlers or constraints into
    /// `GenerationError::Panicked` instead of unwinding through the caller.
    pub capture_panics: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            seed: None,
            capture_panics: true,
        }
    }
}
