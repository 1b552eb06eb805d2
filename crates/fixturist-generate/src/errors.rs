use thiserror::Error;

/// Errors emitted by the generation engine. Every variant aborts the run.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("value for field '{path}' clashes with constraint {constraint}")]
    ConstraintConflict { path: String, constraint: String },
    #[error("unable to meet constraint {constraint} on field '{path}' after {attempts} attempts")]
    ConstraintExhausted {
        path: String,
        constraint: String,
        attempts: u32,
    },
    #[error("map field '{path}' needs a key sequence: its key type is not primitive")]
    UnsupportedMapKey { path: String },
    #[error("map field '{path}' ran out of distinct keys before reaching {requested} entries")]
    MapKeySpaceExhausted { path: String, requested: usize },
    #[error("unsupported type '{type_name}' at field '{path}'")]
    UnsupportedShape { path: String, type_name: String },
    #[error("factory is not bound to a type")]
    UnboundRoot,
    #[error("invalid directive: {0}")]
    InvalidDirective(String),
    #[error("item {index} does not match the target type: {source}")]
    Materialize {
        index: usize,
        source: serde_json::Error,
    },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("generation panicked: {0}")]
    Panicked(String),
}
